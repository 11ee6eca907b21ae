//! Backend REST client
//!
//! A thin typed wrapper over the remote ticketing backend. The backend owns
//! every real decision (pricing, seat locking, redemption); this client only
//! fetches snapshots and submits admin mutations. Promotion-shaped responses
//! pass through the normalizer, so a malformed promotion degrades to defaults
//! instead of failing the whole page. There is no retry policy — failures
//! surface once and are left to a manual refresh.

use jiff::civil::Date;
use reqwest::{Method, StatusCode};
use rusty_money::iso::Currency;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::ApiConfig,
    promotions::{Promotion, normalize::normalize},
};

/// Errors surfaced by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP-level failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("malformed payload from {path}: {source}")]
    Payload {
        /// Request path that produced the body.
        path: String,

        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The response decoded but was not shaped as expected.
    #[error("unexpected payload shape from {path}")]
    Shape {
        /// Request path that produced the body.
        path: String,
    },

    /// The backend refused the request (401/403). Callers redirect silently
    /// rather than surfacing a toast.
    #[error("authorization denied for {path}")]
    Denied {
        /// Request path that was refused.
        path: String,
    },
}

/// Aggregate booking figures for the admin dashboard.
#[derive(Debug, Copy, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingStats {
    /// Bookings placed in the reporting window.
    pub total_bookings: u64,

    /// Bookings cancelled in the reporting window.
    pub cancelled_bookings: u64,

    /// Tickets sold in the reporting window.
    pub tickets_sold: u64,

    /// Gross revenue in minor currency units.
    pub total_revenue: i64,
}

/// One day of the sales report.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRow {
    /// Reporting day.
    pub date: Date,

    /// Bookings placed that day.
    #[serde(default)]
    pub bookings: u64,

    /// Revenue that day, in minor currency units.
    #[serde(default)]
    pub revenue: i64,
}

/// Typed client for the ticketing backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    currency: &'static Currency,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ApiConfig, currency: &'static Currency) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_token: config.api_token.clone(),
            currency,
        })
    }

    /// Fetch the promotion list.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, denial, or a response
    /// that is not a recognisable promotion collection.
    pub async fn promotions(&self) -> Result<Vec<Promotion>, ApiError> {
        let path = "/promotions";
        let body = self.request_json(Method::GET, path, None).await?;

        let items = collection_items(&body).ok_or_else(|| ApiError::Shape {
            path: path.to_owned(),
        })?;

        Ok(items
            .iter()
            .map(|item| normalize(item, self.currency))
            .collect())
    }

    /// Fetch a single promotion.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, denial, or a malformed
    /// body.
    pub async fn promotion(&self, id: u64) -> Result<Promotion, ApiError> {
        let body = self
            .request_json(Method::GET, &format!("/promotions/{id}"), None)
            .await?;

        Ok(normalize(unwrap_envelope(&body), self.currency))
    }

    /// Create a promotion (admin).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, denial, or a malformed
    /// body.
    pub async fn create_promotion(&self, promotion: &Promotion) -> Result<Promotion, ApiError> {
        let body = self
            .request_json(
                Method::POST,
                "/promotions",
                Some(promotion.canonical_payload()),
            )
            .await?;

        Ok(normalize(unwrap_envelope(&body), self.currency))
    }

    /// Update a promotion (admin).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, denial, or a malformed
    /// body.
    pub async fn update_promotion(&self, promotion: &Promotion) -> Result<Promotion, ApiError> {
        let body = self
            .request_json(
                Method::PUT,
                &format!("/promotions/{}", promotion.id),
                Some(promotion.canonical_payload()),
            )
            .await?;

        Ok(normalize(unwrap_envelope(&body), self.currency))
    }

    /// Delete a promotion (admin).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or denial.
    pub async fn delete_promotion(&self, id: u64) -> Result<(), ApiError> {
        self.request_json(Method::DELETE, &format!("/promotions/{id}"), None)
            .await?;

        Ok(())
    }

    /// Fetch aggregate booking statistics (admin/manager dashboards).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, denial, or a malformed
    /// body.
    pub async fn booking_stats(&self) -> Result<BookingStats, ApiError> {
        let path = "/reports/bookings";
        let body = self.request_json(Method::GET, path, None).await?;

        serde_json::from_value(unwrap_envelope(&body).clone()).map_err(|source| {
            ApiError::Payload {
                path: path.to_owned(),
                source,
            }
        })
    }

    /// Fetch the per-day sales report for an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, denial, or a response
    /// that is not a recognisable report collection.
    pub async fn sales_report(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<SalesReportRow>, ApiError> {
        let path = format!("/reports/sales?from={from}&to={to}");
        let body = self.request_json(Method::GET, &path, None).await?;

        let items = collection_items(&body).ok_or_else(|| ApiError::Shape { path: path.clone() })?;

        items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|source| ApiError::Payload {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }

    async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{path}", self.base_url);

        debug!(%method, path, "backend request");

        let mut request = self.http.request(method, &url);

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(path, %status, "backend denied request");

            return Err(ApiError::Denied {
                path: path.to_owned(),
            });
        }

        let response = response.error_for_status()?;
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|source| ApiError::Payload {
            path: path.to_owned(),
            source,
        })
    }
}

/// Extract the item list from a collection response.
///
/// Endpoints disagree on envelopes: some return a bare array, others wrap it
/// under `data`, `promotions`, or `items`.
fn collection_items(body: &Value) -> Option<&Vec<Value>> {
    if let Some(items) = body.as_array() {
        return Some(items);
    }

    let map = body.as_object()?;

    ["data", "promotions", "items"]
        .iter()
        .find_map(|key| map.get(*key))
        .and_then(Value::as_array)
}

/// Unwrap a single-record envelope, tolerating both bare objects and a
/// `data` wrapper.
fn unwrap_envelope(body: &Value) -> &Value {
    body.as_object()
        .and_then(|map| map.get("data"))
        .filter(|inner| inner.is_object())
        .unwrap_or(body)
}
