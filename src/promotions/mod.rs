//! Promotions
//!
//! The canonical promotion record and its advisory applicability check. The
//! backend owns promotion state end to end; records normalised here live only
//! as long as a page view's fetched snapshot.

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde_json::{Value, json};

use crate::{discounts::Discount, money::to_minor_units, usage::UsageCounters};

pub mod normalize;

/// Authoritative promotion state from the backend.
///
/// Client-derived expiry and usage checks are advisory overlays on top of
/// this, not a replacement for it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromotionStatus {
    /// Live and redeemable, subject to expiry and usage checks.
    Active,

    /// Switched off by an administrator.
    Inactive,

    /// Past its validity window.
    Expired,

    /// Not yet started.
    Scheduled,

    /// Soft-deleted.
    Deleted,
}

impl PromotionStatus {
    /// The canonical lowercase form used in payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatus::Active => "active",
            PromotionStatus::Inactive => "inactive",
            PromotionStatus::Expired => "expired",
            PromotionStatus::Scheduled => "scheduled",
            PromotionStatus::Deleted => "deleted",
        }
    }

    /// Parse a status string case-insensitively.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(PromotionStatus::Active),
            "inactive" => Some(PromotionStatus::Inactive),
            "expired" => Some(PromotionStatus::Expired),
            "scheduled" => Some(PromotionStatus::Scheduled),
            "deleted" => Some(PromotionStatus::Deleted),
            _ => None,
        }
    }
}

/// A canonical, fully-populated promotion record.
#[derive(Debug, Clone)]
pub struct Promotion {
    /// Stable identifier assigned by the backend.
    pub id: u64,

    /// Display title.
    pub title: String,

    /// Display description.
    pub description: String,

    /// Redemption code; promotions without one are not redeemable via code.
    pub code: Option<String>,

    /// The discount this promotion grants.
    pub discount: Discount<'static>,

    /// Order subtotal floor below which the discount does not apply.
    pub minimum_purchase: Money<'static, Currency>,

    /// Global and per-user usage counters.
    pub usage: UsageCounters,

    /// End of the validity window.
    pub valid_until: Timestamp,

    /// Authoritative backend state.
    pub status: PromotionStatus,
}

impl Promotion {
    /// Whether the current user can still redeem this promotion at `now`.
    ///
    /// Requires an `Active` status, an unexpired validity window, remaining
    /// global usage, and that the user has not already redeemed it.
    pub fn is_applicable(&self, now: Timestamp) -> bool {
        self.status == PromotionStatus::Active
            && now <= self.valid_until
            && self.usage.evaluate().can_redeem
    }

    /// The canonical `camelCase` payload form of this record.
    ///
    /// Used as the request body for admin create/update calls; feeding it
    /// back through the normalizer yields the same record.
    pub fn canonical_payload(&self) -> Value {
        let (discount_type, discount_value) = match &self.discount {
            Discount::PercentageOff(percent) => (
                "percentage",
                json!(((*percent) * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)),
            ),
            Discount::AmountOff(amount) => ("fixed", json!(to_minor_units(amount).unwrap_or(0))),
        };

        json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "code": self.code,
            "discountType": discount_type,
            "discountValue": discount_value,
            "minimumPurchase": to_minor_units(&self.minimum_purchase).unwrap_or(0),
            "usageLimit": self.usage.limit,
            "currentUsage": self.usage.current,
            "isUsed": self.usage.is_used,
            "validUntil": self.valid_until.to_string(),
            "status": self.status.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn fixture(status: PromotionStatus, usage: UsageCounters) -> Result<Promotion, jiff::Error> {
        Ok(Promotion {
            id: 7,
            title: "Weekend Matinee".to_owned(),
            description: "25% off morning showtimes".to_owned(),
            code: Some("MATINEE25".to_owned()),
            discount: Discount::PercentageOff(Percentage::from(0.25)),
            minimum_purchase: Money::from_minor(0, iso::VND),
            usage,
            valid_until: "2026-12-31T23:59:59Z".parse()?,
            status,
        })
    }

    #[test]
    fn active_unexpired_promotion_is_applicable() -> TestResult {
        let promo = fixture(PromotionStatus::Active, UsageCounters::new(3, 100, false))?;
        let now: Timestamp = "2026-06-01T12:00:00Z".parse()?;

        assert!(promo.is_applicable(now));

        Ok(())
    }

    #[test]
    fn expired_window_is_not_applicable() -> TestResult {
        let promo = fixture(PromotionStatus::Active, UsageCounters::new(3, 100, false))?;
        let now: Timestamp = "2027-01-01T00:00:00Z".parse()?;

        assert!(!promo.is_applicable(now));

        Ok(())
    }

    #[test]
    fn non_active_status_is_not_applicable() -> TestResult {
        let now: Timestamp = "2026-06-01T12:00:00Z".parse()?;

        for status in [
            PromotionStatus::Inactive,
            PromotionStatus::Expired,
            PromotionStatus::Scheduled,
            PromotionStatus::Deleted,
        ] {
            let promo = fixture(status, UsageCounters::new(3, 100, false))?;

            assert!(!promo.is_applicable(now), "{status:?} should not be applicable");
        }

        Ok(())
    }

    #[test]
    fn exhausted_or_used_promotion_is_not_applicable() -> TestResult {
        let now: Timestamp = "2026-06-01T12:00:00Z".parse()?;

        let exhausted = fixture(PromotionStatus::Active, UsageCounters::new(100, 100, false))?;
        let used = fixture(PromotionStatus::Active, UsageCounters::new(3, 100, true))?;

        assert!(!exhausted.is_applicable(now));
        assert!(!used.is_applicable(now));

        Ok(())
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            PromotionStatus::parse_lenient("ACTIVE"),
            Some(PromotionStatus::Active)
        );
        assert_eq!(
            PromotionStatus::parse_lenient(" Scheduled "),
            Some(PromotionStatus::Scheduled)
        );
        assert_eq!(PromotionStatus::parse_lenient("archived"), None);
    }

    #[test]
    fn canonical_payload_uses_camel_case_fields() -> TestResult {
        let promo = fixture(PromotionStatus::Active, UsageCounters::new(3, 100, false))?;
        let payload = promo.canonical_payload();

        assert_eq!(
            payload.get("discountType").and_then(Value::as_str),
            Some("percentage")
        );
        assert_eq!(
            payload.get("discountValue").and_then(Value::as_f64),
            Some(25.0)
        );
        assert_eq!(payload.get("usageLimit").and_then(Value::as_u64), Some(100));
        assert_eq!(payload.get("isUsed").and_then(Value::as_bool), Some(false));
        assert_eq!(payload.get("status").and_then(Value::as_str), Some("active"));

        Ok(())
    }
}
