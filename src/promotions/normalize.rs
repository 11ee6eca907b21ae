//! Promotion normalization
//!
//! The boundary adapter between backend promotion payloads and the canonical
//! [`Promotion`] record. Backend responses mix field-naming conventions
//! (`PascalCase` and `camelCase` forms of the same logical field, plus a few
//! legacy spellings), so each logical field resolves against an ordered table
//! of candidate keys rather than ad hoc conditionals.
//!
//! Normalization never fails: absence or malformation of any field degrades
//! to that field's documented default instead of aborting the record. A
//! structured discount-type/value pair always wins over the free-text
//! discount hint, which is parsed only as a last resort.

use decimal_percentage::Percentage;
use jiff::{SignedDuration, Timestamp, tz::TimeZone};
use rust_decimal::{Decimal, RoundingStrategy, prelude::{FromPrimitive, ToPrimitive}};
use rusty_money::{Money, iso::Currency};
use serde_json::{Map, Value};

use crate::{discounts::Discount, usage::UsageCounters};

use super::{Promotion, PromotionStatus};

/// Fallback percentage when no discount field can be resolved.
const DEFAULT_PERCENT_OFF: u32 = 10;

/// Fallback validity window when no expiry date is present.
const DEFAULT_VALIDITY: SignedDuration = SignedDuration::from_hours(24 * 30);

const ID_KEYS: &[&str] = &["id", "Id", "ID", "promotionId", "PromotionId"];
const TITLE_KEYS: &[&str] = &["title", "Title", "name", "Name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "Description", "desc"];
const CODE_KEYS: &[&str] = &["code", "Code", "promoCode", "PromoCode", "couponCode"];
const DISCOUNT_TYPE_KEYS: &[&str] = &[
    "discountType",
    "DiscountType",
    "discount_type",
    "type",
    "Type",
];
const DISCOUNT_VALUE_KEYS: &[&str] = &[
    "discountValue",
    "DiscountValue",
    "discount_value",
    "value",
    "Value",
];
const DISCOUNT_HINT_KEYS: &[&str] = &["discount", "Discount", "discountText", "DiscountText"];
const MINIMUM_PURCHASE_KEYS: &[&str] = &[
    "minimumPurchase",
    "MinimumPurchase",
    "minimum_purchase",
    "minPurchase",
    "MinPurchase",
];
const USAGE_LIMIT_KEYS: &[&str] = &["usageLimit", "UsageLimit", "usage_limit", "maxUsage", "MaxUsage"];
const CURRENT_USAGE_KEYS: &[&str] = &[
    "currentUsage",
    "CurrentUsage",
    "current_usage",
    "usedCount",
    "UsedCount",
];
const IS_USED_KEYS: &[&str] = &["isUsed", "IsUsed", "is_used", "used"];
const VALID_UNTIL_KEYS: &[&str] = &[
    "validUntil",
    "ValidUntil",
    "valid_until",
    "expiryDate",
    "ExpiryDate",
    "endDate",
    "EndDate",
];
const STATUS_KEYS: &[&str] = &["status", "Status", "state", "State"];

/// Normalize a backend payload into a canonical [`Promotion`] at the current
/// instant.
pub fn normalize(payload: &Value, currency: &'static Currency) -> Promotion {
    normalize_at(payload, currency, Timestamp::now())
}

/// Normalize a backend payload, with `now` supplied explicitly.
///
/// `now` only feeds the fallback validity window for payloads without an
/// expiry date, but passing it in keeps normalization deterministic.
pub fn normalize_at(payload: &Value, currency: &'static Currency, now: Timestamp) -> Promotion {
    let fields = payload.as_object();

    Promotion {
        id: field_u64(fields, ID_KEYS).unwrap_or(0),
        title: field_string(fields, TITLE_KEYS).unwrap_or_default(),
        description: field_string(fields, DESCRIPTION_KEYS).unwrap_or_default(),
        code: field_string(fields, CODE_KEYS).filter(|code| !code.is_empty()),
        discount: resolve_discount(fields, currency),
        minimum_purchase: Money::from_minor(
            field_decimal(fields, MINIMUM_PURCHASE_KEYS)
                .and_then(decimal_to_minor)
                .unwrap_or(0),
            currency,
        ),
        usage: UsageCounters::new(
            field_u32(fields, CURRENT_USAGE_KEYS).unwrap_or(0),
            field_u32(fields, USAGE_LIMIT_KEYS).unwrap_or(0),
            field_bool(fields, IS_USED_KEYS).unwrap_or(false),
        ),
        valid_until: field_timestamp(fields, VALID_UNTIL_KEYS)
            .unwrap_or_else(|| now.checked_add(DEFAULT_VALIDITY).unwrap_or(now)),
        status: field_string(fields, STATUS_KEYS)
            .and_then(|status| PromotionStatus::parse_lenient(&status))
            .unwrap_or(PromotionStatus::Active),
    }
}

/// Resolve the discount with structured fields first and the free-text hint
/// last, defaulting to 10% off when nothing parses.
fn resolve_discount(
    fields: Option<&Map<String, Value>>,
    currency: &'static Currency,
) -> Discount<'static> {
    let value = field_decimal(fields, DISCOUNT_VALUE_KEYS);

    let kind = field_string(fields, DISCOUNT_TYPE_KEYS)
        .as_deref()
        .and_then(parse_discount_kind);

    match (kind, value) {
        (Some(DiscountKind::Percentage), Some(value)) => percentage_off(value),
        (Some(DiscountKind::Fixed), Some(value)) => amount_off(value, currency),
        // A value without a recognisable kind: small numbers read as a
        // percentage, anything above 100 as a currency amount.
        (None, Some(value)) if value <= Decimal::ONE_HUNDRED => percentage_off(value),
        (None, Some(value)) => amount_off(value, currency),
        _ => field_string(fields, DISCOUNT_HINT_KEYS)
            .as_deref()
            .and_then(|hint| parse_discount_hint(hint, currency))
            .unwrap_or_else(default_discount),
    }
}

enum DiscountKind {
    Percentage,
    Fixed,
}

fn parse_discount_kind(kind: &str) -> Option<DiscountKind> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "percentage" | "percent" | "pct" => Some(DiscountKind::Percentage),
        "fixed" | "amount" | "flat" => Some(DiscountKind::Fixed),
        _ => None,
    }
}

fn default_discount() -> Discount<'static> {
    Discount::PercentageOff(Percentage::from(
        Decimal::from(DEFAULT_PERCENT_OFF) / Decimal::ONE_HUNDRED,
    ))
}

fn percentage_off(value: Decimal) -> Discount<'static> {
    let clamped = value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    Discount::PercentageOff(Percentage::from(clamped / Decimal::ONE_HUNDRED))
}

fn amount_off(value: Decimal, currency: &'static Currency) -> Discount<'static> {
    let minor = decimal_to_minor(value).unwrap_or(0);

    Discount::AmountOff(Money::from_minor(minor, currency))
}

/// Parse a human-readable discount hint such as `"25%"` or `"50.000đ"`.
///
/// A trailing percent sign reads as a percentage; otherwise the digits are
/// collected as a whole currency amount (dots and commas read as thousands
/// separators). Anything else yields `None` and falls through to the default.
fn parse_discount_hint(hint: &str, currency: &'static Currency) -> Option<Discount<'static>> {
    let trimmed = hint.trim();

    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if numeric.is_empty() {
        return None;
    }

    let rest = trimmed.strip_prefix(numeric.as_str()).unwrap_or("").trim_start();

    if rest.starts_with('%') {
        let value = Decimal::from_str_exact(&numeric).ok()?;

        if value.is_sign_negative() {
            return None;
        }

        return Some(percentage_off(value));
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let minor = digits.parse::<i64>().ok().filter(|minor| *minor > 0)?;

    Some(Discount::AmountOff(Money::from_minor(minor, currency)))
}

/// Find the first candidate key present with a non-null value.
fn lookup<'v>(fields: Option<&'v Map<String, Value>>, keys: &[&str]) -> Option<&'v Value> {
    let map = fields?;

    keys.iter()
        .find_map(|key| map.get(*key))
        .filter(|value| !value.is_null())
}

fn field_string(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
    lookup(fields, keys)
        .and_then(Value::as_str)
        .map(|value| value.trim().to_owned())
}

/// Non-negative numeric field; rejects NaN, infinities, and negatives.
/// Numeric strings are tolerated since some endpoints stringify counters.
fn field_decimal(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<Decimal> {
    let value = lookup(fields, keys)?;

    let decimal = if let Some(int) = value.as_i64() {
        Decimal::from_i64(int)
    } else if let Some(float) = value.as_f64() {
        float.is_finite().then(|| Decimal::from_f64(float)).flatten()
    } else if let Some(text) = value.as_str() {
        Decimal::from_str_exact(text.trim()).ok()
    } else {
        None
    }?;

    (!decimal.is_sign_negative()).then_some(decimal)
}

fn field_u64(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<u64> {
    field_decimal(fields, keys).and_then(|decimal| decimal.to_u64())
}

fn field_u32(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<u32> {
    field_decimal(fields, keys).and_then(|decimal| decimal.to_u32())
}

fn field_bool(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<bool> {
    let value = lookup(fields, keys)?;

    if let Some(flag) = value.as_bool() {
        return Some(flag);
    }

    if let Some(int) = value.as_i64() {
        return Some(int != 0);
    }

    match value.as_str()?.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse an ISO 8601 expiry field: a full timestamp, or a bare date read as
/// end-of-day UTC.
fn field_timestamp(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<Timestamp> {
    let text = lookup(fields, keys)?.as_str()?.trim().to_owned();

    if let Ok(timestamp) = text.parse::<Timestamp>() {
        return Some(timestamp);
    }

    let date: jiff::civil::Date = text.parse().ok()?;

    date.at(23, 59, 59, 0)
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
}

fn decimal_to_minor(value: Decimal) -> Option<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use serde_json::json;
    use testresult::TestResult;

    use crate::discounts::{DiscountError, DiscountQuote, quote};

    use super::*;

    fn fixed_now() -> Result<Timestamp, jiff::Error> {
        "2026-08-01T00:00:00Z".parse()
    }

    fn quote_at_reference(promo: &Promotion) -> Result<DiscountQuote<'static>, DiscountError> {
        quote(&promo.discount, &Money::from_minor(100_000, iso::VND))
    }

    #[test]
    fn camel_case_payload_normalizes() -> TestResult {
        let payload = json!({
            "id": 12,
            "title": "Student Night",
            "description": "Half price for students",
            "code": "STUDENT50",
            "discountType": "percentage",
            "discountValue": 50,
            "minimumPurchase": 0,
            "usageLimit": 200,
            "currentUsage": 20,
            "isUsed": false,
            "validUntil": "2026-12-31T23:59:59Z",
            "status": "active",
        });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);

        assert_eq!(promo.id, 12);
        assert_eq!(promo.code.as_deref(), Some("STUDENT50"));
        assert_eq!(promo.usage.limit, 200);
        assert_eq!(promo.status, PromotionStatus::Active);

        let quote = quote_at_reference(&promo)?;
        assert_eq!(quote.percent_off(), 50);

        Ok(())
    }

    #[test]
    fn pascal_case_aliases_resolve_to_the_same_fields() -> TestResult {
        let payload = json!({
            "Id": 12,
            "Title": "Student Night",
            "PromoCode": "STUDENT50",
            "DiscountType": "Percentage",
            "DiscountValue": 50,
            "UsageLimit": 200,
            "CurrentUsage": 20,
            "IsUsed": true,
            "ExpiryDate": "2026-12-31",
            "Status": "Active",
        });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);

        assert_eq!(promo.id, 12);
        assert_eq!(promo.title, "Student Night");
        assert_eq!(promo.code.as_deref(), Some("STUDENT50"));
        assert!(promo.usage.is_used);
        assert_eq!(quote_at_reference(&promo)?.percent_off(), 50);

        Ok(())
    }

    #[test]
    fn missing_discount_fields_default_to_ten_percent() -> TestResult {
        let payload = json!({ "id": 3, "title": "Mystery Deal" });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);
        let quote = quote_at_reference(&promo)?;

        assert_eq!(quote.percent_off(), 10);
        assert_eq!(
            quote.discounted_price(),
            &Money::from_minor(90_000, iso::VND)
        );

        Ok(())
    }

    #[test]
    fn structured_pair_beats_free_text_hint() -> TestResult {
        let payload = json!({
            "discountType": "fixed",
            "discountValue": 20_000,
            "discount": "99%",
        });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);
        let quote = quote_at_reference(&promo)?;

        assert_eq!(
            quote.discounted_price(),
            &Money::from_minor(80_000, iso::VND)
        );
        assert_eq!(quote.percent_off(), 20);

        Ok(())
    }

    #[test]
    fn percent_hint_parses_as_percentage() -> TestResult {
        let payload = json!({ "discount": "25%" });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);

        assert_eq!(quote_at_reference(&promo)?.percent_off(), 25);

        Ok(())
    }

    #[test]
    fn currency_hint_parses_as_fixed_amount() -> TestResult {
        let payload = json!({ "discount": "50.000đ" });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);
        let quote = quote_at_reference(&promo)?;

        assert_eq!(
            quote.discounted_price(),
            &Money::from_minor(50_000, iso::VND)
        );

        Ok(())
    }

    #[test]
    fn unparsable_hint_falls_back_to_default() -> TestResult {
        let payload = json!({ "discount": "buy one get one" });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);

        assert_eq!(quote_at_reference(&promo)?.percent_off(), 10);

        Ok(())
    }

    #[test]
    fn negative_and_nan_numerics_fall_back_to_defaults() -> TestResult {
        let payload = json!({
            "discountType": "percentage",
            "discountValue": -25,
            "usageLimit": -10,
            "currentUsage": "not a number",
        });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);

        assert_eq!(promo.usage.limit, 0);
        assert_eq!(promo.usage.current, 0);
        assert_eq!(quote_at_reference(&promo)?.percent_off(), 10);

        Ok(())
    }

    #[test]
    fn missing_expiry_defaults_to_thirty_days_out() -> TestResult {
        let now = fixed_now()?;
        let payload = json!({ "id": 1 });

        let promo = normalize_at(&payload, iso::VND, now);

        assert_eq!(promo.valid_until, "2026-08-31T00:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn bare_date_reads_as_end_of_day_utc() -> TestResult {
        let payload = json!({ "validUntil": "2026-09-15" });

        let promo = normalize_at(&payload, iso::VND, fixed_now()?);

        assert_eq!(
            promo.valid_until,
            "2026-09-15T23:59:59Z".parse::<Timestamp>()?
        );

        Ok(())
    }

    #[test]
    fn non_object_payload_yields_all_defaults() -> TestResult {
        let promo = normalize_at(&json!("garbage"), iso::VND, fixed_now()?);

        assert_eq!(promo.id, 0);
        assert_eq!(promo.title, "");
        assert_eq!(promo.code, None);
        assert_eq!(promo.status, PromotionStatus::Active);
        assert!(promo.usage.is_unlimited());
        assert_eq!(quote_at_reference(&promo)?.percent_off(), 10);

        Ok(())
    }

    #[test]
    fn normalization_is_idempotent_over_the_canonical_form() -> TestResult {
        let payload = json!({
            "id": 9,
            "title": "Combo Tuesday",
            "description": "Fixed discount on combos",
            "code": "COMBO",
            "discountType": "fixed",
            "discountValue": 30_000,
            "minimumPurchase": 120_000,
            "usageLimit": 500,
            "currentUsage": 499,
            "isUsed": false,
            "validUntil": "2026-10-01T00:00:00Z",
            "status": "scheduled",
        });

        let now = fixed_now()?;
        let once = normalize_at(&payload, iso::VND, now);
        let twice = normalize_at(&once.canonical_payload(), iso::VND, now);

        assert_eq!(once.canonical_payload(), twice.canonical_payload());

        Ok(())
    }
}
