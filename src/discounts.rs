//! Discounts
//!
//! Quote calculation for the two discount kinds a promotion can carry: a
//! percentage off the reference price, or a fixed amount off. Quotes are
//! always clamped — a fixed discount larger than the reference price yields a
//! zero price, never a negative one, and the displayed percent-off figure
//! stays within `[0, 100]`.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::money::to_minor_units;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// The discount amount and the reference price use different currencies.
    #[error("discount amount currency does not match the reference price")]
    CurrencyMismatch,
}

/// A promotion's discount, either percentage-based or a fixed amount off.
#[derive(Debug, Copy, Clone)]
pub enum Discount<'a> {
    /// Apply a percentage discount (e.g., "25% off").
    PercentageOff(Percentage),

    /// Subtract a fixed amount from the reference price (e.g., "50,000₫ off").
    AmountOff(Money<'a, Currency>),
}

/// The result of quoting a discount against a reference price.
///
/// Invariants: `discounted_price` lies in `[0, reference_price]` and
/// `percent_off` in `[0, 100]`, regardless of the discount's raw value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiscountQuote<'a> {
    discounted_price: Money<'a, Currency>,
    percent_off: u8,
}

impl<'a> DiscountQuote<'a> {
    /// Return the price after the discount is applied.
    pub fn discounted_price(&self) -> &Money<'a, Currency> {
        &self.discounted_price
    }

    /// Return the discount as a whole percentage of the reference price.
    ///
    /// For percentage discounts this is the discount value itself; for fixed
    /// discounts it is the rounded share of the reference price, so badges
    /// render consistently for both kinds.
    pub fn percent_off(&self) -> u8 {
        self.percent_off
    }
}

/// Quote a discount against a reference price.
///
/// Out-of-range values clamp rather than fail: a fixed amount exceeding the
/// reference price quotes a zero price at 100% off.
///
/// # Errors
///
/// - [`DiscountError::PercentConversion`]: the arithmetic cannot be safely
///   represented in minor units.
/// - [`DiscountError::CurrencyMismatch`]: a fixed discount amount is
///   denominated in a different currency than the reference price.
pub fn quote<'a>(
    discount: &Discount<'a>,
    reference_price: &Money<'a, Currency>,
) -> Result<DiscountQuote<'a>, DiscountError> {
    let currency = reference_price.currency();

    let reference_minor = to_minor_units(reference_price)
        .ok_or(DiscountError::PercentConversion)?
        .max(0);

    match discount {
        Discount::PercentageOff(percent) => {
            let off = percent_of_minor(percent, reference_minor)?.clamp(0, reference_minor);

            Ok(DiscountQuote {
                discounted_price: Money::from_minor(reference_minor - off, currency),
                percent_off: percent_display(percent)?,
            })
        }
        Discount::AmountOff(amount) => {
            if amount.currency() != currency {
                return Err(DiscountError::CurrencyMismatch);
            }

            let amount_minor = to_minor_units(amount)
                .ok_or(DiscountError::PercentConversion)?
                .max(0);

            let off = amount_minor.min(reference_minor);

            let percent_off = if reference_minor > 0 {
                ratio_percent(amount_minor, reference_minor)?
            } else {
                0
            };

            Ok(DiscountQuote {
                discounted_price: Money::from_minor(reference_minor - off, currency),
                percent_off,
            })
        }
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows
/// or cannot be safely represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Render a percentage as a whole number in `[0, 100]` for badge display.
fn percent_display(percent: &Percentage) -> Result<u8, DiscountError> {
    let scaled = ((*percent) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)?;

    Ok(u8::try_from(scaled.clamp(0, 100)).unwrap_or(100))
}

/// The rounded percentage share of `amount_minor` within `reference_minor`,
/// clamped to `[0, 100]`.
fn ratio_percent(amount_minor: i64, reference_minor: i64) -> Result<u8, DiscountError> {
    let amount = Decimal::from_i64(amount_minor).ok_or(DiscountError::PercentConversion)?;
    let reference = Decimal::from_i64(reference_minor).ok_or(DiscountError::PercentConversion)?;

    let scaled = amount
        .checked_div(reference)
        .ok_or(DiscountError::PercentConversion)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)?;

    Ok(u8::try_from(scaled.clamp(0, 100)).unwrap_or(100))
}
