//! Money helpers
//!
//! Minor-unit conversions shared by the discount calculator and the payload
//! boundary. Storefront prices are whole-unit VND (exponent 0), but nothing
//! here assumes a particular currency.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{FormattableCurrency, Money, iso::Currency};

/// Convert a money value to its amount in minor units.
///
/// Returns `None` if the scaled amount cannot be represented as an `i64`.
pub fn to_minor_units(money: &Money<'_, Currency>) -> Option<i64> {
    let scale = Decimal::from(10_i64.checked_pow(money.currency().exponent())?);

    money
        .amount()
        .checked_mul(scale)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
