//! Common utility functions for payout calculations.
//!
//! Payouts are always whole currency units, and every intermediate amount is
//! truncated rather than rounded.

use rust_decimal::Decimal;

/// Drops the fractional part of a non-negative amount.
///
/// For the non-negative values the estimator works with this is the same as
/// rounding toward zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::calculations::common::floor_whole;
///
/// assert_eq!(floor_whole(dec!(610000.999)), dec!(610000));
/// assert_eq!(floor_whole(dec!(2550000)), dec!(2550000));
/// ```
pub fn floor_whole(value: Decimal) -> Decimal {
    value.floor().normalize()
}

/// Returns `value`, or `limit` when `value` exceeds it.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::calculations::common::cap;
///
/// assert_eq!(cap(dec!(3500000), dec!(3000000)), dec!(3000000));
/// assert_eq!(cap(dec!(1900000), dec!(3000000)), dec!(1900000));
/// ```
pub fn cap(
    value: Decimal,
    limit: Decimal,
) -> Decimal {
    if value > limit { limit } else { value }
}
