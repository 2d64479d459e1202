//! Decimal helpers for monetary reporting
//!
//! Amounts are carried at full precision through the calculation and only
//! rounded when they leave the engine (result totals, API responses).

use rust_decimal::{Decimal, RoundingStrategy};

/// Scale of reported money values (2 decimal places).
pub const MONETARY_SCALE: u32 = 2;

/// Round a monetary amount half-up (away from zero on .5) to 2 decimal places.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONETARY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount the way reports and API payloads show it ("32.50").
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(MONETARY_SCALE);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
    }

    #[test]
    fn rounds_negative_half_away_from_zero() {
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn formats_with_two_places() {
        assert_eq!(format_money(dec!(32.5)), "32.50");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
        assert_eq!(format_money(dec!(7.0049)), "7.00");
    }
}
