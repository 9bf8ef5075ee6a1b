//! Result summarisation and output rounding.
//!
//! Every strategy funnels its raw stakes through here: per-side outcomes
//! (return, profit, ROI) and the two-sided summary are derived from
//! unrounded values, and rounding is applied only when an output field is
//! written.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::odds::{implied_probability, market_efficiency};
use crate::types::{OptionAllocation, Summary};

/// Decimal places for monetary fields.
pub const MONEY_DP: u32 = 2;
/// Decimal places for probabilities, ROI and market efficiency.
pub const RATIO_DP: u32 = 4;

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round half away from zero to `dp` decimal places.
///
/// The rounding itself is done in `Decimal`. Values outside its range
/// (and NaN / infinities) are returned unchanged.
pub fn round_to(value: f64, dp: u32) -> f64 {
    round_with(value, dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to `dp` places with an explicit strategy, same passthrough rules
/// as [`round_to`].
pub fn round_with(value: f64, dp: u32, strategy: RoundingStrategy) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, strategy))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

pub fn round_money(value: f64) -> f64 {
    round_to(value, MONEY_DP)
}

pub fn round_ratio(value: f64) -> f64 {
    round_to(value, RATIO_DP)
}

/// Money truncated toward zero, so it never exceeds `value`.
pub fn truncate_money(value: f64) -> f64 {
    round_with(value, MONEY_DP, RoundingStrategy::ToZero)
}

/// Whole cents of an already rounded money amount.
pub fn cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

// ---------------------------------------------------------------------------
// Per-side outcome
// ---------------------------------------------------------------------------

/// Unrounded outcome of one side, before it becomes an [`OptionAllocation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub odds: f64,
    pub stake: f64,
    pub return_if_wins: f64,
    /// Return minus the whole bankroll, not just this side's stake.
    pub profit_if_wins: f64,
    pub roi: f64,
}

impl Leg {
    pub fn new(stake: f64, odds: f64, total_stake: f64) -> Self {
        let return_if_wins = stake * odds;
        let profit_if_wins = return_if_wins - total_stake;
        Self {
            odds,
            stake,
            return_if_wins,
            profit_if_wins,
            roi: profit_if_wins / total_stake,
        }
    }

    /// Round into the output shape.
    pub fn into_allocation(self, name: &str, probability: Option<f64>) -> OptionAllocation {
        OptionAllocation {
            name: name.to_string(),
            odds: self.odds,
            implied_probability: round_ratio(implied_probability(self.odds)),
            probability,
            stake: round_money(self.stake),
            return_if_wins: round_money(self.return_if_wins),
            profit_if_wins: round_money(self.profit_if_wins),
            roi: round_ratio(self.roi),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Mean of the two profits: both outcomes treated as equally likely.
pub fn naive_expected_value(a: &Leg, b: &Leg) -> f64 {
    (a.profit_if_wins + b.profit_if_wins) / 2.0
}

/// Summarise both sides. `expected_value` is unrounded; pass
/// [`naive_expected_value`] unless the strategy has its own.
pub fn summarize(a: &Leg, b: &Leg, total_stake: f64, expected_value: f64) -> Summary {
    let efficiency = market_efficiency(a.odds, b.odds);
    let min_profit = a.profit_if_wins.min(b.profit_if_wins);
    let max_profit = a.profit_if_wins.max(b.profit_if_wins);

    Summary {
        guaranteed_profit: efficiency < 1.0,
        min_profit: round_money(min_profit),
        max_profit: round_money(max_profit),
        expected_value: round_money(expected_value),
        min_roi: round_ratio(min_profit / total_stake),
        max_roi: round_ratio(max_profit / total_stake),
        market_efficiency: round_ratio(efficiency),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_close(round_to(2.5, 0), 3.0);
        assert_close(round_to(-2.5, 0), -3.0);
        // Exactly representable midpoint: banker's rounding would give 0.12.
        assert_close(round_money(0.125), 0.13);
        assert_close(round_money(-0.125), -0.13);
        assert_close(round_ratio(0.123_45), 0.1235);
    }

    #[test]
    fn test_round_goes_through_decimal() {
        let d = Decimal::from_f64(571.428_571_428_571_4)
            .unwrap()
            .round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(d, dec!(571.43));
        assert_close(round_money(571.428_571_428_571_4), 571.43);
    }

    #[test]
    fn test_truncate_money_never_rounds_up() {
        assert_close(truncate_money(265.625), 265.62);
        assert_close(truncate_money(734.375), 734.37);
        assert_close(truncate_money(0.009), 0.0);
        assert_close(truncate_money(12.5), 12.5);
        assert_eq!(cents(265.62), 26562);
        assert_eq!(cents(0.1 + 0.2), 30);
    }

    #[test]
    fn test_round_out_of_range_passthrough() {
        assert!(round_money(f64::NAN).is_nan());
        assert_eq!(round_money(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_money(1e30), 1e30);
    }

    #[test]
    fn test_leg_outcome() {
        let leg = Leg::new(400.0, 3.0, 1000.0);
        assert_close(leg.return_if_wins, 1200.0);
        assert_close(leg.profit_if_wins, 200.0);
        assert_close(leg.roi, 0.2);
    }

    #[test]
    fn test_leg_allocation_rounds() {
        let leg = Leg::new(1000.0 / 3.0, 2.5, 1000.0);
        let opt = leg.into_allocation("Home", Some(0.55));
        assert_eq!(opt.name, "Home");
        assert_close(opt.stake, 333.33);
        assert_close(opt.return_if_wins, 833.33);
        assert_close(opt.profit_if_wins, -166.67);
        assert_close(opt.roi, -0.1667);
        assert_close(opt.implied_probability, 0.4);
        assert_eq!(opt.probability, Some(0.55));
    }

    #[test]
    fn test_summarize() {
        let a = Leg::new(600.0, 2.5, 1000.0); // +500
        let b = Leg::new(400.0, 3.0, 1000.0); // +200
        let s = summarize(&a, &b, 1000.0, naive_expected_value(&a, &b));
        assert_close(s.min_profit, 200.0);
        assert_close(s.max_profit, 500.0);
        assert_close(s.min_roi, 0.2);
        assert_close(s.max_roi, 0.5);
        assert_close(s.expected_value, 350.0);
        assert_close(s.market_efficiency, 0.7333);
        assert!(s.guaranteed_profit);
    }

    #[test]
    fn test_guaranteed_profit_uses_odds_not_stakes() {
        // Stakes that lose either way, but the odds are still an arbitrage.
        let a = Leg::new(10.0, 2.5, 1000.0);
        let b = Leg::new(10.0, 3.0, 1000.0);
        let s = summarize(&a, &b, 1000.0, 0.0);
        assert!(s.guaranteed_profit);
        assert!(s.max_profit < 0.0);

        let a = Leg::new(500.0, 2.0, 1000.0);
        let b = Leg::new(500.0, 2.0, 1000.0);
        assert!(!summarize(&a, &b, 1000.0, 0.0).guaranteed_profit);
    }
}
