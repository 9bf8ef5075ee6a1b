//! Arbitrage allocation.
//!
//! Splits the stake so the payout is identical whichever side wins:
//! `stake_a * odds_a == stake_b * odds_b` with `stake_a + stake_b == total`.

use tracing::debug;

use super::summary::naive_expected_value;
use super::{assemble, Calculator, StakeSplit};
use crate::types::{CalculationError, CalculationInput, CalculationResult, Strategy};

/// Equal-payout stake split.
///
/// ```text
/// denom   = odds_a + odds_b - 2
/// stake_a = total * (odds_b - 1) / denom
/// stake_b = total * (odds_a - 1) / denom
/// ```
///
/// `denom <= 0` only happens when both odds sit at the 1.0 floor, which
/// validation already rejects.
pub fn split(odds_a: f64, odds_b: f64, total_stake: f64) -> Result<StakeSplit, CalculationError> {
    let denom = odds_a + odds_b - 2.0;
    if !(denom > 0.0) || !denom.is_finite() {
        return Err(CalculationError::DegenerateOdds { odds_a, odds_b });
    }

    Ok(StakeSplit {
        stake_a: total_stake * (odds_b - 1.0) / denom,
        stake_b: total_stake * (odds_a - 1.0) / denom,
    })
}

pub struct ArbitrageCalculator;

impl Calculator for ArbitrageCalculator {
    fn strategy(&self) -> Strategy {
        Strategy::Arbitrage
    }

    fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
        let stakes = split(input.odds_a, input.odds_b, input.total_stake)?;

        debug!(
            odds_a = input.odds_a,
            odds_b = input.odds_b,
            stake_a = format!("{:.4}", stakes.stake_a),
            stake_b = format!("{:.4}", stakes.stake_b),
            "Arbitrage split"
        );

        Ok(assemble(input, Strategy::Arbitrage, stakes, None, naive_expected_value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input(odds_a: f64, odds_b: f64, total: f64) -> CalculationInput {
        CalculationInput::new(Strategy::Arbitrage, odds_a, odds_b, total).with_currency("$")
    }

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_split_equalises_payout() {
        let s = split(2.5, 3.0, 1000.0).unwrap();
        assert!(approx(s.stake_a * 2.5, s.stake_b * 3.0, 1e-9));
        assert!(approx(s.stake_a + s.stake_b, 1000.0, 1e-9));
    }

    #[test]
    fn test_split_degenerate() {
        assert_eq!(
            split(1.0, 1.0, 100.0),
            Err(CalculationError::DegenerateOdds { odds_a: 1.0, odds_b: 1.0 })
        );
        assert!(split(0.5, 1.0, 100.0).is_err());
        assert!(split(f64::NAN, 2.0, 100.0).is_err());
    }

    #[test]
    fn test_different_odds() {
        let r = ArbitrageCalculator.calculate(&input(2.5, 3.0, 1000.0)).unwrap();
        assert_eq!(r.method, Strategy::Arbitrage);
        assert!(approx(r.option_a.stake, 571.43, 1e-9));
        assert!(approx(r.option_b.stake, 428.57, 1e-9));
        assert!(approx(r.option_a.profit_if_wins, 428.57, 1e-9));
        assert!(approx(r.option_b.profit_if_wins, 285.71, 1e-9));
        assert!(approx(r.summary.min_profit, 285.71, 1e-9));
        assert!(approx(r.summary.max_profit, 428.57, 1e-9));
        assert!(r.summary.guaranteed_profit);
        assert_eq!(r.currency, "$");
        assert_eq!(r.total_stake, 1000.0);
    }

    #[test]
    fn test_percentage_converted_odds() {
        // 39% vs 26%
        let r = ArbitrageCalculator
            .calculate(&input(100.0 / 39.0, 100.0 / 26.0, 10_000.0))
            .unwrap();
        assert!(approx(r.option_a.stake, 6453.49, 1.0));
        assert!(approx(r.option_b.stake, 3546.51, 1.0));
        assert!(approx(r.option_a.profit_if_wins, 6545.65, 10.0));
        assert!(approx(r.option_b.profit_if_wins, 3640.42, 10.0));
        assert!(r.summary.guaranteed_profit);
    }

    #[test]
    fn test_equal_odds_no_profit() {
        let r = ArbitrageCalculator.calculate(&input(2.0, 2.0, 1000.0)).unwrap();
        assert!(approx(r.option_a.stake, 500.0, 1e-9));
        assert!(approx(r.option_b.stake, 500.0, 1e-9));
        assert!(approx(r.option_a.profit_if_wins, 0.0, 1e-9));
        assert!(!r.summary.guaranteed_profit);
        assert!(approx(r.summary.market_efficiency, 1.0, 1e-9));
    }

    #[test]
    fn test_high_odds() {
        let r = ArbitrageCalculator.calculate(&input(5.0, 10.0, 5000.0)).unwrap();
        assert!(approx(r.option_a.stake, 3461.54, 1e-9));
        assert!(approx(r.option_b.stake, 1538.46, 1e-9));
        assert!(approx(r.option_a.profit_if_wins, 12_307.69, 1e-9));
        assert!(approx(r.option_b.profit_if_wins, 10_384.62, 1e-9));
    }

    #[test]
    fn test_overround_still_computes() {
        let r = ArbitrageCalculator.calculate(&input(1.9, 1.9, 1000.0)).unwrap();
        assert!(!r.summary.guaranteed_profit);
        assert!(r.summary.max_profit < 0.0);
        assert!(r.summary.min_profit <= r.summary.max_profit);
    }

    #[test]
    fn test_expected_value_is_mean_profit() {
        let r = ArbitrageCalculator.calculate(&input(2.5, 3.0, 1000.0)).unwrap();
        // (428.5714 + 285.7143) / 2
        assert!(approx(r.summary.expected_value, 357.14, 1e-9));
    }
}
