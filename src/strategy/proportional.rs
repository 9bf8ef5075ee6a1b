//! Proportional allocation: stakes weighted by implied probability.

use tracing::debug;

use super::summary::naive_expected_value;
use super::{assemble, Calculator, StakeSplit};
use crate::types::{CalculationError, CalculationInput, CalculationResult, Strategy};

/// `stake_i = total * (1/odds_i) / (1/odds_a + 1/odds_b)`.
///
/// Always allocates the full stake; the shorter price gets the larger share.
pub fn split(odds_a: f64, odds_b: f64, total_stake: f64) -> StakeSplit {
    let weight_a = 1.0 / odds_a;
    let weight_b = 1.0 / odds_b;
    let total_weight = weight_a + weight_b;

    StakeSplit {
        stake_a: total_stake * weight_a / total_weight,
        stake_b: total_stake * weight_b / total_weight,
    }
}

pub struct ProportionalCalculator;

impl Calculator for ProportionalCalculator {
    fn strategy(&self) -> Strategy {
        Strategy::Proportional
    }

    fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
        let stakes = split(input.odds_a, input.odds_b, input.total_stake);

        debug!(
            stake_a = format!("{:.4}", stakes.stake_a),
            stake_b = format!("{:.4}", stakes.stake_b),
            "Proportional split"
        );

        Ok(assemble(input, Strategy::Proportional, stakes, None, naive_expected_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_weights() {
        let s = split(2.0, 4.0, 900.0);
        // weights 0.5 and 0.25
        assert!((s.stake_a - 600.0).abs() < 1e-9);
        assert!((s.stake_b - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_allocation() {
        let input = CalculationInput::new(Strategy::Proportional, 2.56, 3.85, 10_000.0);
        let r = ProportionalCalculator.calculate(&input).unwrap();
        assert_eq!(r.method, Strategy::Proportional);
        assert!((r.option_a.stake + r.option_b.stake - 10_000.0).abs() <= 0.01);
        assert!(r.option_a.stake > r.option_b.stake);
        assert!(r.option_a.stake > 0.0 && r.option_b.stake > 0.0);
    }

    #[test]
    fn test_equal_odds_split_evenly() {
        let input = CalculationInput::new(Strategy::Proportional, 1.9, 1.9, 1000.0);
        let r = ProportionalCalculator.calculate(&input).unwrap();
        assert_eq!(r.option_a.stake, 500.0);
        assert_eq!(r.option_b.stake, 500.0);
        assert!(!r.summary.guaranteed_profit);
    }

    #[test]
    fn test_equal_payout_on_both_sides() {
        // Weighting by 1/odds makes stake * odds the same on both sides.
        let input = CalculationInput::new(Strategy::Proportional, 2.5, 3.0, 1000.0);
        let r = ProportionalCalculator.calculate(&input).unwrap();
        assert!((r.option_a.return_if_wins - r.option_b.return_if_wins).abs() <= 0.01);
    }
}
