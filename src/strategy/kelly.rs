//! Kelly criterion allocation.
//!
//! Sizes each side from the bettor's own probability estimates, clamps
//! negative fractions to zero, and scales both stakes down when together
//! they would exceed the bankroll.

use tracing::debug;

use super::summary::{cents, round_money, truncate_money, Leg};
use super::{assemble, Calculator, StakeSplit};
use crate::types::{CalculationError, CalculationInput, CalculationResult, Strategy};

/// Full-Kelly fraction of the bankroll for one side, never negative.
///
/// Kelly formula: f* = (p * odds - 1) / (odds - 1)
/// where:
///   p    = estimated win probability
///   odds = decimal odds (stake included)
///
/// Odds at or below 1.0 pay nothing, so the fraction is zero.
pub fn kelly_fraction(probability: f64, odds: f64) -> f64 {
    if odds <= 1.0 {
        return 0.0;
    }
    ((probability * odds - 1.0) / (odds - 1.0)).max(0.0)
}

/// Kelly stakes for both sides, capped at `total_stake` combined.
///
/// The cap holds for the stakes as reported, i.e. after rounding to cents.
pub fn split(prob_a: f64, prob_b: f64, odds_a: f64, odds_b: f64, total_stake: f64) -> StakeSplit {
    let raw_a = total_stake * kelly_fraction(prob_a, odds_a);
    let raw_b = total_stake * kelly_fraction(prob_b, odds_b);
    let raw_total = raw_a + raw_b;

    let stakes = if raw_total > total_stake {
        let scale = total_stake / raw_total;
        debug!(
            raw_total = format!("{:.2}", raw_total),
            scale = format!("{:.4}", scale),
            "Kelly stakes exceed bankroll, scaling down"
        );
        StakeSplit {
            stake_a: raw_a * scale,
            stake_b: raw_b * scale,
        }
    } else {
        StakeSplit {
            stake_a: raw_a,
            stake_b: raw_b,
        }
    };

    fit_rounded(stakes, total_stake)
}

/// Rounding each side half away from zero can push the pair one cent over
/// the bankroll. In that case both sides are truncated to cents instead.
fn fit_rounded(stakes: StakeSplit, total_stake: f64) -> StakeSplit {
    let rounded = cents(round_money(stakes.stake_a)) + cents(round_money(stakes.stake_b));
    let cap = cents(truncate_money(total_stake));
    if rounded <= cap {
        return stakes;
    }

    debug!(rounded_cents = rounded, cap_cents = cap, "Rounded Kelly stakes over bankroll, truncating");
    StakeSplit {
        stake_a: truncate_money(stakes.stake_a),
        stake_b: truncate_money(stakes.stake_b),
    }
}

/// Probability-weighted profit. Any mass left over when the two estimates
/// sum below 1 is "neither wins" and loses the whole bankroll.
pub fn expected_value(prob_a: f64, prob_b: f64, a: &Leg, b: &Leg, total_stake: f64) -> f64 {
    let mut ev = prob_a * a.profit_if_wins + prob_b * b.profit_if_wins;
    let residual = 1.0 - prob_a - prob_b;
    if residual > 0.0 {
        ev += residual * -total_stake;
    }
    ev
}

pub struct KellyCalculator;

impl Calculator for KellyCalculator {
    fn strategy(&self) -> Strategy {
        Strategy::Kelly
    }

    fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
        let (prob_a, prob_b) = input
            .probabilities()
            .ok_or(CalculationError::MissingProbabilities)?;

        let stakes = split(prob_a, prob_b, input.odds_a, input.odds_b, input.total_stake);

        debug!(
            prob_a,
            prob_b,
            kelly_a = format!("{:.2}%", kelly_fraction(prob_a, input.odds_a) * 100.0),
            kelly_b = format!("{:.2}%", kelly_fraction(prob_b, input.odds_b) * 100.0),
            stake_a = format!("{:.4}", stakes.stake_a),
            stake_b = format!("{:.4}", stakes.stake_b),
            "Kelly split"
        );

        let total = input.total_stake;
        Ok(assemble(
            input,
            Strategy::Kelly,
            stakes,
            Some((prob_a, prob_b)),
            |a, b| expected_value(prob_a, prob_b, a, b, total),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
