//! Allocation engine: arbitrage, Kelly and proportional stake splits.
//!
//! Each strategy derives a raw [`StakeSplit`]; everything after that
//! (returns, profits, ROI, summary, rounding) is shared and lives in
//! [`summary`].

pub mod arbitrage;
pub mod kelly;
pub mod proportional;
pub mod summary;

use tracing::{debug, warn};

use crate::types::{
    CalculationError, CalculationInput, CalculationResult, Method, Side, Strategy,
};
use crate::validation::validate_probability;
use arbitrage::ArbitrageCalculator;
use kelly::KellyCalculator;
use proportional::ProportionalCalculator;
use summary::{summarize, Leg};

// ---------------------------------------------------------------------------
// Calculator seam
// ---------------------------------------------------------------------------

/// Unrounded stakes for both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakeSplit {
    pub stake_a: f64,
    pub stake_b: f64,
}

/// One allocation strategy.
pub trait Calculator: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalculationError>;
}

/// The calculator implementing `strategy`.
pub fn calculator_for(strategy: Strategy) -> &'static dyn Calculator {
    match strategy {
        Strategy::Arbitrage => &ArbitrageCalculator,
        Strategy::Kelly => &KellyCalculator,
        Strategy::Proportional => &ProportionalCalculator,
    }
}

/// Run the strategy selected on `input`.
///
/// An unrecognized method runs arbitrage. Call [`crate::validation::validate`]
/// first if unknown methods should be rejected instead.
pub fn calculate(input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
    if let Method::Unrecognized(raw) = &input.method {
        warn!(method = %raw, "Unknown calculation method, defaulting to arbitrage");
    }
    calculator_for(input.method.resolve()).calculate(input)
}

/// Turn a raw split into the output tree.
///
/// `expected_value` receives the unrounded legs.
pub(crate) fn assemble(
    input: &CalculationInput,
    strategy: Strategy,
    stakes: StakeSplit,
    probabilities: Option<(f64, f64)>,
    expected_value: impl FnOnce(&Leg, &Leg) -> f64,
) -> CalculationResult {
    let total = input.total_stake;
    let leg_a = Leg::new(stakes.stake_a, input.odds_a, total);
    let leg_b = Leg::new(stakes.stake_b, input.odds_b, total);
    let summary = summarize(&leg_a, &leg_b, total, expected_value(&leg_a, &leg_b));

    let (prob_a, prob_b) = match probabilities {
        Some((a, b)) => (Some(a), Some(b)),
        None => (None, None),
    };

    CalculationResult {
        method: strategy,
        total_stake: total,
        currency: input.currency.clone(),
        option_a: leg_a.into_allocation(&input.name_a, prob_a),
        option_b: leg_b.into_allocation(&input.name_b, prob_b),
        summary,
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// What happened to one strategy in a side-by-side comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    Computed(CalculationResult),
    /// Not attempted (e.g. Kelly without usable probabilities).
    Skipped(String),
    Failed(CalculationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub strategy: Strategy,
    pub outcome: ComparisonOutcome,
}

/// Run every strategy on the same odds and stake.
///
/// Never fails as a whole: each strategy's failure is recorded in its own
/// entry.
pub fn compare(input: &CalculationInput) -> Vec<Comparison> {
    Strategy::ALL
        .iter()
        .map(|&strategy| {
            let outcome = match skip_reason(strategy, input) {
                Some(reason) => ComparisonOutcome::Skipped(reason),
                None => match calculator_for(strategy).calculate(&input.with_method(strategy)) {
                    Ok(result) => ComparisonOutcome::Computed(result),
                    Err(e) => ComparisonOutcome::Failed(e),
                },
            };
            debug!(%strategy, outcome = outcome_label(&outcome), "Comparison entry");
            Comparison { strategy, outcome }
        })
        .collect()
}

/// Kelly only runs on two probabilities strictly inside (0, 1).
fn skip_reason(strategy: Strategy, input: &CalculationInput) -> Option<String> {
    if strategy != Strategy::Kelly {
        return None;
    }
    let Some((prob_a, prob_b)) = input.probabilities() else {
        return Some("requires probabilities".to_string());
    };
    validate_probability(Side::A, prob_a)
        .and(validate_probability(Side::B, prob_b))
        .err()
        .map(|issue| issue.to_string())
}

fn outcome_label(outcome: &ComparisonOutcome) -> &'static str {
    match outcome {
        ComparisonOutcome::Computed(_) => "computed",
        ComparisonOutcome::Skipped(_) => "skipped",
        ComparisonOutcome::Failed(_) => "failed",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
