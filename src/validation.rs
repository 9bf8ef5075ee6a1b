//! Input validation.
//!
//! Runs every check against a [`CalculationInput`] and reports all defects
//! together instead of stopping at the first one.

use serde::Deserialize;
use tracing::warn;

use crate::odds::market_efficiency;
use crate::types::{
    present, CalculationInput, Method, Side, Strategy, ValidationError, ValidationIssue,
};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Odds of exactly 1.0 return nothing; this is the practical floor.
pub const MIN_ODDS: f64 = 1.01;

/// Validation policy (defaults, overridden by config.toml at runtime).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Minimum accepted decimal odds per side.
    pub min_odds: f64,
    /// Treat warning-class issues (no arbitrage, overconfident
    /// probabilities) as blocking. When false they are only logged.
    pub block_on_warnings: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_odds: MIN_ODDS,
            block_on_warnings: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Issue collector
// ---------------------------------------------------------------------------

/// Accumulates issues from straight-line checks, then folds them into a
/// single composite error.
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Record the error of a check, if any.
    pub fn check(&mut self, result: Result<(), ValidationIssue>) {
        if let Err(issue) = result {
            self.push(issue);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// `Ok` when nothing blocking was collected. Non-blocking warnings are
    /// logged and dropped.
    pub fn finish(self, block_on_warnings: bool) -> Result<(), ValidationError> {
        let (blocking, advisory): (Vec<_>, Vec<_>) = self
            .issues
            .into_iter()
            .partition(|issue| block_on_warnings || !issue.is_warning());

        for issue in &advisory {
            warn!(issue = %issue, "Validation warning (not blocking)");
        }

        if blocking.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues: blocking })
        }
    }
}

// ---------------------------------------------------------------------------
// Single-value checks
// ---------------------------------------------------------------------------

pub fn validate_odds(side: Side, odds: f64, floor: f64) -> Result<(), ValidationIssue> {
    // `!(>=)` so NaN fails too.
    if !(odds >= floor) {
        return Err(ValidationIssue::OddsBelowFloor { side, odds, floor });
    }
    Ok(())
}

pub fn validate_probability(side: Side, probability: f64) -> Result<(), ValidationIssue> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(ValidationIssue::ProbabilityOutOfRange { side, probability });
    }
    Ok(())
}

pub fn validate_total_stake(total: f64) -> Result<(), ValidationIssue> {
    if !(total > 0.0) {
        return Err(ValidationIssue::NonPositiveStake(total));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Full input validation
// ---------------------------------------------------------------------------

/// Validate with the default (blocking) policy.
pub fn validate(input: &CalculationInput) -> Result<(), ValidationError> {
    validate_with(input, &ValidationPolicy::default())
}

/// Validate an input, collecting every issue.
pub fn validate_with(input: &CalculationInput, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    let mut issues = collect_issues(input, policy);

    if input.method == Method::Known(Strategy::Arbitrage) && input.odds_a > 0.0 && input.odds_b > 0.0 {
        let efficiency = market_efficiency(input.odds_a, input.odds_b);
        if efficiency >= 1.0 {
            issues.push(ValidationIssue::NoArbitrage {
                market_efficiency: efficiency,
            });
        }
    }

    issues.finish(policy.block_on_warnings)
}

/// Validate an input that will be run through every strategy.
///
/// Same checks as [`validate_with`] for the selected method, minus the
/// arbitrage-only "no guaranteed profit" warning.
pub fn validate_comparison(input: &CalculationInput, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    collect_issues(input, policy).finish(policy.block_on_warnings)
}

fn collect_issues(input: &CalculationInput, policy: &ValidationPolicy) -> IssueCollector {
    let mut issues = IssueCollector::new();

    issues.check(validate_odds(Side::A, input.odds_a, policy.min_odds));
    issues.check(validate_odds(Side::B, input.odds_b, policy.min_odds));
    issues.check(validate_total_stake(input.total_stake));

    match &input.method {
        Method::Known(Strategy::Kelly) => check_kelly_probabilities(input, &mut issues),
        Method::Known(Strategy::Arbitrage) | Method::Known(Strategy::Proportional) => {}
        Method::Unrecognized(raw) => issues.push(ValidationIssue::UnknownStrategy(raw.clone())),
    }

    issues
}

fn check_kelly_probabilities(input: &CalculationInput, issues: &mut IssueCollector) {
    let prob_a = present(input.prob_a);
    let prob_b = present(input.prob_b);

    if prob_a.is_none() || prob_b.is_none() {
        issues.push(ValidationIssue::MissingProbabilities);
    }
    if let Some(p) = prob_a {
        issues.check(validate_probability(Side::A, p));
    }
    if let Some(p) = prob_b {
        issues.check(validate_probability(Side::B, p));
    }
    if let (Some(a), Some(b)) = (prob_a, prob_b) {
        if a > 0.0 && b > 0.0 && a + b > 1.0 {
            issues.push(ValidationIssue::OverconfidentProbabilities { sum: a + b });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
