//! Shared types for the KELLY calculator.
//!
//! These types form the data model used across all modules: the
//! calculation request, the per-side allocations, the summary, and the
//! error enums. Everything here is a plain value type.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side of the two-way market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "Option A"),
            Side::B => write!(f, "Option B"),
        }
    }
}

/// A concrete allocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Equal payout whichever option wins.
    Arbitrage,
    /// Growth-optimal sizing from subjective probabilities.
    Kelly,
    /// Stakes weighted by implied probability.
    Proportional,
}

impl Strategy {
    /// All strategies, in the order they are compared.
    pub const ALL: [Strategy; 3] = [Strategy::Arbitrage, Strategy::Kelly, Strategy::Proportional];

    /// Wire identifier (`"arbitrage"` | `"kelly"` | `"proportional"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Arbitrage => "arbitrage",
            Strategy::Kelly => "kelly",
            Strategy::Proportional => "proportional",
        }
    }

    /// Human-readable heading.
    pub fn title(&self) -> &'static str {
        match self {
            Strategy::Arbitrage => "ARBITRAGE (Guaranteed Profit)",
            Strategy::Kelly => "KELLY CRITERION (Growth Optimization)",
            Strategy::Proportional => "PROPORTIONAL (Inverse Odds)",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a strategy identifier (case-insensitive).
impl std::str::FromStr for Strategy {
    type Err = ValidationIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arbitrage" => Ok(Strategy::Arbitrage),
            "kelly" => Ok(Strategy::Kelly),
            "proportional" => Ok(Strategy::Proportional),
            _ => Err(ValidationIssue::UnknownStrategy(s.to_string())),
        }
    }
}

/// Strategy selector carried on a request.
///
/// Unlike [`Strategy`], this can hold an identifier that names no strategy,
/// so the validator can report it while the engine still resolves it to
/// the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Known(Strategy),
    Unrecognized(String),
}

impl Method {
    /// The strategy to run. Unrecognized identifiers fall back to arbitrage.
    pub fn resolve(&self) -> Strategy {
        match self {
            Method::Known(s) => *s,
            Method::Unrecognized(_) => Strategy::Arbitrage,
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Known(Strategy::Arbitrage)
    }
}

impl From<Strategy> for Method {
    fn from(s: Strategy) -> Self {
        Method::Known(s)
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s.parse::<Strategy>() {
            Ok(strategy) => Method::Known(strategy),
            Err(_) => Method::Unrecognized(s.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Known(s) => write!(f, "{s}"),
            Method::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// Textual odds notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    /// `2.5`
    Decimal,
    /// `39%`
    Percentage,
    /// `3/2`
    Fractional,
    /// `+250`, `-150`
    American,
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsFormat::Decimal => write!(f, "decimal"),
            OddsFormat::Percentage => write!(f, "percentage"),
            OddsFormat::Fractional => write!(f, "fractional"),
            OddsFormat::American => write!(f, "american"),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculation input
// ---------------------------------------------------------------------------

pub const DEFAULT_NAME_A: &str = "Option A";
pub const DEFAULT_NAME_B: &str = "Option B";
pub const DEFAULT_CURRENCY: &str = "₦";

/// One allocation request. Built once, never mutated after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    pub method: Method,
    /// Decimal odds for option A.
    pub odds_a: f64,
    /// Decimal odds for option B.
    pub odds_b: f64,
    /// Subjective win probability for A (Kelly only). `Some(0.0)` counts as absent.
    pub prob_a: Option<f64>,
    /// Subjective win probability for B (Kelly only). `Some(0.0)` counts as absent.
    pub prob_b: Option<f64>,
    pub total_stake: f64,
    pub name_a: String,
    pub name_b: String,
    pub currency: String,
}

impl CalculationInput {
    pub fn new(method: impl Into<Method>, odds_a: f64, odds_b: f64, total_stake: f64) -> Self {
        Self {
            method: method.into(),
            odds_a,
            odds_b,
            prob_a: None,
            prob_b: None,
            total_stake,
            name_a: DEFAULT_NAME_A.to_string(),
            name_b: DEFAULT_NAME_B.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_probabilities(mut self, prob_a: Option<f64>, prob_b: Option<f64>) -> Self {
        self.prob_a = prob_a;
        self.prob_b = prob_b;
        self
    }

    pub fn with_names(mut self, name_a: impl Into<String>, name_b: impl Into<String>) -> Self {
        self.name_a = name_a.into();
        self.name_b = name_b.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Same request, different strategy.
    pub fn with_method(&self, method: impl Into<Method>) -> Self {
        Self {
            method: method.into(),
            ..self.clone()
        }
    }

    /// Both probabilities, if both are present and non-zero.
    pub fn probabilities(&self) -> Option<(f64, f64)> {
        match (present(self.prob_a), present(self.prob_b)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// A probability of exactly zero means "not supplied".
pub(crate) fn present(prob: Option<f64>) -> Option<f64> {
    prob.filter(|p| *p != 0.0)
}

// ---------------------------------------------------------------------------
// Calculation output
// ---------------------------------------------------------------------------

/// Allocation and outcome for one side of the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionAllocation {
    pub name: String,
    pub odds: f64,
    pub implied_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    pub stake: f64,
    pub return_if_wins: f64,
    /// Return minus the whole bankroll.
    pub profit_if_wins: f64,
    pub roi: f64,
}

/// Aggregate statistics over both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub guaranteed_profit: bool,
    pub min_profit: f64,
    pub max_profit: f64,
    pub expected_value: f64,
    pub min_roi: f64,
    pub max_roi: f64,
    /// Sum of implied probabilities; < 1.0 means an arbitrage exists.
    pub market_efficiency: f64,
}

/// The full output of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub method: Strategy,
    pub total_stake: f64,
    pub currency: String,
    pub option_a: OptionAllocation,
    pub option_b: OptionAllocation,
    pub summary: Summary,
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.currency;
        writeln!(f, "{} allocation of {c}{:.2}", self.method.title(), self.total_stake)?;
        for opt in [&self.option_a, &self.option_b] {
            writeln!(
                f,
                "  {:<20} odds {:>7.2} | stake {c}{:.2} | returns {c}{:.2} | profit {c}{:.2} ({:+.2}%)",
                opt.name,
                opt.odds,
                opt.stake,
                opt.return_if_wins,
                opt.profit_if_wins,
                opt.roi * 100.0,
            )?;
        }
        let s = &self.summary;
        write!(
            f,
            "  profit {c}{:.2} to {c}{:.2} | EV {c}{:.2} | efficiency {:.2}% | {}",
            s.min_profit,
            s.max_profit,
            s.expected_value,
            s.market_efficiency * 100.0,
            if s.guaranteed_profit { "guaranteed profit" } else { "no guaranteed profit" },
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Malformed odds text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("odds cannot be empty")]
    Empty,

    #[error("invalid {format} odds '{input}'")]
    InvalidNumber { format: OddsFormat, input: String },

    #[error("odds must be a finite number, got: {0}")]
    NotFinite(String),

    #[error("decimal odds must be >= 1.0, got: {0}")]
    DecimalBelowOne(String),

    #[error("percentage must be in (0, 100], got: {0}")]
    PercentageOutOfRange(String),

    #[error("invalid fractional odds '{0}'")]
    MalformedFraction(String),

    #[error("denominator cannot be zero in '{0}'")]
    ZeroDenominator(String),

    #[error("fractional odds must be positive, got: {0}")]
    NegativeFraction(String),

    #[error("American odds cannot be zero, got: {0}")]
    ZeroAmerican(String),
}

/// Whether an issue is a hard error or an advisory that blocks by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation defect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("{side}: odds must be >= {floor:.2}, got: {odds:.2}")]
    OddsBelowFloor { side: Side, odds: f64, floor: f64 },

    #[error("total stake must be positive, got: {0:.2}")]
    NonPositiveStake(f64),

    #[error("Kelly method requires probability estimates for both options (use --prob-a and --prob-b)")]
    MissingProbabilities,

    #[error("{side} probability: probability must be between 0 and 1 (exclusive), got: {probability:.4}")]
    ProbabilityOutOfRange { side: Side, probability: f64 },

    #[error("warning: probabilities sum to {sum:.4} (> 1.0)")]
    OverconfidentProbabilities { sum: f64 },

    #[error("warning: combined implied probability ({:.2}%) >= 100% - no guaranteed profit", .market_efficiency * 100.0)]
    NoArbitrage { market_efficiency: f64 },

    #[error("invalid calculation method: {0}")]
    UnknownStrategy(String),
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::OverconfidentProbabilities { .. } | ValidationIssue::NoArbitrage { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

/// Every defect found in one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => Ok(()),
            [only] => write!(f, "{only}"),
            many => {
                writeln!(f, "multiple validation errors:")?;
                for (i, issue) in many.iter().enumerate() {
                    writeln!(f, "  {}. {issue}", i + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A calculation that cannot produce a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("kelly method requires probability estimates for both options")]
    MissingProbabilities,

    #[error("degenerate odds {odds_a} / {odds_b}: no stake split equalises the payout")]
    DegenerateOdds { odds_a: f64, odds_b: f64 },
}

/// Any error the core can return.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KellyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("arbitrage".parse::<Strategy>().unwrap(), Strategy::Arbitrage);
        assert_eq!("KELLY".parse::<Strategy>().unwrap(), Strategy::Kelly);
        assert_eq!(" proportional ".parse::<Strategy>().unwrap(), Strategy::Proportional);
        assert!("martingale".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_serialization() {
        assert_eq!(serde_json::to_string(&Strategy::Kelly).unwrap(), "\"kelly\"");
        let s: Strategy = serde_json::from_str("\"proportional\"").unwrap();
        assert_eq!(s, Strategy::Proportional);
    }

    #[test]
    fn test_method_resolves_unknown_to_arbitrage() {
        let method = Method::from("martingale");
        assert_eq!(method, Method::Unrecognized("martingale".into()));
        assert_eq!(method.resolve(), Strategy::Arbitrage);
        assert_eq!(Method::from("kelly").resolve(), Strategy::Kelly);
    }

    #[test]
    fn test_input_defaults() {
        let input = CalculationInput::new(Strategy::Arbitrage, 2.5, 3.0, 1000.0);
        assert_eq!(input.name_a, "Option A");
        assert_eq!(input.name_b, "Option B");
        assert_eq!(input.currency, "₦");
        assert!(input.probabilities().is_none());
    }

    #[test]
    fn test_zero_probability_counts_as_absent() {
        let input = CalculationInput::new(Strategy::Kelly, 2.0, 2.0, 100.0)
            .with_probabilities(Some(0.5), Some(0.0));
        assert!(input.probabilities().is_none());

        let input = input.with_probabilities(Some(0.5), Some(0.4));
        assert_eq!(input.probabilities(), Some((0.5, 0.4)));
    }

    #[test]
    fn test_with_method_keeps_everything_else() {
        let input = CalculationInput::new(Strategy::Arbitrage, 2.5, 3.0, 1000.0).with_names("X", "Y");
        let kelly = input.with_method(Strategy::Kelly);
        assert_eq!(kelly.method, Method::Known(Strategy::Kelly));
        assert_eq!(kelly.name_a, "X");
        assert_eq!(kelly.odds_b, 3.0);
    }

    #[test]
    fn test_validation_error_single_renders_plain() {
        let err = ValidationError {
            issues: vec![ValidationIssue::NonPositiveStake(0.0)],
        };
        assert_eq!(err.to_string(), "total stake must be positive, got: 0.00");
    }

    #[test]
    fn test_validation_error_multiple_renders_numbered() {
        let err = ValidationError {
            issues: vec![
                ValidationIssue::OddsBelowFloor { side: Side::A, odds: 1.0, floor: 1.01 },
                ValidationIssue::NonPositiveStake(-5.0),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("multiple validation errors:\n"));
        assert!(text.contains("  1. Option A: odds must be >= 1.01, got: 1.00"));
        assert!(text.contains("  2. total stake must be positive, got: -5.00"));
    }

    #[test]
    fn test_issue_severity() {
        assert!(ValidationIssue::NoArbitrage { market_efficiency: 1.05 }.is_warning());
        assert!(ValidationIssue::OverconfidentProbabilities { sum: 1.2 }.is_warning());
        assert!(!ValidationIssue::MissingProbabilities.is_warning());
        assert_eq!(
            ValidationIssue::UnknownStrategy("x".into()).severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_no_arbitrage_message() {
        let issue = ValidationIssue::NoArbitrage { market_efficiency: 1.0526 };
        assert_eq!(
            issue.to_string(),
            "warning: combined implied probability (105.26%) >= 100% - no guaranteed profit"
        );
    }

    #[test]
    fn test_error_umbrella_from() {
        let err: KellyError = CalculationError::MissingProbabilities.into();
        assert!(matches!(err, KellyError::Calculation(_)));
        let err: KellyError = ParseError::Empty.into();
        assert_eq!(err.to_string(), "odds cannot be empty");
    }
}
