//! KELLY: two-way betting stake allocation
//!
//! Library crate exposing the calculation core (odds parsing, validation,
//! allocation strategies) for use by integration tests and the binary
//! entry point.

pub mod config;
pub mod odds;
pub mod strategy;
pub mod types;
pub mod validation;

pub use odds::{detect_format, implied_probability, parse_odds};
pub use strategy::{calculate, compare, Comparison, ComparisonOutcome};
pub use types::{
    CalculationError, CalculationInput, CalculationResult, KellyError, Method, OddsFormat,
    OptionAllocation, ParseError, Side, Strategy, Summary, ValidationError, ValidationIssue,
};
pub use validation::{validate, validate_comparison, validate_with, ValidationPolicy};
