//! Odds normalization.
//!
//! Accepts decimal (`2.5`), percentage (`39%`), fractional (`3/2`) and
//! American (`+250` / `-150`) notation and converts everything to decimal
//! odds: the total return per unit staked, stake included.

use tracing::debug;

use crate::types::{OddsFormat, ParseError};

/// Detect the notation of an odds string.
///
/// Precedence: trailing `%`, then `/`, then a leading sign, else decimal.
pub fn detect_format(input: &str) -> OddsFormat {
    let input = input.trim();
    if input.ends_with('%') {
        OddsFormat::Percentage
    } else if input.contains('/') {
        OddsFormat::Fractional
    } else if input.starts_with('+') || input.starts_with('-') {
        OddsFormat::American
    } else {
        OddsFormat::Decimal
    }
}

/// Parse odds in any supported notation into decimal odds (>= 1.0).
pub fn parse_odds(input: &str) -> Result<f64, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    let format = detect_format(input);
    let odds = match format {
        OddsFormat::Percentage => parse_percentage(input),
        OddsFormat::Fractional => parse_fractional(input),
        OddsFormat::American => parse_american(input),
        OddsFormat::Decimal => parse_decimal(input),
    }?;

    debug!(input, %format, odds, "Odds parsed");
    Ok(odds)
}

/// `1 / odds`, or 0 for non-positive odds.
pub fn implied_probability(decimal_odds: f64) -> f64 {
    if decimal_odds <= 0.0 {
        return 0.0;
    }
    1.0 / decimal_odds
}

/// Sum of both sides' implied probabilities (the overround when > 1).
pub fn market_efficiency(odds_a: f64, odds_b: f64) -> f64 {
    implied_probability(odds_a) + implied_probability(odds_b)
}

// ---------------------------------------------------------------------------
// Per-format parsers
// ---------------------------------------------------------------------------

fn number(text: &str, format: OddsFormat, input: &str) -> Result<f64, ParseError> {
    let value: f64 = text.trim().parse().map_err(|_| ParseError::InvalidNumber {
        format,
        input: input.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ParseError::NotFinite(input.to_string()));
    }
    Ok(value)
}

fn parse_decimal(input: &str) -> Result<f64, ParseError> {
    let odds = number(input, OddsFormat::Decimal, input)?;
    if odds < 1.0 {
        return Err(ParseError::DecimalBelowOne(input.to_string()));
    }
    Ok(odds)
}

fn parse_percentage(input: &str) -> Result<f64, ParseError> {
    let pct = input.strip_suffix('%').unwrap_or(input);
    let pct = number(pct, OddsFormat::Percentage, input)?;
    if pct <= 0.0 || pct > 100.0 {
        return Err(ParseError::PercentageOutOfRange(input.to_string()));
    }
    Ok(100.0 / pct)
}

fn parse_fractional(input: &str) -> Result<f64, ParseError> {
    let (numerator, denominator) = match input.split('/').collect::<Vec<_>>().as_slice() {
        [n, d] => (*n, *d),
        _ => return Err(ParseError::MalformedFraction(input.to_string())),
    };

    let numerator = number(numerator, OddsFormat::Fractional, input)?;
    let denominator = number(denominator, OddsFormat::Fractional, input)?;

    if denominator == 0.0 {
        return Err(ParseError::ZeroDenominator(input.to_string()));
    }
    if numerator < 0.0 || denominator < 0.0 {
        return Err(ParseError::NegativeFraction(input.to_string()));
    }
    Ok(numerator / denominator + 1.0)
}

fn parse_american(input: &str) -> Result<f64, ParseError> {
    let american = number(input, OddsFormat::American, input)?;
    if american == 0.0 {
        return Err(ParseError::ZeroAmerican(input.to_string()));
    }

    if american > 0.0 {
        Ok(american / 100.0 + 1.0)
    } else {
        Ok(100.0 / american.abs() + 1.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
