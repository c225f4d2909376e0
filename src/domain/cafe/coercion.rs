//! Field-level coercion of raw request text into typed, constrained values.
//!
//! Every check takes the raw optional text of one parameter. Callers decide which parameter it
//! was and how a failure is worded; the checks only decide *whether* the input is acceptable.

use std::fmt;

pub const CURRENCY_SYMBOL: &str = "£";

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFailure {
    Missing,
    Invalid,
}

/// A validated, non-negative coffee price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    /// Canonical stored representation, e.g. `£ 2.50`.
    pub fn formatted(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", CURRENCY_SYMBOL, self.0)
    }
}

/// Accepts `true`/`false` in any letter case. Absent input is "not supplied", not a failure.
pub fn coerce_boolean(raw: Option<&str>) -> Result<Option<bool>, FieldFailure> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.to_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(FieldFailure::Invalid),
    }
}

/// Permissive URL heuristic: the text must contain `http`, ignoring case.
pub fn coerce_url(raw: Option<&str>) -> Result<Option<&str>, FieldFailure> {
    match raw {
        None => Ok(None),
        Some(url) if url.to_lowercase().contains("http") => Ok(Some(url)),
        Some(_) => Err(FieldFailure::Invalid),
    }
}

/// Parses a finite decimal number `>= 0`. Absent input is invalid: a price is always required
/// where this check is used.
pub fn coerce_price(raw: Option<&str>) -> Result<Price, FieldFailure> {
    let raw = raw.ok_or(FieldFailure::Invalid)?;
    let value: f64 = raw.trim().parse().map_err(|_| FieldFailure::Invalid)?;
    if !value.is_finite() || value < 0.0 {
        return Err(FieldFailure::Invalid);
    }
    // -0.0 would format as "-0.00"
    Ok(Price(if value == 0.0 { 0.0 } else { value }))
}

pub fn coerce_required_text(raw: Option<&str>) -> Result<&str, FieldFailure> {
    raw.ok_or(FieldFailure::Missing)
}
