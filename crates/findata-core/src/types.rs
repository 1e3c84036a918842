//! Core data types for historical financial data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Observation`] - A single dated data point from a provider

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single dated data point retrieved from a provider.
///
/// Observations are immutable once retrieved. A series of observations is a
/// plain `Vec<Observation>`; providers differ in whether they return it
/// ascending or descending by date, and consumers must not assume an order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the data point.
    pub date: NaiveDate,
    /// Numeric value of the data point.
    pub value: f64,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// One dated MACD indicator reading.
///
/// Like [`Observation`], readings carry their own date and no ordering is
/// guaranteed across a series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacdObservation {
    /// Calendar date of the reading.
    pub date: NaiveDate,
    /// MACD line (fast EMA minus slow EMA).
    pub macd_line: f64,
    /// Signal line (EMA of the MACD line).
    pub signal_line: f64,
    /// Histogram (MACD line minus signal line).
    pub macd_histogram: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_uppercases() {
        assert_eq!(Symbol::new("aapl").as_str(), "AAPL");
        assert_eq!(Symbol::from("msft").to_string(), "MSFT");
    }

    #[test]
    fn test_symbol_from_str() {
        let symbol: Symbol = "spy".parse().unwrap();
        assert_eq!(symbol, Symbol::new("SPY"));
    }

    #[test]
    fn test_observation_roundtrips_through_serde() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(), 10.5);
        let json = serde_json::to_string(&obs).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}
