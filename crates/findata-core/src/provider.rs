//! Provider trait for fetching historical data.
//!
//! This module defines [`HistoricalDataProvider`], the seam between the
//! fetch pipeline and a vendor data source, together with the
//! [`SeriesFrequency`] and [`StatementKind`] enums that parameterize its
//! operations.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{MacdObservation, Observation, Symbol},
};

/// Sampling frequency of a historical data series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesFrequency {
    /// One observation per trading day.
    Daily,
    /// One observation per week.
    Weekly,
    /// One observation per month.
    Monthly,
    /// One observation per quarter.
    Quarterly,
    /// One observation per year.
    Yearly,
}

impl SeriesFrequency {
    /// Returns the wire form used in query strings and cache keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

/// Kind of standardized financial statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement.
    IncomeStatement,
    /// Balance sheet statement.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// Returns the wire form used in statement identifiers and cache keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet_statement",
            Self::CashFlow => "cash_flow_statement",
        }
    }
}

/// A vendor source of historical financial data.
///
/// Implementations issue the actual network calls. Errors carrying an HTTP
/// status of 500 or above are treated as transient by the retry policy, so
/// implementations should preserve the status on
/// [`DataError::Api`](crate::error::DataError::Api) whenever one was observed.
#[async_trait]
pub trait HistoricalDataProvider: Send + Sync + Debug {
    /// Returns the name of this provider, used as the cache key namespace.
    fn name(&self) -> &str;

    /// Fetches a historical series for a company-level metric tag.
    ///
    /// No order is guaranteed for the returned observations.
    async fn fetch_series(
        &self,
        symbol: &Symbol,
        tag: &str,
        start: NaiveDate,
        end: NaiveDate,
        frequency: SeriesFrequency,
    ) -> Result<Vec<Observation>>;

    /// Fetches daily closing prices as one observation per trading day.
    async fn fetch_daily_closes(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>>;

    /// Fetches one standardized fiscal-year statement as tag -> value.
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        fiscal_year: i32,
    ) -> Result<BTreeMap<String, f64>>;

    /// Fetches a single numeric company data point.
    async fn fetch_data_point(&self, symbol: &Symbol, tag: &str) -> Result<f64>;

    /// Fetches MACD readings over closing prices for the date range.
    async fn fetch_macd(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        fast_period: u32,
        slow_period: u32,
        signal_period: u32,
    ) -> Result<Vec<MacdObservation>>;

    /// Fetches simple moving averages over closing prices, one observation
    /// per trading day, each averaging the preceding `period_days` closes.
    async fn fetch_sma(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        period_days: u32,
    ) -> Result<Vec<Observation>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_wire_forms() {
        assert_eq!(SeriesFrequency::Daily.as_str(), "daily");
        assert_eq!(SeriesFrequency::Yearly.as_str(), "yearly");
    }

    #[test]
    fn test_statement_wire_forms() {
        assert_eq!(StatementKind::IncomeStatement.as_str(), "income_statement");
        assert_eq!(StatementKind::BalanceSheet.as_str(), "balance_sheet_statement");
        assert_eq!(StatementKind::CashFlow.as_str(), "cash_flow_statement");
    }
}
