#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/findata-rs/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Intrinio data provider.
//!
//! This crate implements the findata-core provider trait for the
//! [Intrinio](https://intrinio.com/) v2 REST API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use findata_intrinio::IntrinioProvider;
//! use findata_core::{HistoricalDataProvider, SeriesFrequency, Symbol};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = IntrinioProvider::new("your_api_key");
//!     provider.probe().await?;
//!
//!     let symbol = Symbol::new("AAPL");
//!     let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
//!
//!     let revenue = provider
//!         .fetch_series(&symbol, "totalrevenue", start, end, SeriesFrequency::Yearly)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use findata_core::{
    DataError, HistoricalDataProvider, MacdObservation, Observation, Result, SeriesFrequency,
    StatementKind, Symbol,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Base URL for the Intrinio v2 API.
const INTRINIO_BASE_URL: &str = "https://api-v2.intrinio.com";

/// Timeout applied to the connectivity probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size requested for price series (one page of results only).
const PRICE_PAGE_SIZE: u32 = 100;

/// Intrinio data provider.
///
/// Provides access to:
/// - Company historical data series (arbitrary metric tags)
/// - Daily security closing prices
/// - Standardized fiscal-year financial statements
/// - Single numeric company data points
/// - MACD and SMA price technicals
///
/// Failure responses keep their HTTP status on the returned error so the
/// retry policy can distinguish server-side faults from client faults.
#[derive(Clone)]
pub struct IntrinioProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for IntrinioProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrinioProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl IntrinioProvider {
    /// Create a new Intrinio provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: INTRINIO_BASE_URL.to_string(),
        }
    }

    /// Create a provider with a custom HTTP client and base URL.
    ///
    /// Mostly useful for pointing tests at a local server.
    #[must_use]
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Build a URL with the API key appended.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{}/{endpoint}&api_key={}", self.base_url, self.api_key)
        } else {
            format!("{}/{endpoint}?api_key={}", self.base_url, self.api_key)
        }
    }

    /// Wrap a failure response in an API error carrying its status.
    fn api_error(message: impl Into<String>, status: Option<u16>) -> DataError {
        DataError::Api {
            provider: "Intrinio".to_string(),
            message: message.into(),
            status,
        }
    }

    /// Make a GET request and return the response body as text.
    ///
    /// Non-success statuses become [`DataError::Api`] with the status code
    /// attached.
    async fn get_text(&self, endpoint: &str) -> Result<String> {
        let url = self.url(endpoint);
        tracing::debug!("Intrinio request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::api_error(
                format!("HTTP {status} from {endpoint}: {text}"),
                Some(status.as_u16()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let text = self.get_text(endpoint).await?;
        serde_json::from_str(&text).map_err(|e| DataError::Parse(format!("{e}: {text}")))
    }

    /// Tests the API endpoint directly, validating connectivity and the API
    /// key. The request is bounded by a 10-second timeout.
    pub async fn probe(&self) -> Result<()> {
        let url = self.url("companies/AAPL");

        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| DataError::Network(format!("Could not execute GET to {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::api_error(
                format!("Invalid response from Intrinio endpoint: {text}"),
                Some(status.as_u16()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl HistoricalDataProvider for IntrinioProvider {
    fn name(&self) -> &str {
        "intrinio"
    }

    async fn fetch_series(
        &self,
        symbol: &Symbol,
        tag: &str,
        start: NaiveDate,
        end: NaiveDate,
        frequency: SeriesFrequency,
    ) -> Result<Vec<Observation>> {
        let endpoint = format!(
            "companies/{}/historical_data/{tag}?frequency={}&start_date={start}&end_date={end}",
            symbol.as_str(),
            frequency.as_str()
        );
        let response: HistoricalDataResponse = self.get(&endpoint).await?;

        Ok(response
            .historical_data
            .into_iter()
            .filter_map(|point| Some(Observation::new(point.date, point.value?)))
            .collect())
    }

    async fn fetch_daily_closes(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let endpoint = format!(
            "securities/{}/prices?start_date={start}&end_date={end}&frequency=daily&page_size={PRICE_PAGE_SIZE}",
            symbol.as_str()
        );
        let response: StockPricesResponse = self.get(&endpoint).await?;

        Ok(response
            .stock_prices
            .into_iter()
            .map(|price| Observation::new(price.date, price.close))
            .collect())
    }

    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        fiscal_year: i32,
    ) -> Result<BTreeMap<String, f64>> {
        // Statement identifiers are e.g. "AAPL-income_statement-2018-FY".
        let endpoint = format!(
            "fundamentals/{}-{}-{fiscal_year}-FY/standardized_financials",
            symbol.as_str(),
            kind.as_str()
        );
        let response: StandardizedFinancialsResponse = self.get(&endpoint).await?;

        Ok(response
            .standardized_financials
            .into_iter()
            .map(|entry| (entry.data_tag.tag, entry.value))
            .collect())
    }

    async fn fetch_data_point(&self, symbol: &Symbol, tag: &str) -> Result<f64> {
        let endpoint = format!("companies/{}/data_point/{tag}/number", symbol.as_str());
        let text = self.get_text(&endpoint).await?;

        text.trim()
            .parse()
            .map_err(|_| DataError::Parse(format!("Expected a number for '{tag}', got: {text}")))
    }

    async fn fetch_macd(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        fast_period: u32,
        slow_period: u32,
        signal_period: u32,
    ) -> Result<Vec<MacdObservation>> {
        let endpoint = format!(
            "securities/{}/prices/technicals/macd?fast_period={fast_period}&slow_period={slow_period}&signal_period={signal_period}&price_key=close&start_date={start}&end_date={end}&page_size={PRICE_PAGE_SIZE}",
            symbol.as_str()
        );
        let response: MacdTechnicalsResponse = self.get(&endpoint).await?;

        Ok(response
            .technicals
            .into_iter()
            .filter_map(|row| {
                Some(MacdObservation {
                    date: row.date_time.date_naive(),
                    macd_line: row.macd_line?,
                    signal_line: row.signal_line?,
                    macd_histogram: row.macd_histogram?,
                })
            })
            .collect())
    }

    async fn fetch_sma(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        period_days: u32,
    ) -> Result<Vec<Observation>> {
        let endpoint = format!(
            "securities/{}/prices/technicals/sma?period={period_days}&price_key=close&start_date={start}&end_date={end}&page_size={PRICE_PAGE_SIZE}",
            symbol.as_str()
        );
        let response: SmaTechnicalsResponse = self.get(&endpoint).await?;

        Ok(response
            .technicals
            .into_iter()
            .filter_map(|row| Some(Observation::new(row.date_time.date_naive(), row.sma?)))
            .collect())
    }
}

// ============================================================================
// Intrinio API Response Types
// ============================================================================

/// Company historical data response.
#[derive(Debug, Clone, Deserialize)]
struct HistoricalDataResponse {
    #[serde(default)]
    historical_data: Vec<HistoricalDataPoint>,
}

/// One point of a company historical data series.
#[derive(Debug, Clone, Deserialize)]
struct HistoricalDataPoint {
    date: NaiveDate,
    value: Option<f64>,
}

/// Security stock prices response.
#[derive(Debug, Clone, Deserialize)]
struct StockPricesResponse {
    #[serde(default)]
    stock_prices: Vec<StockPrice>,
}

/// One daily price row.
#[derive(Debug, Clone, Deserialize)]
struct StockPrice {
    date: NaiveDate,
    close: f64,
}

/// Standardized financials response.
#[derive(Debug, Clone, Deserialize)]
struct StandardizedFinancialsResponse {
    #[serde(default)]
    standardized_financials: Vec<StandardizedFinancial>,
}

/// One standardized financial statement entry.
#[derive(Debug, Clone, Deserialize)]
struct StandardizedFinancial {
    data_tag: DataTag,
    value: f64,
}

/// Tag metadata attached to a standardized financial entry.
#[derive(Debug, Clone, Deserialize)]
struct DataTag {
    tag: String,
}

/// MACD technicals response.
#[derive(Debug, Clone, Deserialize)]
struct MacdTechnicalsResponse {
    #[serde(default)]
    technicals: Vec<MacdTechnical>,
}

/// One MACD technicals row.
///
/// Early rows inside the indicator warm-up window come back with null
/// values; those are dropped.
#[derive(Debug, Clone, Deserialize)]
struct MacdTechnical {
    date_time: DateTime<Utc>,
    macd_line: Option<f64>,
    signal_line: Option<f64>,
    macd_histogram: Option<f64>,
}

/// SMA technicals response.
#[derive(Debug, Clone, Deserialize)]
struct SmaTechnicalsResponse {
    #[serde(default)]
    technicals: Vec<SmaTechnical>,
}

/// One SMA technicals row.
#[derive(Debug, Clone, Deserialize)]
struct SmaTechnical {
    date_time: DateTime<Utc>,
    sma: Option<f64>,
}
