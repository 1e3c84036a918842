//! High-level historical data service.
//!
//! [`HistoricalDataService`] is the surface callers use: each operation
//! derives a deterministic cache key from its parameters, runs the provider
//! fetch through the [`FetchCache`](crate::fetch::FetchCache), and, where the
//! operation calls for it, folds the raw series into calendar buckets.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use findata_core::{
    CacheKey, CacheStore, DataError, HistoricalDataProvider, MacdObservation, Observation, Result,
    SeriesFrequency, StatementKind, Symbol, YearBucket, YearMonthBucket,
    aggregate::{aggregate_by_year, aggregate_by_year_month},
    dates::{compact_date, year_range},
};
use tracing::debug;

use crate::{fetch::FetchCache, retry::RetryPolicy};

/// Fiscal-year statement discriminator used in statement cache keys.
const FISCAL_YEAR: &str = "FY";

/// Historical data pipeline over a provider and a cache store.
///
/// Cache keys are namespaced by the provider's name, so two services over
/// different providers can safely share one store.
#[derive(Debug)]
pub struct HistoricalDataService {
    provider: Arc<dyn HistoricalDataProvider>,
    fetcher: FetchCache,
}

impl HistoricalDataService {
    /// Create a service with the default retry policy.
    #[must_use]
    pub fn new(provider: Arc<dyn HistoricalDataProvider>, store: Arc<dyn CacheStore>) -> Self {
        Self::with_retry(provider, store, RetryPolicy::default())
    }

    /// Create a service with a custom retry policy.
    #[must_use]
    pub fn with_retry(
        provider: Arc<dyn HistoricalDataProvider>,
        store: Arc<dyn CacheStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            fetcher: FetchCache::with_retry(store, retry),
        }
    }

    /// Daily closing prices for the date range, keyed by date.
    ///
    /// An empty provider response is a [`DataError::NoData`] and is not
    /// cached.
    pub async fn daily_close_prices(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>> {
        let start_key = compact_date(start);
        let end_key = compact_date(end);
        let key = CacheKey::build(
            self.provider.name(),
            [
                symbol.as_str(),
                start_key.as_str(),
                end_key.as_str(),
                "closing-prices",
            ],
        );

        let provider = Arc::clone(&self.provider);
        let symbol = symbol.clone();
        let series: Vec<Observation> = self
            .fetcher
            .get_or_fetch(
                &key,
                move || {
                    let provider = Arc::clone(&provider);
                    let symbol = symbol.clone();
                    async move { provider.fetch_daily_closes(&symbol, start, end).await }
                },
                |series| !series.is_empty(),
            )
            .await?;

        Ok(series.into_iter().map(|o| (o.date, o.value)).collect())
    }

    /// The most recent closing price at or before `date`.
    ///
    /// Looks back up to `max_lookback` days (allowed range 1..=9) and returns
    /// the latest date for which a price exists.
    pub async fn latest_close_price(
        &self,
        symbol: &Symbol,
        date: NaiveDate,
        max_lookback: i64,
    ) -> Result<(NaiveDate, f64)> {
        if !(1..=9).contains(&max_lookback) {
            return Err(DataError::InvalidParameter(format!(
                "max_lookback must be between 1 and 9, got {max_lookback}"
            )));
        }

        let lookback_start = date - Duration::days(max_lookback);
        let prices = self.daily_close_prices(symbol, lookback_start, date).await?;

        prices
            .into_iter()
            .next_back()
            .ok_or_else(|| DataError::NoData(symbol.to_string()))
    }

    /// One value of `tag` per year over the calendar range, latest
    /// occurrence in provider order winning per year.
    pub async fn annual_metric(
        &self,
        symbol: &Symbol,
        tag: &str,
        year_from: i32,
        year_to: i32,
    ) -> Result<YearBucket> {
        if year_from > year_to {
            return Err(DataError::InvalidParameter(format!(
                "year_from {year_from} is after year_to {year_to}"
            )));
        }
        let (start, _) = year_range(year_from, 0)?;
        let (_, end) = year_range(year_to, 0)?;

        let series = self.yearly_series(symbol, tag, start, end).await?;
        Ok(aggregate_by_year(&series))
    }

    /// Total revenue per year.
    pub async fn annual_revenue(
        &self,
        symbol: &Symbol,
        year_from: i32,
        year_to: i32,
    ) -> Result<YearBucket> {
        self.annual_metric(symbol, "totalrevenue", year_from, year_to)
            .await
    }

    /// Free cash flow for the firm per year.
    pub async fn annual_free_cash_flow(
        &self,
        symbol: &Symbol,
        year_from: i32,
        year_to: i32,
    ) -> Result<YearBucket> {
        self.annual_metric(symbol, "freecashflow", year_from, year_to)
            .await
    }

    /// Monthly arithmetic means of `tag` over the date range, grouped by
    /// year.
    pub async fn monthly_metric_average(
        &self,
        symbol: &Symbol,
        tag: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<YearMonthBucket> {
        let series = self.yearly_series(symbol, tag, start, end).await?;
        Ok(aggregate_by_year_month(&series))
    }

    /// Standardized fiscal-year statements for each year in the range.
    ///
    /// Each year is fetched and cached under its own key. `tag_filter`
    /// projects the returned tags; `None` keeps everything.
    pub async fn financial_statements(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        year_from: i32,
        year_to: i32,
        tag_filter: Option<&[&str]>,
    ) -> Result<BTreeMap<i32, BTreeMap<String, f64>>> {
        if year_from > year_to {
            return Err(DataError::InvalidParameter(format!(
                "year_from {year_from} is after year_to {year_to}"
            )));
        }

        let mut statements = BTreeMap::new();
        for year in year_from..=year_to {
            let year_key = year.to_string();
            let key = CacheKey::build(
                self.provider.name(),
                [
                    "statement",
                    symbol.as_str(),
                    kind.as_str(),
                    FISCAL_YEAR,
                    year_key.as_str(),
                ],
            );

            let provider = Arc::clone(&self.provider);
            let fetch_symbol = symbol.clone();
            let statement: BTreeMap<String, f64> = self
                .fetcher
                .get_or_fetch(
                    &key,
                    move || {
                        let provider = Arc::clone(&provider);
                        let symbol = fetch_symbol.clone();
                        async move { provider.fetch_statement(&symbol, kind, year).await }
                    },
                    |_| true,
                )
                .await?;

            statements.insert(year, filter_tags(statement, tag_filter));
        }

        debug!(symbol = %symbol, kind = kind.as_str(), "Assembled {} statements", statements.len());
        Ok(statements)
    }

    /// A single numeric company data point for `tag`.
    pub async fn company_data_point(&self, symbol: &Symbol, tag: &str) -> Result<f64> {
        let key = CacheKey::build(
            self.provider.name(),
            ["company_data_point_number", symbol.as_str(), tag],
        );

        let provider = Arc::clone(&self.provider);
        let symbol = symbol.clone();
        let tag = tag.to_string();
        self.fetcher
            .get_or_fetch(
                &key,
                move || {
                    let provider = Arc::clone(&provider);
                    let symbol = symbol.clone();
                    let tag = tag.clone();
                    async move { provider.fetch_data_point(&symbol, &tag).await }
                },
                |_| true,
            )
            .await
    }

    /// MACD readings over closing prices for the date range, keyed by date.
    ///
    /// The three periods are part of the cache key, so queries with
    /// different parameters never collide. An empty provider response is a
    /// [`DataError::NoData`] and is not cached.
    pub async fn macd_indicator(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        fast_period: u32,
        slow_period: u32,
        signal_period: u32,
    ) -> Result<BTreeMap<NaiveDate, MacdObservation>> {
        let start_key = compact_date(start);
        let end_key = compact_date(end);
        let periods = format!("{fast_period}.{slow_period}.{signal_period}");
        let key = CacheKey::build(
            self.provider.name(),
            [
                symbol.as_str(),
                start_key.as_str(),
                end_key.as_str(),
                periods.as_str(),
                "tech-macd",
            ],
        );

        let provider = Arc::clone(&self.provider);
        let symbol = symbol.clone();
        let readings: Vec<MacdObservation> = self
            .fetcher
            .get_or_fetch(
                &key,
                move || {
                    let provider = Arc::clone(&provider);
                    let symbol = symbol.clone();
                    async move {
                        provider
                            .fetch_macd(&symbol, start, end, fast_period, slow_period, signal_period)
                            .await
                    }
                },
                |readings| !readings.is_empty(),
            )
            .await?;

        Ok(readings.into_iter().map(|r| (r.date, r)).collect())
    }

    /// Simple moving averages over closing prices, keyed by date.
    ///
    /// `period_days` is the number of closes averaged per reading and is
    /// part of the cache key. An empty provider response is a
    /// [`DataError::NoData`] and is not cached.
    pub async fn sma_indicator(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        period_days: u32,
    ) -> Result<BTreeMap<NaiveDate, f64>> {
        let start_key = compact_date(start);
        let end_key = compact_date(end);
        let period_key = period_days.to_string();
        let key = CacheKey::build(
            self.provider.name(),
            [
                symbol.as_str(),
                start_key.as_str(),
                end_key.as_str(),
                period_key.as_str(),
                "tech-sma",
            ],
        );

        let provider = Arc::clone(&self.provider);
        let symbol = symbol.clone();
        let series: Vec<Observation> = self
            .fetcher
            .get_or_fetch(
                &key,
                move || {
                    let provider = Arc::clone(&provider);
                    let symbol = symbol.clone();
                    async move { provider.fetch_sma(&symbol, start, end, period_days).await }
                },
                |series| !series.is_empty(),
            )
            .await?;

        Ok(series.into_iter().map(|o| (o.date, o.value)).collect())
    }

    /// Yearly-frequency series for `tag`, cached per query.
    async fn yearly_series(
        &self,
        symbol: &Symbol,
        tag: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let frequency = SeriesFrequency::Yearly;
        let start_key = compact_date(start);
        let end_key = compact_date(end);
        let key = CacheKey::build(
            self.provider.name(),
            [
                "company_historical_data",
                symbol.as_str(),
                start_key.as_str(),
                end_key.as_str(),
                frequency.as_str(),
                tag,
            ],
        );

        let provider = Arc::clone(&self.provider);
        let symbol = symbol.clone();
        let tag = tag.to_string();
        self.fetcher
            .get_or_fetch(
                &key,
                move || {
                    let provider = Arc::clone(&provider);
                    let symbol = symbol.clone();
                    let tag = tag.clone();
                    async move {
                        provider
                            .fetch_series(&symbol, &tag, start, end, frequency)
                            .await
                    }
                },
                |series| !series.is_empty(),
            )
            .await
    }
}

/// Keeps only the tags named by the filter; `None` keeps everything.
fn filter_tags(
    statement: BTreeMap<String, f64>,
    tag_filter: Option<&[&str]>,
) -> BTreeMap<String, f64> {
    match tag_filter {
        None => statement,
        Some(tags) => statement
            .into_iter()
            .filter(|(tag, _)| tags.contains(&tag.as_str()))
            .collect(),
    }
}
