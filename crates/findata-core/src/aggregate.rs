//! Temporal aggregation of observation series into calendar buckets.
//!
//! Two independently usable reductions over a series of dated observations:
//! [`aggregate_by_year`] maps each year to a single value, and
//! [`aggregate_by_year_month`] maps each (year, month) pair to the arithmetic
//! mean of its values. Both are pure functions and safe to call concurrently
//! on independent inputs.

use chrono::Datelike;
use std::collections::BTreeMap;

use crate::types::Observation;

/// Mapping from year to a single observation value.
pub type YearBucket = BTreeMap<i32, f64>;

/// Mapping from year to month (1-12) to the mean of that month's values.
pub type YearMonthBucket = BTreeMap<i32, BTreeMap<u32, f64>>;

/// Folds a series into one value per year.
///
/// Single pass: for each observation, the value is written under its year.
/// When a year occurs more than once, the observation encountered **later in
/// iteration order** wins, regardless of its date. The iteration order of the
/// input is therefore semantically significant; a caller that wants
/// latest-by-date semantics must supply the series ordered earliest-first.
#[must_use]
pub fn aggregate_by_year(series: &[Observation]) -> YearBucket {
    let mut buckets = YearBucket::new();
    for observation in series {
        buckets.insert(observation.date.year(), observation.value);
    }
    buckets
}

/// Folds a series into per-month arithmetic means, grouped by year.
///
/// Two passes: the first groups observation values into lists keyed by
/// (year, month), the second replaces each list with its mean. An empty
/// input yields an empty bucket, not an error.
#[must_use]
pub fn aggregate_by_year_month(series: &[Observation]) -> YearMonthBucket {
    let mut grouped: BTreeMap<i32, BTreeMap<u32, Vec<f64>>> = BTreeMap::new();
    for observation in series {
        grouped
            .entry(observation.date.year())
            .or_default()
            .entry(observation.date.month())
            .or_default()
            .push(observation.value);
    }

    // Buckets only exist once at least one value was appended, so the count
    // is always non-zero.
    grouped
        .into_iter()
        .map(|(year, months)| {
            let means = months
                .into_iter()
                .map(|(month, values)| {
                    let mean = values.iter().sum::<f64>() / values.len() as f64;
                    (month, mean)
                })
                .collect();
            (year, means)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(year: i32, month: u32, day: u32, value: f64) -> Observation {
        Observation::new(NaiveDate::from_ymd_opt(year, month, day).unwrap(), value)
    }

    #[test]
    fn test_by_year_maps_each_year_once() {
        let series = [obs(2018, 9, 29, 100.0), obs(2019, 1, 1, 200.0)];
        let buckets = aggregate_by_year(&series);
        assert_eq!(buckets, BTreeMap::from([(2018, 100.0), (2019, 200.0)]));
    }

    #[test]
    fn test_by_year_later_observation_overwrites() {
        let series = [obs(2018, 1, 1, 1.0), obs(2018, 12, 31, 2.0)];
        assert_eq!(aggregate_by_year(&series), BTreeMap::from([(2018, 2.0)]));

        // Iteration order wins, not date order.
        let reversed = [obs(2018, 12, 31, 2.0), obs(2018, 1, 1, 1.0)];
        assert_eq!(aggregate_by_year(&reversed), BTreeMap::from([(2018, 1.0)]));
    }

    #[test]
    fn test_by_year_empty_series() {
        assert!(aggregate_by_year(&[]).is_empty());
    }

    #[test]
    fn test_by_year_month_averages_within_month() {
        let series = [
            obs(2019, 9, 1, 10.0),
            obs(2019, 9, 15, 20.0),
            obs(2019, 10, 12, 30.0),
        ];
        let buckets = aggregate_by_year_month(&series);
        assert_eq!(
            buckets,
            BTreeMap::from([(2019, BTreeMap::from([(9, 15.0), (10, 30.0)]))])
        );
    }

    #[test]
    fn test_by_year_month_spans_years() {
        let series = [obs(2018, 12, 31, 4.0), obs(2019, 1, 1, 6.0)];
        let buckets = aggregate_by_year_month(&series);
        assert_eq!(buckets[&2018][&12], 4.0);
        assert_eq!(buckets[&2019][&1], 6.0);
    }

    #[test]
    fn test_by_year_month_empty_series() {
        assert!(aggregate_by_year_month(&[]).is_empty());
    }
}
