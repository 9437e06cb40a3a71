//! Summary statistics over a batch of result records
//!
//! Everything here is a pure function of its input. Latencies are handled as
//! integer nanoseconds throughout; floating point is only introduced for the
//! success percentage and the millisecond series handed to charts.

use loadlens_capture::Record;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Percentile rank reported as the tail latency.
pub const TAIL_QUANTILE: f64 = 0.99;

/// Errors produced by [`summarize`]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Rates and means are not defined over zero records.
    #[error("Cannot summarize an empty batch of results")]
    EmptyInput,
}

/// Aggregates derived from one batch of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Number of records summarized
    pub count: usize,
    /// Percentage, 0 to 100, of records with a 2xx status code
    pub success_rate: f64,
    /// Smallest latency, nanoseconds
    pub min_latency: u64,
    /// Largest latency, nanoseconds
    pub max_latency: u64,
    /// Integer mean latency, nanoseconds
    pub avg_latency: u64,
    /// Latency at the 99th percentile rank, nanoseconds
    pub p99_latency: u64,
    /// Occurrences of each observed status code
    pub status_code_histogram: FxHashMap<u16, u64>,
    /// `(index, latency in milliseconds)` per record, in input order
    pub latency_series: Vec<(usize, f64)>,
}

/// Summarize `records` into a [`Report`].
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if `records` is empty.
pub fn summarize(records: &[Record]) -> Result<Report, Error> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut successes: u64 = 0;
    let mut histogram: FxHashMap<u16, u64> = FxHashMap::default();
    let mut latencies: Vec<u64> = Vec::with_capacity(records.len());
    let mut latency_series: Vec<(usize, f64)> = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        if record.is_success() {
            successes += 1;
        }
        *histogram.entry(record.status_code).or_default() += 1;
        latencies.push(record.latency_nanos);
        latency_series.push((idx, record.latency_millis()));
    }

    let avg_latency = average_latency(&latencies).ok_or(Error::EmptyInput)?;
    let min_latency = min_latency(&latencies);
    let max_latency = max_latency(&latencies);
    let p99_latency = p99_latency(&latencies);

    #[allow(clippy::cast_precision_loss)]
    let success_rate = successes as f64 / records.len() as f64 * 100.0;

    debug!(
        "summarized {count} records, {distinct} distinct status codes",
        count = records.len(),
        distinct = histogram.len()
    );

    Ok(Report {
        count: records.len(),
        success_rate,
        min_latency,
        max_latency,
        avg_latency,
        p99_latency,
        status_code_histogram: histogram,
        latency_series,
    })
}

/// Smallest latency, or 0 when `latencies` is empty.
#[must_use]
pub fn min_latency(latencies: &[u64]) -> u64 {
    latencies.iter().copied().min().unwrap_or(0)
}

/// Largest latency, or 0 when `latencies` is empty.
#[must_use]
pub fn max_latency(latencies: &[u64]) -> u64 {
    latencies.iter().copied().max().unwrap_or(0)
}

/// Integer mean of `latencies`, `None` when empty. The sum is accumulated in
/// 128 bits so it cannot overflow.
#[must_use]
pub fn average_latency(latencies: &[u64]) -> Option<u64> {
    if latencies.is_empty() {
        return None;
    }
    let total: u128 = latencies.iter().map(|&l| u128::from(l)).sum();
    let mean = total / latencies.len() as u128;
    // mean <= max(latencies) <= u64::MAX
    u64::try_from(mean).ok()
}

/// Latency at the 99th percentile rank, or 0 when `latencies` is empty.
#[must_use]
pub fn p99_latency(latencies: &[u64]) -> u64 {
    percentile(latencies, TAIL_QUANTILE)
}

/// Value at rank `floor(len * quantile)` of an ascending-sorted copy of
/// `latencies`, or 0 when `latencies` is empty. `quantile` is clamped to
/// `[0, 1]`.
#[must_use]
pub fn percentile(latencies: &[u64], quantile: f64) -> u64 {
    if latencies.is_empty() {
        return 0;
    }
    let mut sorted = latencies.to_vec();
    sorted.sort_unstable();

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let rank = (sorted.len() as f64 * quantile.clamp(0.0, 1.0)) as usize;
    sorted[rank.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn record(sequence: u64, status_code: u16, latency_nanos: u64) -> Record {
        Record {
            sequence,
            status_code,
            latency_nanos,
            timestamp: format!("t{sequence}"),
        }
    }

    fn scenario() -> Vec<Record> {
        vec![
            record(0, 200, 1_000_000),
            record(1, 200, 3_000_000),
            record(2, 500, 2_000_000),
        ]
    }

    #[test]
    fn scenario_report() {
        let report = summarize(&scenario()).expect("non-empty");

        assert_eq!(report.count, 3);
        assert_eq!(format!("{:.2}", report.success_rate), "66.67");
        assert_eq!(report.min_latency, 1_000_000);
        assert_eq!(report.max_latency, 3_000_000);
        assert_eq!(report.avg_latency, 2_000_000);
        // floor(3 * 0.99) = 2 over the sorted latencies
        assert_eq!(report.p99_latency, 3_000_000);

        let mut histogram: Vec<(u16, u64)> = report
            .status_code_histogram
            .iter()
            .map(|(code, count)| (*code, *count))
            .collect();
        histogram.sort_unstable();
        assert_eq!(histogram, vec![(200, 2), (500, 1)]);

        assert_eq!(report.latency_series, vec![(0, 1.0), (1, 3.0), (2, 2.0)]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(summarize(&[]), Err(Error::EmptyInput));
    }

    #[test]
    fn helpers_define_empty_as_zero() {
        assert_eq!(min_latency(&[]), 0);
        assert_eq!(max_latency(&[]), 0);
        assert_eq!(p99_latency(&[]), 0);
        assert_eq!(average_latency(&[]), None);
    }

    #[test]
    fn single_record_is_its_own_p99() {
        assert_eq!(p99_latency(&[42]), 42);
        let report = summarize(&[record(0, 404, 42)]).expect("non-empty");
        assert_eq!(report.p99_latency, 42);
        assert!(report.success_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn p99_uses_floor_rank() {
        let hundred: Vec<u64> = (1..=100).rev().collect();
        // floor(100 * 0.99) = 99, the largest value
        assert_eq!(p99_latency(&hundred), 100);

        let two_hundred: Vec<u64> = (1..=200).collect();
        // floor(200 * 0.99) = 198
        assert_eq!(p99_latency(&two_hundred), 199);
    }

    #[test]
    fn percentile_clamps_quantile() {
        let values = [5, 1, 3];
        assert_eq!(percentile(&values, 0.0), 1);
        assert_eq!(percentile(&values, 1.0), 5);
        assert_eq!(percentile(&values, 7.0), 5);
        assert_eq!(percentile(&values, -1.0), 1);
    }

    #[test]
    fn average_truncates() {
        assert_eq!(average_latency(&[1, 2]), Some(1));
        assert_eq!(average_latency(&[u64::MAX, u64::MAX]), Some(u64::MAX));
    }

    #[test]
    fn summarize_does_not_reorder_input() {
        let records = scenario();
        let before = records.clone();
        let _ = summarize(&records).expect("non-empty");
        assert_eq!(records, before);
    }

    fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec((any::<u16>(), any::<u64>()), 1..256).prop_map(|rows| {
            rows.into_iter()
                .zip(0u64..)
                .map(|((code, latency), sequence)| record(sequence, code, latency))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn latency_ordering_holds(records in records_strategy()) {
            let report = summarize(&records).expect("non-empty");
            prop_assert!(report.min_latency <= report.avg_latency);
            prop_assert!(report.avg_latency <= report.max_latency);
            prop_assert!(report.min_latency <= report.p99_latency);
            prop_assert!(report.p99_latency <= report.max_latency);
        }

        #[test]
        fn histogram_counts_every_record(records in records_strategy()) {
            let report = summarize(&records).expect("non-empty");
            let total: u64 = report.status_code_histogram.values().sum();
            prop_assert_eq!(total, records.len() as u64);
            for record in &records {
                prop_assert!(report.status_code_histogram.contains_key(&record.status_code));
            }
        }

        #[test]
        fn success_rate_is_a_percentage(records in records_strategy()) {
            let report = summarize(&records).expect("non-empty");
            prop_assert!((0.0..=100.0).contains(&report.success_rate));
        }

        #[test]
        fn series_follows_input_order(records in records_strategy()) {
            let report = summarize(&records).expect("non-empty");
            prop_assert_eq!(report.latency_series.len(), records.len());
            for (idx, ((x, y), record)) in report.latency_series.iter().zip(&records).enumerate() {
                prop_assert_eq!(*x, idx);
                prop_assert_eq!(y.to_bits(), record.latency_millis().to_bits());
            }
        }

        #[test]
        fn summarize_is_idempotent(records in records_strategy()) {
            let first = summarize(&records).expect("non-empty");
            let second = summarize(&records).expect("non-empty");
            prop_assert_eq!(first.success_rate.to_bits(), second.success_rate.to_bits());
            prop_assert_eq!(first, second);
        }
    }
}
