//! Console rendering of a [`Report`]'s headline numbers.

use std::fmt;

use crate::analyze::Report;

#[allow(clippy::cast_precision_loss)]
fn millis(nanos: u64) -> f64 {
    nanos as f64 / 1e6
}

/// Displays the success rate and latency scalars of a [`Report`], one per
/// line, latencies in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a>(pub &'a Report);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Success Rate: {:.2}%", report.success_rate)?;
        writeln!(f, "Average Latency: {:.2} ms", millis(report.avg_latency))?;
        writeln!(f, "Minimum Latency: {:.2} ms", millis(report.min_latency))?;
        writeln!(f, "Maximum Latency: {:.2} ms", millis(report.max_latency))?;
        write!(f, "p99 Latency: {:.2} ms", millis(report.p99_latency))
    }
}
