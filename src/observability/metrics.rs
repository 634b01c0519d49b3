//! Prometheus-style counters for report runs.
//!
//! Recording goes through the `metrics` facade, so every function here is a
//! no-op until [`init`] installs the Prometheus recorder.

use std::fmt;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

use crate::error::{PipelineError, Result};

/// Every metric name the crate emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsProcessed,
    BarcodeMatches,
    UnparsableDates,
    Runs,
    RunDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsProcessed => "retail_reports_rows_processed_total",
            MetricName::BarcodeMatches => "retail_reports_barcode_matches_total",
            MetricName::UnparsableDates => "retail_reports_unparsable_dates_total",
            MetricName::Runs => "retail_reports_runs_total",
            MetricName::RunDuration => "retail_reports_run_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [RowsProcessed, BarcodeMatches, UnparsableDates, Runs, RunDuration].into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it again returns the same handle.
pub fn init() -> Result<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| PipelineError::Config(format!("Failed to install Prometheus recorder: {}", e)))?;
    let handle = METRICS_HANDLE.get_or_init(|| handle).clone();
    info!("Metrics system initialized");
    Ok(handle)
}

// ============================================================================
// Pipeline Metrics
// ============================================================================

pub mod pipeline {
    use super::MetricName;
    use crate::pipeline::processing::barcode::{BarcodeMatch, BarcodeStats};

    /// Rows emitted for one report
    pub fn rows_processed(report: &str, rows: usize) {
        ::metrics::counter!(MetricName::RowsProcessed.as_str(), "report" => report.to_string())
            .increment(rows as u64);
    }

    /// Barcode match counts per tier for one report
    pub fn barcode_matches(report: &str, stats: &BarcodeStats) {
        let tiers = [
            (BarcodeMatch::ProductColorSize, stats.product_color_size),
            (BarcodeMatch::ProductColor, stats.product_color),
            (BarcodeMatch::Product, stats.product),
            (BarcodeMatch::Unmatched, stats.unmatched),
        ];
        for (tier, count) in tiers {
            if count == 0 {
                continue;
            }
            ::metrics::counter!(
                MetricName::BarcodeMatches.as_str(),
                "report" => report.to_string(),
                "tier" => tier.as_str()
            )
            .increment(count as u64);
        }
    }

    /// Date values that could not be parsed and were nulled
    pub fn unparsable_dates(column: &str, count: u64) {
        ::metrics::counter!(MetricName::UnparsableDates.as_str(), "column" => column.to_string())
            .increment(count);
    }

    /// One orchestrator run finished with `status` ("success" or "error")
    pub fn run_finished(status: &'static str, secs: f64) {
        ::metrics::counter!(MetricName::Runs.as_str(), "status" => status).increment(1);
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(secs);
    }
}
