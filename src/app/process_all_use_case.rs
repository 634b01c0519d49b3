use std::time::Instant;

use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::app::ports::{RawSnapshotSource, ReportOutputPort};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::processors::{
    process_ecommerce, process_entries, process_inventory, process_products, process_sales,
    PipelineSettings,
};
use crate::types::{ProcessedReports, RawSnapshot};

/// Runs all five report processors over one fetched snapshot
pub struct ProcessAllUseCase {
    source: Box<dyn RawSnapshotSource>,
    settings: PipelineSettings,
}

impl ProcessAllUseCase {
    pub fn new(source: Box<dyn RawSnapshotSource>, settings: PipelineSettings) -> Self {
        Self { source, settings }
    }

    /// Fetch one snapshot and build every report from it.
    ///
    /// A fetch failure is returned as is; no report is produced in that case.
    pub async fn process_all(&self) -> Result<ProcessedReports> {
        let run_id = Uuid::new_v4();
        let span = info_span!("process_all", %run_id);

        async {
            let started = Instant::now();
            let snapshot = match self.source.fetch().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!(error = %e, "Raw snapshot fetch failed");
                    metrics::pipeline::run_finished("error", started.elapsed().as_secs_f64());
                    return Err(e);
                }
            };
            debug!(
                products = snapshot.products.len(),
                inventory = snapshot.inventory.len(),
                sales = snapshot.sales.len(),
                ecommerce = snapshot.ecommerce.len(),
                entries = snapshot.entries.len(),
                barcodes = snapshot.barcodes.len(),
                colors = snapshot.colors.len(),
                "Fetched raw snapshot"
            );

            let reports = self.process_snapshot(&snapshot);
            metrics::pipeline::run_finished("success", started.elapsed().as_secs_f64());
            info!(
                total_rows = reports.total_rows(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Report run finished"
            );
            Ok(reports)
        }
        .instrument(span)
        .await
    }

    /// Process a snapshot and hand the reports to `output`.
    pub async fn process_and_export(&self, output: &dyn ReportOutputPort) -> Result<ProcessedReports> {
        let reports = self.process_all().await?;
        output.write_reports(&reports).await?;
        Ok(reports)
    }

    /// Build every report from an already fetched snapshot.
    ///
    /// Products are processed once and shared by inventory and entries.
    pub fn process_snapshot(&self, snapshot: &RawSnapshot) -> ProcessedReports {
        let settings = &self.settings;

        let products = process_products(&snapshot.products, &snapshot.barcodes, settings);
        let inventory = process_inventory(&snapshot.inventory, &products, &snapshot.barcodes, settings);
        let entries = process_entries(&snapshot.entries, &products, &snapshot.colors, settings);
        let sales = process_sales(&snapshot.sales, &snapshot.barcodes, settings);
        let ecommerce = process_ecommerce(&snapshot.ecommerce, settings);

        let reports = ProcessedReports {
            products,
            inventory,
            sales,
            ecommerce,
            entries,
        };

        for (report, rows) in reports.named() {
            info!(report, rows = rows.len(), "Report processed");
            metrics::pipeline::rows_processed(report, rows.len());
        }
        reports
    }
}
