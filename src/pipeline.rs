use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::baseline::BaselineStore;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::fetcher::PriceSource;
use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadBaseline,
    FetchAll,
    GenerateReport,
    PersistReport,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::LoadBaseline => "load_baseline",
            Stage::FetchAll => "fetch_all",
            Stage::GenerateReport => "generate_report",
            Stage::PersistReport => "persist_report",
            Stage::Done => "done",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub tracked: usize,
    pub priced: usize,
    pub failed: usize,
    pub report_path: PathBuf,
}

/// One monitoring run: baseline → sweep → report → disk. Strictly sequential;
/// the inter-request delay is what keeps the upstream from throttling us.
pub struct Pipeline<S> {
    catalog: Catalog,
    store: BaselineStore,
    source: S,
    report_path: PathBuf,
    request_delay: Duration,
}

impl<S: PriceSource> Pipeline<S> {
    pub fn new(
        catalog: Catalog,
        store: BaselineStore,
        source: S,
        report_path: PathBuf,
        request_delay: Duration,
    ) -> Self {
        Self { catalog, store, source, report_path, request_delay }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        enter(Stage::LoadBaseline);
        let baseline = self.store.load(&self.catalog).await?;
        info!("Baseline loaded from {} ({} records)", self.store.path().display(), baseline.len());

        enter(Stage::FetchAll);
        let prices = self.sweep().await;

        enter(Stage::GenerateReport);
        let report = report::generate(&self.catalog, &baseline, &prices);

        enter(Stage::PersistReport);
        report.save(&self.report_path).await?;
        info!("Report written to {} ({} items)", self.report_path.display(), report.len());

        enter(Stage::Done);
        Ok(RunSummary {
            tracked: self.catalog.len(),
            priced: prices.len(),
            failed: self.catalog.len() - prices.len(),
            report_path: self.report_path.clone(),
        })
    }

    /// Price every catalog item in order. A failed item is logged and skipped;
    /// the delay is applied after every item regardless of outcome.
    async fn sweep(&self) -> HashMap<String, f64> {
        let total = self.catalog.len();
        let mut prices = HashMap::with_capacity(total);

        for (i, id) in self.catalog.iter().enumerate() {
            info!("{}/{} - fetching price for: {id}", i + 1, total);
            match self.source.fetch_price(id).await {
                Ok(price) => {
                    info!(item = id, price, "  price: {price:.2}");
                    prices.insert(id.to_string(), price);
                }
                Err(e) => warn!(item = id, reason = %e, "  no price for {id}: {e}"),
            }

            tokio::time::sleep(self.request_delay).await;
        }

        prices
    }
}

fn enter(stage: Stage) {
    info!(stage = %stage, "Stage: {stage}");
}
