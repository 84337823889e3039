mod baseline;
mod catalog;
mod config;
mod error;
mod fetcher;
mod pipeline;
mod report;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::baseline::BaselineStore;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::PriceFetcher;
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let catalog = Catalog::load(&cfg.catalog_path).await?;
    info!(
        "Starting price collection: {} items from {} (app {})",
        catalog.len(),
        cfg.catalog_path.display(),
        cfg.app_id,
    );

    let pipeline = Pipeline::new(
        catalog,
        BaselineStore::new(&cfg.baseline_path),
        PriceFetcher::new(&cfg)?,
        cfg.report_path.clone(),
        cfg.request_delay,
    );
    let summary = pipeline.run().await?;

    info!(
        tracked = summary.tracked,
        priced = summary.priced,
        failed = summary.failed,
        "Done: {}/{} items priced, report at {}",
        summary.priced,
        summary.tracked,
        summary.report_path.display(),
    );
    Ok(())
}
