pub mod diagram;
pub mod explorer;

use anyhow::Result;
use holomap_client::{ClientConfig, SwapiClient};
use std::sync::Arc;
use tokio::runtime::Handle;

pub use explorer::{ExplorerApp, ExplorerMessage, LogLevel, run_explorer};

/// Open the interactive explorer against the configured catalog.
///
/// Blocks until the user quits. Fetches run on `runtime`.
pub fn run(config: &ClientConfig, runtime: Handle) -> Result<()> {
    let client = SwapiClient::new(config)?;
    run_explorer(Arc::new(client), config.page_size, runtime)
}
