//! The BigBuy synchronization pipeline: stock reconciliation and catalog
//! import flows, composed from the API client and the store adapter.

pub mod error;
pub mod import;
pub mod stock;

pub use error::PipelineError;
pub use import::{import_product, remove_product, search_products, update_pricing, SearchPage};
pub use stock::{sync_stock, RunType, SyncOptions, SyncOutcome};

use greengoods_bigbuy::BigBuyClient;
use greengoods_core::AppConfig;

/// Builds a BigBuy client from configuration.
///
/// This is the pipeline's configuration precondition: callers (HTTP handlers,
/// scheduled jobs, the CLI) go through here before any upstream I/O, so a
/// missing key aborts a run without a single fetch or write.
///
/// # Errors
///
/// Returns [`PipelineError::MissingApiKey`] when `BIGBUY_API_KEY` is not
/// configured, or [`PipelineError::Upstream`] if the HTTP client cannot be
/// constructed.
pub fn client_from_config(config: &AppConfig) -> Result<BigBuyClient, PipelineError> {
    let api_key = config
        .bigbuy_api_key
        .as_deref()
        .ok_or(PipelineError::MissingApiKey)?;
    Ok(BigBuyClient::new(
        api_key,
        config.bigbuy_request_timeout_secs,
    )?)
}
