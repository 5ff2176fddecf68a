use thiserror::Error;

/// Errors surfaced by the sync/import pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `BIGBUY_API_KEY` is not configured. A hard precondition failure:
    /// nothing is fetched or written, and nothing is retried.
    #[error("BigBuy API key is not configured; pipeline unavailable")]
    MissingApiKey,

    /// Upstream call failed. In bulk flows these are caught per item and
    /// only reach here from single-item flows (detail fetch, stock check).
    #[error(transparent)]
    Upstream(#[from] greengoods_bigbuy::BigBuyError),

    /// Store write/read failure; propagates as a generic internal error.
    #[error(transparent)]
    Db(#[from] greengoods_db::DbError),
}
