use thiserror::Error;

/// Errors returned by the BigBuy API client.
#[derive(Debug, Error)]
pub enum BigBuyError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist upstream.
    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx response; carries the upstream status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not parseable.
    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
