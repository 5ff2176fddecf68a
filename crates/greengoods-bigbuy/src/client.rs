//! HTTP client for the BigBuy catalog/stock REST API.
//!
//! Wraps `reqwest` with bearer-token auth, fixed timeouts, and typed
//! response deserialization. There is no automatic retry: a failed call
//! surfaces immediately and the caller decides whether to continue with the
//! remaining items.

use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, StatusCode, Url};

use crate::error::BigBuyError;
use crate::types::{ProductPage, RawCategory, RawProduct, RawStock};

const DEFAULT_BASE_URL: &str = "https://api.bigbuy.eu/";

/// Upstream page-size ceiling; caller-supplied limits are clamped to this.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filter for catalog search.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl ProductFilter {
    /// Limit actually sent upstream: at least 1, at most [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Client for the BigBuy REST API.
///
/// Manages the HTTP client, API key, and base URL. Use [`BigBuyClient::new`]
/// for production or [`BigBuyClient::with_base_url`] to point at a mock
/// server in tests.
pub struct BigBuyClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl BigBuyClient {
    /// Creates a new client pointed at the production BigBuy API.
    ///
    /// # Errors
    ///
    /// Returns [`BigBuyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, BigBuyError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`BigBuyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BigBuyError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, BigBuyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("greengoods/0.1 (catalog-sync)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join treats it as a directory rather than replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BigBuyError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Searches the catalog with optional keyword and category filters.
    ///
    /// The requested limit is clamped to [`MAX_PAGE_SIZE`] before the call.
    ///
    /// # Errors
    ///
    /// - [`BigBuyError::UnexpectedStatus`] / [`BigBuyError::NotFound`] on a
    ///   non-2xx response.
    /// - [`BigBuyError::Http`] on network failure or timeout.
    /// - [`BigBuyError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search_products(&self, filter: &ProductFilter) -> Result<ProductPage, BigBuyError> {
        let mut url = self.endpoint("catalog/products");
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = &filter.query {
                pairs.append_pair("query", query);
            }
            if let Some(category) = &filter.category {
                pairs.append_pair("category", category);
            }
            pairs.append_pair("limit", &filter.clamped_limit().to_string());
            pairs.append_pair("offset", &filter.offset.to_string());
        }

        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| BigBuyError::Deserialize {
            context: format!("search_products(offset={})", filter.offset),
            source: e,
        })
    }

    /// Fetches full product details by upstream id.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`BigBuyClient::search_products`]; an unknown id
    /// surfaces as [`BigBuyError::NotFound`].
    pub async fn fetch_product_detail(&self, external_id: &str) -> Result<RawProduct, BigBuyError> {
        let url = self.endpoint(&format!("catalog/products/{external_id}"));
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| BigBuyError::Deserialize {
            context: format!("fetch_product_detail(id={external_id})"),
            source: e,
        })
    }

    /// Fetches the current stock quantity for one product.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`BigBuyClient::search_products`].
    pub async fn fetch_stock(&self, external_id: &str) -> Result<RawStock, BigBuyError> {
        let url = self.endpoint(&format!("catalog/products/{external_id}/stock"));
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| BigBuyError::Deserialize {
            context: format!("fetch_stock(id={external_id})"),
            source: e,
        })
    }

    /// Fetches the upstream category tree (flat list).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`BigBuyClient::search_products`].
    pub async fn fetch_categories(&self) -> Result<Vec<RawCategory>, BigBuyError> {
        let url = self.endpoint("catalog/categories");
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| BigBuyError::Deserialize {
            context: "fetch_categories".to_string(),
            source: e,
        })
    }

    /// Joins a relative API path onto the configured base URL.
    fn endpoint(&self, path: &str) -> Url {
        // Base URL is normalised with a trailing slash in the constructor,
        // and our paths are relative, so join cannot fail.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// Sends an authenticated GET, maps the status, and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BigBuyError::Http`] on network failure,
    /// [`BigBuyError::NotFound`] on 404, [`BigBuyError::UnexpectedStatus`]
    /// on any other non-2xx, and [`BigBuyError::Deserialize`] if the body is
    /// not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, BigBuyError> {
        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BigBuyError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(BigBuyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BigBuyError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
