//! BigBuy catalog/stock REST API client and payload transformer.
//!
//! [`client::BigBuyClient`] talks to the wholesale API; [`transform`] turns
//! its loosely-typed payloads into the storefront's canonical records.

pub mod client;
pub mod error;
pub mod transform;
pub mod types;

pub use client::{BigBuyClient, ProductFilter, MAX_PAGE_SIZE};
pub use error::BigBuyError;
pub use transform::{to_admin_seo, to_product_record};
pub use types::{ProductPage, RawCategory, RawProduct, RawStock};
