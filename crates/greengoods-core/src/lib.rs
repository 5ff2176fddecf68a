pub mod app_config;
pub mod config;
pub mod product;
pub mod slug;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use product::{AdminSeo, ProductRecord, StockSnapshot, PRODUCT_ID_PREFIX};
pub use slug::{default_meta_description, default_meta_title, slugify};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
