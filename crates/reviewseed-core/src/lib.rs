//! reviewseed core — error type, product catalog, import configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod sentiment;

pub use catalog::{Catalog, CategoryRule, ProductConfig, FALLBACK_CATEGORY};
pub use config::{
    DatasetPaths, ImportConfig, StoreLocation, DEFAULT_PER_SENTIMENT, DEFAULT_SEED,
    DEFAULT_STORE_DB, SPLITS,
};
pub use error::{Error, Result, Shortage};
pub use sentiment::Sentiment;
