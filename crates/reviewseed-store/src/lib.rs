//! reviewseed store — review/product documents, SQLite document store, loader.

pub mod loader;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use loader::{LoadReport, Loader};
pub use sqlite::DocumentStore;
pub use types::*;
