//! reviewseed — seed a review store from the Japanese Amazon review dataset.

pub mod download;
pub mod import;

pub use download::{dataset_url, download_file, ensure_dataset};
pub use import::{load_dataset, run_import, ImportSummary};
