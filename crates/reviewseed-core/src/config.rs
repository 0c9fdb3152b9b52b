//! Import run configuration and data directory layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Reviews kept per (product, sentiment) when nothing else is requested.
pub const DEFAULT_PER_SENTIMENT: usize = 30;
/// Seed for the run's random source.
pub const DEFAULT_SEED: u64 = 42;
/// Database name used when neither the CLI nor the environment names one.
pub const DEFAULT_STORE_DB: &str = "review-system";

pub const ENV_STORE_URI: &str = "REVIEWSEED_STORE_URI";
pub const ENV_STORE_DB: &str = "REVIEWSEED_STORE_DB";

/// Dataset splits, in the order they are streamed.
pub const SPLITS: &[&str] = &["train", "validation", "test"];

/// Paths to the per-split JSONL files under a data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPaths {
    pub root: PathBuf,
    /// `(split, path)` in streaming order.
    pub splits: Vec<(String, PathBuf)>,
}

impl DatasetPaths {
    /// `{root}/amazon_reviews_{split}.jsonl` for every split. Does not touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let splits = SPLITS
            .iter()
            .map(|split| {
                (
                    split.to_string(),
                    root.join(format!("amazon_reviews_{}.jsonl", split)),
                )
            })
            .collect();
        Self { root, splits }
    }
}

/// Where the document store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLocation {
    /// Store URI with quoting and any `sqlite://` scheme removed.
    pub uri: String,
    pub db_name: String,
}

impl StoreLocation {
    /// Resolve the store location from explicit values, falling back to
    /// `REVIEWSEED_STORE_URI` / `REVIEWSEED_STORE_DB`. A missing URI is fatal.
    pub fn resolve(uri: Option<&str>, db_name: Option<&str>) -> Result<Self> {
        let env_uri = std::env::var(ENV_STORE_URI).ok();
        let env_db = std::env::var(ENV_STORE_DB).ok();
        if uri.is_none() && env_uri.is_some() {
            debug!("Store URI taken from {}", ENV_STORE_URI);
        }
        if db_name.is_none() && env_db.is_some() {
            debug!("Store database name taken from {}", ENV_STORE_DB);
        }
        Self::from_parts(
            uri.or(env_uri.as_deref()),
            db_name.or(env_db.as_deref()),
        )
    }

    /// Build a location without consulting the environment.
    pub fn from_parts(uri: Option<&str>, db_name: Option<&str>) -> Result<Self> {
        let uri = uri.map(clean_value).unwrap_or_default();
        if uri.is_empty() {
            return Err(Error::Config(format!(
                "store URI is not set; pass --store-uri or set {}",
                ENV_STORE_URI
            )));
        }
        let uri = uri
            .strip_prefix("sqlite://")
            .map(str::to_string)
            .unwrap_or(uri);

        let db_name = db_name
            .map(clean_value)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_DB.to_string());

        Ok(Self { uri, db_name })
    }

    pub fn is_memory(&self) -> bool {
        self.uri == ":memory:"
    }

    /// Database file for this location, `None` for an in-memory store.
    pub fn db_path(&self) -> Option<PathBuf> {
        if self.is_memory() {
            None
        } else {
            Some(Path::new(&self.uri).join(format!("{}.db", self.db_name)))
        }
    }
}

/// Strip surrounding whitespace and one layer of quotes, as pasted from `.env` files.
fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

/// Everything an import run needs, assembled from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub dataset: DatasetPaths,
    pub per_sentiment: usize,
    pub force_download: bool,
    pub skip_download: bool,
    pub keep_existing: bool,
    pub seed: u64,
    pub store: StoreLocation,
}

impl ImportConfig {
    pub fn new(data_dir: impl AsRef<Path>, store: StoreLocation) -> Self {
        Self {
            dataset: DatasetPaths::new(data_dir),
            per_sentiment: DEFAULT_PER_SENTIMENT,
            force_download: false,
            skip_download: false,
            keep_existing: false,
            seed: DEFAULT_SEED,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_dataset_paths() {
        let paths = DatasetPaths::new("data/amazon_reviews");
        let names: Vec<&str> = paths.splits.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["train", "validation", "test"]);
        assert_eq!(
            paths.splits[1].1,
            PathBuf::from("data/amazon_reviews/amazon_reviews_validation.jsonl")
        );
    }

    #[test]
    fn test_missing_uri_is_config_error() {
        let err = StoreLocation::from_parts(None, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = StoreLocation::from_parts(Some("  \"\" "), None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_uri_is_cleaned() {
        let loc = StoreLocation::from_parts(Some(" \"sqlite:///var/lib/seed\" "), Some("'shop'"))
            .unwrap();
        assert_eq!(loc.uri, "/var/lib/seed");
        assert_eq!(loc.db_name, "shop");
        assert_eq!(loc.db_path(), Some(PathBuf::from("/var/lib/seed/shop.db")));
    }

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets or clears an environment variable, restoring the old value on drop.
    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let previous = std::env::var(key).ok();
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_resolve_reads_environment_and_flags_win() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let _uri = EnvGuard::set(ENV_STORE_URI, Some("\"sqlite:///srv/seed\""));
        let _db = EnvGuard::set(ENV_STORE_DB, Some("from-env"));
        let loc = StoreLocation::resolve(None, None).unwrap();
        assert_eq!(loc.uri, "/srv/seed");
        assert_eq!(loc.db_name, "from-env");

        let loc = StoreLocation::resolve(Some("/tmp/flag"), Some("flag-db")).unwrap();
        assert_eq!(loc.uri, "/tmp/flag");
        assert_eq!(loc.db_name, "flag-db");

        let _db = EnvGuard::set(ENV_STORE_DB, None);
        let loc = StoreLocation::resolve(None, None).unwrap();
        assert_eq!(loc.db_name, DEFAULT_STORE_DB);
        assert_eq!(loc.db_name, "review-system");
    }

    #[test]
    fn test_resolve_without_uri_anywhere_fails() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let _uri = EnvGuard::set(ENV_STORE_URI, None);
        let err = StoreLocation::resolve(None, Some("shop")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_db_name_and_memory() {
        let loc = StoreLocation::from_parts(Some(":memory:"), None).unwrap();
        assert_eq!(loc.db_name, DEFAULT_STORE_DB);
        assert!(loc.is_memory());
        assert!(loc.db_path().is_none());
    }
}
