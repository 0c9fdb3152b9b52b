//! End-to-end import: sample the local dataset, synthesize documents, load them.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use reviewseed_core::{Catalog, ImportConfig, Result};
use reviewseed_ingest::{build_batch, DatasetReader, Sampler};
use reviewseed_store::{DocumentStore, LoadReport, Loader};

use crate::download::ensure_dataset;

/// Outcome of an import run.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// `(name, total, positive, negative)` per catalog product.
    pub products: Vec<(String, usize, usize, usize)>,
    pub report: LoadReport,
    /// Whether the store answered its ping before loading.
    pub store_reachable: bool,
}

impl ImportSummary {
    /// Human-readable per-product lines.
    pub fn lines(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|(name, total, positive, negative)| {
                format!(
                    "  - {}: {}件 (positive {}, negative {})",
                    name, total, positive, negative
                )
            })
            .collect()
    }
}

/// Download (unless skipped) and import.
pub async fn run_import(config: &ImportConfig, catalog: &Catalog) -> Result<ImportSummary> {
    if config.skip_download {
        info!("Skipping download, using files under {}", config.dataset.root.display());
    } else {
        info!("Preparing dataset under {}", config.dataset.root.display());
        ensure_dataset(&config.dataset, config.force_download).await?;
    }
    load_dataset(config, catalog)
}

/// Import from dataset files already on disk.
///
/// Sampling fails before the store is opened when any bucket falls short,
/// so an insufficient dataset never leaves a partial write.
pub fn load_dataset(config: &ImportConfig, catalog: &Catalog) -> Result<ImportSummary> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut reader = DatasetReader::new(&config.dataset);
    let buckets = Sampler::new(catalog, config.per_sentiment).sample(reader.by_ref(), &mut rng)?;
    info!("Read {} dataset records", reader.records_read());

    let batch = build_batch(catalog, &buckets, &mut rng, Utc::now())?;

    let store = DocumentStore::open(&config.store)?;
    let store_reachable = check_reachable(store.label(), store.ping());

    let report = Loader::new(&store).load(
        catalog,
        &batch.products,
        &batch.reviews,
        config.keep_existing,
        Utc::now(),
    )?;

    Ok(ImportSummary {
        products: batch.summary(catalog),
        report,
        store_reachable,
    })
}

/// Log a failed ping as a warning. The import goes on either way.
fn check_reachable(label: &str, ping: Result<()>) -> bool {
    match ping {
        Ok(()) => true,
        Err(e) => {
            warn!("Store ping failed for {}: {}", label, e);
            false
        }
    }
}
