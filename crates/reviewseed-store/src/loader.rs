//! Loads built product and review documents into the store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reviewseed_core::{Catalog, Result};
use tracing::info;

use crate::schema::{COLLECTION_PRODUCTS, COLLECTION_REVIEWS};
use crate::sqlite::DocumentStore;
use crate::types::{ProductDocument, ReviewDocument};

/// Counts of what one load wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub products_inserted: usize,
    pub products_updated: usize,
    pub reviews_deleted: usize,
    pub reviews_inserted: usize,
}

/// Writes documents to a [`DocumentStore`].
pub struct Loader<'a> {
    store: &'a DocumentStore,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Upsert every product document by `productId`, stamping `updatedAt` with `now`.
    pub fn upsert_products(
        &self,
        products: &[ProductDocument],
        now: DateTime<Utc>,
        report: &mut LoadReport,
    ) -> Result<()> {
        for product in products {
            if self.store.upsert_product(product, now)? {
                report.products_inserted += 1;
            } else {
                report.products_updated += 1;
            }
        }
        Ok(())
    }

    /// Write each catalog product's review set, in catalog order.
    ///
    /// Products without reviews are left untouched. Unless `keep_existing`
    /// is set, a product's previous reviews are replaced.
    pub fn insert_reviews(
        &self,
        catalog: &Catalog,
        product_reviews: &HashMap<String, Vec<ReviewDocument>>,
        keep_existing: bool,
        report: &mut LoadReport,
    ) -> Result<()> {
        for product in &catalog.products {
            let reviews = match product_reviews.get(&product.id) {
                Some(r) if !r.is_empty() => r,
                _ => continue,
            };
            let (deleted, inserted) =
                self.store
                    .replace_reviews(&product.id, reviews, keep_existing)?;
            report.reviews_deleted += deleted;
            report.reviews_inserted += inserted;
            info!(
                "Loaded {} {} for {} (removed {})",
                inserted, COLLECTION_REVIEWS, product.id, deleted
            );
        }
        Ok(())
    }

    /// Upsert products, then write reviews.
    pub fn load(
        &self,
        catalog: &Catalog,
        products: &[ProductDocument],
        product_reviews: &HashMap<String, Vec<ReviewDocument>>,
        keep_existing: bool,
        now: DateTime<Utc>,
    ) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.upsert_products(products, now, &mut report)?;
        self.insert_reviews(catalog, product_reviews, keep_existing, &mut report)?;
        info!(
            "Load complete: {} inserted={}, updated={}; {} inserted={}, deleted={}",
            COLLECTION_PRODUCTS,
            report.products_inserted,
            report.products_updated,
            COLLECTION_REVIEWS,
            report.reviews_inserted,
            report.reviews_deleted
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentenceEntity;
    use chrono::TimeZone;
    use reviewseed_core::Sentiment;

    fn review(product_id: &str, index: usize) -> ReviewDocument {
        let review_id = format!("{}-rev-{:04}", product_id, index);
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        ReviewDocument {
            review_id: review_id.clone(),
            product_id: product_id.to_string(),
            product_slug: "slug".into(),
            dataset_id: format!("d{}", index),
            dataset_label: 0,
            dataset_split: "test".into(),
            sentiment: Sentiment::Negative,
            rating: 1,
            title: "残念".into(),
            content: "残念でした。".into(),
            user_id: format!("user-{}", review_id),
            user_name: format!("ユーザー{:04}", index),
            user_avatar: String::new(),
            verified_purchase: false,
            helpful_votes: 0,
            total_votes: 0,
            created_at: at,
            updated_at: at,
            language: "ja".into(),
            sentences: vec![SentenceEntity::new("s".into(), "残念でした。".into())],
        }
    }

    fn product(id: &str) -> ProductDocument {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        ProductDocument {
            product_id: id.to_string(),
            slug: id.to_string(),
            name: id.to_string(),
            category: "その他".into(),
            image: String::new(),
            price: 1500,
            description: String::new(),
            average_rating: 1.0,
            total_reviews: 2,
            created_at: at,
            updated_at: at,
        }
    }

    fn batch(catalog: &Catalog) -> HashMap<String, Vec<ReviewDocument>> {
        catalog
            .product_ids()
            .map(|id| (id.to_string(), vec![review(id, 1), review(id, 2)]))
            .collect()
    }

    #[test]
    fn test_reload_without_keep_existing_is_idempotent() {
        let store = DocumentStore::open_in_memory().unwrap();
        let catalog = Catalog::default();
        let products: Vec<_> = catalog.product_ids().map(product).collect();
        let reviews = batch(&catalog);
        let loader = Loader::new(&store);

        let first = loader.load(&catalog, &products, &reviews, false, Utc::now()).unwrap();
        assert_eq!(first.products_inserted, 3);
        let second = loader.load(&catalog, &products, &reviews, false, Utc::now()).unwrap();
        assert_eq!(second.products_updated, 3);
        assert_eq!(second.reviews_deleted, 6);

        for id in catalog.product_ids() {
            assert_eq!(store.count_reviews(Some(id)).unwrap(), 2);
        }
        assert_eq!(store.count_products().unwrap(), 3);
    }

    #[test]
    fn test_keep_existing_accumulates() {
        let store = DocumentStore::open_in_memory().unwrap();
        let catalog = Catalog::default();
        let reviews = batch(&catalog);
        let loader = Loader::new(&store);

        for _ in 0..3 {
            loader.load(&catalog, &[], &reviews, true, Utc::now()).unwrap();
        }
        for id in catalog.product_ids() {
            assert_eq!(store.count_reviews(Some(id)).unwrap(), 6);
        }
    }

    #[test]
    fn test_empty_review_set_leaves_product_untouched() {
        let store = DocumentStore::open_in_memory().unwrap();
        let catalog = Catalog::default();
        let loader = Loader::new(&store);

        let mut reviews = batch(&catalog);
        loader.load(&catalog, &[], &reviews, false, Utc::now()).unwrap();

        reviews.insert("prod-002".into(), Vec::new());
        loader.load(&catalog, &[], &reviews, false, Utc::now()).unwrap();
        assert_eq!(store.count_reviews(Some("prod-002")).unwrap(), 2);
    }
}
