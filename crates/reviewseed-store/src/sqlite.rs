//! SQLite-backed document store with `products` and `reviews` collections.
//!
//! Documents are stored whole as JSON text next to the few columns needed to
//! key and filter them.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::{COLLECTION_PRODUCTS, COLLECTION_REVIEWS, SCHEMA_SQL};
use crate::types::*;
use reviewseed_core::{Error, Result, StoreLocation};

/// How long a statement waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

/// Document store over a single SQLite connection.
pub struct DocumentStore {
    conn: Mutex<Connection>,
    label: String,
}

impl DocumentStore {
    /// Open (or create) the store described by `location`.
    pub fn open(location: &StoreLocation) -> Result<Self> {
        match location.db_path() {
            Some(path) => Self::open_path(&path),
            None => Self::open_in_memory(),
        }
    }

    /// Open a store file directly, creating its parent directory if needed.
    pub fn open_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::Database(e.to_string()))?;
            }
        }
        let conn = Connection::open(db_path).map_err(db_err)?;
        Self::from_connection(conn, db_path.display().to_string())
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, label: String) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT).map_err(db_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            label,
        };
        info!(
            "DocumentStore opened: {} {}, {} {}, path={}",
            store.count_products()?,
            COLLECTION_PRODUCTS,
            store.count_reviews(None)?,
            COLLECTION_REVIEWS,
            store.label
        );
        Ok(store)
    }

    /// Where this store lives, for logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cheap round trip to confirm the connection answers queries.
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(db_err)?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Products
    // ---------------------------------------------------------------

    /// Insert or update a product by `productId`.
    ///
    /// `createdAt` is only taken from `doc` when the product is new; an
    /// existing product keeps its original value. `updatedAt` is always set to
    /// `now`. Returns `true` if the product was inserted.
    pub fn upsert_product(&self, doc: &ProductDocument, now: DateTime<Utc>) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;

        let existing_created: Option<String> = tx
            .query_row(
                "SELECT created_at FROM products WHERE product_id = ?1",
                params![doc.product_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;

        let mut stored = doc.clone();
        stored.updated_at = now;
        if let Some(created) = &existing_created {
            stored.created_at = parse_timestamp(created)?;
        }
        let json = serde_json::to_string(&stored)?;

        tx.execute(
            "INSERT INTO products (product_id, doc_json, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(product_id) DO UPDATE SET \
                doc_json = excluded.doc_json, updated_at = excluded.updated_at",
            params![
                stored.product_id,
                json,
                stored.created_at.to_rfc3339(),
                stored.updated_at.to_rfc3339(),
            ],
        )
        .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        let inserted = existing_created.is_none();
        debug!(
            "{} product {}",
            if inserted { "Inserted" } else { "Updated" },
            doc.product_id
        );
        Ok(inserted)
    }

    /// Get a product by id.
    pub fn get_product(&self, product_id: &str) -> Result<Option<ProductDocument>> {
        let conn = self.conn.lock();
        let json: Option<String> = conn
            .prepare_cached("SELECT doc_json FROM products WHERE product_id = ?1")
            .map_err(db_err)?
            .query_row(params![product_id], |row| row.get(0))
            .optional()
            .map_err(db_err)?;
        json.map(|j| serde_json::from_str(&j).map_err(Error::from))
            .transpose()
    }

    pub fn count_products(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .map_err(db_err)
    }

    // ---------------------------------------------------------------
    // Reviews
    // ---------------------------------------------------------------

    /// Write one product's review set in a single transaction.
    ///
    /// Unless `keep_existing` is set, the product's existing reviews are
    /// deleted first. Returns `(deleted, inserted)`.
    pub fn replace_reviews(
        &self,
        product_id: &str,
        reviews: &[ReviewDocument],
        keep_existing: bool,
    ) -> Result<(usize, usize)> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;

        let deleted = if keep_existing {
            0
        } else {
            tx.execute(
                "DELETE FROM reviews WHERE product_id = ?1",
                params![product_id],
            )
            .map_err(db_err)?
        };

        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO reviews (review_id, product_id, doc_json, created_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(db_err)?;
            for review in reviews {
                let json = serde_json::to_string(review)?;
                stmt.execute(params![
                    review.review_id,
                    review.product_id,
                    json,
                    review.created_at.to_rfc3339(),
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        Ok((deleted, reviews.len()))
    }

    /// Reviews of a product in insertion order.
    pub fn reviews_for_product(&self, product_id: &str) -> Result<Vec<ReviewDocument>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT doc_json FROM reviews WHERE product_id = ?1 ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![product_id], |row| row.get::<_, String>(0))
            .map_err(db_err)?;
        let mut reviews = Vec::new();
        for row in rows {
            let json = row.map_err(db_err)?;
            reviews.push(serde_json::from_str(&json)?);
        }
        Ok(reviews)
    }

    /// Count reviews, optionally for one product.
    pub fn count_reviews(&self, product_id: Option<&str>) -> Result<i64> {
        let conn = self.conn.lock();
        match product_id {
            Some(id) => conn.query_row(
                "SELECT COUNT(*) FROM reviews WHERE product_id = ?1",
                params![id],
                |row| row.get(0),
            ),
            None => conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0)),
        }
        .map_err(db_err)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Database(format!("Bad timestamp {:?}: {}", value, e)))
}
