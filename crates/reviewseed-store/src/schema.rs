//! Database schema SQL for the document collections.

/// `products` is keyed by product id; `reviews` holds one row per review document.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    product_id TEXT PRIMARY KEY,
    doc_json TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id TEXT NOT NULL,
    product_id TEXT NOT NULL,
    doc_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reviews_product_id ON reviews(product_id);
CREATE INDEX IF NOT EXISTS idx_reviews_review_id ON reviews(review_id);
"#;

/// Collection names, as reported in logs.
pub const COLLECTION_PRODUCTS: &str = "products";
pub const COLLECTION_REVIEWS: &str = "reviews";
