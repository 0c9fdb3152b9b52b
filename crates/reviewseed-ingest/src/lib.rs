//! reviewseed ingest — dataset reading, sentiment/product matching, sampling,
//! and review/product document synthesis.

pub mod builder;
pub mod dataset;
pub mod infer;
pub mod matcher;
pub mod pipeline;
pub mod sampler;
pub mod segment;
pub mod sentiment;

pub use builder::{build_product, build_review, summarize_text};
pub use dataset::{preview_jsonl, DatasetReader, RawRecord};
pub use infer::{infer_category, infer_product_name};
pub use matcher::match_product;
pub use pipeline::{build_batch, SeedBatch};
pub use sampler::{ensure_sufficient, Bucket, SampleStats, SampledBuckets, Sampler};
pub use segment::{create_title, sentence_entities, split_into_sentences};
pub use sentiment::classify_sentiment;
