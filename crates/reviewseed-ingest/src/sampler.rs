//! Quota-based sampling of dataset records per (product, sentiment).
//!
//! Records are streamed once. Each classified record either lands in its
//! matched product's bucket (while under quota) or, when no product matches,
//! in a positive/negative backfill pool. Buckets still short when the stream
//! ends are topped up from the shuffled pools.

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::dataset::RawRecord;
use crate::matcher::match_product;
use crate::sentiment::classify_sentiment;
use reviewseed_core::{Catalog, Error, Result, Sentiment, Shortage};

/// Positive and negative records picked for one product.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    pub positive: Vec<RawRecord>,
    pub negative: Vec<RawRecord>,
}

impl Bucket {
    pub fn get(&self, sentiment: Sentiment) -> &[RawRecord] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
        }
    }

    fn get_mut(&mut self, sentiment: Sentiment) -> &mut Vec<RawRecord> {
        match sentiment {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Negative => &mut self.negative,
        }
    }
}

/// Sampled records keyed by product id, in catalog order.
#[derive(Debug, Clone)]
pub struct SampledBuckets {
    quota: usize,
    buckets: IndexMap<String, Bucket>,
}

impl SampledBuckets {
    fn new(catalog: &Catalog, quota: usize) -> Self {
        let buckets = catalog
            .product_ids()
            .map(|id| (id.to_string(), Bucket::default()))
            .collect();
        Self { quota, buckets }
    }

    /// Records for one (product, sentiment) pair; empty for unknown products.
    pub fn records(&self, product_id: &str, sentiment: Sentiment) -> &[RawRecord] {
        self.buckets
            .get(product_id)
            .map(|b| b.get(sentiment))
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.buckets.iter().map(|(id, b)| (id.as_str(), b))
    }

    /// Add a record if its bucket is under quota. Returns whether it was kept.
    fn offer(&mut self, product_id: &str, sentiment: Sentiment, record: RawRecord) -> bool {
        let quota = self.quota;
        match self.buckets.get_mut(product_id) {
            Some(bucket) => {
                let list = bucket.get_mut(sentiment);
                if list.len() < quota {
                    list.push(record);
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.buckets.values().all(|b| {
            Sentiment::all()
                .iter()
                .all(|&s| b.get(s).len() >= self.quota)
        })
    }

    /// Every (product, sentiment) pair below quota, in catalog order.
    pub fn shortages(&self) -> Vec<Shortage> {
        let mut shortages = Vec::new();
        for (product_id, bucket) in &self.buckets {
            for &sentiment in Sentiment::all() {
                let count = bucket.get(sentiment).len();
                if count < self.quota {
                    shortages.push(Shortage {
                        product_id: product_id.clone(),
                        sentiment,
                        count,
                        quota: self.quota,
                    });
                }
            }
        }
        shortages
    }
}

/// Fail with [`Error::InsufficientRecords`] if any bucket is below quota.
pub fn ensure_sufficient(buckets: &SampledBuckets) -> Result<()> {
    let shortages = buckets.shortages();
    if shortages.is_empty() {
        Ok(())
    } else {
        Err(Error::InsufficientRecords(shortages))
    }
}

/// Counters from one sampling run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleStats {
    pub records_seen: usize,
    pub neutral_skipped: usize,
    pub matched_kept: usize,
    pub unmatched_pooled: usize,
    pub backfilled: usize,
}

/// Fills per-product, per-sentiment buckets up to a fixed quota.
pub struct Sampler<'a> {
    catalog: &'a Catalog,
    quota: usize,
}

impl<'a> Sampler<'a> {
    pub fn new(catalog: &'a Catalog, quota: usize) -> Self {
        Self { catalog, quota }
    }

    /// Sample `records` and verify every bucket reached quota.
    pub fn sample<I, R>(&self, records: I, rng: &mut R) -> Result<SampledBuckets>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
        R: Rng + ?Sized,
    {
        let (buckets, _) = self.collect(records, rng)?;
        ensure_sufficient(&buckets)?;
        Ok(buckets)
    }

    /// Sample `records` without the quota check. Buckets may come back short.
    pub fn collect<I, R>(&self, records: I, rng: &mut R) -> Result<(SampledBuckets, SampleStats)>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
        R: Rng + ?Sized,
    {
        let mut buckets = SampledBuckets::new(self.catalog, self.quota);
        let mut stats = SampleStats::default();
        let mut unmatched_positive: Vec<RawRecord> = Vec::new();
        let mut unmatched_negative: Vec<RawRecord> = Vec::new();

        if buckets.is_full() {
            return Ok((buckets, stats));
        }

        for record in records {
            let record = record?;
            stats.records_seen += 1;

            let sentiment = match classify_sentiment(record.label) {
                Some(s) => s,
                None => {
                    stats.neutral_skipped += 1;
                    continue;
                }
            };

            match match_product(&record.text, &self.catalog.products) {
                Some(product) => {
                    let product_id = product.id.clone();
                    if buckets.offer(&product_id, sentiment, record) {
                        stats.matched_kept += 1;
                        if buckets.is_full() {
                            debug!("All buckets full after {} records", stats.records_seen);
                            break;
                        }
                    }
                }
                None => {
                    stats.unmatched_pooled += 1;
                    match sentiment {
                        Sentiment::Positive => unmatched_positive.push(record),
                        Sentiment::Negative => unmatched_negative.push(record),
                    }
                }
            }
        }

        if !buckets.is_full() {
            unmatched_positive.shuffle(&mut *rng);
            unmatched_negative.shuffle(&mut *rng);
            stats.backfilled = self.backfill(
                &mut buckets,
                &mut unmatched_positive,
                &mut unmatched_negative,
            );
        }

        info!(
            "Sampled {} records: kept {} matched, backfilled {}, skipped {} neutral",
            stats.records_seen, stats.matched_kept, stats.backfilled, stats.neutral_skipped
        );
        Ok((buckets, stats))
    }

    /// Top up short buckets, in catalog order, from the end of each pool.
    fn backfill(
        &self,
        buckets: &mut SampledBuckets,
        positive_pool: &mut Vec<RawRecord>,
        negative_pool: &mut Vec<RawRecord>,
    ) -> usize {
        let mut added = 0;
        for product in &self.catalog.products {
            for &sentiment in Sentiment::all() {
                let pool = match sentiment {
                    Sentiment::Positive => &mut *positive_pool,
                    Sentiment::Negative => &mut *negative_pool,
                };
                while buckets.records(&product.id, sentiment).len() < self.quota {
                    let record = match pool.pop() {
                        Some(r) => r,
                        None => break,
                    };
                    buckets.offer(&product.id, sentiment, record);
                    added += 1;
                }
            }
        }
        if added > 0 {
            debug!("Backfilled {} records from unmatched pools", added);
        }
        added
    }
}
