use crate::domain::mapping::{BucketMapping, BucketMappings};
use crate::domain::recommendation::Recommendation;

/// Where a fetched recommendation goes next.
#[derive(Debug, PartialEq)]
pub enum Route<'a> {
    Link(&'a BucketMapping),
    BelowThreshold,
    MissingBucket,
    UnmappedBucket(String),
}

pub fn route<'a>(
    rec: &Recommendation,
    mappings: &'a BucketMappings,
    cost_category: &str,
    min_saving: f64,
) -> Route<'a> {
    if rec.monthly_saving < min_saving {
        return Route::BelowThreshold;
    }

    let Some(bucket) = rec.bucket_for(cost_category) else {
        return Route::MissingBucket;
    };

    match mappings.get(bucket) {
        Some(mapping) => Route::Link(mapping),
        None => Route::UnmappedBucket(bucket.to_string()),
    }
}
