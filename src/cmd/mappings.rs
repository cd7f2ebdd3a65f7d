use crate::config::AppConfig;
use crate::domain::mapping::BucketMappings;
use crate::error::AppResult;

/// Loads the mapping table and prints one line per bucket.
pub fn run(config: &AppConfig) -> AppResult<()> {
    let path = config.require_mapping_path()?;
    let mappings = BucketMappings::load(path)?;
    println!("{} buckets in {}", mappings.len(), path.display());
    for mapping in mappings.sorted() {
        println!("{mapping}");
    }
    Ok(())
}
