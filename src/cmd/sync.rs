use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::mapping::BucketMappings;
use crate::error::AppResult;
use crate::report::RunStatus;
use crate::workflow::sync::sync_recommendations;

#[derive(Debug, Clone)]
pub struct SyncCommandArgs {
    pub page_size: usize,
}

pub async fn run(ctx: &AppContext, args: SyncCommandArgs) -> AppResult<RunStatus> {
    let mappings = BucketMappings::load(ctx.config.require_mapping_path()?)?;
    if mappings.is_empty() {
        warn!("mapping table is empty; every recommendation will be unrouted");
    }
    for mapping in mappings.sorted() {
        debug!(%mapping, "loaded bucket mapping");
    }

    let report = sync_recommendations(ctx, &mappings, args.page_size).await?;
    report.emit(ctx.config.output_file.as_deref())?;
    println!(
        "Processed {} recommendations{}.",
        report.results().len(),
        if ctx.config.dry_run { " (dry run)" } else { "" }
    );
    Ok(report.status())
}
