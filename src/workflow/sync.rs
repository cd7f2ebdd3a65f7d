use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::mapping::BucketMappings;
use crate::domain::ticket::DeepLinks;
use crate::error::{AppError, AppResult};
use crate::report::RunReport;
use crate::workflow::fetch::fetch_open_unlinked;
use crate::workflow::link::{Destination, link};
use crate::workflow::route::{Route, route};

/// Fetches open unlinked recommendations and files a ticket for each routable one.
pub async fn sync_recommendations(
    ctx: &AppContext,
    mappings: &BucketMappings,
    page_size: usize,
) -> AppResult<RunReport> {
    let config = &ctx.config;
    let cost_category = config.require_cost_category()?;
    let connector_ref = match (&config.connector_ref, config.dry_run) {
        (Some(connector), _) => connector.as_str(),
        (None, true) => "",
        (None, false) => {
            return Err(AppError::Configuration(
                "JIRA_CONNECTOR_REF is not set".to_string(),
            ));
        }
    };
    let links = DeepLinks::new(config.base_url()?, config.require_account_id()?);

    let recommendations = fetch_open_unlinked(ctx.recommendations.as_ref(), page_size).await?;
    info!(
        count = recommendations.len(),
        "found open recommendations without tickets"
    );

    let mut report = RunReport::default();
    for rec in &recommendations {
        let mapping = match route(rec, mappings, cost_category, config.min_saving) {
            Route::Link(mapping) => mapping,
            Route::BelowThreshold => {
                debug!(
                    recommendation = %rec.id,
                    saving = rec.monthly_saving,
                    min_saving = config.min_saving,
                    "below savings threshold, skipping"
                );
                report.record_below_threshold();
                continue;
            }
            Route::MissingBucket => {
                warn!(
                    recommendation = %rec.id,
                    cost_category,
                    "bucket mapping not found for recommendation"
                );
                report.record_unrouted();
                continue;
            }
            Route::UnmappedBucket(bucket) => {
                warn!(
                    recommendation = %rec.id,
                    %bucket,
                    "bucket has no entry in the mapping table"
                );
                report.record_unrouted();
                continue;
            }
        };

        let destination = Destination {
            connector_ref,
            project: &mapping.project,
            issue_type: &mapping.issue_type,
            component: config.ticket_component.as_deref(),
        };
        let outcome = link(
            ctx.recommendations.as_ref(),
            &links,
            rec,
            &destination,
            config.dry_run,
        )
        .await?;
        report.record(&rec.id, outcome);
    }

    Ok(report)
}
