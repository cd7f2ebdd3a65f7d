use serde_json::Value;
use tracing::info;

use crate::domain::recommendation::{Recommendation, ResourceType};
use crate::domain::ticket::{DeepLinks, compose};
use crate::error::{AppError, AppResult};
use crate::services::{LinkRequest, RecommendationService};

/// Issue tracker destination for one ticket.
#[derive(Debug, Clone)]
pub struct Destination<'a> {
    pub connector_ref: &'a str,
    pub project: &'a str,
    pub issue_type: &'a str,
    pub component: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    Created(Value),
    DryRun,
}

/// Composes the ticket for `rec` and, unless `dry_run`, asks the platform to
/// create it and attach it to the recommendation.
pub async fn link(
    service: &dyn RecommendationService,
    links: &DeepLinks,
    rec: &Recommendation,
    destination: &Destination<'_>,
    dry_run: bool,
) -> AppResult<LinkOutcome> {
    let rule_yaml = match &rec.resource_type {
        ResourceType::Governance => {
            let rule_id = rec
                .governance_rule_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| AppError::recommendation(&rec.id, "missing governance rule id"))?;
            Some(service.governance_rule_yaml(rule_id).await?)
        }
        _ => None,
    };
    let content = compose(rec, links, rule_yaml.as_deref())?;

    if dry_run {
        info!(
            recommendation = %rec.id,
            resource_type = %rec.resource_type,
            project = destination.project,
            issue_type = destination.issue_type,
            "dry run, ticket not created\n\n{}:\n{}",
            content.summary,
            content.description
        );
        return Ok(LinkOutcome::DryRun);
    }

    let request = LinkRequest {
        connector_ref: destination.connector_ref.to_string(),
        project: destination.project.to_string(),
        issue_type: destination.issue_type.to_string(),
        component: destination.component.map(str::to_string),
        recommendation_id: rec.id.clone(),
        resource_type: rec.resource_type.clone(),
        content,
    };
    let response = service.create_ticket(&request).await?;
    info!(
        recommendation = %rec.id,
        resource_type = %rec.resource_type,
        project = destination.project,
        "ticket created: {}",
        request.content.summary
    );
    Ok(LinkOutcome::Created(response))
}
