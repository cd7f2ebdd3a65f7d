use serde_json::Value;

use crate::domain::recommendation::{Recommendation, ResourceType};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct TicketContent {
    pub summary: String,
    pub description: String,
}

/// Where recommendation deep links point.
#[derive(Debug, Clone)]
pub struct DeepLinks {
    pub base_url: String,
    pub account_id: String,
}

impl DeepLinks {
    pub fn new(base_url: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            account_id: account_id.into(),
        }
    }

    fn recommendation(&self, section: &str, rec: &Recommendation) -> String {
        format!(
            "[{}/ng/account/{}/module/ce/recommendations/{section}{}/name/{}/details]",
            self.base_url.trim_end_matches('/'),
            self.account_id,
            rec.id,
            rec.resource_name
        )
    }
}

/// Renders the ticket title and body for a recommendation. Governance
/// recommendations embed the rule definition, which the caller fetches.
pub fn compose(
    rec: &Recommendation,
    links: &DeepLinks,
    rule_yaml: Option<&str>,
) -> AppResult<TicketContent> {
    let name = rec.resource_name.as_str();
    let content = match &rec.resource_type {
        ResourceType::Ec2Instance => TicketContent {
            summary: format!("Resizing {name}"),
            description: table(&[
                ("Instance Name", name.to_string()),
                ("Account Name", text(&rec.namespace)),
                ("Potential Monthly Savings", dollars(fixed(rec.monthly_saving))),
                ("Recommendation Link", links.recommendation("ec2/", rec)),
            ]),
        },
        ResourceType::Governance => {
            let rule_yaml = rule_yaml.ok_or_else(|| {
                AppError::recommendation(&rec.id, "governance rule definition is missing")
            })?;
            let details = &rec.recommendation_details;
            let execution = details
                .get("executions")
                .and_then(|executions| executions.get(0))
                .ok_or_else(|| AppError::recommendation(&rec.id, "no governance executions"))?;
            TicketContent {
                summary: format!(
                    "Monthly potential savings of ${} in {} ({name})",
                    fixed(rec.monthly_saving),
                    text(&rec.namespace)
                ),
                description: table(&[
                    ("Cloud Provider", text(&rec.cloud_provider)),
                    ("Region", text(&rec.target_region)),
                    ("Cloud Account", text(&rec.namespace)),
                    ("Rule Name", name.to_string()),
                    ("Resource Type", detail(rec, details, "resourceType")?),
                    ("Action Type", detail(rec, details, "actionType")?),
                    ("Rule YAML", format!("{{code:yaml}}{rule_yaml}{{code}}")),
                    (
                        "Potential Savings",
                        dollars(detail(rec, execution, "potentialSavings")?),
                    ),
                    ("Resource Count", detail(rec, execution, "resourceCount")?),
                    ("Potential Monthly Savings", dollars(fixed(rec.monthly_saving))),
                    ("Recommendation Link", links.recommendation("governance/", rec)),
                ]),
            }
        }
        ResourceType::AzureInstance => TicketContent {
            summary: format!("Rightsize {name}"),
            description: table(&[
                ("Subscription", text(&rec.cluster_name)),
                ("Resource Group", text(&rec.namespace)),
                ("VM", name.to_string()),
                ("Potential Monthly Savings", dollars(plain(rec.monthly_saving))),
                ("Recommendation Link", links.recommendation("azure/", rec)),
            ]),
        },
        ResourceType::Workload => TicketContent {
            summary: format!("Rightsize {name}"),
            description: table(&[
                ("Workload name", name.to_string()),
                ("Cluster name", text(&rec.cluster_name)),
                ("Namespace", text(&rec.namespace)),
                ("Potential Monthly Savings", dollars(plain(rec.monthly_saving))),
                ("Recommendation Link", links.recommendation("", rec)),
            ]),
        },
        ResourceType::NodePool => {
            let node_pool = &rec.recommendation_details["nodePoolId"];
            TicketContent {
                summary: format!("Rightsize {name}"),
                description: table(&[
                    ("Nodepool name", name.to_string()),
                    ("Cluster name", text(&rec.cluster_name)),
                    ("Region", text(&rec.target_region)),
                    (
                        "Current Instance Family",
                        detail(rec, node_pool, "nodepoolname")?,
                    ),
                    ("Potential Monthly Savings", dollars(plain(rec.monthly_saving))),
                    ("Recommendation Link", links.recommendation("node/", rec)),
                ]),
            }
        }
        ResourceType::EcsService => TicketContent {
            summary: format!("Resizing {name}"),
            description: table(&[
                ("Service Name", name.to_string()),
                ("Account Name", text(&rec.namespace)),
                ("Cluster Name", text(&rec.cluster_name)),
                (
                    "ECS Launch Type",
                    detail(rec, &rec.recommendation_details, "launchType")?,
                ),
                ("Potential Monthly Savings", dollars(plain(rec.monthly_saving))),
                ("Recommendation Link", links.recommendation("ecs/", rec)),
            ]),
        },
        ResourceType::Unrecognized(raw) => {
            return Err(AppError::recommendation(
                &rec.id,
                format!("unsupported resource type '{raw}'"),
            ));
        }
    };
    Ok(content)
}

fn table(rows: &[(&str, String)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("||*{label}*|{value}|"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn dollars(amount: String) -> String {
    format!("*${amount}*")
}

fn fixed(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Amount as the platform reported it, keeping a trailing `.0` on whole values.
fn plain(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 {
        format!("{amount:.1}")
    } else {
        amount.to_string()
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn detail(rec: &Recommendation, source: &Value, key: &str) -> AppResult<String> {
    match source.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Null) | None => Err(AppError::recommendation(
            &rec.id,
            format!("recommendation details lack '{key}'"),
        )),
        Some(other) => Ok(other.to_string()),
    }
}
