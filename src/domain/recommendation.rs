use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceType {
    Ec2Instance,
    Governance,
    AzureInstance,
    Workload,
    NodePool,
    EcsService,
    Unrecognized(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Ec2Instance => "EC2_INSTANCE",
            ResourceType::Governance => "GOVERNANCE",
            ResourceType::AzureInstance => "AZURE_INSTANCE",
            ResourceType::Workload => "WORKLOAD",
            ResourceType::NodePool => "NODE_POOL",
            ResourceType::EcsService => "ECS_SERVICE",
            ResourceType::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "EC2_INSTANCE" => ResourceType::Ec2Instance,
            "GOVERNANCE" => ResourceType::Governance,
            "AZURE_INSTANCE" => ResourceType::AzureInstance,
            "WORKLOAD" => ResourceType::Workload,
            "NODE_POOL" => ResourceType::NodePool,
            "ECS_SERVICE" => ResourceType::EcsService,
            _ => ResourceType::Unrecognized(value),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(ResourceType::from)
    }
}

impl Serialize for ResourceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCategoryDetail {
    pub cost_category: String,
    pub cost_bucket: String,
}

/// One entry of the recommendation list as returned by the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(default)]
    pub resource_name: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub monthly_saving: f64,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub cloud_provider: Option<String>,
    #[serde(default)]
    pub target_region: Option<String>,
    #[serde(default)]
    pub governance_rule_id: Option<String>,
    #[serde(default)]
    pub jira_connector_ref: Option<String>,
    #[serde(default)]
    pub servicenow_connector_ref: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cost_category_details: Vec<CostCategoryDetail>,
    #[serde(default)]
    pub recommendation_details: Value,
}

impl Recommendation {
    pub fn is_linked(&self) -> bool {
        has_text(&self.jira_connector_ref) || has_text(&self.servicenow_connector_ref)
    }

    /// Bucket for the given cost category. When the category appears more
    /// than once the last entry wins.
    pub fn bucket_for(&self, cost_category: &str) -> Option<&str> {
        self.cost_category_details
            .iter()
            .filter(|detail| detail.cost_category == cost_category)
            .map(|detail| detail.cost_bucket.as_str())
            .last()
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CostCategoryDetail>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<CostCategoryDetail>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
