use async_trait::async_trait;
use serde_json::Value;

use crate::domain::recommendation::{Recommendation, ResourceType};
use crate::domain::ticket::TicketContent;
use crate::error::AppResult;

/// Everything the platform needs to open a ticket and tie it to a recommendation.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub connector_ref: String,
    pub project: String,
    pub issue_type: String,
    pub component: Option<String>,
    pub recommendation_id: String,
    pub resource_type: ResourceType,
    pub content: TicketContent,
}

#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn count_open(&self) -> AppResult<u64>;
    /// One raw page of open recommendations, linked ones included.
    async fn list_open(&self, offset: usize, limit: usize) -> AppResult<Vec<Recommendation>>;
    async fn governance_rule_yaml(&self, rule_id: &str) -> AppResult<String>;
    async fn create_ticket(&self, request: &LinkRequest) -> AppResult<Value>;
}
