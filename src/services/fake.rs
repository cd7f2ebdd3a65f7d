use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::recommendation::Recommendation;
use crate::error::{AppError, AppResult};
use crate::services::{LinkRequest, RecommendationService};

/// In-memory platform that serves a fixed recommendation list and records calls.
#[derive(Default)]
pub struct FakeRecommendationService {
    items: Vec<Recommendation>,
    rules: HashMap<String, String>,
    fail_rules: bool,
    fail_list_at: Option<usize>,
    pub list_calls: Mutex<Vec<(usize, usize)>>,
    pub rule_calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<LinkRequest>>,
}

impl FakeRecommendationService {
    pub fn new(items: Vec<Value>) -> Self {
        let items = items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap())
            .collect();
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_rule(mut self, rule_id: &str, yaml: &str) -> Self {
        self.rules.insert(rule_id.to_string(), yaml.to_string());
        self
    }

    pub fn failing_rules(mut self) -> Self {
        self.fail_rules = true;
        self
    }

    /// Makes the list request at `offset` answer with a server error.
    pub fn failing_list_at(mut self, offset: usize) -> Self {
        self.fail_list_at = Some(offset);
        self
    }

    pub fn list_calls(&self) -> Vec<(usize, usize)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<LinkRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationService for FakeRecommendationService {
    async fn count_open(&self) -> AppResult<u64> {
        Ok(self.items.len() as u64)
    }

    async fn list_open(&self, offset: usize, limit: usize) -> AppResult<Vec<Recommendation>> {
        self.list_calls.lock().unwrap().push((offset, limit));
        if self.fail_list_at == Some(offset) {
            return Err(AppError::Platform(
                "recommendation/overview/list responded with 502 Bad Gateway".to_string(),
            ));
        }
        Ok(self.items.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn governance_rule_yaml(&self, rule_id: &str) -> AppResult<String> {
        self.rule_calls.lock().unwrap().push(rule_id.to_string());
        if self.fail_rules {
            return Err(AppError::Platform(
                "governance rule lookup responded with 500 Internal Server Error".to_string(),
            ));
        }
        self.rules
            .get(rule_id)
            .cloned()
            .ok_or_else(|| AppError::Platform(format!("no governance rule '{rule_id}'")))
    }

    async fn create_ticket(&self, request: &LinkRequest) -> AppResult<Value> {
        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        Ok(json!({
            "status": "SUCCESS",
            "data": { "recommendationId": request.recommendation_id, "key": format!("{}-{}", request.project, created.len()) }
        }))
    }
}
