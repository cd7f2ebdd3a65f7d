use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::recommendation::{Recommendation, ResourceType};
use crate::error::{AppError, AppResult};
use crate::services::{LinkRequest, RecommendationService};

const API_KEY_HEADER: &str = "x-api-key";
const LOOKBACK_DAYS: u32 = 4;
const MIN_SAVING_FLOOR: u32 = 1;

/// Client for the cloud cost management recommendation API.
pub struct HarnessClient {
    http: Client,
    base_url: String,
    account_id: String,
    api_key: String,
}

impl HarnessClient {
    pub fn new(base_url: String, account_id: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            account_id,
            api_key,
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self::new(
            config.base_url()?,
            config.require_account_id()?.to_string(),
            config.require_api_key()?.to_string(),
        ))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/gateway/ccm/api/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%url, "calling platform");

        let response = self
            .http
            .post(&url)
            .query(&[
                ("routingId", self.account_id.as_str()),
                ("accountIdentifier", self.account_id.as_str()),
            ])
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AppError::Platform(format!("failed to call {path}: {err}")))?;

        Self::parse(path, response).await
    }

    async fn parse<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Platform(format!(
                "{path} responded with {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::Platform(format!("failed to parse {path} response: {err}")))
    }
}

#[async_trait]
impl RecommendationService for HarnessClient {
    async fn count_open(&self) -> AppResult<u64> {
        let envelope: Envelope<u64> = self
            .post(
                "recommendation/overview/count",
                &OverviewFilter::open(None),
            )
            .await?;
        Ok(envelope.data)
    }

    async fn list_open(&self, offset: usize, limit: usize) -> AppResult<Vec<Recommendation>> {
        let envelope: Envelope<RecommendationPage> = self
            .post(
                "recommendation/overview/list",
                &OverviewFilter::open(Some((offset, limit))),
            )
            .await?;
        Ok(envelope.data.items)
    }

    async fn governance_rule_yaml(&self, rule_id: &str) -> AppResult<String> {
        let request = RuleListRequest {
            query: RuleQuery {
                policy_ids: vec![rule_id],
            },
        };
        let envelope: Envelope<RuleList> = self.post("governance/rule/list", &request).await?;
        envelope
            .data
            .rules
            .into_iter()
            .next()
            .map(|rule| rule.rules_yaml)
            .ok_or_else(|| AppError::Platform(format!("governance rule '{rule_id}' not found")))
    }

    async fn create_ticket(&self, request: &LinkRequest) -> AppResult<Value> {
        let body = CreateTicketRequest::from(request);
        self.post("recommendation/jira/create", &body).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewFilter {
    days_back: u32,
    min_saving: u32,
    filter_type: &'static str,
    perspective_filters: Vec<Value>,
    #[serde(rename = "k8sRecommendationFilterPropertiesDTO")]
    k8s_filter: StateFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl OverviewFilter {
    fn open(page: Option<(usize, usize)>) -> Self {
        Self {
            days_back: LOOKBACK_DAYS,
            min_saving: MIN_SAVING_FLOOR,
            filter_type: "CCMRecommendation",
            perspective_filters: Vec::new(),
            k8s_filter: StateFilter {
                recommendation_states: vec!["OPEN"],
            },
            offset: page.map(|(offset, _)| offset),
            limit: page.map(|(_, limit)| limit),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateFilter {
    recommendation_states: Vec<&'static str>,
}

#[derive(Serialize)]
struct RuleListRequest<'a> {
    query: RuleQuery<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleQuery<'a> {
    policy_ids: Vec<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTicketRequest<'a> {
    connector_ref: &'a str,
    project_key: &'a str,
    issue_type: &'a str,
    fields: TicketFields<'a>,
    recommendation_id: &'a str,
    resource_type: &'a ResourceType,
}

#[derive(Serialize)]
struct TicketFields<'a> {
    summary: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<&'a str>,
}

impl<'a> From<&'a LinkRequest> for CreateTicketRequest<'a> {
    fn from(request: &'a LinkRequest) -> Self {
        Self {
            connector_ref: &request.connector_ref,
            project_key: &request.project,
            issue_type: &request.issue_type,
            fields: TicketFields {
                summary: &request.content.summary,
                description: &request.content.description,
                components: request.component.as_deref(),
            },
            recommendation_id: &request.recommendation_id,
            resource_type: &request.resource_type,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct RecommendationPage {
    #[serde(default)]
    items: Vec<Recommendation>,
}

#[derive(Deserialize)]
struct RuleList {
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleEntry {
    rules_yaml: String,
}
