use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::RecommendationService;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub recommendations: Arc<dyn RecommendationService>,
}

impl AppContext {
    pub fn new(config: AppConfig, recommendations: Arc<dyn RecommendationService>) -> Self {
        Self {
            config,
            recommendations,
        }
    }
}
