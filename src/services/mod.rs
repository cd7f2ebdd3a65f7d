pub mod recommendation;

#[cfg(test)]
pub mod fake;

pub use recommendation::{LinkRequest, RecommendationService};
