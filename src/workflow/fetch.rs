use tracing::debug;

use crate::domain::recommendation::Recommendation;
use crate::error::{AppError, AppResult};
use crate::services::RecommendationService;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Collects every open recommendation that is not yet tied to a ticket.
///
/// Paging stops at the first raw page shorter than `page_size`, so a full page
/// made entirely of linked items still triggers another request.
pub async fn fetch_open_unlinked(
    service: &dyn RecommendationService,
    page_size: usize,
) -> AppResult<Vec<Recommendation>> {
    if page_size == 0 {
        return Err(AppError::Configuration(
            "page size must be greater than zero".to_string(),
        ));
    }

    let mut unlinked = Vec::new();
    let mut offset = 0;
    loop {
        let page = service.list_open(offset, page_size).await?;
        let raw_len = page.len();
        let before = unlinked.len();
        unlinked.extend(page.into_iter().filter(|rec| !rec.is_linked()));
        debug!(
            offset,
            raw = raw_len,
            unlinked = unlinked.len() - before,
            "fetched recommendation page"
        );

        if raw_len < page_size {
            break;
        }
        offset += page_size;
    }

    Ok(unlinked)
}
