use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<u64> {
    ctx.recommendations.count_open().await
}
