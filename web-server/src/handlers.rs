//! Request handlers.
//!
//! The page and like logic lives in [`assemble_page`] and [`record_like`] so it
//! can be driven without HTTP; the axum handlers only adapt extractors.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use jokes_core::{CoreError, LikeCount, LikedJoke};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppContext;
use crate::TOOL_PATH;

/// Records on page `page_num`, each with its stored like count.
pub async fn assemble_page(ctx: &AppContext, page_num: i64) -> Result<Vec<LikedJoke>, CoreError> {
    let records = ctx.dataset.page(page_num, ctx.config.page_size);
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = records.iter().map(|record| record.id).collect();
    let counts = ctx.database.like_counts(&ids).await?;

    Ok(records
        .iter()
        .map(|record| LikedJoke::new(record, counts.get(&record.id).copied().unwrap_or(0)))
        .collect())
}

/// Adds one like to `post_id`, whether or not the dataset knows it.
pub async fn record_like(ctx: &AppContext, post_id: i64) -> Result<LikeCount, CoreError> {
    let like_count = ctx.database.increment_like(post_id).await?;
    Ok(LikeCount { like_count })
}

pub async fn home() -> Redirect {
    Redirect::to(TOOL_PATH)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn get_jokes_page(
    State(ctx): State<Arc<AppContext>>,
    Path(page_num): Path<i64>,
) -> Result<Json<Vec<LikedJoke>>, ApiError> {
    let jokes = assemble_page(&ctx, page_num).await?;
    debug!(page_num, returned = jokes.len(), "Served joke page");
    Ok(Json(jokes))
}

pub async fn like_post(
    State(ctx): State<Arc<AppContext>>,
    Path(post_id): Path<i64>,
) -> Result<Json<LikeCount>, ApiError> {
    Ok(Json(record_like(&ctx, post_id).await?))
}
