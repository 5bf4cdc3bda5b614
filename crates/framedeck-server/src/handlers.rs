//! Request handlers
//!
//! Pass-through to the store plus error translation; no business logic.

use crate::error::ApiError;
use framedeck_model::{FrameId, UpdateFrameHtml};
use framedeck_store::SharedStore;
use warp::{Rejection, Reply};

/// `GET /demos`
pub async fn list_demos(store: SharedStore) -> Result<impl Reply, Rejection> {
    let demos = store
        .list_demos_with_frames()
        .await
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;
    tracing::debug!(count = demos.len(), "serving demos");
    Ok(warp::reply::json(&demos))
}

/// `PUT /frames/{id}`
///
/// An id that is not a valid UUID cannot name a stored frame, so it is
/// answered like any other unknown id.
pub async fn update_frame(
    id: String,
    body: UpdateFrameHtml,
    store: SharedStore,
) -> Result<impl Reply, Rejection> {
    let frame_id: FrameId = id
        .parse()
        .map_err(|_| warp::reject::custom(ApiError::NotFound(format!("frame {id}"))))?;

    let frame = store
        .update_frame_html(frame_id, body.html)
        .await
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;
    tracing::info!(frame_id = %frame.id, demo_id = %frame.demo_id, "frame saved");
    Ok(warp::reply::json(&frame))
}
