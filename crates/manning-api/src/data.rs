//! Whole-document endpoints: export, import and clear.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/data` | Pretty-printed JSON with an `ETag`; honours `If-None-Match` |
//! | `PUT`    | `/data` | Body: a complete roster document; 400 if it does not parse |
//! | `DELETE` | `/data` | Replaces the roster with an empty one |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use manning_core::{model::TeamData, store::RosterStore};

use crate::{commit, error::ApiError, etag::compute_etag, load, today};

/// `GET /data`
pub async fn export<S: RosterStore>(
  State(store): State<Arc<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let body = load(&*store).await?.to_pretty_json()?;
  let etag = compute_etag(body.as_bytes());

  let unchanged = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v == etag);
  if unchanged {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      [
        (header::CONTENT_TYPE, "application/json".to_owned()),
        (header::ETAG, etag),
      ],
      body,
    )
      .into_response(),
  )
}

/// `PUT /data`
pub async fn import<S: RosterStore>(
  State(store): State<Arc<S>>,
  body: String,
) -> Result<Json<TeamData>, ApiError> {
  let data = TeamData::from_json(&body)
    .map_err(|e| ApiError::BadRequest(format!("invalid roster document: {e}")))?;
  commit(&*store, data).await?;
  tracing::info!(bytes = body.len(), "roster imported");
  Ok(Json(load(&*store).await?))
}

/// `DELETE /data`
pub async fn clear<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<TeamData>, ApiError> {
  let data = store.clear(today()).await.map_err(ApiError::store)?;
  tracing::info!("roster cleared");
  Ok(Json(data))
}
