//! Handlers for `/managers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/managers` | |
//! | `POST`   | `/managers` | Body: [`ManagerInput`]; assigns the listed teams |
//! | `GET`    | `/managers/:id` | 404 if not found |
//! | `PUT`    | `/managers/:id` | Replaces the editable fields |
//! | `DELETE` | `/managers/:id` | Teams they led are left without a manager |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use manning_core::{management::ManagerInput, model::Manager, store::RosterStore};

use crate::{commit, error::ApiError, load};

/// `GET /managers`
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Manager>>, ApiError> {
  Ok(Json(load(&*store).await?.managers))
}

/// `POST /managers`
pub async fn create<S: RosterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<ManagerInput>,
) -> Result<impl IntoResponse, ApiError> {
  let mut data = load(&*store).await?;
  let manager = data.add_manager(body)?;
  commit(&*store, data).await?;
  tracing::info!(id = %manager.id, "manager created");
  Ok((StatusCode::CREATED, Json(manager)))
}

/// `GET /managers/:id`
pub async fn get_one<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Manager>, ApiError> {
  load(&*store)
    .await?
    .manager(&id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("manager {id} not found")))
}

/// `PUT /managers/:id`
pub async fn update<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<ManagerInput>,
) -> Result<Json<Manager>, ApiError> {
  let mut data = load(&*store).await?;
  let manager = data.update_manager(&id, body)?;
  commit(&*store, data).await?;
  Ok(Json(manager))
}

/// `DELETE /managers/:id`
pub async fn remove<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let mut data = load(&*store).await?;
  data.delete_manager(&id)?;
  commit(&*store, data).await?;
  tracing::info!(%id, "manager deleted");
  Ok(StatusCode::NO_CONTENT)
}
