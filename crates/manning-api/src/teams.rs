//! Handlers for `/teams` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/teams` | |
//! | `POST`   | `/teams` | Body: [`TeamInput`] |
//! | `GET`    | `/teams/:id` | 404 if not found |
//! | `PUT`    | `/teams/:id` | Member lists move developers; omitted lists are kept |
//! | `DELETE` | `/teams/:id` | Unassigns members and shared resources |
//! | `GET`    | `/teams/:id/developers` | Primary members, then shared resources |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use manning_core::{
  availability::team_developers,
  management::TeamInput,
  model::{Developer, Team},
  store::RosterStore,
};

use crate::{commit, error::ApiError, load};

/// `GET /teams`
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Team>>, ApiError> {
  Ok(Json(load(&*store).await?.teams))
}

/// `POST /teams`
pub async fn create<S: RosterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<TeamInput>,
) -> Result<impl IntoResponse, ApiError> {
  let mut data = load(&*store).await?;
  let team = data.add_team(body)?;
  commit(&*store, data).await?;
  tracing::info!(id = %team.id, "team created");
  Ok((StatusCode::CREATED, Json(team)))
}

/// `GET /teams/:id`
pub async fn get_one<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Team>, ApiError> {
  load(&*store)
    .await?
    .team(&id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("team {id} not found")))
}

/// `PUT /teams/:id`
pub async fn update<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<TeamInput>,
) -> Result<Json<Team>, ApiError> {
  let mut data = load(&*store).await?;
  let team = data.update_team(&id, body)?;
  commit(&*store, data).await?;
  Ok(Json(team))
}

/// `DELETE /teams/:id`
pub async fn remove<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let mut data = load(&*store).await?;
  data.delete_team(&id)?;
  commit(&*store, data).await?;
  tracing::info!(%id, "team deleted");
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /teams/:id/developers`
pub async fn members<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Developer>>, ApiError> {
  let data = load(&*store).await?;
  if data.team(&id).is_none() {
    return Err(ApiError::NotFound(format!("team {id} not found")));
  }
  Ok(Json(team_developers(&data, &id).into_iter().cloned().collect()))
}
