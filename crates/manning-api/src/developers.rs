//! Handlers for `/developers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/developers` | Each entry carries its working vacation days |
//! | `POST`   | `/developers` | Body: [`DeveloperInput`]; starts active, no vacations |
//! | `GET`    | `/developers/:id` | 404 if not found |
//! | `PUT`    | `/developers/:id` | Team links follow the new assignment |
//! | `DELETE` | `/developers/:id` | Removed from every team |
//! | `PUT`    | `/developers/:id/skills/:kind/:skill` | Body: `{"rating":7}` |
//! | `POST`   | `/developers/:id/vacations` | Body: a vacation entry |
//! | `PUT`    | `/developers/:id/vacations/:index` | Replaces the entry |
//! | `DELETE` | `/developers/:id/vacations/:index` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use manning_core::{
  availability::working_vacation_days,
  management::DeveloperInput,
  model::{Developer, SkillKind, TeamData, VacationDay},
  store::RosterStore,
};
use serde::{Deserialize, Serialize};

use crate::{commit, error::ApiError, load};

/// A developer plus derived figures for list views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperSummary {
  #[serde(flatten)]
  pub developer:             Developer,
  pub working_vacation_days: usize,
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

/// `GET /developers`
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DeveloperSummary>>, ApiError> {
  let developers = load(&*store)
    .await?
    .developers
    .into_iter()
    .map(|developer| DeveloperSummary {
      working_vacation_days: working_vacation_days(&developer),
      developer,
    })
    .collect();
  Ok(Json(developers))
}

/// `POST /developers`
pub async fn create<S: RosterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<DeveloperInput>,
) -> Result<impl IntoResponse, ApiError> {
  let mut data = load(&*store).await?;
  let developer = data.add_developer(body)?;
  commit(&*store, data).await?;
  tracing::info!(id = %developer.id, "developer created");
  Ok((StatusCode::CREATED, Json(developer)))
}

/// `GET /developers/:id`
pub async fn get_one<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Developer>, ApiError> {
  load(&*store)
    .await?
    .developer(&id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("developer {id} not found")))
}

/// `PUT /developers/:id`
pub async fn update<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<DeveloperInput>,
) -> Result<Json<Developer>, ApiError> {
  let mut data = load(&*store).await?;
  let developer = data.update_developer(&id, body)?;
  commit(&*store, data).await?;
  Ok(Json(developer))
}

/// `DELETE /developers/:id`
pub async fn remove<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let mut data = load(&*store).await?;
  data.delete_developer(&id)?;
  commit(&*store, data).await?;
  tracing::info!(%id, "developer deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Skill ratings ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RatingBody {
  pub rating: u8,
}

/// `PUT /developers/:id/skills/:kind/:skill`
pub async fn rate<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((id, kind, skill)): Path<(String, SkillKind, String)>,
  Json(body): Json<RatingBody>,
) -> Result<Json<Developer>, ApiError> {
  let mut data = load(&*store).await?;
  data.set_skill_rating(&id, kind, &skill, body.rating)?;
  let developer = data.developer(&id).cloned();
  commit(&*store, data).await?;
  developer
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("developer {id} not found")))
}

// ─── Vacations ───────────────────────────────────────────────────────────────

/// `POST /developers/:id/vacations`
pub async fn add_vacation<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<VacationDay>,
) -> Result<impl IntoResponse, ApiError> {
  let mut data = load(&*store).await?;
  data.add_vacation(&id, body)?;
  let days = vacations_of(&data, &id);
  commit(&*store, data).await?;
  Ok((StatusCode::CREATED, Json(days)))
}

/// `PUT /developers/:id/vacations/:index`
pub async fn update_vacation<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((id, index)): Path<(String, usize)>,
  Json(body): Json<VacationDay>,
) -> Result<Json<Vec<VacationDay>>, ApiError> {
  let mut data = load(&*store).await?;
  data.update_vacation(&id, index, body)?;
  let days = vacations_of(&data, &id);
  commit(&*store, data).await?;
  Ok(Json(days))
}

/// `DELETE /developers/:id/vacations/:index`
pub async fn delete_vacation<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((id, index)): Path<(String, usize)>,
) -> Result<Json<Vec<VacationDay>>, ApiError> {
  let mut data = load(&*store).await?;
  data.delete_vacation(&id, index)?;
  let days = vacations_of(&data, &id);
  commit(&*store, data).await?;
  Ok(Json(days))
}

fn vacations_of(data: &TeamData, id: &str) -> Vec<VacationDay> {
  data
    .developer(id)
    .map(|d| d.availability.vacation_days.clone())
    .unwrap_or_default()
}
