//! Handlers for `/skills` endpoints. `:kind` is `tech` or `app`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/skills/:kind` | Definitions with usage counts, in name order |
//! | `POST`   | `/skills/:kind` | Body: [`SkillInput`]; replaces a same-name definition |
//! | `PUT`    | `/skills/:kind/:name` | Renaming moves every developer's rating |
//! | `DELETE` | `/skills/:kind/:name` | Drops the rating from every developer |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use manning_core::{
  management::SkillInput,
  model::{SkillDefinition, SkillKind, TeamData},
  store::RosterStore,
};
use serde::Serialize;

use crate::{commit, error::ApiError, load};

/// One skill definition as listed.
#[derive(Debug, Serialize)]
pub struct SkillEntry {
  pub name:        String,
  #[serde(flatten)]
  pub definition:  SkillDefinition,
  /// Developers holding a rating for the skill.
  pub usage:       usize,
}

fn entries(data: &TeamData, kind: SkillKind) -> Vec<SkillEntry> {
  data
    .skill_definitions
    .of_kind(kind)
    .iter()
    .map(|(name, definition)| SkillEntry {
      name:       name.clone(),
      definition: definition.clone(),
      usage:      data.skill_usage(kind, name),
    })
    .collect()
}

/// `GET /skills/:kind`
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(kind): Path<SkillKind>,
) -> Result<Json<Vec<SkillEntry>>, ApiError> {
  Ok(Json(entries(&load(&*store).await?, kind)))
}

/// `POST /skills/:kind`
pub async fn create<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(kind): Path<SkillKind>,
  Json(body): Json<SkillInput>,
) -> Result<impl IntoResponse, ApiError> {
  let mut data = load(&*store).await?;
  data.upsert_skill(kind, None, body)?;
  let listed = entries(&data, kind);
  commit(&*store, data).await?;
  Ok((StatusCode::CREATED, Json(listed)))
}

/// `PUT /skills/:kind/:name`
pub async fn update<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((kind, name)): Path<(SkillKind, String)>,
  Json(body): Json<SkillInput>,
) -> Result<Json<Vec<SkillEntry>>, ApiError> {
  let mut data = load(&*store).await?;
  if !data.skill_definitions.of_kind(kind).contains_key(&name) {
    return Err(ApiError::NotFound(format!("{kind} skill {name} not found")));
  }
  data.upsert_skill(kind, Some(&name), body)?;
  let listed = entries(&data, kind);
  commit(&*store, data).await?;
  Ok(Json(listed))
}

/// `DELETE /skills/:kind/:name`
pub async fn remove<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((kind, name)): Path<(SkillKind, String)>,
) -> Result<StatusCode, ApiError> {
  let mut data = load(&*store).await?;
  data.delete_skill(kind, &name)?;
  commit(&*store, data).await?;
  tracing::info!(%kind, %name, "skill deleted");
  Ok(StatusCode::NO_CONTENT)
}
