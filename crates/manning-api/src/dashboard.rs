//! `GET /dashboard`: headline figures for the landing page.

use std::sync::Arc;

use axum::{Json, extract::State};
use manning_core::{
  model::SkillKind,
  stats::{RosterSummary, SkillUsage, format_data_size, skill_usage},
  store::RosterStore,
};
use serde::Serialize;

use crate::{error::ApiError, load};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub organization:    String,
  #[serde(flatten)]
  pub summary:         RosterSummary,
  pub has_stored_data: bool,
  pub data_size:       u64,
  /// e.g. "1.5 KB".
  pub data_size_label: String,
  pub tech_usage:      Vec<SkillUsage>,
  pub app_usage:       Vec<SkillUsage>,
}

/// `GET /dashboard`
pub async fn summary<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Dashboard>, ApiError> {
  let data = load(&*store).await?;
  let has_stored_data = store.has_stored_data().await.map_err(ApiError::store)?;
  let data_size = store.data_size().await.map_err(ApiError::store)?;

  Ok(Json(Dashboard {
    organization: data.organization.name.clone(),
    summary: RosterSummary::of(&data),
    has_stored_data,
    data_size,
    data_size_label: format_data_size(data_size),
    tech_usage: skill_usage(&data, SkillKind::Tech),
    app_usage: skill_usage(&data, SkillKind::App),
  }))
}
