//! Handlers for the support-availability view.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/calendar` | `?team=&application=&year=&month=`; `application=*` selects all |
//! | `GET`  | `/teams/:id/coverage` | Applications by number of capable developers |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Datelike;
use manning_core::{
  availability::ApplicationSelection,
  calendar::{
    CalendarMonth, CalendarQuery, DayCell, WEEKDAY_HEADERS, compute_calendar,
    has_any_risk_days,
  },
  coverage::{ApplicationCoverage, team_applications_with_coverage},
  store::RosterStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, load, today};

// ─── Calendar ────────────────────────────────────────────────────────────────

/// Query string of `GET /calendar`. A missing year or month falls back to
/// today's.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
  pub team:        Option<String>,
  pub application: Option<ApplicationSelection>,
  pub year:        Option<i32>,
  pub month:       Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
  pub label:         String,
  pub year:          i32,
  pub month:         u32,
  pub weekdays:      [&'static str; 7],
  pub has_risk_days: bool,
  pub cells:         Vec<DayCell>,
}

/// `GET /calendar`
pub async fn month<S: RosterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<CalendarParams>,
) -> Result<Json<CalendarResponse>, ApiError> {
  let today = today();
  let month = CalendarMonth::new(
    params.year.unwrap_or(today.year()),
    params.month.unwrap_or(today.month()),
  )?;
  let query = CalendarQuery {
    month,
    team_id: params.team.filter(|t| !t.is_empty()),
    application: params
      .application
      .filter(|a| !matches!(a, ApplicationSelection::One(app) if app.is_empty())),
  };

  let data = load(&*store).await?;
  let cells = compute_calendar(&data, &query, today);
  tracing::debug!(
    month = %month.label(),
    team = ?query.team_id,
    cells = cells.len(),
    "calendar computed"
  );

  Ok(Json(CalendarResponse {
    label: month.label(),
    year: month.year(),
    month: month.month(),
    weekdays: WEEKDAY_HEADERS,
    has_risk_days: has_any_risk_days(&cells),
    cells,
  }))
}

// ─── Coverage ────────────────────────────────────────────────────────────────

/// `GET /teams/:id/coverage`
pub async fn coverage<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<ApplicationCoverage>>, ApiError> {
  let data = load(&*store).await?;
  if data.team(&id).is_none() {
    return Err(ApiError::NotFound(format!("team {id} not found")));
  }
  Ok(Json(team_applications_with_coverage(&data, &id)))
}
