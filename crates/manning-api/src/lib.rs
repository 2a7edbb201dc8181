//! JSON REST API for Manning.
//!
//! Exposes an axum [`Router`] backed by any [`RosterStore`]. Every request
//! loads the roster, applies one pure transform from `manning-core` and, for
//! mutations, saves the whole document back. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", manning_api::api_router(store.clone()))
//! ```

pub mod calendar;
pub mod dashboard;
pub mod data;
pub mod developers;
pub mod error;
pub mod etag;
pub mod managers;
pub mod skills;
pub mod teams;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use chrono::{Local, NaiveDate};
use manning_core::{model::TeamData, store::RosterStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Managers
    .route("/managers", get(managers::list::<S>).post(managers::create::<S>))
    .route(
      "/managers/{id}",
      get(managers::get_one::<S>)
        .put(managers::update::<S>)
        .delete(managers::remove::<S>),
    )
    // Teams
    .route("/teams", get(teams::list::<S>).post(teams::create::<S>))
    .route(
      "/teams/{id}",
      get(teams::get_one::<S>).put(teams::update::<S>).delete(teams::remove::<S>),
    )
    .route("/teams/{id}/developers", get(teams::members::<S>))
    .route("/teams/{id}/coverage", get(calendar::coverage::<S>))
    // Developers
    .route("/developers", get(developers::list::<S>).post(developers::create::<S>))
    .route(
      "/developers/{id}",
      get(developers::get_one::<S>)
        .put(developers::update::<S>)
        .delete(developers::remove::<S>),
    )
    .route("/developers/{id}/skills/{kind}/{skill}", put(developers::rate::<S>))
    .route("/developers/{id}/vacations", post(developers::add_vacation::<S>))
    .route(
      "/developers/{id}/vacations/{index}",
      put(developers::update_vacation::<S>).delete(developers::delete_vacation::<S>),
    )
    // Skill definitions
    .route("/skills/{kind}", get(skills::list::<S>).post(skills::create::<S>))
    .route(
      "/skills/{kind}/{name}",
      put(skills::update::<S>).delete(skills::remove::<S>),
    )
    // Availability
    .route("/calendar", get(calendar::month::<S>))
    .route("/dashboard", get(dashboard::summary::<S>))
    // Whole document
    .route(
      "/data",
      get(data::export::<S>).put(data::import::<S>).delete(data::clear::<S>),
    )
    .with_state(store)
}

// ─── Roster round trip ───────────────────────────────────────────────────────

/// The local calendar date, used to stamp changes and mark today's cell.
pub fn today() -> NaiveDate { Local::now().date_naive() }

pub(crate) async fn load<S: RosterStore>(store: &S) -> Result<TeamData, ApiError> {
  store.load(today()).await.map_err(ApiError::store)
}

/// Stamp `data` with today's date and persist it.
pub(crate) async fn commit<S: RosterStore>(store: &S, mut data: TeamData) -> Result<(), ApiError> {
  data.touch(today());
  store.save(data).await.map_err(ApiError::store)
}
