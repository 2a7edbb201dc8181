//! The `RosterStore` trait.
//!
//! The roster is persisted as a single JSON document under one key. Backends
//! (e.g. `manning-store-sqlite`) implement this trait; the API and binary
//! depend on the abstraction only.

use std::future::Future;

use chrono::NaiveDate;

use crate::model::TeamData;

/// Key under which the roster document is stored.
pub const STORAGE_KEY: &str = "projectManningTeamData";

/// Abstraction over a roster persistence backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the stored roster.
  ///
  /// When nothing is stored, or the stored document does not parse, an empty
  /// roster stamped with `today` is saved and returned instead.
  fn load(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<TeamData, Self::Error>> + Send + '_;

  /// Replace the stored roster.
  fn save(
    &self,
    data: TeamData,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the stored roster with an empty one and return it.
  fn clear(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<TeamData, Self::Error>> + Send + '_;

  /// Whether any document is stored, valid or not.
  fn has_stored_data(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Size of the stored document in bytes; zero when nothing is stored.
  fn data_size(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
