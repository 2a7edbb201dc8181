//! Error types for `manning-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::SkillKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("manager not found: {0}")]
  ManagerNotFound(String),

  #[error("team not found: {0}")]
  TeamNotFound(String),

  #[error("developer not found: {0}")]
  DeveloperNotFound(String),

  #[error("{kind} skill not found: {name}")]
  SkillNotFound { kind: SkillKind, name: String },

  #[error("skill name must not be empty")]
  EmptySkillName,

  #[error("developer {developer} has no vacation entry at index {index}")]
  VacationIndexOutOfRange { developer: String, index: usize },

  #[error("vacation range ends ({end}) before it starts ({start})")]
  InvertedVacationRange { start: NaiveDate, end: NaiveDate },

  #[error("rating {0} is outside the 0-10 scale")]
  RatingOutOfScale(u8),

  #[error("invalid month: {year}-{month}")]
  InvalidMonth { year: i32, month: u32 },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
