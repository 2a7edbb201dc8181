//! [`SqliteStore`], the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info, warn};

use manning_core::{
  model::TeamData,
  store::{RosterStore, STORAGE_KEY},
};

use crate::{Result, schema::SCHEMA};

/// Key under which an unreadable roster is kept before it is replaced.
pub const BACKUP_KEY: &str = "projectManningTeamData.invalid";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn read_key(&self, key: &'static str) -> Result<Option<String>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM kv WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  async fn write_key(&self, key: &'static str, value: String) -> Result<()> {
    let at = Utc::now().to_rfc3339();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
          rusqlite::params![key, value, at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The raw stored document, if any.
  pub async fn read_raw(&self) -> Result<Option<String>> { self.read_key(STORAGE_KEY).await }

  /// Store `json` verbatim under the roster key.
  pub async fn write_raw(&self, json: String) -> Result<()> {
    self.write_key(STORAGE_KEY, json).await
  }

  /// The last payload that failed to parse as a roster, if any.
  pub async fn read_backup(&self) -> Result<Option<String>> { self.read_key(BACKUP_KEY).await }

  async fn reset(&self, today: NaiveDate) -> Result<TeamData> {
    let empty = TeamData::empty(today);
    self.write_raw(empty.to_json()?).await?;
    Ok(empty)
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = crate::Error;

  async fn load(&self, today: NaiveDate) -> Result<TeamData> {
    match self.read_raw().await? {
      Some(raw) => match TeamData::from_json(&raw) {
        Ok(data) => {
          debug!(bytes = raw.len(), "loaded roster");
          Ok(data)
        }
        Err(err) => {
          warn!(
            %err,
            bytes = raw.len(),
            backup = BACKUP_KEY,
            "stored roster is invalid; kept a copy and starting from an empty one"
          );
          self.write_key(BACKUP_KEY, raw).await?;
          self.reset(today).await
        }
      },
      None => {
        info!("no stored roster; initialising an empty one");
        self.reset(today).await
      }
    }
  }

  async fn save(&self, data: TeamData) -> Result<()> {
    let json = data.to_json()?;
    debug!(bytes = json.len(), "saving roster");
    self.write_raw(json).await
  }

  async fn clear(&self, today: NaiveDate) -> Result<TeamData> {
    info!("clearing roster");
    self.reset(today).await
  }

  async fn has_stored_data(&self) -> Result<bool> {
    Ok(self.read_raw().await?.is_some())
  }

  async fn data_size(&self) -> Result<u64> {
    Ok(self.read_raw().await?.map_or(0, |raw| raw.len() as u64))
  }
}
