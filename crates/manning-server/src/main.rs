//! manning server binary.
//!
//! Reads `manning.toml` (or the path given with `--config`), opens the SQLite
//! roster store, and serves the JSON API under `/api`. The remaining
//! subcommands work on the same store offline.

mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use chrono::{Datelike as _, Local};
use clap::{Parser, Subcommand};
use manning_core::{
  availability::ApplicationSelection,
  calendar::{CalendarMonth, CalendarQuery, compute_calendar},
  coverage::team_applications_with_coverage,
  model::TeamData,
  stats::format_data_size,
  store::RosterStore,
};
use manning_store_sqlite::SqliteStore;
use settings::ServerConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Manning team roster server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "manning.toml", env = "MANNING_CONFIG")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API (the default).
  Serve,
  /// Print a month of the support-availability calendar.
  Calendar {
    /// Team id or name.
    #[arg(long)]
    team:        String,
    /// Application name, or `*` for every application on the team.
    #[arg(long, default_value = ApplicationSelection::ALL)]
    application: ApplicationSelection,
    #[arg(long)]
    year:        Option<i32>,
    #[arg(long)]
    month:       Option<u32>,
  },
  /// List a team's applications by number of capable developers.
  Coverage {
    /// Team id or name.
    #[arg(long)]
    team: String,
  },
  /// Write the roster as pretty JSON to a file or stdout.
  Export {
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Replace the roster with a JSON document.
  Import { file: PathBuf },
  /// Replace the roster with an empty one.
  Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let today = Local::now().date_naive();

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&cfg, store).await?,

    Command::Calendar { team, application, year, month } => {
      let data = store.load(today).await?;
      let team_id = resolve_team(&data, &team)?;
      let month = CalendarMonth::new(
        year.unwrap_or(today.year()),
        month.unwrap_or(today.month()),
      )?;
      let query = CalendarQuery { month, team_id: Some(team_id), application: Some(application) };
      print!("{}", render::calendar(month, &compute_calendar(&data, &query, today)));
    }

    Command::Coverage { team } => {
      let data = store.load(today).await?;
      let team_id = resolve_team(&data, &team)?;
      print!("{}", render::coverage(&team_applications_with_coverage(&data, &team_id)));
    }

    Command::Export { output } => {
      let json = store.load(today).await?.to_pretty_json()?;
      match output {
        Some(path) => {
          std::fs::write(&path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?;
          let size = format_data_size(json.len() as u64);
          tracing::info!(path = %path.display(), %size, "exported");
        }
        None => println!("{json}"),
      }
    }

    Command::Import { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      let mut data = TeamData::from_json(&raw)
        .with_context(|| format!("{} is not a roster document", file.display()))?;
      data.touch(today);
      store.save(data).await?;
      tracing::info!(file = %file.display(), "imported");
    }

    Command::Clear => {
      store.clear(today).await?;
      tracing::info!("roster cleared");
    }
  }

  Ok(())
}

async fn serve(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let app = Router::new()
    .nest("/api", manning_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

/// Find a team by id, falling back to an exact name match.
fn resolve_team(data: &TeamData, key: &str) -> anyhow::Result<String> {
  data
    .team(key)
    .or_else(|| data.teams.iter().find(|t| t.name == key))
    .map(|t| t.id.clone())
    .with_context(|| format!("no team with id or name {key:?}"))
}
