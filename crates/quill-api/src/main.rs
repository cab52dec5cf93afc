//! quill API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite page store, and serves the JSON API over HTTP.
//!
//! Authentication is asserted, not verified, here: the `[identity]` section
//! names the account a fronting session layer has already authenticated.
//! With no identity configured the server runs anonymous and read-only.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use quill_api::{AppState, ServerConfig, api_router};
use quill_core::{
  auth::{Anonymous, AuthContext, CurrentUser},
  wiki::Wiki,
};
use quill_store_sqlite::SqlitePageStore;

#[derive(Parser)]
#[command(author, version, about = "Quill page store API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUILL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store = SqlitePageStore::open(&server_cfg.db_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.db_path)
    })?;

  let auth: Arc<dyn AuthContext> = match &server_cfg.identity {
    Some(identity) => {
      tracing::info!("asserting identity {:?}", identity.username);
      Arc::new(CurrentUser {
        id:       identity.user_id,
        username: identity.username.clone(),
        role:     identity.role,
      })
    }
    None => {
      tracing::warn!("no identity configured; running read-only");
      Arc::new(Anonymous)
    }
  };

  let state = AppState { wiki: Arc::new(Wiki::new(store)), auth };
  let app = api_router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
