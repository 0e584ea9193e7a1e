//! HTTP server wiring for Trainplan.
//!
//! Mounts the JSON API from `trainplan-api` under `/api` next to a liveness
//! check, and owns the server's configuration shape.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use trainplan_core::store::ScheduleStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered
/// under `TRAINPLAN_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("trainplan.db") }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router over `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: ScheduleStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", trainplan_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;
  use trainplan_store_sqlite::SqliteStore;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store))
  }

  #[tokio::test]
  async fn health_returns_ok() {
    let resp = app()
      .await
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 64).await.unwrap();
    assert_eq!(&body[..], b"ok");
  }

  #[tokio::test]
  async fn api_is_nested() {
    let uri = "/api/workouts?coach_id=00000000-0000-0000-0000-000000000000";
    let resp = app()
      .await
      .oneshot(Request::get(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app()
      .await
      .oneshot(Request::get("/workouts").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str("port = 9000", config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("trainplan.db"));
    assert_eq!(cfg.address(), "127.0.0.1:9000");
  }
}
