//! Newslens Companion · popup + quiz page host
//!
//! - Analyzer Popup: forwards text to the analysis service and renders the verdict
//! - Quiz Scorer: grades quiz forms, paints question blocks, reports and redirects
//! - Axum HTTP + WebSocket event API, optional static front end
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   ANALYZER_BASE_URL     : analysis service origin (default "http://127.0.0.1:5000")
//!   COMPANION_CONFIG_PATH : path to TOML config (service, popup messages, quiz styling)
//!   STATIC_DIR            : front end directory (default "./static")
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod analysis;
mod popup;
mod quiz;
mod quizgen;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new()?);

  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into());
  let app = build_router(state, &static_dir);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "newslens", %addr, %static_dir, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
