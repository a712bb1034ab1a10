#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the safety score engine.
//!
//! Parses the comma-separated `review` payload, fills in the service's
//! default environmental flags when the tables' composition policy reads
//! them, and scores the point with a shared,
//! immutable [`RiskEngine`]. Handlers never lock: the engine is read-only
//! for the lifetime of the process.

pub mod config;
mod handlers;
pub mod review;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use safety_score::{RiskEngine, TableError};
use safety_score_models::EnvironmentalFlags;
use thiserror::Error;

pub use crate::config::{ScoringDefaults, ServerConfig};

/// Errors that can occur while starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Risk tables failed to load.
    #[error("Risk table error: {0}")]
    Tables(#[from] TableError),

    /// Binding or running the HTTP server failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Scoring engine over the static risk tables.
    pub engine: RiskEngine,
    /// Environmental flags assumed for requests when the engine's
    /// composition policy reads them.
    pub defaults: ScoringDefaults,
}

impl AppState {
    /// Pairs an engine with scoring defaults.
    ///
    /// Logs a warning when `SAFETY_DEFAULT_*` variables are set but the
    /// engine's composition policy ignores environmental flags.
    #[must_use]
    pub fn new(engine: RiskEngine, defaults: ScoringDefaults) -> Self {
        if !engine.uses_environment() {
            let overrides = ScoringDefaults::overrides_in_env();
            if !overrides.is_empty() {
                log::warn!(
                    "{} ignored: '{}' composition does not use environmental flags",
                    overrides.join(", "),
                    engine.tables().composition,
                );
            }
        }

        Self { engine, defaults }
    }

    /// Loads the engine and scoring defaults from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SAFETY_TABLES_PATH` names tables that cannot be
    /// loaded.
    pub fn from_env() -> Result<Self, TableError> {
        Ok(Self::new(RiskEngine::from_env()?, ScoringDefaults::from_env()))
    }

    /// Flags to attach to a request, or `None` when the composition policy
    /// would not read them.
    #[must_use]
    pub const fn environment(&self) -> Option<EnvironmentalFlags> {
        if self.engine.uses_environment() {
            Some(self.defaults.environment)
        } else {
            None
        }
    }
}

/// Registers every route and the JSON extractor config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error))
        .route("/sentiment_score", web::post().to(handlers::sentiment_score))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/hotspots", web::get().to(handlers::hotspots))
                .route("/safe-zones", web::get().to(handlers::safe_zones))
                .route("/safety/breakdown", web::post().to(handlers::breakdown)),
        );
}

/// Starts the safety score API server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an error if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig, state: AppState) -> Result<(), ServerError> {
    let state = web::Data::new(state);
    let ServerConfig { bind_addr, port } = config;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
