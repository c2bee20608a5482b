#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the rent predictor.
//!
//! Serves the REST API behind the rent prediction form and the static front
//! end. The model artifact and the historical listings CSV are loaded once
//! at startup; if either fails to load the server does not start. Both are
//! read-only afterwards and shared by every worker without locking.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, error, middleware, web};
use rent_predictor_analytics::AnalyticsError;
use rent_predictor_analytics::aggregate::summarize_cities;
use rent_predictor_analytics::dataset::load_dataset;
use rent_predictor_analytics_models::CityRentSummary;
use rent_predictor_geography::CityCoordinateTable;
use rent_predictor_model::{ModelError, ModelHandle, RentOracle};
use rent_predictor_property_models::FEATURE_SCHEMA;
use rent_predictor_server_models::ApiError;
use thiserror::Error;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default model artifact location.
pub const DEFAULT_MODEL_PATH: &str = "data/model";
/// Default historical listings CSV.
pub const DEFAULT_DATASET_PATH: &str = "data/houses_to_rent_v2.csv";
/// Default front-end directory.
pub const DEFAULT_STATIC_DIR: &str = "app/dist";

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Model artifact file or directory (`MODEL_PATH`).
    pub model_path: PathBuf,
    /// Historical listings CSV (`DATASET_PATH`).
    pub dataset_path: PathBuf,
    /// Front-end files served at `/` (`STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from `BIND_ADDR`, `PORT`, `MODEL_PATH`,
    /// `DATASET_PATH` and `STATIC_DIR`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            model_path: lookup("MODEL_PATH").map_or(defaults.model_path, PathBuf::from),
            dataset_path: lookup("DATASET_PATH").map_or(defaults.dataset_path, PathBuf::from),
            static_dir: lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        }
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The model could not be loaded or does not match the feature schema.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The historical listings could not be loaded.
    #[error("Dataset error: {0}")]
    Dataset(#[from] AnalyticsError),
}

/// Shared application state.
pub struct AppState {
    /// The rent model, shared read-only by every worker.
    pub model: Arc<dyn RentOracle>,
    /// Per-city averages computed once from the listings CSV.
    pub city_summaries: Arc<Vec<CityRentSummary>>,
}

impl AppState {
    /// Loads the model and the listings and precomputes the city averages.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Model`] if the artifact cannot be loaded or was
    /// trained on a different feature schema, or [`StartupError::Dataset`] if
    /// the CSV cannot be read.
    pub fn load(config: &ServerConfig) -> Result<Self, StartupError> {
        let model = ModelHandle::load(&config.model_path)?;
        model.ensure_schema(FEATURE_SCHEMA)?;

        let listings = load_dataset(&config.dataset_path)?;
        let city_summaries = summarize_cities(&listings, &CityCoordinateTable::builtin());
        log::info!("Computed average rent for {} cities", city_summaries.len());

        Ok(Self {
            model: Arc::new(model),
            city_summaries: Arc::new(city_summaries),
        })
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiError::bad_request(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/health", web::get().to(handlers::health))
            .route("/form", web::get().to(handlers::form))
            .route("/predict", web::post().to(handlers::predict))
            .route(
                "/feature-importance",
                web::get().to(handlers::feature_importance),
            )
            .route("/city-rents", web::get().to(handlers::city_rents))
            .route("/map", web::get().to(handlers::rent_map)),
    );
}

/// Starts the rent predictor API server using [`ServerConfig::from_env`].
///
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the model or dataset fails to load,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::try_init_custom_env("RUST_LOG").ok();
    run_with_config(ServerConfig::from_env()).await
}

/// Starts the server with an explicit configuration.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the model or dataset fails to load,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_with_config(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::load(&config).map_err(|e| {
        log::error!("Failed to start: {e}");
        std::io::Error::other(e)
    })?;
    let state = web::Data::new(state);
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn config_falls_back_to_defaults() {
        assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
    }

    #[test]
    fn config_reads_overrides() {
        let vars: BTreeMap<&str, &str> = [
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9000"),
            ("MODEL_PATH", "/srv/model.json"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|key| vars.get(key).map(ToString::to_string));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
    }

    #[test]
    fn invalid_port_uses_default() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    fn workspace_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(relative)
    }

    #[test]
    fn loads_bundled_sample_data() {
        let config = ServerConfig {
            model_path: workspace_path(DEFAULT_MODEL_PATH),
            dataset_path: workspace_path(DEFAULT_DATASET_PATH),
            ..ServerConfig::default()
        };
        let state = AppState::load(&config).unwrap();

        assert_eq!(state.city_summaries.len(), 5);
        assert!(state.city_summaries.iter().all(|s| s.coordinates.is_some()));
        assert!(state.model.feature_importance().is_ok());
    }

    #[test]
    fn missing_dataset_prevents_startup() {
        let config = ServerConfig {
            model_path: workspace_path(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from("/nonexistent/houses.csv"),
            ..ServerConfig::default()
        };
        assert!(matches!(
            AppState::load(&config),
            Err(StartupError::Dataset(AnalyticsError::Io { .. }))
        ));
    }

    #[test]
    fn missing_model_prevents_startup() {
        let config = ServerConfig {
            model_path: PathBuf::from("/nonexistent/model"),
            ..ServerConfig::default()
        };
        assert!(matches!(
            AppState::load(&config),
            Err(StartupError::Model(ModelError::Io { .. }))
        ));
    }
}
