#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI for the rent predictor.
//!
//! Lets users start the API server, predict the rent of a single property
//! from terminal prompts, or print the feature importance ranking and the
//! per-city rent averages. Paths come from the same environment variables
//! as the server (`MODEL_PATH`, `DATASET_PATH`).

mod predict;
mod report;

use dialoguer::Select;
use rent_predictor_server::ServerConfig;

/// Top-level action selection.
enum Tool {
    Server,
    Predict,
    FeatureImportance,
    CityRents,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Server,
        Self::Predict,
        Self::FeatureImportance,
        Self::CityRents,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Predict => "Predict rent",
            Self::FeatureImportance => "Show feature importance",
            Self::CityRents => "Show average rent by city",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::try_init_custom_env("RUST_LOG").ok();

    println!("Rent Predictor");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let config = ServerConfig::from_env();

    match Tool::ALL[idx] {
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(rent_predictor_server::interactive::run())
            })
            .await??;
        }
        Tool::Predict => predict::run(&config)?,
        Tool::FeatureImportance => report::feature_importance(&config)?,
        Tool::CityRents => report::city_rents(&config)?,
    }

    Ok(())
}
