#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone rent predictor server binary.
//!
//! Configured through `BIND_ADDR`, `PORT`, `MODEL_PATH`, `DATASET_PATH` and
//! `STATIC_DIR`.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    rent_predictor_server::run_server().await
}
