//! Interactive mode for the server.
//!
//! Prompts for the bind address, port and data locations before starting
//! the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Prompts for each setting, defaulting to the environment configuration.
///
/// Returns `None` if the user cancels.
#[must_use]
pub fn prompt_config() -> Option<ServerConfig> {
    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let model_path = prompt_path("Model artifact", &defaults.model_path);
    let dataset_path = prompt_path("Rent dataset CSV", &defaults.dataset_path);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        return None;
    }

    Some(ServerConfig {
        bind_addr,
        port,
        model_path,
        dataset_path,
        static_dir: defaults.static_dir,
    })
}

fn prompt_path(prompt: &str, default: &std::path::Path) -> PathBuf {
    let default = default.display().to_string();
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.clone())
        .interact_text()
        .unwrap_or(default);
    PathBuf::from(value)
}

/// Runs the server in interactive mode, prompting for configuration.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Rent Predictor Server");
    println!();

    let Some(config) = prompt_config() else {
        println!("Cancelled.");
        return Ok(());
    };

    super::run_with_config(config).await
}
