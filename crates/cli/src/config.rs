//! Configuration management for the CLI
//!
//! Layers, lowest first: built-in defaults, the config file, then
//! `GKO__SECTION__FIELD` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use optimizer_lib::OptimizerConfig;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "GKO";

/// Load and validate the optimizer configuration
pub fn load(explicit: Option<&Path>) -> Result<OptimizerConfig> {
    load_with_env(explicit, None)
}

fn load_with_env(
    explicit: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<OptimizerConfig> {
    let mut builder = config::Config::builder();

    match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = config_path() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("Failed to load configuration")?;

    let config: OptimizerConfig = settings
        .try_deserialize()
        .context("Failed to parse configuration")?;
    config.validate().context("Invalid configuration")?;

    tracing::debug!(
        significant_monthly_spend = config.thresholds.significant_monthly_spend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Get the default configuration file path
fn config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("gko").join("config.toml"))
}
