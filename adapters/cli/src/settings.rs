//! Loading of TOML game settings.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_defence_core::config::GameConfig;

/// Reads and parses the settings file at `path`.
pub(crate) fn load(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings from {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
}

/// Parses settings from TOML text. Missing tables and fields keep their
/// defaults.
pub(crate) fn parse(text: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(text).context("malformed TOML")?;
    config.validate()?;
    Ok(config)
}

/// Renders the settings as TOML.
pub(crate) fn render(config: &GameConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize settings")
}
