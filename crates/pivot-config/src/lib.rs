//! Persistent settings for the rotation tracker.
//!
//! Settings live in a single `config.toml` under the platform config dir
//! (`$XDG_CONFIG_HOME/pivot/` on Linux). Every table and key is optional;
//! anything left out takes its built-in default.

mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Platform config dir joined with `pivot`. Created if missing.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("No platform config directory for this user")?
        .join("pivot");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create {}", dir.display()))?;
    Ok(dir)
}

/// `config.toml` inside [`config_dir`]. The file itself may not exist yet.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path()?)
}

/// Read tracker, display and simulator settings from `path`.
///
/// A missing file is not an error: a first run gets [`AppConfig::default`].
/// A file that exists but does not parse is an error naming the file.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        info!(?path, "No pivot config yet, using built-in settings");
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))?;
    info!(
        ?path,
        tick_interval_ms = config.tracker.tick_interval_ms,
        label_style = %config.display.label_style,
        "Loaded pivot config"
    );
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(config, &config_path()?)
}

/// Write every setting, defaults included, as pretty TOML. The CLI calls this
/// on first run to seed a file the user can edit.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Could not write {}", path.display()))?;
    info!(?path, "Saved pivot config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tracker.tick_interval_ms, 10);
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nlabel_style = \"leading-digit\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.display.label_style, LabelStyle::LeadingDigit);
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();
        config.tracker.tick_interval_ms = 20;
        config.simulator.yaw_rate_dps = -45.0;

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tracker]\ntick_interval_ms = \"fast\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn saved_defaults_list_every_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        save_config_to(&AppConfig::default(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        for key in [
            "[tracker]",
            "tick_interval_ms = 10",
            "[display]",
            "label_style = \"full\"",
            "[simulator]",
            "yaw_rate_dps",
        ] {
            assert!(written.contains(key), "{key} missing from:\n{written}");
        }
    }

    #[test]
    fn malformed_file_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nlabel_style = \"tiny\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err}").contains("config.toml"));
    }

    #[test]
    fn label_style_parses_cli_spelling() {
        assert_eq!("full".parse::<LabelStyle>().unwrap(), LabelStyle::Full);
        assert_eq!(
            "leading-digit".parse::<LabelStyle>().unwrap(),
            LabelStyle::LeadingDigit
        );
        assert!("short".parse::<LabelStyle>().is_err());
    }
}
