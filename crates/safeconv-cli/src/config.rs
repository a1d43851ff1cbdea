use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use safeconv_core::{Palette, Rgb};
use serde::{Deserialize, Serialize};

use crate::{CliError, CliResult};

/// Settings file consulted when `--config` is not given.
pub const DEFAULT_SETTINGS_PATH: &str = "safeconv.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    /// Extra named colors, merged over the basic palette.
    pub colors: BTreeMap<String, [u8; 3]>,
}

impl Settings {
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::default();
        for (name, channels) in &self.colors {
            palette.insert(name, Rgb::from(*channels));
        }
        palette
    }
}

/// Load settings from an explicit path, or from the default path when present.
///
/// An explicit path must exist; the default one is optional.
pub fn load_settings(explicit: Option<&Path>) -> CliResult<Settings> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError::InvalidConfig(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            path
        }
        None => {
            let path = Path::new(DEFAULT_SETTINGS_PATH);
            if !path.is_file() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("safeconv_settings_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn decodes_full_settings() {
        let path = temp_settings(
            r#"
[log]
level = "debug"
format = "json"
file = "safeconv.log"

[colors]
Brand = [18, 52, 86]
"#,
        );

        let settings = load_settings(Some(path.as_path())).expect("load settings");
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.log.file, Some(PathBuf::from("safeconv.log")));

        let palette = settings.palette();
        assert_eq!(palette.get("brand"), Some(Rgb::new(18, 52, 86)));
        assert_eq!(palette.get("blue"), Some(Rgb::new(0, 0, 255)));

        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let path = temp_settings("[colors]\nsky = [135, 206, 235]\n");
        let settings = load_settings(Some(path.as_path())).expect("load settings");
        assert_eq!(settings.log, LogSettings::default());
        assert_eq!(settings.colors.len(), 1);
        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn explicit_missing_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("safeconv_absent_{}.toml", uuid::Uuid::new_v4()));
        let err = load_settings(Some(path.as_path())).expect_err("missing settings");
        assert!(matches!(err, CliError::InvalidConfig(_)));
    }

    #[test]
    fn out_of_range_channel_fails_to_decode() {
        let path = temp_settings("[colors]\nhot = [300, 0, 0]\n");
        let err = load_settings(Some(path.as_path())).expect_err("invalid channel");
        assert!(matches!(err, CliError::TomlDecode(_)));
        std::fs::remove_file(&path).expect("cleanup");
    }
}
