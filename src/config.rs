use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub font: FontConfig,
    pub table: TableConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("PROJECT_REPORT.md"),
            output: PathBuf::from("PROJECT_REPORT.docx"),
        }
    }
}

/// Font families and sizes in points.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub body: String,
    pub body_size: f64,
    pub code: String,
    pub code_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            body: "Calibri".to_string(),
            body_size: 11.0,
            code: "Courier New".to_string(),
            code_size: 10.0,
        }
    }
}

impl FontConfig {
    /// Body size in the half-points WordprocessingML uses.
    pub fn body_half_points(&self) -> u32 {
        half_points(self.body_size)
    }

    pub fn code_half_points(&self) -> u32 {
        half_points(self.code_size)
    }
}

fn half_points(size: f64) -> u32 {
    (size * 2.0).round().max(1.0) as u32
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    /// Display name of the table style.
    pub style: String,
    /// Border and accent colour as six hex digits.
    pub accent: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: "Light Grid Accent 1".to_string(),
            accent: "4F81BD".to_string(),
        }
    }
}

impl TableConfig {
    /// Style id derived from the display name, e.g. `LightGridAccent1`.
    pub fn style_id(&self) -> String {
        self.style.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
    }
}

impl Config {
    /// The configuration bundled with the binary.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                Self::compiled_default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::compiled_default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config file, using defaults");
                Self::compiled_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compiled_default_matches_struct_defaults() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[font]\nbody = \"Arial\"\n").unwrap();
        assert_eq!(config.font.body, "Arial");
        assert_eq!(config.font.body_size, 11.0);
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[font\nbody = ").unwrap();
        assert_eq!(Config::load(&path), Config::default());
    }

    #[test]
    fn unreadable_path_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()), Config::default());
    }

    #[test]
    fn sizes_in_half_points() {
        let font = FontConfig::default();
        assert_eq!(font.body_half_points(), 22);
        assert_eq!(font.code_half_points(), 20);
    }

    #[test]
    fn table_style_id() {
        assert_eq!(TableConfig::default().style_id(), "LightGridAccent1");
    }
}
