//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::ZonePolicy;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub regions_file: Option<String>,
    pub shared_dir: Option<String>,
    pub zoning: Option<ZonePolicy>,
}

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the region store and shared snapshots
    pub data_dir: PathBuf,
    /// File name of the region store, relative to `data_dir`
    pub regions_file: String,
    /// Directory of shared snapshots, relative to `data_dir`
    pub shared_dir: String,
    /// Which department a destination contributes to the zoning rule
    pub zoning: ZonePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            regions_file: "regions.json".into(),
            shared_dir: "shared".into(),
            zoning: ZonePolicy::default(),
        }
    }
}

/// Default data directory (platform data dir, `~/.orgtree` as fallback).
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "orgtree")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .or_else(|| directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".orgtree")))
        .unwrap_or_else(|| PathBuf::from("~/.orgtree"))
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Path of the region store.
    pub fn regions_path(&self) -> PathBuf {
        self.data_dir.join(&self.regions_file)
    }

    /// Directory of shared snapshots.
    pub fn shared_path(&self) -> PathBuf {
        self.data_dir.join(&self.shared_dir)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the data directory.
    fn expand_paths(&mut self) {
        let raw = self.data_dir.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| shellexpand::tilde(&raw).into_owned());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Overlay values that are set; keep the rest.
    fn apply_raw(&self, raw: &RawSettings) -> Self {
        Self {
            data_dir: raw.data_dir.clone().unwrap_or_else(|| self.data_dir.clone()),
            regions_file: raw
                .regions_file
                .clone()
                .unwrap_or_else(|| self.regions_file.clone()),
            shared_dir: raw
                .shared_dir
                .clone()
                .unwrap_or_else(|| self.shared_dir.clone()),
            zoning: raw.zoning.unwrap_or(self.zoning),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
    /// 3. Environment variables: `ORGTREE_*` prefix
    pub fn load() -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_raw(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let mut raw = RawSettings::default();
        if let Ok(val) = config.get_string("data_dir") {
            raw.data_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("regions_file") {
            raw.regions_file = Some(val);
        }
        if let Ok(val) = config.get_string("shared_dir") {
            raw.shared_dir = Some(val);
        }
        if let Ok(val) = config.get_string("zoning") {
            let policy = val.parse::<ZonePolicy>().map_err(|e| ApplicationError::Config {
                message: format!("ORGTREE_ZONING: {e}"),
            })?;
            raw.zoning = Some(policy);
        }

        Ok(settings.apply_raw(&raw))
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgtree/orgtree.toml
#   Env:    ORGTREE_* environment variables (explicit overrides)

# Directory holding the region store and shared snapshots
# data_dir = "~/.local/share/orgtree"

# Region store file name inside data_dir
# regions_file = "regions.json"

# Shared snapshot directory inside data_dir
# shared_dir = "shared"

# Department zoning of a destination:
#   "direct"    - only the destination node's own department counts
#   "inherited" - nearest department on the destination's ancestor chain
# zoning = "direct"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_resolving_paths_then_joins_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/srv/orgtree"),
            ..Settings::default()
        };

        assert_eq!(
            settings.regions_path(),
            PathBuf::from("/srv/orgtree/regions.json")
        );
        assert_eq!(settings.shared_path(), PathBuf::from("/srv/orgtree/shared"));
        assert_eq!(settings.zoning, ZonePolicy::Direct);
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.orgtree"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_dir = settings.data_dir.to_string_lossy();
        assert!(data_dir.starts_with(&home), "expanded: {data_dir}");
        assert!(!data_dir.contains('~'));
    }

    #[test]
    fn given_partial_raw_settings_when_applied_then_keeps_unset_fields() {
        let base = Settings {
            data_dir: PathBuf::from("/base"),
            ..Settings::default()
        };
        let raw = RawSettings {
            zoning: Some(ZonePolicy::Inherited),
            regions_file: Some("chart.json".into()),
            ..RawSettings::default()
        };

        let merged = base.apply_raw(&raw);

        assert_eq!(merged.data_dir, PathBuf::from("/base"));
        assert_eq!(merged.regions_file, "chart.json");
        assert_eq!(merged.shared_dir, "shared");
        assert_eq!(merged.zoning, ZonePolicy::Inherited);
    }

    #[test]
    fn given_toml_with_zoning_when_parsing_then_reads_policy() {
        let raw: RawSettings = toml::from_str("zoning = \"inherited\"\n").unwrap();
        assert_eq!(raw.zoning, Some(ZonePolicy::Inherited));
        assert!(raw.data_dir.is_none());
    }

    #[test]
    fn given_settings_when_to_toml_then_template_keys_match() {
        let toml = Settings::default().to_toml().unwrap();
        for key in ["data_dir", "regions_file", "shared_dir", "zoning"] {
            assert!(toml.contains(key), "missing {key}");
            assert!(Settings::template().contains(key));
        }
    }
}
