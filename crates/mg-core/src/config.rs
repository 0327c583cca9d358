//! Configuration types and parsing for migrant.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runner configuration from migrant.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target dialect identity or alias (e.g. `DuckDB`, `PostgreSQL`)
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema applied to expressions that do not name one
    #[serde(default)]
    pub default_schema: Option<String>,

    /// Requested tags; untagged migrations always run
    #[serde(default)]
    pub tags: Vec<String>,

    /// Where applied versions are recorded
    #[serde(default)]
    pub history: HistoryConfig,

    /// Directory holding auto-script SQL files
    #[serde(default)]
    pub scripts_path: Option<String>,

    /// Generate SQL without executing it
    #[serde(default)]
    pub preview: bool,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Schema history table location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Schema of the history table; `None` uses the connection default
    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default = "default_history_table")]
    pub table: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            schema: None,
            table: default_history_table(),
        }
    }
}

fn default_dialect() -> String {
    "DuckDB".to_string()
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_history_table() -> String {
    "VersionInfo".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            database: DatabaseConfig::default(),
            default_schema: None,
            tags: Vec::new(),
            history: HistoryConfig::default(),
            scripts_path: None,
            preview: false,
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a directory (looks for migrant.yml or migrant.yaml)
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("migrant.yml");
        let yaml_path = dir.join("migrant.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Parse and validate configuration text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.dialect.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "dialect cannot be empty".to_string(),
            });
        }

        if self.history.table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "history.table cannot be empty".to_string(),
            });
        }

        if let Some(tag) = self.tags.iter().find(|t| t.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: format!("tags contain a blank entry: '{}'", tag),
            });
        }

        for (field, value) in [
            ("default_schema", &self.default_schema),
            ("history.schema", &self.history.schema),
        ] {
            if matches!(value, Some(s) if s.trim().is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} is set but empty; omit it instead", field),
                });
            }
        }

        Ok(())
    }

    /// Scripts directory resolved against a project root
    pub fn scripts_path_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.scripts_path.as_ref().map(|p| {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
