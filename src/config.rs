use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::directory::CustomerProfile;

/// Application configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// MicroSIP INI holding the `[Calls]` history
    #[serde(default = "default_calls_path")]
    pub calls_path: PathBuf,

    /// Where unknown callers are appended
    #[serde(default = "default_unknown_csv_path")]
    pub unknown_csv_path: PathBuf,

    /// CSS color used when highlighting numbers in web results
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,

    /// How long desktop notifications stay visible
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u32,

    /// Customer directory
    #[serde(default)]
    pub customers: Vec<CustomerProfile>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calls_path: default_calls_path(),
            unknown_csv_path: default_unknown_csv_path(),
            highlight_color: default_highlight_color(),
            notify_timeout_ms: default_notify_timeout_ms(),
            customers: Vec::new(),
        }
    }
}

/// MicroSIP keeps its INI under the roaming config dir on Windows
fn default_calls_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("microsip.ini"),
        |dirs| dirs.config_dir().join("MicroSIP").join("microsip.ini"),
    )
}

fn default_unknown_csv_path() -> PathBuf {
    PathBuf::from("unknown_calls.csv")
}

fn default_highlight_color() -> String {
    "lightgreen".to_string()
}

fn default_notify_timeout_ms() -> u32 {
    10_000
}

impl AppConfig {
    /// Get the default configuration path (~/.config/callercard/config.toml)
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new().map_or_else(
            || PathBuf::from("~/.config/callercard/config.toml"),
            |dirs| dirs.config_dir().join("callercard").join("config.toml"),
        )
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        "Loaded configuration from {:?} ({} customers)",
                        path,
                        config.customers.len()
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Generate example configuration file content
    pub fn example() -> String {
        r##"# callercard configuration
# Place this file at ~/.config/callercard/config.toml

# MicroSIP INI containing the [Calls] section
calls_path = "C:/Users/Administrator/AppData/Roaming/MicroSIP/microsip.ini"

# Unknown callers are appended here
unknown_csv_path = "unknown_calls.csv"

# Color of highlighted numbers in web results
highlight_color = "lightgreen"

# Desktop notification timeout
notify_timeout_ms = 10000

[[customers]]
customer_id = 1
business_name = "Acme Bakery"
sector = "Restaurant"
program = "Restaurant"
vat = "EL123456789"
email = "info@acmebakery.gr"
owner_first = "Eleni"
owner_last = "Papadaki"
notes = "Prefers morning visits. Gluten-free line launched in June."
phones = ["282 704 7400"]
tags = [
    { name = "Owes money", color = "#FFA500" },
    { name = "Priority", color = "#FFB3B3" },
]

[[customers.services]]
description = "Website redesign"
amount = 500.0
date = "2025-05-18"
paid = true

[[customers.services]]
description = "Monthly maintenance"
amount = 150.0
date = "2025-08-01"
paid = false
"##
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load_from_path(&tmp.path().join("config.toml"));
        assert_eq!(config.highlight_color, "lightgreen");
        assert_eq!(config.notify_timeout_ms, 10_000);
        assert_eq!(config.unknown_csv_path, PathBuf::from("unknown_calls.csv"));
        assert!(config.customers.is_empty());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "calls_path = [not toml").unwrap();
        let config = AppConfig::load_from_path(&path);
        assert_eq!(config.highlight_color, "lightgreen");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "highlight_color = \"gold\"\n").unwrap();
        let config = AppConfig::load_from_path(&path);
        assert_eq!(config.highlight_color, "gold");
        assert_eq!(config.notify_timeout_ms, 10_000);
    }

    #[test]
    fn test_example_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example()).unwrap();
        assert_eq!(config.customers.len(), 1);
        let customer = &config.customers[0];
        assert_eq!(customer.business_name, "Acme Bakery");
        assert_eq!(customer.tags.len(), 2);
        assert_eq!(customer.services.len(), 2);
        assert!((customer.unpaid_total() - 150.0).abs() < f64::EPSILON);
    }
}
