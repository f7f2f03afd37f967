//! Configuration file and environment overrides
//!
//! Settings are read from a YAML file (by default
//! `<config_dir>/calreport/config.yaml`), then overridden by environment
//! variables, then by command-line flags in `main`. Every field is optional in
//! the file.
//!
//! ```yaml
//! reports_dir: /home/me/vault/reports
//! events: /home/me/calendar-export
//! timezone: America/Chicago
//! overrides:
//!   US Bank: "#work"
//!   Gym: "#gym"
//! targets:
//!   weekday: 6
//!   saturday: 4
//!   sunday: 0
//! ```

use crate::classifier::{TagClassifier, default_overrides};
use calreport_core::error::{CalreportError, Result};
use calreport_core::types::{Tag, TargetPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory reports are written to
pub const REPORTS_DIR_ENV: &str = "REPORTS_DIR";
/// Calendar export file or directory
pub const EVENTS_ENV: &str = "CALREPORT_EVENTS";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where report files are written
    pub reports_dir: Option<PathBuf>,
    /// Calendar export to read events from
    pub events: Option<PathBuf>,
    /// IANA timezone name; the system timezone when unset
    pub timezone: Option<String>,
    /// Event name to implied tag
    pub overrides: BTreeMap<String, Tag>,
    pub targets: TargetPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reports_dir: None,
            events: None,
            timezone: None,
            overrides: default_overrides().into_iter().collect(),
            targets: TargetPolicy::default(),
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("calreport").join(CONFIG_FILE))
    }

    /// Load the configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and defaults are used if nothing is there. Environment overrides
    /// are applied either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Read one configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CalreportError::Configuration(format!("Cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml_str(&content).map_err(|e| match e {
            CalreportError::Configuration(msg) => {
                CalreportError::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration YAML
    ///
    /// Override tags are validated here, so a bad tag is a configuration
    /// error rather than a surprise at report time.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CalreportError::Configuration(e.to_string()))
    }

    /// Apply `REPORTS_DIR` and `CALREPORT_EVENTS` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply environment-style overrides from any lookup
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(REPORTS_DIR_ENV).filter(|v| !v.is_empty()) {
            debug!("{} overrides reports_dir", REPORTS_DIR_ENV);
            self.reports_dir = Some(PathBuf::from(dir));
        }
        if let Some(events) = lookup(EVENTS_ENV).filter(|v| !v.is_empty()) {
            debug!("{} overrides events", EVENTS_ENV);
            self.events = Some(PathBuf::from(events));
        }
    }

    /// The reports directory, which must exist
    pub fn require_reports_dir(&self) -> Result<&Path> {
        let dir = self.reports_dir.as_deref().ok_or_else(|| {
            CalreportError::Configuration(format!(
                "No reports directory configured; set {REPORTS_DIR_ENV}, reports_dir in the config file, or --reports-dir"
            ))
        })?;

        if !dir.is_dir() {
            return Err(CalreportError::Configuration(format!(
                "Reports directory {} does not exist",
                dir.display()
            )));
        }
        Ok(dir)
    }

    /// The calendar export path
    pub fn require_events(&self) -> Result<&Path> {
        self.events.as_deref().ok_or_else(|| {
            CalreportError::Configuration(format!(
                "No calendar export configured; set {EVENTS_ENV}, events in the config file, or --events"
            ))
        })
    }

    /// A classifier using the configured override table
    pub fn classifier(&self) -> TagClassifier {
        TagClassifier::new(
            self.overrides
                .iter()
                .map(|(name, tag)| (name.clone(), tag.clone())),
        )
    }
}
