//! Data file locations.
//!
//! The config file is a small JSON object:
//!
//! ```json
//! {
//!   "OrgDataFileLocation": "data/organizations.json",
//!   "UserDataFileLocation": "data/users.json",
//!   "TicketDataFileLocation": "data/tickets.json"
//! }
//! ```
//!
//! Relative locations are taken relative to the directory holding the config
//! file. Command-line overrides win over the file, and when all three are
//! given the file is not read at all.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use zensearch_ingest_json::DataPaths;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "OrgDataFileLocation", default)]
    pub organizations: Option<PathBuf>,
    #[serde(rename = "UserDataFileLocation", default)]
    pub users: Option<PathBuf>,
    // Older config files spell this key `TicketDataileLocation`.
    #[serde(
        rename = "TicketDataFileLocation",
        alias = "TicketDataileLocation",
        default
    )]
    pub tickets: Option<PathBuf>,
}

impl AppConfig {
    /// Read a config file, resolving relative locations against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for location in [
            &mut config.organizations,
            &mut config.users,
            &mut config.tickets,
        ] {
            if let Some(p) = location.as_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }
}

/// Per-collection paths given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataOverrides {
    pub organizations: Option<PathBuf>,
    pub users: Option<PathBuf>,
    pub tickets: Option<PathBuf>,
}

impl DataOverrides {
    fn complete(&self) -> Option<DataPaths> {
        Some(DataPaths {
            organizations: self.organizations.clone()?,
            users: self.users.clone()?,
            tickets: self.tickets.clone()?,
        })
    }
}

pub fn resolve_data_paths(config_path: &Path, overrides: &DataOverrides) -> Result<DataPaths> {
    if let Some(paths) = overrides.complete() {
        return Ok(paths);
    }

    let config = AppConfig::load(config_path)?;
    let pick = |cli: &Option<PathBuf>, file: Option<PathBuf>, key: &str| -> Result<PathBuf> {
        cli.clone().or(file).ok_or_else(|| {
            anyhow!(
                "no {key} in {} and no command-line override",
                config_path.display()
            )
        })
    };

    Ok(DataPaths {
        organizations: pick(
            &overrides.organizations,
            config.organizations,
            "OrgDataFileLocation",
        )?,
        users: pick(&overrides.users, config.users, "UserDataFileLocation")?,
        tickets: pick(&overrides.tickets, config.tickets, "TicketDataFileLocation")?,
    })
}
