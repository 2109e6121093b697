//! Service configuration read from the environment.

use std::path::PathBuf;

use crate::error::{PslError, Result};
use crate::table::{RuleTable, TableOptions};

/// Default listening port
pub const DEFAULT_PORT: u16 = 80;

pub const ENV_PORT: &str = "PORT";
pub const ENV_PSL_FILE: &str = "PSL_FILE";
pub const ENV_ICANN_ONLY: &str = "PSL_ICANN_ONLY";

/// Service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// TCP port the HTTP front end listens on
    pub port: u16,
    /// PSL file to load; the bundled snapshot is used when unset
    pub psl_file: Option<PathBuf>,
    /// Keep PRIVATE section rules
    pub include_private_domains: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            psl_file: None,
            include_private_domains: true,
        }
    }
}

impl ServiceConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Load rules from a file instead of the bundled snapshot.
    pub fn with_psl_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.psl_file = Some(path.into());
        self
    }

    /// Keep or drop PRIVATE section rules.
    pub fn with_private_domains(mut self, include: bool) -> Self {
        self.include_private_domains = include;
        self
    }

    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| {
                PslError::ConfigError(format!("{} must be a port number, got {:?}", ENV_PORT, port))
            })?;
        }

        if let Some(path) = lookup(ENV_PSL_FILE).filter(|p| !p.trim().is_empty()) {
            config.psl_file = Some(PathBuf::from(path.trim()));
        }

        if let Some(flag) = lookup(ENV_ICANN_ONLY) {
            config.include_private_domains = !parse_flag(ENV_ICANN_ONLY, &flag)?;
        }

        Ok(config)
    }

    /// Address the HTTP front end should bind
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions::new().with_private_domains(self.include_private_domains)
    }

    /// Build the rule table these settings describe.
    pub fn load_table(&self) -> Result<RuleTable> {
        let options = self.table_options();
        match &self.psl_file {
            Some(path) => {
                log::info!("loading public suffix list from {}", path.display());
                RuleTable::from_file(path, &options)
            }
            None => {
                log::info!("loading bundled public suffix list");
                RuleTable::builtin_with_options(&options)
            }
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(PslError::ConfigError(format!(
            "{} must be a boolean, got {:?}",
            name, other
        ))),
    }
}
