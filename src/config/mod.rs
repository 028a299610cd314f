mod file;

pub use file::{BirdConfig, FirewallConfig};

use std::time::Duration;

use crate::error::Result;

/// Parse a TOML config file and return a Config
pub fn from_file(path: &str) -> Result<Config> {
    let spec = file::ConfigSpec::from_file(path)?;
    Ok(Config::from_spec(spec))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub bird: BirdConfig,
    pub firewall: FirewallConfig,
}

impl Config {
    fn from_spec(spec: file::ConfigSpec) -> Self {
        Self {
            bird: spec.bird,
            firewall: spec.firewall,
        }
    }
}

impl BirdConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
