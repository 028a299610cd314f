use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::routes::{MatchPolicy, SplitMode};

struct Defaults {}

impl Defaults {
    fn socket() -> PathBuf {
        PathBuf::from("/run/bird/bird.ctl")
    }

    fn command() -> String {
        String::from("show route where (net.type = NET_FLOW4 || net.type = NET_FLOW6) all")
    }

    fn timeout_secs() -> u64 {
        30
    }

    fn enabled() -> bool {
        true
    }

    fn table() -> String {
        String::from("filter")
    }

    fn chain() -> String {
        String::from("FLOWSPEC")
    }

    fn commands() -> Vec<String> {
        vec![String::from("iptables")]
    }
}

/// `[bird]` section: where and how to ask BIRD for FlowSpec routes
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BirdConfig {
    // BIRD control socket
    #[serde(default = "Defaults::socket")]
    pub socket: PathBuf,
    // CLI command whose reply lists the FlowSpec routes
    #[serde(default = "Defaults::command")]
    pub command: String,
    // Give up on a silent daemon after this long
    #[serde(default = "Defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub split: SplitMode,
    #[serde(default)]
    pub match_policy: MatchPolicy,
}

/// `[firewall]` section: the dedicated packet-filter chain
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FirewallConfig {
    // When false, routes are decoded but the firewall is left alone
    #[serde(default = "Defaults::enabled")]
    pub enabled: bool,
    #[serde(default = "Defaults::table")]
    pub table: String,
    #[serde(default = "Defaults::chain")]
    pub chain: String,
    // One chain is ensured per binary (e.g. iptables, ip6tables)
    #[serde(default = "Defaults::commands")]
    pub commands: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(super) struct ConfigSpec {
    #[serde(default)]
    pub(super) bird: BirdConfig,
    #[serde(default)]
    pub(super) firewall: FirewallConfig,
}

impl ConfigSpec {
    pub(super) fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path).map_err(|err| Error::Config(format!("{}: {}", path, err)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| Error::Config(format!("{}: {}", path, err)))?;
        Self::parse(&contents).map_err(|err| match err {
            Error::Config(reason) => Error::Config(format!("{}: {}", path, reason)),
            other => other,
        })
    }

    pub(super) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| Error::Config(err.to_string()))
    }
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            socket: Defaults::socket(),
            command: Defaults::command(),
            timeout_secs: Defaults::timeout_secs(),
            split: SplitMode::default(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            enabled: Defaults::enabled(),
            table: Defaults::table(),
            chain: Defaults::chain(),
            commands: Defaults::commands(),
        }
    }
}
