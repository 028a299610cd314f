use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Which end of a flow a match field applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Destination => write!(f, "destination"),
        }
    }
}

/// Failures that abort an invocation
#[derive(Debug, Error)]
pub enum Error {
    #[error("BIRD socket {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no reply from BIRD within {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("firewall: {0}")]
    Firewall(#[from] FirewallError),
    #[error("config: {0}")]
    Config(String),
    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
}

/// A single route block could not be turned into a RouteRecord.
/// The offending route is skipped; the batch carries on.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("malformed session header '{0}'")]
    MalformedSession(String),
    #[error("invalid neighbor address '{0}'")]
    InvalidNeighborAddress(String),
    #[error("unable to parse {side} prefix '{value}'")]
    InvalidPrefix { side: Side, value: String },
    #[error("unable to parse {side} port '{value}'")]
    InvalidPort { side: Side, value: String },
    #[error("invalid extended community '{0}'")]
    InvalidCommunity(String),
    #[error("unknown flowspec action {0:#x}")]
    UnknownAction(i64),
    #[error("invalid action argument '{0}'")]
    InvalidArgument(String),
    #[error("route matches nothing")]
    EmptyMatch,
    #[error("{side} prefix {prefix} does not belong to {family}")]
    FamilyMismatch {
        side: Side,
        prefix: String,
        family: String,
    },
    #[error("no flow4/flow6 tag in route")]
    MissingFamily,
}

impl RouteError {
    /// Name of the field that failed, for skip diagnostics
    pub fn field(&self) -> &'static str {
        use RouteError::*;
        match self {
            MalformedSession(_) | InvalidNeighborAddress(_) => "session",
            InvalidPrefix { side: Side::Source, .. } => "src",
            InvalidPrefix { .. } => "dst",
            InvalidPort { side: Side::Source, .. } => "sport",
            InvalidPort { .. } => "dport",
            InvalidCommunity(_) | UnknownAction(_) | InvalidArgument(_) => "ext_community",
            EmptyMatch | FamilyMismatch { .. } => "match",
            MissingFamily => "family",
        }
    }
}

/// Packet-filter control plane failures
#[derive(Debug, Error)]
pub enum FirewallError {
    #[error("unable to run {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    Command {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("chain {0} already exists")]
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, Error>;
