pub mod config;
pub mod control;
#[cfg(feature = "cli")]
pub mod display;
pub mod error;
pub mod firewall;
mod handler;
pub mod routes;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use handler::{process_reply, reconcile_chains, run, Report, SkippedRoute};
