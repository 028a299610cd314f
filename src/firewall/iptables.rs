use log::trace;
use tokio::process::Command;

use crate::error::FirewallError;

use super::ChainManager;

/// Chain management through the iptables (or ip6tables) binary
#[derive(Debug, Clone)]
pub struct Iptables {
    command: String,
}

impl Iptables {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    // `-w` waits for the xtables lock instead of failing
    async fn run(&self, args: &[&str]) -> Result<String, FirewallError> {
        let invocation = format!("{} -w {}", self.command, args.join(" "));
        trace!("Running {}", invocation);
        let output = Command::new(&self.command)
            .arg("-w")
            .args(args)
            .output()
            .await
            .map_err(|source| FirewallError::Io {
                command: self.command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(FirewallError::Command {
                command: invocation,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait::async_trait]
impl ChainManager for Iptables {
    async fn list_chains(&self, table: &str) -> Result<Vec<String>, FirewallError> {
        let listing = self.run(&["-t", table, "-S"]).await?;
        Ok(parse_chains(&listing))
    }

    async fn create_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError> {
        match self.run(&["-t", table, "-N", chain]).await {
            Ok(_) => Ok(()),
            Err(FirewallError::Command { ref stderr, .. }) if stderr.contains("exists") => {
                Err(FirewallError::AlreadyExists(chain.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

/// Chain names from `iptables -S` output:
/// built-in chains appear as `-P NAME POLICY`, user chains as `-N NAME`
pub fn parse_chains(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some("-P"), Some(name)) | (Some("-N"), Some(name)) => Some(name.to_string()),
                _ => None,
            }
        })
        .collect()
}
