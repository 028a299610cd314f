use log::{debug, info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::control::BirdClient;
use crate::error::{Result, RouteError};
use crate::firewall::{ensure_chain, ChainManager, Iptables};
use crate::routes::{split_routes, MatchPolicy, RouteRecord, RouteScanner, SplitMode};

/// A route block that could not be decoded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRoute {
    pub index: usize,
    pub error: RouteError,
    pub raw: String,
}

/// Outcome of decoding one BIRD reply
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub records: Vec<RouteRecord>,
    #[serde(skip)]
    pub skipped: Vec<SkippedRoute>,
}

/// Decode every FlowSpec route in a BIRD reply.
/// Routes that fail to decode are logged and left out; they never fail the batch.
pub fn process_reply(reply: &str, split: SplitMode, policy: MatchPolicy) -> Report {
    let blocks = split_routes(reply, split);
    debug!("Found {} flowspec route blocks ({} split)", blocks.len(), split);
    let mut report = Report::default();
    for (index, block) in blocks.into_iter().enumerate() {
        match RouteRecord::parse(block, policy) {
            Ok(record) => {
                info!("Route #{}: {}", index, record);
                report.records.push(record);
            }
            Err(error) => {
                warn!(
                    "Skipping flowspec route #{} ({}: '{}'): {}",
                    index,
                    error.field(),
                    failing_text(&RouteScanner::new(block), &error),
                    error
                );
                debug!("Skipped route #{} text: {}", index, block.trim());
                report.skipped.push(SkippedRoute {
                    index,
                    error,
                    raw: block.trim().to_string(),
                });
            }
        }
    }
    report
}

/// The slice of the route the failed parser was looking at
fn failing_text<'a>(scanner: &RouteScanner<'a>, error: &RouteError) -> &'a str {
    use RouteError::*;
    match error {
        MalformedSession(_) | InvalidNeighborAddress(_) => scanner.session(),
        InvalidCommunity(_) | UnknownAction(_) | InvalidArgument(_) => scanner.community(),
        MissingFamily => scanner.text().lines().next().unwrap_or("").trim(),
        InvalidPrefix { .. } | InvalidPort { .. } | EmptyMatch | FamilyMismatch { .. } => {
            scanner.clause()
        }
    }
}

/// Make sure the dedicated chain exists behind every configured firewall binary
pub async fn reconcile_chains(managers: &[Box<dyn ChainManager>], config: &Config) -> Result<()> {
    for manager in managers {
        ensure_chain(manager.as_ref(), &config.firewall.table, &config.firewall.chain).await?;
    }
    Ok(())
}

/// One full pass: fetch routes from BIRD, decode them, ensure the firewall chain
pub async fn run(config: &Config) -> Result<Report> {
    let client = BirdClient::from_config(&config.bird);
    let reply = client.execute(&config.bird.command).await?;
    let report = process_reply(&reply, config.bird.split, config.bird.match_policy);
    info!(
        "Decoded {} flowspec routes, skipped {}",
        report.records.len(),
        report.skipped.len()
    );

    if config.firewall.enabled {
        let managers: Vec<Box<dyn ChainManager>> = config
            .firewall
            .commands
            .iter()
            .map(|command| Box::new(Iptables::new(command.as_str())) as Box<dyn ChainManager>)
            .collect();
        reconcile_chains(&managers, config).await?;
    } else {
        info!("Firewall disabled, leaving chain {} untouched", config.firewall.chain);
    }
    Ok(report)
}
