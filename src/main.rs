use std::path::PathBuf;

use clap::Parser;
#[cfg(feature = "cli")]
use colored::*;
use env_logger::Builder;
use log::{debug, error, info, LevelFilter};

use bird_flowspec::routes::MatchPolicy;
use bird_flowspec::{config, run, Config, Report};

#[derive(Parser, Debug)]
#[clap(name = "bird-flowspec", version, rename_all = "kebab-case")]
/// Translate BIRD FlowSpec routes into host firewall state
pub struct Args {
    /// Path to config.toml (built-in defaults when omitted)
    config_path: Option<String>,
    /// BIRD control socket, overrides the config file
    #[clap(short, long)]
    socket: Option<PathBuf>,
    /// Seconds to wait for BIRD's reply, overrides the config file
    #[clap(long)]
    timeout: Option<u64>,
    /// Drop a whole route when any match field fails to parse
    #[clap(long)]
    strict: bool,
    /// Decode routes but leave the firewall alone
    #[clap(long)]
    dry_run: bool,
    /// Print decoded routes as JSON
    #[clap(long)]
    json: bool,
    /// Show debug logs (additive for trace logs)
    #[clap(short, parse(from_occurrences))]
    verbose: u8,
}

fn load_config(args: &Args) -> bird_flowspec::Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => {
            let config = config::from_file(path)?;
            debug!("Loaded config from {}", path);
            config
        }
        None => Config::default(),
    };
    if let Some(socket) = &args.socket {
        config.bird.socket = socket.clone();
    }
    if let Some(timeout) = args.timeout {
        config.bird.timeout_secs = timeout;
    }
    if args.strict {
        config.bird.match_policy = MatchPolicy::Strict;
    }
    if args.dry_run {
        config.firewall.enabled = false;
    }
    Ok(config)
}

fn print_report(report: &Report, json: bool) -> bird_flowspec::Result<()> {
    if json {
        let output = serde_json::to_string_pretty(&report.records)?;
        println!("{}", output);
        return Ok(());
    }
    #[cfg(feature = "cli")]
    {
        use bird_flowspec::display::OutputTable;
        let mut table = OutputTable::new();
        for record in &report.records {
            table.add_row(record);
        }
        table.print();
    }
    #[cfg(not(feature = "cli"))]
    for record in &report.records {
        println!("{}", record);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let (crate_level, other_level) = match args.verbose {
        0 => (LevelFilter::Info, LevelFilter::Warn),
        1 => (LevelFilter::Debug, LevelFilter::Warn),
        2 => (LevelFilter::Trace, LevelFilter::Warn),
        _ => (LevelFilter::Trace, LevelFilter::Trace),
    };
    Builder::new()
        .filter(Some("bird_flowspec"), crate_level)
        .filter(None, other_level)
        .init();
    info!("Logging at levels {}/{}", crate_level, other_level);

    let result = match load_config(&args) {
        Ok(config) => run(&config).await,
        Err(err) => Err(err),
    };
    let outcome = result.and_then(|report| print_report(&report, args.json));
    if let Err(err) = outcome {
        error!("{}", err);
        #[cfg(feature = "cli")]
        eprintln!("{}", err.to_string().red());
        #[cfg(not(feature = "cli"))]
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
