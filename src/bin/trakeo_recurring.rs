use std::{error::Error, path::PathBuf, process::exit};

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::error;

use trakeo_core::{
    config::ConfigManager,
    core::{Clock, FixedClock, RecurrenceScheduler, SystemClock},
    init,
    storage::JsonStore,
    utils::build_info,
};

/// Applies every due recurring transaction in a ledger file. Meant to be run once a day by cron.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Ledger file to process. Defaults to the config's `data_file` or `ledger.json` in TRAKEO_HOME.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Scheduler config file. Defaults to `config.json` in TRAKEO_HOME.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pins the pass to an RFC 3339 timestamp instead of the system clock.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Lists due transactions without applying them.
    #[arg(long)]
    dry_run: bool,

    /// Prints build metadata and exits.
    #[arg(long)]
    build_info: bool,
}

fn main() {
    init();
    let args = Args::parse();

    if args.build_info {
        println!("trakeo_recurring {}", build_info::current().describe());
        return;
    }

    if let Err(err) = run(args) {
        error!(%err, "recurring trigger failed");
        eprintln!("Error: {err}");
        exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let manager = match args.config {
        Some(path) => ConfigManager::with_config_file(path),
        None => ConfigManager::new()?,
    };
    let config = manager.load()?;
    let ledger_path = args.data.unwrap_or_else(|| manager.ledger_path(&config));

    let store = JsonStore::open(&ledger_path)?;
    let clock: Box<dyn Clock> = match args.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };
    let mut scheduler = RecurrenceScheduler::new(&config);

    if args.dry_run {
        let due = scheduler.preview(&store, clock.as_ref())?;
        println!("{} recurring transaction(s) due", due.len());
        for spec in due {
            println!(
                "  {} {} {:?} {}",
                spec.id,
                spec.description,
                spec.kind,
                spec.amount
            );
        }
        return Ok(());
    }

    let report = scheduler.run_pass(&store, clock.as_ref())?;
    println!("{}", report.summary());
    for failure in &report.failures {
        println!("  failed {}: {}", failure.transaction_id, failure.reason);
    }
    Ok(())
}
