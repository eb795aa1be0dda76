use anyhow::Context;
use clap::Parser;
use pref_calc::cli::{evaluate_once, Args};
use pref_calc::{Session, SettingsStore};
use std::io;
use tracing_subscriber::EnvFilter;

fn handle_input(input: &str, store: &SettingsStore, precision: Option<u32>) -> bool {
    match evaluate_once(input, store, precision) {
        Ok(result) => {
            println!("{}", result);
            true
        }
        Err(err) => {
            let err: anyhow::Error = err.into();
            eprintln!("Error: {:#}", err);
            false
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PCALC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let store = SettingsStore::new(&args.config);

    if let Some(expression) = args.expression() {
        if !handle_input(&expression, &store, args.precision) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::start(store, stdin.lock(), stdout.lock())
        .context("failed to initialise settings")?;
    if let Some(precision) = args.precision {
        session.override_precision(precision);
    }
    session.run().context("terminal I/O failed")?;
    Ok(())
}
