// code-analyzer-rs/src/main.rs
// Command-line front end for the C/C++ analysis server
//
// Loads ApiSettings, fires the startup health check in the background and
// runs one command: an analysis, a module status query, the NLP function
// listing or an explicit health check.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

mod cli;
mod session;

use cli::{Args, Command};
use session::{load_settings, read_inputs, Session};

/// How long to wait for the startup health check before printing the indicator
const STARTUP_CHECK_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();
    let settings = load_settings(&args.config)?;

    log::info!(
        "Using analysis server at {} (timeout {:?})",
        settings.base_url,
        settings.timeout
    );

    let check_limit = settings.timeout;
    let (dispatcher, monitor) = analysis_sdk::connect(settings)?;
    let monitor = Arc::new(monitor);

    // Runs in the background; commands never wait for it before submitting
    let startup_check = monitor.spawn_startup_probe();
    let mut session = Session::new(dispatcher, monitor.state(), startup_check);

    let command_label = args.command.label();
    let succeeded = match args.command {
        Command::Health => session.settle_startup_check(check_limit).await.unwrap_or(false),

        Command::Status { mode } => {
            let (report, succeeded) = session.status(mode).await;
            print!("{}", report);
            succeeded
        }

        Command::Functions => {
            let (report, succeeded) = session.functions().await;
            print!("{}", report);
            succeeded
        }

        Command::Analyze(analyze) => {
            session.select(analyze.mode);
            session.set_inputs(read_inputs(&analyze)?);

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Interrupt received, cancelling analysis");
                    on_interrupt.cancel();
                }
            });

            let (report, succeeded) = session.run(&cancel).await;
            print!("{}", report);
            succeeded
        }
    };

    session.settle_startup_check(STARTUP_CHECK_GRACE).await;
    println!("Server: {}", session.connection_label());

    if !succeeded {
        bail!("{} did not complete", command_label);
    }

    Ok(())
}
