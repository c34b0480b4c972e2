mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use turbot_core::Reconciler;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    match run(cli).await {
        Ok(exit_code::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        // Config commands don't need a workspace connection
        Command::Config(ref args) => {
            commands::config_cmd::handle(args, &cli.global)?;
            Ok(exit_code::SUCCESS)
        }

        // Shell completions generation
        Command::Completions(ref args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "turbot", &mut std::io::stdout());
            Ok(exit_code::SUCCESS)
        }

        // Plans are offline unless asked to refresh stored state
        Command::Plan(ref args) => {
            let reconciler = if args.refresh {
                Some(connect(&cli.global)?)
            } else {
                None
            };
            let changed = commands::plan::handle(reconciler.as_ref(), args, &cli.global).await?;
            Ok(if changed && args.detailed_exitcode {
                exit_code::PLAN_HAS_CHANGES
            } else {
                exit_code::SUCCESS
            })
        }

        // All other commands require a workspace connection
        cmd => {
            let reconciler = connect(&cli.global)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &reconciler, &cli.global).await?;
            Ok(exit_code::SUCCESS)
        }
    }
}

/// Build a `Reconciler` from the config file, profile, and CLI overrides.
fn connect(global: &GlobalOpts) -> Result<Reconciler, CliError> {
    let cfg = config::load_config()?;
    let reconcile_config = config::build_reconcile_config(global, &cfg)?;
    let reconciler = Reconciler::connect(&reconcile_config)?;
    Ok(reconciler.with_cancellation(cancel_on_interrupt()))
}

/// A token cancelled by the first Ctrl-C, ending any installation wait.
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; abandoning the installation wait");
            trigger.cancel();
        }
    });
    token
}
