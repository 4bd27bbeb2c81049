mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcdex_core::Inventory;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
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
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "pcdex", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the server
        cmd => {
            let session_config = config::resolve(&cli.global)?;
            let inventory = Inventory::new(&session_config).map_err(CliError::from)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = match cmd {
                Command::Pcs(args) => commands::pcs::handle(&inventory, args, &cli.global).await,
                Command::Tags(args) => commands::tags::handle(&inventory, args, &cli.global).await,
                Command::Config(_) | Command::Completions(_) => unreachable!("handled above"),
            };

            inventory.shutdown();
            result
        }
    }
}
