mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bololo_core::{Account, CoreError};

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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands: no account needed
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "bololo", &mut std::io::stdout());
            Ok(())
        }

        Command::Login(args) => commands::login::handle(args, &cli.global).await,

        // Everything else talks to the appliances on the account
        cmd => {
            let account_config = config::resolve_account_config(&cli.global)?;
            let account = Account::setup(account_config)
                .await
                .map_err(|e| setup_error(e, &cli.global))?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &account, &cli.global).await;
            account.unload().await;
            result
        }
    }
}

/// A rejected envelope during discovery almost always means a stale token.
fn setup_error(err: CoreError, global: &cli::GlobalOpts) -> CliError {
    match err {
        CoreError::UnexpectedResponse {
            code: Some(code),
            envelope,
            ..
        } => CliError::AuthFailed {
            profile: global.profile.clone().unwrap_or_else(|| {
                config::load_config_or_default()
                    .active_profile_name()
                    .to_owned()
            }),
            message: format!("code {code}: {envelope}"),
        },
        other => other.into(),
    }
}
