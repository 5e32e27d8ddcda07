//! Command dispatch: bridges CLI args -> account operations -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod entities;
pub mod homes;
pub mod login;
pub mod status;
pub mod watch;

use bololo_core::Account;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an account-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, account: &Account, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(account, args, global),
        Command::Homes(args) => homes::handle(account, args, global).await,
        Command::Status(args) => status::handle(account, args, global).await,
        Command::Entities(args) => entities::handle(account, args, global).await,
        Command::Switch(args) => control::switch(account, args, global).await,
        Command::Select(args) => control::select(account, &args, global),
        Command::Watch(args) => watch::handle(account, args, global).await,
        Command::Config(_) | Command::Completions(_) | Command::Login(_) => {
            Err(CliError::Validation {
                field: "command".into(),
                reason: "handled before account setup".into(),
            })
        }
    }
}
