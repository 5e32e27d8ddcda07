//! Switch and select handlers.

use bololo_core::Account;

use crate::cli::{GlobalOpts, SelectArgs, SwitchArgs, SwitchState};
use crate::error::CliError;
use crate::output;

pub async fn switch(account: &Account, args: SwitchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = account.device(&args.device)?;
    let toggle = device.toggle(&args.function)?;

    match args.state {
        SwitchState::On => toggle.turn_on().await?,
        SwitchState::Off => toggle.turn_off().await?,
    }

    if !global.quiet {
        let color = output::should_color(&global.color);
        eprintln!(
            "{} {}: {}",
            device.info().display_name(),
            toggle.name(),
            output::format_state(&toggle.state(), color)
        );
    }
    Ok(())
}

pub fn select(account: &Account, args: &SelectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = account.device(&args.device)?;
    let choice = device.choice(&args.function)?;
    choice.select(&args.option)?;

    if !global.quiet && !choice.is_writable() {
        eprintln!(
            "{} {}: '{}' accepted, but setting timers is not wired to the cloud yet",
            device.info().display_name(),
            choice.name(),
            args.option
        );
    }
    Ok(())
}
