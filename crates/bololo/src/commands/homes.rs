//! Home command handlers.

use tabled::Tabled;

use bololo_core::{Account, Home};

use crate::cli::{GlobalOpts, HomesArgs, HomesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct HomeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Rooms")]
    rooms: String,
}

impl From<&Home> for HomeRow {
    fn from(h: &Home) -> Self {
        let rooms = h
            .rooms
            .iter()
            .map(|r| {
                if r.is_default {
                    format!("{}*", r.name)
                } else {
                    r.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: h.id,
            name: h.name.clone(),
            owner: if h.owner { "yes" } else { "no" }.into(),
            rooms,
        }
    }
}

pub async fn handle(account: &Account, args: HomesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        HomesCommand::List => {
            let homes = account.homes().await?;
            let out = output::render_list(
                &global.output,
                &homes,
                |h| HomeRow::from(h),
                |h| h.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
