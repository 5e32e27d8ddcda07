//! Entity command handlers.

use serde::Serialize;
use tabled::Tabled;

use bololo_core::{Account, Entity, EntityState};

use crate::cli::{EntitiesArgs, EntitiesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Serializable view of one entity after a refresh.
#[derive(Debug, Serialize)]
pub struct EntityView {
    pub unique_id: String,
    pub device: String,
    pub function: &'static str,
    pub capability: String,
    pub icon: &'static str,
    pub writable: bool,
    pub state: EntityState,
}

impl From<&Entity> for EntityView {
    fn from(e: &Entity) -> Self {
        Self {
            unique_id: e.unique_id().to_owned(),
            device: e.device_info().mac.to_string(),
            function: e.name(),
            capability: e.capability().to_string(),
            icon: e.icon(),
            writable: e.is_writable(),
            state: e.state(),
        }
    }
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Unique ID")]
    unique_id: String,
    #[tabled(rename = "Function")]
    function: String,
    #[tabled(rename = "Kind")]
    capability: String,
    #[tabled(rename = "State")]
    state: String,
}

pub async fn handle(
    account: &Account,
    args: EntitiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EntitiesCommand::List { device } => {
            let entities = match device {
                Some(mac) => {
                    let dev = account.device(&mac)?;
                    dev.update_entities().await;
                    dev.entities().to_vec()
                }
                None => {
                    let failed = account.update_all().await;
                    if failed > 0 && !global.quiet {
                        eprintln!("{failed} entities could not be refreshed");
                    }
                    account.entities()
                }
            };

            let views: Vec<EntityView> = entities.iter().map(EntityView::from).collect();
            let out = output::render_list(
                &global.output,
                &views,
                |v| EntityRow {
                    unique_id: v.unique_id.clone(),
                    function: v.function.to_owned(),
                    capability: if v.writable {
                        v.capability.clone()
                    } else {
                        format!("{} (read-only)", v.capability)
                    },
                    state: output::format_state(&v.state, false),
                },
                |v| v.unique_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
