//! Device command handlers.

use tabled::Tabled;

use bololo_core::{Account, DeviceInfo};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Product Key")]
    product_key: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&DeviceInfo> for DeviceRow {
    fn from(info: &DeviceInfo) -> Self {
        Self {
            mac: info.mac.to_string(),
            name: info.display_name().to_owned(),
            model: info.model.clone(),
            product_key: info.product_key.clone(),
            state: info.online.to_string(),
        }
    }
}

fn detail(info: &DeviceInfo) -> String {
    [
        format!("MAC:          {}", info.mac),
        format!("Name:         {}", info.display_name()),
        format!("Manufacturer: {}", info.manufacturer),
        format!("Model:        {}", info.model),
        format!("Product Key:  {}", info.product_key),
        format!(
            "Serial:       {}",
            if info.serial.is_empty() { "-" } else { &info.serial }
        ),
        format!("DID:          {}", info.did.as_deref().unwrap_or("-")),
        format!(
            "Room:         {}",
            info.room_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("State:        {}", info.online),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(account: &Account, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let infos: Vec<DeviceInfo> =
                account.devices().iter().map(|d| d.info().clone()).collect();
            let out = output::render_list(
                &global.output,
                &infos,
                |info| DeviceRow::from(info),
                |info| info.mac.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let device = account.device(&device)?;
            let out = output::render_single(
                &global.output,
                device.info(),
                detail,
                |info| info.mac.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
