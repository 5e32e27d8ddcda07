//! Watch handler: poll the account and stream entity state changes.

use std::time::Duration;

use chrono::Local;
use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use bololo_core::{Account, Entity, EntityState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Change {
    at: String,
    unique_id: String,
    state: EntityState,
}

pub async fn handle(account: &Account, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let entities: Vec<Entity> = match args.device {
        Some(ref mac) => account.device(mac)?.entities().to_vec(),
        None => account.entities(),
    };
    if entities.is_empty() {
        if !global.quiet {
            eprintln!("No entities to watch");
        }
        return Ok(());
    }

    let secs = args
        .interval
        .unwrap_or_else(|| config::load_config_or_default().defaults.poll_interval)
        .max(1);

    let (tx, mut rx) = mpsc::unbounded_channel();
    // Dropping the set aborts every forwarder.
    let mut forwarders = JoinSet::new();
    for entity in entities {
        let mut state_rx = entity.subscribe();
        let tx = tx.clone();
        forwarders.spawn(async move {
            while state_rx.changed().await.is_ok() {
                let state = *state_rx.borrow_and_update();
                if tx.send((entity.unique_id().to_owned(), state)).is_err() {
                    break;
                }
            }
        });
    }
    drop(tx);

    account.start_polling(Duration::from_secs(secs)).await;
    if !global.quiet {
        eprintln!("Watching every {secs}s, press Ctrl-C to stop");
    }

    let color = output::should_color(&global.color);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            change = rx.recv() => {
                let Some((unique_id, state)) = change else { break };
                print_change(global, color, unique_id, state);
            }
        }
    }

    forwarders.shutdown().await;
    Ok(())
}

fn print_change(global: &GlobalOpts, color: bool, unique_id: String, state: EntityState) {
    let at = Local::now().format("%H:%M:%S").to_string();
    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let change = Change {
                at,
                unique_id,
                state,
            };
            serde_json::to_string(&change).unwrap_or_default()
        }
        _ => {
            let stamp = if color { at.dimmed().to_string() } else { at };
            format!(
                "{stamp} {unique_id} {}",
                output::format_state(&state, color)
            )
        }
    };
    output::print_output(&line, global.quiet);
}
