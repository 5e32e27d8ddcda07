//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use bololo_core::{EntityState, EntityValue};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Human-readable entity state, colored when enabled.
pub fn format_state(state: &EntityState, color: bool) -> String {
    let text = match (state.available, state.value) {
        (false, _) => "unavailable".to_owned(),
        (true, None) => "-".to_owned(),
        (true, Some(value)) => value.to_string(),
    };
    if !color {
        return text;
    }
    match (state.available, state.value) {
        (false, _) => text.dimmed().to_string(),
        (true, Some(EntityValue::Toggle(true))) => text.green().to_string(),
        (true, Some(EntityValue::Toggle(false))) => text.red().to_string(),
        _ => text.cyan().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views don't use
/// the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let items = [Item { id: "a" }, Item { id: "b" }];
        let out = render_list(
            &OutputFormat::Plain,
            &items,
            |i| Row { id: i.id.into() },
            |i| i.id.into(),
        );
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn table_has_header() {
        let items = [Item { id: "a" }];
        let out = render_list(
            &OutputFormat::Table,
            &items,
            |i| Row { id: i.id.into() },
            |i| i.id.into(),
        );
        assert!(out.contains("ID"));
    }

    #[test]
    fn unavailable_state_without_color() {
        let state = EntityState {
            available: false,
            value: Some(EntityValue::Toggle(true)),
        };
        assert_eq!(format_state(&state, false), "unavailable");
        let on = EntityState::available(EntityValue::Toggle(true));
        assert_eq!(format_state(&on, false), "on");
    }
}
