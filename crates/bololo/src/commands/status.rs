//! Raw status view of one appliance.

use serde_json::Value;
use tabled::Tabled;

use bololo_core::{Account, StatusSnapshot};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keep only the requested fields; an empty filter keeps everything.
fn filtered(snapshot: &StatusSnapshot, fields: &[String]) -> StatusSnapshot {
    if fields.is_empty() {
        return snapshot.clone();
    }
    snapshot
        .fields()
        .iter()
        .filter(|(k, _)| fields.iter().any(|f| f == *k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect::<bololo_core::StatusMap>()
        .into()
}

pub async fn handle(account: &Account, args: StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = account.device(&args.device)?;
    let snapshot = device.status().await?;
    let view = filtered(&snapshot, &args.field);

    let out = output::render_single(
        &global.output,
        &view,
        |s| {
            let mut rows: Vec<FieldRow> = s
                .fields()
                .iter()
                .map(|(k, v)| FieldRow {
                    field: k.clone(),
                    value: value_text(v),
                })
                .collect();
            rows.sort_by(|a, b| a.field.cmp(&b.field));
            output::render_table(&rows)
        },
        |s| {
            let mut lines: Vec<String> = s
                .fields()
                .iter()
                .map(|(k, v)| format!("{k}={}", value_text(v)))
                .collect();
            lines.sort();
            lines.join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn filter_keeps_requested_fields_only() {
        let snapshot = StatusSnapshot::new(
            [("switch".to_owned(), json!(1)), ("anion".to_owned(), json!(0))]
                .into_iter()
                .collect(),
        );
        let view = filtered(&snapshot, &["anion".to_owned(), "missing".to_owned()]);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get("anion"), Some(&json!(0)));
    }

    #[test]
    fn strings_render_without_quotes() {
        assert_eq!(value_text(&json!("20")), "20");
        assert_eq!(value_text(&json!(1)), "1");
    }
}
