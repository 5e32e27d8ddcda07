// ── Status snapshot ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use bololo_api::StatusMap;

/// Server-side timestamp field carried in every status response (epoch ms).
pub const STATUS_TIME_FIELD: &str = "status_time";

/// Full device status as last read from the cloud.
///
/// Never mutated after construction. A successful command replaces the
/// cached snapshot with [`with_field`](Self::with_field).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatusSnapshot {
    fields: StatusMap,
}

impl StatusSnapshot {
    pub fn new(fields: StatusMap) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Boolean view of a field. Numbers read as `value != 0`.
    pub fn bool(&self, field: &str) -> Option<bool> {
        match self.fields.get(field)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            _ => None,
        }
    }

    pub fn i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field)?.as_i64()
    }

    /// Server-side time of this status, if reported.
    pub fn status_time(&self) -> Option<DateTime<Utc>> {
        self.i64(STATUS_TIME_FIELD)
            .and_then(DateTime::from_timestamp_millis)
    }

    pub fn fields(&self) -> &StatusMap {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this snapshot with one field set to `value`.
    pub fn with_field(&self, field: &str, value: Value) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(field.to_owned(), value);
        Self { fields }
    }
}

impl From<StatusMap> for StatusSnapshot {
    fn from(fields: StatusMap) -> Self {
        Self::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(value: Value) -> StatusSnapshot {
        match value {
            Value::Object(map) => StatusSnapshot::new(map),
            _ => StatusSnapshot::new(StatusMap::new()),
        }
    }

    #[test]
    fn typed_accessors() {
        let s = snapshot(json!({
            "switch": true,
            "anion": 0,
            "auto_time": 50,
            "status_time": 1_755_765_294_647_i64
        }));
        assert_eq!(s.bool("switch"), Some(true));
        assert_eq!(s.bool("anion"), Some(false));
        assert_eq!(s.bool("missing"), None);
        assert_eq!(s.i64("auto_time"), Some(50));
        let t = s.status_time().expect("status_time");
        assert_eq!(t.timestamp_millis(), 1_755_765_294_647);
    }

    #[test]
    fn with_field_changes_only_that_field() {
        let before = snapshot(json!({ "switch": false, "anion": true, "auto_time": 40 }));
        let after = before.with_field("switch", json!(true));

        assert_eq!(before.bool("switch"), Some(false));
        assert_eq!(after.bool("switch"), Some(true));
        assert_eq!(after.get("anion"), before.get("anion"));
        assert_eq!(after.get("auto_time"), before.get("auto_time"));
        assert_eq!(after.len(), before.len());
    }
}
