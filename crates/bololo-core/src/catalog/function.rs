// Function catalog: local key -> server status field.

use serde::Serialize;
use serde_json::Value;

use super::device_type::CapabilityGroup;

/// Option label the cloud reports as `0`.
pub const OFF_OPTION: &str = "off";

/// One controllable or observable function of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    /// Stable key used for entity identity and translation lookup.
    pub local_key: &'static str,
    /// Key in the device status map and in control patches.
    pub server_field: &'static str,
    /// Material Design icon name.
    pub icon: &'static str,
    pub capability: CapabilityGroup,
    /// Allowed option labels (choice functions only).
    pub options: &'static [&'static str],
    /// Option selected when the status carries no usable value.
    pub default_option: Option<&'static str>,
}

const fn toggle(
    local_key: &'static str,
    server_field: &'static str,
    icon: &'static str,
) -> FunctionDescriptor {
    FunctionDescriptor {
        local_key,
        server_field,
        icon,
        capability: CapabilityGroup::Toggle,
        options: &[],
        default_option: None,
    }
}

const fn choice(
    local_key: &'static str,
    icon: &'static str,
    options: &'static [&'static str],
    default_option: &'static str,
) -> FunctionDescriptor {
    FunctionDescriptor {
        local_key,
        server_field: local_key,
        icon,
        capability: CapabilityGroup::Choice,
        options,
        default_option: Some(default_option),
    }
}

/// Disinfection cabinet functions, in entity creation order.
pub static CABINET_FUNCTIONS: &[FunctionDescriptor] = &[
    toggle("power", "switch", "mdi:power"),
    toggle("anion", "anion", "mdi:minus-circle-outline"),
    toggle("night_mode", "night_mode", "mdi:lightbulb-night"),
    toggle("storage", "storage_switch", "mdi:shield-check-outline"),
    toggle("disinfection", "disinfection_switch", "mdi:sun-wireless"),
    toggle("dry", "dry_switch", "mdi:heat-wave"),
    toggle("auto", "auto_switch", "mdi:refresh-auto"),
    choice(
        "disinfection_time",
        "mdi:sun-wireless",
        &[OFF_OPTION, "10", "15", "20"],
        "20",
    ),
    choice(
        "auto_time",
        "mdi:refresh-auto",
        &[OFF_OPTION, "40", "50", "60"],
        "60",
    ),
];

/// Numeric value of an option label: `"off"` is 0, others parse as integers.
pub fn option_value(option: &str) -> Option<i64> {
    if option == OFF_OPTION {
        Some(0)
    } else {
        option.parse().ok()
    }
}

fn raw_number(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round()).and_then(float_to_i64)),
        Value::String(s) => option_value(s.trim()),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
fn float_to_i64(f: f64) -> Option<i64> {
    f.is_finite().then_some(f as i64)
}

impl FunctionDescriptor {
    pub fn is_toggle(&self) -> bool {
        self.capability == CapabilityGroup::Toggle
    }

    pub fn is_choice(&self) -> bool {
        self.capability == CapabilityGroup::Choice
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.contains(&option)
    }

    /// Map a raw status value onto the nearest allowed option.
    ///
    /// Distance is absolute numeric difference; ties go to the option listed
    /// first. A missing or non-numeric value yields the default option.
    pub fn closest_option(&self, raw: Option<&Value>) -> Option<&'static str> {
        let Some(target) = raw.and_then(raw_number) else {
            return self.default_option;
        };
        let options: &'static [&'static str] = self.options;
        options
            .iter()
            .filter_map(|opt| option_value(opt).map(|v| (*opt, v.abs_diff(target))))
            .min_by_key(|(_, distance)| *distance)
            .map(|(opt, _)| opt)
            .or(self.default_option)
    }
}
