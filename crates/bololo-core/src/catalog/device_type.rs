// Device type registry keyed by product key.

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

use super::function::{CABINET_FUNCTIONS, FunctionDescriptor};

/// Product key of the disinfection cabinet.
pub const DISINFECTION_CABINET_PRODUCT_KEY: &str = "k1mvpG70tNN000000000000000000000";

/// Kind of entity an appliance capability is exposed as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapabilityGroup {
    /// Boolean on/off entity.
    Toggle,
    /// Enumerated-option entity.
    Choice,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceKind {
    DisinfectionCabinet,
}

/// Static description of one supported product.
#[derive(Debug, PartialEq)]
pub struct DeviceType {
    pub kind: DeviceKind,
    pub product_key: &'static str,
    /// Human-readable model name shown when the cloud record has none.
    pub model: &'static str,
    pub capabilities: &'static [CapabilityGroup],
    /// Functions in entity creation order.
    pub functions: &'static [FunctionDescriptor],
}

impl DeviceType {
    /// Functions belonging to one capability group, in catalog order.
    pub fn functions_in(
        &self,
        group: CapabilityGroup,
    ) -> impl Iterator<Item = &'static FunctionDescriptor> + use<> {
        let functions: &'static [FunctionDescriptor] = self.functions;
        functions.iter().filter(move |f| f.capability == group)
    }

    /// Look up a function by its local key.
    pub fn function(&self, local_key: &str) -> Option<&'static FunctionDescriptor> {
        let functions: &'static [FunctionDescriptor] = self.functions;
        functions.iter().find(|f| f.local_key == local_key)
    }

    pub fn supports(&self, group: CapabilityGroup) -> bool {
        self.capabilities.contains(&group)
    }
}

static DEVICE_TYPES: &[DeviceType] = &[DeviceType {
    kind: DeviceKind::DisinfectionCabinet,
    product_key: DISINFECTION_CABINET_PRODUCT_KEY,
    model: "Disinfection Cabinet",
    capabilities: &[CapabilityGroup::Toggle, CapabilityGroup::Choice],
    functions: CABINET_FUNCTIONS,
}];

/// Every device type the integration supports.
pub fn device_types() -> &'static [DeviceType] {
    DEVICE_TYPES
}

/// Resolve a product key to its descriptor. Unknown keys yield `None`.
pub fn resolve_device_type(product_key: &str) -> Option<&'static DeviceType> {
    DEVICE_TYPES.iter().find(|t| t.product_key == product_key)
}
