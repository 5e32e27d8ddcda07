// ── Device catalog ──
//
// Static, process-wide tables: which product keys the integration knows,
// which capability groups each exposes, and which status fields back each
// entity. Nothing here is mutated after startup.

pub mod device_type;
pub mod function;

pub use device_type::{
    CapabilityGroup, DISINFECTION_CABINET_PRODUCT_KEY, DeviceKind, DeviceType, device_types,
    resolve_device_type,
};
pub use function::{CABINET_FUNCTIONS, FunctionDescriptor, option_value};
