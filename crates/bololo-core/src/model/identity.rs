// ── Device identity ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Device MAC as used for identity: lowercased, otherwise untouched.
///
/// The cloud addresses devices by the MAC exactly as it reported it, so
/// request paths keep using the raw string; this type only feeds identity
/// and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Entity identity for one function of this device: `{mac}_{server_field}`.
    pub fn unique_id(&self, server_field: &str) -> String {
        format!("{}_{server_field}", self.0)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_only() {
        let mac = MacAddress::new("AA:BB:Cc:01");
        assert_eq!(mac.as_str(), "aa:bb:cc:01");
        assert_eq!(MacAddress::new("AABB-01").as_str(), "aabb-01");
    }

    #[test]
    fn unique_id_joins_mac_and_field() {
        let mac = MacAddress::new("AA:BB:01");
        assert_eq!(mac.unique_id("switch"), "aa:bb:01_switch");
        assert_eq!(mac.unique_id("auto_time"), "aa:bb:01_auto_time");
    }

    #[test]
    fn equal_regardless_of_input_case() {
        assert_eq!(Some(MacAddress::new("aa:bb")), "AA:BB".parse::<MacAddress>().ok());
    }
}
