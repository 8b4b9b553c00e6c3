use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Which calculation strategy (and data generation) a pack belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum DataVersion {
    /// Leave the numbers to the host.
    Vanilla,
    /// Flat per-category area tables.
    Legacy,
    /// Built-in volumetric parameters.
    VolumetricV1,
    /// User-created volumetric parameters.
    CustomV1,
    /// Parameters attached to a single building.
    OverrideV1,
}

/// Identity shared by every pack: version, name and translation keys.
///
/// The version is fixed when the pack is built; packs are reselected, never
/// re-versioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PackInfo {
    version: DataVersion,
    pub name: String,
    pub name_key: Option<String>,
    pub description_key: Option<String>,
}

impl PackInfo {
    pub fn new(version: DataVersion, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            name_key: None,
            description_key: None,
        }
    }

    pub fn with_keys(mut self, name_key: &str, description_key: &str) -> Self {
        self.name_key = Some(name_key.to_string());
        self.description_key = Some(description_key.to_string());
        self
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Translated name if a key is set and the lookup knows it, else the raw name.
    pub fn display_name(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        self.name_key
            .as_deref()
            .and_then(lookup)
            .unwrap_or_else(|| self.name.clone())
    }

    /// Translated description, or an empty string.
    pub fn description(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        self.description_key
            .as_deref()
            .and_then(lookup)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_raw_name() {
        let info = PackInfo::new(DataVersion::VolumetricV1, "res_apartments");
        assert_eq!(info.display_name(|_| Some("ignored".into())), "res_apartments");
    }

    #[test]
    fn test_display_name_uses_translation() {
        let info = PackInfo::new(DataVersion::Legacy, "legacy").with_keys("PCK_LEG", "PCK_LEG_D");
        let lookup = |key: &str| (key == "PCK_LEG").then(|| "Legacy tables".to_string());
        assert_eq!(info.display_name(lookup), "Legacy tables");
        assert_eq!(info.description(lookup), "");
    }

    #[test]
    fn test_display_name_missing_translation() {
        let info = PackInfo::new(DataVersion::Vanilla, "vanilla").with_keys("PCK_VAN", "PCK_VAN_D");
        assert_eq!(info.display_name(|_| None), "vanilla");
        assert_eq!(info.version(), DataVersion::Vanilla);
    }
}
