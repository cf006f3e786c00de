use nfc_util::result_ext::ResultExt as _;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TagError},
    technology::Technology,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct TagLayerConfig {
    /// Whether the dispatcher starts with NFC switched on
    pub nfc_enabled: bool,

    /// Timeout reported for a technology when the host has none set
    pub default_timeout_ms: u32,

    pub transceive_limits: TransceiveLimits,
}

/// Largest raw frame each technology accepts, ISO-DEP always asks the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct TransceiveLimits {
    pub nfc_a: u32,
    pub nfc_b: u32,
    pub nfc_f: u32,
    pub nfc_v: u32,
    pub mifare_classic: u32,
    pub mifare_ultralight: u32,
}

impl Default for TagLayerConfig {
    fn default() -> Self {
        Self {
            nfc_enabled: true,
            default_timeout_ms: 1000,
            transceive_limits: TransceiveLimits::default(),
        }
    }
}

impl Default for TransceiveLimits {
    fn default() -> Self {
        Self {
            nfc_a: 253,
            nfc_b: 253,
            nfc_f: 255,
            nfc_v: 253,
            mifare_classic: 253,
            mifare_ultralight: 253,
        }
    }
}

impl TagLayerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err_str(TagError::ParametersError)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err_str(TagError::ParametersError)
    }
}

impl TransceiveLimits {
    /// Configured ceiling, `None` when it has to come from the host
    pub fn for_technology(&self, technology: Technology) -> Option<u32> {
        match technology {
            Technology::NfcA => Some(self.nfc_a),
            Technology::NfcB => Some(self.nfc_b),
            Technology::NfcF => Some(self.nfc_f),
            Technology::NfcV => Some(self.nfc_v),
            Technology::MifareClassic => Some(self.mifare_classic),
            Technology::MifareUltralight => Some(self.mifare_ultralight),
            Technology::IsoDep => None,
            Technology::Ndef | Technology::NdefFormatable | Technology::Barcode => Some(0),
        }
    }
}

#[uniffi::export]
fn tag_layer_config_from_json(json: String) -> Result<TagLayerConfig> {
    TagLayerConfig::from_json(&json)
}

#[uniffi::export]
fn default_tag_layer_config() -> TagLayerConfig {
    TagLayerConfig::default()
}
