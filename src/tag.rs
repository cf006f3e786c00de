use std::sync::Arc;

use ahash::AHashMap;
use nfc_util::bytes::{be_bytes_to_u32, bytes_to_hex};
use parking_lot::Mutex;

use crate::technology::Technology;

/// Keys of the per technology extras reported at discovery
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    uniffi::Enum,
    strum::Display,
    strum::EnumString,
)]
pub enum ExtraKey {
    Sak,
    Atqa,
    AppData,
    ProtocolInfo,
    SystemCode,
    Pmm,
    ResponseFlags,
    DsfId,
    HistoricalBytes,
    HiLayerResponse,
    NdefForumType,
    NdefTagMode,
    NdefTagLength,
    NdefMsg,
    MifareUltralightC,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ExtraValue {
    Int(i32),
    Bytes(Vec<u8>),
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TagExtra {
    pub key: ExtraKey,
    pub value: ExtraValue,
}

/// Extras for one technology of a discovered tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechExtras(AHashMap<ExtraKey, ExtraValue>);

impl TechExtras {
    pub fn new() -> Self {
        Self(AHashMap::new())
    }

    pub fn with(mut self, key: ExtraKey, value: ExtraValue) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn get(&self, key: ExtraKey) -> Option<&ExtraValue> {
        self.0.get(&key)
    }

    /// Integer value, big endian byte values of up to 4 bytes are accepted too
    pub fn int(&self, key: ExtraKey) -> Option<i32> {
        match self.get(key)? {
            ExtraValue::Int(value) => Some(*value),
            ExtraValue::Bytes(bytes) => be_bytes_to_u32(bytes).map(|value| value as i32),
            _ => None,
        }
    }

    pub fn bytes(&self, key: ExtraKey) -> Option<&[u8]> {
        match self.get(key)? {
            ExtraValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn bool(&self, key: ExtraKey) -> Option<bool> {
        match self.get(key)? {
            ExtraValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromIterator<TagExtra> for TechExtras {
    fn from_iter<I: IntoIterator<Item = TagExtra>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|extra| (extra.key, extra.value))
                .collect(),
        )
    }
}

/// A target the radio layer activated
///
/// Only `connected_tech` changes after discovery, sessions point here through a `Weak`
#[derive(Debug, uniffi::Object)]
pub struct DiscoveredTag {
    rf_disc_id: u32,
    uid: Vec<u8>,
    technologies: Vec<(Technology, TechExtras)>,
    connected_tech: Mutex<Option<Technology>>,
}

#[uniffi::export]
impl DiscoveredTag {
    /// `extras` lines up with `technologies`, missing entries mean no extras
    #[uniffi::constructor]
    pub fn from_discovery(
        rf_disc_id: u32,
        uid: Vec<u8>,
        technologies: Vec<Technology>,
        extras: Vec<Vec<TagExtra>>,
    ) -> Arc<Self> {
        let mut extras = extras.into_iter();
        let technologies = technologies
            .into_iter()
            .map(|technology| {
                let extras = extras.next().map(TechExtras::from_iter).unwrap_or_default();
                (technology, extras)
            })
            .collect();

        Arc::new(Self::new(rf_disc_id, uid, technologies))
    }

    pub fn rf_disc_id(&self) -> u32 {
        self.rf_disc_id
    }

    /// Upper case hex of the tag id
    pub fn uid(&self) -> String {
        bytes_to_hex(&self.uid)
    }

    pub fn uid_bytes(&self) -> Vec<u8> {
        self.uid.clone()
    }

    pub fn technologies(&self) -> Vec<Technology> {
        self.technologies.iter().map(|(technology, _)| *technology).collect()
    }

    pub fn tech_list(&self) -> Vec<i32> {
        self.technologies.iter().map(|(technology, _)| technology.code()).collect()
    }

    pub fn supports(&self, technology: Technology) -> bool {
        self.technologies.iter().any(|(tech, _)| *tech == technology)
    }

    pub fn connected_tech(&self) -> Option<Technology> {
        *self.connected_tech.lock()
    }
}

impl DiscoveredTag {
    pub fn new(rf_disc_id: u32, uid: Vec<u8>, technologies: Vec<(Technology, TechExtras)>) -> Self {
        Self {
            rf_disc_id,
            uid,
            technologies,
            connected_tech: Mutex::new(None),
        }
    }

    pub fn uid_slice(&self) -> &[u8] {
        &self.uid
    }

    pub fn extras(&self, technology: Technology) -> Option<&TechExtras> {
        self.technologies.iter().find(|(tech, _)| *tech == technology).map(|(_, extras)| extras)
    }

    pub(crate) fn set_connected_tech(&self, technology: Option<Technology>) {
        *self.connected_tech.lock() = technology;
    }
}
