use std::sync::Arc;

use nfc_macros::ensure;
use nfc_ndef::{NdefMessage, parser::decode_records_or_empty};
use tracing::{debug, warn};

use crate::{
    dispatch::TagDispatcher,
    error::{Result, TagError},
    host::NdefInfo,
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum NdefForumType {
    Unknown,
    Type1,
    Type2,
    Type3,
    Type4,
    MifareClassic,
    IcodeSli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum NdefTagMode {
    Unknown,
    ReadOnly,
    ReadWrite,
}

impl NdefForumType {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Type1,
            2 => Self::Type2,
            3 => Self::Type3,
            4 => Self::Type4,
            101 => Self::MifareClassic,
            102 => Self::IcodeSli,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Type1 => 1,
            Self::Type2 => 2,
            Self::Type3 => 3,
            Self::Type4 => 4,
            Self::MifareClassic => 101,
            Self::IcodeSli => 102,
        }
    }

    /// Type string as used by the NFC Forum and NXP, empty for unknown tags
    pub fn type_string(self) -> &'static str {
        match self {
            Self::Type1 => "org.nfcforum.ndef.type1",
            Self::Type2 => "org.nfcforum.ndef.type2",
            Self::Type3 => "org.nfcforum.ndef.type3",
            Self::Type4 => "org.nfcforum.ndef.type4",
            Self::MifareClassic => "com.nxp.ndef.mifareclassic",
            Self::IcodeSli => "com.nxp.ndef.icodesli",
            Self::Unknown => "",
        }
    }
}

impl NdefTagMode {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::ReadOnly,
            2 => Self::ReadWrite,
            _ => Self::Unknown,
        }
    }
}

/// A tag with an NDEF area, the message reported at discovery is cached
#[derive(Debug, Clone)]
pub struct NdefTag {
    core: SessionCore,
    forum_type: NdefForumType,
    mode: NdefTagMode,
    max_size: u32,
    cached_message: NdefMessage,
}

impl NdefTag {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::Ndef, dispatcher)?;
        let extras = tag.extras(Technology::Ndef).cloned().unwrap_or_default();

        let cached_message = extras
            .bytes(ExtraKey::NdefMsg)
            .map(|bytes| NdefMessage::new(decode_records_or_empty(bytes)))
            .unwrap_or_default();

        Some(Self {
            core,
            forum_type: NdefForumType::from_code(
                extras.int(ExtraKey::NdefForumType).unwrap_or_default(),
            ),
            mode: NdefTagMode::from_code(extras.int(ExtraKey::NdefTagMode).unwrap_or_default()),
            max_size: extras
                .int(ExtraKey::NdefTagLength)
                .unwrap_or_default()
                .max(0) as u32,
            cached_message,
        })
    }

    pub fn forum_type(&self) -> NdefForumType {
        self.forum_type
    }

    pub fn ndef_tag_type_string(&self) -> &'static str {
        self.forum_type.type_string()
    }

    pub fn mode(&self) -> NdefTagMode {
        self.mode
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Message read at discovery, empty when there was none or it did not decode
    pub fn cached_ndef_message(&self) -> &NdefMessage {
        &self.cached_message
    }

    pub fn is_ndef_writable(&self) -> bool {
        self.mode == NdefTagMode::ReadWrite
    }

    /// Read and decode the tag's current message
    pub fn read_ndef(&self) -> Result<NdefMessage> {
        let tag = self.core.connected_tag()?;
        let rf_disc_id = tag.rf_disc_id();
        let dispatcher = self.core.dispatcher();

        self.ndef_info(rf_disc_id)?;
        ensure!(dispatcher.is_tag_field_on(rf_disc_id)?, TagError::Disconnect(rf_disc_id));

        let bytes = dispatcher.ndef_read(rf_disc_id)?;
        let message = NdefMessage::try_from_bytes(&bytes)?;
        debug!("read ndef message with {} records", message.len());

        Ok(message)
    }

    pub fn write_ndef(&self, message: &NdefMessage) -> Result<()> {
        let tag = self.core.connected_tag()?;
        let rf_disc_id = tag.rf_disc_id();

        let info = self.ndef_info(rf_disc_id)?;
        let length = message.byte_len() as u32;
        if info.max_size > 0 && length > info.max_size {
            warn!("ndef message of {length} bytes does not fit in {}", info.max_size);
            return Err(TagError::ExceededLength { length, max: info.max_size });
        }

        self.core
            .dispatcher()
            .ndef_write(rf_disc_id, message.to_bytes())
    }

    /// Whether the host can make this kind of tag read only, the tag is not touched
    pub fn can_set_read_only(&self) -> Result<bool> {
        let tag = self.core.tag()?;
        self.core.dispatcher().can_make_read_only(tag.rf_disc_id(), self.forum_type.code())
    }

    pub fn set_read_only(&self) -> Result<()> {
        let tag = self.core.connected_tag()?;
        let rf_disc_id = tag.rf_disc_id();

        self.ndef_info(rf_disc_id)?;
        self.core.dispatcher().ndef_make_read_only(rf_disc_id)
    }

    fn ndef_info(&self, rf_disc_id: u32) -> Result<NdefInfo> {
        self.core
            .dispatcher()
            .is_ndef(rf_disc_id)?
            .ok_or(TagError::NotNdef)
    }
}

impl TagSession for NdefTag {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}
