//! Technology sessions over a discovered tag
//!
//! A session only holds a `Weak` to its tag. Once the tag is dropped every
//! operation fails with [`TagError::TagInvalid`]. At most one technology of a
//! tag is connected at a time, connecting another one takes over the link.

pub mod barcode;
pub mod iso_dep;
pub mod mifare_classic;
pub mod mifare_ultralight;
pub mod ndef_formatable;
pub mod ndef_tag;
pub mod nfc_a;
pub mod nfc_b;
pub mod nfc_f;
pub mod nfc_v;

use std::sync::{Arc, Weak};

use nfc_macros::ensure;
use tap::TapFallible as _;
use tracing::{debug, warn};

use crate::{
    dispatch::TagDispatcher,
    error::{Result, TagError},
    tag::DiscoveredTag,
    technology::Technology,
};

pub use barcode::Barcode;
pub use iso_dep::IsoDep;
pub use mifare_classic::MifareClassic;
pub use mifare_ultralight::MifareUltralight;
pub use ndef_formatable::NdefFormatable;
pub use ndef_tag::NdefTag;
pub use nfc_a::NfcA;
pub use nfc_b::NfcB;
pub use nfc_f::NfcF;
pub use nfc_v::NfcV;

/// State every session shares: the tag, its technology and the dispatcher
#[derive(Debug, Clone)]
pub struct SessionCore {
    tag: Weak<DiscoveredTag>,
    technology: Technology,
    dispatcher: Arc<TagDispatcher>,
}

impl SessionCore {
    /// `None` when the tag does not support `technology`
    pub fn open(
        tag: &Arc<DiscoveredTag>,
        technology: Technology,
        dispatcher: Arc<TagDispatcher>,
    ) -> Option<Self> {
        if !tag.supports(technology) {
            debug!("tag {} does not support {technology}", tag.rf_disc_id());
            return None;
        }

        Some(Self {
            tag: Arc::downgrade(tag),
            technology,
            dispatcher,
        })
    }

    pub fn technology(&self) -> Technology {
        self.technology
    }

    pub fn dispatcher(&self) -> &TagDispatcher {
        &self.dispatcher
    }

    pub fn tag(&self) -> Result<Arc<DiscoveredTag>> {
        self.tag.upgrade().ok_or(TagError::TagInvalid)
    }

    /// The tag, only while this session holds the connection
    pub fn connected_tag(&self) -> Result<Arc<DiscoveredTag>> {
        let tag = self.tag()?;
        ensure!(tag.connected_tech() == Some(self.technology), TagError::StateDisconnected);
        Ok(tag)
    }

    pub fn connect(&self) -> Result<()> {
        let tag = self.tag()?;
        self.dispatcher.connect(tag.rf_disc_id(), self.technology)?;

        tag.set_connected_tech(Some(self.technology));
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.tag
            .upgrade()
            .is_some_and(|tag| tag.connected_tech() == Some(self.technology))
    }

    /// Soft resets the link and drops the connection, a failed reset is only logged
    pub fn close(&self) -> Result<()> {
        let tag = self.tag()?;
        let _ = self
            .dispatcher
            .reconnect(tag.rf_disc_id())
            .tap_err(|error| warn!("reconnect while closing {}: {error}", self.technology));

        tag.set_connected_tech(None);
        Ok(())
    }

    pub fn send_command(&self, data: &[u8], raw: bool) -> Result<Vec<u8>> {
        let tag = self.connected_tag()?;
        self.dispatcher.send_raw_frame(tag.rf_disc_id(), data, raw)
    }

    pub fn max_send_command_length(&self) -> Result<u32> {
        let tag = self
            .tag
            .upgrade()
            .ok_or_else(|| TagError::ParametersError("tag is no longer valid".into()))?;

        self.dispatcher.max_transceive_length(tag.rf_disc_id(), self.technology)
    }
}

/// Operations shared by every technology session
pub trait TagSession {
    fn core(&self) -> &SessionCore;

    fn technology(&self) -> Technology {
        self.core().technology()
    }

    fn connect(&self) -> Result<()> {
        self.core().connect()
    }

    /// Pure read of the tag's connected technology, the hardware is not asked
    fn is_connected(&self) -> bool {
        self.core().is_connected()
    }

    fn close(&self) -> Result<()> {
        self.core().close()
    }

    fn send_command(&self, data: &[u8], raw: bool) -> Result<Vec<u8>> {
        self.core().send_command(data, raw)
    }

    fn max_send_command_length(&self) -> Result<u32> {
        self.core().max_send_command_length()
    }

    fn tag_uid(&self) -> Result<String> {
        Ok(self.core().tag()?.uid())
    }

    fn tag_uid_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.core().tag()?.uid_bytes())
    }

    fn tech_list(&self) -> Result<Vec<Technology>> {
        Ok(self.core().tag()?.technologies())
    }

    fn set_timeout(&self, timeout_ms: u32) -> Result<()> {
        let core = self.core();
        let tag = core.tag()?;
        core.dispatcher().set_timeout(tag.rf_disc_id(), core.technology(), timeout_ms)
    }

    fn timeout(&self) -> Result<u32> {
        let core = self.core();
        let tag = core.tag()?;
        core.dispatcher().timeout(tag.rf_disc_id(), core.technology())
    }
}

#[derive(Debug, Clone)]
pub enum Session {
    NfcA(NfcA),
    NfcB(NfcB),
    IsoDep(IsoDep),
    NfcF(NfcF),
    NfcV(NfcV),
    Ndef(NdefTag),
    NdefFormatable(NdefFormatable),
    MifareClassic(MifareClassic),
    MifareUltralight(MifareUltralight),
    Barcode(Barcode),
}

impl Session {
    /// Session for `technology`, `None` when the tag does not support it
    pub fn open(
        tag: &Arc<DiscoveredTag>,
        technology: Technology,
        dispatcher: Arc<TagDispatcher>,
    ) -> Option<Self> {
        let session = match technology {
            Technology::NfcA => Self::NfcA(NfcA::open(tag, dispatcher)?),
            Technology::NfcB => Self::NfcB(NfcB::open(tag, dispatcher)?),
            Technology::IsoDep => Self::IsoDep(IsoDep::open(tag, dispatcher)?),
            Technology::NfcF => Self::NfcF(NfcF::open(tag, dispatcher)?),
            Technology::NfcV => Self::NfcV(NfcV::open(tag, dispatcher)?),
            Technology::Ndef => Self::Ndef(NdefTag::open(tag, dispatcher)?),
            Technology::NdefFormatable => {
                Self::NdefFormatable(NdefFormatable::open(tag, dispatcher)?)
            }
            Technology::MifareClassic => Self::MifareClassic(MifareClassic::open(tag, dispatcher)?),
            Technology::MifareUltralight => {
                Self::MifareUltralight(MifareUltralight::open(tag, dispatcher)?)
            }
            Technology::Barcode => Self::Barcode(Barcode::open(tag, dispatcher)?),
        };

        Some(session)
    }
}

impl TagSession for Session {
    fn core(&self) -> &SessionCore {
        match self {
            Self::NfcA(session) => session.core(),
            Self::NfcB(session) => session.core(),
            Self::IsoDep(session) => session.core(),
            Self::NfcF(session) => session.core(),
            Self::NfcV(session) => session.core(),
            Self::Ndef(session) => session.core(),
            Self::NdefFormatable(session) => session.core(),
            Self::MifareClassic(session) => session.core(),
            Self::MifareUltralight(session) => session.core(),
            Self::Barcode(session) => session.core(),
        }
    }
}
