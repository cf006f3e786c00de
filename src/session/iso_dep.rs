use std::sync::Arc;

use crate::{
    dispatch::TagDispatcher,
    error::Result,
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

/// ISO 14443-4, carries APDUs
#[derive(Debug, Clone)]
pub struct IsoDep {
    core: SessionCore,
    historical_bytes: Vec<u8>,
    hi_layer_response: Vec<u8>,
}

impl IsoDep {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::IsoDep, dispatcher)?;
        let extras = tag.extras(Technology::IsoDep).cloned().unwrap_or_default();

        Some(Self {
            core,
            historical_bytes: extras
                .bytes(ExtraKey::HistoricalBytes)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            hi_layer_response: extras
                .bytes(ExtraKey::HiLayerResponse)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        })
    }

    /// Historical bytes of the ATS, NfcA based tags only
    pub fn historical_bytes(&self) -> &[u8] {
        &self.historical_bytes
    }

    /// Higher layer response of the ATTRIB, NfcB based tags only
    pub fn hi_layer_response(&self) -> &[u8] {
        &self.hi_layer_response
    }

    pub fn is_extended_apdu_supported(&self) -> Result<bool> {
        let tag = self.core.tag()?;
        self.core
            .dispatcher()
            .is_extended_apdu_supported(tag.rf_disc_id())
    }
}

impl TagSession for IsoDep {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}
