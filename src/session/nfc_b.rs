use std::sync::Arc;

use crate::{
    dispatch::TagDispatcher,
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

/// ISO 14443-3B
#[derive(Debug, Clone)]
pub struct NfcB {
    core: SessionCore,
    app_data: Vec<u8>,
    protocol_info: Vec<u8>,
}

impl NfcB {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::NfcB, dispatcher)?;
        let extras = tag.extras(Technology::NfcB).cloned().unwrap_or_default();

        Some(Self {
            core,
            app_data: extras
                .bytes(ExtraKey::AppData)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            protocol_info: extras
                .bytes(ExtraKey::ProtocolInfo)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        })
    }

    pub fn app_data(&self) -> &[u8] {
        &self.app_data
    }

    pub fn protocol_info(&self) -> &[u8] {
        &self.protocol_info
    }
}

impl TagSession for NfcB {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}
