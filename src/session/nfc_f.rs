use std::sync::Arc;

use crate::{
    dispatch::TagDispatcher,
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

/// JIS 6319-4 (FeliCa)
#[derive(Debug, Clone)]
pub struct NfcF {
    core: SessionCore,
    system_code: Vec<u8>,
    pmm: Vec<u8>,
}

impl NfcF {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::NfcF, dispatcher)?;
        let extras = tag.extras(Technology::NfcF).cloned().unwrap_or_default();

        Some(Self {
            core,
            system_code: extras
                .bytes(ExtraKey::SystemCode)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            pmm: extras
                .bytes(ExtraKey::Pmm)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        })
    }

    pub fn system_code(&self) -> &[u8] {
        &self.system_code
    }

    /// Manufacturer parameters
    pub fn pmm(&self) -> &[u8] {
        &self.pmm
    }
}

impl TagSession for NfcF {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}
