use std::sync::Arc;

use crate::{
    dispatch::TagDispatcher,
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

/// ISO 14443-3A
#[derive(Debug, Clone)]
pub struct NfcA {
    core: SessionCore,
    sak: i32,
    atqa: Vec<u8>,
}

impl NfcA {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::NfcA, dispatcher)?;
        let extras = tag.extras(Technology::NfcA).cloned().unwrap_or_default();

        Some(Self {
            core,
            sak: extras.int(ExtraKey::Sak).unwrap_or_default(),
            atqa: extras
                .bytes(ExtraKey::Atqa)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        })
    }

    pub fn sak(&self) -> i32 {
        self.sak
    }

    pub fn atqa(&self) -> &[u8] {
        &self.atqa
    }
}

impl TagSession for NfcA {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock,
        tag::{ExtraValue, TechExtras},
    };

    #[test]
    fn reads_sak_and_atqa() {
        let extras = TechExtras::new()
            .with(ExtraKey::Sak, ExtraValue::Int(0x08))
            .with(ExtraKey::Atqa, ExtraValue::Bytes(vec![0x04, 0x00]));

        let (_host, dispatcher, tag) = mock::setup(&[1, 2, 3, 4], vec![(Technology::NfcA, extras)]);
        let nfc_a = NfcA::open(&tag, dispatcher).unwrap();

        assert_eq!(nfc_a.sak(), 0x08);
        assert_eq!(nfc_a.atqa(), &[0x04, 0x00]);
    }

    #[test]
    fn missing_extras_default() {
        let (_host, dispatcher, tag) =
            mock::setup(&[1, 2, 3, 4], vec![(Technology::NfcA, TechExtras::new())]);
        let nfc_a = NfcA::open(&tag, dispatcher).unwrap();

        assert_eq!(nfc_a.sak(), 0);
        assert!(nfc_a.atqa().is_empty());
    }
}
