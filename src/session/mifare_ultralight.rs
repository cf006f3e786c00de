use std::sync::Arc;

use nfc_macros::ensure;

use crate::{
    dispatch::TagDispatcher,
    error::{Result, TagError},
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

pub const PAGE_SIZE: usize = 4;

const READ: u8 = 0x30;
const WRITE: u8 = 0xA2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum MifareUltralightType {
    Unknown,
    Ultralight,
    UltralightC,
}

#[derive(Debug, Clone)]
pub struct MifareUltralight {
    core: SessionCore,
    type_: MifareUltralightType,
}

impl MifareUltralight {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::MifareUltralight, dispatcher)?;

        let type_ = match tag
            .extras(Technology::MifareUltralight)
            .and_then(|extras| extras.bool(ExtraKey::MifareUltralightC))
        {
            Some(true) => MifareUltralightType::UltralightC,
            Some(false) => MifareUltralightType::Ultralight,
            None => MifareUltralightType::Unknown,
        };

        Some(Self { core, type_ })
    }

    pub fn type_(&self) -> MifareUltralightType {
        self.type_
    }

    /// Reads 4 pages starting at `page`, 16 bytes
    pub fn read_multiple_pages(&self, page: u32) -> Result<Vec<u8>> {
        check_page(page)?;
        self.send_command(&[READ, page as u8], true)
    }

    pub fn write_single_page(&self, page: u32, data: &[u8]) -> Result<()> {
        check_page(page)?;
        ensure!(
            data.len() == PAGE_SIZE,
            TagError::ParametersError(format!("page data must be {PAGE_SIZE} bytes"))
        );

        let mut command = Vec::with_capacity(2 + PAGE_SIZE);
        command.extend_from_slice(&[WRITE, page as u8]);
        command.extend_from_slice(data);

        self.send_command(&command, true).map(drop)
    }
}

impl TagSession for MifareUltralight {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}

fn check_page(page: u32) -> Result<()> {
    ensure!(
        page > 0 && page < 256,
        TagError::ParametersError(format!("page {page} out of range 1..256"))
    );
    Ok(())
}
