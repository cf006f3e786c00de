//! MIFARE Classic over NfcA
//!
//! Sectors 0..32 have 4 blocks of 16 bytes, the 4K layout adds sectors 32..40
//! with 16 blocks each starting at block 128.

use std::sync::Arc;

use nfc_macros::ensure;
use tracing::debug;

use crate::{
    dispatch::TagDispatcher,
    error::{Result, TagError},
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

pub const BLOCK_SIZE: usize = 16;
pub const KEY_SIZE: usize = 6;

/// Default transport key of a factory fresh tag
pub const KEY_DEFAULT: [u8; KEY_SIZE] = [0xFF; KEY_SIZE];

const AUTH_KEY_A: u8 = 0x60;
const AUTH_KEY_B: u8 = 0x61;
const READ: u8 = 0x30;
const WRITE: u8 = 0xA0;
const INCREMENT: u8 = 0xC1;
const DECREMENT: u8 = 0xC0;
const TRANSFER: u8 = 0xB0;
const RESTORE: u8 = 0xC2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum MifareClassicType {
    Unknown,
    Classic,
    Plus,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum MifareClassicSize {
    Mini,
    OneK,
    TwoK,
    FourK,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum KeyType {
    A,
    B,
}

impl MifareClassicSize {
    pub fn bytes(self) -> u32 {
        match self {
            Self::Mini => 320,
            Self::OneK => 1024,
            Self::TwoK => 2048,
            Self::FourK => 4096,
        }
    }

    pub fn sector_count(self) -> u32 {
        match self {
            Self::Mini => 5,
            Self::OneK => 16,
            Self::TwoK => 32,
            Self::FourK => 40,
        }
    }

    pub fn block_count(self) -> u32 {
        self.bytes() / BLOCK_SIZE as u32
    }
}

/// Tag kind from the SAK byte, last flag is set for emulated tags
fn classify(sak: i32) -> (MifareClassicType, MifareClassicSize, bool) {
    use MifareClassicSize::*;
    use MifareClassicType::*;

    match sak {
        0x01 | 0x08 | 0x88 => (Classic, OneK, false),
        0x09 => (Classic, Mini, false),
        0x10 => (Plus, TwoK, false),
        0x11 => (Plus, FourK, false),
        0x18 => (Classic, FourK, false),
        0x28 => (Classic, OneK, true),
        0x38 => (Classic, FourK, true),
        0x98 | 0xB8 => (Pro, FourK, false),
        _ => {
            debug!("unknown mifare classic sak {sak:#04x}");
            (Unknown, OneK, false)
        }
    }
}

#[derive(Debug, Clone)]
pub struct MifareClassic {
    core: SessionCore,
    type_: MifareClassicType,
    size: MifareClassicSize,
    emulated: bool,
}

impl MifareClassic {
    /// The SAK is taken from the MIFARE extras, falling back to the NfcA extras
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::MifareClassic, dispatcher)?;

        let sak = [Technology::MifareClassic, Technology::NfcA]
            .into_iter()
            .find_map(|technology| tag.extras(technology)?.int(ExtraKey::Sak))
            .unwrap_or_default();

        let (type_, size, emulated) = classify(sak);
        Some(Self {
            core,
            type_,
            size,
            emulated,
        })
    }

    pub fn type_(&self) -> MifareClassicType {
        self.type_
    }

    pub fn size(&self) -> MifareClassicSize {
        self.size
    }

    pub fn is_emulated(&self) -> bool {
        self.emulated
    }

    pub fn sector_count(&self) -> u32 {
        self.size.sector_count()
    }

    pub fn block_count(&self) -> u32 {
        self.size.block_count()
    }

    pub fn block_count_in_sector(&self, sector: u32) -> Result<u32> {
        self.check_sector(sector)?;
        Ok(if sector < 32 { 4 } else { 16 })
    }

    pub fn block_to_sector(&self, block: u32) -> Result<u32> {
        self.check_block(block)?;
        Ok(if block < 128 {
            block / 4
        } else {
            32 + (block - 128) / 16
        })
    }

    pub fn sector_to_block(&self, sector: u32) -> Result<u32> {
        self.check_sector(sector)?;
        Ok(if sector < 32 {
            sector * 4
        } else {
            128 + (sector - 32) * 16
        })
    }

    /// Authenticate `sector` with a 6 byte key, later block commands in it are allowed
    pub fn authenticate_sector(&self, sector: u32, key: &[u8], key_type: KeyType) -> Result<()> {
        let block = self.sector_to_block(sector)?;
        ensure!(key.len() == KEY_SIZE, param_error(format!("key must be {KEY_SIZE} bytes")));

        let tag = self.core.connected_tag()?;
        let uid = tag.uid_slice();
        ensure!(uid.len() >= 4, param_error("tag uid is shorter than 4 bytes"));

        let opcode = match key_type {
            KeyType::A => AUTH_KEY_A,
            KeyType::B => AUTH_KEY_B,
        };

        let mut command = Vec::with_capacity(2 + 4 + KEY_SIZE);
        command.extend_from_slice(&[opcode, block as u8]);
        command.extend_from_slice(&uid[..4]);
        command.extend_from_slice(key);

        self.send_command(&command, true).map(drop)
    }

    pub fn read_block(&self, block: u32) -> Result<Vec<u8>> {
        self.check_block(block)?;
        self.send_command(&[READ, block as u8], true)
    }

    pub fn write_block(&self, block: u32, data: &[u8]) -> Result<()> {
        self.check_block(block)?;
        ensure!(
            data.len() == BLOCK_SIZE,
            param_error(format!("block data must be {BLOCK_SIZE} bytes"))
        );
        self.core.connected_tag()?;

        let mut command = Vec::with_capacity(2 + BLOCK_SIZE);
        command.extend_from_slice(&[WRITE, block as u8]);
        command.extend_from_slice(data);

        self.send_command(&command, true).map(drop)
    }

    pub fn increment(&self, block: u32, value: i32) -> Result<()> {
        self.value_operation(INCREMENT, block, value)
    }

    pub fn decrement(&self, block: u32, value: i32) -> Result<()> {
        self.value_operation(DECREMENT, block, value)
    }

    /// Copy the transfer buffer into `block`
    pub fn transfer(&self, block: u32) -> Result<()> {
        self.block_operation(TRANSFER, block)
    }

    /// Load `block` into the transfer buffer
    pub fn restore(&self, block: u32) -> Result<()> {
        self.block_operation(RESTORE, block)
    }

    fn value_operation(&self, opcode: u8, block: u32, value: i32) -> Result<()> {
        self.check_block(block)?;
        ensure!(value >= 0, param_error(format!("value must not be negative: {value}")));
        self.core.connected_tag()?;

        let mut command = Vec::with_capacity(6);
        command.extend_from_slice(&[opcode, block as u8]);
        command.extend_from_slice(&value.to_le_bytes());

        self.send_command(&command, true).map(drop)
    }

    fn block_operation(&self, opcode: u8, block: u32) -> Result<()> {
        self.check_block(block)?;
        self.core.connected_tag()?;
        self.send_command(&[opcode, block as u8], true).map(drop)
    }

    fn check_sector(&self, sector: u32) -> Result<()> {
        let count = self.sector_count();
        ensure!(sector < count, param_error(format!("sector {sector} out of range 0..{count}")));
        Ok(())
    }

    fn check_block(&self, block: u32) -> Result<()> {
        let count = self.block_count();
        ensure!(block < count, param_error(format!("block {block} out of range 0..{count}")));
        Ok(())
    }
}

impl TagSession for MifareClassic {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}

fn param_error(message: impl Into<String>) -> TagError {
    TagError::ParametersError(message.into())
}
