//! ISO 15693 vicinity tags
//!
//! Every command is sent addressed: flag, opcode, the 8 byte uid as reported
//! at discovery, then the block arguments.

use std::sync::Arc;

use nfc_macros::ensure;

use crate::{
    dispatch::TagDispatcher,
    error::{Result, TagError},
    session::{SessionCore, TagSession},
    tag::{DiscoveredTag, ExtraKey},
    technology::Technology,
};

const READ_SINGLE_BLOCK: u8 = 0x20;
const WRITE_SINGLE_BLOCK: u8 = 0x21;
const LOCK_SINGLE_BLOCK: u8 = 0x22;
const READ_MULTIPLE_BLOCKS: u8 = 0x23;
const WRITE_MULTIPLE_BLOCKS: u8 = 0x24;

const UID_LENGTH: usize = 8;
const MAX_ARGUMENT: u32 = 256;

#[derive(Debug, Clone)]
pub struct NfcV {
    core: SessionCore,
    response_flags: u8,
    dsf_id: u8,
}

impl NfcV {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::NfcV, dispatcher)?;
        let extras = tag.extras(Technology::NfcV).cloned().unwrap_or_default();

        Some(Self {
            core,
            response_flags: extras.int(ExtraKey::ResponseFlags).unwrap_or_default() as u8,
            dsf_id: extras.int(ExtraKey::DsfId).unwrap_or_default() as u8,
        })
    }

    pub fn response_flags(&self) -> u8 {
        self.response_flags
    }

    /// Data storage format identifier
    pub fn dsf_id(&self) -> u8 {
        self.dsf_id
    }

    pub fn read_single_block(&self, flag: u32, block: u32) -> Result<Vec<u8>> {
        let command = self.frame(flag, READ_SINGLE_BLOCK, &[block], &[])?;
        self.send_command(&command, true)
    }

    pub fn write_single_block(&self, flag: u32, block: u32, data: &[u8]) -> Result<()> {
        ensure!(!data.is_empty(), param_error("block data is empty"));

        let command = self.frame(flag, WRITE_SINGLE_BLOCK, &[block], data)?;
        self.send_command(&command, true).map(drop)
    }

    pub fn lock_single_block(&self, flag: u32, block: u32) -> Result<()> {
        let command = self.frame(flag, LOCK_SINGLE_BLOCK, &[block], &[])?;
        self.send_command(&command, true).map(drop)
    }

    pub fn read_multiple_blocks(&self, flag: u32, block: u32, count: u32) -> Result<Vec<u8>> {
        let command = self.frame(flag, READ_MULTIPLE_BLOCKS, &[block, count], &[])?;
        self.send_command(&command, true)
    }

    pub fn write_multiple_blocks(
        &self,
        flag: u32,
        block: u32,
        count: u32,
        data: &[u8],
    ) -> Result<()> {
        ensure!(!data.is_empty(), param_error("block data is empty"));

        let command = self.frame(flag, WRITE_MULTIPLE_BLOCKS, &[block, count], data)?;
        self.send_command(&command, true).map(drop)
    }

    fn frame(&self, flag: u32, opcode: u8, arguments: &[u32], data: &[u8]) -> Result<Vec<u8>> {
        ensure!(flag < MAX_ARGUMENT, param_error(format!("flag {flag} out of range")));
        for argument in arguments {
            ensure!(
                *argument < MAX_ARGUMENT,
                param_error(format!("block argument {argument} out of range"))
            );
        }

        let tag = self.core.tag()?;
        let uid = tag.uid_slice();
        ensure!(
            uid.len() == UID_LENGTH,
            param_error(format!("uid is {} bytes, expected {UID_LENGTH}", uid.len()))
        );

        let mut command = Vec::with_capacity(2 + UID_LENGTH + arguments.len() + data.len());
        command.extend_from_slice(&[flag as u8, opcode]);
        command.extend_from_slice(uid);
        command.extend(arguments.iter().map(|argument| *argument as u8));
        command.extend_from_slice(data);

        Ok(command)
    }
}

impl TagSession for NfcV {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}

fn param_error(message: impl Into<String>) -> TagError {
    TagError::ParametersError(message.into())
}
