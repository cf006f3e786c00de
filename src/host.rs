//! Boundary to the hardware side of the stack
//!
//! A [`TagHost`] is the adapter that owns the radio link for one discovered
//! tag. Everything above it only ever talks to the tag through these calls.

use crate::technology::Technology;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum TransceiveStatus {
    Success,
    Failure,
    Timeout,
    TagLost,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TransceiveResponse {
    pub status: TransceiveStatus,
    pub data: Vec<u8>,
}

/// What the host knows about a tag's NDEF area
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct NdefInfo {
    pub max_size: u32,
    /// `0` unknown, `1` read only, `2` read write
    pub mode: u32,
}

#[uniffi::export(callback_interface)]
pub trait TagHost: Send + Sync + std::fmt::Debug + 'static {
    fn connect(&self, technology: Technology) -> bool;
    fn disconnect(&self) -> bool;

    /// Soft reset of the link, keeps the tag registered
    fn reconnect(&self) -> bool;

    fn transceive(&self, command: Vec<u8>, raw: bool) -> TransceiveResponse;
    fn is_tag_field_on(&self) -> bool;

    /// `None` when the tag has no NDEF area
    fn is_ndef_msg_contained(&self) -> Option<NdefInfo>;

    fn read_ndef(&self) -> Vec<u8>;
    fn write_ndef(&self, data: Vec<u8>) -> bool;
    fn format_ndef(&self, key: Vec<u8>) -> bool;
    fn set_ndef_read_only(&self) -> bool;
    fn can_make_read_only(&self, ndef_type: i32) -> bool;

    fn tech_list(&self) -> Vec<i32>;

    /// Technology code the link is connected with, `0` for none
    fn connected_tech(&self) -> i32;

    fn tag_rf_disc_id(&self) -> u32;

    fn iso_dep_max_transceive_length(&self) -> u32;
    fn extended_length_apdus_supported(&self) -> bool;

    fn set_timeout(&self, technology: Technology, timeout_ms: u32) -> bool;

    /// `0` when no timeout was set
    fn timeout(&self, technology: Technology) -> u32;
}
