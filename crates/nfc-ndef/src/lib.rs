//! NDEF message codec
//!
//! Decodes raw NDEF bytes into records, reassembling chunked payloads, and
//! encodes records back into a message.

pub mod error;
pub mod factory;
pub mod ffi;
pub mod header;
pub mod message;
pub mod parser;
pub mod payload;
pub mod record;
pub mod tnf;

/// Largest payload a single record, or a reassembled chunk run, may carry
pub const MAX_PAYLOAD_LENGTH: u32 = 10 * 1024 * 1024;

pub use error::{Error, NdefError, Result};
pub use factory::{make_external_record, make_mime_record, make_text_record, make_uri_record};
pub use message::NdefMessage;
pub use parser::{decode_records, decode_records_or_empty};
pub use payload::{TextPayload, TextPayloadFormat};
pub use record::NdefRecord;
pub use tnf::Tnf;

uniffi::setup_scaffolding!();
