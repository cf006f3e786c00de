//! Byte and hex conversions shared by the codec and the session layer
//!
//! Hex strings produced here are always upper-case, which is the form tag UIDs
//! and extras are reported in by the hardware layer. Parsing accepts either case.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum HexError {
    #[error("hex string has odd length {0}")]
    OddLength(usize),

    #[error("invalid hex character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode a hex string, surrounding whitespace is ignored
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, HexError> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(HexError::OddLength(hex.len()));
    }

    hex::decode(hex).map_err(|error| match error {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            HexError::InvalidCharacter {
                character: c,
                index,
            }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            HexError::OddLength(hex.len())
        }
    })
}

/// Big-endian integer from at most 4 bytes, `None` if the slice is empty or too long
pub fn be_bytes_to_u32(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }

    Some(bytes.iter().fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte)))
}
