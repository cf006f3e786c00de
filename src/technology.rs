use strum::IntoEnumIterator;

use crate::error::TagError;

/// A tag technology, each one gets its own kind of session
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    uniffi::Enum,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Technology {
    NfcA,
    NfcB,
    IsoDep,
    NfcF,
    NfcV,
    Ndef,
    NdefFormatable,
    MifareClassic,
    MifareUltralight,
    Barcode,
}

impl Technology {
    /// Technology from the host's integer code, `0` means no technology
    pub fn from_code(code: i32) -> Option<Self> {
        Self::try_from(code).ok()
    }

    pub fn code(self) -> i32 {
        self.into()
    }
}

#[uniffi::export]
fn technology_to_string(technology: Technology) -> String {
    technology.to_string()
}

#[uniffi::export]
fn all_technologies() -> Vec<Technology> {
    Technology::iter().collect()
}

impl From<Technology> for i32 {
    fn from(technology: Technology) -> Self {
        match technology {
            Technology::NfcA => 1,
            Technology::NfcB => 2,
            Technology::IsoDep => 3,
            Technology::NfcF => 4,
            Technology::NfcV => 5,
            Technology::Ndef => 6,
            Technology::NdefFormatable => 7,
            Technology::MifareClassic => 8,
            Technology::MifareUltralight => 9,
            Technology::Barcode => 10,
        }
    }
}

impl TryFrom<i32> for Technology {
    type Error = TagError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Technology::NfcA),
            2 => Ok(Technology::NfcB),
            3 => Ok(Technology::IsoDep),
            4 => Ok(Technology::NfcF),
            5 => Ok(Technology::NfcV),
            6 => Ok(Technology::Ndef),
            7 => Ok(Technology::NdefFormatable),
            8 => Ok(Technology::MifareClassic),
            9 => Ok(Technology::MifareUltralight),
            10 => Ok(Technology::Barcode),
            _ => Err(TagError::ParametersError(format!("unknown technology: {value}"))),
        }
    }
}
