use nfc_ndef::NdefError;

/// Failures surfaced by tag sessions and the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum TagError {
    #[error("invalid parameter: {0}")]
    ParametersError(String),

    #[error("session is not connected to the tag")]
    StateDisconnected,

    /// NFC is switched off or the host was never set up
    #[error("nfc service is not available")]
    NotInitialized,

    /// The discovered tag has been dropped
    #[error("tag is no longer valid")]
    TagInvalid,

    #[error("no tag host registered for rf discovery id {0}")]
    Disconnect(u32),

    #[error("tag io failed: {0}")]
    IoFailure(String),

    #[error("command of {length} bytes exceeds the maximum of {max}")]
    ExceededLength { length: u32, max: u32 },

    #[error("tag does not contain an ndef message")]
    NotNdef,

    #[error("ndef error: {0}")]
    Ndef(String),
}

pub type Error = TagError;
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<NdefError> for TagError {
    fn from(error: NdefError) -> Self {
        Self::Ndef(error.to_string())
    }
}
