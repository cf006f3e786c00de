#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    #[error("first record does not have the message begin flag set")]
    MissingMessageBegin,

    #[error("message begin flag set on a record after the first")]
    UnexpectedMessageBegin,

    #[error("record has both the chunk and message end flags set")]
    ChunkedMessageEnd,

    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    #[error("unchanged type name format outside of a chunk run")]
    UnexpectedUnchanged,

    #[error("payload length {0} is over the maximum")]
    PayloadTooLarge(u32),

    #[error("message ended early: {0}")]
    Truncated(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

pub type Error = NdefError;
pub type Result<T, E = Error> = std::result::Result<T, E>;
