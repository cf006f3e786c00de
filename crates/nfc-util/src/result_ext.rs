use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Map an error to a string-carrying error variant
    ///
    /// # Example
    /// ```rust
    /// use nfc_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum FrameError {
    ///     #[error("bad hex: {0}")]
    ///     BadHex(String),
    /// }
    ///
    /// fn frame(hex: &str) -> Result<Vec<u8>, FrameError> {
    ///     nfc_util::bytes::hex_to_bytes(hex).map_err_str(FrameError::BadHex)
    /// }
    ///
    /// assert!(frame("zz").is_err());
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;

    /// Drop the error after logging it at `warn`, for best-effort paths
    fn ok_or_warn(self, context: &str) -> Option<T>
    where
        InitialError: Display;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }

    fn ok_or_warn(self, context: &str) -> Option<Type>
    where
        InitialError: Display,
    {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!("{context}: {error}");
                None
            }
        }
    }
}
