pub mod bytes;
pub mod result_ext;

pub use bytes::HexError;

uniffi::setup_scaffolding!();

mod ffi {
    use crate::bytes;

    /// Upper case hex, the form tag ids are reported in
    #[uniffi::export]
    fn bytes_to_hex_string(data: Vec<u8>) -> String {
        bytes::bytes_to_hex(&data)
    }

    #[uniffi::export]
    fn hex_string_to_bytes(hex: String) -> Result<Vec<u8>, bytes::HexError> {
        bytes::hex_to_bytes(&hex)
    }
}
