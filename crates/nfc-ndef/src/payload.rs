use winnow::{
    ModalResult, Parser,
    binary::bits::{bits, bool as take_bool, take as take_bits},
    error::{ContextError, ErrMode},
    token::{rest, take},
};

use crate::parser::stream::{self, Stream};

/// Well known record type for text records
pub const RTD_TEXT: &[u8] = b"T";

/// Well known record type for URI records
pub const RTD_URI: &[u8] = b"U";

/// Language codes live in the low 6 bits of the text status byte
pub const MAX_LANGUAGE_CODE_LENGTH: usize = 0x3F;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

/// URI prefix codes as defined in NFC Forum RTD URI specification
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

/// First prefix in table order that `uri` starts with, slot 0 is never matched
pub fn find_uri_prefix(uri: &str) -> Option<(u8, &'static str)> {
    URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, prefix)| uri.starts_with(*prefix))
        .map(|(code, prefix)| (code as u8, *prefix))
}

/// Expand an abbreviated URI payload, codes outside the table mean no prefix
pub fn expand_uri_payload(payload: &[u8]) -> Option<String> {
    let (code, rest) = payload.split_first()?;
    let prefix = URI_PREFIXES
        .get(*code as usize)
        .copied()
        .unwrap_or_default();
    let rest = std::str::from_utf8(rest).ok()?;

    Some(format!("{prefix}{rest}"))
}

pub fn parse_text_payload(payload: &[u8]) -> Option<TextPayload> {
    let mut input = stream::new(payload);
    text_payload.parse_next(&mut input).ok()
}

fn text_payload(input: &mut Stream<'_>) -> ModalResult<TextPayload> {
    let (is_utf16, _reserved, language_code_length): (bool, bool, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
            .parse_next(input)?;

    let language_code = take(language_code_length as usize).parse_next(input)?;
    let text: &[u8] = rest.parse_next(input)?;

    let parsed_text = if is_utf16 {
        String::from_utf16_lossy(
            &text
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect::<Vec<u16>>(),
        )
    } else {
        String::from_utf8_lossy(text).to_string()
    };

    Ok(TextPayload {
        format: if is_utf16 {
            TextPayloadFormat::Utf16
        } else {
            TextPayloadFormat::Utf8
        },
        language: String::from_utf8_lossy(language_code).to_string(),
        text: parsed_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_lookup_uses_table_order() {
        assert_eq!(find_uri_prefix("https://www.example.com"), Some((0x02, "https://www.")));
        assert_eq!(find_uri_prefix("https://example.com"), Some((0x04, "https://")));
        assert_eq!(find_uri_prefix("tel:+15551234"), Some((0x05, "tel:")));

        // "urn:" sits before the longer epc prefixes in the table
        assert_eq!(find_uri_prefix("urn:epc:id:sgtin"), Some((0x13, "urn:")));
        assert_eq!(find_uri_prefix("geo:37.0,-122.0"), None);
    }

    #[test]
    fn expand_uri() {
        assert_eq!(expand_uri_payload(b"\x01example.com").unwrap(), "http://www.example.com");
        assert_eq!(expand_uri_payload(b"\x00geo:1,2").unwrap(), "geo:1,2");
        assert_eq!(expand_uri_payload(b"\xF0abc").unwrap(), "abc");
        assert_eq!(expand_uri_payload(b""), None);
    }

    #[test]
    fn text_payload_utf8() {
        let payload = parse_text_payload(b"\x02enhello").unwrap();
        assert_eq!(payload.format, TextPayloadFormat::Utf8);
        assert_eq!(payload.language, "en");
        assert_eq!(payload.text, "hello");
    }

    #[test]
    fn text_payload_utf16() {
        let mut bytes = vec![0x80 | 0x02];
        bytes.extend_from_slice(b"de");
        bytes.extend_from_slice(&[0x00, b'h', 0x00, b'i']);

        let payload = parse_text_payload(&bytes).unwrap();
        assert_eq!(payload.format, TextPayloadFormat::Utf16);
        assert_eq!(payload.language, "de");
        assert_eq!(payload.text, "hi");
    }

    #[test]
    fn text_payload_too_short_for_language() {
        assert_eq!(parse_text_payload(b"\x05en"), None);
        assert_eq!(parse_text_payload(b""), None);
    }
}
