//! Builders for the common record kinds
//!
//! Every builder returns `None` when its input can't make a valid record.

use tracing::debug;

use crate::{
    payload::{self, MAX_LANGUAGE_CODE_LENGTH, RTD_TEXT, RTD_URI},
    record::NdefRecord,
    tnf::Tnf,
};

/// Well known URI record, abbreviating with the first matching table prefix
pub fn make_uri_record(uri: &str) -> Option<NdefRecord> {
    if uri.is_empty() {
        debug!("uri record needs a uri");
        return None;
    }

    let (code, remainder) = match payload::find_uri_prefix(uri) {
        Some((code, prefix)) => (code, &uri[prefix.len()..]),
        None => (0, uri),
    };

    let mut payload = Vec::with_capacity(1 + remainder.len());
    payload.push(code);
    payload.extend_from_slice(remainder.as_bytes());

    NdefRecord::try_new(Tnf::WellKnown, RTD_URI, Vec::new(), payload).ok()
}

/// Well known text record, the status byte only carries the locale length
pub fn make_text_record(text: &str, locale: &str) -> Option<NdefRecord> {
    if locale.len() > MAX_LANGUAGE_CODE_LENGTH {
        debug!("locale {locale:?} is too long for a text record");
        return None;
    }

    let mut payload = Vec::with_capacity(1 + locale.len() + text.len());
    payload.push(locale.len() as u8);
    payload.extend_from_slice(locale.as_bytes());
    payload.extend_from_slice(text.as_bytes());

    NdefRecord::try_new(Tnf::WellKnown, RTD_TEXT, Vec::new(), payload).ok()
}

pub fn make_mime_record(mime_type: &str, data: &[u8]) -> Option<NdefRecord> {
    if data.is_empty() {
        debug!("mime record needs data");
        return None;
    }

    match mime_type.find('/') {
        Some(index) if index != 0 && index != mime_type.len() - 1 => {}
        _ => {
            debug!("invalid mime type {mime_type:?}");
            return None;
        }
    }

    NdefRecord::try_new(Tnf::Mime, mime_type.as_bytes(), Vec::new(), data).ok()
}

/// External type record with type `domain:service`, both lower-cased
pub fn make_external_record(domain: &str, service: &str, data: &[u8]) -> Option<NdefRecord> {
    let domain = domain.trim().to_lowercase();
    let service = service.trim().to_lowercase();

    if domain.is_empty() || service.is_empty() || data.is_empty() {
        debug!("external record needs a domain, service and data");
        return None;
    }

    let type_ = format!("{domain}:{service}");
    NdefRecord::try_new(Tnf::External, type_.into_bytes(), Vec::new(), data).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn uri_record_abbreviates() {
        let record = make_uri_record("https://www.example.com/tag").unwrap();
        assert_eq!(record.tnf(), Tnf::WellKnown);
        assert_eq!(record.type_(), b"U");
        assert_eq!(record.payload(), b"\x02example.com/tag");
        assert_eq!(record.uri().unwrap(), "https://www.example.com/tag");
    }

    #[test]
    fn uri_record_without_prefix() {
        let record = make_uri_record("geo:47.6,-122.3").unwrap();
        assert_eq!(record.payload(), b"\x00geo:47.6,-122.3");
        assert_eq!(make_uri_record(""), None);
    }

    #[test]
    fn text_record_layout() {
        let record = make_text_record("hello", "en-US").unwrap();
        assert_eq!(record.type_(), b"T");
        assert_eq!(record.payload(), b"\x05en-UShello");

        let text = record.text().unwrap();
        assert_eq!(text.language, "en-US");
        assert_eq!(text.text, "hello");

        let long_locale = "x".repeat(64);
        assert_eq!(make_text_record("hi", &long_locale), None);
    }

    #[test]
    fn mime_record_validation() {
        assert!(make_mime_record("text/plain", b"hi").is_some());
        assert_eq!(make_mime_record("text/plain", b""), None);
        assert_eq!(make_mime_record("textplain", b"hi"), None);
        assert_eq!(make_mime_record("/plain", b"hi"), None);
        assert_eq!(make_mime_record("text/", b"hi"), None);

        let record = make_mime_record("application/json", b"{}").unwrap();
        assert_eq!(record.mime_type(), Some("application/json"));
    }

    #[test]
    fn external_record_normalizes() {
        let record = make_external_record("  Example.COM ", "MyType\t", b"data").unwrap();
        assert_eq!(record.tnf(), Tnf::External);
        assert_eq!(record.type_(), b"example.com:mytype");
        assert_eq!(record.payload(), b"data");

        assert_eq!(make_external_record("  ", "type", b"data"), None);
        assert_eq!(make_external_record("example.com", "", b"data"), None);
        assert_eq!(make_external_record("example.com", "type", b""), None);
    }
}
