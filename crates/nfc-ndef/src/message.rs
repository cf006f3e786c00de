use crate::{error::Result, header::NdefHeader, parser, record::NdefRecord};

/// An ordered list of records, serialized with MB on the first and ME on the last
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, derive_more::From)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    /// Decode a message from its wire bytes
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        let records = parser::decode_records(bytes)?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize every record, records are never chunked
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());

        for (header, record) in self.headers() {
            header.write_to(&mut out);
            out.extend_from_slice(record.type_());
            out.extend_from_slice(record.id());
            out.extend_from_slice(record.payload());
        }

        out
    }

    /// Length of [`NdefMessage::to_bytes`] without building it
    pub fn byte_len(&self) -> usize {
        self.headers()
            .map(|(header, record)| {
                header.encoded_len()
                    + record.type_().len()
                    + record.id().len()
                    + record.payload().len()
            })
            .sum()
    }

    fn headers(&self) -> impl Iterator<Item = (NdefHeader, &NdefRecord)> {
        let last = self.records.len().saturating_sub(1);
        self.records
            .iter()
            .enumerate()
            .map(move |(index, record)| {
                (NdefHeader::for_record(record, index == 0, index == last), record)
            })
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(record: NdefRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}

impl IntoIterator for NdefMessage {
    type Item = NdefRecord;
    type IntoIter = std::vec::IntoIter<NdefRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{factory, tnf::Tnf};

    #[test]
    fn text_record_vector() {
        let record = factory::make_text_record("hi", "en").unwrap();
        let bytes = NdefMessage::from(record).to_bytes();

        assert_eq!(bytes, vec![0xD1, 0x01, 0x05, 0x54, 0x02, 0x65, 0x6E, 0x68, 0x69]);
    }

    #[test]
    fn flags_follow_position() {
        let message = NdefMessage::new(vec![
            factory::make_uri_record("https://example.com").unwrap(),
            factory::make_text_record("middle", "en").unwrap(),
            factory::make_mime_record("text/plain", b"last").unwrap(),
        ]);

        let bytes = message.to_bytes();
        assert_eq!(bytes.len(), message.byte_len());

        // MB | SR | well known
        assert_eq!(bytes[0], 0x91);

        let headers: Vec<u8> = message.headers().map(|(header, _)| header.flags_byte()).collect();
        assert_eq!(headers, vec![0x91, 0x11, 0x52]);
    }

    #[test]
    fn empty_record_always_has_id_length() {
        let bytes = NdefMessage::from(NdefRecord::empty()).to_bytes();
        assert_eq!(bytes, vec![0xD8, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn long_payload_uses_four_byte_length() {
        let payload = vec![0xAB; 300];
        let record = factory::make_mime_record("application/octet-stream", &payload).unwrap();
        let bytes = NdefMessage::from(record.clone()).to_bytes();

        // MB | ME | mime, no short record flag
        assert_eq!(bytes[0], 0xC2);
        assert_eq!(&bytes[2..6], &[0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(NdefMessage::try_from_bytes(&bytes).unwrap().records(), &[record]);
    }

    #[test]
    fn round_trip_factory_records() {
        let message = NdefMessage::new(vec![
            factory::make_uri_record("tel:+15551234").unwrap(),
            factory::make_text_record("bonjour", "fr").unwrap(),
            factory::make_mime_record("image/png", &[0x89, b'P', b'N', b'G']).unwrap(),
            factory::make_external_record("Example.com", "Widget", b"\x01\x02").unwrap(),
            NdefRecord::try_new(Tnf::Unknown, b"?", b"id-1", b"opaque").unwrap(),
        ]);

        let decoded = NdefMessage::try_from_bytes(&message.to_bytes()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn empty_message_encodes_to_nothing() {
        let message = NdefMessage::default();
        assert!(message.to_bytes().is_empty());
        assert_eq!(message.byte_len(), 0);
        assert!(NdefMessage::try_from_bytes(&[]).unwrap().is_empty());
    }
}
