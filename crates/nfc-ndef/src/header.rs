use crate::{record::NdefRecord, tnf::Tnf};

pub const FLAG_MESSAGE_BEGIN: u8 = 0x80;
pub const FLAG_MESSAGE_END: u8 = 0x40;
pub const FLAG_CHUNK: u8 = 0x20;
pub const FLAG_SHORT_RECORD: u8 = 0x10;
pub const FLAG_ID_LENGTH: u8 = 0x08;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: Tnf,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// Header for writing `record` at a given position in a message, never chunked
    pub fn for_record(record: &NdefRecord, message_begin: bool, message_end: bool) -> Self {
        let payload_length = record.payload().len() as u32;
        let has_id_length = record.tnf() == Tnf::Empty || !record.id().is_empty();

        Self {
            message_begin,
            message_end,
            chunked: false,
            short_record: payload_length < 256,
            has_id_length,
            type_name_format: record.tnf(),
            type_length: record.type_().len() as u8,
            payload_length,
            id_length: has_id_length.then_some(record.id().len() as u8),
        }
    }

    pub fn flags_byte(&self) -> u8 {
        let mut byte = self.type_name_format.bits();

        for (set, flag) in [
            (self.message_begin, FLAG_MESSAGE_BEGIN),
            (self.message_end, FLAG_MESSAGE_END),
            (self.chunked, FLAG_CHUNK),
            (self.short_record, FLAG_SHORT_RECORD),
            (self.has_id_length, FLAG_ID_LENGTH),
        ] {
            if set {
                byte |= flag;
            }
        }

        byte
    }

    /// Number of bytes the header occupies on the wire
    pub fn encoded_len(&self) -> usize {
        let payload_length_len = if self.short_record { 1 } else { 4 };
        let id_length_len = if self.has_id_length { 1 } else { 0 };
        2 + payload_length_len + id_length_len
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.flags_byte());
        out.push(self.type_length);

        if self.short_record {
            out.push(self.payload_length as u8);
        } else {
            out.extend_from_slice(&self.payload_length.to_be_bytes());
        }

        if let Some(id_length) = self.id_length {
            out.push(id_length);
        }
    }
}
