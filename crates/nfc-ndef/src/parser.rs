pub mod stream;

use nfc_util::result_ext::ResultExt as _;
use stream::Stream;
use tracing::debug;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    MAX_PAYLOAD_LENGTH,
    error::{NdefError, Result},
    header::NdefHeader,
    record::NdefRecord,
    tnf::Tnf,
};

/// Decode every record of a message, stopping after the record with the message end flag
///
/// Chunked records are reassembled into a single logical record. Any error aborts the
/// whole message, no partially decoded records are returned. Empty input has no records.
pub fn parse_ndef_records(input: &mut Stream<'_>) -> Result<Vec<NdefRecord>> {
    let mut records = Vec::new();
    if input.is_empty() {
        return Ok(records);
    }

    let mut chunk_run: Option<ChunkRun> = None;
    let mut is_first = true;

    loop {
        let header = parse_header
            .parse_next(input)
            .map_err_str(NdefError::Truncated)?;
        check_flags(&header, is_first, chunk_run.is_some())?;

        if header.payload_length > MAX_PAYLOAD_LENGTH {
            return Err(NdefError::PayloadTooLarge(header.payload_length));
        }

        match chunk_run.take() {
            // middle or last chunk, type and id come from the chunk start
            Some(mut run) => {
                if header.type_length != 0 {
                    return Err(NdefError::InvalidChunk(
                        "continuation chunk has a type length".into(),
                    ));
                }

                let payload = parse_payload(input, header.payload_length)?;
                run.push(payload)?;

                if header.chunked {
                    chunk_run = Some(run);
                } else {
                    debug!("reassembled {} chunks", run.payloads.len());
                    records.push(run.finish()?);
                }
            }

            None => {
                let type_ =
                    parse_type(input, header.type_length).map_err_str(NdefError::Truncated)?;
                let id = parse_id(input, header.id_length).map_err_str(NdefError::Truncated)?;
                let payload = parse_payload(input, header.payload_length)?;

                if header.chunked {
                    let mut run = ChunkRun::new(header.type_name_format, type_, id);
                    run.push(payload)?;
                    chunk_run = Some(run);
                } else {
                    let record = NdefRecord::try_new(header.type_name_format, type_, id, payload)?;
                    records.push(record);
                }
            }
        }

        if header.message_end {
            break;
        }

        is_first = false;
    }

    Ok(records)
}

/// Decode a full message from bytes
pub fn decode_records(bytes: &[u8]) -> Result<Vec<NdefRecord>> {
    let mut input = stream::new(bytes);
    parse_ndef_records(&mut input)
}

/// Decode a full message, collapsing every failure into "no records"
pub fn decode_records_or_empty(bytes: &[u8]) -> Vec<NdefRecord> {
    decode_records(bytes)
        .ok_or_warn("unable to decode ndef message")
        .unwrap_or_default()
}

pub fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: Tnf::from_bits(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

// private
struct ChunkRun {
    tnf: Tnf,
    type_: Vec<u8>,
    id: Vec<u8>,
    payloads: Vec<Vec<u8>>,
    total_length: usize,
}

impl ChunkRun {
    fn new(tnf: Tnf, type_: Vec<u8>, id: Vec<u8>) -> Self {
        Self {
            tnf,
            type_,
            id,
            payloads: Vec::new(),
            total_length: 0,
        }
    }

    fn push(&mut self, payload: Vec<u8>) -> Result<()> {
        self.total_length += payload.len();
        if self.total_length > MAX_PAYLOAD_LENGTH as usize {
            return Err(NdefError::PayloadTooLarge(self.total_length as u32));
        }

        self.payloads.push(payload);
        Ok(())
    }

    fn finish(self) -> Result<NdefRecord> {
        let payload = self.payloads.concat();
        NdefRecord::try_new(self.tnf, self.type_, self.id, payload)
    }
}

fn check_flags(header: &NdefHeader, is_first: bool, in_chunk_run: bool) -> Result<()> {
    if is_first && !header.message_begin {
        return Err(NdefError::MissingMessageBegin);
    }

    if !is_first && header.message_begin {
        return Err(NdefError::UnexpectedMessageBegin);
    }

    if header.chunked && header.message_end {
        return Err(NdefError::ChunkedMessageEnd);
    }

    if in_chunk_run {
        if header.has_id_length {
            return Err(NdefError::InvalidChunk("continuation chunk has an id length".into()));
        }

        if header.type_name_format != Tnf::Unchanged {
            return Err(NdefError::InvalidChunk(format!(
                "continuation chunk has type name format {:?}",
                header.type_name_format
            )));
        }
    } else if header.type_name_format == Tnf::Unchanged {
        return Err(NdefError::UnexpectedUnchanged);
    }

    Ok(())
}

fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Vec<u8>> {
    match id_length {
        Some(id_len) => take(id_len as usize)
            .map(|s: &[u8]| s.to_vec())
            .parse_next(input),
        None => Ok(Vec::new()),
    }
}

fn parse_payload(input: &mut Stream<'_>, payload_length: u32) -> Result<Vec<u8>> {
    if payload_length as usize > input.len() {
        return Err(NdefError::Truncated(format!(
            "payload needs {payload_length} bytes, {} left",
            input.len()
        )));
    }

    let payload: ModalResult<Vec<u8>> = take(payload_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input);

    payload.map_err_str(NdefError::Truncated)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode(bytes: &[u8]) -> Result<Vec<NdefRecord>> {
        decode_records(bytes)
    }

    #[test]
    fn known_header_parse() {
        let mut header_bytes = stream::new(&[0xD1, 0x01, 0x0D, 0x55, 0x02]);
        let header: NdefHeader = parse_header(&mut header_bytes).unwrap();

        assert!(header.message_begin);
        assert!(header.message_end);
        assert!(!header.chunked);
        assert!(header.short_record);
        assert!(!header.has_id_length);
        assert_eq!(header.type_name_format, Tnf::WellKnown);
        assert_eq!(header.type_length, 1);
        assert_eq!(header.payload_length, 13);
        assert_eq!(header_bytes.len(), 2);
    }

    #[test]
    fn long_record_header_parse() {
        // MB | ME | IL, mime, payload length as 4 bytes
        let mut header_bytes = stream::new(&[0xCA, 0x10, 0x00, 0x00, 0x01, 0x2C, 0x03]);
        let header = parse_header(&mut header_bytes).unwrap();

        assert!(!header.short_record);
        assert!(header.has_id_length);
        assert_eq!(header.type_name_format, Tnf::Mime);
        assert_eq!(header.type_length, 16);
        assert_eq!(header.payload_length, 300);
        assert_eq!(header.id_length, Some(3));
    }

    #[test]
    fn single_text_record() {
        let records = decode(&[0xD1, 0x01, 0x05, 0x54, 0x02, 0x65, 0x6E, 0x68, 0x69]).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.tnf(), Tnf::WellKnown);
        assert_eq!(record.type_(), b"T");
        assert_eq!(record.payload(), b"\x02enhi");
        assert_eq!(record.text().unwrap().text, "hi");
    }

    #[test]
    fn chunked_record_is_reassembled() {
        let bytes = [
            // first chunk: MB | CF | SR, mime "a/b", payload "ab"
            0xB2, 0x03, 0x02, b'a', b'/', b'b', b'a', b'b',
            // middle chunk: CF | SR | unchanged
            0x36, 0x00, 0x02, b'c', b'd',
            // middle chunk
            0x36, 0x00, 0x01, b'e',
            // last chunk: ME | SR | unchanged
            0x56, 0x00, 0x03, b'f', b'g', b'h',
        ];

        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.tnf(), Tnf::Mime);
        assert_eq!(record.type_(), b"a/b");
        assert_eq!(record.payload(), b"abcdefgh");
    }

    #[test]
    fn chunk_run_followed_by_more_records() {
        let bytes = [
            // first chunk with id "7": MB | CF | SR | IL, external "x:y"
            0xBC, 0x03, 0x01, 0x01, b'x', b':', b'y', b'7', b'a',
            // last chunk, no message end
            0x16, 0x00, 0x01, b'b',
            // empty record closes the message: ME | SR | IL
            0x58, 0x00, 0x00, 0x00,
        ];

        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), b"7");
        assert_eq!(records[0].payload(), b"ab");
        assert_eq!(records[1], NdefRecord::empty());
    }

    #[test]
    fn first_record_needs_message_begin() {
        let error = decode(&[0x51, 0x01, 0x01, 0x54, 0x00]).unwrap_err();
        assert_eq!(error, NdefError::MissingMessageBegin);
    }

    #[test]
    fn message_begin_only_on_first() {
        let bytes = [0x91, 0x01, 0x00, 0x54, 0xD1, 0x01, 0x00, 0x54];
        assert_eq!(decode(&bytes).unwrap_err(), NdefError::UnexpectedMessageBegin);
    }

    #[test]
    fn chunk_with_message_end_is_rejected() {
        let error = decode(&[0xF2, 0x03, 0x01, b'a', b'/', b'b', b'x']).unwrap_err();
        assert_eq!(error, NdefError::ChunkedMessageEnd);
    }

    #[test]
    fn continuation_must_be_unchanged() {
        let bytes = [0xB2, 0x03, 0x01, b'a', b'/', b'b', b'x', 0x52, 0x00, 0x01, b'y'];
        assert!(matches!(decode(&bytes).unwrap_err(), NdefError::InvalidChunk(_)));
    }

    #[test]
    fn continuation_must_not_have_id_or_type() {
        let with_id = [0xB2, 0x03, 0x01, b'a', b'/', b'b', b'x', 0x5E, 0x00, 0x01, 0x00, b'y'];
        assert!(matches!(decode(&with_id).unwrap_err(), NdefError::InvalidChunk(_)));

        let with_type = [0xB2, 0x03, 0x01, b'a', b'/', b'b', b'x', 0x56, 0x01, 0x01, b't', b'y'];
        assert!(matches!(decode(&with_type).unwrap_err(), NdefError::InvalidChunk(_)));
    }

    #[test]
    fn unchanged_outside_chunk_is_rejected() {
        let error = decode(&[0xD6, 0x00, 0x01, b'x']).unwrap_err();
        assert_eq!(error, NdefError::UnexpectedUnchanged);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        // long record claiming 0x7FFFFFFF bytes
        let error = decode(&[0xC2, 0x03, 0x7F, 0xFF, 0xFF, 0xFF, b'a', b'/', b'b']).unwrap_err();
        assert_eq!(error, NdefError::PayloadTooLarge(0x7FFF_FFFF));
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(matches!(decode(&[0xD1, 0x01, 0x05, 0x54, 0x02]), Err(NdefError::Truncated(_))));
        assert!(matches!(decode(&[0xD1]), Err(NdefError::Truncated(_))));

        // no record carries message end
        assert!(matches!(decode(&[0x91, 0x01, 0x00, 0x54]), Err(NdefError::Truncated(_))));
    }

    #[test]
    fn errors_drop_earlier_records() {
        let bytes = [0x91, 0x01, 0x00, 0x54, 0x56, 0x00, 0x00];
        assert!(decode(&bytes).is_err());
        assert_eq!(decode_records_or_empty(&bytes), Vec::new());
    }

    #[test]
    fn payload_takes_exact_length() {
        let mut input = stream::new(&[0x01, 0x02, 0x03]);
        assert_eq!(parse_payload(&mut input, 2).unwrap(), vec![0x01, 0x02]);
        assert_eq!(input.len(), 1);

        assert!(matches!(parse_payload(&mut input, 2), Err(NdefError::Truncated(_))));
        assert_eq!(parse_payload(&mut input, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn empty_input_has_no_records() {
        assert_eq!(decode(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn trailing_bytes_after_message_end_are_ignored() {
        let mut input = stream::new(&[0xD0, 0x00, 0x00, 0xFE]);
        let records = parse_ndef_records(&mut input).unwrap();

        assert_eq!(records, vec![NdefRecord::empty()]);
        assert_eq!(input.len(), 1);
    }
}
