use crate::{
    MAX_PAYLOAD_LENGTH,
    error::{NdefError, Result},
    payload::{self, RTD_TEXT, RTD_URI, TextPayload},
    tnf::Tnf,
};

/// A single complete NDEF record
///
/// Fields are private so every record that exists went through [`NdefRecord::try_new`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdefRecord {
    tnf: Tnf,
    type_: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    pub fn try_new(
        tnf: Tnf,
        type_: impl Into<Vec<u8>>,
        id: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let type_ = type_.into();
        let id = id.into();
        let payload = payload.into();

        match tnf {
            Tnf::Empty if !type_.is_empty() || !id.is_empty() || !payload.is_empty() => {
                return Err(NdefError::InvalidRecord(
                    "empty record must not carry a type, id or payload".into(),
                ));
            }

            Tnf::Unknown | Tnf::Reserved if type_.is_empty() => {
                return Err(NdefError::InvalidRecord(format!("{tnf:?} record needs a type")));
            }

            Tnf::Unchanged => {
                return Err(NdefError::InvalidRecord(
                    "unchanged is only valid inside a chunk run".into(),
                ));
            }

            _ => {}
        }

        if type_.len() > u8::MAX as usize {
            return Err(NdefError::InvalidRecord(format!("type is {} bytes", type_.len())));
        }

        if id.len() > u8::MAX as usize {
            return Err(NdefError::InvalidRecord(format!("id is {} bytes", id.len())));
        }

        if payload.len() > MAX_PAYLOAD_LENGTH as usize {
            return Err(NdefError::PayloadTooLarge(payload.len() as u32));
        }

        Ok(Self {
            tnf,
            type_,
            id,
            payload,
        })
    }

    pub fn empty() -> Self {
        Self {
            tnf: Tnf::Empty,
            type_: Vec::new(),
            id: Vec::new(),
            payload: Vec::new(),
        }
    }

    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    pub fn type_(&self) -> &[u8] {
        &self.type_
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn is_well_known(&self, rtd: &[u8]) -> bool {
        self.tnf == Tnf::WellKnown && self.type_ == rtd
    }

    /// Decoded text, only for well known text records
    pub fn text(&self) -> Option<TextPayload> {
        if !self.is_well_known(RTD_TEXT) {
            return None;
        }

        payload::parse_text_payload(&self.payload)
    }

    /// Full URI for well known URI records and absolute URI records
    pub fn uri(&self) -> Option<String> {
        match self.tnf {
            Tnf::WellKnown if self.type_ == RTD_URI => payload::expand_uri_payload(&self.payload),
            Tnf::AbsoluteUri => String::from_utf8(self.type_.clone()).ok(),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        if self.tnf != Tnf::Mime {
            return None;
        }

        std::str::from_utf8(&self.type_).ok()
    }
}
