use std::sync::Arc;

use crate::{
    NdefError, NdefMessage, NdefRecord, factory,
    payload::TextPayload,
    tnf::Tnf,
};

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct FfiNdefRecord(NdefRecord);

#[uniffi::export]
impl FfiNdefRecord {
    #[uniffi::constructor]
    pub fn new(
        tnf: Tnf,
        type_: Vec<u8>,
        id: Vec<u8>,
        payload: Vec<u8>,
    ) -> Result<Self, NdefError> {
        NdefRecord::try_new(tnf, type_, id, payload).map(Self)
    }

    pub fn tnf(&self) -> Tnf {
        self.0.tnf()
    }

    pub fn type_(&self) -> Vec<u8> {
        self.0.type_().to_vec()
    }

    pub fn id(&self) -> Vec<u8> {
        self.0.id().to_vec()
    }

    pub fn payload(&self) -> Vec<u8> {
        self.0.payload().to_vec()
    }

    pub fn text(&self) -> Option<TextPayload> {
        self.0.text()
    }

    pub fn uri(&self) -> Option<String> {
        self.0.uri()
    }

    pub fn is_equal(&self, rhs: &Self) -> bool {
        self == rhs
    }
}

impl From<NdefRecord> for FfiNdefRecord {
    fn from(record: NdefRecord) -> Self {
        Self(record)
    }
}

impl From<FfiNdefRecord> for NdefRecord {
    fn from(record: FfiNdefRecord) -> Self {
        record.0
    }
}

#[uniffi::export]
fn ndef_message_to_bytes(records: Vec<Arc<FfiNdefRecord>>) -> Vec<u8> {
    let records = records
        .into_iter()
        .map(|record| Arc::unwrap_or_clone(record).into())
        .collect();
    NdefMessage::new(records).to_bytes()
}

#[uniffi::export]
fn ndef_message_from_bytes(data: Vec<u8>) -> Result<Vec<Arc<FfiNdefRecord>>, NdefError> {
    let message = NdefMessage::try_from_bytes(&data)?;
    Ok(message
        .into_iter()
        .map(|record| Arc::new(record.into()))
        .collect())
}

#[uniffi::export]
fn ndef_make_uri_record(uri: String) -> Option<Arc<FfiNdefRecord>> {
    factory::make_uri_record(&uri).map(|record| Arc::new(record.into()))
}

#[uniffi::export]
fn ndef_make_text_record(text: String, locale: String) -> Option<Arc<FfiNdefRecord>> {
    factory::make_text_record(&text, &locale).map(|record| Arc::new(record.into()))
}

#[uniffi::export]
fn ndef_make_mime_record(mime_type: String, data: Vec<u8>) -> Option<Arc<FfiNdefRecord>> {
    factory::make_mime_record(&mime_type, &data).map(|record| Arc::new(record.into()))
}

#[uniffi::export]
fn ndef_make_external_record(
    domain: String,
    service: String,
    data: Vec<u8>,
) -> Option<Arc<FfiNdefRecord>> {
    factory::make_external_record(&domain, &service, &data).map(|record| Arc::new(record.into()))
}
