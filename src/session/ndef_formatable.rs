use std::sync::Arc;

use nfc_ndef::NdefMessage;
use tap::TapFallible as _;
use tracing::{info, warn};

use crate::{
    dispatch::TagDispatcher,
    error::{Result, TagError},
    session::{SessionCore, TagSession, mifare_classic::KEY_DEFAULT},
    tag::DiscoveredTag,
    technology::Technology,
};

/// A tag that can be formatted to hold NDEF data
#[derive(Debug, Clone)]
pub struct NdefFormatable {
    core: SessionCore,
}

impl NdefFormatable {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::NdefFormatable, dispatcher)?;
        Some(Self { core })
    }

    /// Format, then write `first_message` when given
    pub fn format(&self, first_message: Option<&NdefMessage>) -> Result<()> {
        self.format_with(first_message, false)
    }

    /// Format, write `first_message` when given, then lock the tag
    pub fn format_read_only(&self, first_message: Option<&NdefMessage>) -> Result<()> {
        self.format_with(first_message, true)
    }

    fn format_with(&self, first_message: Option<&NdefMessage>, read_only: bool) -> Result<()> {
        let tag = self.core.connected_tag()?;
        let rf_disc_id = tag.rf_disc_id();
        let dispatcher = self.core.dispatcher();

        dispatcher
            .format_ndef(rf_disc_id, &KEY_DEFAULT)
            .tap_err(|error| warn!("format of {rf_disc_id} failed: {error}"))?;

        dispatcher.is_ndef(rf_disc_id)?.ok_or(TagError::NotNdef)?;

        if let Some(message) = first_message {
            dispatcher.ndef_write(rf_disc_id, message.to_bytes())?;
        }

        if read_only {
            dispatcher.ndef_make_read_only(rf_disc_id)?;
        }

        info!("formatted tag {rf_disc_id}, read only: {read_only}");
        Ok(())
    }
}

impl TagSession for NdefFormatable {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use nfc_ndef::make_text_record;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        host::NdefInfo,
        mock::{self, MockHost},
        tag::TechExtras,
    };

    fn formatable() -> (Arc<MockHost>, NdefFormatable, Arc<DiscoveredTag>) {
        let (host, dispatcher, tag) = mock::setup(&[0x04, 0x01, 0x02, 0x03], vec![(
            Technology::NdefFormatable,
            TechExtras::new(),
        )]);
        let session = NdefFormatable::open(&tag, dispatcher).unwrap();
        session.connect().unwrap();

        host.set(|state| {
            state.ndef_info = Some(NdefInfo {
                max_size: 46,
                mode: 2,
            })
        });
        (host, session, tag)
    }

    #[test]
    fn full_chain() {
        let (host, session, _tag) = formatable();
        let message = NdefMessage::from(make_text_record("hi", "en").unwrap());

        session.format_read_only(Some(&message)).unwrap();

        assert_eq!(host.format_key(), Some(vec![0xFF; 6]));
        assert_eq!(host.ndef_bytes(), message.to_bytes());
        assert_eq!(
            host.calls(),
            vec![
                "connect",
                "format_ndef",
                "is_ndef_msg_contained",
                "write_ndef",
                "set_ndef_read_only",
            ]
        );
    }

    #[test]
    fn format_without_message() {
        let (host, session, _tag) = formatable();
        session.format(None).unwrap();

        assert_eq!(host.calls(), vec!["connect", "format_ndef", "is_ndef_msg_contained"]);
    }

    #[test]
    fn failed_format_short_circuits() {
        let (host, session, _tag) = formatable();
        host.set(|state| state.format_ok = false);

        let message = NdefMessage::from(make_text_record("hi", "en").unwrap());
        assert!(matches!(session.format_read_only(Some(&message)), Err(TagError::IoFailure(_))));
        assert_eq!(host.calls(), vec!["connect", "format_ndef"]);
    }

    #[test]
    fn not_ndef_after_format_stops_chain() {
        let (host, session, _tag) = formatable();
        host.set(|state| state.ndef_info = None);

        assert_eq!(session.format_read_only(None), Err(TagError::NotNdef));
        assert!(!host.calls().contains(&"set_ndef_read_only"));
    }

    #[test]
    fn failed_write_skips_read_only() {
        let (host, session, _tag) = formatable();
        host.set(|state| state.write_ok = false);

        let message = NdefMessage::from(make_text_record("hi", "en").unwrap());
        assert!(matches!(session.format_read_only(Some(&message)), Err(TagError::IoFailure(_))));
        assert!(!host.calls().contains(&"set_ndef_read_only"));
    }

    #[test]
    fn format_needs_connection() {
        let (host, session, _tag) = formatable();
        session.close().unwrap();

        assert_eq!(session.format(None), Err(TagError::StateDisconnected));
        assert!(!host.calls().contains(&"format_ndef"));
    }
}
