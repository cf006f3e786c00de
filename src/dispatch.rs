//! Single request surface in front of the tag hosts
//!
//! Every call checks that NFC is on, then resolves the host for the rf
//! discovery id and forwards to it. Boolean host failures become
//! [`TagError::IoFailure`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use nfc_macros::ensure;
use tap::TapFallible as _;
use tracing::{debug, warn};

use crate::{
    config::TagLayerConfig,
    error::{Result, TagError},
    host::{NdefInfo, TagHost, TransceiveStatus},
    registry::TagRegistry,
    technology::Technology,
};

#[derive(Debug, uniffi::Object)]
pub struct TagDispatcher {
    registry: Arc<TagRegistry>,
    nfc_enabled: AtomicBool,
    config: TagLayerConfig,
}

#[uniffi::export]
impl TagDispatcher {
    #[uniffi::constructor]
    pub fn new(registry: Arc<TagRegistry>, config: TagLayerConfig) -> Self {
        let nfc_enabled = AtomicBool::new(config.nfc_enabled);
        Self {
            registry,
            nfc_enabled,
            config,
        }
    }

    pub fn set_nfc_enabled(&self, enabled: bool) {
        debug!("nfc enabled: {enabled}");
        self.nfc_enabled.store(enabled, Ordering::Release);
    }

    pub fn is_nfc_enabled(&self) -> bool {
        self.nfc_enabled.load(Ordering::Acquire)
    }

    /// The tag left the field, its host is dropped from the registry
    pub fn on_tag_lost(&self, rf_disc_id: u32) {
        if self.registry.find_and_remove(rf_disc_id).is_none() {
            debug!("tag lost for unknown rf discovery id {rf_disc_id}");
        }
    }

    pub fn config(&self) -> TagLayerConfig {
        self.config.clone()
    }
}

impl TagDispatcher {
    pub fn registry(&self) -> &Arc<TagRegistry> {
        &self.registry
    }

    fn host(&self, rf_disc_id: u32) -> Result<Arc<dyn TagHost>> {
        ensure!(self.is_nfc_enabled(), TagError::NotInitialized);

        self.registry
            .find(rf_disc_id)
            .and_then(|host| host.upgrade())
            .ok_or(TagError::Disconnect(rf_disc_id))
    }

    pub fn connect(&self, rf_disc_id: u32, technology: Technology) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.connect(technology), "connect")
            .tap_err(|error| warn!("connect {technology} on {rf_disc_id}: {error}"))
    }

    pub fn reconnect(&self, rf_disc_id: u32) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.reconnect(), "reconnect")
    }

    pub fn disconnect(&self, rf_disc_id: u32) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.disconnect(), "disconnect")
    }

    /// Technologies the host reports, unknown codes are skipped
    pub fn tech_list(&self, rf_disc_id: u32) -> Result<Vec<Technology>> {
        let host = self.host(rf_disc_id)?;
        Ok(host
            .tech_list()
            .into_iter()
            .filter_map(Technology::from_code)
            .collect())
    }

    pub fn connected_tech(&self, rf_disc_id: u32) -> Result<Option<Technology>> {
        let host = self.host(rf_disc_id)?;
        Ok(Technology::from_code(host.connected_tech()))
    }

    pub fn is_tag_field_on(&self, rf_disc_id: u32) -> Result<bool> {
        let host = self.host(rf_disc_id)?;
        Ok(host.is_tag_field_on())
    }

    pub fn is_ndef(&self, rf_disc_id: u32) -> Result<Option<NdefInfo>> {
        let host = self.host(rf_disc_id)?;
        Ok(host.is_ndef_msg_contained())
    }

    /// Transceive `data` over the host's connected technology
    ///
    /// Frames over that technology's ceiling are refused before reaching the host.
    pub fn send_raw_frame(&self, rf_disc_id: u32, data: &[u8], raw: bool) -> Result<Vec<u8>> {
        ensure!(!data.is_empty(), TagError::ParametersError("empty command".into()));

        let host = self.host(rf_disc_id)?;
        let technology =
            Technology::from_code(host.connected_tech()).ok_or(TagError::StateDisconnected)?;

        let max = self.ceiling(host.as_ref(), technology);
        let length = data.len() as u32;
        if length > max {
            warn!("{technology} frame of {length} bytes is over the {max} byte ceiling");
            return Err(TagError::ExceededLength { length, max });
        }

        let response = host.transceive(data.to_vec(), raw);
        let result = match response.status {
            TransceiveStatus::Success if response.data.is_empty() => {
                Err(TagError::IoFailure("empty transceive response".into()))
            }
            TransceiveStatus::Success => Ok(response.data),
            TransceiveStatus::Failure => Err(TagError::IoFailure("transceive failed".into())),
            TransceiveStatus::Timeout => Err(TagError::IoFailure("transceive timed out".into())),
            TransceiveStatus::TagLost => Err(TagError::Disconnect(rf_disc_id)),
        };

        result.tap_err(|error| debug!("transceive on {rf_disc_id}: {error}"))
    }

    pub fn ndef_read(&self, rf_disc_id: u32) -> Result<Vec<u8>> {
        let host = self.host(rf_disc_id)?;
        Ok(host.read_ndef())
    }

    pub fn ndef_write(&self, rf_disc_id: u32, data: Vec<u8>) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.write_ndef(data), "ndef write")
    }

    pub fn ndef_make_read_only(&self, rf_disc_id: u32) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.set_ndef_read_only(), "ndef make read only")
    }

    pub fn format_ndef(&self, rf_disc_id: u32, key: &[u8]) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.format_ndef(key.to_vec()), "ndef format")
    }

    pub fn can_make_read_only(&self, rf_disc_id: u32, ndef_type: i32) -> Result<bool> {
        let host = self.host(rf_disc_id)?;
        Ok(host.can_make_read_only(ndef_type))
    }

    pub fn set_timeout(
        &self,
        rf_disc_id: u32,
        technology: Technology,
        timeout_ms: u32,
    ) -> Result<()> {
        let host = self.host(rf_disc_id)?;
        io_result(host.set_timeout(technology, timeout_ms), "set timeout")
    }

    /// Host timeout for `technology`, the configured default when the host has none
    pub fn timeout(&self, rf_disc_id: u32, technology: Technology) -> Result<u32> {
        let host = self.host(rf_disc_id)?;
        match host.timeout(technology) {
            0 => Ok(self.config.default_timeout_ms),
            timeout => Ok(timeout),
        }
    }

    pub fn is_extended_apdu_supported(&self, rf_disc_id: u32) -> Result<bool> {
        let host = self.host(rf_disc_id)?;
        Ok(host.extended_length_apdus_supported())
    }

    pub fn max_transceive_length(&self, rf_disc_id: u32, technology: Technology) -> Result<u32> {
        let host = self.host(rf_disc_id)?;
        Ok(self.ceiling(host.as_ref(), technology))
    }

    fn ceiling(&self, host: &dyn TagHost, technology: Technology) -> u32 {
        self.config
            .transceive_limits
            .for_technology(technology)
            .unwrap_or_else(|| host.iso_dep_max_transceive_length())
    }
}

fn io_result(ok: bool, operation: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(TagError::IoFailure(format!("{operation} failed")))
    }
}
