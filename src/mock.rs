//! Scripted [`TagHost`] for tests

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::{
    config::TagLayerConfig,
    dispatch::TagDispatcher,
    host::{NdefInfo, TagHost, TransceiveResponse, TransceiveStatus},
    registry::TagRegistry,
    tag::{DiscoveredTag, TechExtras},
    technology::Technology,
};

#[derive(Debug)]
pub struct MockHost {
    rf_disc_id: u32,
    state: Mutex<MockState>,
}

#[derive(Debug)]
pub struct MockState {
    pub connect_ok: bool,
    pub reconnect_ok: bool,
    pub connected: i32,
    pub response: Option<TransceiveResponse>,
    pub field_on: bool,
    pub ndef_info: Option<NdefInfo>,
    pub ndef_bytes: Vec<u8>,
    pub write_ok: bool,
    pub format_ok: bool,
    pub read_only_ok: bool,
    pub can_make_read_only: bool,
    pub iso_dep_max: u32,
    pub extended_apdus: bool,
    pub tech_list: Vec<i32>,
    pub timeouts: AHashMap<Technology, u32>,
    pub format_key: Option<Vec<u8>>,
    pub calls: Vec<&'static str>,
    pub sent: Vec<Vec<u8>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            connect_ok: true,
            reconnect_ok: true,
            connected: 0,
            response: None,
            field_on: true,
            ndef_info: None,
            ndef_bytes: Vec::new(),
            write_ok: true,
            format_ok: true,
            read_only_ok: true,
            can_make_read_only: true,
            iso_dep_max: 261,
            extended_apdus: false,
            tech_list: vec![Technology::NfcA.code()],
            timeouts: AHashMap::new(),
            format_key: None,
            calls: Vec::new(),
            sent: Vec::new(),
        }
    }
}

impl MockHost {
    pub fn new(rf_disc_id: u32) -> Arc<Self> {
        Arc::new(Self::unshared(rf_disc_id))
    }

    pub fn unshared(rf_disc_id: u32) -> Self {
        Self {
            rf_disc_id,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn set(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    pub fn ndef_bytes(&self) -> Vec<u8> {
        self.state.lock().ndef_bytes.clone()
    }

    pub fn format_key(&self) -> Option<Vec<u8>> {
        self.state.lock().format_key.clone()
    }

    fn record(&self, call: &'static str) -> parking_lot::MutexGuard<'_, MockState> {
        let mut state = self.state.lock();
        state.calls.push(call);
        state
    }
}

impl TagHost for MockHost {
    fn connect(&self, technology: Technology) -> bool {
        let mut state = self.record("connect");
        if state.connect_ok {
            state.connected = technology.code();
        }

        state.connect_ok
    }

    fn disconnect(&self) -> bool {
        self.record("disconnect").connected = 0;
        true
    }

    fn reconnect(&self) -> bool {
        self.record("reconnect").reconnect_ok
    }

    fn transceive(&self, command: Vec<u8>, _raw: bool) -> TransceiveResponse {
        let mut state = self.record("transceive");
        state.sent.push(command);

        state.response.clone().unwrap_or(TransceiveResponse {
            status: TransceiveStatus::Success,
            data: vec![0x90, 0x00],
        })
    }

    fn is_tag_field_on(&self) -> bool {
        self.record("is_tag_field_on").field_on
    }

    fn is_ndef_msg_contained(&self) -> Option<NdefInfo> {
        self.record("is_ndef_msg_contained").ndef_info
    }

    fn read_ndef(&self) -> Vec<u8> {
        self.record("read_ndef").ndef_bytes.clone()
    }

    fn write_ndef(&self, data: Vec<u8>) -> bool {
        let mut state = self.record("write_ndef");
        if state.write_ok {
            state.ndef_bytes = data;
        }

        state.write_ok
    }

    fn format_ndef(&self, key: Vec<u8>) -> bool {
        let mut state = self.record("format_ndef");
        state.format_key = Some(key);
        state.format_ok
    }

    fn set_ndef_read_only(&self) -> bool {
        self.record("set_ndef_read_only").read_only_ok
    }

    fn can_make_read_only(&self, _ndef_type: i32) -> bool {
        self.record("can_make_read_only").can_make_read_only
    }

    fn tech_list(&self) -> Vec<i32> {
        self.state.lock().tech_list.clone()
    }

    fn connected_tech(&self) -> i32 {
        self.state.lock().connected
    }

    fn tag_rf_disc_id(&self) -> u32 {
        self.rf_disc_id
    }

    fn iso_dep_max_transceive_length(&self) -> u32 {
        self.state.lock().iso_dep_max
    }

    fn extended_length_apdus_supported(&self) -> bool {
        self.state.lock().extended_apdus
    }

    fn set_timeout(&self, technology: Technology, timeout_ms: u32) -> bool {
        self.record("set_timeout")
            .timeouts
            .insert(technology, timeout_ms);
        true
    }

    fn timeout(&self, technology: Technology) -> u32 {
        self.state
            .lock()
            .timeouts
            .get(&technology)
            .copied()
            .unwrap_or(0)
    }
}

/// A registered mock host, a dispatcher over it and a tag with `technologies`
pub fn setup(
    uid: &[u8],
    technologies: Vec<(Technology, TechExtras)>,
) -> (Arc<MockHost>, Arc<TagDispatcher>, Arc<DiscoveredTag>) {
    let rf_disc_id = 1;
    let host = MockHost::new(rf_disc_id);

    let registry = Arc::new(TagRegistry::new());
    registry.register_host(host.clone());

    let dispatcher = Arc::new(TagDispatcher::new(registry, TagLayerConfig::default()));
    let tag = Arc::new(DiscoveredTag::new(rf_disc_id, uid.to_vec(), technologies));

    (host, dispatcher, tag)
}
