use std::sync::{Arc, Weak};

use ahash::AHashMap;
use nfc_macros::impl_default_for;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::host::TagHost;

/// Hosts of the tags currently in the field, keyed by rf discovery id
///
/// The lock is only held for map operations, never across a host call.
#[derive(Debug, uniffi::Object)]
pub struct TagRegistry {
    hosts: Mutex<AHashMap<u32, Arc<dyn TagHost>>>,
}

impl_default_for!(TagRegistry);

#[uniffi::export]
impl TagRegistry {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            hosts: Mutex::new(AHashMap::new()),
        }
    }

    /// Register a host under its own rf discovery id
    pub fn register(&self, host: Box<dyn TagHost>) {
        self.register_host(Arc::from(host));
    }

    pub fn unregister(&self, rf_disc_id: u32) -> bool {
        self.find_and_remove(rf_disc_id).is_some()
    }

    pub fn contains(&self, rf_disc_id: u32) -> bool {
        self.hosts.lock().contains_key(&rf_disc_id)
    }

    pub fn len(&self) -> u32 {
        self.hosts.lock().len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.lock().is_empty()
    }
}

impl TagRegistry {
    pub fn register_host(&self, host: Arc<dyn TagHost>) {
        let rf_disc_id = host.tag_rf_disc_id();
        let previous = self.hosts.lock().insert(rf_disc_id, host);

        if previous.is_some() {
            warn!("replaced tag host for rf discovery id {rf_disc_id}");
        } else {
            debug!("registered tag host for rf discovery id {rf_disc_id}");
        }
    }

    pub fn find(&self, rf_disc_id: u32) -> Option<Weak<dyn TagHost>> {
        self.hosts.lock().get(&rf_disc_id).map(Arc::downgrade)
    }

    pub fn find_and_remove(&self, rf_disc_id: u32) -> Option<Arc<dyn TagHost>> {
        let removed = self.hosts.lock().remove(&rf_disc_id);
        if removed.is_some() {
            debug!("unregistered tag host for rf discovery id {rf_disc_id}");
        }

        removed
    }
}
