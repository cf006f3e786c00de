use std::sync::Arc;

use crate::{
    dispatch::TagDispatcher,
    error::Result,
    session::{SessionCore, TagSession},
    tag::DiscoveredTag,
    technology::Technology,
};

/// Barcode tags carry their data in the tag id, there are no commands
#[derive(Debug, Clone)]
pub struct Barcode {
    core: SessionCore,
}

impl Barcode {
    pub fn open(tag: &Arc<DiscoveredTag>, dispatcher: Arc<TagDispatcher>) -> Option<Self> {
        let core = SessionCore::open(tag, Technology::Barcode, dispatcher)?;
        Some(Self { core })
    }

    pub fn barcode(&self) -> Result<String> {
        self.tag_uid()
    }
}

impl TagSession for Barcode {
    fn core(&self) -> &SessionCore {
        &self.core
    }
}
