//! NFC tag technology layer
//!
//! Discovered tags are opened as technology [`session`]s which talk to the
//! hardware through a [`dispatch::TagDispatcher`]. NDEF encoding lives in the
//! `nfc-ndef` crate, re-exported as [`ndef`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod logging;
pub mod registry;
pub mod session;
pub mod tag;
pub mod technology;

#[cfg(test)]
mod mock;

pub use nfc_ndef as ndef;

pub use config::{TagLayerConfig, TransceiveLimits};
pub use dispatch::TagDispatcher;
pub use error::{Result, TagError};
pub use host::{NdefInfo, TagHost, TransceiveResponse, TransceiveStatus};
pub use registry::TagRegistry;
pub use session::{Session, SessionCore, TagSession};
pub use tag::{DiscoveredTag, ExtraKey, ExtraValue, TagExtra, TechExtras};
pub use technology::Technology;

uniffi::setup_scaffolding!();
