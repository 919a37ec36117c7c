//! Unified media services layered on top of the provider clients.
//!
//! Each service presents one `generate`-shaped surface to callers
//! regardless of which underlying provider is configured. Services must be
//! configured with [`types::ServiceConfig`] before use.

pub mod types;
pub mod video;

#[cfg(feature = "elevenlabs")]
pub mod content;
#[cfg(feature = "elevenlabs")]
pub mod speech;
