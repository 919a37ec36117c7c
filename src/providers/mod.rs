//! Provider adapters and clients.
//!
//! Each adapter translates one third-party API's native JSON shapes into
//! the common [`crate::types::Model`] / [`crate::types::ModelVersion`]
//! records and is registered with the
//! [`crate::registry::ModelRegistry`] under its name.

pub(crate) mod http;

#[cfg(feature = "elevenlabs")]
pub mod elevenlabs;
#[cfg(feature = "groq")]
pub mod groq;
#[cfg(any(feature = "openrouter", feature = "groq"))]
pub(crate) mod openai_compat;
#[cfg(feature = "openrouter")]
pub mod openrouter;
#[cfg(feature = "replicate")]
pub mod replicate;
