//! Small shared utilities.

pub mod cancel;
pub mod url;

pub use cancel::CancelHandle;
pub use url::join_url;
