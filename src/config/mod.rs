//! Session configuration
//!
//! The optimizer reads one value from here: the byte budget of a rowid
//! filter, which candidate gathering turns into a row-count cap using the
//! table's row locator length.

mod errors;
mod session;

pub use errors::{ConfigError, ConfigResult};
pub use session::SessionConfig;
