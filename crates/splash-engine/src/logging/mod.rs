//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only uses the `log`
//! facade; hosts call [`init_logging`] once.

mod init;

pub use init::{init_logging, LoggingConfig};
