//! Logging setup.
//!
//! The engine only uses the `log` facade; `init_logging` installs
//! `env_logger` as its backend for binaries that want one.

mod init;

pub use init::{init_logging, LoggingConfig};
