//! Structured logging built on `tracing`.
//!
//! Every layer of the crate emits `tracing` events and spans with structured
//! fields (`id`, `count`, `status`, ...). This module installs the subscriber
//! that turns them into text, on stderr or in a size-rotated log file.
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: rotating log file with numbered backups

mod file_writer;
mod init;

pub use file_writer::{FileWriter, LogHandle, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::init_tracing;
