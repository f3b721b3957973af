//! Cross-platform utilities and helpers
//!
//! - [`fs`] - Atomic file replacement for the compiled template
//! - [`platform`] - Executable names and lookup across Windows, macOS and Linux

pub mod fs;
pub mod platform;

pub use fs::atomic_write;
pub use platform::{command_exists, packager_command};
