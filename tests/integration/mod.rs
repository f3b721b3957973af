//! Integration test suite for layer-manager
//!
//! End-to-end tests that run the `layer-manager` binary against service
//! definitions and compiled templates on disk.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **transform**: `transform` and `hook before:deploy:deploy` rewriting templates
//! - **install**: `install` and `hook package:initialize` against layer directories
//! - **config**: `config` output and error reporting

mod common;
mod config;
mod install;
mod transform;
