//! layer-manager - Lambda layer management for serverless deployments
//!
//! A deployment-time companion for serverless services that declare Lambda
//! layers. It works at two points of the host framework's pipeline:
//!
//! 1. **Package initialization**: every layer with a `nodejs` directory gets its
//!    dependencies installed with npm or yarn, so they are packaged with the layer.
//! 2. **Before deployment**: the compiled CloudFormation template is rewritten so
//!    each layer's qualified ARN output is exported from the stack, and every
//!    function references the versioned (hash-suffixed) layer resource instead of
//!    the mutable logical one.
//!
//! The host owns packaging, compilation and deployment; this crate only reads the
//! service definition, runs the installer, and mutates the compiled template.
//!
//! # Core Modules
//!
//! - [`config`] - `custom.layerConfig` options and per-layer overrides
//! - [`core`] - Error types and the host's layer naming convention
//! - [`service`] - Service definition loading (`serverless.yml` / `.json`)
//! - [`installer`] - Layer dependency installation behind [`installer::PackageInstaller`]
//! - [`template`] - Compiled template handling and the layer transformation
//! - [`hooks`] - The two lifecycle hooks tying it together
//!
//! ## Supporting Modules
//!
//! - [`cli`] - The `layer-manager` command line
//! - [`logging`] - `LOG_LEVEL` handling and tracing setup
//! - [`utils`] - Atomic writes and platform helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use layer_manager::hooks::before_deploy;
//! use layer_manager::service::ServiceDefinition;
//! use layer_manager::template::CompiledTemplate;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let service = ServiceDefinition::load(Path::new("serverless.yml"))?;
//! let path = Path::new(".serverless/cloudformation-template-update-stack.json");
//!
//! let mut template = CompiledTemplate::load(path)?;
//! let summary = before_deploy(&service, &mut template)?;
//! template.save(path)?;
//!
//! println!(
//!     "exported {} layers, upgraded {} references",
//!     summary.exported_layers.len(),
//!     summary.upgraded_layer_references.len()
//! );
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod config;
pub mod core;
pub mod hooks;
pub mod installer;
pub mod service;
pub mod template;

// Supporting modules
pub mod cli;
pub mod logging;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
