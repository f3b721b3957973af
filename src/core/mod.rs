//! Core types shared by the installer and the transformer.
//!
//! - [`LayerManagerError`] and [`ErrorContext`] for typed, user-facing errors
//! - [`naming`] for the layer naming convention imposed by the host compiler

pub mod error;
pub mod naming;

pub use error::{ErrorContext, LayerManagerError, user_friendly_error};
pub use naming::{LayerNames, pascal_case};
