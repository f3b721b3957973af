//! Error handling for layer-manager
//!
//! This module provides the error types and user-facing error reporting for the
//! layer manager. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can match on precise failure modes
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`LayerManagerError`] - Enumerated error types for every failure case
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display
//!
//! # Error Categories
//!
//! - **Installation**: [`LayerManagerError::InstallerFailed`], [`LayerManagerError::PackagerNotFound`]
//! - **Service definition**: [`LayerManagerError::ServiceDefinitionNotFound`],
//!   [`LayerManagerError::ServiceDefinitionParseError`], [`LayerManagerError::ConfigError`]
//! - **Compiled template**: [`LayerManagerError::TemplateNotFound`],
//!   [`LayerManagerError::TemplateParseError`], [`LayerManagerError::InvalidTemplate`]
//! - **Lifecycle**: [`LayerManagerError::UnknownHook`]
//!
//! A declared layer without a compiled output is deliberately *not* an error: the
//! transformer skips it and logs a warning.
//!
//! # Examples
//!
//! ```rust,no_run
//! use layer_manager::core::{LayerManagerError, user_friendly_error};
//!
//! let error = LayerManagerError::PackagerNotFound {
//!     packager: "yarn".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with an install suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for layer-manager operations.
///
/// Every variant carries the context needed to render a helpful message: the
/// file that failed to parse, the layer directory where an install failed, and
/// so on. Parser and I/O errors are mapped into the variant naming the file
/// involved rather than converted wholesale.
#[derive(Error, Debug)]
pub enum LayerManagerError {
    /// The package manager exited with a non-zero status.
    ///
    /// Dependency installation failures are fatal: packaging stops at the first
    /// failing layer and nothing is retried.
    #[error("{packager} install failed in {path} (exit code: {code})")]
    InstallerFailed {
        /// Package manager that was invoked (`npm` or `yarn`)
        packager: String,
        /// Directory the installer ran in
        path: String,
        /// Exit code, or `signal` when the process was killed
        code: String,
    },

    /// The package manager was still running when its timeout expired.
    ///
    /// The child process is killed before this error is returned.
    #[error("{packager} install in {path} timed out after {seconds}s")]
    InstallerTimedOut {
        /// Package manager that was invoked
        packager: String,
        /// Directory the installer ran in
        path: String,
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// The package manager executable could not be located in `PATH`.
    #[error("Package manager '{packager}' is not installed or not found in PATH")]
    PackagerNotFound {
        /// Name of the missing executable
        packager: String,
    },

    /// The service definition file does not exist.
    #[error("Service definition not found: {path}")]
    ServiceDefinitionNotFound {
        /// Path that was searched
        path: String,
    },

    /// The service definition could not be parsed.
    #[error("Invalid service definition syntax in {file}")]
    ServiceDefinitionParseError {
        /// Path to the service definition
        file: String,
        /// Parser message
        reason: String,
    },

    /// The compiled template file does not exist.
    #[error("Compiled template not found: {path}")]
    TemplateNotFound {
        /// Path that was searched
        path: String,
    },

    /// The compiled template is not valid JSON.
    #[error("Invalid compiled template syntax in {file}")]
    TemplateParseError {
        /// Path to the template
        file: String,
        /// Parser message
        reason: String,
    },

    /// The compiled template is valid JSON but not a template document.
    #[error("Invalid compiled template: {reason}")]
    InvalidTemplate {
        /// What is wrong with the document
        reason: String,
    },

    /// A lifecycle hook name that this tool does not handle.
    #[error("Unknown lifecycle hook '{name}'")]
    UnknownHook {
        /// The rejected hook name
        name: String,
    },

    /// The `custom.layerConfig` section has values of the wrong type.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper carrying a suggestion and details for CLI display.
///
/// ```rust,no_run
/// use layer_manager::core::{ErrorContext, LayerManagerError};
///
/// let ctx = ErrorContext::new(LayerManagerError::TemplateNotFound {
///     path: ".serverless/cloudformation-template-update-stack.json".to_string(),
/// })
/// .with_suggestion("Run the host packaging step first");
///
/// let message = format!("{ctx}");
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: LayerManagerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: LayerManagerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`LayerManagerError`] (directly or as the root cause of a context
/// chain) and [`std::io::Error`]; anything else is shown with its full chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ErrorContext>() {
        Ok(ctx) => return ctx,
        Err(error) => error,
    };

    let chain = format!("{error:#}");
    let has_context = error.chain().nth(1).is_some();

    let error = match error.downcast::<LayerManagerError>() {
        Ok(lm_error) => {
            let ctx = create_error_context(lm_error);
            // Keep the outer context messages so the failing step stays visible.
            return if has_context {
                ctx.with_details(chain)
            } else {
                ctx
            };
        }
        Err(error) => error,
    };

    if let Some(io_error) = error.root_cause().downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LayerManagerError::Other {
                    message: chain,
                })
                .with_suggestion("Check the ownership and permissions of the layer directories and template file");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LayerManagerError::Other {
                    message: chain,
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    ErrorContext::new(LayerManagerError::Other {
        message: chain,
    })
}

fn create_error_context(error: LayerManagerError) -> ErrorContext {
    match &error {
        LayerManagerError::InstallerFailed {
            packager,
            path,
            ..
        } => {
            let suggestion = format!(
                "Run '{packager} install' manually in {path} to see the full failure output"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Dependency installation failures stop packaging so a broken layer is never deployed")
        }
        LayerManagerError::InstallerTimedOut {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check for a stalled registry or an interactive prompt, or raise --timeout",
        ),
        LayerManagerError::PackagerNotFound {
            packager,
        } => {
            let suggestion = match packager.as_str() {
                "yarn" => "Install yarn (e.g. 'npm install --global yarn') or set custom.layerConfig.packager to npm",
                _ => "Install Node.js and npm from https://nodejs.org/ or your system package manager",
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        LayerManagerError::ServiceDefinitionNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run from the service directory or pass --service <path>"),
        LayerManagerError::ServiceDefinitionParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the YAML/JSON syntax of the service definition")
                .with_details(details)
        }
        LayerManagerError::TemplateNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run the host packaging step first or pass --template <path>"),
        LayerManagerError::TemplateParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Regenerate the template with the host packaging step")
                .with_details(details)
        }
        LayerManagerError::InvalidTemplate {
            ..
        } => ErrorContext::new(error)
            .with_details("A compiled template must be a JSON object with Resources and Outputs mappings"),
        LayerManagerError::UnknownHook {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Supported hooks: package:initialize, before:deploy:deploy"),
        LayerManagerError::ConfigError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check custom.layerConfig: installLayers, exportLayers and upgradeLayerReferences are booleans, exportPrefix is a string, packager is npm or yarn",
        ),
        _ => ErrorContext::new(error),
    }
}
