//! Error handling for bundlejam
//!
//! Every failure the registry can report is a configuration or programmer
//! fault, discovered either while the namespace store is built, while a
//! reference is resolved, or while a namespace is ordered for rendering.
//! None of them are recoverable at the point of origin: they propagate to
//! the caller of [`add_reference`] / [`render`] and fail the render cycle.
//!
//! # Architecture
//!
//! - [`BundlejamError`] - strongly-typed error variants
//! - [`ErrorKind`] - the coarse category of a variant (configuration,
//!   resolution, cycle, processor)
//! - [`ErrorContext`] - wrapper adding details and a suggestion for display
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] into an
//! [`ErrorContext`] for terminal output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bundlejam::core::{BundlejamError, ErrorKind, user_friendly_error};
//!
//! let error = BundlejamError::UnknownNamespace {
//!     namespace: "fonts".to_string(),
//! };
//! assert_eq!(error.kind(), ErrorKind::Configuration);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```
//!
//! [`add_reference`]: crate::registry::AssetRegistry::add_reference
//! [`render`]: crate::registry::AssetRegistry::render

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use super::BundleRef;

/// Result alias for core registry operations.
pub type Result<T, E = BundlejamError> = std::result::Result<T, E>;

/// Coarse classification of a [`BundlejamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed namespace, processor, or bundle configuration.
    Configuration,
    /// A referenced or depended-upon bundle could not be found.
    Resolution,
    /// A dependency cycle was found while ordering a namespace.
    Cycle,
    /// A processor failed to produce fragments for a bundle.
    Processor,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Resolution => "resolution",
            Self::Cycle => "cycle",
            Self::Processor => "processor",
        };
        f.write_str(name)
    }
}

/// The main error type for registry operations
///
/// # Error Categories
///
/// ## Configuration
/// - [`ConfigError`] - generic configuration fault (bad file, bad shape)
/// - [`NoNamespaces`] - the configuration declares no namespaces at all
/// - [`UnknownNamespace`] - a namespace name that was never configured
/// - [`MissingProcessor`] - namespace without a `processor` identifier
/// - [`UnknownProcessor`] - identifier not present in the processor table
/// - [`ProcessorConstruction`] - processor rejected its options
/// - [`InvalidBundle`] - malformed bundle entry
///
/// ## Resolution
/// - [`BundleNotFound`] - name not configured in any namespace
/// - [`BundleNotInNamespace`] - name not configured in the requested namespace
///
/// ## Cycle
/// - [`CircularDependency`] - same-namespace dependency cycle
///
/// ## Processor
/// - [`ProcessorFailed`] - processor returned an error while rendering
///
/// [`ConfigError`]: BundlejamError::ConfigError
/// [`NoNamespaces`]: BundlejamError::NoNamespaces
/// [`UnknownNamespace`]: BundlejamError::UnknownNamespace
/// [`MissingProcessor`]: BundlejamError::MissingProcessor
/// [`UnknownProcessor`]: BundlejamError::UnknownProcessor
/// [`ProcessorConstruction`]: BundlejamError::ProcessorConstruction
/// [`InvalidBundle`]: BundlejamError::InvalidBundle
/// [`BundleNotFound`]: BundlejamError::BundleNotFound
/// [`BundleNotInNamespace`]: BundlejamError::BundleNotInNamespace
/// [`CircularDependency`]: BundlejamError::CircularDependency
/// [`ProcessorFailed`]: BundlejamError::ProcessorFailed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BundlejamError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// No namespaces configured
    #[error("No asset namespaces are configured")]
    NoNamespaces,

    /// Namespace not configured
    #[error("Namespace '{namespace}' is not configured")]
    UnknownNamespace {
        /// The namespace that was asked for
        namespace: String,
    },

    /// Namespace without a processor identifier
    #[error("Namespace '{namespace}' does not declare a processor")]
    MissingProcessor {
        /// The namespace missing its `processor` key
        namespace: String,
    },

    /// Processor identifier not registered
    #[error("Unknown processor '{processor}' for namespace '{namespace}'")]
    UnknownProcessor {
        /// The namespace declaring the processor
        namespace: String,
        /// The identifier that has no registered constructor
        processor: String,
        /// Identifiers the processor table does know
        registered: Vec<String>,
    },

    /// Processor constructor rejected the namespace options
    #[error("Cannot construct processor '{processor}' for namespace '{namespace}': {reason}")]
    ProcessorConstruction {
        /// The namespace declaring the processor
        namespace: String,
        /// The processor identifier
        processor: String,
        /// Why construction failed
        reason: String,
    },

    /// Malformed bundle entry
    #[error("Invalid bundle '{bundle}' in namespace '{namespace}': {reason}")]
    InvalidBundle {
        /// Namespace holding the bundle
        namespace: String,
        /// Bundle name
        bundle: String,
        /// What is wrong with the entry
        reason: String,
    },

    /// Bundle name not found in any namespace
    #[error("Bundle '{name}' not found in any namespace{}", required_by_suffix(.required_by))]
    BundleNotFound {
        /// The bundle name that was searched for
        name: String,
        /// The bundle whose dependency list named it, if any
        required_by: Option<BundleRef>,
        /// Configured names close to `name`
        suggestions: Vec<String>,
    },

    /// Bundle name not found in the given namespace
    #[error("Bundle '{name}' not found in namespace '{namespace}'{}", required_by_suffix(.required_by))]
    BundleNotInNamespace {
        /// The bundle name
        name: String,
        /// The namespace it was expected in
        namespace: String,
        /// The bundle whose dependency list named it, if any
        required_by: Option<BundleRef>,
    },

    /// Dependency cycle within a namespace
    #[error("Circular dependency detected in namespace '{namespace}': {}", .cycle.join(" → "))]
    CircularDependency {
        /// Namespace containing the cycle
        namespace: String,
        /// Bundle names along the cycle; the first name is repeated at the end
        cycle: Vec<String>,
    },

    /// Processor failed while rendering a bundle
    #[error("Processor for namespace '{namespace}' failed on bundle '{bundle}': {reason}")]
    ProcessorFailed {
        /// Namespace being rendered
        namespace: String,
        /// Bundle being rendered
        bundle: String,
        /// The processor's error message
        reason: String,
    },
}

fn required_by_suffix(required_by: &Option<BundleRef>) -> String {
    match required_by {
        Some(parent) => format!(" (required by {parent})"),
        None => String::new(),
    }
}

impl BundlejamError {
    /// The category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError { .. }
            | Self::NoNamespaces
            | Self::UnknownNamespace { .. }
            | Self::MissingProcessor { .. }
            | Self::UnknownProcessor { .. }
            | Self::ProcessorConstruction { .. }
            | Self::InvalidBundle { .. } => ErrorKind::Configuration,
            Self::BundleNotFound { .. } | Self::BundleNotInNamespace { .. } => {
                ErrorKind::Resolution
            }
            Self::CircularDependency { .. } => ErrorKind::Cycle,
            Self::ProcessorFailed { .. } => ErrorKind::Processor,
        }
    }

    /// Shorthand for a [`BundlejamError::ConfigError`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Error wrapper carrying display hints
///
/// Details explain what the error means; the suggestion says what to change.
/// Both are optional.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BundlejamError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: BundlejamError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow,
    /// suggestion in green.
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

/// Convert any error into an [`ErrorContext`] for display.
///
/// Walks the error chain looking for a [`BundlejamError`] (it may sit below
/// `anyhow` context layers). Anything else becomes a generic
/// [`BundlejamError::ConfigError`] carrying the full chain as its message,
/// since every failure this crate reports originates in configuration.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(bundle_error) = cause.downcast_ref::<BundlejamError>() {
            let ctx = create_error_context(bundle_error.clone());
            // Keep outer context messages (e.g. the config path) visible
            if cause.to_string() != error.to_string() {
                let outer = error.to_string();
                return match ctx.details {
                    Some(details) => ErrorContext {
                        details: Some(format!("{outer}. {details}")),
                        ..ctx
                    },
                    None => ctx.with_details(outer),
                };
            }
            return ctx;
        }
    }

    let message = error.chain().map(ToString::to_string).collect::<Vec<_>>().join(": ");
    ErrorContext::new(BundlejamError::config(message))
}

fn create_error_context(error: BundlejamError) -> ErrorContext {
    match &error {
        BundlejamError::NoNamespaces => ErrorContext::new(error)
            .with_suggestion("Add at least one [namespaces.<name>] table with a processor")
            .with_details("Every bundle belongs to a namespace; an empty configuration cannot render anything"),

        BundlejamError::UnknownNamespace { .. } => ErrorContext::new(error)
            .with_suggestion("Check the namespace name against the [namespaces.*] tables in your configuration"),

        BundlejamError::MissingProcessor { namespace } => {
            let suggestion = format!(
                "Add processor = \"script\" or processor = \"stylesheet\" under [namespaces.{namespace}]"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        BundlejamError::UnknownProcessor { registered, .. } => {
            let suggestion = if registered.is_empty() {
                "Register the identifier in the ProcessorTable".to_string()
            } else {
                format!("Use one of the registered processors: {}", registered.join(", "))
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("Processor identifiers are resolved when the configuration is loaded")
        }

        BundlejamError::BundleNotFound { suggestions, .. } => {
            let ctx = ErrorContext::new(error.clone())
                .with_details("Bare bundle names are searched across every configured namespace");
            if suggestions.is_empty() {
                ctx.with_suggestion("Define the bundle under [namespaces.<name>.bundles] or fix the reference")
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }

        BundlejamError::BundleNotInNamespace { .. } => ErrorContext::new(error)
            .with_suggestion("Reference the bundle by its bare name to search all namespaces, or fix the namespace")
            .with_details("Explicit (name, namespace) references are only looked up in that namespace"),

        BundlejamError::CircularDependency { .. } => ErrorContext::new(error)
            .with_suggestion("Remove one of the deps entries along the cycle")
            .with_details("Bundles in one namespace must form a directed acyclic graph to be ordered"),

        BundlejamError::ProcessorFailed { .. } => ErrorContext::new(error)
            .with_details("The namespace's processor rejected the bundle entry while rendering"),

        BundlejamError::ConfigError { .. }
        | BundlejamError::ProcessorConstruction { .. }
        | BundlejamError::InvalidBundle { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the configuration file and try again"),
    }
}
