//! Core types for bundlejam
//!
//! This module holds the vocabulary shared by every other module: the
//! [`BundleRef`] identity pair and the error types.
//!
//! ## `error` - Error Handling
//!
//! - [`BundlejamError`] - enumerated failure modes
//! - [`ErrorKind`] - configuration / resolution / cycle / processor category
//! - [`ErrorContext`] - display wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any error for terminal output
//!
//! ## `bundle_ref` - Bundle Identity
//!
//! - [`BundleRef`] - `(name, namespace)` pair used as graph node and edge

pub mod bundle_ref;
pub mod error;

pub use bundle_ref::BundleRef;
pub use error::{BundlejamError, ErrorContext, ErrorKind, Result, user_friendly_error};
