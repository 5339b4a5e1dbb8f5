//! Integration test suite for bundlejam
//!
//! End-to-end tests through the public API and the binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **registry**: Reference resolution and rendering against shared fixtures
//! - **templating**: Page templates, inheritance and render points
//! - **cli**: The `bundlejam` binary

mod cli;
mod registry;
mod templating;
