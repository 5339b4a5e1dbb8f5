//! Asset configuration: the TOML document shape, the file parser, and the
//! validated [`NamespaceStore`] built from them.
//!
//! Loading is a two-step affair. [`AssetsConfig`] is a faithful,
//! unvalidated deserialization of the file; [`NamespaceStore`] checks it,
//! constructs each namespace's processor, and is the only thing a
//! registry reads from.
//!
//! ```rust,no_run
//! use bundlejam::config::NamespaceStore;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = Arc::new(NamespaceStore::load(Path::new("bundles.toml"))?);
//! for namespace in store.namespaces() {
//!     println!("{namespace}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod namespace;
pub mod parser;
pub mod store;

pub use namespace::{
    AssetsConfig, BundleConfig, DEFAULT_STATIC_URL, DependencySpec, NamespaceConfig,
    ProcessorOptions, StaticConfig,
};
pub use parser::parse_config;
pub use store::NamespaceStore;
