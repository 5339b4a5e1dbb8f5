//! bundlejam - asset bundle dependency registry and renderer
//!
//! Static asset bundles (scripts, stylesheets, client-side templates) are
//! declared in namespaces. A page references the bundles it needs; bundlejam
//! pulls in their dependencies and emits each namespace's markup exactly once
//! per bundle, every bundle after the bundles it depends on.
//!
//! # Architecture Overview
//!
//! - A [`config::NamespaceStore`] is built once from `bundles.toml` and shared
//!   read-only
//! - An [`registry::AssetRegistry`] is created per page render; references
//!   grow its dependency graph, rendering flattens it per namespace
//! - A [`processor::Processor`] per namespace turns each bundle into
//!   fragments (`<script>` and `<link>` tags for the built-ins)
//! - [`templating::PageRenderer`] lets Tera templates declare and emit assets
//!
//! # Core Modules
//!
//! - [`config`] - Configuration file shape, parsing and validated store
//! - [`core`] - Bundle identity and error handling
//! - [`registry`] - Reference resolution and topological rendering
//! - [`processor`] - Processor trait, registration table and built-ins
//! - [`templating`] - Two-pass Tera page rendering
//! - [`cli`] - Command-line interface
//!
//! # Configuration Format (bundles.toml)
//!
//! ```toml
//! [static]
//! url = "/static/"
//!
//! [namespaces.js]
//! processor = "script"
//!
//! [namespaces.js.bundles.angular]
//! source_files = ["js/angular.js"]
//! output_filename = "js/angular.bundle.js"
//!
//! [namespaces.js.bundles.angular-resource]
//! source_files = ["js/angular-resource.js"]
//! output_filename = "js/angular-resource.bundle.js"
//! deps = ["angular"]
//!
//! [namespaces.css]
//! processor = "stylesheet"
//! media = "screen"
//!
//! [namespaces.css.bundles.style1]
//! output_filename = "css/style1.bundle.css"
//!
//! [namespaces.ng]
//! processor = "script"
//! type = "text/ng-template"
//! id = "{url}"
//!
//! [namespaces.ng.bundles.template1]
//! output_filename = "ng/template1.bundle.html"
//! # Explicit (name, namespace) pairs skip the namespace search
//! deps = [["angular", "js"]]
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use bundlejam::config::NamespaceStore;
//! use bundlejam::registry::AssetRegistry;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = Arc::new(NamespaceStore::load(Path::new("bundles.toml"))?);
//!
//! let mut registry = AssetRegistry::new(Arc::clone(&store));
//! registry.add_reference("angular-resource", None)?;
//! registry.add_reference("style1", Some("css"))?;
//!
//! let head: Vec<String> = ["css", "js"]
//!     .into_iter()
//!     .map(|namespace| registry.render(namespace))
//!     .collect::<Result<Vec<_>, _>>()?
//!     .concat();
//! println!("{}", head.join("\n"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processor;
pub mod registry;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
