//! Processors turn one resolved bundle into output fragments.
//!
//! Each namespace names its processor by identifier. The identifier is looked
//! up in a [`ProcessorTable`] while the [`NamespaceStore`] is built, and the
//! registered constructor validates the namespace's options right there, so
//! a bad identifier or a bad option fails at configuration-load time rather
//! than halfway through a page.
//!
//! Built-in identifiers:
//! - `script` - [`ScriptProcessor`], one `<script>` tag per asset URL
//! - `stylesheet` - [`StylesheetProcessor`], one `<link>` tag per asset URL
//!
//! Hosts add their own with [`ProcessorTable::register`]:
//!
//! ```rust,no_run
//! use bundlejam::config::{BundleConfig, ProcessorOptions};
//! use bundlejam::processor::{Processor, ProcessorTable};
//!
//! struct Preload;
//!
//! impl Processor for Preload {
//!     fn render(
//!         &self,
//!         bundle_name: &str,
//!         _bundle: &BundleConfig,
//!         _options: &ProcessorOptions,
//!     ) -> anyhow::Result<Vec<String>> {
//!         Ok(vec![format!("<link rel=\"preload\" href=\"{bundle_name}\">")])
//!     }
//! }
//!
//! let mut table = ProcessorTable::default();
//! table.register("preload", |_options, _context| Ok(Box::new(Preload)));
//! ```
//!
//! [`NamespaceStore`]: crate::config::NamespaceStore

pub mod script;
pub mod stylesheet;
pub mod urls;

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{BundleConfig, ProcessorOptions};

pub use script::ScriptProcessor;
pub use stylesheet::StylesheetProcessor;
pub use urls::{AssetUrlResolver, StaticUrls};

/// Identifier of the built-in script processor.
pub const SCRIPT: &str = "script";
/// Identifier of the built-in stylesheet processor.
pub const STYLESHEET: &str = "stylesheet";

/// Strategy that renders one bundle of a namespace.
///
/// Implementations are shared read-only between registries, so they must not
/// keep mutable state.
pub trait Processor: Send + Sync {
    /// Render `bundle_name` to zero or more fragments.
    ///
    /// `options` are the namespace's processor options as configured; per-bundle
    /// overrides live in `bundle.extra_context`.
    fn render(
        &self,
        bundle_name: &str,
        bundle: &BundleConfig,
        options: &ProcessorOptions,
    ) -> Result<Vec<String>>;
}

/// What every processor constructor receives besides its options.
#[derive(Clone)]
pub struct ProcessorContext {
    /// Static path to served URL lookup.
    pub urls: Arc<dyn AssetUrlResolver>,
    /// Emit one fragment per source file instead of one per bundle.
    pub expand_sources: bool,
}

impl ProcessorContext {
    /// Context with the given URL resolver and bundled output.
    pub fn new(urls: Arc<dyn AssetUrlResolver>) -> Self {
        Self {
            urls,
            expand_sources: false,
        }
    }

    /// Set whether source files are emitted individually.
    #[must_use]
    pub fn with_expand_sources(mut self, expand_sources: bool) -> Self {
        self.expand_sources = expand_sources;
        self
    }

    /// Served URLs for a bundle, in emission order.
    ///
    /// One URL for the bundle's output, or one per source file when sources
    /// are expanded. A bundle without source files falls back to its output.
    pub fn asset_urls(&self, bundle: &BundleConfig) -> Result<Vec<String>> {
        if self.expand_sources && !bundle.source_files.is_empty() {
            bundle.source_files.iter().map(|path| self.urls.url(path)).collect()
        } else {
            Ok(vec![self.urls.url(&bundle.output_filename)?])
        }
    }
}

impl std::fmt::Debug for ProcessorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorContext")
            .field("expand_sources", &self.expand_sources)
            .finish_non_exhaustive()
    }
}

/// Constructor registered under a processor identifier.
pub type ProcessorFactory = Box<
    dyn Fn(&ProcessorOptions, &ProcessorContext) -> Result<Box<dyn Processor>> + Send + Sync,
>;

/// Identifier to constructor mapping used when a namespace store is built.
pub struct ProcessorTable {
    factories: BTreeMap<String, ProcessorFactory>,
}

impl ProcessorTable {
    /// A table with no identifiers registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register `factory` under `identifier`, replacing any previous entry.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&ProcessorOptions, &ProcessorContext) -> Result<Box<dyn Processor>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(identifier.into(), Box::new(factory));
        self
    }

    /// Construct the processor registered as `identifier`.
    ///
    /// Returns `None` when nothing is registered under that identifier.
    pub fn construct(
        &self,
        identifier: &str,
        options: &ProcessorOptions,
        context: &ProcessorContext,
    ) -> Option<Result<Box<dyn Processor>>> {
        self.factories.get(identifier).map(|factory| factory(options, context))
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl Default for ProcessorTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(SCRIPT, |options, context| {
            Ok(Box::new(ScriptProcessor::new(options, context.clone())?))
        });
        table.register(STYLESHEET, |options, context| {
            Ok(Box::new(StylesheetProcessor::new(options, context.clone())?))
        });
        table
    }
}

/// Escape a value for use inside a double-quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
