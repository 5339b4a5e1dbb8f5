//! Configuration shapes for namespaces and bundles.
//!
//! These types mirror the TOML layout one-to-one and carry no validation of
//! their own; [`NamespaceStore`](super::NamespaceStore) validates them when it
//! is built.
//!
//! ```toml
//! [static]
//! url = "/static/"
//!
//! [namespaces.js]
//! processor = "script"
//!
//! [namespaces.js.bundles.angular-resource]
//! source_files = ["js/angular-resource.js"]
//! output_filename = "js/angular-resource.bundle.js"
//! deps = ["angular", ["template1", "ng"]]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::parser::parse_config;

/// Default base URL for served assets.
pub const DEFAULT_STATIC_URL: &str = "/static/";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Settings for the asset-URL collaborator.
    #[serde(default, rename = "static")]
    pub static_files: StaticConfig,

    /// Namespace name to namespace configuration.
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceConfig>,
}

impl AssetsConfig {
    /// Create an empty configuration with default static settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse asset configuration")
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config(path)
    }

    /// Add or replace a namespace.
    #[must_use]
    pub fn with_namespace(mut self, name: impl Into<String>, namespace: NamespaceConfig) -> Self {
        self.namespaces.insert(name.into(), namespace);
        self
    }
}

/// Settings handed to the default [`StaticUrls`](crate::processor::urls::StaticUrls)
/// resolver and to every processor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StaticConfig {
    /// Base URL joined with output and source paths.
    #[serde(default = "default_static_url")]
    pub url: String,

    /// Emit one fragment per source file instead of one per bundle output.
    #[serde(default)]
    pub expand_sources: bool,
}

fn default_static_url() -> String {
    DEFAULT_STATIC_URL.to_string()
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            url: default_static_url(),
            expand_sources: false,
        }
    }
}

/// One namespace: its processor, the processor's options, and its bundles.
///
/// Keys other than `processor` and `bundles` are collected into
/// [`options`](Self::options) and passed to the processor untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NamespaceConfig {
    /// Identifier looked up in the [`ProcessorTable`](crate::processor::ProcessorTable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,

    /// Bundle name to bundle definition.
    #[serde(default)]
    pub bundles: BTreeMap<String, BundleConfig>,

    /// Processor-specific options (`type`, `async`, `media`, ...).
    #[serde(flatten)]
    pub options: ProcessorOptions,
}

impl NamespaceConfig {
    /// Create a namespace rendered by the processor registered as `processor`.
    pub fn new(processor: impl Into<String>) -> Self {
        Self {
            processor: Some(processor.into()),
            ..Self::default()
        }
    }

    /// Set a processor option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Add or replace a bundle.
    #[must_use]
    pub fn with_bundle(mut self, name: impl Into<String>, bundle: BundleConfig) -> Self {
        self.bundles.insert(name.into(), bundle);
        self
    }
}

/// Definition of one bundle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Source files compiled into the bundle, in order.
    #[serde(default)]
    pub source_files: Vec<String>,

    /// Path of the compiled artifact, relative to the static root.
    #[serde(default)]
    pub output_filename: String,

    /// Dependency declarations, in declaration order.
    #[serde(default)]
    pub deps: Vec<DependencySpec>,

    /// Per-bundle overrides for the namespace's processor options.
    #[serde(default, skip_serializing_if = "ProcessorOptions::is_empty")]
    pub extra_context: ProcessorOptions,
}

impl BundleConfig {
    /// Create a bundle compiled to `output_filename`.
    pub fn new(output_filename: impl Into<String>) -> Self {
        Self {
            output_filename: output_filename.into(),
            ..Self::default()
        }
    }

    /// Append source files.
    #[must_use]
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_files.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Append a dependency declaration.
    #[must_use]
    pub fn with_dep(mut self, dep: DependencySpec) -> Self {
        self.deps.push(dep);
        self
    }

    /// Set a per-bundle processor option override.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.extra_context.insert(key, value);
        self
    }
}

/// A dependency declaration inside a bundle's `deps` list.
///
/// # Format
///
/// ```toml
/// deps = [
///     "angular",                              # bare: searched in every namespace
///     ["template1", "ng"],                    # explicit pair
///     { name = "reset", namespace = "css" },  # explicit pair, table form
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Bundle name without a namespace; resolved by searching all namespaces.
    Bare(String),
    /// `[name, namespace]` pair.
    Pair(String, String),
    /// `{ name, namespace }` table.
    Qualified {
        /// Bundle name.
        name: String,
        /// Namespace the bundle must be found in.
        namespace: String,
    },
}

impl DependencySpec {
    /// A bare, namespace-ambiguous dependency.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::Bare(name.into())
    }

    /// An explicit `(name, namespace)` dependency.
    pub fn qualified(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::Qualified {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// The bundle name this declaration refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name)
            | Self::Pair(name, _)
            | Self::Qualified {
                name,
                ..
            } => name,
        }
    }

    /// The explicit namespace, if the declaration carries one.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Pair(_, namespace)
            | Self::Qualified {
                namespace,
                ..
            } => Some(namespace),
        }
    }
}

/// Free-form processor options.
///
/// Values keep their TOML types; processors read them through the typed
/// accessors, which reject values of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProcessorOptions(BTreeMap<String, toml::Value>);

impl ProcessorOptions {
    /// Empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    /// String value for `key`; an error if present with another type.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| {
                anyhow::anyhow!("option '{key}' must be a string, found {}", value.type_str())
            }),
        }
    }

    /// Boolean value for `key`; an error if present with another type.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value.as_bool().map(Some).ok_or_else(|| {
                anyhow::anyhow!("option '{key}' must be a boolean, found {}", value.type_str())
            }),
        }
    }

    /// A copy of these options with every key of `overrides` applied on top.
    #[must_use]
    pub fn overlay(&self, overrides: &Self) -> Self {
        let mut merged = self.0.clone();
        merged.extend(overrides.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
