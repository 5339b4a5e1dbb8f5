//! Tera functions recording asset usage during the first rendering pass.
//!
//! Neither function touches a registry. `asset_ref` appends to the page's
//! reference list and renders as nothing; `assets` reserves a numbered
//! placeholder that the second pass swaps for the namespace's fragments.
//! Placeholders embed a random per-page nonce; only `assets` output matches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Prefix of the placeholder emitted by `assets()`.
pub(crate) const PLACEHOLDER_PREFIX: &str = "__BUNDLEJAM_ASSETS_";
/// Suffix of the placeholder emitted by `assets()`.
pub(crate) const PLACEHOLDER_SUFFIX: &str = "__";

/// A bundle reference as written in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReference {
    /// Bundle name.
    pub name: String,
    /// Namespace, when the template named one.
    pub namespace: Option<String>,
}

/// What one page's first pass recorded, in document order.
#[derive(Debug)]
pub struct PageCollector {
    /// Random token embedded in this page's placeholders.
    pub nonce: String,
    /// `asset_ref` calls.
    pub references: Vec<PageReference>,
    /// Namespace of each `assets` call; the index is the placeholder number.
    pub placeholders: Vec<String>,
}

impl PageCollector {
    /// An empty collector with a fresh nonce.
    pub fn new() -> Self {
        Self {
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            references: Vec::new(),
            placeholders: Vec::new(),
        }
    }

    /// Placeholder text for the `index`-th `assets` call.
    pub fn placeholder(&self, index: usize) -> String {
        format!("{PLACEHOLDER_PREFIX}{}_{index}{PLACEHOLDER_SUFFIX}", self.nonce)
    }
}

impl Default for PageCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle the registered closures write through.
pub type SharedCollector = Arc<Mutex<PageCollector>>;

fn string_arg<'a>(
    function: &str,
    args: &'a HashMap<String, tera::Value>,
    key: &str,
) -> tera::Result<Option<&'a str>> {
    match args.get(key) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or_else(|| {
            tera::Error::msg(format!("{function}(): argument `{key}` must be a string, got {value}"))
        }),
    }
}

fn lock(collector: &SharedCollector) -> tera::Result<std::sync::MutexGuard<'_, PageCollector>> {
    collector.lock().map_err(|_| tera::Error::msg("asset collector lock poisoned"))
}

/// `asset_ref(name="angular", namespace="js")`
///
/// `namespace` is optional. Without it, `name="js:angular"` is read as
/// shorthand when `js` is a configured namespace; otherwise the whole string
/// is the bundle name, so `name="vendor:jquery"` still finds a bundle called
/// `vendor:jquery`. The split happens in the second pass, against the
/// registry's configuration.
pub fn create_asset_ref_function(collector: SharedCollector) -> impl tera::Function + 'static {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let name = string_arg("asset_ref", args, "name")?
            .ok_or_else(|| tera::Error::msg("asset_ref() requires a `name` argument"))?;

        let reference = PageReference {
            name: name.to_string(),
            namespace: string_arg("asset_ref", args, "namespace")?.map(str::to_string),
        };

        if reference.name.is_empty() {
            return Err(tera::Error::msg("asset_ref(): bundle name must not be empty"));
        }

        tracing::trace!("Template referenced {:?}", reference);
        lock(&collector)?.references.push(reference);
        Ok(tera::Value::String(String::new()))
    }
}

/// `assets(namespace="js")`
pub fn create_assets_function(collector: SharedCollector) -> impl tera::Function + 'static {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let namespace = string_arg("assets", args, "namespace")?
            .ok_or_else(|| tera::Error::msg("assets() requires a `namespace` argument"))?;

        let mut collector = lock(&collector)?;
        let index = collector.placeholders.len();
        collector.placeholders.push(namespace.to_string());
        Ok(tera::Value::String(collector.placeholder(index)))
    }
}
