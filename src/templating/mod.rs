//! Page templates that declare and emit their own assets.
//!
//! Templates are plain [Tera](https://keats.github.io/tera/) templates with two
//! extra functions:
//!
//! - `{{ asset_ref(name="angular-resource") }}` or
//!   `{{ asset_ref(name="angular", namespace="js") }}` declares a bundle and
//!   renders as nothing
//! - `{{ assets(namespace="js") }}` renders the namespace's fragments
//!
//! # Ordering
//!
//! A page renders in two passes. The first pass evaluates the whole template,
//! inheritance included; `asset_ref` only records the reference and `assets`
//! only leaves a placeholder. The second pass applies the recorded references
//! to the [`AssetRegistry`] in document order and then fills every
//! placeholder. An `assets` call in a base template's `<head>` therefore sees
//! the references made by a child's `{% block content %}`, even though the
//! block is evaluated later.
//!
//! Tera ignores whatever a child template places outside its blocks, so an
//! `asset_ref` there is never recorded.
//!
//! ```rust,no_run
//! use bundlejam::config::NamespaceStore;
//! use bundlejam::registry::AssetRegistry;
//! use bundlejam::templating::PageRenderer;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = Arc::new(NamespaceStore::load(Path::new("bundles.toml"))?);
//! let renderer = PageRenderer::from_glob("templates/**/*.html")?;
//!
//! // One registry per page
//! let mut registry = AssetRegistry::new(Arc::clone(&store));
//! let html = renderer.render("index.html", &tera::Context::new(), &mut registry)?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```

pub mod functions;

use anyhow::{Context as _, Result, anyhow};
use regex::{Captures, Regex};
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::registry::AssetRegistry;
use functions::{PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX, SharedCollector};

/// Separator between fragments filling one `assets()` placeholder.
const FRAGMENT_SEPARATOR: &str = "\n";

/// Renders pages and the assets they reference.
#[derive(Debug, Clone, Default)]
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// A renderer with no named templates; use [`render_str`](Self::render_str)
    /// or add templates with [`add_raw_template`](Self::add_raw_template).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every template matching `glob`, e.g. `templates/**/*.html`.
    pub fn from_glob(glob: &str) -> Result<Self> {
        let tera = Tera::new(glob).map_err(|e| {
            anyhow!("Failed to load templates from '{}': {}", glob, format_tera_error(&e))
        })?;
        tracing::debug!("Loaded {} template(s) from '{}'", tera.get_template_names().count(), glob);
        Ok(Self {
            tera,
        })
    }

    /// Add or replace a named template.
    pub fn add_raw_template(&mut self, name: &str, content: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| anyhow!("Failed to parse template '{}': {}", name, format_tera_error(&e)))
    }

    /// Names of the loaded templates, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Render the named template against `registry`.
    ///
    /// References made by the page are added to `registry`, which keeps them
    /// afterwards; pass a fresh registry per page.
    pub fn render(
        &self,
        template: &str,
        context: &Context,
        registry: &mut AssetRegistry,
    ) -> Result<String> {
        let (tera, collector) = self.instance();
        let rendered = tera.render(template, context).map_err(|e| {
            anyhow!("Failed to render template '{}': {}", template, format_tera_error(&e))
        })?;
        Self::fill_assets(rendered, &collector, registry)
            .with_context(|| format!("Failed to render assets for template '{template}'"))
    }

    /// Render template text that is not registered under a name.
    ///
    /// The text may still `extends` or `include` loaded templates.
    pub fn render_str(
        &self,
        content: &str,
        context: &Context,
        registry: &mut AssetRegistry,
    ) -> Result<String> {
        let (mut tera, collector) = self.instance();
        let rendered = tera
            .render_str(content, context)
            .map_err(|e| anyhow!("Failed to render template: {}", format_tera_error(&e)))?;
        Self::fill_assets(rendered, &collector, registry)
    }

    /// Fresh Tera instance with functions bound to a new collector.
    fn instance(&self) -> (Tera, SharedCollector) {
        let collector = SharedCollector::default();
        let mut tera = self.tera.clone();
        tera.register_function(
            "asset_ref",
            functions::create_asset_ref_function(collector.clone()),
        );
        tera.register_function("assets", functions::create_assets_function(collector.clone()));
        (tera, collector)
    }

    /// Second pass: apply references, then replace placeholders.
    fn fill_assets(
        rendered: String,
        collector: &SharedCollector,
        registry: &mut AssetRegistry,
    ) -> Result<String> {
        let collected = std::mem::take(
            &mut *collector.lock().map_err(|_| anyhow!("asset collector lock poisoned"))?,
        );
        tracing::debug!(
            "Page recorded {} reference(s) and {} render point(s)",
            collected.references.len(),
            collected.placeholders.len()
        );

        for reference in &collected.references {
            let (name, namespace) = match reference.namespace.as_deref() {
                Some(namespace) => (reference.name.as_str(), Some(namespace)),
                None => registry.store().parse_reference(&reference.name),
            };
            registry
                .add_reference(name, namespace)
                .with_context(|| match &reference.namespace {
                    Some(namespace) => {
                        format!("Failed to resolve asset reference '{}:{}'", namespace, reference.name)
                    }
                    None => format!("Failed to resolve asset reference '{}'", reference.name),
                })?;
        }

        if collected.placeholders.is_empty() {
            return Ok(rendered);
        }

        let mut by_namespace: HashMap<&str, String> = HashMap::new();
        for namespace in &collected.placeholders {
            if !by_namespace.contains_key(namespace.as_str()) {
                let fragments = registry
                    .render(namespace)
                    .with_context(|| format!("Failed to render namespace '{namespace}'"))?;
                by_namespace.insert(namespace, fragments.join(FRAGMENT_SEPARATOR));
            }
        }

        let pattern = Regex::new(&format!(
            "{}{}_(\\d+){}",
            regex::escape(PLACEHOLDER_PREFIX),
            regex::escape(&collected.nonce),
            regex::escape(PLACEHOLDER_SUFFIX)
        ))?;
        let output = pattern.replace_all(&rendered, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| collected.placeholders.get(index))
                .and_then(|namespace| by_namespace.get(namespace.as_str()))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(output.into_owned())
    }
}

/// Flatten a Tera error chain into one readable message.
///
/// Tera nests the useful part ("Variable `x` not found") a few sources deep;
/// internal one-off template names are stripped.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }

    let cleaned: Vec<String> = messages
        .into_iter()
        .map(|msg| {
            msg.replace("Failed to render '__tera_one_off'", "")
                .replace("Failed to parse '__tera_one_off'", "")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if cleaned.is_empty() {
        "Template syntax error".to_string()
    } else {
        cleaned.join("\n  → ")
    }
}
