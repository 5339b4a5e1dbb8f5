//! Per-render-cycle asset registry.
//!
//! An [`AssetRegistry`] accumulates the bundles a page references and renders
//! each namespace in dependency order. Create one per render cycle (one page
//! request); the [`NamespaceStore`] it reads from can be shared by any number
//! of registries.
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
//! registry.add_reference("angular-resource", Some("js"))?;
//! registry.add_reference("style1", None)?;
//!
//! for fragment in registry.render("js")? {
//!     println!("{fragment}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # State
//!
//! For every namespace the registry keeps a table of resolved bundle names,
//! each mapped to its dependency edges within that namespace. A name is a
//! key only once it and all of its transitive dependencies are resolved.
//! The table only grows; [`render`](AssetRegistry::render) reads it without
//! modifying it, so rendering twice gives the same fragments.
//!
//! Dependencies on bundles of another namespace are resolved into that
//! namespace's table but are not recorded as edges: each namespace renders
//! as an independent stream and no ordering is enforced across streams.

pub mod dependency_graph;
pub mod resolver;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::NamespaceStore;
use crate::core::{BundleRef, BundlejamError, Result};

pub use dependency_graph::DependencyGraph;
pub use resolver::BundleTable;

use resolver::AssetTable;

/// Dependency registry for one render cycle.
#[derive(Debug)]
pub struct AssetRegistry {
    store: Arc<NamespaceStore>,
    assets: AssetTable,
}

impl AssetRegistry {
    /// Create an empty registry over `store`.
    pub fn new(store: Arc<NamespaceStore>) -> Self {
        let assets = store.namespaces().map(|namespace| (namespace.to_string(), BTreeMap::new())).collect();
        Self {
            store,
            assets,
        }
    }

    /// The configuration this registry resolves against.
    pub fn store(&self) -> &NamespaceStore {
        &self.store
    }

    /// Declare that `bundle_name` is needed on the page.
    ///
    /// With a namespace, the bundle is resolved in that namespace only. Without
    /// one, every namespace defining the name is resolved. Resolution pulls in
    /// all transitive dependencies; bundles resolved earlier are not
    /// re-resolved, so repeated calls are cheap and idempotent.
    ///
    /// # Errors
    ///
    /// - [`BundlejamError::UnknownNamespace`] if `namespace` is not configured
    /// - [`BundlejamError::BundleNotFound`] if a bare name (the reference
    ///   itself or a dependency) is not defined in any namespace
    /// - [`BundlejamError::BundleNotInNamespace`] if the bundle, or an explicit
    ///   `(name, namespace)` dependency, is missing from its namespace
    ///
    /// On error the registry is left unchanged.
    pub fn add_reference(&mut self, bundle_name: &str, namespace: Option<&str>) -> Result<()> {
        let roots = match namespace {
            Some(namespace) => {
                if !self.store.has_namespace(namespace) {
                    return Err(BundlejamError::UnknownNamespace {
                        namespace: namespace.to_string(),
                    });
                }
                if self.is_resolved(namespace, bundle_name) {
                    tracing::trace!("{}:{} already resolved", namespace, bundle_name);
                    return Ok(());
                }
                if self.store.lookup(namespace, bundle_name).is_none() {
                    return Err(BundlejamError::BundleNotInNamespace {
                        name: bundle_name.to_string(),
                        namespace: namespace.to_string(),
                        required_by: None,
                    });
                }
                vec![BundleRef::new(bundle_name, namespace)]
            }
            None => {
                let found = self.store.find_bundle(bundle_name);
                if found.is_empty() {
                    return Err(BundlejamError::BundleNotFound {
                        name: bundle_name.to_string(),
                        required_by: None,
                        suggestions: self.store.suggest(bundle_name),
                    });
                }
                found
            }
        };

        let discovered = resolver::resolve(&self.store, &self.assets, roots)?;
        if !discovered.is_empty() {
            tracing::debug!(
                "Reference to '{}' resolved {} new bundle(s)",
                bundle_name,
                discovered.len()
            );
        }

        for (bundle, edges) in discovered {
            self.assets.entry(bundle.namespace).or_default().insert(bundle.name, edges);
        }
        Ok(())
    }

    /// Resolved bundles of `namespace`, or `None` if it is not configured.
    pub fn assets(&self, namespace: &str) -> Option<&BundleTable> {
        self.assets.get(namespace)
    }

    /// Stored same-namespace dependency edges of a resolved bundle.
    pub fn dependencies(&self, namespace: &str, bundle_name: &str) -> Option<&BTreeSet<BundleRef>> {
        self.assets.get(namespace).and_then(|table| table.get(bundle_name))
    }

    /// Whether `bundle_name` has been resolved in `namespace`.
    pub fn is_resolved(&self, namespace: &str, bundle_name: &str) -> bool {
        resolver::is_resolved(&self.assets, &BundleRef::new(bundle_name, namespace))
    }

    /// Whether nothing has been referenced yet.
    pub fn is_empty(&self) -> bool {
        self.assets.values().all(BTreeMap::is_empty)
    }

    /// Dependency graph of the bundles resolved so far in `namespace`.
    pub fn graph(&self, namespace: &str) -> Result<DependencyGraph> {
        let table = self.table(namespace)?;
        Ok(DependencyGraph::from_assets(namespace, table))
    }

    /// Bundle names of `namespace` in emission order.
    ///
    /// Every bundle comes after all bundles it depends on; bundles without
    /// an ordering constraint between them come out in name order.
    ///
    /// # Errors
    ///
    /// [`BundlejamError::UnknownNamespace`] or, if the resolved bundles
    /// contain a dependency cycle, [`BundlejamError::CircularDependency`].
    pub fn order(&self, namespace: &str) -> Result<Vec<String>> {
        self.graph(namespace)?.topological_order()
    }

    /// Render `namespace`: run its processor over every resolved bundle in
    /// emission order and concatenate the fragments.
    ///
    /// # Errors
    ///
    /// Everything [`order`](Self::order) reports, plus
    /// [`BundlejamError::ProcessorFailed`] if the processor rejects a bundle.
    pub fn render(&self, namespace: &str) -> Result<Vec<String>> {
        let order = self.order(namespace)?;
        let processor = self.store.processor_for(namespace)?;
        let options = self.store.processor_options(namespace)?;

        let mut fragments = Vec::with_capacity(order.len());
        for bundle_name in &order {
            let bundle = self.store.lookup(namespace, bundle_name).ok_or_else(|| {
                BundlejamError::BundleNotInNamespace {
                    name: bundle_name.clone(),
                    namespace: namespace.to_string(),
                    required_by: None,
                }
            })?;

            let rendered = processor.render(bundle_name, bundle, options).map_err(|e| {
                BundlejamError::ProcessorFailed {
                    namespace: namespace.to_string(),
                    bundle: bundle_name.clone(),
                    reason: format!("{e:#}"),
                }
            })?;
            fragments.extend(rendered);
        }

        tracing::info!(
            "Rendered namespace '{}': {} bundle(s), {} fragment(s)",
            namespace,
            order.len(),
            fragments.len()
        );
        Ok(fragments)
    }

    fn table(&self, namespace: &str) -> Result<&BundleTable> {
        self.assets.get(namespace).ok_or_else(|| BundlejamError::UnknownNamespace {
            namespace: namespace.to_string(),
        })
    }
}
