//! Transitive reference resolution.
//!
//! Resolution walks the dependency declarations reachable from a set of root
//! refs with an explicit stack and a visited set keyed by [`BundleRef`]. A ref
//! is expanded at most once per registry: either it is already a key of the
//! registry's table, or it is recorded in the discovered set of the current
//! walk. This bounds the walk by the size of the configured graph and makes
//! diamonds and cycles terminate.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{BundleConfig, NamespaceStore};
use crate::core::{BundleRef, BundlejamError, Result};

/// Resolved bundles of one namespace: bundle name to its same-namespace
/// dependency edges.
pub type BundleTable = BTreeMap<String, BTreeSet<BundleRef>>;

/// Namespace name to [`BundleTable`].
pub(crate) type AssetTable = BTreeMap<String, BundleTable>;

/// Entries discovered by one resolution walk, not yet committed.
pub(crate) type Discovered = BTreeMap<BundleRef, BTreeSet<BundleRef>>;

pub(crate) fn is_resolved(assets: &AssetTable, bundle: &BundleRef) -> bool {
    assets.get(&bundle.namespace).is_some_and(|table| table.contains_key(&bundle.name))
}

/// Expand one dependency declaration list into refs.
///
/// Explicit pairs are kept as-is; bare names become one ref per namespace
/// defining them.
fn expand_deps(
    store: &NamespaceStore,
    parent: &BundleRef,
    bundle: &BundleConfig,
) -> Result<BTreeSet<BundleRef>> {
    let mut deps = BTreeSet::new();
    for spec in &bundle.deps {
        match spec.namespace() {
            Some(namespace) => {
                deps.insert(BundleRef::new(spec.name(), namespace));
            }
            None => {
                let found = store.find_bundle(spec.name());
                if found.is_empty() {
                    return Err(BundlejamError::BundleNotFound {
                        name: spec.name().to_string(),
                        required_by: Some(parent.clone()),
                        suggestions: store.suggest(spec.name()),
                    });
                }
                deps.extend(found);
            }
        }
    }
    Ok(deps)
}

/// Resolve `roots` and everything reachable from them.
///
/// Returns the entries that are new relative to `assets`: for each newly
/// resolved ref, the subset of its dependencies living in its own namespace.
/// Cross-namespace dependencies are walked (so they get their own entries)
/// but never stored as edges. `assets` itself is not touched, so a failed
/// walk leaves the registry exactly as it was.
pub(crate) fn resolve(
    store: &NamespaceStore,
    assets: &AssetTable,
    roots: Vec<BundleRef>,
) -> Result<Discovered> {
    let mut discovered = Discovered::new();
    let mut stack: Vec<(BundleRef, Option<BundleRef>)> =
        roots.into_iter().rev().map(|root| (root, None)).collect();

    while let Some((current, required_by)) = stack.pop() {
        if is_resolved(assets, &current) || discovered.contains_key(&current) {
            continue;
        }

        let Some(bundle) = store.lookup(&current.namespace, &current.name) else {
            return Err(BundlejamError::BundleNotInNamespace {
                name: current.name,
                namespace: current.namespace,
                required_by,
            });
        };

        let deps = expand_deps(store, &current, bundle)?;
        let edges: BTreeSet<BundleRef> =
            deps.iter().filter(|dep| dep.is_in(&current.namespace)).cloned().collect();

        tracing::debug!(
            "Resolved {} ({} deps, {} same-namespace)",
            current,
            deps.len(),
            edges.len()
        );

        for dep in deps.into_iter().rev() {
            stack.push((dep, Some(current.clone())));
        }
        discovered.insert(current, edges);
    }

    Ok(discovered)
}
