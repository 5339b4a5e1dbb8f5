//! Helpers shared by the CLI commands.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use super::CliConfig;
use crate::config::NamespaceStore;
use crate::registry::AssetRegistry;

/// Load the configured store.
pub(crate) fn load_store(config: &CliConfig) -> Result<Arc<NamespaceStore>> {
    let store = NamespaceStore::load(&config.config_path)?;
    tracing::debug!("Loaded asset configuration from {}", config.config_path.display());
    Ok(Arc::new(store))
}

/// Bundle references and namespace selection for `order` and `render`.
#[derive(Args, Debug, Clone)]
pub struct ReferenceArgs {
    /// Bundles to reference, as `name` or `namespace:name`
    #[arg(required = true, value_name = "REF")]
    pub refs: Vec<String>,

    /// Only output these namespaces, in the given order
    ///
    /// Defaults to every namespace with at least one resolved bundle.
    #[arg(short, long = "namespace", value_name = "NS")]
    pub namespaces: Vec<String>,
}

impl ReferenceArgs {
    /// Build a registry holding every reference, in argument order.
    pub(crate) fn registry(&self, store: Arc<NamespaceStore>) -> Result<AssetRegistry> {
        let mut registry = AssetRegistry::new(store);
        for raw in &self.refs {
            let (name, namespace) = registry.store().parse_reference(raw);
            registry
                .add_reference(name, namespace)
                .with_context(|| format!("Failed to resolve '{raw}'"))?;
        }
        Ok(registry)
    }

    /// Namespaces to output for `registry`.
    pub(crate) fn selected_namespaces(&self, registry: &AssetRegistry) -> Vec<String> {
        if self.namespaces.is_empty() {
            registry
                .store()
                .namespaces()
                .filter(|namespace| registry.assets(namespace).is_some_and(|table| !table.is_empty()))
                .map(str::to_string)
                .collect()
        } else {
            self.namespaces.clone()
        }
    }
}
