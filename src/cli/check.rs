//! Validate an asset configuration.
//!
//! Loading the store already rejects structural problems (unknown
//! processors, bad options, missing output files). `check` goes further and
//! resolves every configured bundle, which surfaces dangling dependencies,
//! and orders every namespace, which surfaces cycles.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use super::common::load_store;
use super::{CliConfig, OutputFormat};
use crate::config::NamespaceStore;
use crate::core::BundlejamError;
use crate::registry::AssetRegistry;
use std::sync::Arc;

/// Validate the configuration and its dependency graph.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Every problem in `store`, dangling dependencies first.
pub(crate) fn collect_problems(store: &Arc<NamespaceStore>) -> Vec<BundlejamError> {
    let mut problems = store.check();

    for namespace in store.namespaces() {
        let mut registry = AssetRegistry::new(Arc::clone(store));
        let bundles = store.bundle_names(namespace).unwrap_or_default();
        for bundle in bundles {
            if let Err(e) = registry.add_reference(bundle, Some(namespace)) {
                if !problems.contains(&e) {
                    problems.push(e);
                }
            }
        }
        if let Err(e) = registry.order(namespace) {
            problems.push(e);
        }
    }

    problems
}

impl CheckCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let store = load_store(config)?;
        let problems = collect_problems(&store);

        let namespaces = store.namespaces().count();
        let bundles: usize = store
            .namespaces()
            .map(|namespace| store.bundle_names(namespace).map(|names| names.len()).unwrap_or(0))
            .sum();

        match self.format {
            OutputFormat::Json => {
                let report = json!({
                    "valid": problems.is_empty(),
                    "config": config.config_path.display().to_string(),
                    "namespaces": namespaces,
                    "bundles": bundles,
                    "problems": problems.iter().map(|p| json!({
                        "kind": p.kind().to_string(),
                        "message": p.to_string(),
                    })).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                for problem in &problems {
                    println!("{} {}", "✗".red(), problem);
                }
                if problems.is_empty() {
                    println!(
                        "{} {} ({} namespace(s), {} bundle(s))",
                        "✓".green(),
                        config.config_path.display(),
                        namespaces,
                        bundles
                    );
                }
            }
        }

        if !problems.is_empty() {
            bail!("{} problem(s) found in {}", problems.len(), config.config_path.display());
        }
        Ok(())
    }
}
