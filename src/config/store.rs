//! Validated, read-only namespace configuration.
//!
//! A [`NamespaceStore`] is built once from an [`AssetsConfig`] and then only
//! read. Building it constructs every namespace's processor, so configuration
//! faults surface here instead of during a page render. The store is
//! `Send + Sync`; wrap it in an [`Arc`] and hand it to as many
//! [`AssetRegistry`](crate::registry::AssetRegistry) instances as needed.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use strsim::levenshtein;

use super::namespace::{AssetsConfig, BundleConfig, ProcessorOptions};
use crate::core::{BundleRef, BundlejamError};
use crate::processor::{AssetUrlResolver, Processor, ProcessorContext, ProcessorTable, StaticUrls};

/// Maximum edit distance, as a percentage of the name length, for a
/// configured bundle name to be offered as a suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

struct Namespace {
    processor_id: String,
    processor: Box<dyn Processor>,
    options: ProcessorOptions,
    bundles: BTreeMap<String, BundleConfig>,
}

/// Namespace name to bundle definitions and processor.
pub struct NamespaceStore {
    namespaces: BTreeMap<String, Namespace>,
}

impl NamespaceStore {
    /// Build a store with the built-in processors and [`StaticUrls`] rooted at
    /// the configured `[static] url`.
    pub fn new(config: AssetsConfig) -> crate::core::Result<Self> {
        let urls = Arc::new(StaticUrls::new(config.static_files.url.clone()));
        Self::with_processors(config, &ProcessorTable::default(), urls)
    }

    /// Build a store with a custom processor table and URL resolver.
    ///
    /// # Errors
    ///
    /// Returns a configuration-kind [`BundlejamError`] when no namespace is
    /// configured, when a namespace or bundle name is empty, when a namespace
    /// has no processor or an unregistered one, when a processor rejects its
    /// options, when a bundle has no `output_filename`, or when an explicit
    /// dependency names a namespace that does not exist.
    pub fn with_processors(
        config: AssetsConfig,
        table: &ProcessorTable,
        urls: Arc<dyn AssetUrlResolver>,
    ) -> crate::core::Result<Self> {
        if config.namespaces.is_empty() {
            return Err(BundlejamError::NoNamespaces);
        }

        let context =
            ProcessorContext::new(urls).with_expand_sources(config.static_files.expand_sources);
        let known: Vec<String> = config.namespaces.keys().cloned().collect();

        let mut namespaces = BTreeMap::new();
        for (name, namespace) in config.namespaces {
            if name.trim().is_empty() {
                return Err(BundlejamError::config("namespace names must not be empty"));
            }

            let processor_id = namespace.processor.clone().ok_or_else(|| {
                BundlejamError::MissingProcessor {
                    namespace: name.clone(),
                }
            })?;

            let processor = table
                .construct(&processor_id, &namespace.options, &context)
                .ok_or_else(|| BundlejamError::UnknownProcessor {
                    namespace: name.clone(),
                    processor: processor_id.clone(),
                    registered: table.identifiers().map(str::to_string).collect(),
                })?
                .map_err(|e| BundlejamError::ProcessorConstruction {
                    namespace: name.clone(),
                    processor: processor_id.clone(),
                    reason: format!("{e:#}"),
                })?;

            for (bundle_name, bundle) in &namespace.bundles {
                validate_bundle(&name, bundle_name, bundle, &known)?;
            }

            tracing::debug!(
                "Configured namespace '{}' with processor '{}' ({} bundles)",
                name,
                processor_id,
                namespace.bundles.len()
            );

            namespaces.insert(
                name,
                Namespace {
                    processor_id,
                    processor,
                    options: namespace.options,
                    bundles: namespace.bundles,
                },
            );
        }

        Ok(Self {
            namespaces,
        })
    }

    /// Parse TOML text and build a store from it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self::new(AssetsConfig::from_toml_str(content)?)?)
    }

    /// Load a configuration file and build a store from it.
    pub fn load(path: &Path) -> Result<Self> {
        let config = AssetsConfig::load(path)?;
        Self::new(config)
            .with_context(|| format!("Invalid asset configuration in {}", path.display()))
    }

    /// Configured namespace names in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Whether `namespace` is configured.
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Definition of `bundle_name` in `namespace`, if both exist.
    pub fn lookup(&self, namespace: &str, bundle_name: &str) -> Option<&BundleConfig> {
        self.namespaces.get(namespace).and_then(|ns| ns.bundles.get(bundle_name))
    }

    /// Bundle names configured in `namespace`, sorted.
    pub fn bundle_names(&self, namespace: &str) -> crate::core::Result<Vec<&str>> {
        Ok(self.namespace(namespace)?.bundles.keys().map(String::as_str).collect())
    }

    /// The processor rendering `namespace`.
    pub fn processor_for(&self, namespace: &str) -> crate::core::Result<&dyn Processor> {
        Ok(self.namespace(namespace)?.processor.as_ref())
    }

    /// The processor options configured for `namespace`.
    pub fn processor_options(&self, namespace: &str) -> crate::core::Result<&ProcessorOptions> {
        Ok(&self.namespace(namespace)?.options)
    }

    /// The processor identifier configured for `namespace`.
    pub fn processor_id(&self, namespace: &str) -> crate::core::Result<&str> {
        Ok(&self.namespace(namespace)?.processor_id)
    }

    /// Every namespace defining `bundle_name`, in namespace order.
    ///
    /// A name may legitimately live in several namespaces at once (the same
    /// logical name under `scripts` and `templates`); all of them are returned.
    pub fn find_bundle(&self, bundle_name: &str) -> Vec<BundleRef> {
        self.namespaces
            .iter()
            .filter(|(_, ns)| ns.bundles.contains_key(bundle_name))
            .map(|(namespace, _)| BundleRef::new(bundle_name, namespace.as_str()))
            .collect()
    }

    /// Split the `namespace:name` shorthand used by the CLI and templates.
    ///
    /// The prefix only counts as a namespace when it is configured and the
    /// rest is non-empty; anything else, including bundle names that contain
    /// `:` themselves, is returned whole with no namespace.
    pub fn parse_reference<'a>(&self, input: &'a str) -> (&'a str, Option<&'a str>) {
        match input.split_once(':') {
            Some((namespace, name)) if !name.is_empty() && self.has_namespace(namespace) => {
                (name, Some(namespace))
            }
            _ => (input, None),
        }
    }

    /// Up to three configured bundle names close to `bundle_name`.
    pub fn suggest(&self, bundle_name: &str) -> Vec<String> {
        let mut scored: Vec<(String, usize)> = self
            .namespaces
            .values()
            .flat_map(|ns| ns.bundles.keys())
            .map(|candidate| (candidate.clone(), levenshtein(bundle_name, candidate)))
            .collect();

        scored.sort();
        scored.dedup_by(|a, b| a.0 == b.0);
        scored.sort_by_key(|(_, distance)| *distance);

        scored
            .into_iter()
            .filter(|(_, distance)| {
                *distance <= bundle_name.len() * SIMILARITY_THRESHOLD_PERCENT / 100
            })
            .take(3)
            .map(|(name, _)| name)
            .collect()
    }

    /// Report every dependency declaration that cannot be resolved.
    ///
    /// Construction accepts dangling dependency names so that a store can be
    /// used for the bundles that are fine; this walks all bundles and returns
    /// the resolution errors `add_reference` would raise for the broken ones.
    pub fn check(&self) -> Vec<BundlejamError> {
        let mut problems = Vec::new();
        for (namespace, ns) in &self.namespaces {
            for (bundle_name, bundle) in &ns.bundles {
                let parent = BundleRef::new(bundle_name.as_str(), namespace.as_str());
                for dep in &bundle.deps {
                    match dep.namespace() {
                        Some(dep_namespace) => {
                            if self.lookup(dep_namespace, dep.name()).is_none() {
                                problems.push(BundlejamError::BundleNotInNamespace {
                                    name: dep.name().to_string(),
                                    namespace: dep_namespace.to_string(),
                                    required_by: Some(parent.clone()),
                                });
                            }
                        }
                        None => {
                            if self.find_bundle(dep.name()).is_empty() {
                                problems.push(BundlejamError::BundleNotFound {
                                    name: dep.name().to_string(),
                                    required_by: Some(parent.clone()),
                                    suggestions: self.suggest(dep.name()),
                                });
                            }
                        }
                    }
                }
            }
        }
        for problem in &problems {
            tracing::warn!("{}", problem);
        }
        problems
    }

    fn namespace(&self, namespace: &str) -> crate::core::Result<&Namespace> {
        self.namespaces.get(namespace).ok_or_else(|| BundlejamError::UnknownNamespace {
            namespace: namespace.to_string(),
        })
    }
}

impl std::fmt::Debug for NamespaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, ns) in &self.namespaces {
            map.entry(name, &(&ns.processor_id, ns.bundles.keys().collect::<Vec<_>>()));
        }
        map.finish()
    }
}

fn validate_bundle(
    namespace: &str,
    bundle_name: &str,
    bundle: &BundleConfig,
    known_namespaces: &[String],
) -> crate::core::Result<()> {
    let invalid = |reason: String| BundlejamError::InvalidBundle {
        namespace: namespace.to_string(),
        bundle: bundle_name.to_string(),
        reason,
    };

    if bundle_name.trim().is_empty() {
        return Err(invalid("bundle names must not be empty".to_string()));
    }
    if bundle.output_filename.trim().is_empty() {
        return Err(invalid("missing output_filename".to_string()));
    }
    for dep in &bundle.deps {
        if dep.name().trim().is_empty() {
            return Err(invalid("dependency names must not be empty".to_string()));
        }
        if let Some(dep_namespace) = dep.namespace() {
            if !known_namespaces.iter().any(|known| known == dep_namespace) {
                return Err(invalid(format!(
                    "dependency '{}' names unknown namespace '{}'",
                    dep.name(),
                    dep_namespace
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DependencySpec, NamespaceConfig};
    use crate::core::ErrorKind;

    fn sample() -> AssetsConfig {
        AssetsConfig::new()
            .with_namespace(
                "js",
                NamespaceConfig::new("script")
                    .with_bundle("angular", BundleConfig::new("js/angular.bundle.js"))
                    .with_bundle(
                        "angular-resource",
                        BundleConfig::new("js/angular-resource.bundle.js")
                            .with_dep(DependencySpec::bare("angular")),
                    ),
            )
            .with_namespace(
                "ng",
                NamespaceConfig::new("script")
                    .with_option("type", "text/ng-template")
                    .with_bundle("angular", BundleConfig::new("ng/angular.html")),
            )
    }

    #[test]
    fn test_parse_reference() {
        let store = NamespaceStore::new(sample()).unwrap();
        assert_eq!(store.parse_reference("angular"), ("angular", None));
        assert_eq!(store.parse_reference("ng:template1"), ("template1", Some("ng")));
        // Unconfigured prefixes belong to the bundle name
        assert_eq!(store.parse_reference("vendor:jquery"), ("vendor:jquery", None));
        assert_eq!(store.parse_reference(":x"), (":x", None));
        assert_eq!(store.parse_reference("js:"), ("js:", None));
    }

    #[test]
    fn test_lookup_and_namespaces() {
        let store = NamespaceStore::new(sample()).unwrap();
        assert_eq!(store.namespaces().collect::<Vec<_>>(), vec!["js", "ng"]);
        assert!(store.has_namespace("js"));
        assert!(!store.has_namespace("css"));
        assert_eq!(store.lookup("js", "angular").unwrap().output_filename, "js/angular.bundle.js");
        assert!(store.lookup("js", "missing").is_none());
        assert!(store.lookup("css", "angular").is_none());
        assert_eq!(store.processor_id("ng").unwrap(), "script");
        assert_eq!(
            store.processor_options("ng").unwrap().get_str("type").unwrap(),
            Some("text/ng-template")
        );
        assert_eq!(store.bundle_names("js").unwrap(), vec!["angular", "angular-resource"]);
    }

    #[test]
    fn test_find_bundle_in_every_namespace() {
        let store = NamespaceStore::new(sample()).unwrap();
        assert_eq!(
            store.find_bundle("angular"),
            vec![BundleRef::new("angular", "js"), BundleRef::new("angular", "ng")]
        );
        assert_eq!(store.find_bundle("angular-resource"), vec![BundleRef::new("angular-resource", "js")]);
        assert!(store.find_bundle("jquery").is_empty());
    }

    #[test]
    fn test_no_namespaces() {
        let error = NamespaceStore::new(AssetsConfig::new()).unwrap_err();
        assert_eq!(error, BundlejamError::NoNamespaces);
    }

    #[test]
    fn test_missing_processor() {
        let config = AssetsConfig::new().with_namespace("js", NamespaceConfig::default());
        let error = NamespaceStore::new(config).unwrap_err();
        assert_eq!(
            error,
            BundlejamError::MissingProcessor {
                namespace: "js".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_processor() {
        let config = AssetsConfig::new()
            .with_namespace("js", NamespaceConfig::new("pipeline.processors.ScriptProcessor"));
        let error = NamespaceStore::new(config).unwrap_err();
        assert!(matches!(error, BundlejamError::UnknownProcessor { ref processor, .. } if processor == "pipeline.processors.ScriptProcessor"));
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_processor_rejects_options() {
        let config = AssetsConfig::new()
            .with_namespace("js", NamespaceConfig::new("script").with_option("async", "sometimes"));
        let error = NamespaceStore::new(config).unwrap_err();
        match error {
            BundlejamError::ProcessorConstruction {
                reason,
                ..
            } => assert!(reason.contains("option 'async' must be a boolean")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bundle_without_output() {
        let config = AssetsConfig::new().with_namespace(
            "js",
            NamespaceConfig::new("script").with_bundle("app", BundleConfig::default()),
        );
        let error = NamespaceStore::new(config).unwrap_err();
        assert!(matches!(error, BundlejamError::InvalidBundle { ref bundle, .. } if bundle == "app"));
    }

    #[test]
    fn test_explicit_dependency_on_unknown_namespace() {
        let config = AssetsConfig::new().with_namespace(
            "js",
            NamespaceConfig::new("script").with_bundle(
                "app",
                BundleConfig::new("js/app.js").with_dep(DependencySpec::qualified("reset", "css")),
            ),
        );
        let error = NamespaceStore::new(config).unwrap_err();
        assert!(error.to_string().contains("unknown namespace 'css'"));
    }

    #[test]
    fn test_check_reports_dangling_dependencies() {
        let config = sample().with_namespace(
            "css",
            NamespaceConfig::new("stylesheet").with_bundle(
                "site",
                BundleConfig::new("css/site.css")
                    .with_dep(DependencySpec::bare("angulr"))
                    .with_dep(DependencySpec::qualified("reset", "css")),
            ),
        );
        let store = NamespaceStore::new(config).unwrap();
        let problems = store.check();
        assert_eq!(problems.len(), 2);
        assert_eq!(
            problems[0],
            BundlejamError::BundleNotFound {
                name: "angulr".to_string(),
                required_by: Some(BundleRef::new("site", "css")),
                suggestions: vec!["angular".to_string()],
            }
        );
        assert!(matches!(problems[1], BundlejamError::BundleNotInNamespace { ref name, .. } if name == "reset"));

        assert!(NamespaceStore::new(sample()).unwrap().check().is_empty());
    }

    #[test]
    fn test_suggest() {
        let store = NamespaceStore::new(sample()).unwrap();
        assert_eq!(store.suggest("angluar"), vec!["angular".to_string()]);
        assert!(store.suggest("zzzzzz").is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let store = NamespaceStore::from_toml_str(
            r#"
            [namespaces.css]
            processor = "stylesheet"
            [namespaces.css.bundles.style1]
            output_filename = "css/style1.bundle.css"
            "#,
        )
        .unwrap();
        assert_eq!(store.processor_id("css").unwrap(), "stylesheet");
        assert!(matches!(
            store.processor_for("fonts"),
            Err(BundlejamError::UnknownNamespace { .. })
        ));
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NamespaceStore>();
    }
}
