//! Resolution and rendering through the public API.

use bundlejam::core::{BundleRef, BundlejamError, ErrorKind};
use bundlejam::registry::AssetRegistry;
use bundlejam::test_utils::{fixtures, init_test_logging};
use std::collections::BTreeSet;
use std::sync::Arc;

fn refs(pairs: &[(&str, &str)]) -> BTreeSet<BundleRef> {
    pairs.iter().map(|(name, namespace)| BundleRef::new(*name, *namespace)).collect()
}

#[test]
fn test_script_processor_with_id_pattern() {
    init_test_logging(None);
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::DEFAULT));
    registry.add_reference("template1", Some("ng")).unwrap();

    let fragments = registry.render("ng").unwrap();
    assert_eq!(
        fragments,
        vec![
            "<script id=\"/static/ng/template1.bundle.html\" type=\"text/ng-template\" \
             src=\"/static/ng/template1.bundle.html\" charset=\"utf-8\"></script>"
        ]
    );
}

#[test]
fn test_each_namespace_renders_independently() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::DEFAULT));
    for name in ["style1", "angular", "template1"] {
        registry.add_reference(name, None).unwrap();
    }

    assert_eq!(registry.render("js").unwrap().len(), 1);
    assert_eq!(
        registry.render("css").unwrap(),
        vec!["<link href=\"/static/css/style1.bundle.css\" rel=\"stylesheet\" type=\"text/css\" />"]
    );
    assert_eq!(registry.render("ng").unwrap().len(), 1);
}

#[test]
fn test_dependency_in_other_namespace_is_resolved_not_stored() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::TRANSITIVE_CROSS_NAMESPACE));
    registry.add_reference("angular-resource", Some("js")).unwrap();

    let js = registry.assets("js").unwrap();
    assert_eq!(js["angular-resource"], refs(&[("angular", "js")]));
    assert!(js["angular"].is_empty());
    assert!(registry.assets("ng").unwrap().contains_key("template1"));

    // Each namespace orders only its own bundles
    assert_eq!(registry.order("js").unwrap(), vec!["angular", "angular-resource"]);
    assert_eq!(registry.order("ng").unwrap(), vec!["template1"]);
}

#[test]
fn test_bare_name_resolves_in_every_namespace() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::SHARED_NAME));
    registry.add_reference("angular", None).unwrap();

    assert!(registry.is_resolved("js", "angular"));
    assert!(registry.is_resolved("ng", "angular"));
    assert!(!registry.is_resolved("js", "angular-resource"));
}

#[test]
fn test_bare_dependency_shared_between_namespaces() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::SHARED_NAME));
    registry.add_reference("angular-resource", Some("js")).unwrap();

    assert_eq!(registry.dependencies("js", "angular-resource"), Some(&refs(&[("angular", "js")])));
    assert_eq!(registry.dependencies("js", "angular"), Some(&BTreeSet::new()));
    assert_eq!(registry.dependencies("ng", "angular"), Some(&BTreeSet::new()));
}

#[test]
fn test_explicit_pair_is_not_searched() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::EXPLICIT_PAIR));
    registry.add_reference("angular-resource", Some("js")).unwrap();

    assert_eq!(registry.dependencies("js", "angular-resource"), Some(&refs(&[("angular", "js")])));
    assert!(registry.assets("ng").unwrap().is_empty());
}

#[test]
fn test_reference_order_does_not_change_output() {
    let store = fixtures::store(fixtures::ANGULAR_CHAIN);

    let mut forward = AssetRegistry::new(Arc::clone(&store));
    forward.add_reference("angular", None).unwrap();
    forward.add_reference("angular-resource", None).unwrap();

    let mut backward = AssetRegistry::new(Arc::clone(&store));
    backward.add_reference("angular-resource", None).unwrap();
    backward.add_reference("angular", None).unwrap();

    assert_eq!(forward.render("js").unwrap(), backward.render("js").unwrap());
}

#[test]
fn test_repeated_reference_is_a_no_op() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::TRANSITIVE_CROSS_NAMESPACE));
    registry.add_reference("angular-resource", Some("js")).unwrap();
    let js = registry.assets("js").cloned();
    let ng = registry.assets("ng").cloned();

    registry.add_reference("angular-resource", Some("js")).unwrap();
    registry.add_reference("angular-resource", None).unwrap();
    assert_eq!(registry.assets("js").cloned(), js);
    assert_eq!(registry.assets("ng").cloned(), ng);
}

#[test]
fn test_render_does_not_mutate() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::TRANSITIVE_CROSS_NAMESPACE));
    registry.add_reference("angular-resource", Some("js")).unwrap();
    let before = registry.assets("js").cloned();

    let first = registry.render("js").unwrap();
    let second = registry.render("js").unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.assets("js").cloned(), before);
}

#[test]
fn test_cycle_is_reported_at_render() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::CYCLE));
    registry.add_reference("b", None).unwrap();

    let error = registry.render("js").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Cycle);
    match error {
        BundlejamError::CircularDependency {
            namespace,
            cycle,
        } => {
            assert_eq!(namespace, "js");
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(cycle.len(), 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_bundle_is_a_resolution_error() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::DEFAULT));

    let error = registry.add_reference("jquery", None).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Resolution);

    let error = registry.add_reference("angular", Some("css")).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Resolution);
    assert!(registry.is_empty());
}

#[test]
fn test_dangling_dependency_names_the_dependent() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::DANGLING_DEPENDENCY));
    let error = registry.add_reference("app", None).unwrap_err();

    assert!(matches!(
        error,
        BundlejamError::BundleNotFound { ref name, required_by: Some(ref parent), .. }
            if name == "missing-lib" && parent == &BundleRef::new("app", "js")
    ));
    assert!(error.to_string().contains("(required by js:app)"));
}

#[test]
fn test_store_is_shared_between_registries() {
    let store = fixtures::store(fixtures::DEFAULT);
    let handles: Vec<_> = ["angular", "style1", "template1"]
        .into_iter()
        .map(|name| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let mut registry = AssetRegistry::new(store);
                registry.add_reference(name, None).unwrap();
                registry.is_empty()
            })
        })
        .collect();

    for handle in handles {
        assert!(!handle.join().unwrap());
    }
}
