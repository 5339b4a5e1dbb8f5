//! Page templates declaring and emitting assets.

use bundlejam::registry::AssetRegistry;
use bundlejam::templating::PageRenderer;
use bundlejam::test_utils::fixtures;
use std::fs;
use tempfile::TempDir;
use tera::Context;

const BASE: &str = r#"<html><head>
{{ assets(namespace="js") }}
{{ assets(namespace="css") }}
{{ assets(namespace="ng") }}
</head><body>{% block body %}{% endblock body %}</body></html>"#;

const NG_TEMPLATE: &str = "<script id=\"/static/ng/template1.bundle.html\" type=\"text/ng-template\" \
                           src=\"/static/ng/template1.bundle.html\" charset=\"utf-8\"></script>";

fn renderer() -> PageRenderer {
    let mut renderer = PageRenderer::new();
    renderer.add_raw_template("base.html", BASE).unwrap();
    renderer
}

fn registry() -> AssetRegistry {
    AssetRegistry::new(fixtures::store(fixtures::DEFAULT))
}

#[test]
fn test_references_after_render_points() {
    let page = r#"{{ assets(namespace="js") }}{{ assets(namespace="css") }}{{ assets(namespace="ng") }}
{{ asset_ref(name="angular") }}{{ asset_ref(name="style1") }}{{ asset_ref(name="template1") }}"#;

    let mut registry = registry();
    let html = PageRenderer::new().render_str(page, &Context::new(), &mut registry).unwrap();

    assert!(html.contains("src=\"/static/js/angular.bundle.js\""));
    assert!(html.contains("href=\"/static/css/style1.bundle.css\""));
    assert!(html.contains(NG_TEMPLATE));
}

#[test]
fn test_reference_order_does_not_matter() {
    let first = r#"{{ asset_ref(name="angular") }}{{ asset_ref(name="style1") }}{{ asset_ref(name="template1") }}{{ assets(namespace="js") }}{{ assets(namespace="css") }}{{ assets(namespace="ng") }}"#;
    let second = r#"{{ asset_ref(name="template1") }}{{ asset_ref(name="style1") }}{{ asset_ref(name="angular") }}{{ assets(namespace="js") }}{{ assets(namespace="css") }}{{ assets(namespace="ng") }}"#;

    let renderer = PageRenderer::new();
    let a = renderer.render_str(first, &Context::new(), &mut registry()).unwrap();
    let b = renderer.render_str(second, &Context::new(), &mut registry()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_child_block_references_reach_base_head() {
    let mut renderer = renderer();
    renderer
        .add_raw_template(
            "page.html",
            r#"{% extends "base.html" %}
{% block body %}
{{ asset_ref(name="style1") }}
{{ asset_ref(name="angular") }}
{{ asset_ref(name="template1") }}
<p>Hello</p>
{% endblock body %}"#,
        )
        .unwrap();

    let mut registry = registry();
    let html = renderer.render("page.html", &Context::new(), &mut registry).unwrap();

    let head_end = html.find("</head>").unwrap();
    let head = &html[..head_end];
    assert!(head.contains("/static/js/angular.bundle.js"));
    assert!(head.contains("/static/css/style1.bundle.css"));
    assert!(head.contains(NG_TEMPLATE));
    assert!(html[head_end..].contains("<p>Hello</p>"));
}

#[test]
fn test_references_outside_child_blocks_are_ignored() {
    let mut renderer = renderer();
    renderer
        .add_raw_template(
            "outside.html",
            r#"{% extends "base.html" %}
{{ asset_ref(name="style1") }}
{{ asset_ref(name="angular") }}
{{ asset_ref(name="template1") }}"#,
        )
        .unwrap();

    let mut registry = registry();
    let html = renderer.render("outside.html", &Context::new(), &mut registry).unwrap();

    assert!(registry.is_empty());
    assert!(!html.contains("<script"));
    assert!(!html.contains("<link"));
}

#[test]
fn test_context_variables_select_bundles() {
    let mut context = Context::new();
    context.insert("bundles", &vec!["angular", "style1"]);

    let page = r#"{% for b in bundles %}{{ asset_ref(name=b) }}{% endfor %}{{ assets(namespace="css") }}"#;
    let mut registry = registry();
    let html = PageRenderer::new().render_str(page, &context, &mut registry).unwrap();

    assert!(html.starts_with("<link href=\"/static/css/style1.bundle.css\""));
    assert!(registry.is_resolved("js", "angular"));
}

#[test]
fn test_unknown_namespace_in_render_point() {
    let mut registry = registry();
    let error = PageRenderer::new()
        .render_str(r#"{{ assets(namespace="fonts") }}"#, &Context::new(), &mut registry)
        .unwrap_err();
    assert!(format!("{error:#}").contains("Namespace 'fonts' is not configured"));
}

#[test]
fn test_cycle_surfaces_through_page() {
    let mut registry = AssetRegistry::new(fixtures::store(fixtures::CYCLE));
    let error = PageRenderer::new()
        .render_str(
            r#"{{ asset_ref(name="a") }}{{ assets(namespace="js") }}"#,
            &Context::new(),
            &mut registry,
        )
        .unwrap_err();
    assert!(format!("{error:#}").contains("Circular dependency"));
}

#[test]
fn test_templates_from_glob() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("base.html"), BASE).unwrap();
    fs::write(
        temp.path().join("index.html"),
        r#"{% extends "base.html" %}{% block body %}{{ asset_ref(name="angular", namespace="js") }}{% endblock body %}"#,
    )
    .unwrap();

    let glob = format!("{}/*.html", temp.path().display());
    let renderer = PageRenderer::from_glob(&glob).unwrap();
    assert_eq!(renderer.template_names(), vec!["base.html", "index.html"]);

    let mut registry = registry();
    let html = renderer.render("index.html", &Context::new(), &mut registry).unwrap();
    assert!(html.contains("/static/js/angular.bundle.js"));
}
