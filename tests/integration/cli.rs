//! The `bundlejam` binary.

use assert_cmd::Command;
use bundlejam::test_utils::fixtures;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bundles.toml"), config).unwrap();
    temp
}

fn bundlejam(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bundlejam").unwrap();
    cmd.current_dir(temp.path())
        .env_remove("BUNDLEJAM_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_check_valid_configuration() {
    let temp = project(fixtures::DEFAULT);
    bundlejam(&temp)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"))
        .stdout(predicate::str::contains("3 namespace(s), 3 bundle(s)"));
}

#[test]
fn test_check_reports_cycle() {
    let temp = project(fixtures::CYCLE);
    bundlejam(&temp)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Circular dependency detected in namespace 'js'"))
        .stderr(predicate::str::contains("1 problem(s) found"));
}

#[test]
fn test_check_reports_dangling_dependency_as_json() {
    let temp = project(fixtures::DANGLING_DEPENDENCY);
    let output = bundlejam(&temp).args(["check", "--format", "json"]).assert().failure();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["problems"][0]["kind"], "resolution");
    assert!(report["problems"][0]["message"].as_str().unwrap().contains("missing-lib"));
}

#[test]
fn test_order_prints_dependencies_first() {
    let temp = project(fixtures::TRANSITIVE_CROSS_NAMESPACE);
    bundlejam(&temp)
        .args(["order", "js:angular-resource"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[js]\n  angular\n  angular-resource\n"))
        .stdout(predicate::str::contains("[ng]\n  template1\n"));
}

#[test]
fn test_order_json_limited_to_namespace() {
    let temp = project(fixtures::TRANSITIVE_CROSS_NAMESPACE);
    let output = bundlejam(&temp)
        .args(["order", "angular-resource", "--namespace", "js", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let orders: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(orders, serde_json::json!({ "js": ["angular", "angular-resource"] }));
}

#[test]
fn test_render_prints_fragments() {
    let temp = project(fixtures::ANGULAR_CHAIN);
    bundlejam(&temp)
        .args(["render", "angular-resource"])
        .assert()
        .success()
        .stdout(
            "<script type=\"text/javascript\" src=\"/static/js/angular.bundle.js\" charset=\"utf-8\"></script>\n\
             <script type=\"text/javascript\" src=\"/static/js/angular-resource.bundle.js\" charset=\"utf-8\"></script>\n",
        );
}

#[test]
fn test_render_unknown_bundle_suggests() {
    let temp = project(fixtures::ANGULAR_CHAIN);
    bundlejam(&temp)
        .args(["render", "angulr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundle 'angulr' not found in any namespace"))
        .stderr(predicate::str::contains("angular"));
}

#[test]
fn test_config_flag_and_env() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("site")).unwrap();
    fs::write(temp.path().join("site/assets.toml"), fixtures::ANGULAR_CHAIN).unwrap();

    bundlejam(&temp)
        .args(["-c", "site/assets.toml", "order", "angular"])
        .assert()
        .success()
        .stdout(predicate::str::contains("angular"));

    bundlejam(&temp)
        .env("BUNDLEJAM_CONFIG", "site/assets.toml")
        .args(["order", "angular"])
        .assert()
        .success();
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    bundlejam(&temp)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_invalid_processor_is_a_configuration_error() {
    let temp = project(
        r#"
[namespaces.js]
processor = "pipeline.processors.ScriptProcessor"
"#,
    );
    bundlejam(&temp)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown processor 'pipeline.processors.ScriptProcessor'"));
}

#[test]
fn test_page_with_templates_and_context() {
    let temp = project(fixtures::DEFAULT);
    let templates = temp.path().join("templates");
    fs::create_dir(&templates).unwrap();
    fs::write(
        templates.join("base.html"),
        r#"<head>{{ assets(namespace="css") }}</head>{% block body %}{% endblock body %}"#,
    )
    .unwrap();
    fs::write(
        templates.join("index.html"),
        r#"{% extends "base.html" %}{% block body %}{{ asset_ref(name="style1") }}<h1>{{ title }}</h1>{% endblock body %}"#,
    )
    .unwrap();
    fs::write(temp.path().join("ctx.json"), r#"{"title": "Welcome"}"#).unwrap();

    bundlejam(&temp)
        .args(["page", "index.html", "--templates", "templates/*.html", "--context", "ctx.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<head><link href=\"/static/css/style1.bundle.css\" rel=\"stylesheet\" type=\"text/css\" /></head>",
        ))
        .stdout(predicate::str::contains("<h1>Welcome</h1>"));
}

#[test]
fn test_page_from_file() {
    let temp = project(fixtures::DEFAULT);
    fs::write(
        temp.path().join("page.txt"),
        r#"{{ asset_ref(name="ng:template1") }}{{ assets(namespace="ng") }}"#,
    )
    .unwrap();

    bundlejam(&temp)
        .args(["page", "page.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id=\"/static/ng/template1.bundle.html\""));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let temp = project(fixtures::ANGULAR_CHAIN);
    bundlejam(&temp)
        .args(["--verbose", "render", "angular"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEBUG").not())
        .stderr(predicate::str::contains("Resolved"));
}
