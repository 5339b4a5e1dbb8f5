//! Asset configurations shared by unit and integration tests.
//!
//! Each constant is a complete `bundles.toml`. URLs are rooted at the default
//! `/static/` prefix.

use std::sync::Arc;

use crate::config::NamespaceStore;

/// Three namespaces, one bundle each; `ng` emits templates with their URL as id.
pub const DEFAULT: &str = r#"
[static]
url = "/static/"

[namespaces.js]
processor = "script"

[namespaces.js.bundles.angular]
source_files = ["js/angular.js"]
output_filename = "js/angular.bundle.js"

[namespaces.css]
processor = "stylesheet"
type = "text/css"

[namespaces.css.bundles.style1]
source_files = ["css/style1.css"]
output_filename = "css/style1.bundle.css"

[namespaces.ng]
processor = "script"
type = "text/ng-template"
id = "{url}"

[namespaces.ng.bundles.template1]
source_files = ["ng/template1.html"]
output_filename = "ng/template1.bundle.html"
"#;

/// `js:angular-resource` needs `js:angular`, which needs `template1` from `ng`.
pub const TRANSITIVE_CROSS_NAMESPACE: &str = r#"
[namespaces.js]
processor = "script"

[namespaces.js.bundles.angular]
source_files = ["js/angular.js"]
output_filename = "js/angular.bundle.js"
deps = ["template1"]

[namespaces.js.bundles.angular-resource]
source_files = ["js/angular-resource.js"]
output_filename = "js/angular-resource.bundle.js"
deps = ["angular"]

[namespaces.ng]
processor = "script"
type = "text/ng-template"

[namespaces.ng.bundles.template1]
source_files = ["ng/template1.html"]
output_filename = "ng/template1.bundle.html"
"#;

/// `angular` is defined in both `js` and `ng`; the dependency on it is bare.
pub const SHARED_NAME: &str = r#"
[namespaces.js]
processor = "script"

[namespaces.js.bundles.angular]
source_files = ["js/angular.js"]
output_filename = "js/angular.bundle.js"

[namespaces.js.bundles.angular-resource]
source_files = ["js/angular-resource.js"]
output_filename = "js/angular-resource.bundle.js"
deps = ["angular"]

[namespaces.ng]
processor = "script"
type = "text/ng-template"

[namespaces.ng.bundles.angular]
source_files = ["ng/template1.html"]
output_filename = "ng/template1.bundle.html"
"#;

/// Like [`SHARED_NAME`], but the dependency is pinned to `js`.
pub const EXPLICIT_PAIR: &str = r#"
[namespaces.js]
processor = "script"

[namespaces.js.bundles.angular]
source_files = ["js/angular.js"]
output_filename = "js/angular.bundle.js"

[namespaces.js.bundles.angular-resource]
source_files = ["js/angular-resource.js"]
output_filename = "js/angular-resource.bundle.js"
deps = [["angular", "js"]]

[namespaces.ng]
processor = "script"
type = "text/ng-template"

[namespaces.ng.bundles.angular]
source_files = ["ng/template1.html"]
output_filename = "ng/template1.bundle.html"
"#;

/// Two bundles in one namespace, one depending on the other.
pub const ANGULAR_CHAIN: &str = r#"
[namespaces.js]
processor = "script"

[namespaces.js.bundles.angular]
source_files = ["js/angular.js"]
output_filename = "js/angular.bundle.js"

[namespaces.js.bundles.angular-resource]
source_files = ["js/angular-resource.js"]
output_filename = "js/angular-resource.bundle.js"
deps = ["angular"]
"#;

/// `a` and `b` depend on each other.
pub const CYCLE: &str = r#"
[namespaces.js]
processor = "script"

[namespaces.js.bundles.a]
output_filename = "js/a.js"
deps = ["b"]

[namespaces.js.bundles.b]
output_filename = "js/b.js"
deps = ["a"]
"#;

/// `app` depends on a bundle nobody defines.
pub const DANGLING_DEPENDENCY: &str = r#"
[namespaces.js]
processor = "script"

[namespaces.js.bundles.jquery]
output_filename = "js/jquery.js"

[namespaces.js.bundles.app]
output_filename = "js/app.js"
deps = ["jquery", "missing-lib"]
"#;

/// Build a shareable store from one of the fixtures above.
///
/// # Panics
///
/// Panics if the configuration is invalid.
pub fn store(toml: &str) -> Arc<NamespaceStore> {
    Arc::new(NamespaceStore::from_toml_str(toml).expect("fixture configuration is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_load() {
        for fixture in [
            DEFAULT,
            TRANSITIVE_CROSS_NAMESPACE,
            SHARED_NAME,
            EXPLICIT_PAIR,
            ANGULAR_CHAIN,
            CYCLE,
            DANGLING_DEPENDENCY,
        ] {
            store(fixture);
        }
    }

    #[test]
    fn test_only_dangling_fixture_fails_check() {
        assert!(store(DEFAULT).check().is_empty());
        assert_eq!(store(DANGLING_DEPENDENCY).check().len(), 1);
    }
}
