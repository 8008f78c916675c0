use crate::Error;
use crate::project::scope::{ModuleFilter, ScanScope, is_stdlib};

#[test]
fn main_module_is_always_in_scope() {
    let scope = ScanScope::single("app");
    assert!(scope.matches("__main__"));
}

#[test]
fn prefix_matching() {
    let scope = ScanScope::single("tests");
    assert!(scope.matches("tests"));
    assert!(scope.matches("tests.app"));
    assert!(scope.matches("tests.app.foo1"));
    assert!(!scope.matches("other"));
    assert!(!scope.matches("other.tests"));
}

#[test]
fn framework_package_is_appended() {
    let scope = ScanScope::single("app").with_framework();
    assert!(scope.matches("fastapi"));
    assert!(scope.matches("fastapi.exceptions"));
    let prefixes: Vec<&str> = scope.prefixes().collect();
    assert_eq!(prefixes, ["app", "fastapi"]);
}

#[test]
fn infer_uses_top_level_package() {
    let scope = ScanScope::infer("app.main").unwrap();
    assert!(scope.matches("app.routes"));
    assert!(scope.matches("fastapi"));
    assert!(!scope.matches("tests"));
}

#[test]
fn infer_rejects_main_module() {
    assert!(matches!(ScanScope::infer("__main__"), Err(Error::ScopeInference)));
    assert!(matches!(ScanScope::infer(""), Err(Error::ScopeInference)));
}

#[test]
fn stdlib_detection() {
    assert!(is_stdlib("typing"));
    assert!(is_stdlib("os.path"));
    assert!(is_stdlib("importlib.util"));
    assert!(!is_stdlib("fastapi"));
    assert!(!is_stdlib("tests.app"));
}

#[test]
fn filter_excludes_stdlib_even_when_prefix_matches() {
    let filter = ModuleFilter::new(ScanScope::new(["typing", "app"]));
    assert!(!filter.should_visit("typing"));
    assert!(filter.should_visit("app.main"));
}

#[test]
fn filter_caches_per_module_name() {
    let filter = ModuleFilter::new(ScanScope::single("app"));
    assert!(filter.should_visit("app.main"));
    // second query hits the cache and agrees
    assert!(filter.should_visit("app.main"));
    assert!(!filter.should_visit("vendor.main"));
    assert!(!filter.should_visit("vendor.main"));
}
