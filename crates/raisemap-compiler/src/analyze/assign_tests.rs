use indoc::indoc;

use crate::analyze::AssignmentMap;
use crate::test_utils::parse;

fn record_all(source: &str) -> AssignmentMap {
    let tree = parse(source);
    let mut map = AssignmentMap::new();
    for node in crate::python::descendants(tree.root_node()) {
        if node.kind() == "assignment" {
            map.record(node, source);
        }
    }
    map
}

#[test]
fn records_supported_binding_forms() {
    let map = record_all(indoc! {r#"
        a = exc
        b = Error("boom")
        c = obj.attr
        d = await client.fetch()
    "#});
    assert_eq!(map.get("a"), Some("exc"));
    assert_eq!(map.get("b"), Some("Error"));
    assert_eq!(map.get("c"), Some("obj.attr"));
    assert_eq!(map.get("d"), Some("client.fetch"));
}

#[test]
fn unsupported_bindings_are_dropped_not_recorded_as_unknown() {
    let map = record_all(indoc! {r#"
        a = lambda: Error()
        b = [Error()]
        c = x + y
        d, e = pair
    "#});
    assert!(map.is_empty());
}

#[test]
fn rebinding_overwrites() {
    let map = record_all(indoc! {r#"
        exc = ValueError("first")
        exc = TypeError("second")
    "#});
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("exc"), Some("TypeError"));
}

#[test]
fn bare_names_substitute_through_earlier_bindings() {
    let map = record_all(indoc! {r#"
        original = ValueError("boom")
        alias = original
    "#});
    assert_eq!(map.get("alias"), Some("ValueError"));
}
