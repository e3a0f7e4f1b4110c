//! Data Path Tests

use formfill_core::{
    paths::{DataPath, PathError, Segment},
    resolve, set_value,
};
use serde_json::json;

#[test]
fn resolves_nested_keys_and_indices() {
    let data = json!({
        "taxpayer": { "address": { "city": "New York" } },
        "dependents": [{ "firstName": "Sarah" }, { "firstName": "Michael" }]
    });
    assert_eq!(resolve(&data, "taxpayer.address.city"), Some(&json!("New York")));
    assert_eq!(resolve(&data, "dependents[0].firstName"), Some(&json!("Sarah")));
    assert_eq!(resolve(&data, "dependents[1].firstName"), Some(&json!("Michael")));
}

#[test]
fn missing_steps_resolve_to_none() {
    let data = json!({ "taxpayer": { "ssn": "123456789" }, "spouse": null, "count": 3 });
    assert_eq!(resolve(&data, "spouse.ssn"), None);
    assert_eq!(resolve(&data, "nobody.ssn"), None);
    assert_eq!(resolve(&data, "dependents[0].firstName"), None);
    assert_eq!(resolve(&data, "taxpayer[0]"), None);
    assert_eq!(resolve(&data, "count.value"), None);
    assert_eq!(resolve(&json!(null), "taxpayer"), None);
}

#[test]
fn out_of_range_index_resolves_to_none() {
    let data = json!({ "dependents": [{ "firstName": "Sarah" }] });
    assert_eq!(resolve(&data, "dependents[3].firstName"), None);
}

#[test]
fn null_leaf_is_present() {
    let data = json!({ "spouse": null });
    assert_eq!(resolve(&data, "spouse"), Some(&json!(null)));
}

#[test]
fn malformed_paths_are_rejected_by_parse_and_missed_by_resolve() {
    assert_eq!(DataPath::parse(""), Err(PathError::Empty));
    assert_eq!(DataPath::parse("a..b"), Err(PathError::EmptySegment("a..b".to_string())));
    assert_eq!(DataPath::parse("a[x]"), Err(PathError::MalformedIndex("a[x]".to_string())));
    assert_eq!(DataPath::parse("a[0"), Err(PathError::MalformedIndex("a[0".to_string())));
    assert_eq!(DataPath::parse("a[-1]"), Err(PathError::MalformedIndex("a[-1]".to_string())));
    assert_eq!(DataPath::parse("[0]"), Err(PathError::MalformedIndex("[0]".to_string())));

    let data = json!({ "a": { "b": 1 } });
    assert_eq!(resolve(&data, "a..b"), None);
}

#[test]
fn parse_yields_segments_and_displays_back() {
    let path = DataPath::parse("dependents[2].address.zip").unwrap();
    assert_eq!(
        path.segments(),
        &[
            Segment::Indexed("dependents".to_string(), 2),
            Segment::Key("address".to_string()),
            Segment::Key("zip".to_string()),
        ]
    );
    assert_eq!(path.to_string(), "dependents[2].address.zip");
}

#[test]
fn set_creates_intermediate_objects_without_touching_input() {
    let original = json!({ "taxpayer": { "firstName": "John" } });
    let updated = set_value(&original, "taxpayer.address.city", json!("Albany")).unwrap();

    assert_eq!(original, json!({ "taxpayer": { "firstName": "John" } }));
    assert_eq!(
        updated,
        json!({ "taxpayer": { "firstName": "John", "address": { "city": "Albany" } } })
    );
}

#[test]
fn set_grows_arrays_for_indexed_segments() {
    let updated = set_value(&json!({}), "dependents[1].firstName", json!("Michael")).unwrap();
    assert_eq!(updated, json!({ "dependents": [null, { "firstName": "Michael" }] }));

    let again = set_value(&updated, "dependents[0].firstName", json!("Sarah")).unwrap();
    assert_eq!(
        again,
        json!({ "dependents": [{ "firstName": "Sarah" }, { "firstName": "Michael" }] })
    );
    assert_eq!(resolve(&again, "dependents[1].firstName"), Some(&json!("Michael")));
}

#[test]
fn set_replaces_scalar_intermediates() {
    let updated = set_value(&json!({ "spouse": "none" }), "spouse.ssn", json!("987654321")).unwrap();
    assert_eq!(updated, json!({ "spouse": { "ssn": "987654321" } }));
}

#[test]
fn set_rejects_malformed_paths() {
    assert!(set_value(&json!({}), "a[", json!(1)).is_err());
}
