//! End-to-end binding tests.
//!
//! These tests drive the whole subsystem — parser, registry, grower,
//! coercer, navigator and body binder — through realistic request shapes:
//! plain fields, indexed list-of-struct growth, zero-filled sequences under
//! an index policy, map entries via `(key)` paths, classification codes,
//! and JSON body failures with their challenge reports.

use indexmap::IndexMap;
use proteus_bind::{
    Binder, BinderOptions, BindValue, BodyShape, ChallengeVerdict, Describe, FailureClass,
    FieldMap, MapClassificationSource, NoClassifications, SchemaRegistry, TypeDescriptor,
    ValueKind,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize, PartialEq)]
struct Pet {
    #[serde(default)]
    name: String,
}

impl Describe for Pet {
    fn type_name() -> &'static str {
        "Pet"
    }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder("Pet")
            .field("name", ValueKind::String)
            .build()
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Profile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    pets: Vec<Pet>,
    #[serde(default)]
    scores: Vec<i64>,
    #[serde(default)]
    tags: IndexMap<String, bool>,
    #[serde(default)]
    status: Option<serde_json::Value>,
}

impl Describe for Profile {
    fn type_name() -> &'static str {
        "Profile"
    }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder("Profile")
            .field("name", ValueKind::String)
            .field("pets", ValueKind::list(ValueKind::Struct("Pet".into())))
            .field("scores", ValueKind::list(ValueKind::Int))
            .field("tags", ValueKind::map(ValueKind::Bool))
            .field("status", ValueKind::classification("status"))
            .build()
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct CreateItem {
    id: u64,
    #[serde(default)]
    name: String,
}

impl Describe for CreateItem {
    fn type_name() -> &'static str {
        "CreateItem"
    }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder("CreateItem")
            .field("id", ValueKind::UInt)
            .field("name", ValueKind::String)
            .json_body(BodyShape::Single)
            .build()
    }
}

/// Binder with a tight index policy: indices capped at 10.
fn binder() -> Binder {
    let registry = Arc::new(SchemaRegistry::new());
    registry.register::<Pet>();

    let mut classifications = MapClassificationSource::new();
    classifications.insert("status", "O", json!({"code": "O", "label": "open"}));
    classifications.insert("status", "C", json!({"code": "C", "label": "closed"}));

    Binder::with_options(
        registry,
        Arc::new(classifications),
        BinderOptions {
            max_index: 10,
            strict: false,
        },
    )
}

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    let mut map = FieldMap::new();
    for (name, value) in pairs {
        map.push(*name, *value);
    }
    map
}

#[test]
fn test_plain_field_assignment() {
    let profile: Profile = binder().bind(&fields(&[("name", "Jonathan")])).unwrap();
    assert_eq!(profile.name, "Jonathan");
}

#[test]
fn test_list_of_structs_grow_in_index_order() {
    let profile: Profile = binder()
        .bind(&fields(&[("pets[0].name", "Rex"), ("pets[1].name", "Milo")]))
        .unwrap();

    assert_eq!(profile.pets.len(), 2);
    assert_eq!(profile.pets[0].name, "Rex");
    assert_eq!(profile.pets[1].name, "Milo");
}

#[test]
fn test_sequence_growth_zero_fills_gaps() {
    let profile: Profile = binder().bind(&fields(&[("scores[5]", "100")])).unwrap();

    assert!(profile.scores.len() >= 6);
    assert_eq!(profile.scores[5], 100);
    assert_eq!(&profile.scores[..5], &[0, 0, 0, 0, 0]);
}

#[test]
fn test_index_over_policy_is_rejected() {
    let err = binder()
        .bind::<Profile>(&fields(&[("scores[50]", "100")]))
        .unwrap_err();

    assert_eq!(err.class(), FailureClass::Client);
    assert_eq!(err.error_code(), "INDEX_POLICY");
    assert!(err.to_string().contains("50"));
}

#[test]
fn test_map_entry_via_paren_path() {
    let profile: Profile = binder().bind(&fields(&[("tags(red)", "true")])).unwrap();
    assert_eq!(profile.tags.get("red"), Some(&true));
}

#[test]
fn test_json_body_mismatch_carries_challenge() {
    let err = binder()
        .bind_body::<CreateItem>(r#"{"id": "abc"}"#)
        .unwrap_err();

    assert_eq!(err.class(), FailureClass::Client);
    assert_eq!(err.error_code(), "JSON_BODY");

    let report = err.challenge().unwrap();
    assert_eq!(
        report.entry("id").unwrap().verdict,
        ChallengeVerdict::Incompatible
    );
    assert!(report.to_string().contains("x: cannot"));
}

#[test]
fn test_index_boundary_for_policy_maximum() {
    // Index M succeeds.
    let profile: Profile = binder().bind(&fields(&[("scores[10]", "1")])).unwrap();
    assert_eq!(profile.scores.len(), 11);

    // Index M+1 is a client error.
    let err = binder()
        .bind::<Profile>(&fields(&[("scores[11]", "1")]))
        .unwrap_err();
    assert_eq!(err.class(), FailureClass::Client);

    // A negative index is a client error.
    let err = binder()
        .bind::<Profile>(&fields(&[("scores[-1]", "1")]))
        .unwrap_err();
    assert_eq!(err.class(), FailureClass::Client);
    assert_eq!(err.error_code(), "INDEX_POLICY");
}

#[test]
fn test_classification_end_to_end() {
    let binder = binder();

    // A known code resolves to its value.
    let profile: Profile = binder.bind(&fields(&[("status", "O")])).unwrap();
    assert_eq!(profile.status.unwrap()["label"], "open");

    // An empty code yields no value, not an error.
    let profile: Profile = binder.bind(&fields(&[("status", "")])).unwrap();
    assert_eq!(profile.status, None);

    // An unrecognized non-empty code is a client error.
    let err = binder.bind::<Profile>(&fields(&[("status", "Z")])).unwrap_err();
    assert_eq!(err.class(), FailureClass::Client);
}

#[test]
fn test_binding_same_fields_twice_yields_equal_graphs() {
    let binder = binder();
    let incoming = fields(&[
        ("name", "Jonathan"),
        ("pets[1].name", "Milo"),
        ("pets[0].name", "Rex"),
        ("scores[2]", "30"),
        ("tags(red)", "true"),
        ("status", "C"),
    ]);

    let first = binder.bind_value::<Profile>(&incoming).unwrap();
    let second = binder.bind_value::<Profile>(&incoming).unwrap();
    assert_eq!(first, second);

    let typed: Profile = binder.bind(&incoming).unwrap();
    assert_eq!(typed.pets.len(), 2);
    assert_eq!(typed.scores, vec![0, 0, 30]);
}

#[test]
fn test_urlencoded_form_end_to_end() {
    let incoming =
        FieldMap::parse_urlencoded("name=Ann&pets%5B0%5D.name=Rex&tags(blue)=false").unwrap();

    let profile: Profile = binder().bind(&incoming).unwrap();
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.pets[0].name, "Rex");
    assert_eq!(profile.tags.get("blue"), Some(&false));
}

#[test]
fn test_dynamic_graph_inspection() {
    let graph = binder()
        .bind_value::<Profile>(&fields(&[("pets[0].name", "Rex")]))
        .unwrap();

    let pets = graph.as_object().unwrap().get("pets").unwrap();
    match pets {
        BindValue::List(elements) => assert_eq!(elements.len(), 1),
        other => panic!("expected a list, got {other:?}"),
    }
}

#[test]
fn test_multipart_style_repeated_fields() {
    let binder = {
        let registry = Arc::new(SchemaRegistry::new());
        Binder::new(registry, Arc::new(NoClassifications))
    };

    #[derive(Debug, Deserialize)]
    struct Upload {
        #[serde(default)]
        labels: Vec<String>,
    }

    impl Describe for Upload {
        fn type_name() -> &'static str {
            "Upload"
        }

        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder("Upload")
                .field("labels", ValueKind::list(ValueKind::String))
                .build()
        }
    }

    let mut incoming = FieldMap::new();
    incoming.push("labels", "a");
    incoming.push("labels", "b");

    let upload: Upload = binder.bind(&incoming).unwrap();
    assert_eq!(upload.labels, vec!["a", "b"]);
}
