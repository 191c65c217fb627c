//! Script normalization against the collection schema.
//!
//! A schema-valid collection stays valid after normalization, and a
//! collection whose only defect is binary script bodies becomes valid.

use pmc_collection::normalize_scripts;
use pmc_core::{Mapping, Node};
use pmc_schema::{SchemaValidator, ValidatorConfig};
use proptest::prelude::*;

fn validator() -> SchemaValidator {
    SchemaValidator::new(ValidatorConfig::default()).unwrap()
}

fn object(entries: Vec<(&str, Node)>) -> Node {
    Node::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<Mapping>())
}

/// A script value: text, or the same text as raw bytes.
fn script(binary: bool) -> impl Strategy<Value = Node> {
    "[a-z().; ]{0,24}".prop_map(move |body| {
        if binary {
            Node::Binary(body.into_bytes())
        } else {
            Node::String(body)
        }
    })
}

fn script_map(binary: bool) -> impl Strategy<Value = Node> {
    prop::collection::vec(("[a-z]{1,8}", script(binary)), 0..3)
        .prop_map(|entries| Node::Object(entries.into_iter().collect::<Mapping>()))
}

fn request(binary: bool) -> impl Strategy<Value = Node> {
    ("[A-Za-z]{1,10}", prop::option::of(script_map(binary))).prop_map(|(name, events)| {
        let mut entries = vec![
            ("name", Node::from(name.as_str())),
            ("request", Node::from("https://api.test/ping")),
        ];
        if let Some(events) = events {
            entries.push(("events", events));
        }
        object(entries)
    })
}

/// An item tree whose leaves are requests. Folders carry no events.
fn item(binary: bool) -> impl Strategy<Value = Node> {
    request(binary).prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4)
            .prop_map(|children| object(vec![("name", Node::from("folder")), ("items", Node::Array(children))]))
    })
}

fn collection(binary: bool) -> impl Strategy<Value = Node> {
    (
        prop::option::of(script_map(binary)),
        prop::option::of(item(binary)),
        prop::option::of(item(binary)),
    )
        .prop_map(|(scripts, requests, tests)| {
            let mut entries = vec![("info", object(vec![("name", Node::from("Generated"))]))];
            if let Some(scripts) = scripts {
                entries.push(("scripts", scripts));
            }
            if let Some(requests) = requests {
                entries.push(("requests", requests));
            }
            if let Some(tests) = tests {
                entries.push(("tests", tests));
            }
            object(entries)
        })
}

fn contains_binary(node: &Node) -> bool {
    match node {
        Node::Binary(_) => true,
        Node::Array(items) => items.iter().any(contains_binary),
        Node::Object(map) => map.values().any(contains_binary),
        _ => false,
    }
}

proptest! {
    #[test]
    fn valid_collections_stay_valid(doc in collection(false)) {
        let validator = validator();
        prop_assert!(validator.validate(&doc.to_json()).is_ok());

        let mut normalized = doc.clone();
        normalize_scripts(&mut normalized);
        prop_assert_eq!(&normalized, &doc);
        prop_assert!(validator.validate(&normalized.to_json()).is_ok());
    }

    #[test]
    fn binary_scripts_become_valid(mut doc in collection(true)) {
        let validator = validator();
        let had_binary = contains_binary(&doc);
        prop_assert_eq!(validator.validate(&doc.to_json()).is_err(), had_binary);

        normalize_scripts(&mut doc);
        prop_assert!(!contains_binary(&doc));
        prop_assert!(validator.validate(&doc.to_json()).is_ok());
    }
}

#[test]
fn binary_request_script_is_invalid_until_normalized() {
    let validator = validator();
    let mut doc = object(vec![
        ("info", object(vec![("name", Node::from("A"))])),
        ("scripts", object(vec![("setup", Node::Binary(b"pm.setup()".to_vec()))])),
        (
            "requests",
            object(vec![
                ("name", Node::from("Root")),
                (
                    "items",
                    Node::Array(vec![object(vec![
                        ("name", Node::from("Ping")),
                        ("request", Node::from("https://api.test/ping")),
                        ("events", object(vec![("test", Node::Binary(b"pm.test('ok');".to_vec()))])),
                    ])]),
                ),
            ]),
        ),
    ]);

    let err = validator.validate(&doc.to_json()).unwrap_err().to_string();
    assert!(
        err.contains("#/scripts/setup") || err.contains("#/requests/items/0"),
        "{err}"
    );

    normalize_scripts(&mut doc);
    validator.validate(&doc.to_json()).unwrap();
    assert_eq!(
        doc.pointer("/requests/items/0/events/test"),
        Some(&Node::from("pm.test('ok');"))
    );
}
