//! End-to-end batch tests over on-disk collections.
//!
//! Each test writes a small multi-file collection into a temporary
//! directory, runs it through `RefResolver` + `Batch`, and checks the
//! result shape and content.

use std::fs;
use std::path::{Path, PathBuf};

use pmc_collection::output::{serialize, write_file};
use pmc_collection::{Batch, BatchError, BatchOutput, CollectionError, Destination, Method, OutputFormat};
use pmc_core::{CollectionSource, Node, ProcessOptions};
use pmc_resolve::{RefResolver, ResolveError};
use pmc_schema::{SchemaValidator, ValidatorConfig};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A valid collection whose request test script lives in a `.js` file.
fn valid_collection(dir: &Path) -> PathBuf {
    write(dir, "scripts/ping-test.js", "pm.test('status', () => pm.response.to.be.ok);\n");
    write(
        dir,
        "requests.yaml",
        "items:\n  - name: Ping\n    request: https://api.test/ping\n    events:\n      test:\n        $ref: scripts/ping-test.js\n",
    );
    write(
        dir,
        "a.json",
        r#"{"info": {"name": "A", "version": "1.0.0"}, "requests": {"$ref": "requests.yaml"}}"#,
    )
}

/// A collection whose only request is missing its name.
fn invalid_collection(dir: &Path) -> PathBuf {
    write(
        dir,
        "b.json",
        r#"{"info": {"name": "B"}, "requests": {"items": [{"request": "https://api.test"}]}}"#,
    )
}

fn validator() -> SchemaValidator {
    SchemaValidator::new(ValidatorConfig::default()).unwrap()
}

#[tokio::test]
async fn continue_mode_keeps_every_result_in_order() {
    let dir = TempDir::new().unwrap();
    let a = valid_collection(dir.path());
    let b = invalid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let err = Batch::new(&resolver, &validator)
        .run(
            Method::Validate,
            vec![CollectionSource::Path(a), CollectionSource::Path(b)],
            None,
        )
        .await
        .unwrap_err();

    let BatchError::Partial { results } = &err else {
        panic!("expected partial failure, got {err}");
    };
    assert_eq!(results.len(), 2);
    let doc = results[0].as_ref().unwrap();
    assert_eq!(doc.pointer("/info/name"), Some(&Node::from("A")));
    assert!(matches!(results[1], Err(CollectionError::Schema(_))));

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(
        format!("{} succeeded, {} failed", succeeded, err.failure_count()),
        "1 succeeded, 1 failed"
    );
}

#[tokio::test]
async fn bail_mode_surfaces_one_error() {
    let dir = TempDir::new().unwrap();
    let a = valid_collection(dir.path());
    let b = invalid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let err = Batch::new(&resolver, &validator)
        .run(
            Method::Validate,
            vec![CollectionSource::Path(a), CollectionSource::Path(b)],
            Some(ProcessOptions::bail()),
        )
        .await
        .unwrap_err();

    let BatchError::Failed { index, error } = &err else {
        panic!("expected a single error, got {err}");
    };
    assert_eq!(*index, 1);
    let message = error.to_string();
    assert!(message.starts_with("Postman Collection schema validation failed. \n"));
    assert!(message.contains("#/requests/items/0"), "{message}");
    assert_eq!(err.failure_count(), 1);
}

#[tokio::test]
async fn validate_inlines_and_decodes_scripts() {
    let dir = TempDir::new().unwrap();
    let a = valid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let output = Batch::new(&resolver, &validator)
        .run(Method::Validate, CollectionSource::Path(a), None)
        .await
        .unwrap();

    let BatchOutput::One(doc) = output else {
        panic!("single source must produce a single document");
    };
    assert_eq!(
        doc.pointer("/requests/items/0/events/test"),
        Some(&Node::from("pm.test('status', () => pm.response.to.be.ok);\n"))
    );
}

#[tokio::test]
async fn single_source_failure_is_unwrapped() {
    let dir = TempDir::new().unwrap();
    let resolver = RefResolver::default();
    let validator = validator();

    let err = Batch::new(&resolver, &validator)
        .run(Method::Bundle, CollectionSource::Path(dir.path().join("absent.json")), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Failed {
            index: 0,
            error: CollectionError::Resolve(ResolveError::Io { .. })
        }
    ));
}

#[tokio::test]
async fn one_element_list_stays_a_list() {
    let dir = TempDir::new().unwrap();
    let a = valid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let output = Batch::new(&resolver, &validator)
        .run(Method::Validate, vec![CollectionSource::Path(a)], None)
        .await
        .unwrap();
    assert!(matches!(output, BatchOutput::Many(ref docs) if docs.len() == 1));
}

#[tokio::test]
async fn empty_list_succeeds_with_no_results() {
    let resolver = RefResolver::default();
    let validator = validator();
    let output = Batch::new(&resolver, &validator)
        .run(Method::Validate, Vec::new(), Some(ProcessOptions::bail()))
        .await
        .unwrap();
    assert!(output.is_empty());
}

#[tokio::test]
async fn bundle_does_not_validate() {
    let dir = TempDir::new().unwrap();
    let b = invalid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let output = Batch::new(&resolver, &validator)
        .run(Method::Bundle, vec![CollectionSource::Path(b)], None)
        .await
        .unwrap();
    assert_eq!(output.len(), 1);
}

#[tokio::test]
async fn callback_is_invoked_once_with_the_result() {
    let dir = TempDir::new().unwrap();
    let a = valid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let mut calls = Vec::new();
    Batch::new(&resolver, &validator)
        .run_with_callback(Method::Validate, CollectionSource::Path(a), None, |result| {
            calls.push(result.is_ok())
        })
        .await;
    assert_eq!(calls, [true]);
}

#[tokio::test]
async fn bundle_to_directory_writes_two_space_json() {
    let dir = TempDir::new().unwrap();
    let input = valid_collection(dir.path());
    let resolver = RefResolver::default();
    let validator = validator();

    let output = Batch::new(&resolver, &validator)
        .run(Method::Bundle, CollectionSource::Path(input.clone()), None)
        .await
        .unwrap();
    let BatchOutput::One(doc) = output else {
        panic!("single source must produce a single document");
    };

    let format = OutputFormat::default();
    let dest = Destination::from_out(Some(dir.path().join("dist").as_path()));
    let path = dest.path_for(Path::new("collection.json"), format).unwrap();
    write_file(&path, &serialize(&doc, format).unwrap()).unwrap();

    assert_eq!(path, dir.path().join("dist").join("collection.json"));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("{\n  \"info\": {\n    \"name\": \"A\""), "{written}");
    assert_eq!(Node::from_json_str(&written).unwrap(), doc);
}
