/// Integration tests for the OpenAPI to collection pipeline
/// Tests end-to-end conversion scenarios through the public API
use openapi_bruno::importer::{import_collection, parse_collection, ImportOptions};
use openapi_bruno::models::{BodySpec, Item, Method, ParamType};
use openapi_bruno::params::merge_parameters;
use openapi_bruno::postprocess::hydrate_seq;
use openapi_bruno::Error;
use serde_json::{json, Value};
use std::io::Write;

fn petstore() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Petstore", "version": "1.0.0"},
        "servers": [{"url": "https://petstore.example.com/v1"}],
        "paths": {
            "/pets/{petId}": {
                "get": {
                    "tags": ["pets"],
                    "summary": "Get a pet",
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ]
                }
            }
        }
    })
}

#[test]
fn test_petstore_get_pet() {
    let collection = parse_collection(petstore()).expect("Petstore should convert");

    assert_eq!(collection.name, "Petstore");
    assert_eq!(collection.items.len(), 1, "Should produce exactly one folder");

    let folder = match &collection.items[0] {
        Item::Folder(f) => f,
        other => panic!("Expected a folder, got {:?}", other),
    };
    assert_eq!(folder.name, "pets");
    assert_eq!(folder.items.len(), 1);

    let request = match &folder.items[0] {
        Item::Request(r) => r,
        other => panic!("Expected a request, got {:?}", other),
    };
    assert_eq!(request.name, "Get a pet");
    assert_eq!(request.filename, "get-pets-pet-id");
    assert_eq!(request.seq, Some(1));
    assert_eq!(request.request.method, Method::GET);
    assert_eq!(request.request.url, "{{url}}/pets/:petId");

    let params = &request.request.params;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "petId");
    assert_eq!(params[0].value, "{{petId}}");
    assert_eq!(params[0].kind, ParamType::Path);
    assert!(params[0].enabled, "Required path params are enabled");
}

#[test]
fn test_json_body_placeholders() {
    let doc = json!({
        "openapi": "3.0.3",
        "info": {"title": "Users"},
        "paths": {
            "/users": {
                "post": {
                    "summary": "Create user",
                    "requestBody": {"content": {"application/json": {"schema": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "address": {"type": "object", "properties": {
                                "city": {"type": "string"},
                                "geo": {"type": "object", "properties": {"lat": {"type": "number"}}}
                            }},
                            "tags": {"type": "array", "items": {"type": "string"}}
                        }
                    }}}}
                }
            }
        }
    });
    let collection = parse_collection(doc).unwrap();
    let requests = collection.requests();
    let json = match &requests[0].request.body {
        BodySpec::Json { json } => json.clone(),
        other => panic!("Expected json body, got {:?}", other),
    };
    let payload: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        payload,
        json!({
            "name": "{{name}}",
            "address": {"city": "{{address.city}}", "geo": {"lat": "{{address.geo.lat}}"}},
            "tags": "{{tags}}"
        })
    );
}

#[test]
fn test_refs_are_resolved_before_synthesis() {
    let doc = json!({
        "openapi": "3.0.0",
        "info": {"title": "Refs"},
        "components": {
            "parameters": {"Limit": {"name": "limit", "in": "query"}},
            "schemas": {"Pet": {"type": "object", "properties": {"name": {"type": "string"}}}}
        },
        "paths": {"/pets": {"post": {
            "parameters": [{"$ref": "#/components/parameters/Limit"}],
            "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}}
        }}}
    });
    let resolved = openapi_bruno::openapi::dereference(&doc).unwrap();
    let collection = parse_collection(resolved).unwrap();
    let request = &collection.requests()[0].request;
    assert_eq!(request.params[0].name, "limit");
    assert!(!request.params[0].enabled);
    assert!(matches!(&request.body, BodySpec::Json { json } if json.contains("{{name}}")));
}

#[test]
fn test_tag_grouping_order() {
    let doc = json!({
        "openapi": "3.0.0",
        "info": {"title": "Grouping"},
        "paths": {
            "/a": {"get": {"tags": ["a"], "summary": "tagged"}},
            "/b": {"get": {"summary": "untagged"}}
        }
    });
    let collection = parse_collection(doc).unwrap();
    assert_eq!(collection.items.len(), 2);
    match &collection.items[0] {
        Item::Folder(f) => {
            assert_eq!(f.name, "a");
            assert_eq!(f.items.len(), 1);
        }
        other => panic!("Expected folder first, got {:?}", other),
    }
    assert!(matches!(&collection.items[1], Item::Request(r) if r.name == "untagged"));
}

#[test]
fn test_unsupported_version_rejected() {
    for version in [json!("2.0"), json!("4.0.0"), json!(2)] {
        let doc = json!({"openapi": version, "info": {"title": "Old"}, "paths": {}});
        let result = parse_collection(doc);
        assert!(
            matches!(result, Err(Error::UnsupportedVersion(_))),
            "version {} should be rejected",
            version
        );
    }
}

#[test]
fn test_parameter_merge_is_idempotent() {
    let path_level = vec![
        json!({"name": "id", "in": "path", "required": true}),
        json!({"name": "verbose", "in": "query", "required": true}),
    ];
    let operation_level = vec![
        json!({"name": "verbose", "in": "query", "required": false}),
        json!({"in": "query"}),
    ];
    let once = merge_parameters(&path_level, &operation_level);
    let twice = merge_parameters(&once, &operation_level);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2, "Nameless entries are dropped");
    assert_eq!(once[1]["required"], json!(false), "Operation level wins");
}

#[test]
fn test_seq_hydration_is_stable() {
    let collection = parse_collection(json!({
        "openapi": "3.0.0",
        "info": {"title": "Seq"},
        "paths": {"/a": {"get": {}, "post": {}, "delete": {}}}
    }))
    .unwrap();
    let before: Vec<Option<u32>> = collection.requests().iter().map(|r| r.seq).collect();
    assert_eq!(before, vec![Some(1), Some(2), Some(3)]);

    let again = hydrate_seq(collection.clone());
    assert_eq!(again, collection);
}

#[tokio::test]
async fn test_import_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "openapi: 3.0.0\ninfo:\n  title: Yaml API\npaths:\n  /health:\n    get:\n      summary: Health\n      responses:\n        200:\n          description: ok\n"
    )
    .unwrap();

    let path = file.path().to_string_lossy().into_owned();
    let collection = import_collection(&path, &ImportOptions::default()).await.unwrap();
    assert_eq!(collection.name, "Yaml API");
    assert_eq!(collection.requests()[0].name, "Health");
}

#[tokio::test]
async fn test_yaml_numeric_server_variable() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "openapi: 3.0.0\ninfo:\n  title: Ports\nservers:\n  - url: http://localhost:{{port}}/api\n    description: Local\n    variables:\n      port:\n        default: 8080\npaths:\n  /ping:\n    get:\n      summary: Ping\n"
    )
    .unwrap();

    let options = ImportOptions {
        environments_from_servers: true,
        ..Default::default()
    };
    let path = file.path().to_string_lossy().into_owned();
    let collection = import_collection(&path, &options)
        .await
        .expect("Unquoted numeric defaults should be accepted");
    assert_eq!(collection.environments.len(), 1);
    assert_eq!(collection.environments[0].variables[0].value, "http://localhost:8080/api");
}

#[tokio::test]
async fn test_recursive_schema_still_converts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r##"{{
            "openapi": "3.0.0",
            "info": {{"title": "Loop"}},
            "components": {{"schemas": {{"Node": {{"type": "object", "properties": {{
                "name": {{"type": "string"}},
                "next": {{"$ref": "#/components/schemas/Node"}}
            }}}}}}}},
            "paths": {{
                "/health": {{"get": {{"summary": "Health"}}}},
                "/nodes": {{"post": {{"summary": "Create node", "requestBody": {{"content": {{
                    "application/json": {{"schema": {{"$ref": "#/components/schemas/Node"}}}}
                }}}}}}}}
            }}
        }}"##
    )
    .unwrap();

    let path = file.path().to_string_lossy().into_owned();
    let collection = import_collection(&path, &ImportOptions::default())
        .await
        .expect("Recursive schemas should not block the import");
    let requests = collection.requests();
    assert_eq!(requests.len(), 2);

    // the repeated reference is not expanded; it becomes a plain placeholder
    let json = match &requests[1].request.body {
        BodySpec::Json { json } => json.clone(),
        other => panic!("Expected json body, got {:?}", other),
    };
    let payload: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(payload, json!({"name": "{{name}}", "next": "{{next}}"}));
}
