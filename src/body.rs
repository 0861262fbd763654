// Request body synthesis
// Picks the first declared media type and builds a placeholder payload from its schema

use serde_json::{Map, Value};

use crate::idgen::uid;
use crate::models::{BodySpec, FormField, FormFieldType, FormValue};
use crate::openapi::document::RequestBody;
use crate::openapi::schema::{Schema, SchemaKind};
use crate::params::placeholder;
use crate::utils::safe_stringify_json;

/// Empty-value JSON object for an object schema.
///
/// Nested objects recurse; every other property becomes `"{{dotted.path}}"`.
pub fn build_empty_json_body(schema: &Schema, prefix: Option<&str>) -> Value {
    let mut body = Map::new();
    for (name, prop) in schema.properties() {
        let full_name = match prefix {
            Some(p) if !p.is_empty() => format!("{}.{}", p, name),
            _ => name.clone(),
        };
        let value = match &prop.kind {
            SchemaKind::Object(_) => build_empty_json_body(prop, Some(&full_name)),
            SchemaKind::Array(_)
            | SchemaKind::String
            | SchemaKind::Integer
            | SchemaKind::Number
            | SchemaKind::Boolean
            | SchemaKind::Composite
            | SchemaKind::Any => Value::String(placeholder(&full_name)),
        };
        body.insert(name.clone(), value);
    }
    Value::Object(body)
}

fn form_fields(schema: Option<&Schema>) -> Vec<FormField> {
    let Some(schema) = schema.filter(|s| s.is_object()) else {
        return Vec::new();
    };
    schema
        .properties()
        .map(|(name, prop)| {
            let (kind, value) = if prop.is_binary() {
                (FormFieldType::File, FormValue::Files(Vec::new()))
            } else {
                (FormFieldType::Text, FormValue::Text(String::new()))
            };
            FormField {
                uid: uid(),
                kind,
                name: name.clone(),
                value,
                description: prop.description.clone().unwrap_or_default(),
                enabled: true,
            }
        })
        .collect()
}

/// Body for an operation's `requestBody`; `None` when absent or of an unsupported type.
pub fn synthesize_body(request_body: Option<&RequestBody>) -> BodySpec {
    let Some((mime, media)) = request_body.and_then(|rb| rb.content.first()) else {
        return BodySpec::None;
    };
    let schema = media.schema.as_ref();
    match mime.as_str() {
        "application/json" => {
            let json = match schema {
                Some(s) if s.is_object() => safe_stringify_json(&build_empty_json_body(s, None), true),
                Some(s) if s.kind == SchemaKind::Composite => {
                    log::warn!("allOf/anyOf/oneOf request bodies are not expanded");
                    String::new()
                }
                _ => String::new(),
            };
            BodySpec::Json { json }
        }
        "application/x-www-form-urlencoded" => BodySpec::FormUrlEncoded {
            form_url_encoded: form_fields(schema),
        },
        "multipart/form-data" => BodySpec::MultipartForm {
            multipart_form: form_fields(schema),
        },
        "text/plain" => BodySpec::Text { text: String::new() },
        "text/xml" => BodySpec::Xml { xml: String::new() },
        other => {
            log::warn!("unsupported request body media type {}, leaving body empty", other);
            BodySpec::None
        }
    }
}
