// Schema nodes for request body synthesis
// Raw JSON schema objects are classified once into a closed set of shapes

use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object(IndexMap<String, Schema>),
    Array(Option<Box<Schema>>),
    String,
    Integer,
    Number,
    Boolean,
    /// `allOf` / `anyOf` / `oneOf`; never expanded
    Composite,
    /// No usable `type`
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub format: Option<String>,
    pub description: Option<String>,
}

impl Schema {
    pub fn from_value(value: &Value) -> Schema {
        let text = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Schema {
            kind: classify(value),
            format: text("format"),
            description: text("description"),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, SchemaKind::Object(_))
    }

    /// Object properties in declaration order; empty for every other shape.
    pub fn properties(&self) -> impl Iterator<Item = (&String, &Schema)> {
        let props = match &self.kind {
            SchemaKind::Object(props) => Some(props),
            _ => None,
        };
        props.into_iter().flat_map(|p| p.iter())
    }

    pub fn is_binary(&self) -> bool {
        self.format.as_deref() == Some("binary")
    }
}

fn classify(value: &Value) -> SchemaKind {
    if ["allOf", "anyOf", "oneOf"].iter().any(|k| value.get(k).is_some()) {
        return SchemaKind::Composite;
    }
    match type_name(value).as_deref() {
        Some("object") => {
            let props = value
                .get("properties")
                .and_then(|p| p.as_object())
                .map(|map| {
                    map.iter()
                        .map(|(name, prop)| (name.clone(), Schema::from_value(prop)))
                        .collect()
                })
                .unwrap_or_default();
            SchemaKind::Object(props)
        }
        Some("array") => SchemaKind::Array(
            value
                .get("items")
                .map(|items| Box::new(Schema::from_value(items))),
        ),
        Some("string") => SchemaKind::String,
        Some("integer") => SchemaKind::Integer,
        Some("number") => SchemaKind::Number,
        Some("boolean") => SchemaKind::Boolean,
        _ => SchemaKind::Any,
    }
}

// 3.1 allows `type: ["object", "null"]`; the first non-null entry decides.
fn type_name(value: &Value) -> Option<String> {
    match value.get("type")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null")
            .map(str::to_string),
        _ => None,
    }
}
