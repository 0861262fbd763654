// Typed view of a dereferenced OpenAPI v3 document
// Only the parts the collection transformer reads are modelled

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::schema::Schema;

/// `security` requirement list: each entry maps scheme name -> scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub info: Info,
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Raw path items; `x-` extensions and other non-object entries are skipped later
    pub paths: IndexMap<String, Value>,
    #[serde(default)]
    pub components: Option<Components>,
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}

/// `default` and `enum` keep raw values: YAML reads an unquoted `8080` as a number.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerVariable {
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
}

/// Text form of a scalar; objects, arrays and null have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Server {
    /// Server URL with each `{var}` replaced by its default, else its first enum value,
    /// else a `{{var}}` placeholder.
    pub fn default_url(&self) -> String {
        let mut url = self.url.clone();
        for (name, var) in &self.variables {
            let default = var.default.as_ref().and_then(scalar_text).filter(|d| !d.is_empty());
            let sub = default
                .or_else(|| var.enum_values.first().and_then(scalar_text))
                .unwrap_or_else(|| format!("{{{{{}}}}}", name));
            url = url.replacen(&format!("{{{}}}", name), &sub, 1);
        }
        url
    }
}

/// A path item: shared `parameters` plus one entry per method (and anything else).
#[derive(Debug, Clone, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Vec<Value>,
    #[serde(flatten)]
    pub entries: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationObject {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Value>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
    #[serde(other)]
    Other,
}

impl Default for ParameterLocation {
    fn default() -> Self {
        ParameterLocation::Other
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default, deserialize_with = "deserialize_schema")]
    pub schema: Option<Schema>,
}

fn deserialize_schema<'de, D>(deserializer: D) -> Result<Option<Schema>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(Schema::from_value))
}

/// Version string from the `openapi` field; numbers are accepted as YAML may produce them.
pub fn declared_version(doc: &Value) -> Option<String> {
    doc.get("openapi").and_then(scalar_text)
}
