// Core data models for openapi-bruno
// The Bruno collection tree: collection, folders, requests and environments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    PUT,
    POST,
    DELETE,
    OPTIONS,
    HEAD,
    PATCH,
    TRACE,
}

impl Method {
    /// Enumeration order used when walking a path item.
    pub const ALL: [Method; 8] = [
        Method::GET,
        Method::PUT,
        Method::POST,
        Method::DELETE,
        Method::OPTIONS,
        Method::HEAD,
        Method::PATCH,
        Method::TRACE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
            Method::PATCH => "PATCH",
            Method::TRACE => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown HTTP method: {}", s))
    }
}

/// Root of an exported collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub uid: String,
    pub version: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Collection {
    pub const VERSION: &'static str = "1";

    pub fn new(name: impl Into<String>, uid: String) -> Self {
        Self {
            name: name.into(),
            uid,
            version: Self::VERSION.to_string(),
            items: Vec::new(),
            environments: Vec::new(),
        }
    }

    /// Every request in the tree, depth-first in document order.
    pub fn requests(&self) -> Vec<&RequestItem> {
        fn walk<'a>(items: &'a [Item], out: &mut Vec<&'a RequestItem>) {
            for item in items {
                match item {
                    Item::Request(r) => out.push(r),
                    Item::Folder(f) => walk(&f.items, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }
}

/// A node in the collection tree. Requests are tried first: only they carry `request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Request(RequestItem),
    Folder(Folder),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Request(r) => &r.name,
            Item::Folder(f) => &f.name,
        }
    }

    pub fn uid(&self) -> &str {
        match self {
            Item::Request(r) => &r.uid,
            Item::Folder(f) => &f.uid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderType {
    #[default]
    #[serde(rename = "folder")]
    Folder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub uid: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FolderType,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Folder {
    pub fn new(uid: String, name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            uid,
            name: name.into(),
            kind: FolderType::Folder,
            items,
        }
    }
}

/// Request item type tag. `http` and `graphql` are legacy spellings rewritten on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "http-request")]
    Http,
    #[serde(rename = "graphql-request")]
    Graphql,
    #[serde(rename = "http")]
    LegacyHttp,
    #[serde(rename = "graphql")]
    LegacyGraphql,
}

impl RequestType {
    pub fn is_legacy(&self) -> bool {
        matches!(self, RequestType::LegacyHttp | RequestType::LegacyGraphql)
    }

    /// Current spelling of this tag.
    pub fn migrated(self) -> Self {
        match self {
            RequestType::LegacyHttp => RequestType::Http,
            RequestType::LegacyGraphql => RequestType::Graphql,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: RequestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u32>,
    pub request: RequestSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub url: String,
    pub method: Method,
    #[serde(default)]
    pub auth: AuthSpec,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Legacy name for `params`; moved into `params` by field migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Vec<Param>>,
    #[serde(default)]
    pub body: BodySpec,
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,
    #[serde(default, skip_serializing_if = "Script::is_empty")]
    pub script: Script,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl RequestSpec {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            auth: AuthSpec::None,
            headers: Vec::new(),
            params: Vec::new(),
            query: None,
            body: BodySpec::None,
            vars: Vars::default(),
            assertions: Vec::new(),
            script: Script::default(),
            tests: None,
            docs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuthSpec {
    #[default]
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl AuthSpec {
    pub fn mode(&self) -> &'static str {
        match self {
            AuthSpec::None => "none",
            AuthSpec::Basic { .. } => "basic",
            AuthSpec::Bearer { .. } => "bearer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Query,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub uid: String,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub uid: String,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
}

/// Request body; exactly one payload exists and it always matches the mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum BodySpec {
    #[default]
    None,
    Json { json: String },
    Text { text: String },
    Xml { xml: String },
    FormUrlEncoded {
        #[serde(rename = "formUrlEncoded")]
        form_url_encoded: Vec<FormField>,
    },
    MultipartForm {
        #[serde(rename = "multipartForm")]
        multipart_form: Vec<FormField>,
    },
}

impl BodySpec {
    /// Mode name as written in the request file's method block.
    pub fn mode(&self) -> &'static str {
        match self {
            BodySpec::None => "none",
            BodySpec::Json { .. } => "json",
            BodySpec::Text { .. } => "text",
            BodySpec::Xml { .. } => "xml",
            BodySpec::FormUrlEncoded { .. } => "formUrlEncoded",
            BodySpec::MultipartForm { .. } => "multipartForm",
        }
    }

    pub fn form_fields_mut(&mut self) -> Option<&mut Vec<FormField>> {
        match self {
            BodySpec::FormUrlEncoded { form_url_encoded } => Some(form_url_encoded),
            BodySpec::MultipartForm { multipart_form } => Some(multipart_form),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFieldType {
    Text,
    File,
}

/// Text fields hold a string, file fields a list of paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Files(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub uid: String,
    #[serde(rename = "type")]
    pub kind: FormFieldType,
    pub name: String,
    pub value: FormValue,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
}

/// A named value with an enable flag; used by request vars and environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub uid: String,
    pub name: String,
    pub value: String,
    pub enabled: bool,
    #[serde(default)]
    pub secret: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vars {
    #[serde(default)]
    pub req: Vec<Variable>,
    #[serde(default)]
    pub res: Vec<Variable>,
}

impl Vars {
    pub fn is_empty(&self) -> bool {
        self.req.is_empty() && self.res.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub uid: String,
    pub name: String,
    pub value: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res: Option<String>,
}

impl Script {
    pub fn is_empty(&self) -> bool {
        self.req.is_none() && self.res.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

/// Contents of `bruno.json` at the collection root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Manifest {
    pub fn for_collection(name: impl Into<String>) -> Self {
        Self {
            version: Collection::VERSION.to_string(),
            name: name.into(),
            kind: "collection".to_string(),
        }
    }
}
