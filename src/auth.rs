// Authentication schemes for openapi-bruno
// Maps OpenAPI security schemes onto the auth shapes a request file can carry

use indexmap::IndexMap;
use serde_json::Value;

use crate::idgen::uid;
use crate::models::{AuthSpec, Header};
use crate::openapi::document::{Document, SecurityRequirement};

/// Closed set of security schemes; anything not materialized is `Other`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Bearer,
    ApiKeyHeader { name: String },
    Other,
}

impl AuthScheme {
    pub fn from_value(scheme: &Value) -> Self {
        let field = |key: &str| scheme.get(key).and_then(|v| v.as_str());
        match (field("type"), field("scheme"), field("in")) {
            (Some("http"), Some(s), _) if s.eq_ignore_ascii_case("basic") => AuthScheme::Basic,
            (Some("http"), Some(s), _) if s.eq_ignore_ascii_case("bearer") => AuthScheme::Bearer,
            (Some("apiKey"), _, Some("header")) => match field("name") {
                Some(name) => AuthScheme::ApiKeyHeader {
                    name: name.to_string(),
                },
                None => AuthScheme::Other,
            },
            _ => AuthScheme::Other,
        }
    }

    /// Request auth plus any header the scheme injects.
    pub fn apply(&self) -> (AuthSpec, Option<Header>) {
        match self {
            AuthScheme::Basic => (
                AuthSpec::Basic {
                    username: "{{username}}".to_string(),
                    password: "{{password}}".to_string(),
                },
                None,
            ),
            AuthScheme::Bearer => (
                AuthSpec::Bearer {
                    token: "{{token}}".to_string(),
                },
                None,
            ),
            AuthScheme::ApiKeyHeader { name } => (
                AuthSpec::None,
                Some(Header {
                    uid: uid(),
                    name: name.clone(),
                    value: "{{apiKey}}".to_string(),
                    description: "Authentication header".to_string(),
                    enabled: true,
                }),
            ),
            AuthScheme::Other => (AuthSpec::None, None),
        }
    }
}

/// Document-level security: the default schemes plus lookup by name.
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    pub supported: Vec<AuthScheme>,
    schemes: IndexMap<String, AuthScheme>,
}

impl SecurityConfig {
    pub fn from_document(doc: &Document) -> Self {
        let declared = match &doc.components {
            Some(c) if !c.security_schemes.is_empty() => &c.security_schemes,
            _ => return SecurityConfig::default(),
        };
        let schemes: IndexMap<String, AuthScheme> = declared
            .iter()
            .map(|(name, value)| (name.clone(), AuthScheme::from_value(value)))
            .collect();
        let supported = doc
            .security
            .iter()
            .map(|req| match first_scheme_name(req).and_then(|n| schemes.get(n)) {
                Some(scheme) => scheme.clone(),
                None => {
                    log::warn!("security requirement {:?} names no declared scheme", req.keys());
                    AuthScheme::Other
                }
            })
            .collect();
        SecurityConfig { supported, schemes }
    }

    pub fn scheme(&self, name: &str) -> Option<&AuthScheme> {
        self.schemes.get(name)
    }

    /// Operation-level `security` wins when non-empty; otherwise the first default scheme.
    pub fn resolve(&self, operation_security: Option<&[SecurityRequirement]>) -> Option<&AuthScheme> {
        match operation_security {
            Some(reqs) if !reqs.is_empty() => first_scheme_name(&reqs[0]).and_then(|n| self.scheme(n)),
            _ => self.supported.first(),
        }
    }
}

fn first_scheme_name(req: &SecurityRequirement) -> Option<&str> {
    req.keys().next().map(|k| k.as_str())
}
