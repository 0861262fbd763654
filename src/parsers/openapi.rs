// OpenAPI to Bruno collection transformer
// Walks a dereferenced document, groups operations by tag and builds request items

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::auth::SecurityConfig;
use crate::body::synthesize_body;
use crate::error::{Error, Result};
use crate::idgen::{uid, uid_from_hash};
use crate::models::{
    Collection, Environment, Folder, Item, Method, RequestItem, RequestSpec, RequestType, Variable,
};
use crate::openapi::document::{
    declared_version, Document, OperationObject, Parameter, PathItem, Server,
};
use crate::params::{merge_parameters, synthesize_parameters};
use crate::utils::{hyphen_case, sanitize_directory_name};

lazy_static! {
    static ref PATH_PARAM: Regex = Regex::new(r"\{([^{}]*)\}").unwrap();
}

/// Document-wide context shared by every operation
#[derive(Debug, Clone, Default)]
pub struct GlobalContext {
    pub base_url: String,
    pub security: SecurityConfig,
}

/// One (path, method) pair with its merged parameters
#[derive(Debug, Clone)]
pub struct Operation<'a> {
    pub method: Method,
    /// Method key exactly as written in the document
    pub method_key: String,
    pub path: String,
    pub object: OperationObject,
    pub parameters: Vec<Parameter>,
    pub global: &'a GlobalContext,
}

/// Extension points around the transformation; every method defaults to a pass-through.
pub trait ImportHooks {
    fn before_collection(&self, document: Value) -> Value {
        document
    }

    fn after_request(&self, item: RequestItem, _operation: &Operation<'_>) -> RequestItem {
        item
    }

    fn after_collection(&self, collection: Collection) -> Collection {
        collection
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ImportHooks for NoHooks {}

#[derive(Debug, Default)]
pub struct OpenApiParser<H: ImportHooks = NoHooks> {
    hooks: H,
    server_environments: bool,
}

impl OpenApiParser<NoHooks> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: ImportHooks> OpenApiParser<H> {
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            hooks,
            server_environments: false,
        }
    }

    /// Also emit one environment per declared server.
    pub fn server_environments(mut self, enabled: bool) -> Self {
        self.server_environments = enabled;
        self
    }

    /// Transform `document` into a collection.
    ///
    /// A non-3.x `openapi` version fails with `UnsupportedVersion`; every other failure is
    /// reported as a single `CollectionParse`.
    pub fn parse(&self, document: Value) -> Result<Collection> {
        let document = self.hooks.before_collection(document);
        if let Some(version) = declared_version(&document) {
            if !version.starts_with('3') {
                return Err(Error::UnsupportedVersion(version));
            }
        }
        self.transform(document).map_err(|e| match e {
            Error::CollectionParse(_) => e,
            other => Error::CollectionParse(other.to_string()),
        })
    }

    fn transform(&self, document: Value) -> Result<Collection> {
        let doc: Document =
            serde_json::from_value(document).map_err(|e| Error::CollectionParse(e.to_string()))?;

        let name = doc.info.title.clone();
        if sanitize_directory_name(&name).trim().is_empty() {
            return Err(Error::CollectionParse("info.title is empty".to_string()));
        }

        let global = GlobalContext {
            base_url: doc.servers.first().map(Server::default_url).unwrap_or_default(),
            security: SecurityConfig::from_document(&doc),
        };
        log::debug!("base url: {:?}", global.base_url);

        let operations = collect_operations(&doc, &global)?;
        log::info!("found {} operations in {:?}", operations.len(), name);

        let (groups, ungrouped) = group_by_tag(operations);
        let mut collection = Collection::new(name, uid());
        for (tag, ops) in groups {
            let items = ops.iter().map(|op| Item::Request(self.request_item(op))).collect();
            collection.items.push(Item::Folder(Folder::new(uid(), tag, items)));
        }
        for op in &ungrouped {
            collection.items.push(Item::Request(self.request_item(op)));
        }

        if self.server_environments {
            collection.environments = server_environments(&doc.servers);
        }

        Ok(self.hooks.after_collection(collection))
    }

    fn request_item(&self, op: &Operation<'_>) -> RequestItem {
        let item = synthesize_request(op);
        self.hooks.after_request(item, op)
    }
}

/// Every (path, method) pair in path order, then in `Method::ALL` order.
///
/// Keys that differ only in case (`get` and `GET`) each produce an operation.
pub fn collect_operations<'a>(doc: &Document, global: &'a GlobalContext) -> Result<Vec<Operation<'a>>> {
    let mut operations = Vec::new();
    for (path, raw) in &doc.paths {
        if !raw.is_object() {
            log::warn!("skipping path {}: path item is not an object", path);
            continue;
        }
        let item: PathItem = serde_json::from_value(raw.clone())
            .map_err(|e| Error::CollectionParse(format!("{}: {}", path, e)))?;
        for method in Method::ALL {
            let matching = item
                .entries
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(method.as_str()));
            for (key, value) in matching {
                if !value.is_object() {
                    log::warn!("skipping {} {}: operation is not an object", key, path);
                    continue;
                }
                let object: OperationObject = serde_json::from_value(value.clone())
                    .map_err(|e| Error::CollectionParse(format!("{} {}: {}", key, path, e)))?;
                let parameters = merge_parameters(&item.parameters, &object.parameters)
                    .into_iter()
                    .map(serde_json::from_value::<Parameter>)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::CollectionParse(format!("{} {}: parameter: {}", key, path, e)))?;
                operations.push(Operation {
                    method,
                    method_key: key.clone(),
                    path: path.clone(),
                    object,
                    parameters,
                    global,
                });
            }
        }
    }
    Ok(operations)
}

/// Group by first tag in first-seen order; untagged operations keep discovery order.
pub fn group_by_tag(operations: Vec<Operation<'_>>) -> (IndexMap<String, Vec<Operation<'_>>>, Vec<Operation<'_>>) {
    let mut groups: IndexMap<String, Vec<Operation<'_>>> = IndexMap::new();
    let mut ungrouped = Vec::new();
    for op in operations {
        match op.object.tags.first().filter(|t| !t.trim().is_empty()) {
            Some(tag) => groups.entry(tag.clone()).or_default().push(op),
            None => ungrouped.push(op),
        }
    }
    (groups, ungrouped)
}

/// First non-empty of summary, operationId, description; else `"<METHOD> <path>"`.
pub fn display_name(op: &Operation<'_>) -> String {
    [&op.object.summary, &op.object.operation_id, &op.object.description]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("{} {}", op.method, op.path))
}

/// `/pets/{petId}` -> `{{url}}/pets/:petId`
pub fn request_url(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    format!("{{{{url}}}}/{}", PATH_PARAM.replace_all(trimmed, ":$1"))
}

/// Map one operation to one request item.
pub fn synthesize_request(op: &Operation<'_>) -> RequestItem {
    let mut request = RequestSpec::new(op.method, request_url(&op.path));
    let (params, headers) = synthesize_parameters(&op.parameters);
    request.params = params;
    request.headers = headers;

    if let Some(scheme) = op.global.security.resolve(op.object.security.as_deref()) {
        let (auth, header) = scheme.apply();
        request.auth = auth;
        request.headers.extend(header);
    }

    request.body = synthesize_body(op.object.request_body.as_ref());

    let item = RequestItem {
        uid: uid(),
        name: display_name(op),
        filename: hyphen_case(&format!("{} {}", op.method_key, op.path)),
        kind: RequestType::Http,
        seq: None,
        request,
    };
    log::debug!("{} {} -> {:?}", op.method, op.path, item.name);
    item
}

/// One environment per server, each holding a `url` variable. Ids derive from the
/// server so repeated imports keep them stable.
pub fn server_environments(servers: &[Server]) -> Vec<Environment> {
    servers
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let name = server
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| format!("Server {}", i + 1));
            let url = server.default_url();
            let env_uid = uid_from_hash(&format!("{}#{}#{}", i, name, url));
            Environment {
                uid: env_uid.clone(),
                name,
                variables: vec![Variable {
                    uid: uid_from_hash(&format!("{}#url", env_uid)),
                    name: "url".to_string(),
                    value: url,
                    enabled: true,
                    secret: false,
                }],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthSpec, BodySpec, ParamType};
    use serde_json::json;

    fn op_doc(op: Value) -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "T"},
            "paths": {"/pets/{petId}": {"get": op}}
        })
    }

    fn only_request(c: &Collection) -> &RequestItem {
        let reqs = c.requests();
        assert_eq!(reqs.len(), 1);
        reqs[0]
    }

    #[test]
    fn rejects_non_v3() {
        let err = OpenApiParser::new()
            .parse(json!({"openapi": "2.0", "info": {"title": "T"}, "paths": {}}))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn missing_version_is_accepted() {
        let c = OpenApiParser::new()
            .parse(json!({"info": {"title": "T"}, "paths": {}}))
            .unwrap();
        assert_eq!(c.name, "T");
        assert_eq!(c.version, "1");
        assert!(c.items.is_empty());
        assert!(c.environments.is_empty());
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        let p = OpenApiParser::new();
        for doc in [
            json!({"openapi": "3.0.0", "paths": {}}),
            json!({"openapi": "3.0.0", "info": {"title": "T"}, "paths": []}),
            json!({"openapi": "3.0.0", "info": {"title": "  "}, "paths": {}}),
            json!({"openapi": "3.0.0", "info": {"title": "T"}, "paths": {"/a": {"get": {"tags": "x"}}}}),
        ] {
            assert!(matches!(p.parse(doc), Err(Error::CollectionParse(_))));
        }
    }

    #[test]
    fn display_name_priority() {
        let p = OpenApiParser::new();
        let cases = [
            (json!({"summary": "S", "operationId": "O", "description": "D"}), "S"),
            (json!({"summary": "", "operationId": "O", "description": "D"}), "O"),
            (json!({"description": "D"}), "D"),
            (json!({}), "GET /pets/{petId}"),
        ];
        for (op, expected) in cases {
            let c = p.parse(op_doc(op)).unwrap();
            assert_eq!(only_request(&c).name, expected);
        }
    }

    #[test]
    fn url_and_filename() {
        assert_eq!(request_url("/pets/{petId}"), "{{url}}/pets/:petId");
        assert_eq!(request_url("users/{id}/posts/{postId}"), "{{url}}/users/:id/posts/:postId");
        assert_eq!(request_url("/"), "{{url}}/");
        let c = OpenApiParser::new().parse(op_doc(json!({}))).unwrap();
        assert_eq!(only_request(&c).filename, "get-pets-pet-id");
    }

    #[test]
    fn non_object_operations_are_skipped() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {"/a": {"get": "nope", "POST": {"summary": "Create"}, "x-extra": {}}}
            }))
            .unwrap();
        let reqs = c.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].request.method, Method::POST);
        assert_eq!(reqs[0].filename, "post-a");
    }

    #[test]
    fn extension_keys_under_paths_are_skipped() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {
                    "x-internal": true,
                    "x-owner": "team-a",
                    "x-meta": {"note": "no methods here"},
                    "/a": {"get": {"summary": "A"}}
                }
            }))
            .unwrap();
        let names: Vec<&str> = c.requests().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn method_keys_differing_in_case_are_both_kept() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {"/a": {"get": {"summary": "lower"}, "GET": {"summary": "upper"}}}
            }))
            .unwrap();
        let reqs = c.requests();
        let seen: Vec<(&str, &str)> = reqs.iter().map(|r| (r.name.as_str(), r.filename.as_str())).collect();
        assert_eq!(seen, vec![("lower", "get-a"), ("upper", "get-a")]);
    }

    #[test]
    fn methods_follow_enumeration_order() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {"/a": {"trace": {}, "post": {}, "get": {}}}
            }))
            .unwrap();
        let methods: Vec<Method> = c.requests().iter().map(|r| r.request.method).collect();
        assert_eq!(methods, vec![Method::GET, Method::POST, Method::TRACE]);
    }

    #[test]
    fn grouping_folders_then_ungrouped() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {
                    "/x": {"get": {"summary": "untagged"}},
                    "/b": {"get": {"tags": ["b"], "summary": "b1"}},
                    "/a": {"get": {"tags": ["a", "b"], "summary": "a1"}, "post": {"tags": ["b"], "summary": "b2"}}
                }
            }))
            .unwrap();
        let names: Vec<&str> = c.items.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["b", "a", "untagged"]);
        match &c.items[0] {
            Item::Folder(f) => {
                let inner: Vec<&str> = f.items.iter().map(|i| i.name()).collect();
                assert_eq!(inner, vec!["b1", "b2"]);
            }
            other => panic!("expected folder, got {:?}", other),
        }
    }

    #[test]
    fn path_level_parameters_are_merged() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {"/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true},
                        {"name": "verbose", "in": "query", "required": true}
                    ],
                    "get": {"parameters": [
                        {"name": "verbose", "in": "query", "required": false},
                        {"name": "X-Req", "in": "header"}
                    ]}
                }}
            }))
            .unwrap();
        let req = &only_request(&c).request;
        assert_eq!(req.params.len(), 2);
        assert_eq!(req.params[0].name, "petId");
        assert_eq!(req.params[0].kind, ParamType::Path);
        assert_eq!(req.params[1].name, "verbose");
        assert!(!req.params[1].enabled);
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.headers[0].name, "X-Req");
    }

    #[test]
    fn auth_resolution() {
        let doc = json!({
            "openapi": "3.0.0",
            "info": {"title": "T"},
            "security": [{"basic": []}],
            "components": {"securitySchemes": {
                "basic": {"type": "http", "scheme": "basic"},
                "bearer": {"type": "http", "scheme": "bearer"},
                "key": {"type": "apiKey", "in": "header", "name": "X-API-Key"},
                "oauth": {"type": "oauth2"}
            }},
            "paths": {
                "/default": {"get": {}},
                "/bearer": {"get": {"security": [{"bearer": []}]}},
                "/key": {"get": {"security": [{"key": []}]}},
                "/oauth": {"get": {"security": [{"oauth": ["read"]}]}}
            }
        });
        let c = OpenApiParser::new().parse(doc).unwrap();
        let reqs = c.requests();
        assert_eq!(reqs[0].request.auth.mode(), "basic");
        assert_eq!(reqs[1].request.auth, AuthSpec::Bearer { token: "{{token}}".to_string() });
        assert_eq!(reqs[2].request.auth, AuthSpec::None);
        assert_eq!(reqs[2].request.headers[0].name, "X-API-Key");
        assert_eq!(reqs[2].request.headers[0].value, "{{apiKey}}");
        assert_eq!(reqs[3].request.auth, AuthSpec::None);
        assert!(reqs[3].request.headers.is_empty());
    }

    #[test]
    fn json_body_end_to_end() {
        let c = OpenApiParser::new()
            .parse(json!({
                "openapi": "3.0.0",
                "info": {"title": "T"},
                "paths": {"/pets": {"post": {"requestBody": {"content": {"application/json": {
                    "schema": {"type": "object", "properties": {"name": {"type": "string"}}}
                }}}}}}
            }))
            .unwrap();
        match &only_request(&c).request.body {
            BodySpec::Json { json } => {
                let v: Value = serde_json::from_str(json).unwrap();
                assert_eq!(v, json!({"name": "{{name}}"}));
            }
            other => panic!("expected json body, got {:?}", other),
        }
    }

    #[test]
    fn server_environments_when_enabled() {
        let doc = json!({
            "openapi": "3.0.0",
            "info": {"title": "T"},
            "servers": [
                {"url": "https://{region}.api.test", "description": "Production",
                 "variables": {"region": {"default": "eu"}}},
                {"url": "http://localhost:8080"}
            ],
            "paths": {}
        });
        let plain = OpenApiParser::new().parse(doc.clone()).unwrap();
        assert!(plain.environments.is_empty());

        let c = OpenApiParser::new().server_environments(true).parse(doc.clone()).unwrap();
        assert_eq!(c.environments.len(), 2);
        assert_eq!(c.environments[0].name, "Production");
        assert_eq!(c.environments[0].variables[0].value, "https://eu.api.test");
        assert_eq!(c.environments[1].name, "Server 2");

        let again = OpenApiParser::new().server_environments(true).parse(doc).unwrap();
        assert_eq!(c.environments[0].uid, again.environments[0].uid);
    }

    struct Prefix;

    impl ImportHooks for Prefix {
        fn after_request(&self, mut item: RequestItem, operation: &Operation<'_>) -> RequestItem {
            item.name = format!("[{}] {}", operation.method, item.name);
            item
        }

        fn after_collection(&self, mut collection: Collection) -> Collection {
            collection.name.push_str(" (imported)");
            collection
        }
    }

    #[test]
    fn hooks_are_applied() {
        let c = OpenApiParser::with_hooks(Prefix)
            .parse(op_doc(json!({"summary": "Get a pet"})))
            .unwrap();
        assert_eq!(c.name, "T (imported)");
        assert_eq!(only_request(&c).name, "[GET] Get a pet");
    }
}
