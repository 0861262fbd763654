// Bruno collection reader for openapi-bruno
// Uses walkdir and regex to read .bru files back into request items

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::idgen::uid;
use crate::utils::{safe_parse_json, safe_stringify_json};
use crate::models::{
    Assertion, AuthSpec, BodySpec, Environment, FormField, FormFieldType, FormValue, Header,
    Method, Param, ParamType, RequestItem, RequestSpec, RequestType, Variable,
};

lazy_static! {
    static ref BLOCK_START: Regex = Regex::new(r"^([A-Za-z][\w:\-]*) ([\{\[])$").unwrap();
}

struct Block {
    name: String,
    lines: Vec<String>,
}

fn blocks(text: &str) -> Result<Vec<Block>> {
    let mut out = Vec::new();
    let mut current: Option<(Block, &str)> = None;
    for (n, line) in text.lines().enumerate() {
        if let Some((block, close)) = current.as_mut() {
            if line != *close {
                block.lines.push(line.strip_prefix("  ").unwrap_or(line).to_string());
                continue;
            }
            if let Some((block, _)) = current.take() {
                out.push(block);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let caps = BLOCK_START
            .captures(line)
            .ok_or_else(|| bru_error(format!("line {}: expected a block, found {:?}", n + 1, line)))?;
        let close = if &caps[2] == "{" { "}" } else { "]" };
        current = Some((
            Block {
                name: caps[1].to_string(),
                lines: Vec::new(),
            },
            close,
        ));
    }
    match current {
        Some((block, _)) => Err(bru_error(format!("unterminated block {}", block.name))),
        None => Ok(out),
    }
}

fn bru_error(msg: String) -> Error {
    Error::CollectionParse(format!("invalid bru file: {}", msg))
}

/// Split at the first `": "`, so keys may themselves contain `:`. A line ending in `:`
/// is a key with an empty value.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    line.split_once(": ")
        .or_else(|| line.strip_suffix(':').map(|key| (key, "")))
        .or_else(|| line.split_once(':'))
}

/// `[~]key: value` pairs; the `~` prefix marks a disabled entry.
fn pairs(block: &Block) -> Vec<(String, String, bool)> {
    block
        .lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| {
            let (key, value) = split_entry(l)?;
            match key.strip_prefix('~') {
                Some(k) => Some((k.to_string(), value.to_string(), false)),
                None => Some((key.to_string(), value.to_string(), true)),
            }
        })
        .collect()
}

fn text(block: &Block) -> String {
    block.lines.join("\n")
}

fn lookup<'a>(pairs: &'a [(String, String, bool)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _, _)| k == key)
        .map(|(_, v, _)| v.as_str())
}

fn form_fields(block: &Block) -> Vec<FormField> {
    pairs(block)
        .into_iter()
        .map(|(name, value, enabled)| {
            let (kind, value) = match value.strip_prefix("@file(").and_then(|v| v.strip_suffix(')')) {
                Some(paths) => (
                    FormFieldType::File,
                    FormValue::Files(paths.split('|').filter(|p| !p.is_empty()).map(str::to_string).collect()),
                ),
                None => (FormFieldType::Text, FormValue::Text(value)),
            };
            FormField {
                uid: uid(),
                kind,
                name,
                value,
                description: String::new(),
                enabled,
            }
        })
        .collect()
}

fn variables(block: &Block) -> Vec<Variable> {
    pairs(block)
        .into_iter()
        .map(|(name, value, enabled)| Variable {
            uid: uid(),
            name,
            value,
            enabled,
            secret: false,
        })
        .collect()
}

/// Re-indent a JSON body; text that is not JSON (templates, partial edits) is kept as written.
fn normalize_json(text: String) -> String {
    match safe_parse_json(&text) {
        Value::String(_) => text,
        parsed => safe_stringify_json(&parsed, true),
    }
}

/// Read a request file back into a request item. `filename` is left empty.
pub fn parse_request(content: &str) -> Result<RequestItem> {
    let blocks = blocks(content)?;
    let find = |name: &str| blocks.iter().find(|b| b.name == name);

    let meta = pairs(find("meta").ok_or_else(|| bru_error("missing meta block".to_string()))?);
    let (method, method_block) = blocks
        .iter()
        .find_map(|b| b.name.parse::<Method>().ok().map(|m| (m, b)))
        .ok_or_else(|| bru_error("missing method block".to_string()))?;
    let http = pairs(method_block);

    let mut request = RequestSpec::new(method, lookup(&http, "url").unwrap_or_default());

    for (block_name, kind) in [("params:query", ParamType::Query), ("params:path", ParamType::Path)] {
        if let Some(b) = find(block_name) {
            request.params.extend(pairs(b).into_iter().map(|(name, value, enabled)| Param {
                uid: uid(),
                name,
                value,
                description: String::new(),
                kind,
                enabled,
            }));
        }
    }
    if let Some(b) = find("headers") {
        request.headers = pairs(b)
            .into_iter()
            .map(|(name, value, enabled)| Header {
                uid: uid(),
                name,
                value,
                description: String::new(),
                enabled,
            })
            .collect();
    }

    request.auth = match lookup(&http, "auth").unwrap_or("none") {
        "basic" => {
            let b = find("auth:basic").map(pairs).unwrap_or_default();
            AuthSpec::Basic {
                username: lookup(&b, "username").unwrap_or_default().to_string(),
                password: lookup(&b, "password").unwrap_or_default().to_string(),
            }
        }
        "bearer" => {
            let b = find("auth:bearer").map(pairs).unwrap_or_default();
            AuthSpec::Bearer {
                token: lookup(&b, "token").unwrap_or_default().to_string(),
            }
        }
        _ => AuthSpec::None,
    };

    let body_text = |name: &str| find(name).map(text).unwrap_or_default();
    let body_form = |name: &str| find(name).map(form_fields).unwrap_or_default();
    request.body = match lookup(&http, "body").unwrap_or("none") {
        "json" => BodySpec::Json { json: normalize_json(body_text("body:json")) },
        "text" => BodySpec::Text { text: body_text("body:text") },
        "xml" => BodySpec::Xml { xml: body_text("body:xml") },
        "formUrlEncoded" => BodySpec::FormUrlEncoded {
            form_url_encoded: body_form("body:form-urlencoded"),
        },
        "multipartForm" => BodySpec::MultipartForm {
            multipart_form: body_form("body:multipart-form"),
        },
        _ => BodySpec::None,
    };

    request.vars.req = find("vars:pre-request").map(variables).unwrap_or_default();
    request.vars.res = find("vars:post-response").map(variables).unwrap_or_default();
    if let Some(b) = find("assert") {
        request.assertions = pairs(b)
            .into_iter()
            .map(|(name, value, enabled)| Assertion {
                uid: uid(),
                name,
                value,
                enabled,
            })
            .collect();
    }
    request.script.req = find("script:pre-request").map(text);
    request.script.res = find("script:post-response").map(text);
    request.tests = find("tests").map(text);
    request.docs = find("docs").map(text);

    Ok(RequestItem {
        uid: uid(),
        name: lookup(&meta, "name").unwrap_or_default().to_string(),
        filename: String::new(),
        kind: match lookup(&meta, "type") {
            Some("graphql") => RequestType::Graphql,
            _ => RequestType::Http,
        },
        seq: lookup(&meta, "seq").and_then(|s| s.trim().parse().ok()),
        request,
    })
}

/// Read an environment file back. The name is not stored in the file.
pub fn parse_environment(name: &str, content: &str) -> Result<Environment> {
    let blocks = blocks(content)?;
    let mut variables = blocks
        .iter()
        .find(|b| b.name == "vars")
        .map(variables)
        .unwrap_or_default();
    if let Some(secret) = blocks.iter().find(|b| b.name == "vars:secret") {
        for line in &secret.lines {
            let entry = line.trim().trim_end_matches(',');
            if entry.is_empty() {
                continue;
            }
            let (name, enabled) = match entry.strip_prefix('~') {
                Some(n) => (n, false),
                None => (entry, true),
            };
            variables.push(Variable {
                uid: uid(),
                name: name.to_string(),
                value: String::new(),
                enabled,
                secret: true,
            });
        }
    }
    Ok(Environment {
        uid: uid(),
        name: name.to_string(),
        variables,
    })
}

/// Every request file under `dir`, sorted by path. Environment files are skipped.
pub fn read_collection(dir: &Path) -> Result<Vec<(PathBuf, RequestItem)>> {
    let env_dir = dir.join("environments");
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            Error::filesystem(path, e.into())
        })?;
        let path = entry.path();
        if path.starts_with(&env_dir) || path.extension().map_or(true, |ext| ext != "bru") {
            continue;
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
        let mut item = parse_request(&content)
            .map_err(|e| Error::CollectionParse(format!("{}: {}", path.display(), e)))?;
        item.filename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
        out.push((relative, item));
    }
    Ok(out)
}
