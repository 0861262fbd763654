// Bru file serializer
// Renders request items and environments into Bruno's block-structured text format
//
// Block order is fixed so identical input always yields identical bytes:
//   meta, <method>, params:query, params:path, headers, auth:*, body:*,
//   vars:pre-request, vars:post-response, assert, script:*, tests, docs

use crate::models::{
    AuthSpec, BodySpec, Environment, FormField, FormFieldType, FormValue, Header, Param,
    ParamType, RequestItem, RequestType, Variable,
};

const INDENT: &str = "  ";

/// Indent every non-empty line of `text` by two spaces.
fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn entry(name: &str, value: &str, enabled: bool) -> String {
    format!("{}{}{}: {}", INDENT, if enabled { "" } else { "~" }, name, value)
}

/// `name { ... }` block with one `key: value` per line.
fn dict_block(name: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        format!("{} {{\n}}", name)
    } else {
        format!("{} {{\n{}\n}}", name, entries.join("\n"))
    }
}

/// `name { ... }` block holding free text.
fn text_block(name: &str, text: &str) -> String {
    format!("{} {{\n{}\n}}", name, indent(text))
}

fn param_entries(params: &[Param], kind: ParamType) -> Vec<String> {
    params
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| entry(&p.name, &p.value, p.enabled))
        .collect()
}

fn header_entries(headers: &[Header]) -> Vec<String> {
    headers
        .iter()
        .map(|h| entry(&h.name, &h.value, h.enabled))
        .collect()
}

fn var_entries(vars: &[Variable]) -> Vec<String> {
    vars.iter()
        .map(|v| entry(&v.name, &v.value, v.enabled))
        .collect()
}

fn form_entries(fields: &[FormField]) -> Vec<String> {
    fields
        .iter()
        .map(|f| {
            let value = match (&f.kind, &f.value) {
                (FormFieldType::File, FormValue::Files(paths)) => format!("@file({})", paths.join("|")),
                (FormFieldType::File, FormValue::Text(path)) => format!("@file({})", path),
                (FormFieldType::Text, FormValue::Text(text)) => text.clone(),
                (FormFieldType::Text, FormValue::Files(paths)) => paths.join("|"),
            };
            entry(&f.name, &value, f.enabled)
        })
        .collect()
}

/// Render one request item as the contents of a `.bru` file.
pub fn request_to_bru(item: &RequestItem) -> String {
    let req = &item.request;
    let mut blocks = Vec::new();

    let mut meta = vec![format!("{}name: {}", INDENT, item.name)];
    let kind = match item.kind {
        RequestType::Http | RequestType::LegacyHttp => "http",
        RequestType::Graphql | RequestType::LegacyGraphql => "graphql",
    };
    meta.push(format!("{}type: {}", INDENT, kind));
    if let Some(seq) = item.seq {
        meta.push(format!("{}seq: {}", INDENT, seq));
    }
    blocks.push(dict_block("meta", &meta));

    blocks.push(dict_block(
        &req.method.as_str().to_lowercase(),
        &[
            format!("{}url: {}", INDENT, req.url),
            format!("{}body: {}", INDENT, req.body.mode()),
            format!("{}auth: {}", INDENT, req.auth.mode()),
        ],
    ));

    let query = param_entries(&req.params, ParamType::Query);
    if !query.is_empty() {
        blocks.push(dict_block("params:query", &query));
    }
    let path = param_entries(&req.params, ParamType::Path);
    if !path.is_empty() {
        blocks.push(dict_block("params:path", &path));
    }
    if !req.headers.is_empty() {
        blocks.push(dict_block("headers", &header_entries(&req.headers)));
    }

    match &req.auth {
        AuthSpec::None => {}
        AuthSpec::Basic { username, password } => blocks.push(dict_block(
            "auth:basic",
            &[
                format!("{}username: {}", INDENT, username),
                format!("{}password: {}", INDENT, password),
            ],
        )),
        AuthSpec::Bearer { token } => blocks.push(dict_block(
            "auth:bearer",
            &[format!("{}token: {}", INDENT, token)],
        )),
    }

    match &req.body {
        BodySpec::None => {}
        BodySpec::Json { json } if !json.is_empty() => blocks.push(text_block("body:json", json)),
        BodySpec::Text { text } if !text.is_empty() => blocks.push(text_block("body:text", text)),
        BodySpec::Xml { xml } if !xml.is_empty() => blocks.push(text_block("body:xml", xml)),
        BodySpec::FormUrlEncoded { form_url_encoded } if !form_url_encoded.is_empty() => {
            blocks.push(dict_block("body:form-urlencoded", &form_entries(form_url_encoded)))
        }
        BodySpec::MultipartForm { multipart_form } if !multipart_form.is_empty() => {
            blocks.push(dict_block("body:multipart-form", &form_entries(multipart_form)))
        }
        _ => {}
    }

    if !req.vars.req.is_empty() {
        blocks.push(dict_block("vars:pre-request", &var_entries(&req.vars.req)));
    }
    if !req.vars.res.is_empty() {
        blocks.push(dict_block("vars:post-response", &var_entries(&req.vars.res)));
    }
    if !req.assertions.is_empty() {
        let entries: Vec<String> = req
            .assertions
            .iter()
            .map(|a| entry(&a.name, &a.value, a.enabled))
            .collect();
        blocks.push(dict_block("assert", &entries));
    }
    if let Some(script) = &req.script.req {
        blocks.push(text_block("script:pre-request", script));
    }
    if let Some(script) = &req.script.res {
        blocks.push(text_block("script:post-response", script));
    }
    if let Some(tests) = &req.tests {
        blocks.push(text_block("tests", tests));
    }
    if let Some(docs) = &req.docs {
        blocks.push(text_block("docs", docs));
    }

    blocks.join("\n\n") + "\n"
}

/// Render an environment: plain variables with values, secrets by name only.
pub fn environment_to_bru(env: &Environment) -> String {
    let (secrets, plain): (Vec<&Variable>, Vec<&Variable>) =
        env.variables.iter().partition(|v| v.secret);
    let entries: Vec<String> = plain
        .iter()
        .map(|v| entry(&v.name, &v.value, v.enabled))
        .collect();
    let mut out = dict_block("vars", &entries);
    if !secrets.is_empty() {
        let names: Vec<String> = secrets
            .iter()
            .map(|v| format!("{}{}{}", INDENT, if v.enabled { "" } else { "~" }, v.name))
            .collect();
        out.push_str(&format!("\n\nvars:secret [\n{}\n]", names.join(",\n")));
    }
    out + "\n"
}
