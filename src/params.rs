// Parameter handling for openapi-bruno
// Path-level/operation-level merge and placeholder synthesis for params and headers

use indexmap::IndexMap;
use serde_json::Value;

use crate::idgen::uid;
use crate::models::{Header, Param, ParamType};
use crate::openapi::document::{Parameter, ParameterLocation};

/// Concatenate path-level then operation-level parameters and dedupe by `name`.
///
/// A later entry replaces an earlier one with the same name but keeps the earlier
/// position. Entries without a `name` are dropped.
pub fn merge_parameters(path_level: &[Value], operation_level: &[Value]) -> Vec<Value> {
    let mut merged: IndexMap<String, Value> = IndexMap::new();
    for param in path_level.iter().chain(operation_level) {
        let key = match param.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => continue,
        };
        merged.insert(key, param.clone());
    }
    merged.into_values().collect()
}

/// `{{name}}` placeholder left for the client to fill in.
pub fn placeholder(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Query/path parameters become params, header parameters become headers.
/// Cookie and unknown locations are not carried over.
pub fn synthesize_parameters(params: &[Parameter]) -> (Vec<Param>, Vec<Header>) {
    let mut out_params = Vec::new();
    let mut headers = Vec::new();
    for p in params {
        let description = p.description.clone().unwrap_or_default();
        match p.location {
            ParameterLocation::Query | ParameterLocation::Path => out_params.push(Param {
                uid: uid(),
                name: p.name.clone(),
                value: placeholder(&p.name),
                description,
                kind: if p.location == ParameterLocation::Query {
                    ParamType::Query
                } else {
                    ParamType::Path
                },
                enabled: p.required,
            }),
            ParameterLocation::Header => headers.push(Header {
                uid: uid(),
                name: p.name.clone(),
                value: placeholder(&p.name),
                description,
                enabled: p.required,
            }),
            ParameterLocation::Cookie | ParameterLocation::Other => {
                log::debug!("skipping parameter {} ({:?})", p.name, p.location);
            }
        }
    }
    (out_params, headers)
}
