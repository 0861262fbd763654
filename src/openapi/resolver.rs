// Local $ref dereferencing
// Replaces every {"$ref": "#/..."} object with a copy of its target

use serde_json::Value;

use crate::error::{Error, Result};

/// Inline every local reference in `root`.
///
/// External references (`file.json#/...`, URLs) and references back into a schema that is
/// already being inlined are left in place. A pointer that does not resolve fails the
/// whole document.
pub fn dereference(root: &Value) -> Result<Value> {
    let mut stack = Vec::new();
    inline(root, root, &mut stack)
}

fn inline(root: &Value, node: &Value, stack: &mut Vec<String>) -> Result<Value> {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(|r| r.as_str()) {
                if let Some(pointer) = reference.strip_prefix('#') {
                    if stack.iter().any(|seen| seen == reference) {
                        log::debug!("leaving circular $ref in place: {}", reference);
                        return Ok(node.clone());
                    }
                    let target = resolve_local_ref(root, pointer).ok_or_else(|| {
                        Error::Fetch(format!("unresolved $ref: {}", reference))
                    })?;
                    stack.push(reference.to_string());
                    let resolved = inline(root, target, stack);
                    stack.pop();
                    return resolved;
                }
                log::debug!("leaving external $ref in place: {}", reference);
            }
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), inline(root, value, stack)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| inline(root, item, stack))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

/// Resolve a JSON pointer such as `/components/schemas/Foo` against `root`.
pub fn resolve_local_ref<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(root);
    }
    let path = pointer.strip_prefix('/')?;
    let mut cur = root;
    for part in path.split('/').map(|s| s.replace("~1", "/").replace("~0", "~")) {
        cur = match cur {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => cur.get(&part)?,
        };
    }
    Some(cur)
}
