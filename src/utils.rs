// Text normalization helpers
// File names, directory names, lenient JSON and content-type classification

use heck::ToKebabCase;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref INVALID_FILE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\-. ]").unwrap();
    static ref INVALID_DIR_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*\x00-\x1F]+"#).unwrap();
    static ref JSON_MIME: Regex = Regex::new(r"^[\w-]+/([\w-]+\+)?json").unwrap();
    static ref XML_MIME: Regex = Regex::new(r"^[\w-]+/([\w-]+\+)?xml").unwrap();
}

/// Replace every character outside `[A-Za-z0-9_\-. ]` with `-`.
pub fn normalize_file_name(name: &str) -> String {
    INVALID_FILE_CHARS.replace_all(name, "-").into_owned()
}

/// Replace runs of characters that are illegal in directory names with a single `-`.
pub fn sanitize_directory_name(name: &str) -> String {
    INVALID_DIR_CHARS.replace_all(name, "-").into_owned()
}

/// Lowercase, hyphen-separated token: `"get /pets/{petId}"` -> `"get-pets-pet-id"`.
pub fn hyphen_case(s: &str) -> String {
    s.to_kebab_case()
}

/// Parse `s` as JSON, falling back to the string itself when it is not valid JSON.
pub fn safe_parse_json(s: &str) -> Value {
    if s.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
}

/// Encode `value` as JSON, two-space indented when `indent` is set.
pub fn safe_stringify_json(value: &Value, indent: bool) -> String {
    let encoded = if indent {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.unwrap_or_default()
}

/// Classify the `content-type` among `headers`.
///
/// Any `*/json` or `*/*+json` type collapses to `application/ld+json`, any xml type to
/// `application/xml`; other types are returned as declared. Empty when no header matches.
pub fn classify_content_type(headers: &[(String, String)]) -> String {
    let Some((_, value)) = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
    else {
        return String::new();
    };
    if JSON_MIME.is_match(value) {
        "application/ld+json".to_string()
    } else if XML_MIME.is_match(value) {
        "application/xml".to_string()
    } else {
        value.clone()
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
