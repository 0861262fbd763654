// Document acquisition for openapi-bruno
// Uses reqwest for remote sources, std::fs for local ones, then JSON or YAML

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::resolver::dereference;
use crate::error::{Error, Result};

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch `source` (path or URL), parse it and inline its local references.
pub async fn load_document(source: &str, headers: &[(String, String)]) -> Result<Value> {
    let text = if is_remote(source) {
        fetch_remote(source, headers).await?
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| Error::Fetch(format!("Failed to read {}: {}", source, e)))?
    };
    let raw = parse_document_text(&text)
        .map_err(|e| Error::Fetch(format!("Failed to parse {}: {}", source, e)))?;
    dereference(&raw)
}

async fn fetch_remote(url: &str, headers: &[(String, String)]) -> Result<String> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| Error::Fetch(e.to_string()))?;
    let response = client
        .get(url)
        .headers(header_map(headers)?)
        .send()
        .await
        .map_err(|e| Error::Fetch(format!("Failed to fetch {}: {}", url, e)))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Fetch(format!("Failed to fetch {}: HTTP {}", url, status)));
    }
    log::debug!("fetched {} ({})", url, status);
    response
        .text()
        .await
        .map_err(|e| Error::Fetch(format!("Failed to read body of {}: {}", url, e)))
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Fetch(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Fetch(format!("Invalid header value for {}: {}", name.as_str(), e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// JSON first; anything that is not JSON is read as YAML.
pub fn parse_document_text(text: &str) -> std::result::Result<Value, String> {
    let json_err = match serde_json::from_str::<Value>(text) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };
    // Go through serde_yaml::Value so non-string keys (`200:`) become strings.
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|yaml_err| format!("not JSON ({}) nor YAML ({})", json_err, yaml_err))?;
    serde_json::to_value(yaml).map_err(|e| e.to_string())
}
