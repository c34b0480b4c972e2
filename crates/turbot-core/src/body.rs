// ── Body normalization ──
//
// Resource bodies are JSON object text. Two bodies that parse to the
// same object must store identically, whatever their whitespace or key
// order, so every body is re-rendered with sorted keys and a fixed
// indent before it is kept.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;

const INDENT: &[u8] = b" ";

/// Canonical form of a JSON object body.
///
/// Anything that is not a JSON object (including the empty string) is
/// returned unchanged, so a malformed body still reaches the workspace
/// and is rejected there.
pub fn normalize(body: &str) -> String {
    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(object) => render(&Value::Object(object)).unwrap_or_else(|_| body.to_owned()),
        Err(_) => body.to_owned(),
    }
}

/// Parse a body into the property map sent on create/update.
pub fn parse_body(body: &str) -> Result<Map<String, Value>, CoreError> {
    serde_json::from_str(body).map_err(|e| CoreError::Serialization {
        message: format!("body is not a JSON object: {e}"),
    })
}

/// Projection for a read: every top-level key maps to itself.
pub fn properties_from_body(body: &str) -> Result<BTreeMap<String, String>, CoreError> {
    let object = parse_body(body)?;
    Ok(object.keys().map(|k| (k.clone(), k.clone())).collect())
}

/// Render remote properties as a body in canonical form.
pub fn body_from_properties<T: Serialize + ?Sized>(properties: &T) -> Result<String, CoreError> {
    let value = serde_json::to_value(properties)?;
    Ok(render(&value)?)
}

/// Pretty-print with one-space indentation and sorted keys at every depth.
fn render(value: &Value) -> Result<String, serde_json::Error> {
    let canonical = canonicalize(value.clone());
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    canonical.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let sorted: BTreeMap<String, Value> = object
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_sorts_keys_and_indents_by_one_space() {
        let body = r#"{"b":1,"a":{"d":[1,2],"c":"x"}}"#;
        let expected = "{\n \"a\": {\n  \"c\": \"x\",\n  \"d\": [\n   1,\n   2\n  ]\n },\n \"b\": 1\n}";
        assert_eq!(normalize(body), expected);
    }

    #[test]
    fn normalize_ignores_whitespace_and_key_order() {
        let a = normalize("{\"title\": \"t\", \"description\": \"d\"}");
        let b = normalize("{\n  \"description\":\"d\",\"title\":   \"t\"\n}");
        assert_eq!(a, b);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(r#"{"z":[{"y":1,"x":2}],"a":null}"#);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_passes_through_non_objects() {
        assert_eq!(normalize("not json"), "not json");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("[1,2]"), "[1,2]");
    }

    #[test]
    fn properties_from_body_is_identity_projection() {
        let props = properties_from_body(r#"{"title":"t","description":"d"}"#).unwrap();
        let expected: BTreeMap<String, String> = [
            ("description".to_string(), "description".to_string()),
            ("title".to_string(), "title".to_string()),
        ]
        .into();
        assert_eq!(props, expected);
    }

    #[test]
    fn properties_from_malformed_body_is_serialization_error() {
        let err = properties_from_body("{oops").unwrap_err();
        assert!(matches!(err, CoreError::Serialization { .. }));
    }

    #[test]
    fn body_from_properties_is_canonical() {
        let mut remote = Map::new();
        remote.insert("title".into(), Value::from("t"));
        remote.insert("description".into(), Value::from("d"));
        let body = body_from_properties(&remote).unwrap();
        assert_eq!(body, normalize(r#"{"title":"t","description":"d"}"#));
    }

    /// Read the properties a body names back from the workspace, which
    /// echoes each one unchanged.
    fn echo_read(body: &str) -> Map<String, Value> {
        let document = parse_body(body).unwrap();
        properties_from_body(body)
            .unwrap()
            .into_values()
            .map(|key| {
                let value = document[&key].clone();
                (key, value)
            })
            .collect()
    }

    #[test]
    fn body_survives_a_properties_round_trip() {
        let documents = [
            r#"{"Name":"acme","Tags":{"b":"2","a":"1"},"Ports":[443,80],"Enabled":true}"#,
            r#"{"nested":{"deep":{"z":null,"a":[{"y":1,"x":2}]}},"n":1.5}"#,
            "{}",
        ];
        for x in documents {
            let rebuilt = body_from_properties(&echo_read(&normalize(x))).unwrap();
            let original: Value = serde_json::from_str(x).unwrap();
            let rebuilt_value: Value = serde_json::from_str(&rebuilt).unwrap();
            assert_eq!(rebuilt_value, original, "{x}");
            assert_eq!(rebuilt, normalize(x));
        }
    }
}
