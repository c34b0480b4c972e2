// ── Drift suppression ──
//
// Predicates deciding whether a declared value and a stored value
// describe the same thing even when the text differs.

use crate::body::normalize;

/// The declared parent matches if it is any of the parent's known akas.
pub fn parent_matches(declared: &str, parent_akas: Option<&[String]>) -> bool {
    parent_akas.is_some_and(|akas| akas.iter().any(|aka| aka == declared))
}

/// Two bodies match when both are non-empty and normalize to the same text.
///
/// An empty side never matches, so a first write always produces a diff.
/// Text that is not a JSON object is compared as written.
pub fn body_matches(stored: &str, declared: &str) -> bool {
    if stored.is_empty() || declared.is_empty() {
        return false;
    }
    normalize(stored) == normalize(declared)
}

/// A mod is current when what is installed is the newest compatible release.
pub fn installed_is_latest(installed: Option<&str>, latest_compatible: Option<&str>) -> bool {
    installed.is_some() && installed == latest_compatible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_aka_is_accepted() {
        let akas = vec!["123".to_string(), "tmod:@turbot/turbot#/".to_string()];
        assert!(parent_matches("tmod:@turbot/turbot#/", Some(&akas)));
        assert!(parent_matches("123", Some(&akas)));
        assert!(!parent_matches("456", Some(&akas)));
    }

    #[test]
    fn no_akas_never_matches() {
        assert!(!parent_matches("123", None));
        assert!(!parent_matches("123", Some(&[])));
    }

    #[test]
    fn equal_json_with_different_layout_matches() {
        assert!(body_matches(
            "{\n \"a\": 1,\n \"b\": [true]\n}",
            r#"{"b":[true],"a":1}"#
        ));
    }

    #[test]
    fn different_values_do_not_match() {
        assert!(!body_matches(r#"{"a":1}"#, r#"{"a":2}"#));
    }

    #[test]
    fn empty_bodies_never_match() {
        assert!(!body_matches("", r#"{"a":1}"#));
        assert!(!body_matches(r#"{"a":1}"#, ""));
        assert!(!body_matches("", ""));
    }

    #[test]
    fn non_object_bodies_compare_verbatim() {
        assert!(body_matches("{bad", "{bad"));
        assert!(!body_matches("{bad", "{bad "));
        assert!(!body_matches("[1, 2]", "[1,2]"));
        assert!(!body_matches("\"x\"", " \"x\""));
    }

    #[test]
    fn installed_version_must_equal_latest() {
        assert!(installed_is_latest(Some("5.2.0"), Some("5.2.0")));
        assert!(!installed_is_latest(Some("5.1.0"), Some("5.2.0")));
        assert!(!installed_is_latest(None, None));
        assert!(!installed_is_latest(Some("5.2.0"), None));
    }
}
