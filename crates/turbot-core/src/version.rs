// ── Version constraints ──
//
// Mods are published as semantic versions and declared with a range
// constraint. A constraint is one or more alternatives joined by `||`;
// each alternative is a list of comparators, separated by commas or
// spaces, that must all hold. A bare version is an exact match, `a - b`
// is the inclusive range `>=a, <=b`, and `!=v` excludes one version.
// A leading `v` on any version is ignored.

use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};
use tracing::debug;

use crate::error::CoreError;
use crate::model::PublishedVersion;

/// A parsed version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionConstraint {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl FromStr for VersionConstraint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = |reason: String| CoreError::InvalidConstraint {
            constraint: s.to_owned(),
            reason,
        };
        if raw.is_empty() {
            return Err(invalid("constraint is empty".into()));
        }

        let mut alternatives = Vec::new();
        for alt in raw.split("||") {
            for set in expand_alternative(alt).map_err(invalid)? {
                let req = VersionReq::parse(&set.join(", "))
                    .map_err(|e| invalid(e.to_string()))?;
                alternatives.push(req);
            }
        }

        Ok(Self {
            raw: raw.to_owned(),
            alternatives,
        })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split one alternative into `(operator, version)` pairs.
///
/// An operator may stand apart from its version (`>= 1.0`). A lone `-`
/// between two bare versions turns them into an inclusive range.
fn comparators(alt: &str) -> Result<Vec<(String, String)>, String> {
    let mut parts: Vec<(String, String)> = Vec::new();
    let mut op = String::new();
    let mut tokens = alt
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    while let Some(token) = tokens.next() {
        if token == "-" {
            match (parts.last_mut(), tokens.next()) {
                (Some((low, _)), Some(upper)) if low.is_empty() && op.is_empty() => {
                    ">=".clone_into(low);
                    parts.push(("<=".into(), strip_v(upper).to_owned()));
                }
                _ => return Err("a hyphen range needs a bare version on each side".into()),
            }
            continue;
        }
        let split = token
            .find(|c: char| !matches!(c, '=' | '<' | '>' | '~' | '^' | '!'))
            .unwrap_or(token.len());
        let (token_op, version) = token.split_at(split);
        op.push_str(token_op);
        if !version.is_empty() {
            parts.push((std::mem::take(&mut op), strip_v(version).to_owned()));
        }
    }

    if !op.is_empty() {
        return Err(format!("operator '{op}' is not followed by a version"));
    }
    if parts.is_empty() {
        return Err("empty alternative".into());
    }
    Ok(parts)
}

/// Comparator sets for one alternative. Each `!=v` doubles the sets, one
/// side below `v` and one above.
fn expand_alternative(alt: &str) -> Result<Vec<Vec<String>>, String> {
    let mut sets: Vec<Vec<String>> = vec![Vec::new()];
    for (op, version) in comparators(alt)? {
        if op == "!=" {
            sets = sets
                .into_iter()
                .flat_map(|set| {
                    ["<", ">"].map(|side| {
                        let mut set = set.clone();
                        set.push(format!("{side}{version}"));
                        set
                    })
                })
                .collect();
            continue;
        }
        let wildcard = version.contains(['*', 'x', 'X']);
        let comparator = if op.is_empty() && !wildcard {
            format!("={version}")
        } else {
            format!("{op}{version}")
        };
        for set in &mut sets {
            set.push(comparator.clone());
        }
    }
    Ok(sets)
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix(['v', 'V'])
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version)
}

/// Parse a published version, tolerating a `v` prefix and missing
/// minor or patch components (`1.2` is `1.2.0`).
pub fn parse_version(raw: &str) -> Result<Version, CoreError> {
    let trimmed = strip_v(raw.trim());
    let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(core_end);
    let padded = match core.matches('.').count() {
        0 => format!("{core}.0.0{suffix}"),
        1 => format!("{core}.0{suffix}"),
        _ => trimmed.to_owned(),
    };
    Version::parse(&padded).map_err(|e| CoreError::InvalidVersion {
        version: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// The newest compatible release, with the text the catalogue published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: Version,
    pub published: String,
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.published)
    }
}

/// Pick the greatest available version satisfying `constraint`.
///
/// Only `available` entries are considered. An available entry whose
/// version does not parse fails the whole resolution rather than being
/// skipped. `Ok(None)` means nothing matched.
pub fn resolve_latest_compatible(
    constraint: &str,
    published: &[PublishedVersion],
) -> Result<Option<ResolvedVersion>, CoreError> {
    let constraint: VersionConstraint = constraint.parse()?;

    let mut best: Option<ResolvedVersion> = None;
    for entry in published.iter().filter(|p| p.is_available()) {
        let version = parse_version(&entry.version)?;
        if !constraint.matches(&version) {
            continue;
        }
        if best.as_ref().is_none_or(|b| version > b.version) {
            best = Some(ResolvedVersion {
                version,
                published: entry.version.clone(),
            });
        }
    }

    debug!(
        %constraint,
        candidates = published.len(),
        resolved = best.as_ref().map(|b| b.published.as_str()),
        "resolved latest compatible version"
    );
    Ok(best)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalogue(entries: &[(&str, &str)]) -> Vec<PublishedVersion> {
        entries
            .iter()
            .map(|(v, s)| PublishedVersion {
                version: (*v).to_string(),
                status: (*s).to_string(),
            })
            .collect()
    }

    fn resolve(constraint: &str, entries: &[(&str, &str)]) -> Option<String> {
        resolve_latest_compatible(constraint, &catalogue(entries))
            .unwrap()
            .map(|r| r.to_string())
    }

    #[test]
    fn picks_greatest_matching_available() {
        let got = resolve(
            ">=5.0.0, <6.0.0",
            &[
                ("5.1.0", "available"),
                ("5.3.0", "available"),
                ("6.0.0", "available"),
                ("5.4.0", "deprecated"),
            ],
        );
        assert_eq!(got.as_deref(), Some("5.3.0"));
    }

    #[test]
    fn star_matches_any_release() {
        let got = resolve("*", &[("1.0.0", "available"), ("2.0.0", "available")]);
        assert_eq!(got.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn ordering_is_semantic_not_lexical() {
        let got = resolve("*", &[("5.10.0", "available"), ("5.9.0", "available")]);
        assert_eq!(got.as_deref(), Some("5.10.0"));
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(resolve(">=7.0.0", &[("5.0.0", "available")]), None);
        assert_eq!(resolve("*", &[]), None);
    }

    #[test]
    fn bare_version_is_exact() {
        let got = resolve("5.1.0", &[("5.1.0", "available"), ("5.2.0", "available")]);
        assert_eq!(got.as_deref(), Some("5.1.0"));
    }

    #[test]
    fn alternatives_are_ored() {
        let got = resolve(
            "^4.0.0 || =5.1.0",
            &[
                ("4.2.0", "available"),
                ("5.1.0", "available"),
                ("5.2.0", "available"),
            ],
        );
        assert_eq!(got.as_deref(), Some("5.1.0"));
    }

    #[test]
    fn v_prefix_is_tolerated_and_published_text_kept() {
        let got = resolve(">= v1.0", &[("v1.2", "available")]);
        assert_eq!(got.as_deref(), Some("v1.2"));
    }

    #[test]
    fn unparseable_available_version_fails_fast() {
        let err = resolve_latest_compatible(
            "*",
            &catalogue(&[("1.0.0", "available"), ("banana", "available")]),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidVersion { ref version, .. } if version == "banana"));
    }

    #[test]
    fn unavailable_garbage_is_ignored() {
        let got = resolve("*", &[("1.0.0", "available"), ("banana", "withdrawn")]);
        assert_eq!(got.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn star_skips_unavailable_releases() {
        let got = resolve(
            "*",
            &[
                ("1.0.0", "available"),
                ("1.2.0", "available"),
                ("2.0.0", "unavailable"),
            ],
        );
        assert_eq!(got.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn caret_stays_within_major() {
        let got = resolve(
            "^1.0.0",
            &[
                ("1.0.0", "available"),
                ("1.5.0", "available"),
                ("2.0.0", "available"),
            ],
        );
        assert_eq!(got.as_deref(), Some("1.5.0"));
    }

    #[test]
    fn caret_without_a_match_is_none_not_an_error() {
        let got = resolve_latest_compatible(
            "^3.0.0",
            &catalogue(&[("1.0.0", "available"), ("2.0.0", "available")]),
        )
        .unwrap();
        assert_eq!(got, None);
    }

    #[test]
    fn space_separated_comparators_are_anded() {
        let got = resolve(
            ">= 1.0 < 2.0",
            &[("0.9.0", "available"), ("1.5.0", "available"), ("2.0.0", "available")],
        );
        assert_eq!(got.as_deref(), Some("1.5.0"));
    }

    #[test]
    fn hyphen_range_is_inclusive() {
        let catalogue = [
            ("5.0.0", "available"),
            ("5.2.0", "available"),
            ("5.3.0", "available"),
            ("5.3.1", "available"),
        ];
        assert_eq!(resolve("5.1.0 - 5.3.0", &catalogue).as_deref(), Some("5.3.0"));
        assert_eq!(resolve("v5.0.0 - v5.2.0", &catalogue).as_deref(), Some("5.2.0"));
    }

    #[test]
    fn not_equal_excludes_one_release() {
        let catalogue = [
            ("5.1.0", "available"),
            ("5.2.0", "available"),
            ("6.0.0", "available"),
        ];
        assert_eq!(resolve("!=6.0.0", &catalogue).as_deref(), Some("5.2.0"));
        assert_eq!(resolve("^5, != 5.2.0", &catalogue).as_deref(), Some("5.1.0"));
        assert_eq!(resolve("!=5.1.0 !=5.2.0 <6", &catalogue), None);
    }

    #[test]
    fn malformed_constraint_is_rejected() {
        for bad in ["", ">>1.0", "1.0 ||", ">=", "5.0 -", "- 5.0", ">=5.0 - 6.0"] {
            let err = bad.parse::<VersionConstraint>().unwrap_err();
            assert!(matches!(err, CoreError::InvalidConstraint { .. }), "{bad}");
        }
    }

    #[test]
    fn pads_short_versions() {
        assert_eq!(parse_version("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(parse_version("v2.1").unwrap(), Version::new(2, 1, 0));
        assert_eq!(parse_version("2.1-beta.1").unwrap().pre.as_str(), "beta.1");
    }
}
