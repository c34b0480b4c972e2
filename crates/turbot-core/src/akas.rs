// ── Alias resolution ──

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::CoreError;
use crate::remote::TurbotApi;

/// Every identifier the entity `parent` answers to.
///
/// Falls back to `[parent]` when the workspace reports no akas, so the
/// result is never empty.
pub async fn resolve_parent_akas(
    client: &dyn TurbotApi,
    parent: &str,
) -> Result<Vec<String>, CoreError> {
    // An empty projection fetches identity only.
    let projection = BTreeMap::new();
    let remote = client.read_resource(parent, Some(&projection)).await?;
    let akas = match remote.entity.akas {
        Some(akas) if !akas.is_empty() => akas,
        _ => vec![parent.to_owned()],
    };
    debug!(parent, count = akas.len(), "resolved parent akas");
    Ok(akas)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::FakeWorkspace;

    #[tokio::test]
    async fn returns_reported_akas() {
        let ws = FakeWorkspace::new();
        ws.add_resource_with_akas("175", "", &["tmod:@turbot/turbot#/", "arn:aws:::acme"]);
        let akas = resolve_parent_akas(&ws, "175").await.unwrap();
        assert_eq!(akas, vec!["tmod:@turbot/turbot#/", "arn:aws:::acme"]);
    }

    #[tokio::test]
    async fn falls_back_to_parent_id_when_no_akas() {
        let ws = FakeWorkspace::new();
        ws.add_resource_with_akas("175", "", &[]);
        let akas = resolve_parent_akas(&ws, "175").await.unwrap();
        assert_eq!(akas, vec!["175"]);
    }

    #[tokio::test]
    async fn missing_parent_is_not_found() {
        let ws = FakeWorkspace::new();
        let err = resolve_parent_akas(&ws, "999").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
