//! Retention rotation: keep the N newest offsite artifacts.

use tracing::{info, warn};

use crate::error::OffsiteError;
use crate::offsite::OffsiteStore;

/// Outcome of one rotation pass.
#[derive(Debug, Clone, Default)]
pub struct RotationOutcome {
    /// Artifacts present before rotation.
    pub examined: usize,
    /// Artifacts actually deleted.
    pub deleted: usize,
    /// Per-artifact deletion failures, as display strings.
    pub failures: Vec<String>,
}

/// Delete every artifact beyond the `keep` newest.
///
/// Ordering is by remote creation time, not filename: names sort
/// chronologically by construction, but creation time is authoritative.
/// Deletions are independent; one failure does not abort the rest, it is
/// accumulated into the outcome. Re-running with `count <= keep` is a
/// no-op, so rotation is idempotent.
///
/// # Errors
/// Only the initial listing can fail the whole pass.
pub async fn rotate(
    store: &dyn OffsiteStore,
    keep: usize,
) -> Result<RotationOutcome, OffsiteError> {
    let mut artifacts = store.list_artifacts().await?;
    artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut outcome = RotationOutcome {
        examined: artifacts.len(),
        ..RotationOutcome::default()
    };

    if artifacts.len() <= keep {
        return Ok(outcome);
    }

    for artifact in &artifacts[keep..] {
        match store.delete_artifact(&artifact.id).await {
            Ok(()) => outcome.deleted += 1,
            Err(e) => {
                warn!(id = %artifact.id, name = %artifact.name, error = %e, "rotation delete failed");
                outcome
                    .failures
                    .push(format!("{} ({}): {e}", artifact.name, artifact.id));
            }
        }
    }

    info!(
        examined = outcome.examined,
        deleted = outcome.deleted,
        failed = outcome.failures.len(),
        keep,
        "rotation pass complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeOffsiteStore;

    #[tokio::test]
    async fn test_rotate_deletes_all_but_newest_n() {
        let store = FakeOffsiteStore::preloaded(8);
        let outcome = rotate(&store, 6).await.unwrap();

        assert_eq!(outcome.examined, 8);
        assert_eq!(outcome.deleted, 2);
        assert!(outcome.failures.is_empty());

        // preloaded() creates old-0 .. old-7, oldest first.
        let remaining = store.ids();
        assert_eq!(remaining.len(), 6);
        assert!(!remaining.contains(&"old-0".to_string()));
        assert!(!remaining.contains(&"old-1".to_string()));
        assert!(remaining.contains(&"old-7".to_string()));
    }

    #[tokio::test]
    async fn test_rotate_is_a_noop_when_under_keep() {
        let store = FakeOffsiteStore::preloaded(4);

        for _ in 0..3 {
            let outcome = rotate(&store, 6).await.unwrap();
            assert_eq!(outcome.examined, 4);
            assert_eq!(outcome.deleted, 0);
        }
        assert_eq!(store.ids().len(), 4);
    }

    #[tokio::test]
    async fn test_rotate_exactly_at_keep_is_a_noop() {
        let store = FakeOffsiteStore::preloaded(6);
        let outcome = rotate(&store, 6).await.unwrap();
        assert_eq!(outcome.deleted, 0);
    }

    #[tokio::test]
    async fn test_one_failed_delete_does_not_abort_the_rest() {
        let mut store = FakeOffsiteStore::preloaded(9);
        store.undeletable.insert("old-1".to_string());

        let outcome = rotate(&store, 6).await.unwrap();
        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].contains("old-1"));

        // The stuck artifact survives alongside the kept six.
        assert_eq!(store.ids().len(), 7);
    }

    #[tokio::test]
    async fn test_rotate_keep_zero_empties_the_folder() {
        let store = FakeOffsiteStore::preloaded(3);
        let outcome = rotate(&store, 0).await.unwrap();
        assert_eq!(outcome.deleted, 3);
        assert!(store.ids().is_empty());
    }
}
