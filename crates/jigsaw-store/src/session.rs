//! Saving and restoring whole workspaces through a [`SessionStore`].

use jigsaw_core::models::PuzzleWorkspace;
use jigsaw_core::ports::Clock;
use jigsaw_core::Result;
use std::sync::Arc;

use crate::ports::SessionStore;

pub async fn save_workspace<S>(store: &S, workspace: &PuzzleWorkspace) -> Result<()>
where
    S: SessionStore + ?Sized,
{
    let document = workspace.to_json()?;
    store.save(workspace.id(), &document).await?;
    tracing::info!(
        workspace_id = %workspace.id(),
        placed = workspace.placed_count(),
        moves = workspace.move_count(),
        "Saved workspace"
    );
    Ok(())
}

/// Decode a stored workspace. A document that fails validation is an error.
pub async fn load_workspace<S>(
    store: &S,
    id: &str,
    clock: Arc<dyn Clock>,
) -> Result<Option<PuzzleWorkspace>>
where
    S: SessionStore + ?Sized,
{
    match store.load(id).await? {
        Some(document) => Ok(Some(PuzzleWorkspace::from_json_with_clock(&document, clock)?)),
        None => Ok(None),
    }
}

/// Restore a workspace, or build a fresh one when the session is missing or
/// its document is rejected. Store I/O failures still propagate.
pub async fn load_or_fresh<S, F>(
    store: &S,
    id: &str,
    clock: Arc<dyn Clock>,
    fresh: F,
) -> Result<PuzzleWorkspace>
where
    S: SessionStore + ?Sized,
    F: FnOnce() -> Result<PuzzleWorkspace>,
{
    let Some(document) = store.load(id).await? else {
        tracing::info!(session_id = %id, "No saved session, starting fresh");
        return fresh();
    };
    match PuzzleWorkspace::from_json_with_clock(&document, clock) {
        Ok(workspace) => {
            tracing::info!(
                session_id = %id,
                placed = workspace.placed_count(),
                "Restored workspace"
            );
            Ok(workspace)
        }
        Err(e) => {
            tracing::warn!(session_id = %id, error = %e, "Discarding unreadable session");
            fresh()
        }
    }
}
