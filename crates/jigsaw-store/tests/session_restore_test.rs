use chrono::{TimeZone, Utc};
use jigsaw_core::ports::{Clock, ManualClock, StaticPieceSource};
use jigsaw_core::{GridSize, PlacementConfig, PuzzleCoordinate, PuzzleWorkspace, Size};
use jigsaw_store::{
    load_or_fresh, load_workspace, save_workspace, JsonFileSessionStore, MemorySessionStore,
    SessionStore,
};
use std::sync::Arc;
use tempfile::TempDir;

fn clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()))
}

fn fresh_workspace(clock: Arc<dyn Clock>) -> jigsaw_core::Result<PuzzleWorkspace> {
    let grid = GridSize::new(2, 3)?;
    let source = StaticPieceSource::uniform_grid(Size::new(300.0, 200.0), grid)?;
    PuzzleWorkspace::from_source("harbor", grid, &source, PlacementConfig::default(), clock)
}

#[tokio::test]
async fn test_progress_survives_file_store() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileSessionStore::new(temp.path());
    let clock = clock();

    let mut workspace = fresh_workspace(clock.clone()).unwrap();
    workspace.move_piece("0_0", PuzzleCoordinate::new(5.0, 5.0)).unwrap();
    workspace.move_piece("1_2", PuzzleCoordinate::new(400.0, 10.0)).unwrap();
    save_workspace(&store, &workspace).await.unwrap();

    let restored = load_workspace(&store, workspace.id(), clock).await.unwrap().unwrap();
    assert_eq!(restored.id(), workspace.id());
    assert_eq!(restored.placed_count(), 1);
    assert_eq!(restored.move_count(), 2);
    assert_eq!(
        restored.piece("1_2").unwrap().current_position(),
        Some(PuzzleCoordinate::new(400.0, 10.0))
    );
    assert_eq!(restored.to_json().unwrap(), workspace.to_json().unwrap());
}

#[tokio::test]
async fn test_missing_session_starts_fresh() {
    let store = MemorySessionStore::new();
    let clock = clock();
    let workspace =
        load_or_fresh(&store, "unknown", clock.clone(), || fresh_workspace(clock.clone()))
            .await
            .unwrap();
    assert_eq!(workspace.tray_pieces().len(), 6);
    assert!(load_workspace(&store, "unknown", clock).await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_session_falls_back() {
    let store = MemorySessionStore::new();
    store.save("broken", "{\"gridSize\": \"2x\"").await.unwrap();
    let clock = clock();

    assert!(load_workspace(&store, "broken", clock.clone()).await.is_err());
    let workspace =
        load_or_fresh(&store, "broken", clock.clone(), || fresh_workspace(clock.clone()))
            .await
            .unwrap();
    assert_eq!(workspace.placed_count(), 0);
}

#[tokio::test]
async fn test_saved_session_is_restored_not_replaced() {
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let clock = clock();
    let mut workspace = fresh_workspace(clock.clone()).unwrap();
    workspace.move_piece("0_1", PuzzleCoordinate::new(100.0, 0.0)).unwrap();
    save_workspace(store.as_ref(), &workspace).await.unwrap();

    let restored = load_or_fresh(store.as_ref(), workspace.id(), clock.clone(), || {
        fresh_workspace(clock.clone())
    })
    .await
    .unwrap();
    assert_eq!(restored.id(), workspace.id());
    assert!(restored.piece("0_1").unwrap().is_placed());
    assert_eq!(store.list().await.unwrap(), vec![workspace.id().to_string()]);
}
