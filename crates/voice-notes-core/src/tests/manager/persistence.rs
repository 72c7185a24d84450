use crate::{
    EntryId, FileReference, LIBRARY_KEY, Library, LibraryError, RecordingEntry,
    tests::fakes::{DeviceOp, Harness, MemoryStore},
};

fn persisted_fields(library: &Library) -> Vec<(EntryId, String, FileReference)> {
    library
        .iter()
        .map(|e| {
            (
                e.id(),
                e.duration_formatted().to_string(),
                e.file_reference().clone(),
            )
        })
        .collect()
}

/// WHAT: Every saved recording is written through to the store
/// WHY: The library is persisted after each mutation
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recordings_when_saved_then_store_holds_current_snapshot() {
    // Given: A fresh manager
    let mut h = Harness::new();

    // When: Recording twice
    h.record(2).await;

    // Then: Two writes and the stored snapshot matches memory
    assert_eq!(h.store.writes(), 2);
    assert_eq!(
        h.store.value(LIBRARY_KEY).unwrap(),
        h.manager.snapshot().unwrap()
    );
}

/// WHAT: A manager restarted on the same store sees the same library
/// WHY: snapshot then load must reproduce the ordered persisted fields
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_saved_library_when_reloaded_then_same_ordered_fields() {
    // Given: Three recordings of different lengths
    let mut h = Harness::new();
    for millis in [5_000, 65_000, 600_000] {
        h.audio.set_duration_millis(millis);
        h.record(1).await;
    }
    let stored = h.store.value(LIBRARY_KEY).unwrap();

    // When: A new manager loads from that snapshot
    let mut restarted = Harness::with_store(MemoryStore::with_value(LIBRARY_KEY, &stored));
    let loaded = restarted.manager.load_all().await;

    // Then: Same entries, same order, same formatted durations
    assert_eq!(loaded, 3);
    assert_eq!(
        persisted_fields(restarted.manager.library()),
        persisted_fields(h.manager.library())
    );
    let durations: Vec<&str> = restarted
        .manager
        .library()
        .iter()
        .map(RecordingEntry::duration_formatted)
        .collect();
    assert_eq!(durations, vec!["0:05", "1:05", "10:00"]);
}

/// WHAT: An empty store loads an empty library
/// WHY: First launch has no prior data
#[tokio::test]
async fn given_empty_store_when_loading_then_empty_library() {
    let mut h = Harness::new();

    assert_eq!(h.manager.load_all().await, 0);
    assert!(h.manager.library().is_empty());
}

/// WHAT: Undecodable snapshots load as empty
/// WHY: Corrupt data is treated as no prior data, not a fatal error
#[tokio::test]
async fn given_corrupt_snapshot_when_loading_then_empty_library() {
    // Given: Garbage under the library key
    let mut h = Harness::with_store(MemoryStore::with_value(LIBRARY_KEY, "[{\"id\":"));

    // When: Loading
    let loaded = h.manager.load_all().await;

    // Then: Empty
    assert_eq!(loaded, 0);
    assert!(h.manager.library().is_empty());
}

/// WHAT: Read failures load as empty
/// WHY: An unreachable store must not stop the app from starting
#[tokio::test]
async fn given_failing_store_when_loading_then_empty_library() {
    // Given: A store that cannot be read
    let store = MemoryStore::new();
    store.fail_reads();
    let mut h = Harness::with_store(store);

    // When/Then: Loads nothing
    assert_eq!(h.manager.load_all().await, 0);
}

/// WHAT: Append stands when the store write fails
/// WHY: Optimistic write-through; the next successful write supersedes
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_write_failure_when_saving_then_entry_kept_and_next_write_supersedes() {
    // Given: A store failing writes
    let mut h = Harness::new();
    h.store.fail_writes(true);

    // When: Recording once while failing, then once after recovery
    h.manager.start_recording().await.unwrap();
    let result = h.manager.stop_recording().await;
    assert!(matches!(
        result,
        Err(LibraryError::PersistenceFailure { .. })
    ));
    assert_eq!(h.manager.library().len(), 1);

    h.store.fail_writes(false);
    h.record(1).await;

    // Then: Stored snapshot contains both entries
    let stored = Library::from_snapshot(&h.store.value(LIBRARY_KEY).unwrap()).unwrap();
    assert_eq!(persisted_fields(&stored), persisted_fields(h.manager.library()));
    assert_eq!(stored.len(), 2);
}

/// WHAT: Reloading stops playback and clears the marker
/// WHY: The marker must refer to an entry of the current library
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_playing_entry_when_reloading_then_marker_cleared() {
    // Given: A playing recording
    let mut h = Harness::new();
    h.record(1).await;
    let a = h.manager.entry_id_at(0).unwrap();
    h.manager.toggle_playback(a).await.unwrap();

    // When: Reloading from the store
    h.manager.load_all().await;

    // Then: Nothing playing, entry still present
    assert_eq!(h.manager.currently_playing(), None);
    assert!(h.audio.playing_files().is_empty());
    assert_eq!(h.manager.entry_id_at(0), Some(a));
}

/// WHAT: Reloading releases sounds loaded for the previous library
/// WHY: Restored entries reload lazily, the old handles are never used again
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_loaded_sounds_when_reloading_then_sounds_released() {
    // Given: Two recordings with loaded sounds
    let mut h = Harness::new();
    h.record(2).await;
    assert_eq!(h.audio.loaded_sounds(), 2);

    // When: Reloading from the store
    let loaded = h.manager.load_all().await;

    // Then: Same entries, no sounds held
    assert_eq!(loaded, 2);
    assert_eq!(h.audio.call_count(DeviceOp::Unload), 2);
    assert_eq!(h.audio.loaded_sounds(), 0);
}
