use crate::{
    EntryId, LIBRARY_KEY, Library, LibraryError,
    tests::fakes::{DeviceOp, Harness},
};

/// WHAT: Deleting the playing entry clears the marker and shifts the rest
/// WHY: No dangling playback reference may outlive its entry
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_playing_entry_when_removed_then_marker_cleared_and_entries_shift() {
    // Given: Three recordings with the middle one playing
    let mut h = Harness::new();
    h.record(3).await;
    let ids: Vec<EntryId> = (0..3).map(|i| h.manager.entry_id_at(i).unwrap()).collect();
    h.manager.toggle_playback(ids[1]).await.unwrap();

    // When: Removing index 1
    h.manager.remove_at(1).await.unwrap();

    // Then: Marker cleared, device stopped, length 2, third entry shifted left
    assert_eq!(h.manager.currently_playing(), None);
    assert!(h.audio.playing_files().is_empty());
    assert_eq!(h.manager.library().len(), 2);
    assert_eq!(h.manager.entry_id_at(0), Some(ids[0]));
    assert_eq!(h.manager.entry_id_at(1), Some(ids[2]));
}

/// WHAT: Deleting a non-playing entry leaves playback alone
/// WHY: Only the removed entry's playback is affected
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_other_entry_playing_when_removing_then_playback_continues() {
    // Given: Two recordings with the first playing
    let mut h = Harness::new();
    h.record(2).await;
    let a = h.manager.entry_id_at(0).unwrap();
    h.manager.toggle_playback(a).await.unwrap();

    // When: Removing the second
    h.manager.remove_at(1).await.unwrap();

    // Then: First still playing
    assert_eq!(h.manager.currently_playing(), Some(a));
    assert_eq!(h.audio.call_count(DeviceOp::Stop), 0);
}

/// WHAT: Removing at len is rejected without mutation or persistence
/// WHY: Out-of-range deletes are precondition checks, not crashes
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_index_at_len_when_removing_then_rejected_without_write() {
    // Given: Two saved recordings
    let mut h = Harness::new();
    h.record(2).await;
    let writes_before = h.store.writes();

    // When: Removing index 2
    let result = h.manager.remove_at(2).await;

    // Then: Rejected, unchanged, not persisted again
    assert!(matches!(
        result,
        Err(LibraryError::IndexOutOfRange { index: 2, len: 2, .. })
    ));
    assert_eq!(h.manager.library().len(), 2);
    assert_eq!(h.store.writes(), writes_before);
}

/// WHAT: Removals are persisted
/// WHY: Deleted recordings must stay deleted after restart
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_saved_entries_when_removing_then_snapshot_updated() {
    // Given: Two saved recordings
    let mut h = Harness::new();
    h.record(2).await;
    let survivor = h.manager.entry_id_at(1).unwrap();

    // When: Removing the first
    h.manager.remove_at(0).await.unwrap();

    // Then: Stored snapshot holds only the survivor
    let stored = Library::from_snapshot(&h.store.value(LIBRARY_KEY).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.get(0).unwrap().id(), survivor);
}

/// WHAT: Removal stands when persisting fails
/// WHY: In-memory state stays authoritative; the next write supersedes
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_write_failure_when_removing_then_persistence_failure_and_removed() {
    // Given: One saved recording and a failing store
    let mut h = Harness::new();
    h.record(1).await;
    h.store.fail_writes(true);

    // When: Removing it
    let result = h.manager.remove_at(0).await;

    // Then: Reported, yet the entry is gone in memory
    assert!(matches!(
        result,
        Err(LibraryError::PersistenceFailure { .. })
    ));
    assert!(h.manager.library().is_empty());
}

/// WHAT: Sharing hands the entry's file to the share target
/// WHY: Share is the only outward path for a recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_entry_when_sharing_then_file_reference_shared() {
    // Given: One recording
    let mut h = Harness::new();
    h.record(1).await;
    let id = h.manager.entry_id_at(0).unwrap();
    let file = h.manager.library().get(0).unwrap().file_reference().clone();

    // When: Sharing it
    h.manager.share(id).await.unwrap();

    // Then: The share target received the file
    assert_eq!(h.share.shared(), vec![file]);
}

/// WHAT: Share failures are swallowed
/// WHY: Sharing is fire-and-forget
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_share_target_when_sharing_then_ok() {
    // Given: One recording and a broken share target
    let mut h = Harness::new();
    h.record(1).await;
    h.share.fail();
    let id = h.manager.entry_id_at(0).unwrap();

    // When/Then: Share reports success
    assert!(h.manager.share(id).await.is_ok());
    assert!(h.share.shared().is_empty());
}

/// WHAT: Sharing an unknown id is rejected
/// WHY: Ids that are not in the library have no file to share
#[tokio::test]
async fn given_unknown_id_when_sharing_then_unknown_entry() {
    let h = Harness::new();

    let result = h.manager.share(EntryId::new()).await;

    assert!(matches!(result, Err(LibraryError::UnknownEntry { .. })));
}

/// WHAT: Deleting an entry releases its loaded sound
/// WHY: Decoded audio must not outlive the recording it belongs to
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_loaded_entries_when_removing_then_sound_unloaded() {
    // Given: Two recordings, the first playing
    let mut h = Harness::new();
    h.record(2).await;
    let a = h.manager.entry_id_at(0).unwrap();
    h.manager.toggle_playback(a).await.unwrap();
    assert_eq!(h.audio.loaded_sounds(), 2);

    // When: Deleting both
    h.manager.remove_at(0).await.unwrap();
    h.manager.remove_at(0).await.unwrap();

    // Then: Stop came before the first unload, nothing stays loaded
    let calls = h.audio.calls();
    let stop = calls.iter().position(|c| *c == DeviceOp::Stop).unwrap();
    let unload = calls.iter().position(|c| *c == DeviceOp::Unload).unwrap();
    assert!(stop < unload);
    assert_eq!(h.audio.call_count(DeviceOp::Unload), 2);
    assert_eq!(h.audio.loaded_sounds(), 0);
}

/// WHAT: A failed unload does not block the delete
/// WHY: Releasing memory is the device's concern, the library stays consistent
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_unload_when_removing_then_entry_still_removed() {
    // Given: One recording and a device that cannot unload
    let mut h = Harness::new();
    h.record(1).await;
    h.audio.fail(DeviceOp::Unload);

    // When: Deleting it
    let result = h.manager.remove_at(0).await;

    // Then: Removed and persisted
    assert!(result.is_ok());
    assert!(h.manager.library().is_empty());
    let stored = Library::from_snapshot(&h.store.value(LIBRARY_KEY).unwrap()).unwrap();
    assert!(stored.is_empty());
}
