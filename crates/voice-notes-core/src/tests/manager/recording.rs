use crate::{
    LibraryError, SessionState, SessionStatus,
    tests::fakes::{DeviceOp, Harness},
};

/// WHAT: Start then stop appends exactly one formatted entry
/// WHY: The happy path of the recording lifecycle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_session_when_start_then_stop_then_entry_appended() {
    // Given: A fresh manager that will report a 65s capture
    let mut h = Harness::new();
    h.audio.set_duration_millis(65_000);

    // When: Recording and stopping
    h.manager.start_recording().await.unwrap();
    assert!(h.manager.state().is_recording());
    h.manager.stop_recording().await.unwrap();

    // Then: Idle again with one entry holding a loaded sound
    assert_eq!(*h.manager.state(), SessionState::Idle);
    assert_eq!(h.manager.library().len(), 1);
    let entry = h.manager.library().get(0).unwrap();
    assert_eq!(entry.duration_formatted(), "1:05");
    assert!(entry.sound().is_some());
    assert_eq!(
        h.audio.calls(),
        vec![
            DeviceOp::RequestPermission,
            DeviceOp::Configure,
            DeviceOp::StartCapture,
            DeviceOp::StopCapture,
            DeviceOp::LoadSound,
        ]
    );
}

/// WHAT: Permission denial leaves state Idle and library unchanged
/// WHY: Denial is an advisory, not a crash or a partial session
#[tokio::test]
async fn given_permission_denied_when_starting_then_idle_with_advisory() {
    // Given: A device that refuses microphone access
    let mut h = Harness::new();
    h.audio.deny_permission();

    // When: Attempting to start
    let result = h.manager.start_recording().await;

    // Then: Reported as PermissionDenied, nothing captured
    assert!(matches!(result, Err(LibraryError::PermissionDenied { .. })));
    assert!(h.manager.state().is_idle());
    assert!(h.manager.library().is_empty());
    assert!(h.manager.advisory().is_some());
    assert_eq!(h.audio.call_count(DeviceOp::StartCapture), 0);
}

/// WHAT: A successful start clears a previous advisory
/// WHY: Stale permission messages should not linger once access works
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_advisory_set_when_start_succeeds_then_advisory_cleared() {
    // Given: A manager whose last start was denied
    let mut h = Harness::new();
    h.audio.deny_permission();
    let _ = h.manager.start_recording().await;
    assert!(h.manager.advisory().is_some());

    // When: Permission is granted and start is retried
    h.audio.grant_permission();
    h.manager.start_recording().await.unwrap();

    // Then: No advisory
    assert!(h.manager.advisory().is_none());
    assert!(h.manager.view().advisory.is_none());
}

/// WHAT: Device failures during start revert to Idle
/// WHY: Configure or start failures must not leave a phantom session
#[tokio::test]
async fn given_device_failure_on_start_when_starting_then_idle_and_device_failure() {
    for op in [
        DeviceOp::RequestPermission,
        DeviceOp::Configure,
        DeviceOp::StartCapture,
    ] {
        // Given: A device failing at one step of the start sequence
        let mut h = Harness::new();
        h.audio.fail(op);

        // When: Starting
        let result = h.manager.start_recording().await;

        // Then: DeviceFailure and Idle, no advisory
        assert!(
            matches!(result, Err(LibraryError::DeviceFailure { .. })),
            "{:?}",
            op
        );
        assert!(h.manager.state().is_idle());
        assert!(h.manager.advisory().is_none());
        assert_eq!(h.audio.active_captures(), 0);
    }
}

/// WHAT: Stopping while idle is a no-op
/// WHY: Redundant stop intents must not append or call the device
#[tokio::test]
async fn given_idle_session_when_stopping_then_no_op() {
    // Given: An idle manager
    let mut h = Harness::new();

    // When: Stopping
    let result = h.manager.stop_recording().await;

    // Then: Ok with no device calls and no entry
    assert!(result.is_ok());
    assert!(h.audio.calls().is_empty());
    assert!(h.manager.library().is_empty());
}

/// WHAT: Starting while recording is a no-op
/// WHY: Only one capture may be in progress
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_session_when_starting_again_then_no_op() {
    // Given: A recording manager
    let mut h = Harness::new();
    h.manager.start_recording().await.unwrap();

    // When: Starting again
    h.manager.start_recording().await.unwrap();

    // Then: Still one capture, still recording
    assert_eq!(h.audio.call_count(DeviceOp::StartCapture), 1);
    assert_eq!(h.audio.active_captures(), 1);
    assert!(h.manager.state().is_recording());
}

/// WHAT: A failed stop discards the capture and returns to Idle
/// WHY: Re-recording is the recovery path; no partial entries
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stop_capture_failure_when_stopping_then_idle_and_nothing_appended() {
    // Given: A recording session whose stop will fail
    let mut h = Harness::new();
    h.manager.start_recording().await.unwrap();
    h.audio.fail(DeviceOp::StopCapture);

    // When: Stopping
    let result = h.manager.stop_recording().await;

    // Then: DeviceFailure, idle, empty library, nothing persisted
    assert!(matches!(result, Err(LibraryError::DeviceFailure { .. })));
    assert!(h.manager.state().is_idle());
    assert!(h.manager.library().is_empty());
    assert_eq!(h.store.writes(), 0);
}

/// WHAT: Failing to load the captured file discards the entry
/// WHY: An entry without a playable source must never reach the library
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_load_failure_when_stopping_then_finalization_failure() {
    // Given: A recording session whose finalization will fail
    let mut h = Harness::new();
    h.manager.start_recording().await.unwrap();
    h.audio.fail(DeviceOp::LoadSound);

    // When: Stopping
    let result = h.manager.stop_recording().await;

    // Then: FinalizationFailure and no entry
    assert!(matches!(
        result,
        Err(LibraryError::FinalizationFailure { .. })
    ));
    assert!(h.manager.state().is_idle());
    assert!(h.manager.library().is_empty());
}

/// WHAT: Arbitrary start/stop sequences only ever show Idle or Recording
/// WHY: Requesting is internal; appends happen only after a real start
#[tokio::test]
async fn given_mixed_start_stop_sequence_when_applied_then_state_and_count_consistent() {
    #[derive(Clone, Copy)]
    enum Step {
        Start,
        Stop,
        Deny,
        Grant,
        FailStop,
        Recover,
    }
    use Step::*;

    // Given: A scripted sequence including redundant and failing calls
    let mut h = Harness::new();
    let script = [
        Stop, Start, Start, Stop, Stop, Deny, Start, Stop, Grant, Start, Stop, Start, FailStop,
        Stop, Recover, Start, Stop,
    ];
    let mut expected_entries = 0;

    // When: Applying every step
    for step in script {
        match step {
            Start => {
                let _ = h.manager.start_recording().await;
            }
            Stop => {
                let was_recording = h.manager.state().is_recording();
                if h.manager.stop_recording().await.is_ok() && was_recording {
                    expected_entries += 1;
                }
            }
            Deny => h.audio.deny_permission(),
            Grant => h.audio.grant_permission(),
            FailStop => h.audio.fail(DeviceOp::StopCapture),
            Recover => h.audio.recover(DeviceOp::StopCapture),
        }

        // Then: Visible state is always Idle or Recording
        assert!(matches!(
            h.manager.state(),
            SessionState::Idle | SessionState::Recording { .. }
        ));
    }

    assert_eq!(expected_entries, 3);
    assert_eq!(h.manager.library().len(), expected_entries);
}

/// WHAT: Toggle dispatches on the current state
/// WHY: The front end uses a single record key
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_when_toggling_twice_then_one_entry_recorded() {
    // Given: An idle manager
    let mut h = Harness::new();

    // When: Toggling on, checking the view, and toggling off
    h.manager.toggle_recording().await.unwrap();
    assert!(matches!(
        h.manager.view().session,
        SessionStatus::Recording { .. }
    ));
    h.manager.toggle_recording().await.unwrap();

    // Then: One entry and idle
    assert_eq!(h.manager.library().len(), 1);
    assert_eq!(h.manager.view().session, SessionStatus::Idle);
}
