use crate::{EntryId, RecordingManager, SessionState};

use std::time::Duration;

/// Session as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Ready to record.
    Idle,
    /// Capturing.
    Recording {
        /// Time since the capture started.
        elapsed: Duration,
    },
}

/// One library row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// 1-based position as displayed ("Recording 1").
    pub position: usize,
    /// Entry id.
    pub id: EntryId,
    /// Duration as `m:ss`.
    pub duration: String,
    /// Whether this entry is the one playing.
    pub is_playing: bool,
}

/// Read-only snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerView {
    /// Recording session status.
    pub session: SessionStatus,
    /// Library rows in display order.
    pub entries: Vec<EntryView>,
    /// User-facing advisory, if one is set.
    pub advisory: Option<String>,
}

impl RecordingManager {
    /// Snapshot the current state for rendering.
    pub fn view(&self) -> ManagerView {
        let session = match self.state {
            SessionState::Recording { started_at, .. } => SessionStatus::Recording {
                elapsed: started_at.elapsed(),
            },
            SessionState::Idle | SessionState::Requesting => SessionStatus::Idle,
        };

        let entries = self
            .library
            .iter()
            .enumerate()
            .map(|(index, entry)| EntryView {
                position: index + 1,
                id: entry.id(),
                duration: entry.duration_formatted().to_string(),
                is_playing: self.currently_playing == Some(entry.id()),
            })
            .collect();

        ManagerView {
            session,
            entries,
            advisory: self.advisory.clone(),
        }
    }
}
