//! Upload state machine — app-owned, SDK-provided transitions.
//!
//! `Idle → Uploading(0..=100) → Processing → Signed | Failed`
//!
//! Progress never moves backwards and the two terminal states are final.
//! A failed upload is not resumed; start over with [`UploadTracker::reset`].

use super::progress::percent;
use super::{SignedFile, UploadEvent};

/// Where a single upload currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading {
        percent: u8,
    },
    Processing,
    Signed(SignedFile),
    Failed(String),
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed(_) | Self::Failed(_))
    }

    /// Progress bar fill.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Uploading { percent } => *percent,
            Self::Processing | Self::Signed(_) | Self::Failed(_) => 100,
        }
    }

    /// Status line shown under the progress bar.
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "No file selected".to_string(),
            Self::Uploading { percent } => format!("Uploading: {}%", percent),
            Self::Processing => "Processing file...".to_string(),
            Self::Signed(_) => "File signed successfully!".to_string(),
            Self::Failed(message) => message.clone(),
        }
    }
}

/// Applies [`UploadEvent`]s to an [`UploadState`].
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    state: UploadState,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Apply an event. Returns `false` when the event is not a legal
    /// transition from the current state (the state is left unchanged).
    pub fn apply(&mut self, event: &UploadEvent) -> bool {
        let next = match (&self.state, event) {
            (state, _) if state.is_terminal() => return false,

            (UploadState::Idle, UploadEvent::Progress { sent, total }) => UploadState::Uploading {
                percent: percent(*sent, *total),
            },
            (UploadState::Uploading { percent: current }, UploadEvent::Progress { sent, total }) => {
                UploadState::Uploading {
                    percent: percent(*sent, *total).max(*current),
                }
            }
            (UploadState::Processing, UploadEvent::Progress { .. }) => return false,

            (UploadState::Idle | UploadState::Uploading { .. }, UploadEvent::Processing) => {
                UploadState::Processing
            }
            (UploadState::Processing, UploadEvent::Processing) => return false,

            (_, UploadEvent::Signed(file)) => UploadState::Signed(file.clone()),
            (_, UploadEvent::Failed(message)) => UploadState::Failed(message.clone()),

            (UploadState::Signed(_) | UploadState::Failed(_), _) => return false,
        };
        self.state = next;
        true
    }

    /// Start over for a newly selected file.
    pub fn reset(&mut self) {
        self.state = UploadState::Idle;
    }

    /// Record a completed file, picking the terminal event from its status.
    pub fn settle(&mut self, file: &SignedFile) -> bool {
        use super::FileStatus;
        match file.status {
            FileStatus::Signed => self.apply(&UploadEvent::Signed(file.clone())),
            FileStatus::Failed => self.apply(&UploadEvent::Failed("File signing failed".to_string())),
            FileStatus::Pending | FileStatus::InProgress => self.apply(&UploadEvent::Processing),
        }
    }
}
