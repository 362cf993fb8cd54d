//! Capture session state machine types.

use serde::{Deserialize, Serialize};

/// The current state of a capture session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CaptureState {
    /// No capture loop is active.
    #[default]
    Idle,

    /// The loop is scheduled and cycling.
    Running {
        /// What the current cycle is doing.
        status: LoopStatus,
    },

    /// Cancellation requested; the last in-flight cycle is draining.
    Stopping {
        /// Why the session is stopping.
        reason: StopReason,
    },
}

impl CaptureState {
    /// Returns true if no loop is active.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if the loop is cycling.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Returns true if the session is draining.
    pub fn is_stopping(&self) -> bool {
        matches!(self, Self::Stopping { .. })
    }

    /// Returns a simple string representation of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running { .. } => "Running",
            Self::Stopping { .. } => "Stopping",
        }
    }
}

/// What the capture loop is doing in its current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopStatus {
    /// A frame has been dispatched and the loop is awaiting the result.
    Analyzing,

    /// No acquired source is ready; retrying next cycle.
    WaitingForSource,

    /// A source is resolved but not yet producing frames; retrying
    /// next cycle.
    WaitingForVideo,
}

impl LoopStatus {
    /// User-facing status line.
    pub fn message(self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::WaitingForSource => "waiting for source",
            Self::WaitingForVideo => "waiting for video",
        }
    }
}

/// Reason a capture session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// User requested stop.
    UserRequested,

    /// A finite source (uploaded file) finished playback.
    SourceExhausted,
}

impl StopReason {
    /// Returns a display message for this reason.
    pub fn message(self) -> &'static str {
        match self {
            Self::UserRequested => "capture stopped by user",
            Self::SourceExhausted => "source finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(CaptureState::Idle.is_idle());
        assert!(CaptureState::Running {
            status: LoopStatus::Analyzing
        }
        .is_running());
        assert!(CaptureState::Stopping {
            reason: StopReason::UserRequested
        }
        .is_stopping());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(LoopStatus::WaitingForSource.message(), "waiting for source");
        assert_eq!(LoopStatus::WaitingForVideo.message(), "waiting for video");
    }
}
