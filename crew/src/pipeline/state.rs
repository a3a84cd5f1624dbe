//! Pipeline progress state and events

use serde::Serialize;
use std::time::Duration;

use crate::domain::StageKind;

/// Last milestone a run has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Pending,
    ResearchDone,
    CopyDone,
    VisualDone,
    ManagedDone,
}

impl PipelineState {
    /// State reached once `stage` completes
    pub fn after(stage: StageKind) -> Self {
        match stage {
            StageKind::Research => Self::ResearchDone,
            StageKind::Copywriting => Self::CopyDone,
            StageKind::VisualDirection => Self::VisualDone,
            StageKind::Management => Self::ManagedDone,
        }
    }

    pub fn is_complete(&self) -> bool {
        *self == Self::ManagedDone
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::ResearchDone => write!(f, "research_done"),
            Self::CopyDone => write!(f, "copy_done"),
            Self::VisualDone => write!(f, "visual_done"),
            Self::ManagedDone => write!(f, "managed_done"),
        }
    }
}

/// Progress notifications for a front end
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    StageStarted {
        stage: StageKind,
        agent: &'static str,
    },
    StageCompleted {
        stage: StageKind,
        agent: &'static str,
        output_chars: usize,
        elapsed: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_after_each_stage() {
        let states: Vec<_> = StageKind::ALL.iter().map(|s| PipelineState::after(*s)).collect();
        assert_eq!(
            states,
            vec![
                PipelineState::ResearchDone,
                PipelineState::CopyDone,
                PipelineState::VisualDone,
                PipelineState::ManagedDone
            ]
        );
        assert!(PipelineState::ManagedDone.is_complete());
        assert!(!PipelineState::default().is_complete());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Pending.to_string(), "pending");
        assert_eq!(PipelineState::VisualDone.to_string(), "visual_done");
    }
}
