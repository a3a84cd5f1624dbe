//! Stage kinds, tasks, and results

use serde::{Deserialize, Serialize};

/// One node in the fixed four-step chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Research,
    Copywriting,
    VisualDirection,
    Management,
}

impl StageKind {
    /// Execution order
    pub const ALL: [StageKind; 4] = [
        Self::Research,
        Self::Copywriting,
        Self::VisualDirection,
        Self::Management,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Copywriting => "copywriting",
            Self::VisualDirection => "visual_direction",
            Self::Management => "management",
        }
    }

    /// Human-readable heading
    pub fn title(&self) -> &'static str {
        match self {
            Self::Research => "Market Research",
            Self::Copywriting => "Copywriting",
            Self::VisualDirection => "Visual Direction",
            Self::Management => "Campaign Strategy",
        }
    }

    /// 1-based position in the chain
    pub fn position(&self) -> usize {
        match self {
            Self::Research => 1,
            Self::Copywriting => 2,
            Self::VisualDirection => 3,
            Self::Management => 4,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of one completed stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: StageKind,

    /// Title of the agent that produced the output
    pub agent: String,

    /// Raw model text
    pub output: String,
}

impl StageResult {
    pub fn new(stage: StageKind, agent: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            stage,
            agent: agent.into(),
            output: output.into(),
        }
    }
}

/// A rendered instruction ready for the model, plus the upstream results it was built from
///
/// Upstream results are borrowed from the run's accumulator; the task never
/// outlives the run that created it.
#[derive(Debug, Clone)]
pub struct StageTask<'a> {
    pub stage: StageKind,
    pub instruction: String,
    pub context: Vec<&'a StageResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(
            StageKind::ALL,
            [
                StageKind::Research,
                StageKind::Copywriting,
                StageKind::VisualDirection,
                StageKind::Management
            ]
        );
        for (idx, stage) in StageKind::ALL.iter().enumerate() {
            assert_eq!(stage.position(), idx + 1);
        }
        assert!(StageKind::Research < StageKind::Management);
    }

    #[test]
    fn test_stage_serde() {
        let json = serde_json::to_string(&StageKind::VisualDirection).unwrap();
        assert_eq!(json, "\"visual_direction\"");
        assert_eq!(StageKind::VisualDirection.to_string(), "visual_direction");
    }
}
