//! The fixed stage chain
//!
//! The dependency graph is a straight line, so it is written down as an
//! ordered list rather than computed.

use crate::agents::AgentRole;
use crate::domain::StageKind;

/// One link in the chain: which role runs it and which earlier stages it reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub kind: StageKind,
    pub role: AgentRole,
    pub requires: &'static [StageKind],
}

/// Research → Copywriting → Visual Direction → Management
pub const CHAIN: [StageSpec; 4] = [
    StageSpec {
        kind: StageKind::Research,
        role: AgentRole::Research,
        requires: &[],
    },
    StageSpec {
        kind: StageKind::Copywriting,
        role: AgentRole::Copywriter,
        requires: &[StageKind::Research],
    },
    StageSpec {
        kind: StageKind::VisualDirection,
        role: AgentRole::ArtDirector,
        requires: &[StageKind::Research, StageKind::Copywriting],
    },
    StageSpec {
        kind: StageKind::Management,
        role: AgentRole::Manager,
        requires: &[StageKind::Research, StageKind::Copywriting, StageKind::VisualDirection],
    },
];

/// Spec for a stage
pub fn spec_for(kind: StageKind) -> &'static StageSpec {
    &CHAIN[kind.position() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order_matches_stage_order() {
        let kinds: Vec<_> = CHAIN.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, StageKind::ALL.to_vec());
    }

    #[test]
    fn test_requirements_are_strictly_earlier() {
        for spec in &CHAIN {
            for required in spec.requires {
                assert!(*required < spec.kind, "{} requires later stage {}", spec.kind, required);
            }
        }
    }

    #[test]
    fn test_roles_match_stages() {
        for spec in &CHAIN {
            assert_eq!(AgentRole::for_stage(spec.kind), spec.role);
        }
        assert_eq!(spec_for(StageKind::Management).requires.len(), 3);
    }
}
