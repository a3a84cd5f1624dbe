//! Agent descriptors: the four roles as data

use serde::Serialize;

use crate::domain::StageKind;

/// Role of an agent in the crew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Research,
    Copywriter,
    ArtDirector,
    Manager,
}

impl AgentRole {
    /// The role responsible for a stage
    pub fn for_stage(stage: StageKind) -> Self {
        match stage {
            StageKind::Research => Self::Research,
            StageKind::Copywriting => Self::Copywriter,
            StageKind::VisualDirection => Self::ArtDirector,
            StageKind::Management => Self::Manager,
        }
    }

    /// Static descriptor for this role
    pub fn descriptor(&self) -> &'static AgentDescriptor {
        match self {
            Self::Research => &RESEARCH,
            Self::Copywriter => &COPYWRITER,
            Self::ArtDirector => &ART_DIRECTOR,
            Self::Manager => &MANAGER,
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Copywriter => write!(f, "copywriter"),
            Self::ArtDirector => write!(f, "art_director"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

/// Static configuration for one agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDescriptor {
    pub role: AgentRole,
    pub title: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,

    /// Sampling temperature; `None` defers to `llm.temperature`
    pub temperature: Option<f32>,

    /// Names of the tools this agent may call
    pub tools: &'static [&'static str],

    /// Tool-calling rounds before a final answer is forced
    pub max_tool_rounds: u32,
}

pub static RESEARCH: AgentDescriptor = AgentDescriptor {
    role: AgentRole::Research,
    title: "Senior Market Research Analyst",
    goal: "Conduct comprehensive market research including trend analysis, competitor profiling and \
           audience persona synthesis. Deliver actionable insights the creative team can build on.",
    backstory: "You have 15 years of experience in market intelligence at top agencies (Ogilvy, McKinsey). \
                You combine quantitative rigour with qualitative intuition. You always cite data points and \
                surface non-obvious opportunities that give campaigns an edge.",
    temperature: Some(0.3),
    tools: &["trend_research", "competitor_analysis"],
    max_tool_rounds: 5,
};

pub static COPYWRITER: AgentDescriptor = AgentDescriptor {
    role: AgentRole::Copywriter,
    title: "Senior Creative Copywriter",
    goal: "Craft persuasive and emotionally resonant copy that aligns with the brand voice while \
           maximising conversion.",
    backstory: "You're a multi-award-winning copywriter who has crafted campaigns for Apple, Nike, and Airbnb. \
                You obsess over clarity, rhythm, and calls-to-action.",
    temperature: Some(0.7),
    tools: &["copy_evaluator"],
    max_tool_rounds: 5,
};

pub static ART_DIRECTOR: AgentDescriptor = AgentDescriptor {
    role: AgentRole::ArtDirector,
    title: "Senior Art Director",
    goal: "Translate strategy into visual systems and storytelling that feel premium, modern, and memorable.",
    backstory: "You have led global brand systems for luxury and tech brands. You turn abstract ideas into \
                striking visual concepts and are obsessed with detail and composition.",
    temperature: Some(0.6),
    tools: &["image_prompt_generator"],
    max_tool_rounds: 4,
};

pub static MANAGER: AgentDescriptor = AgentDescriptor {
    role: AgentRole::Manager,
    title: "Campaign Strategy Director",
    goal: "Synthesize research, copy, and visuals into a cohesive campaign plan with clear next steps and KPIs.",
    backstory: "You're a seasoned strategy director who connects the dots between insights, creative, and \
                execution. You obsess over clarity, prioritization, and measurable outcomes.",
    temperature: Some(0.4),
    tools: &[],
    max_tool_rounds: 4,
};

/// The full crew in stage order
pub fn roster() -> [&'static AgentDescriptor; 4] {
    StageKind::ALL.map(|stage| AgentRole::for_stage(stage).descriptor())
}
