//! services/api/src/adapters/templates.rs
//!
//! Deterministic text generation. These adapters implement the vision and chat
//! ports with fixed templates, so the same input always yields the same output.

use futureme_core::domain::{VisionDraft, VisionPrompt};
use futureme_core::ports::{ReflectionService, VisionComposer};

const EMOTIONAL_IMPACT: &str =
    "You feel confident, focused, and quietly proud of your momentum.";

const REFLECTIVE_REPLY: &str = "I hear you. Given your current goals, a tiny action today \
could be to spend 15 minutes outlining the next step. What would make that easy right now?";

/// Builds a vision summary and four milestones from the user's answers.
#[derive(Clone, Copy, Default)]
pub struct TemplateVisionComposer;

impl VisionComposer for TemplateVisionComposer {
    fn compose(&self, prompt: &VisionPrompt) -> VisionDraft {
        let summary = format!(
            "In {}, you see yourself advancing in {}, living a {} lifestyle. \
             You balance growth and wellbeing with clear, achievable milestones.",
            prompt.timeline, prompt.career, prompt.lifestyle
        );
        let milestones = vec![
            format!("Define a 90-day plan toward {}", prompt.career),
            "Establish weekly reflection ritual".to_string(),
            "Ship one portfolio-worthy project".to_string(),
            "Expand your network with 5 meaningful connections".to_string(),
        ];
        VisionDraft {
            summary,
            milestones,
            emotional_impact: EMOTIONAL_IMPACT.to_string(),
        }
    }
}

/// Answers every message with the same reflective prompt.
#[derive(Clone, Copy, Default)]
pub struct FixedReflection;

impl ReflectionService for FixedReflection {
    fn reply(&self, _message: &str) -> String {
        REFLECTIVE_REPLY.to_string()
    }
}
