//! The static specialization catalog.
//!
//! Specializations are fixed at compile time: four learning modules, each
//! with one canned response. The declaration order of [`SPECIALIZATIONS`]
//! is significant — the switch-phrase scan in the router checks keys in
//! this order and stops at the first match.

/// One conversational mode the agent can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specialization {
    /// Key matched against inbound text and stored as router state.
    pub key: &'static str,
    /// Canned response emitted while in this mode.
    pub response: &'static str,
}

/// The closed set of specializations, in declaration order.
pub const SPECIALIZATIONS: &[Specialization] = &[
    Specialization {
        key: "coding",
        response: "[Coding Assistant] Let's work on your code. What language or problem are we solving?",
    },
    Specialization {
        key: "prompt",
        response: "[Prompt Engineer] Let's improve your prompts. What are you trying to achieve?",
    },
    Specialization {
        key: "product",
        response: "[Product Builder] Let's plan or build your product. What's your idea?",
    },
    Specialization {
        key: "sales",
        response: "[Sales Coach] Let's practice your pitch or sales conversation. Who's your audience?",
    },
];

/// The state a fresh router starts in. Has no catalog entry, so the
/// greeting is emitted until the user switches to a module.
pub const DEFAULT_SPECIALIZATION: &str = "general";

/// Phrase that triggers a specialization switch when present in the
/// lower-cased inbound text.
pub const SWITCH_PHRASE: &str = "switch to";

/// Greeting emitted when the current specialization has no catalog entry.
pub const SESSION_GREETING: &str = "\
Welcome to PROGRIFY! I'm your AI learning assistant. I can help you with:

1. Prompt Engineering Lab
2. AI Coding Assistant
3. Digital Product Builder
4. AI Roleplay for Sales & Speaking

Which module would you like to start with?";

/// System instructions handed to the hosted LLM when a session starts.
pub const AGENT_INSTRUCTION: &str = "\
You are an advanced AI learning assistant for PROGRIFY, a platform designed to help users master:
1. Prompt Engineering
2. AI Coding
3. Digital Product Building
4. Sales & Speaking Roleplay

## Your Role
- Guide users through any of the modules they select
- Adapt to their skill level and context
- Provide clear, actionable feedback
- Keep responses concise but insightful

## Rules
- If a user is unclear, ask targeted questions
- Always explain reasoning if relevant
- Stay professional but approachable
- Use markdown for code and formatting
- Never switch modules without confirmation";

/// Looks up the canned response for a specialization key.
pub fn response_for(key: &str) -> Option<&'static str> {
    SPECIALIZATIONS
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.response)
}
