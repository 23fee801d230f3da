//! Specialization routing for the Progrify voice agent.
//!
//! The router is the one piece of decision-making logic in the platform
//! integration: given the current specialization and an inbound text
//! payload, it decides whether to switch modes and which canned responses
//! to emit. Everything else (transport, audio, LLM) lives behind the
//! session adapter in `progrify-voice`.
//!
//! Routing is explicit data flow: the caller passes the current state in
//! and gets the next state and the messages to emit back. There is no
//! shared mutable router state and the routing function never panics.

pub mod catalog;

pub use catalog::{
    response_for, Specialization, AGENT_INSTRUCTION, DEFAULT_SPECIALIZATION, SESSION_GREETING,
    SPECIALIZATIONS, SWITCH_PHRASE,
};

use serde_json::Value;

/// Result of routing one inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The payload was handled. `next` is the specialization the caller
    /// must carry into the next call; `messages` are emitted in order.
    Routed {
        next: String,
        messages: Vec<String>,
    },
    /// The payload could not be interpreted as text. The caller decides
    /// what to tell the remote party (the apology text is deliberately
    /// not produced here).
    Failed { reason: String },
}

/// Routes one inbound payload against the current specialization.
///
/// The payload may be a bare string or a JSON object with a `text` field;
/// malformed JSON is treated as plain text. The decision procedure:
///
/// 1. Lower-case the text.
/// 2. If it contains [`SWITCH_PHRASE`], scan [`SPECIALIZATIONS`] in
///    declaration order; the first key that occurs as a substring wins.
///    The state becomes that key and two messages are emitted: the switch
///    acknowledgement, then the key's canned response. Remaining keys are
///    never checked, even if they also appear in the text. This tie-break
///    is deterministic by declaration order and is asserted by tests; do
///    not "fix" it without a product decision.
/// 3. Otherwise emit the canned response for `current`, or the session
///    greeting when `current` has no catalog entry.
pub fn route(current: &str, payload: &str) -> RouteOutcome {
    let text = match extract_text(payload) {
        Ok(text) => text,
        Err(reason) => return RouteOutcome::Failed { reason },
    };

    let lower = text.to_lowercase();
    if lower.contains(SWITCH_PHRASE) {
        for spec in SPECIALIZATIONS {
            if lower.contains(spec.key) {
                tracing::info!(from = current, to = spec.key, "switching specialization");
                return RouteOutcome::Routed {
                    next: spec.key.to_string(),
                    messages: vec![
                        format!("Switched to {} mode.", spec.key),
                        spec.response.to_string(),
                    ],
                };
            }
        }
    }

    let reply = response_for(current).unwrap_or(SESSION_GREETING);
    RouteOutcome::Routed {
        next: current.to_string(),
        messages: vec![reply.to_string()],
    }
}

/// Extracts the text to route from a raw payload.
///
/// A payload that parses as a JSON object yields its `text` field when
/// that field is a string, or the raw payload when the field is absent.
/// A payload that is not valid JSON is the text itself. A payload that
/// parses to any other JSON shape (array, number, non-string `text`) is
/// rejected, since there is no sensible text to route.
fn extract_text(payload: &str) -> Result<String, String> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => match map.get("text") {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Err(format!(
                "payload `text` field is not a string: {}",
                json_kind(other)
            )),
            None => Ok(payload.to_string()),
        },
        Ok(other) => Err(format!(
            "payload decodes to a JSON {}, not an object or plain text",
            json_kind(&other)
        )),
        Err(_) => Ok(payload.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routed(outcome: RouteOutcome) -> (String, Vec<String>) {
        match outcome {
            RouteOutcome::Routed { next, messages } => (next, messages),
            RouteOutcome::Failed { reason } => panic!("unexpected Failed: {}", reason),
        }
    }

    #[test]
    fn switch_sets_state_and_emits_ack_then_response() {
        for spec in SPECIALIZATIONS {
            let input = format!("please switch to {} now", spec.key);
            let (next, messages) = routed(route(DEFAULT_SPECIALIZATION, &input));
            assert_eq!(next, spec.key);
            assert_eq!(
                messages,
                vec![format!("Switched to {} mode.", spec.key), spec.response.to_string()]
            );
        }
    }

    #[test]
    fn switch_is_case_insensitive() {
        let (next, messages) = routed(route("general", "SWITCH TO Coding please"));
        assert_eq!(next, "coding");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Switched to coding mode.");
    }

    #[test]
    fn json_payload_with_text_field_is_routed() {
        let (next, messages) = routed(route("general", r#"{"text":"please switch to coding now"}"#));
        assert_eq!(next, "coding");
        assert_eq!(messages[0], "Switched to coding mode.");
        assert_eq!(messages[1], response_for("coding").unwrap());
    }

    #[test]
    fn first_declared_key_wins_when_several_match() {
        // "sales" appears first in the utterance but "coding" is declared
        // earlier in the catalog, so "coding" wins.
        let (next, messages) = routed(route("general", "switch to sales or coding"));
        assert_eq!(next, "coding");
        assert_eq!(messages[0], "Switched to coding mode.");
    }

    #[test]
    fn non_switch_input_emits_current_canned_response() {
        let (next, messages) = routed(route("prompt", "how do I phrase this?"));
        assert_eq!(next, "prompt");
        assert_eq!(messages, vec![response_for("prompt").unwrap().to_string()]);
    }

    #[test]
    fn unknown_state_emits_greeting() {
        let (next, messages) = routed(route("general", "hello"));
        assert_eq!(next, "general");
        assert_eq!(messages, vec![SESSION_GREETING.to_string()]);
    }

    #[test]
    fn repeated_non_switch_input_is_idempotent() {
        let first = route("coding", "same question");
        let second = route("coding", "same question");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_json_is_treated_as_plain_text() {
        let (next, messages) = routed(route("general", "{not json"));
        assert_eq!(next, "general");
        assert_eq!(messages, vec![SESSION_GREETING.to_string()]);
    }

    #[test]
    fn malformed_json_containing_switch_phrase_still_switches() {
        let (next, _) = routed(route("general", "{oops switch to product"));
        assert_eq!(next, "product");
    }

    #[test]
    fn json_object_without_text_field_routes_the_raw_payload() {
        // No `text` field: the raw payload string is routed. It happens
        // to contain "switch to" and "coding" as literal JSON text, so
        // the scan fires on it.
        let (next, messages) = routed(route("general", r#"{"msg":"switch to coding"}"#));
        assert_eq!(next, "coding");
        assert_eq!(messages[0], "Switched to coding mode.");
    }

    #[test]
    fn non_object_json_payload_fails() {
        match route("general", "[1, 2, 3]") {
            RouteOutcome::Failed { reason } => assert!(reason.contains("array")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn non_string_text_field_fails() {
        match route("general", r#"{"text": 5}"#) {
            RouteOutcome::Failed { reason } => assert!(reason.contains("number")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn switch_phrase_without_any_key_falls_through() {
        let (next, messages) = routed(route("sales", "switch to something else"));
        assert_eq!(next, "sales");
        assert_eq!(messages, vec![response_for("sales").unwrap().to_string()]);
    }

    #[test]
    fn catalog_keys_are_unique() {
        for (i, a) in SPECIALIZATIONS.iter().enumerate() {
            for b in &SPECIALIZATIONS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
