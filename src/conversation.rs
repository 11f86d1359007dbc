// ABOUTME: Conversation turn types and evidence injection
// ABOUTME: Carries evidence blocks as distinct turns until model request building
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Conversation model
//!
//! A conversation is an ordered list of turns. Caller-authored messages and
//! injected evidence blocks are distinct variants so that injection position
//! is an explicit transformation rather than array surgery, and so the final
//! request builder can decide how evidence is presented to the provider.

/// A single caller-authored message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessage {
    /// Message role: `system`, `user`, or `assistant`
    pub role: String,
    /// Text content, always non-empty after normalization
    pub text: String,
    /// Inline image references (data URIs), possibly empty
    pub images: Vec<String>,
}

impl ConversationMessage {
    /// True for system-role messages
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role.eq_ignore_ascii_case("system")
    }

    /// True for user-role messages
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role.eq_ignore_ascii_case("user")
    }
}

/// One turn in the conversation handed to the model request builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// A caller-authored message
    Message(ConversationMessage),
    /// A synthetic evidence block injected by the pipeline
    Evidence(String),
}

/// Ordered conversation with evidence injection
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Build a conversation from normalized messages
    #[must_use]
    pub fn from_messages(messages: Vec<ConversationMessage>) -> Self {
        Self {
            turns: messages.into_iter().map(Turn::Message).collect(),
        }
    }

    /// All turns in order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Text of the most recent user-authored message, if any
    #[must_use]
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|turn| match turn {
            Turn::Message(msg) if msg.is_user() => Some(msg.text.as_str()),
            _ => None,
        })
    }

    /// Insert an evidence block immediately before the last turn
    ///
    /// The evidence then reads as context right before the newest message.
    /// Empty evidence leaves the conversation unchanged. Each call inserts
    /// one evidence turn, so multiple blocks stack in call order.
    pub fn inject_evidence(&mut self, evidence: &str) {
        if evidence.trim().is_empty() {
            return;
        }
        let position = self.turns.len().saturating_sub(1);
        self.turns
            .insert(position, Turn::Evidence(evidence.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: &str, text: &str) -> ConversationMessage {
        ConversationMessage {
            role: role.to_owned(),
            text: text.to_owned(),
            images: Vec::new(),
        }
    }

    #[test]
    fn evidence_inserted_before_last_turn() {
        let mut conv = Conversation::from_messages(vec![
            msg("system", "You are helpful"),
            msg("user", "hello"),
            msg("assistant", "hi"),
            msg("user", "red shoes under 2000"),
        ]);
        conv.inject_evidence("web evidence");

        assert_eq!(conv.turns().len(), 5);
        assert!(matches!(&conv.turns()[3], Turn::Evidence(e) if e == "web evidence"));
        assert!(matches!(&conv.turns()[4], Turn::Message(m) if m.text == "red shoes under 2000"));
    }

    #[test]
    fn two_blocks_stack_in_call_order() {
        let mut conv = Conversation::from_messages(vec![msg("user", "query")]);
        conv.inject_evidence("web");
        conv.inject_evidence("catalog");

        // Both precede the newest message, web first.
        assert!(matches!(&conv.turns()[0], Turn::Evidence(e) if e == "web"));
        assert!(matches!(&conv.turns()[1], Turn::Evidence(e) if e == "catalog"));
        assert!(matches!(&conv.turns()[2], Turn::Message(_)));
    }

    #[test]
    fn empty_evidence_is_a_no_op() {
        let mut conv = Conversation::from_messages(vec![msg("user", "query")]);
        conv.inject_evidence("");
        conv.inject_evidence("   ");
        assert_eq!(conv.turns().len(), 1);
    }

    #[test]
    fn last_user_text_skips_assistant_turns() {
        let conv = Conversation::from_messages(vec![
            msg("user", "first"),
            msg("assistant", "reply"),
        ]);
        assert_eq!(conv.last_user_text(), Some("first"));

        let empty = Conversation::from_messages(vec![msg("assistant", "reply")]);
        assert_eq!(empty.last_user_text(), None);
    }
}
