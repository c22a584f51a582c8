//! Conversation memory: an append-only log of question/answer turns

use crate::types::ConversationTurn;

/// Ordered log of prior turns in the current session.
///
/// Grows without bound within a session; the prompt assembler decides how much
/// of it to replay. Cleared exactly when a new corpus replaces the index.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
    next_seq: u64,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed turn with the next sequence number
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ConversationTurn {
            seq: self.next_seq,
            question: question.into(),
            answer: answer.into(),
        });
        self.next_seq += 1;
    }

    /// All turns, oldest first
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Reset to empty; invoked when a new corpus is loaded
    pub fn clear(&mut self) {
        self.turns.clear();
        self.next_seq = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order_with_monotonic_seq() {
        let mut memory = ConversationMemory::new();
        memory.append("q1", "a1");
        memory.append("q2", "a2");

        let history = memory.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].seq, 0);
        assert_eq!(history[0].question, "q1");
        assert_eq!(history[1].seq, 1);
        assert_eq!(history[1].answer, "a2");
    }

    #[test]
    fn clear_resets_log_and_sequence() {
        let mut memory = ConversationMemory::new();
        memory.append("q", "a");
        memory.clear();

        assert!(memory.is_empty());
        memory.append("q2", "a2");
        assert_eq!(memory.history()[0].seq, 0);
    }
}
