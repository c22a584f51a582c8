//! Prompt assembly: retrieved context plus conversation history

use crate::index::SearchResult;
use crate::types::ConversationTurn;

/// Builds the generator prompt from retrieval results and session history
pub struct PromptBuilder;

impl PromptBuilder {
    /// Format retrieved chunks as numbered context blocks
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();
        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n{}\n\n---\n\n",
                i + 1,
                result.chunk.citation(),
                result.chunk.text
            ));
        }
        context
    }

    /// Format the most recent turns that fit within `max_chars`, oldest first.
    ///
    /// Memory itself is unbounded; this bounds only what gets replayed into
    /// the prompt so long sessions cannot overflow the model context.
    pub fn format_history(turns: &[ConversationTurn], max_chars: usize) -> String {
        let mut included: Vec<&ConversationTurn> = Vec::new();
        let mut used = 0usize;

        for turn in turns.iter().rev() {
            let cost = turn.question.len() + turn.answer.len() + 8;
            if used + cost > max_chars {
                break;
            }
            used += cost;
            included.push(turn);
        }

        included
            .into_iter()
            .rev()
            .map(|turn| format!("Q: {}\nA: {}", turn.question, turn.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Assemble the full conversational RAG prompt
    pub fn build_chat_prompt(question: &str, context: &str, history: &str) -> String {
        let history_section = if history.is_empty() {
            String::new()
        } else {
            format!("PREVIOUS CONVERSATION:\n{history}\n\n")
        };

        format!(
            r#"You are an assistant answering questions about a set of documents.
Use only the document excerpts below. If the answer is not in them, say so
instead of guessing. Keep the conversation context in mind when the question
refers back to earlier turns.

DOCUMENT EXCERPTS:
{context}
{history_section}QUESTION: {question}

Answer:"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn result(text: &str, source: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                source: source.to_string(),
                page: None,
                text: text.to_string(),
                char_start: 0,
                char_end: text.len(),
                seq: 0,
            },
            similarity: 0.9,
        }
    }

    fn turn(seq: u64, question: &str, answer: &str) -> ConversationTurn {
        ConversationTurn {
            seq,
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn context_blocks_are_numbered_with_citations() {
        let context = PromptBuilder::build_context(&[
            result("alpha text", "a.txt"),
            result("beta text", "b.txt"),
        ]);
        assert!(context.contains("[1] a.txt\nalpha text"));
        assert!(context.contains("[2] b.txt\nbeta text"));
    }

    #[test]
    fn history_keeps_most_recent_turns_within_budget() {
        let turns = vec![
            turn(0, "old question", "old answer"),
            turn(1, "new question", "new answer"),
        ];
        let formatted = PromptBuilder::format_history(&turns, 30);
        assert!(formatted.contains("new question"));
        assert!(!formatted.contains("old question"));
    }

    #[test]
    fn history_is_oldest_first_in_output() {
        let turns = vec![turn(0, "first", "one"), turn(1, "second", "two")];
        let formatted = PromptBuilder::format_history(&turns, 10_000);
        let first = formatted.find("first").unwrap();
        let second = formatted.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn prompt_omits_history_section_when_empty() {
        let prompt = PromptBuilder::build_chat_prompt("what?", "[1] a.txt\ntext", "");
        assert!(!prompt.contains("PREVIOUS CONVERSATION"));
        assert!(prompt.contains("QUESTION: what?"));
    }
}
