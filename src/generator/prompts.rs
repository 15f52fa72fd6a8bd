//! Prompt construction for the chat service.
//!
//! Every lint is sent after a fixed priming conversation: the task
//! instructions, then one worked example made of a lint prompt and the reply
//! expected for it.

use crate::lints::LintRecord;
use crate::llm::provider::Message;

/// Load the default task instructions.
pub fn instructions_prompt() -> &'static str {
    include_str!("../../prompts/instructions.md")
}

/// Load the default worked example lint prompt.
pub fn example_prompt() -> &'static str {
    include_str!("../../prompts/example_prompt.md")
}

/// Load the reply expected for [`example_prompt`].
pub fn example_reply() -> &'static str {
    include_str!("../../prompts/example_reply.md")
}

/// Serialize a lint into the two-field block the chat service expects.
pub fn format_lint_prompt(lint: &LintRecord) -> String {
    format!(
        "[Clippy lint key]\n{}\n[Clippy rule description]\n{}\n",
        lint.key, lint.description
    )
}

/// The conversation turns sent before every lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimingConversation {
    pub instructions: String,
    pub example_prompt: String,
    pub example_reply: String,
}

impl Default for PrimingConversation {
    fn default() -> Self {
        Self {
            instructions: instructions_prompt().to_string(),
            example_prompt: example_prompt().to_string(),
            example_reply: example_reply().to_string(),
        }
    }
}

impl PrimingConversation {
    /// Build the full conversation for one lint prompt, oldest turn first.
    pub fn conversation(&self, lint_prompt: &str) -> Vec<Message> {
        vec![
            Message::user(self.instructions.as_str()),
            Message::user(self.example_prompt.as_str()),
            Message::assistant(self.example_reply.as_str()),
            Message::user(lint_prompt),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::response::{ParsedResponse, sections};
    use crate::llm::provider::Author;

    #[test]
    fn test_format_lint_prompt() {
        let lint = LintRecord::new(
            "VEC_RESIZE_TO_ZERO",
            "correctness",
            "### What it does\nFinds resizes".to_string(),
        );
        assert_eq!(
            format_lint_prompt(&lint),
            "[Clippy lint key]\nvec_resize_to_zero\n[Clippy rule description]\n### What it does\nFinds resizes\n"
        );
    }

    #[test]
    fn test_lint_prompt_parses_back_into_sections() {
        let lint = LintRecord::new("FOO", "style", "line one\nline two".to_string());
        let parsed = ParsedResponse::parse(&format_lint_prompt(&lint));
        assert_eq!(parsed.section(sections::CLIPPY_LINT_KEY), Some("foo"));
        assert_eq!(
            parsed.section("Clippy rule description"),
            Some("line one\nline two")
        );
    }

    #[test]
    fn test_default_example_reply_has_every_section() {
        let parsed = ParsedResponse::parse(example_reply());
        for section in sections::REQUIRED {
            assert!(
                parsed.section(section).is_some_and(|s| !s.is_empty()),
                "missing {section}"
            );
        }
    }

    #[test]
    fn test_conversation_order() {
        let priming = PrimingConversation::default();
        let messages = priming.conversation("lint");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, instructions_prompt());
        assert_eq!(messages[2].author, Author::Assistant);
        assert_eq!(messages[3].content, "lint");
    }
}
