//! Rule generation from chat replies.
//!
//! This module provides:
//! - Prompt construction for the chat service
//! - Parsing of bracketed-section replies
//! - Rule field extraction and `rule.adoc` rendering

pub mod prompts;
pub mod response;
pub mod rspec;

pub use prompts::{PrimingConversation, format_lint_prompt};
pub use response::{ParsedResponse, sections};
pub use rspec::{GeneratedRule, strip_code_fences};
