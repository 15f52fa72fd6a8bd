use crate::utils::error::RspecError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// One turn of a chat conversation, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            content: content.into(),
        }
    }
}

/// A remote chat service.
///
/// Implementations return the assistant's reply text. Transport failures and
/// non-success statuses are reported as fatal errors (see
/// [`RspecError::is_fatal`]); a response without assistant content is
/// [`RspecError::EmptyReply`].
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, messages: &[Message]) -> Result<String, RspecError>;

    fn name(&self) -> &str;
}
