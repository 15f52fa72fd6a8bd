use crate::generator::prompts::{PrimingConversation, format_lint_prompt};
use crate::lints::LintRecord;
use crate::llm::provider::ChatProvider;
use crate::utils::error::RspecError;
use std::time::Duration;

/// Options controlling how the chat service is called.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Pause inserted before every request to stay under the service rate limit.
    pub rate_limit_delay: Duration,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            rate_limit_delay: Duration::from_millis(500),
        }
    }
}

/// Sends one lint at a time to the chat service, preceded by the priming
/// conversation.
pub struct ChatClient {
    provider: Box<dyn ChatProvider>,
    priming: PrimingConversation,
    options: ChatOptions,
}

impl ChatClient {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            provider,
            priming: PrimingConversation::default(),
            options: ChatOptions::default(),
        }
    }

    /// Replace the priming conversation (instructions and worked example).
    pub fn with_priming(mut self, priming: PrimingConversation) -> Self {
        self.priming = priming;
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Ask the chat service to document `lint` and return the raw reply text.
    pub async fn describe_lint(&self, lint: &LintRecord) -> Result<String, RspecError> {
        let prompt = format_lint_prompt(lint);
        let messages = self.priming.conversation(&prompt);

        if !self.options.rate_limit_delay.is_zero() {
            tokio::time::sleep(self.options.rate_limit_delay).await;
        }

        tracing::debug!(
            "Requesting documentation for `{}` from {}",
            lint.key,
            self.provider.name()
        );
        self.provider.chat(&messages).await
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
