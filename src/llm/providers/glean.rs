use crate::llm::provider::{Author, ChatProvider, Message};
use crate::utils::error::RspecError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GLEAN_URL: &str = "https://sonarsource-be.glean.com/rest/api/v1/chat";

const PROVIDER_NAME: &str = "glean";
const USER_AUTHOR: &str = "USER";
const AI_AUTHOR: &str = "GLEAN_AI";
const CONTENT_MESSAGE: &str = "CONTENT";

/// Glean chat API provider.
///
/// The whole conversation is sent in one non-streaming request. Glean expects
/// the messages newest-first, so the chronological [`Message`] list is
/// reversed on the wire.
///
/// # Examples
///
/// ```no_run
/// use clippy_rspec::llm::providers::glean::{DEFAULT_GLEAN_URL, GleanProvider};
/// use std::time::Duration;
///
/// let provider = GleanProvider::new(
///     DEFAULT_GLEAN_URL.to_string(),
///     "your-token".to_string(),
///     Duration::from_secs(120),
/// )
/// .expect("Failed to create provider");
/// ```
pub struct GleanProvider {
    endpoint: String,
    token: String,
    client: Client,
}

/// Request body for the Glean chat API.
#[derive(Debug, Serialize)]
struct GleanRequest<'a> {
    stream: bool,
    messages: Vec<GleanMessage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GleanMessage<'a> {
    author: &'a str,
    message_type: &'a str,
    fragments: Vec<RequestFragment<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestFragment<'a> {
    text: &'a str,
}

/// Response from the Glean chat API.
#[derive(Debug, Deserialize)]
struct GleanResponse {
    #[serde(default)]
    messages: Vec<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseMessage {
    author: Option<String>,
    message_type: Option<String>,
    #[serde(default)]
    fragments: Vec<ResponseFragment>,
}

/// Fragments may also carry citations or queries, which have no text.
#[derive(Debug, Deserialize)]
struct ResponseFragment {
    text: Option<String>,
}

impl GleanProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: String, token: String, timeout: Duration) -> Result<Self, RspecError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RspecError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            endpoint,
            token,
            client,
        })
    }

    fn build_request(messages: &[Message]) -> GleanRequest<'_> {
        let messages = messages
            .iter()
            .rev()
            .map(|m| GleanMessage {
                author: match m.author {
                    Author::User => USER_AUTHOR,
                    Author::Assistant => AI_AUTHOR,
                },
                message_type: CONTENT_MESSAGE,
                fragments: vec![RequestFragment { text: &m.content }],
            })
            .collect();

        GleanRequest {
            stream: false,
            messages,
        }
    }

    /// Concatenate the text fragments of the first assistant content message.
    fn extract_reply(response: GleanResponse) -> Option<String> {
        response
            .messages
            .into_iter()
            .find(|m| {
                m.message_type.as_deref() == Some(CONTENT_MESSAGE)
                    && m.author.as_deref() == Some(AI_AUTHOR)
            })
            .map(|m| {
                m.fragments
                    .into_iter()
                    .filter_map(|f| f.text)
                    .collect::<String>()
            })
    }
}

#[async_trait]
impl ChatProvider for GleanProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, RspecError> {
        let request_body = Self::build_request(messages);

        tracing::debug!("Sending request to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RspecError::Chat {
                provider: PROVIDER_NAME.to_string(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let body = response.text().await?;
        let response_body: GleanResponse = serde_json::from_str(&body)?;

        Self::extract_reply(response_body).ok_or(RspecError::EmptyReply)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
