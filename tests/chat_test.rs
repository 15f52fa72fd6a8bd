//! Glean provider tests against a mockito HTTP server.

use clippy_rspec::generator::prompts::PrimingConversation;
use clippy_rspec::lints::LintRecord;
use clippy_rspec::llm::client::{ChatClient, ChatOptions};
use clippy_rspec::llm::provider::{ChatProvider, Message};
use clippy_rspec::llm::providers::GleanProvider;
use clippy_rspec::utils::error::RspecError;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn provider(server: &mockito::Server) -> GleanProvider {
    GleanProvider::new(
        format!("{}/rest/api/v1/chat", server.url()),
        "test-token".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_reply_text_is_first_ai_content_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/api/v1/chat")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({"stream": false})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "messages": [
                    {"author": "USER", "messageType": "CONTENT", "fragments": [{"text": "ignored"}]},
                    {"author": "GLEAN_AI", "messageType": "UPDATE", "fragments": [{"text": "Searching..."}]},
                    {"author": "GLEAN_AI", "messageType": "CONTENT", "fragments": [
                        {"text": "[Rule name]\n"},
                        {"querySuggestion": {"query": "clippy"}},
                        {"text": "Avoid it"}
                    ]},
                    {"author": "GLEAN_AI", "messageType": "CONTENT", "fragments": [{"text": "second"}]}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reply = provider(&server)
        .chat(&[Message::user("hello")])
        .await
        .unwrap();

    assert_eq!(reply, "[Rule name]\nAvoid it");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_conversation_is_sent_newest_first() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/api/v1/chat")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"author": "USER", "fragments": [{"text": "second"}]},
                {"author": "GLEAN_AI", "fragments": [{"text": "answer"}]},
                {"author": "USER", "fragments": [{"text": "first"}]}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"messages":[{"author":"GLEAN_AI","messageType":"CONTENT","fragments":[{"text":"ok"}]}]}"#)
        .create_async()
        .await;

    let reply = provider(&server)
        .chat(&[
            Message::user("first"),
            Message::assistant("answer"),
            Message::user("second"),
        ])
        .await
        .unwrap();

    assert_eq!(reply, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/api/v1/chat")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = provider(&server)
        .chat(&[Message::user("hello")])
        .await
        .unwrap_err();

    assert!(matches!(err, RspecError::Chat { .. }));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("500"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/rest/api/v1/chat")
        .with_status(401)
        .with_body("invalid token=abc")
        .create_async()
        .await;

    let err = provider(&server)
        .chat(&[Message::user("hello")])
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(!err.to_string().contains("abc"));
}

#[tokio::test]
async fn test_reply_without_ai_message_is_empty_reply() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/rest/api/v1/chat")
        .with_status(200)
        .with_body(r#"{"messages":[{"author":"USER","messageType":"CONTENT","fragments":[{"text":"hi"}]}]}"#)
        .create_async()
        .await;

    let err = provider(&server)
        .chat(&[Message::user("hello")])
        .await
        .unwrap_err();

    assert!(matches!(err, RspecError::EmptyReply));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_fatal() {
    let provider = GleanProvider::new(
        "http://127.0.0.1:9/rest/api/v1/chat".to_string(),
        "test-token".to_string(),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = provider.chat(&[Message::user("hello")]).await.unwrap_err();
    assert!(matches!(err, RspecError::NetworkError { .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_client_sends_priming_conversation() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/api/v1/chat")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("needless_return".to_string()),
            Matcher::Regex("custom instructions".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"messages":[{"author":"GLEAN_AI","messageType":"CONTENT","fragments":[{"text":"done"}]}]}"#)
        .create_async()
        .await;

    let priming = PrimingConversation {
        instructions: "custom instructions".to_string(),
        ..PrimingConversation::default()
    };
    let client = ChatClient::new(Box::new(provider(&server)))
        .with_priming(priming)
        .with_options(ChatOptions {
            rate_limit_delay: Duration::ZERO,
        });

    let lint = LintRecord::new("NEEDLESS_RETURN", "style", "Checks for returns".to_string());
    let reply = client.describe_lint(&lint).await.unwrap();

    assert_eq!(reply, "done");
    assert_eq!(client.provider_name(), "glean");
    mock.assert_async().await;
}
