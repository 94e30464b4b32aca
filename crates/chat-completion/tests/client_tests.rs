//! HTTP-level tests for CompletionClient against a mock completion server.

use chat_completion::{ChatMessage, CompletionClient, CompletionConfig, CompletionError};
use mockito::{Matcher, Server};
use serde_json::{json, Value};

const PATH: &str = "/v1/chat/completions";

fn completion_body(contents: &[&str]) -> String {
    let choices: Vec<Value> = contents
        .iter()
        .enumerate()
        .map(|(index, content)| {
            json!({
                "index": index,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            })
        })
        .collect();

    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-3.5-turbo",
        "choices": choices,
        "usage": {"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12}
    })
    .to_string()
}

fn client_for(server: &Server, keep_history: bool, strip_newline: bool) -> CompletionClient {
    let config = CompletionConfig::builder()
        .api_key("test-key")
        .api_url(server.url())
        .keep_history(keep_history)
        .strip_newline(strip_newline)
        .build();
    CompletionClient::new(config).unwrap()
}

#[tokio::test]
async fn test_query_sends_bearer_token_and_json() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&["Hi!"]))
        .create_async()
        .await;

    let client = client_for(&server, false, false);
    let choices = client.query("42", "hello").await.unwrap();

    mock.assert_async().await;
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].message, ChatMessage::assistant("Hi!"));
    assert_eq!(choices[0].finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_history_records_exchange_and_is_replayed() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", PATH)
        .match_body(Matcher::Json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .with_status(200)
        .with_body(completion_body(&["Hi!"]))
        .create_async()
        .await;
    let second = server
        .mock("POST", PATH)
        .match_body(Matcher::Json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "Hi!"},
                {"role": "user", "content": "again"}
            ]
        })))
        .with_status(200)
        .with_body(completion_body(&["Hello again"]))
        .create_async()
        .await;

    let client = client_for(&server, true, false);

    client.query("42", "hello").await.unwrap();
    assert_eq!(
        client.history("42").await,
        vec![ChatMessage::user("hello"), ChatMessage::assistant("Hi!")]
    );

    client.query("42", "again").await.unwrap();
    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(client.history("42").await.len(), 4);
    assert!(client.history("other-chat").await.is_empty());
}

#[tokio::test]
async fn test_every_choice_is_appended_to_history() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(completion_body(&["one", "two"]))
        .create_async()
        .await;

    let client = client_for(&server, true, false);
    client.query("42", "pick").await.unwrap();

    assert_eq!(
        client.history("42").await,
        vec![
            ChatMessage::user("pick"),
            ChatMessage::assistant("one"),
            ChatMessage::assistant("two"),
        ]
    );
}

#[tokio::test]
async fn test_without_history_requests_never_accumulate() {
    let mut server = Server::new_async().await;
    let only_new_message = |text: &str| {
        Matcher::Json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": text}]
        }))
    };
    let first = server
        .mock("POST", PATH)
        .match_body(only_new_message("first"))
        .with_status(200)
        .with_body(completion_body(&["1"]))
        .create_async()
        .await;
    let second = server
        .mock("POST", PATH)
        .match_body(only_new_message("second"))
        .with_status(200)
        .with_body(completion_body(&["2"]))
        .create_async()
        .await;

    let client = client_for(&server, false, false);
    client.query("42", "first").await.unwrap();
    client.query("42", "second").await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert!(client.history("42").await.is_empty());
}

#[tokio::test]
async fn test_strip_newline_applies_once_per_choice() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(completion_body(&["\n\nHello", "\nHi", "\n\n", "\n\n\n\nDeep"]))
        .create_async()
        .await;

    let client = client_for(&server, true, true);
    let choices = client.query("42", "hi").await.unwrap();

    let contents: Vec<_> = choices.iter().map(|c| c.message.content.as_str()).collect();
    assert_eq!(contents, ["Hello", "\nHi", "", "\n\nDeep"]);

    // History stores the stripped text
    assert_eq!(client.history("42").await[1].content, "Hello");
}

#[tokio::test]
async fn test_strip_newline_disabled_leaves_content() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(completion_body(&["\n\nHello"]))
        .create_async()
        .await;

    let client = client_for(&server, false, false);
    let choices = client.query("42", "hi").await.unwrap();
    assert_eq!(choices[0].message.content, "\n\nHello");
}

#[tokio::test]
async fn test_rate_limited_status_leaves_history_untouched() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#)
        .create_async()
        .await;

    let client = client_for(&server, true, false);
    let err = client.query("42", "hello").await.unwrap_err();

    match err {
        CompletionError::Status { status, ref body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "requests: Rate limit reached");
        }
        ref other => panic!("Expected Status error, got {:?}", other),
    }
    assert_eq!(err.status(), Some(429));
    assert!(err.to_string().contains("429"));
    assert!(client.history("42").await.is_empty());
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_verbatim() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let client = client_for(&server, false, false);
    match client.query("42", "hello").await {
        Err(CompletionError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"choices": "not a list"}"#)
        .create_async()
        .await;

    let client = client_for(&server, true, false);
    let result = client.query("42", "hello").await;

    assert!(matches!(result, Err(CompletionError::Decode(_))));
    assert!(client.history("42").await.is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    let config = CompletionConfig::builder()
        .api_key("test-key")
        .api_url("http://127.0.0.1:1")
        .build();
    let client = CompletionClient::new(config).unwrap();

    let result = client.query("42", "hello").await;
    assert!(matches!(result, Err(CompletionError::Http(_))));
}

#[tokio::test]
async fn test_clear_history_empties_four_messages() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(completion_body(&["reply"]))
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server, true, false);
    client.query("42", "one").await.unwrap();
    client.query("42", "two").await.unwrap();
    assert_eq!(client.history("42").await.len(), 4);

    client.clear_history("42").await;
    assert!(client.history("42").await.is_empty());
}

#[tokio::test]
async fn test_system_prompt_leads_every_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::Json(json!({
            "model": "gpt-3.5-turbo-0301",
            "temperature": 0.5,
            "messages": [
                {"role": "system", "content": "Be brief"},
                {"role": "user", "content": "hello"}
            ]
        })))
        .with_status(200)
        .with_body(completion_body(&["ok"]))
        .create_async()
        .await;

    let config = CompletionConfig::builder()
        .api_key("test-key")
        .api_url(server.url())
        .model("gpt-3.5-turbo-0301")
        .system_prompt("Be brief")
        .temperature(0.5)
        .keep_history(true)
        .build();
    let client = CompletionClient::new(config).unwrap();

    client.query("42", "hello").await.unwrap();
    mock.assert_async().await;

    // The system prompt is not part of the stored history
    assert_eq!(client.history("42").await[0], ChatMessage::user("hello"));
}
