use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use listenboard_core::{ChatConfig, ChatError, CoreError};
use llm_interface::{
    ChatAssistant, ChatRequest, ChatTransport, HttpChatTransport, SubmitOutcome, APOLOGY_TEXT,
    MISSING_REPLY_TEXT, WELCOME_TEXT,
};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_endpoint(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock endpoint");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve mock endpoint") });
    format!("http://{}", addr)
}

fn config(base_url: String) -> ChatConfig {
    ChatConfig {
        base_url,
        ..Default::default()
    }
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    let ok = body["user_task"] == "data_analysis" && body["filters"].is_null();
    Json(json!({
        "response": format!("{} ({})", body["user_prompt"].as_str().unwrap_or_default(), ok)
    }))
}

fn history(assistant: &ChatAssistant) -> Vec<String> {
    assistant.messages().into_iter().map(|m| m.text).collect()
}

#[tokio::test]
async fn test_success_appends_reply() {
    let base = spawn_endpoint(Router::new().route("/ai/chat", post(echo))).await;
    let assistant = ChatAssistant::from_config(&config(base)).unwrap();

    let outcome = assistant.submit("hi").await;
    assert!(matches!(outcome, SubmitOutcome::Answered(_)));
    assert_eq!(history(&assistant), vec![WELCOME_TEXT, "hi", "hi (true)"]);
}

#[tokio::test]
async fn test_content_field_fallback() {
    let app = Router::new().route(
        "/ai/chat",
        post(|| async { Json(json!({ "content": "from content" })) }),
    );
    let base = spawn_endpoint(app).await;
    let assistant = ChatAssistant::from_config(&config(base)).unwrap();

    assistant.submit("hi").await;
    assert_eq!(history(&assistant)[2], "from content");
}

#[tokio::test]
async fn test_reply_without_text_field() {
    let app = Router::new().route("/ai/chat", post(|| async { Json(json!({ "status": "ok" })) }));
    let base = spawn_endpoint(app).await;
    let assistant = ChatAssistant::from_config(&config(base)).unwrap();

    assistant.submit("hi").await;
    assert_eq!(history(&assistant)[2], MISSING_REPLY_TEXT);
}

#[tokio::test]
async fn test_failures_share_one_apology() {
    let server_error = Router::new().route(
        "/ai/chat",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let malformed = Router::new().route(
        "/ai/chat",
        post(|| async {
            (
                StatusCode::OK,
                [("content-type", "application/json")],
                "{\"response\": ",
            )
        }),
    );

    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    };

    let bases = vec![
        spawn_endpoint(server_error).await,
        spawn_endpoint(malformed).await,
        closed,
    ];

    for base in bases {
        let assistant = ChatAssistant::from_config(&config(base.clone())).unwrap();
        let outcome = assistant.submit("hi").await;
        assert!(
            matches!(outcome, SubmitOutcome::Failed(ref m) if m.text == APOLOGY_TEXT),
            "expected apology for {}",
            base
        );
        assert_eq!(history(&assistant), vec![WELCOME_TEXT, "hi", APOLOGY_TEXT]);
        assert!(!assistant.is_sending());
    }
}

#[tokio::test]
async fn test_transport_error_mapping() {
    let app = Router::new()
        .route("/ai/chat", post(|| async { StatusCode::BAD_GATEWAY }));
    let base = spawn_endpoint(app).await;
    let transport = HttpChatTransport::new(&config(base)).unwrap();
    let request = ChatRequest::new("hi", "data_analysis");

    match transport.send(&request).await {
        Err(CoreError::Chat(ChatError::ServerError { status_code })) => {
            assert_eq!(status_code, 502)
        }
        other => panic!("Expected ServerError, got {:?}", other),
    }

    let app = Router::new().route("/ai/chat", post(|| async { "plain text" }));
    let base = spawn_endpoint(app).await;
    let transport = HttpChatTransport::new(&config(base)).unwrap();
    assert!(matches!(
        transport.send(&request).await,
        Err(CoreError::Chat(ChatError::InvalidResponseFormat { .. }))
    ));
}

#[tokio::test]
async fn test_shared_assistant_across_tasks() {
    let base = spawn_endpoint(Router::new().route("/ai/chat", post(echo))).await;
    let assistant = Arc::new(ChatAssistant::from_config(&config(base)).unwrap());

    let handle = {
        let assistant = Arc::clone(&assistant);
        tokio::spawn(async move { assistant.submit("one").await })
    };
    handle.await.unwrap();
    assistant.submit("two").await;

    assert_eq!(
        history(&assistant),
        vec![WELCOME_TEXT, "one", "one (true)", "two", "two (true)"]
    );
}
