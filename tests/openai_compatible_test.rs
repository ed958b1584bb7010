// Wire-level tests for the OpenAI-compatible provider against a mock server.
use futures::StreamExt;
use llm_recipes::{
    builder::{FunctionBuilder, LLMBackend, LLMBuilder, ParamBuilder},
    chat::ChatMessage,
    error::LLMError,
};

fn local_llm(server: &mockito::Server) -> Box<dyn llm_recipes::LLMProvider> {
    LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(format!("{}/v1/", server.url()))
        .build()
        .expect("Failed to build LLM (llama-server)")
}

#[tokio::test]
async fn chat_parses_text_and_usage() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello there"}}],
                "usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#,
        )
        .create_async()
        .await;

    let llm = local_llm(&server);
    let messages = vec![ChatMessage::user().content("Hi").build()];
    let response = llm.chat(&messages).await.unwrap();

    assert_eq!(response.text().unwrap(), "Hello there");
    assert_eq!(response.usage().unwrap().total_tokens, 7);
    mock.assert_async().await;
}

#[tokio::test]
async fn system_prompt_is_sent_first() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(mockito::Matcher::Regex(
            r#""role":"system","content":"You are terse.""#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}],"usage":null}"#)
        .create_async()
        .await;

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(format!("{}/v1/", server.url()))
        .system("You are terse.")
        .build()
        .unwrap();

    let messages = vec![ChatMessage::user().content("Hi").build()];
    llm.chat(&messages).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn tool_calls_are_extracted_from_the_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(mockito::Matcher::Regex(
            r#""tools":\[\{"type":"function""#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":null,
                "tool_calls":[{"id":"call_1","type":"function",
                "function":{"name":"get_current_time","arguments":"{}"}}]}}],
                "usage":null}"#,
        )
        .create_async()
        .await;

    let llm = local_llm(&server);
    let tool = FunctionBuilder::new("get_current_time")
        .description("Get the current time")
        .param(ParamBuilder::new("timezone").description("IANA timezone name"))
        .build();

    let messages = vec![ChatMessage::user().content("What time is it?").build()];
    let response = llm.chat_with_tools(&messages, Some(&[tool])).await.unwrap();

    let calls = response.tool_calls().expect("tool calls");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].function.name, "get_current_time");
    assert_eq!(calls[0].id, "call_1");
}

#[tokio::test]
async fn error_status_surfaces_raw_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("model exploded")
        .create_async()
        .await;

    let llm = local_llm(&server);
    let messages = vec![ChatMessage::user().content("Hi").build()];
    let err = llm.chat(&messages).await.unwrap_err();

    match err {
        LLMError::ResponseFormatError { raw_response, .. } => {
            assert_eq!(raw_response, "model exploded");
        }
        other => panic!("expected ResponseFormatError, got {other}"),
    }
}

#[tokio::test]
async fn chat_stream_yields_text_deltas() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let llm = local_llm(&server);
    let messages = vec![ChatMessage::user().content("Hi").build()];

    let mut stream = llm.chat_stream(&messages).await.unwrap();
    let mut collected = String::new();
    while let Some(token) = stream.next().await {
        collected.push_str(&token.unwrap());
    }

    assert_eq!(collected, "Hello");
}

#[tokio::test]
async fn chat_stream_struct_carries_usage_from_final_chunk() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
        "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":1,\"completion_tokens\":1,\"total_tokens\":2}}\n\n",
        "data: [DONE]\n\n",
    );
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let llm = local_llm(&server);
    let messages = vec![ChatMessage::user().content("Hi").build()];

    let mut stream = llm.chat_stream_struct(&messages).await.unwrap();
    let mut text = String::new();
    let mut usage = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        if let Some(content) = chunk.choices.first().and_then(|c| c.delta.content.clone()) {
            text.push_str(&content);
        }
        if chunk.usage.is_some() {
            usage = chunk.usage;
        }
    }

    assert_eq!(text, "Hi");
    assert_eq!(usage.unwrap().total_tokens, 2);
}

#[cfg(feature = "openai")]
#[tokio::test]
async fn openai_backend_requires_an_api_key() {
    let err = llm_recipes::backends::openai::OpenAI::new(
        "", None, None, None, None, None, None, None, None, None, None,
    )
    .unwrap_err();
    assert!(matches!(err, LLMError::AuthError(_)));
}
