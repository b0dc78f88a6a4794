use httpmock::prelude::*;
use llmswitch::providers::anthropic::SYSTEM_PREAMBLE;
use llmswitch::{create_provider, AiProvider, Error, Message, Provider, ProviderConfig};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn init_logging()
{   let _ = env_logger::builder().is_test(true).try_init();
}

fn config_for(provider: Provider, server: &MockServer) -> ProviderConfig
{   ProviderConfig::new(provider)
      .with_api_key("sk-test")
      .with_base_url(server.base_url())
}

/// Path and a minimal successful body for each backend
fn success_fixture(provider: Provider) -> (&'static str, &'static str)
{   match provider
    {   Provider::OpenAi | Provider::GitHub => (
          "/chat/completions"
        , r#"{"choices":[{"message":{"role":"assistant","content":"Paris"},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"#
        )
      , Provider::Anthropic => (
          "/v1/messages"
        , r#"{"content":[{"type":"text","text":"Paris"}],"usage":{"input_tokens":12,"output_tokens":3}}"#
        )
      , Provider::Ollama => (
          "/api/chat"
        , r#"{"model":"mistral","message":{"role":"assistant","content":"Paris"},"done":true,"prompt_eval_count":12,"eval_count":3}"#
        )
    }
}

#[tokio::test]
async fn every_backend_round_trips()
{   init_logging();
    for provider in Provider::ALL
    {   let server = MockServer::start_async().await;
        let (path, body) = success_fixture(provider);
        let mock = server.mock_async(|when, then| {
          when.method(POST).path(path);
          then.status(200)
            .header("content-type", "application/json")
            .body(body);
        }).await;

        let adapter = assert_ok!(create_provider(config_for(provider, &server)));
        assert!(!adapter.name().is_empty());
        let response = assert_ok!(
          adapter.complete("What is the capital of France?", None).await
        );
        mock.assert_async().await;
        assert_eq!(response.message, "Paris");
    }
}

#[tokio::test]
async fn backend_error_text_is_kept_verbatim()
{   init_logging();
    for provider in Provider::ALL
    {   let server = MockServer::start_async().await;
        let (path, _) = success_fixture(provider);
        let body = if provider == Provider::Ollama
        {   r#"{"error":"model 'mistral' not found, try pulling it first"}"#
        } else
        {   r#"{"error":{"message":"model 'mistral' not found, try pulling it first","type":"invalid_request_error"}}"#
        };
        server.mock_async(|when, then| {
          when.method(POST).path(path);
          then.status(404)
            .header("content-type", "application/json")
            .body(body);
        }).await;

        let adapter = assert_ok!(create_provider(config_for(provider, &server)));
        let err = assert_err!(adapter.complete("hi", None).await);
        assert!(matches!(err, Error::Backend { .. }), "{:?}", err);
        assert!(
          err.to_string().contains("model 'mistral' not found, try pulling it first"),
          "{}", err
        );
    }
}

#[tokio::test]
async fn error_payload_with_success_status_is_still_an_error()
{   init_logging();
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/v1/messages");
      then.status(200)
        .body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#);
    }).await;

    let adapter = assert_ok!(create_provider(config_for(Provider::Anthropic, &server)));
    let err = assert_err!(adapter.complete("hi", None).await);
    assert_eq!(err.to_string(), "Anthropic API error: Overloaded");
}

#[tokio::test]
async fn malformed_bodies_include_raw_text()
{   init_logging();
    for provider in Provider::ALL
    {   for body in ["upstream connect error", r#"{"unexpected":true}"#]
        {   let server = MockServer::start_async().await;
            let (path, _) = success_fixture(provider);
            server.mock_async(|when, then| {
              when.method(POST).path(path);
              then.status(200).body(body);
            }).await;

            let adapter = assert_ok!(create_provider(config_for(provider, &server)));
            let err = assert_err!(adapter.complete("hi", None).await);
            assert!(matches!(err, Error::Parse { .. }), "{:?}", err);
            assert!(err.to_string().contains(body), "{}", err);
        }
    }
}

#[tokio::test]
async fn openai_sends_bearer_and_sampling_settings()
{   init_logging();
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/chat/completions")
        .header("authorization", "Bearer sk-test")
        .body_includes(r#""model":"gpt-4o-mini""#)
        .body_includes(r#""temperature":0.7"#)
        .body_includes(r#""max_tokens":2048"#)
        .body_includes(r#""messages":[{"role":"user","content":"hi"}]"#);
      then.status(200)
        .body(success_fixture(Provider::OpenAi).1);
    }).await;

    let adapter = assert_ok!(create_provider(config_for(Provider::OpenAi, &server)));
    let response = assert_ok!(adapter.complete("hi", None).await);
    mock.assert_async().await;
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.output_tokens, 3);
}

#[tokio::test]
async fn anthropic_sends_key_headers_and_preamble()
{   init_logging();
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/v1/messages")
        .header("x-api-key", "sk-test")
        .header("anthropic-version", "2023-06-01")
        .header_missing("authorization")
        .body_includes(SYSTEM_PREAMBLE)
        .body_includes(r#""max_tokens":2048"#);
      then.status(200)
        .body(success_fixture(Provider::Anthropic).1);
    }).await;

    let adapter = assert_ok!(create_provider(config_for(Provider::Anthropic, &server)));
    let response = assert_ok!(adapter.complete("hi", None).await);
    mock.assert_async().await;
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.output_tokens, 3);
}

#[tokio::test]
async fn github_sends_token_and_user_agent()
{   init_logging();
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/chat/completions")
        .header("authorization", "Bearer sk-test")
        .header("user-agent", concat!("llmswitch/", env!("CARGO_PKG_VERSION")));
      then.status(200)
        .body(r#"{"choices":[{"message":{"content":"Paris"}}]}"#);
    }).await;

    let adapter = assert_ok!(create_provider(config_for(Provider::GitHub, &server)));
    let response = assert_ok!(adapter.complete("hi", None).await);
    mock.assert_async().await;
    // no usage block in the reply
    assert_eq!(response.usage, llmswitch::Usage::default());
}

#[tokio::test]
async fn ollama_is_unauthenticated_and_reports_no_usage()
{   init_logging();
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/api/chat")
        .header_missing("authorization")
        .body_includes(r#""stream":false"#)
        .body_includes(r#""num_predict":2048"#);
      then.status(200)
        .body(success_fixture(Provider::Ollama).1);
    }).await;

    let config = ProviderConfig::new(Provider::Ollama)
      .with_base_url(format!("{}/", server.base_url()));
    let adapter = assert_ok!(create_provider(config));
    let response = assert_ok!(adapter.complete("hi", None).await);
    mock.assert_async().await;
    assert_eq!(response.usage.input_tokens, 0);
    assert_eq!(response.usage.output_tokens, 0);
}

#[tokio::test]
async fn history_precedes_prompt_without_duplication()
{   init_logging();
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/api/chat")
        .body_includes(concat!(
          r#""messages":["#,
          r#"{"role":"user","content":"What is 2+2?"},"#,
          r#"{"role":"assistant","content":"4"},"#,
          r#"{"role":"user","content":"Multiply that by 5"}]"#
        ));
      then.status(200)
        .body(r#"{"message":{"role":"assistant","content":"20"}}"#);
    }).await;

    let history = vec![
      Message::user("What is 2+2?")
    , Message::assistant("4")
    ];
    let adapter = assert_ok!(create_provider(
      ProviderConfig::new(Provider::Ollama).with_base_url(server.base_url())
    ));
    let response = assert_ok!(
      adapter.complete("Multiply that by 5", Some(&history)).await
    );
    mock.assert_async().await;
    assert_eq!(response.message, "20");
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn connection_failures_surface_as_transport_errors()
{   init_logging();
    let config = ProviderConfig::new(Provider::Ollama)
      .with_base_url("http://127.0.0.1:1");
    let adapter = assert_ok!(create_provider(config));
    let err = assert_err!(adapter.complete("hi", None).await);
    assert!(matches!(err, Error::Transport(_)), "{:?}", err);
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn slow_backends_hit_the_deadline()
{   init_logging();
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/api/chat");
      then.status(200)
        .delay(Duration::from_secs(3))
        .body(success_fixture(Provider::Ollama).1);
    }).await;

    let config = ProviderConfig::new(Provider::Ollama)
      .with_base_url(server.base_url())
      .with_timeout(Duration::from_millis(200));
    let adapter = assert_ok!(create_provider(config));
    let err = assert_err!(adapter.complete("hi", None).await);
    assert!(matches!(err, Error::Timeout(_)), "{:?}", err);
}

#[test]
fn authenticated_backends_need_a_key()
{   for provider in [Provider::OpenAi, Provider::Anthropic, Provider::GitHub]
    {   let result = create_provider(ProviderConfig::new(provider));
        let err = match result
        {   Err(e) => e
          , Ok(_) => panic!("{} built without a key", provider)
        };
        assert!(err.to_string().contains("AI_API_KEY"), "{}", err);
    }
    assert_ok!(create_provider(ProviderConfig::new(Provider::Ollama)));
}
