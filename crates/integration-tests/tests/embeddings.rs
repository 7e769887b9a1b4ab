//! Embeddings against `OpenAI`-shaped mock vendors

mod harness;

use conduit_config::{PerplexityParams, ProviderParams};
use conduit_embeddings::{EmbeddingsClient, EmbeddingsProvider};
use conduit_llm::{CancellationToken, Capability, ErrorKind, ProviderError};
use harness::mock_vendor::{MockVendor, Reply};
use harness::params;
use serde_json::json;

const EMBEDDINGS: &str = "/v1/embeddings";

fn inputs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|&t| t.to_owned()).collect()
}

#[tokio::test]
async fn vectors_follow_input_order() {
    let mock = MockVendor::start().await.unwrap();
    mock.on(
        EMBEDDINGS,
        Reply::json(json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 2, "embedding": [3.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0]},
                {"object": "embedding", "index": 1, "embedding": [2.0]}
            ],
            "model": "text-embedding-3-small"
        })),
    );

    let result = EmbeddingsClient::default()
        .embeddings_get(
            &inputs(&["a", "b", "c"]),
            "text-embedding-3-small",
            &CancellationToken::new(),
            &params::openai(&mock),
        )
        .await
        .unwrap();

    let vectors: Vec<Vec<f32>> = result.results.into_iter().map(|e| e.embedding).collect();
    assert_eq!(vectors, [vec![1.0], vec![2.0], vec![3.0]]);

    let request = &mock.requests()[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(
        request.json(),
        json!({"input": ["a", "b", "c"], "model": "text-embedding-3-small"})
    );
}

#[tokio::test]
async fn lm_studio_embeddings_without_key() {
    let mock = MockVendor::start().await.unwrap();
    mock.on(
        EMBEDDINGS,
        Reply::json(json!({"data": [{"index": 0, "embedding": [0.5, -0.5]}]})),
    );

    let result = EmbeddingsClient::default()
        .embeddings_get(
            &inputs(&["hello"]),
            "text-embedding-nomic-embed-text-v1.5",
            &CancellationToken::new(),
            &params::lm_studio(&mock),
        )
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(mock.requests()[0].authorization, None);
}

#[tokio::test]
async fn empty_input_makes_no_request() {
    let mock = MockVendor::start().await.unwrap();

    let result = EmbeddingsClient::default()
        .embeddings_get(&[], "text-embedding-3-small", &CancellationToken::new(), &params::openai(&mock))
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn vendors_without_embeddings_fail_before_io() {
    let mock = MockVendor::start().await.unwrap();
    let mut perplexity = PerplexityParams::new("pplx-key");
    perplexity.base_url = Some(mock.base_url().parse().unwrap());

    for params in [params::xai(&mock), ProviderParams::Perplexity(perplexity)] {
        let err = EmbeddingsClient::default()
            .embeddings_get(&inputs(&["x"]), "any", &CancellationToken::new(), &params)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Capability {
                capability: Capability::Embeddings,
                ..
            }
        ));
    }

    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn unknown_model_is_vendor_error() {
    let mock = MockVendor::start().await.unwrap();
    mock.on(
        EMBEDDINGS,
        Reply::status(400, json!({"error": {"message": "model not found: nope"}})),
    );

    let err = EmbeddingsClient::default()
        .embeddings_get(&inputs(&["x"]), "nope", &CancellationToken::new(), &params::openai(&mock))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Vendor);
    assert!(err.to_string().contains("model not found"));
}

#[tokio::test]
async fn unexpected_shape_is_parse_error() {
    let mock = MockVendor::start().await.unwrap();
    mock.on(
        EMBEDDINGS,
        Reply::json(json!({"data": [{"index": 0, "embedding": "not a vector"}]})),
    );

    let err = EmbeddingsClient::default()
        .embeddings_get(&inputs(&["x"]), "any", &CancellationToken::new(), &params::compatible(&mock, None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
}
