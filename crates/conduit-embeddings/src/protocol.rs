//! Embeddings wire formats

use serde::{Deserialize, Serialize};

/// `POST {base}/embeddings` body
#[derive(Debug, Serialize)]
pub(crate) struct OpenAiEmbeddingsRequest<'a> {
    pub input: &'a [String],
    pub model: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiEmbeddingsResponse {
    #[serde(default)]
    pub data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiEmbeddingData {
    /// Position of the input this vector belongs to
    #[serde(default)]
    pub index: usize,
    pub embedding: Vec<f32>,
}

/// `POST {base}/ml/v1/text/embeddings` body
#[derive(Debug, Serialize)]
pub(crate) struct WatsonxEmbeddingsRequest<'a> {
    pub inputs: &'a [String],
    pub model_id: &'a str,
    pub project_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WatsonxEmbeddingsResponse {
    #[serde(default)]
    pub results: Vec<WatsonxEmbedding>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WatsonxEmbedding {
    pub embedding: Vec<f32>,
}
