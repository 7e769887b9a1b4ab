use async_trait::async_trait;
use conduit_config::ProviderParams;
use conduit_core::{
    AccessTokenProvider, BodyStyle, CallScope, CancellationToken, Capability, ProviderError, VendorProfile, profile,
};
use reqwest::Client;

use crate::protocol::{
    OpenAiEmbeddingsRequest, OpenAiEmbeddingsResponse, WatsonxEmbeddingsRequest, WatsonxEmbeddingsResponse,
};
use crate::types::{Embedding, EmbeddingsResult};

/// Embedding generation against any configured vendor
#[async_trait]
pub trait EmbeddingsProvider: Send + Sync {
    /// Embed `inputs` with `model_id`, one vector per input in input order
    async fn embeddings_get(
        &self,
        inputs: &[String],
        model_id: &str,
        cancel: &CancellationToken,
        params: &ProviderParams,
    ) -> Result<EmbeddingsResult, ProviderError>;
}

/// Stateless embeddings client; the vendor is taken from the parameters
#[derive(Debug, Clone)]
pub struct EmbeddingsClient {
    client: Client,
    tokens: AccessTokenProvider,
}

impl Default for EmbeddingsClient {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl EmbeddingsClient {
    pub fn new(client: Client) -> Self {
        Self {
            tokens: AccessTokenProvider::new(client.clone()),
            client,
        }
    }

    async fn openai_shaped(
        &self,
        scope: &CallScope<'_>,
        params: &ProviderParams,
        path: &str,
        inputs: &[String],
    ) -> Result<EmbeddingsResult, ProviderError> {
        let url = scope.profile.endpoint(params, path, scope.model)?;
        let credential = self.tokens.resolve(scope, params).await?;

        let body = OpenAiEmbeddingsRequest {
            input: inputs,
            model: scope.model,
        };
        let response = scope.send(credential.apply(self.client.post(url).json(&body))).await?;
        let mut wire: OpenAiEmbeddingsResponse = scope.typed(response).await?;

        wire.data.sort_by_key(|entry| entry.index);
        Ok(EmbeddingsResult {
            results: wire
                .data
                .into_iter()
                .map(|entry| Embedding {
                    embedding: entry.embedding,
                })
                .collect(),
        })
    }

    async fn watsonx(
        &self,
        scope: &CallScope<'_>,
        params: &ProviderParams,
        path: &str,
        inputs: &[String],
    ) -> Result<EmbeddingsResult, ProviderError> {
        let ProviderParams::Watsonx(watsonx) = params else {
            return Err(scope
                .profile
                .invalid(scope.model, format!("received parameters for {}", params.vendor())));
        };

        let url = scope.profile.endpoint(params, path, scope.model)?;
        let credential = self.tokens.resolve(scope, params).await?;

        let body = WatsonxEmbeddingsRequest {
            inputs,
            model_id: scope.model,
            project_id: &watsonx.project_id,
        };
        let response = scope.send(credential.apply(self.client.post(url).json(&body))).await?;
        let wire: WatsonxEmbeddingsResponse = scope.typed(response).await?;

        Ok(EmbeddingsResult {
            results: wire
                .results
                .into_iter()
                .map(|entry| Embedding {
                    embedding: entry.embedding,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl EmbeddingsProvider for EmbeddingsClient {
    async fn embeddings_get(
        &self,
        inputs: &[String],
        model_id: &str,
        cancel: &CancellationToken,
        params: &ProviderParams,
    ) -> Result<EmbeddingsResult, ProviderError> {
        let profile: &'static VendorProfile = profile(params.vendor());
        profile.check_params(params, model_id)?;

        let path = match profile.embeddings_path {
            Some(path) if profile.capabilities.embeddings => path,
            _ => {
                return Err(ProviderError::Capability {
                    vendor: profile.vendor,
                    model: model_id.to_owned(),
                    capability: Capability::Embeddings,
                });
            }
        };

        if inputs.is_empty() {
            return Ok(EmbeddingsResult::default());
        }

        let scope = CallScope::new(profile, model_id, cancel);
        if cancel.is_cancelled() {
            return Err(scope.cancelled());
        }

        tracing::debug!(vendor = %profile.vendor, model = %model_id, inputs = inputs.len(), "sending embeddings request");

        let result = match profile.body {
            BodyStyle::OpenAi => self.openai_shaped(&scope, params, path, inputs).await?,
            BodyStyle::Watsonx => self.watsonx(&scope, params, path, inputs).await?,
        };

        if result.len() != inputs.len() {
            tracing::warn!(
                vendor = %profile.vendor,
                model = %model_id,
                expected = inputs.len(),
                received = result.len(),
                "embeddings count does not match input count"
            );
        }

        Ok(result)
    }
}
