//! Provider trait and the per-vendor adapters

mod compatible;
mod lm_studio;
mod openai;
mod perplexity;
mod watsonx;
mod xai;

use async_trait::async_trait;
use conduit_config::{ProviderParams, Vendor};
use conduit_core::{
    AccessTokenProvider, CallScope, CancellationToken, Capabilities, ModelListing, ProviderError, VendorProfile,
    profile,
};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use crate::catalog::{self, KnownModel};
use crate::convert::{RequestBuilder, StreamNormalizer, drive_stream, normalize_completion};
use crate::protocol::openai::OpenAiModelList;
use crate::protocol::watsonx::WatsonxModelSpecs;
use crate::types::{ModelDescriptor, PromptRequest, PromptResult};

/// Model label used in errors raised while listing models
const MODEL_LIST_SCOPE: &str = "(model list)";

/// Uniform contract implemented for every supported vendor
#[async_trait]
pub trait Provider: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// What the vendor can express
    fn capabilities(&self) -> Capabilities;

    /// Run a prompt, streaming when the request carries a chunk callback
    async fn prompt(&self, request: PromptRequest) -> Result<PromptResult, ProviderError>;

    /// Chat models the vendor serves, embedding models excluded
    async fn list_models(
        &self,
        params: &ProviderParams,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModelDescriptor>, ProviderError>;
}

/// Vendor-specific hooks on top of the shared profile
pub(crate) struct Dialect {
    /// Built-in model metadata
    pub known_models: &'static [KnownModel],
    /// Extra request headers derived from the parameters
    pub headers: fn(&ProviderParams) -> HeaderMap,
    /// Whether the endpoint accepts `stream_options.include_usage`
    pub stream_usage: fn(&Url) -> bool,
}

pub(crate) fn no_headers(_: &ProviderParams) -> HeaderMap {
    HeaderMap::new()
}

pub(crate) const fn never(_: &Url) -> bool {
    false
}

/// Stateless adapter for one vendor
///
/// Holds a shared HTTP client and the vendor's static tables, so one value
/// can serve any number of concurrent calls.
pub struct ProviderAdapter {
    profile: &'static VendorProfile,
    dialect: &'static Dialect,
    client: Client,
    tokens: AccessTokenProvider,
}

impl ProviderAdapter {
    pub fn new(vendor: Vendor) -> Self {
        Self::with_client(vendor, Client::new())
    }

    /// Adapter sharing an existing connection pool
    pub fn with_client(vendor: Vendor, client: Client) -> Self {
        Self {
            profile: profile(vendor),
            dialect: dialect(vendor),
            tokens: AccessTokenProvider::new(client.clone()),
            client,
        }
    }

    pub const fn profile(&self) -> &'static VendorProfile {
        self.profile
    }

    fn describe(&self, id: &str) -> ModelDescriptor {
        catalog::describe(self.dialect.known_models, &self.profile.capabilities, id)
    }

    async fn list_openai_models(
        &self,
        scope: &CallScope<'_>,
        params: &ProviderParams,
    ) -> Result<Vec<ModelDescriptor>, ProviderError> {
        let url = self
            .profile
            .endpoint(params, self.profile.models_path.unwrap_or("/models"), scope.model)?;
        let credential = self.tokens.resolve(scope, params).await?;

        let builder = credential.apply(self.client.get(url).headers((self.dialect.headers)(params)));
        let list: OpenAiModelList = scope.typed(scope.send(builder).await?).await?;

        Ok(list
            .data
            .into_iter()
            .filter(|model| !catalog::is_embedding_model(&model.id))
            .map(|model| {
                let mut descriptor = self.describe(&model.id);
                if model.context_length.is_some() {
                    descriptor.context_length = model.context_length;
                }
                descriptor
            })
            .collect())
    }

    async fn list_watsonx_models(
        &self,
        scope: &CallScope<'_>,
        params: &ProviderParams,
    ) -> Result<Vec<ModelDescriptor>, ProviderError> {
        let mut url = self
            .profile
            .endpoint(
                params,
                self.profile.models_path.unwrap_or("/ml/v1/foundation_model_specs"),
                scope.model,
            )?;
        url.query_pairs_mut().append_pair("filters", "function_text_chat");
        let credential = self.tokens.resolve(scope, params).await?;

        let specs: WatsonxModelSpecs = scope
            .typed(scope.send(credential.apply(self.client.get(url))).await?)
            .await?;

        Ok(specs
            .resources
            .into_iter()
            .filter(|spec| !catalog::is_embedding_model(&spec.model_id))
            .map(|spec| {
                let mut descriptor = self.describe(&spec.model_id);
                if let Some(label) = spec.label.as_deref().filter(|l| !l.is_empty()) {
                    label.clone_into(&mut descriptor.display_name);
                }
                if let Some(length) = spec.model_limits.and_then(|limits| limits.max_sequence_length) {
                    descriptor.context_length = Some(length);
                }
                descriptor.supports_vision |= spec.has_function("image_chat");
                descriptor
            })
            .collect())
    }
}

#[async_trait]
impl Provider for ProviderAdapter {
    fn vendor(&self) -> Vendor {
        self.profile.vendor
    }

    fn capabilities(&self) -> Capabilities {
        self.profile.capabilities
    }

    async fn prompt(&self, mut request: PromptRequest) -> Result<PromptResult, ProviderError> {
        self.profile.check_params(&request.provider_params, &request.model)?;

        let cancel = request.cancel.clone();
        let scope = CallScope::new(self.profile, &request.model, &cancel);
        if cancel.is_cancelled() {
            return Err(scope.cancelled());
        }

        let streaming = request.is_streaming();
        let path = if streaming {
            self.profile.stream_path
        } else {
            self.profile.chat_path
        };
        let url = self.profile.endpoint(&request.provider_params, path, &request.model)?;

        let body = RequestBuilder::new(self.profile)
            .stream_usage((self.dialect.stream_usage)(&url))
            .build(&request)?;

        let credential = self.tokens.resolve(&scope, &request.provider_params).await?;

        tracing::debug!(
            vendor = %self.profile.vendor,
            model = %request.model,
            streaming,
            tools = request.tools.len(),
            "sending chat request"
        );

        let mut builder = self
            .client
            .post(url)
            .headers((self.dialect.headers)(&request.provider_params))
            .json(&body);
        if streaming {
            builder = builder.header(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }

        let response = scope.send(credential.apply(builder)).await?;

        if streaming {
            let normalizer = StreamNormalizer::new(request.on_chunk.take());
            drive_stream(&scope, response.bytes_stream(), normalizer).await
        } else {
            let body = scope.json(response).await?;
            normalize_completion(&scope, body)
        }
    }

    async fn list_models(
        &self,
        params: &ProviderParams,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModelDescriptor>, ProviderError> {
        self.profile.check_params(params, MODEL_LIST_SCOPE)?;
        let scope = CallScope::new(self.profile, MODEL_LIST_SCOPE, cancel);

        let models = match self.profile.model_listing {
            ModelListing::Static => self.dialect.known_models.iter().map(KnownModel::descriptor).collect(),
            ModelListing::OpenAiModels => self.list_openai_models(&scope, params).await?,
            ModelListing::WatsonxSpecs => self.list_watsonx_models(&scope, params).await?,
        };

        tracing::debug!(vendor = %self.profile.vendor, count = models.len(), "listed models");
        Ok(models)
    }
}

const fn dialect(vendor: Vendor) -> &'static Dialect {
    match vendor {
        Vendor::OpenAi => &openai::DIALECT,
        Vendor::Xai => &xai::DIALECT,
        Vendor::Watsonx => &watsonx::DIALECT,
        Vendor::Perplexity => &perplexity::DIALECT,
        Vendor::LmStudio => &lm_studio::DIALECT,
        Vendor::OpenAiCompatible => &compatible::DIALECT,
    }
}

/// Boxed adapter for `vendor`
pub fn adapter(vendor: Vendor, client: Client) -> Box<dyn Provider> {
    Box::new(ProviderAdapter::with_client(vendor, client))
}
