//! Static per-vendor configuration table
//!
//! Everything that differs between the supported wire protocols (endpoint
//! paths, auth mode, error shape, body dialect and capability flags) lives
//! here as immutable data, so the request/response machinery is shared.

use conduit_config::{ProviderParams, Vendor};
use serde_json::Value;
use url::Url;

use crate::error::{Capability, ProviderError};

/// Default watsonx API version sent as the `version` query parameter
pub const WATSONX_API_VERSION: &str = "2024-05-31";

/// Default IBM Cloud IAM token endpoint
pub const IBM_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// How a vendor authenticates requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Static key sent as a bearer token; no header when no key is configured
    Bearer,
    /// API key exchanged for a short-lived bearer token before each call
    IamExchange,
}

/// Where a vendor reports logical errors in a JSON body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    /// A single `error` field (object or string)
    Object,
    /// A non-empty `errors` array
    Array,
}

/// JSON dialect of the chat request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    /// `OpenAI` chat completions body keyed by `model`
    OpenAi,
    /// watsonx chat body keyed by `model_id` and `project_id`
    Watsonx,
}

/// How a vendor's model list is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelListing {
    /// `GET {base}/models` returning `{data: [{id}]}`
    OpenAiModels,
    /// watsonx foundation model specs
    WatsonxSpecs,
    /// No listing endpoint; served from the built-in catalog
    Static,
}

/// Feature flags for a vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub tools: bool,
    pub json_object: bool,
    pub json_schema: bool,
    pub embeddings: bool,
}

/// Immutable description of one vendor's wire protocol
#[derive(Debug)]
pub struct VendorProfile {
    pub vendor: Vendor,
    pub display_name: &'static str,
    /// Base URL used when the caller does not supply one
    pub default_base_url: Option<&'static str>,
    pub chat_path: &'static str,
    /// Path for streamed chat; equal to `chat_path` for most vendors
    pub stream_path: &'static str,
    pub embeddings_path: Option<&'static str>,
    pub models_path: Option<&'static str>,
    /// Streams end with `data: [DONE]`; a body closing before it was cut off
    pub stream_terminator: bool,
    pub model_listing: ModelListing,
    pub auth: AuthMode,
    pub errors: ErrorShape,
    pub body: BodyStyle,
    pub capabilities: Capabilities,
}

static OPENAI: VendorProfile = VendorProfile {
    vendor: Vendor::OpenAi,
    display_name: "OpenAI",
    default_base_url: Some("https://api.openai.com/v1"),
    chat_path: "/chat/completions",
    stream_path: "/chat/completions",
    embeddings_path: Some("/embeddings"),
    models_path: Some("/models"),
    stream_terminator: true,
    model_listing: ModelListing::OpenAiModels,
    auth: AuthMode::Bearer,
    errors: ErrorShape::Object,
    body: BodyStyle::OpenAi,
    capabilities: Capabilities {
        tools: true,
        json_object: true,
        json_schema: true,
        embeddings: true,
    },
};

static XAI: VendorProfile = VendorProfile {
    vendor: Vendor::Xai,
    display_name: "xAI",
    default_base_url: Some("https://api.x.ai/v1"),
    chat_path: "/chat/completions",
    stream_path: "/chat/completions",
    embeddings_path: None,
    models_path: Some("/models"),
    stream_terminator: true,
    model_listing: ModelListing::OpenAiModels,
    auth: AuthMode::Bearer,
    errors: ErrorShape::Object,
    body: BodyStyle::OpenAi,
    capabilities: Capabilities {
        tools: true,
        json_object: true,
        json_schema: true,
        embeddings: false,
    },
};

static WATSONX: VendorProfile = VendorProfile {
    vendor: Vendor::Watsonx,
    display_name: "IBM watsonx.ai",
    default_base_url: Some("https://us-south.ml.cloud.ibm.com"),
    chat_path: "/ml/v1/text/chat",
    stream_path: "/ml/v1/text/chat_stream",
    embeddings_path: Some("/ml/v1/text/embeddings"),
    models_path: Some("/ml/v1/foundation_model_specs"),
    stream_terminator: false,
    model_listing: ModelListing::WatsonxSpecs,
    auth: AuthMode::IamExchange,
    errors: ErrorShape::Array,
    body: BodyStyle::Watsonx,
    capabilities: Capabilities {
        tools: true,
        json_object: true,
        json_schema: true,
        embeddings: true,
    },
};

static PERPLEXITY: VendorProfile = VendorProfile {
    vendor: Vendor::Perplexity,
    display_name: "Perplexity",
    default_base_url: Some("https://api.perplexity.ai"),
    chat_path: "/chat/completions",
    stream_path: "/chat/completions",
    embeddings_path: None,
    models_path: None,
    stream_terminator: true,
    model_listing: ModelListing::Static,
    auth: AuthMode::Bearer,
    errors: ErrorShape::Object,
    body: BodyStyle::OpenAi,
    capabilities: Capabilities {
        tools: false,
        json_object: false,
        json_schema: true,
        embeddings: false,
    },
};

static LM_STUDIO: VendorProfile = VendorProfile {
    vendor: Vendor::LmStudio,
    display_name: "LM Studio",
    default_base_url: Some("http://localhost:1234/v1"),
    chat_path: "/chat/completions",
    stream_path: "/chat/completions",
    embeddings_path: Some("/embeddings"),
    models_path: Some("/models"),
    stream_terminator: true,
    model_listing: ModelListing::OpenAiModels,
    auth: AuthMode::Bearer,
    errors: ErrorShape::Object,
    body: BodyStyle::OpenAi,
    capabilities: Capabilities {
        tools: true,
        json_object: true,
        json_schema: true,
        embeddings: true,
    },
};

static OPENAI_COMPATIBLE: VendorProfile = VendorProfile {
    vendor: Vendor::OpenAiCompatible,
    display_name: "OpenAI-compatible",
    default_base_url: None,
    chat_path: "/chat/completions",
    stream_path: "/chat/completions",
    embeddings_path: Some("/embeddings"),
    models_path: Some("/models"),
    stream_terminator: true,
    model_listing: ModelListing::OpenAiModels,
    auth: AuthMode::Bearer,
    errors: ErrorShape::Object,
    body: BodyStyle::OpenAi,
    capabilities: Capabilities {
        tools: true,
        json_object: true,
        json_schema: true,
        embeddings: true,
    },
};

/// Profile for a vendor
pub const fn profile(vendor: Vendor) -> &'static VendorProfile {
    match vendor {
        Vendor::OpenAi => &OPENAI,
        Vendor::Xai => &XAI,
        Vendor::Watsonx => &WATSONX,
        Vendor::Perplexity => &PERPLEXITY,
        Vendor::LmStudio => &LM_STUDIO,
        Vendor::OpenAiCompatible => &OPENAI_COMPATIBLE,
    }
}

impl VendorProfile {
    /// Reject parameters built for a different vendor
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` on a vendor mismatch or failed validation
    pub fn check_params(&self, params: &ProviderParams, model: &str) -> Result<(), ProviderError> {
        if params.vendor() != self.vendor {
            return Err(self.invalid(model, format!("received parameters for {}", params.vendor())));
        }

        params.validate().map_err(|message| self.invalid(model, message))
    }

    /// `InvalidRequest` for a call on `model`
    pub fn invalid(&self, model: &str, message: impl Into<String>) -> ProviderError {
        ProviderError::InvalidRequest {
            vendor: self.vendor,
            model: model.to_owned(),
            message: message.into(),
        }
    }

    /// Fail with `Capability` unless `supported`
    ///
    /// # Errors
    ///
    /// Returns `Capability` when `supported` is false
    pub fn require(&self, supported: bool, capability: Capability, model: &str) -> Result<(), ProviderError> {
        if supported {
            Ok(())
        } else {
            Err(ProviderError::Capability {
                vendor: self.vendor,
                model: model.to_owned(),
                capability,
            })
        }
    }

    /// Effective base URL, caller override first
    fn base_url<'a>(&self, params: &'a ProviderParams, model: &str) -> Result<std::borrow::Cow<'a, str>, ProviderError> {
        if let Some(url) = params.base_url() {
            return Ok(url.as_str().into());
        }

        self.default_base_url
            .map(Into::into)
            .ok_or_else(|| self.invalid(model, "a base_url is required"))
    }

    /// Absolute URL for `path` under the effective base URL
    ///
    /// watsonx endpoints additionally receive the `version` query parameter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if no base URL is known or the result is not
    /// a valid URL
    pub fn endpoint(&self, params: &ProviderParams, path: &str, model: &str) -> Result<Url, ProviderError> {
        let base = self.base_url(params, model)?;
        let joined = format!("{}{path}", base.trim_end_matches('/'));

        let mut url =
            Url::parse(&joined).map_err(|e| self.invalid(model, format!("invalid endpoint URL '{joined}': {e}")))?;

        if let ProviderParams::Watsonx(watsonx) = params {
            let version = watsonx.api_version.as_deref().unwrap_or(WATSONX_API_VERSION);
            url.query_pairs_mut().append_pair("version", version);
        }

        Ok(url)
    }

    /// Extract the vendor's error message from a JSON body, if it carries one
    pub fn error_message(&self, body: &Value) -> Option<String> {
        match self.errors {
            ErrorShape::Object => match body.get("error")? {
                Value::Null => None,
                Value::String(message) => Some(message.clone()),
                error => Some(
                    error
                        .get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| error.to_string(), str::to_owned),
                ),
            },
            ErrorShape::Array => {
                let errors = body.get("errors")?.as_array()?;
                if errors.is_empty() {
                    return None;
                }
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .map_or_else(|| e.to_string(), str::to_owned)
                    })
                    .collect();
                Some(messages.join("; "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use conduit_config::{OpenAiCompatibleParams, OpenAiParams, WatsonxParams};
    use serde_json::json;

    use super::*;

    #[test]
    fn default_endpoint_is_joined_without_double_slash() {
        let params = ProviderParams::OpenAi(OpenAiParams::new("sk"));
        let url = profile(Vendor::OpenAi).endpoint(&params, "/chat/completions", "gpt-4o").unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn caller_base_url_wins() {
        let base = Url::parse("http://127.0.0.1:9000/v1/").unwrap();
        let params = ProviderParams::OpenAiCompatible(OpenAiCompatibleParams::new(base));
        let url = profile(Vendor::OpenAiCompatible).endpoint(&params, "/models", "local").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1/models");
    }

    #[test]
    fn watsonx_endpoints_carry_version() {
        let mut watsonx = WatsonxParams::new("key", "proj");
        watsonx.api_version = Some("2025-02-11".to_owned());
        let params = ProviderParams::Watsonx(watsonx);

        let url = profile(Vendor::Watsonx).endpoint(&params, "/ml/v1/text/chat_stream", "ibm/granite").unwrap();
        assert_eq!(
            url.as_str(),
            "https://us-south.ml.cloud.ibm.com/ml/v1/text/chat_stream?version=2025-02-11"
        );
    }

    #[test]
    fn mismatched_params_are_rejected() {
        let params = ProviderParams::OpenAi(OpenAiParams::new("sk"));
        let err = profile(Vendor::Xai).check_params(&params, "grok-3").unwrap_err();
        assert!(err.to_string().contains("received parameters for openai"));
        assert_eq!(err.model(), "grok-3");
    }

    #[test]
    fn object_error_shape() {
        let openai = profile(Vendor::OpenAi);
        let body = json!({"error": {"message": "Incorrect API key", "type": "invalid_request_error"}});
        assert_eq!(openai.error_message(&body).as_deref(), Some("Incorrect API key"));
        assert_eq!(openai.error_message(&json!({"error": "quota"})).as_deref(), Some("quota"));
        assert_eq!(openai.error_message(&json!({"error": null})), None);
        assert_eq!(openai.error_message(&json!({"choices": []})), None);
    }

    #[test]
    fn array_error_shape() {
        let watsonx = profile(Vendor::Watsonx);
        let body = json!({
            "errors": [
                {"code": "model_not_supported", "message": "Model 'x' is not supported"},
                {"code": "invalid_input", "message": "project_id missing"}
            ],
            "status_code": 404
        });
        assert_eq!(
            watsonx.error_message(&body).as_deref(),
            Some("Model 'x' is not supported; project_id missing")
        );
        assert_eq!(watsonx.error_message(&json!({"errors": []})), None);
    }

    #[test]
    fn only_watsonx_streams_without_terminator() {
        for vendor in [
            Vendor::OpenAi,
            Vendor::Xai,
            Vendor::Perplexity,
            Vendor::LmStudio,
            Vendor::OpenAiCompatible,
        ] {
            assert!(profile(vendor).stream_terminator, "{vendor}");
        }
        assert!(!profile(Vendor::Watsonx).stream_terminator);
    }

    #[test]
    fn capability_gate() {
        let perplexity = profile(Vendor::Perplexity);
        let err = perplexity
            .require(perplexity.capabilities.tools, Capability::Tools, "sonar")
            .unwrap_err();
        assert_eq!(err.model(), "sonar");
        assert!(
            perplexity
                .require(perplexity.capabilities.json_schema, Capability::JsonSchema, "sonar")
                .is_ok()
        );
    }
}
