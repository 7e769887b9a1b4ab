use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::Vendor;

/// Per-call credentials, endpoint and generation settings for one vendor
///
/// Selected by the `provider` tag, so a config table or a caller-built value
/// can only carry the fields its vendor understands.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderParams {
    /// `OpenAI`
    #[serde(rename = "openai")]
    OpenAi(OpenAiParams),
    /// xAI
    Xai(XaiParams),
    /// IBM watsonx.ai
    Watsonx(WatsonxParams),
    /// Perplexity
    Perplexity(PerplexityParams),
    /// LM Studio
    LmStudio(LmStudioParams),
    /// Generic OpenAI-compatible server
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible(OpenAiCompatibleParams),
}

/// Sampling settings shared by every vendor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f64>,
}

/// `OpenAI` parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiParams {
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Organization header value
    #[serde(default)]
    pub organization: Option<String>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// xAI parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XaiParams {
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// IBM watsonx.ai parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatsonxParams {
    /// IBM Cloud API key, exchanged for a bearer token on every call
    pub api_key: SecretString,
    /// watsonx project the calls are billed to
    pub project_id: String,
    /// Regional endpoint (e.g. `https://eu-de.ml.cloud.ibm.com`)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// IAM token endpoint override
    #[serde(default)]
    pub iam_url: Option<Url>,
    /// Value of the `version` query parameter
    #[serde(default)]
    pub api_version: Option<String>,
    /// Server-side generation time limit in milliseconds
    #[serde(default)]
    pub time_limit: Option<u64>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Perplexity parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerplexityParams {
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// LM Studio parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LmStudioParams {
    /// Server URL, defaults to the local LM Studio port
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Optional key for servers started with authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Generic OpenAI-compatible server parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiCompatibleParams {
    /// Server URL including any path prefix such as `/v1`
    pub base_url: Url,
    /// Optional bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl ProviderParams {
    /// Vendor these parameters belong to
    pub const fn vendor(&self) -> Vendor {
        match self {
            Self::OpenAi(_) => Vendor::OpenAi,
            Self::Xai(_) => Vendor::Xai,
            Self::Watsonx(_) => Vendor::Watsonx,
            Self::Perplexity(_) => Vendor::Perplexity,
            Self::LmStudio(_) => Vendor::LmStudio,
            Self::OpenAiCompatible(_) => Vendor::OpenAiCompatible,
        }
    }

    /// Caller-supplied base URL, if any
    pub const fn base_url(&self) -> Option<&Url> {
        match self {
            Self::OpenAi(p) => p.base_url.as_ref(),
            Self::Xai(p) => p.base_url.as_ref(),
            Self::Watsonx(p) => p.base_url.as_ref(),
            Self::Perplexity(p) => p.base_url.as_ref(),
            Self::LmStudio(p) => p.base_url.as_ref(),
            Self::OpenAiCompatible(p) => Some(&p.base_url),
        }
    }

    /// API key, if the vendor was given one
    pub const fn api_key(&self) -> Option<&SecretString> {
        match self {
            Self::OpenAi(p) => Some(&p.api_key),
            Self::Xai(p) => Some(&p.api_key),
            Self::Watsonx(p) => Some(&p.api_key),
            Self::Perplexity(p) => Some(&p.api_key),
            Self::LmStudio(p) => p.api_key.as_ref(),
            Self::OpenAiCompatible(p) => p.api_key.as_ref(),
        }
    }

    /// Sampling settings common to every vendor
    pub const fn generation(&self) -> GenerationParams {
        let (max_tokens, temperature) = match self {
            Self::OpenAi(p) => (p.max_tokens, p.temperature),
            Self::Xai(p) => (p.max_tokens, p.temperature),
            Self::Watsonx(p) => (p.max_tokens, p.temperature),
            Self::Perplexity(p) => (p.max_tokens, p.temperature),
            Self::LmStudio(p) => (p.max_tokens, p.temperature),
            Self::OpenAiCompatible(p) => (p.max_tokens, p.temperature),
        };
        GenerationParams { max_tokens, temperature }
    }

    /// Check vendor-specific requirements the type system cannot express
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated requirement.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(temperature) = self.generation().temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(format!("temperature must be between 0 and 2, got {temperature}"));
        }

        if self.generation().max_tokens == Some(0) {
            return Err("max_tokens must be greater than 0".to_owned());
        }

        if let Self::Watsonx(p) = self {
            if p.project_id.trim().is_empty() {
                return Err("watsonx requires a non-empty project_id".to_owned());
            }
            if p.time_limit == Some(0) {
                return Err("watsonx time_limit must be greater than 0".to_owned());
            }
        }

        if let Some(url) = self.base_url()
            && !matches!(url.scheme(), "http" | "https")
        {
            return Err(format!("base_url must be http or https, got {}", url.scheme()));
        }

        Ok(())
    }
}

impl OpenAiParams {
    /// Parameters with only an API key set
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: None,
            organization: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl XaiParams {
    /// Parameters with only an API key set
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl WatsonxParams {
    /// Parameters with an API key and project id set
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            project_id: project_id.into(),
            base_url: None,
            iam_url: None,
            api_version: None,
            time_limit: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl PerplexityParams {
    /// Parameters with only an API key set
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl OpenAiCompatibleParams {
    /// Parameters pointing at `base_url` without authentication
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn parse(toml_str: &str) -> ProviderParams {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn tag_selects_variant() {
        let params = parse(
            r#"
            provider = "watsonx"
            api_key = "ibm-key"
            project_id = "proj-1"
            time_limit = 30000
            "#,
        );

        let ProviderParams::Watsonx(watsonx) = &params else {
            panic!("expected watsonx params, got {params:?}");
        };
        assert_eq!(watsonx.project_id, "proj-1");
        assert_eq!(watsonx.time_limit, Some(30000));
        assert_eq!(params.api_key().unwrap().expose_secret(), "ibm-key");
        assert_eq!(params.vendor(), Vendor::Watsonx);
    }

    #[test]
    fn lm_studio_needs_no_fields() {
        let params = parse(r#"provider = "lm_studio""#);
        assert_eq!(params.vendor(), Vendor::LmStudio);
        assert!(params.api_key().is_none());
        assert!(params.base_url().is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = toml::from_str::<ProviderParams>(
            r#"
            provider = "perplexity"
            api_key = "k"
            project_id = "not-a-perplexity-field"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn compatible_requires_base_url() {
        let result = toml::from_str::<ProviderParams>(r#"provider = "openai_compatible""#);
        assert!(result.is_err());
    }

    #[test]
    fn generation_settings_are_exposed_uniformly() {
        let params = parse(
            r#"
            provider = "openai"
            api_key = "sk"
            max_tokens = 256
            temperature = 0.2
            "#,
        );
        assert_eq!(
            params.generation(),
            GenerationParams {
                max_tokens: Some(256),
                temperature: Some(0.2),
            }
        );
    }

    #[test]
    fn validate_rejects_blank_project_id() {
        let params = ProviderParams::Watsonx(WatsonxParams::new("key", "  "));
        assert!(params.validate().unwrap_err().contains("project_id"));
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let mut openai = OpenAiParams::new("sk");
        openai.temperature = Some(3.5);
        assert!(ProviderParams::OpenAi(openai).validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(ProviderParams::LmStudio(LmStudioParams::default()).validate().is_ok());
        assert!(ProviderParams::Xai(XaiParams::new("xai")).validate().is_ok());
    }
}
