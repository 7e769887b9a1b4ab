//! Per-call credential resolution
//!
//! API-key vendors move straight to [`Credential::Bearer`] without touching
//! the network. watsonx exchanges its IBM Cloud API key at the IAM endpoint
//! on every call; the returned token is not cached here, so callers issuing
//! many requests should cache above this layer.

use conduit_config::ProviderParams;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::profile::{AuthMode, IBM_IAM_URL};
use crate::transport::CallScope;

/// Grant type for exchanging an IBM Cloud API key
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Resolved credential for one call
#[derive(Debug, Clone)]
pub enum Credential {
    /// No credential configured; requests go out without `Authorization`
    Unauthenticated,
    /// Bearer token, either the static key or an exchanged token
    Bearer(SecretString),
}

impl Credential {
    /// Attach the credential to an outgoing request
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Unauthenticated => builder,
            Self::Bearer(token) => builder.bearer_auth(token.expose_secret()),
        }
    }

    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Bearer(_))
    }
}

/// IAM token endpoint response
#[derive(Deserialize)]
struct IamTokenResponse {
    access_token: SecretString,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// IAM error body
#[derive(Deserialize)]
struct IamErrorResponse {
    #[serde(rename = "errorMessage")]
    error_message: String,
}

/// Resolves the credential each call should carry
#[derive(Debug, Clone)]
pub struct AccessTokenProvider {
    client: Client,
}

impl AccessTokenProvider {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Resolve the credential for a call described by `scope`
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when an exchange vendor has no key, or the
    /// transport, vendor, and cancellation errors of the exchange itself
    pub async fn resolve(&self, scope: &CallScope<'_>, params: &ProviderParams) -> Result<Credential, ProviderError> {
        match scope.profile.auth {
            AuthMode::Bearer => Ok(params
                .api_key()
                .filter(|key| !key.expose_secret().is_empty())
                .map_or(Credential::Unauthenticated, |key| Credential::Bearer(key.clone()))),
            AuthMode::IamExchange => self.exchange(scope, params).await.map(Credential::Bearer),
        }
    }

    async fn exchange(&self, scope: &CallScope<'_>, params: &ProviderParams) -> Result<SecretString, ProviderError> {
        let vendor = scope.profile.vendor;
        let ProviderParams::Watsonx(watsonx) = params else {
            return Err(scope
                .profile
                .invalid(scope.model, "token exchange requires watsonx parameters"));
        };

        let iam_url = watsonx.iam_url.as_ref().map_or(IBM_IAM_URL, url::Url::as_str);

        tracing::debug!(vendor = %vendor, iam_url, "exchanging API key for bearer token");

        let form = [
            ("grant_type", IAM_GRANT_TYPE),
            ("apikey", watsonx.api_key.expose_secret()),
        ];

        let request = self
            .client
            .post(iam_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form);

        let response = scope.guard(request.send()).await?.map_err(|e| {
            tracing::error!(vendor = %vendor, error = %e, "token exchange request failed");
            scope.network(format!("token exchange failed: {e}"))
        })?;

        let status = response.status();
        let bytes = scope
            .guard(response.bytes())
            .await?
            .map_err(|e| scope.network(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            tracing::warn!(vendor = %vendor, status = %status, "token exchange rejected");
            return Err(match serde_json::from_slice::<IamErrorResponse>(&bytes) {
                Ok(error) => scope.vendor_error(error.error_message, Some(status.as_u16())),
                Err(_) => ProviderError::Http {
                    vendor,
                    model: scope.model.to_owned(),
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
            });
        }

        let token: IamTokenResponse = serde_json::from_slice(&bytes)
            .map_err(|e| scope.parse(format!("token response missing access_token: {e}")))?;

        tracing::debug!(vendor = %vendor, expires_in = ?token.expires_in, "obtained bearer token");

        Ok(token.access_token)
    }
}
