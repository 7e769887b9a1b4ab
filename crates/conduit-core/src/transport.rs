//! Cancellation-aware request execution shared by chat and embeddings

use std::future::Future;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::profile::VendorProfile;

/// Identity and cancellation handle for one provider call
///
/// Carries what every error needs (vendor, model) and races each network
/// await against the caller's token.
#[derive(Debug, Clone, Copy)]
pub struct CallScope<'a> {
    pub profile: &'static VendorProfile,
    pub model: &'a str,
    pub cancel: &'a CancellationToken,
}

impl<'a> CallScope<'a> {
    pub const fn new(profile: &'static VendorProfile, model: &'a str, cancel: &'a CancellationToken) -> Self {
        Self { profile, model, cancel }
    }

    /// Await `future` unless the token fires first
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token is (or becomes) cancelled
    pub async fn guard<F: Future>(&self, future: F) -> Result<F::Output, ProviderError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(self.cancelled()),
            output = future => Ok(output),
        }
    }

    pub fn cancelled(&self) -> ProviderError {
        ProviderError::Cancelled {
            vendor: self.profile.vendor,
            model: self.model.to_owned(),
        }
    }

    pub fn network(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::Network {
            vendor: self.profile.vendor,
            model: self.model.to_owned(),
            message: message.into(),
        }
    }

    pub fn parse(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::Parse {
            vendor: self.profile.vendor,
            model: self.model.to_owned(),
            message: message.into(),
        }
    }

    pub fn vendor_error(&self, message: impl Into<String>, status: Option<u16>) -> ProviderError {
        ProviderError::Vendor {
            vendor: self.profile.vendor,
            model: self.model.to_owned(),
            message: message.into(),
            status,
        }
    }

    /// Send a request and return the response once a success status arrives
    ///
    /// A non-success status is turned into `Vendor` when the body carries the
    /// vendor's error indicator and into `Http` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled`, `Network`, `Vendor` or `Http`
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ProviderError> {
        let response = self.guard(builder.send()).await?.map_err(|e| {
            tracing::error!(vendor = %self.profile.vendor, model = %self.model, error = %e, "upstream request failed");
            self.network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = self.guard(response.text()).await?.unwrap_or_default();

        tracing::warn!(
            vendor = %self.profile.vendor,
            model = %self.model,
            status = %status,
            "upstream returned error"
        );

        let vendor_message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| self.profile.error_message(&json));

        Err(match vendor_message {
            Some(message) => self.vendor_error(message, Some(status.as_u16())),
            None => ProviderError::Http {
                vendor: self.profile.vendor,
                model: self.model.to_owned(),
                status: status.as_u16(),
                body,
            },
        })
    }

    /// Read a complete JSON body, rejecting vendor-reported errors
    ///
    /// # Errors
    ///
    /// Returns `Cancelled`, `Network`, `Parse` or `Vendor`
    pub async fn json(&self, response: Response) -> Result<Value, ProviderError> {
        let status = response.status().as_u16();
        let bytes = self
            .guard(response.bytes())
            .await?
            .map_err(|e| self.network(format!("failed to read response body: {e}")))?;

        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| self.parse(format!("response is not valid JSON: {e}")))?;

        if let Some(message) = self.profile.error_message(&body) {
            return Err(self.vendor_error(message, Some(status)));
        }

        Ok(body)
    }

    /// Read a complete JSON body into a typed wire struct
    ///
    /// # Errors
    ///
    /// As [`Self::json`], plus `Parse` when the body does not match `T`
    pub async fn typed<T: DeserializeOwned>(&self, response: Response) -> Result<T, ProviderError> {
        let body = self.json(response).await?;
        serde_json::from_value(body).map_err(|e| self.parse(format!("unexpected response shape: {e}")))
    }
}
