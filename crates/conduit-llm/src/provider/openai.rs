use conduit_config::ProviderParams;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::Dialect;
use crate::catalog::KnownModel;

pub(super) static DIALECT: Dialect = Dialect {
    known_models: MODELS,
    headers,
    stream_usage: is_canonical_openai,
};

static MODELS: &[KnownModel] = &[
    KnownModel {
        id: "gpt-4o",
        display_name: "GPT-4o",
        context_length: Some(128_000),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "gpt-4o-mini",
        display_name: "GPT-4o mini",
        context_length: Some(128_000),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "gpt-4.1",
        display_name: "GPT-4.1",
        context_length: Some(1_047_576),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "gpt-4.1-mini",
        display_name: "GPT-4.1 mini",
        context_length: Some(1_047_576),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "gpt-4-turbo",
        display_name: "GPT-4 Turbo",
        context_length: Some(128_000),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "gpt-3.5-turbo",
        display_name: "GPT-3.5 Turbo",
        context_length: Some(16_385),
        tools: true,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "o3",
        display_name: "o3",
        context_length: Some(200_000),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "o4-mini",
        display_name: "o4-mini",
        context_length: Some(200_000),
        tools: true,
        vision: true,
        json_output: true,
    },
];

fn headers(params: &ProviderParams) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let ProviderParams::OpenAi(params) = params else {
        return headers;
    };

    if let Some(organization) = params.organization.as_deref() {
        match HeaderValue::from_str(organization) {
            Ok(value) => {
                headers.insert(HeaderName::from_static("openai-organization"), value);
            }
            Err(e) => tracing::warn!(error = %e, "ignoring organization that is not a valid header value"),
        }
    }

    headers
}

/// Only the canonical API accepts `stream_options`; proxies and compatible
/// servers reached through an `OpenAI` base URL override often reject it
fn is_canonical_openai(url: &Url) -> bool {
    url.host_str().is_some_and(|host| host == "api.openai.com")
}
