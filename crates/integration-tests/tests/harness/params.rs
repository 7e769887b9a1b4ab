//! Provider parameters pointing at a mock vendor

use conduit_config::{LmStudioParams, OpenAiCompatibleParams, OpenAiParams, ProviderParams, WatsonxParams, XaiParams};
use secrecy::SecretString;

use super::mock_vendor::MockVendor;

pub fn compatible(mock: &MockVendor, api_key: Option<&str>) -> ProviderParams {
    let mut params = OpenAiCompatibleParams::new(mock.base_url().parse().unwrap());
    params.api_key = api_key.map(|key| SecretString::from(key.to_owned()));
    ProviderParams::OpenAiCompatible(params)
}

pub fn lm_studio(mock: &MockVendor) -> ProviderParams {
    ProviderParams::LmStudio(LmStudioParams {
        base_url: Some(mock.base_url().parse().unwrap()),
        ..LmStudioParams::default()
    })
}

pub fn openai(mock: &MockVendor) -> ProviderParams {
    let mut params = OpenAiParams::new("sk-test");
    params.base_url = Some(mock.base_url().parse().unwrap());
    ProviderParams::OpenAi(params)
}

pub fn xai(mock: &MockVendor) -> ProviderParams {
    let mut params = XaiParams::new("xai-test");
    params.base_url = Some(mock.base_url().parse().unwrap());
    ProviderParams::Xai(params)
}

/// watsonx parameters with both the API and IAM endpoints on the mock
pub fn watsonx(mock: &MockVendor) -> ProviderParams {
    let mut params = WatsonxParams::new("ibm-key", "proj-42");
    params.base_url = Some(mock.root_url().parse().unwrap());
    params.iam_url = Some(mock.url("/identity/token").parse().unwrap());
    ProviderParams::Watsonx(params)
}
