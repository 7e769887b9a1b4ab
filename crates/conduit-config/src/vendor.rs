use serde::Deserialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Supported vendor wire protocols
///
/// The string form is the provider id used as the `provider` tag in
/// [`ProviderParams`](crate::ProviderParams) and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Vendor {
    /// `OpenAI` chat completions API
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
    /// xAI (Grok) API
    Xai,
    /// IBM watsonx.ai
    Watsonx,
    /// Perplexity API
    Perplexity,
    /// Local LM Studio server
    LmStudio,
    /// Any server speaking the `OpenAI` chat completions dialect
    #[serde(rename = "openai_compatible")]
    #[strum(serialize = "openai_compatible")]
    OpenAiCompatible,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn provider_ids_round_trip_through_strings() {
        for vendor in Vendor::iter() {
            assert_eq!(Vendor::from_str(vendor.as_ref()).unwrap(), vendor);
        }
    }

    #[test]
    fn provider_ids_are_snake_case() {
        assert_eq!(Vendor::OpenAi.to_string(), "openai");
        assert_eq!(Vendor::LmStudio.to_string(), "lm_studio");
        assert_eq!(Vendor::OpenAiCompatible.to_string(), "openai_compatible");
    }
}
