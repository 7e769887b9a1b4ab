use super::{Dialect, never, no_headers};
use crate::catalog::KnownModel;

pub(super) static DIALECT: Dialect = Dialect {
    known_models: MODELS,
    headers: no_headers,
    stream_usage: never,
};

static MODELS: &[KnownModel] = &[
    KnownModel {
        id: "ibm/granite-3-8b-instruct",
        display_name: "Granite 3 8B Instruct",
        context_length: Some(131_072),
        tools: true,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "ibm/granite-3-2-8b-instruct",
        display_name: "Granite 3.2 8B Instruct",
        context_length: Some(131_072),
        tools: true,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "ibm/granite-vision-3-2-2b",
        display_name: "Granite Vision 3.2 2B",
        context_length: Some(16_384),
        tools: false,
        vision: true,
        json_output: false,
    },
    KnownModel {
        id: "meta-llama/llama-3-3-70b-instruct",
        display_name: "Llama 3.3 70B Instruct",
        context_length: Some(131_072),
        tools: true,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "meta-llama/llama-3-2-90b-vision-instruct",
        display_name: "Llama 3.2 90B Vision Instruct",
        context_length: Some(131_072),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "mistralai/mistral-large",
        display_name: "Mistral Large",
        context_length: Some(32_768),
        tools: true,
        vision: false,
        json_output: true,
    },
];
