use super::{Dialect, never, no_headers};
use crate::catalog::KnownModel;

pub(super) static DIALECT: Dialect = Dialect {
    known_models: MODELS,
    headers: no_headers,
    stream_usage: never,
};

static MODELS: &[KnownModel] = &[
    KnownModel {
        id: "grok-4",
        display_name: "Grok 4",
        context_length: Some(256_000),
        tools: true,
        vision: true,
        json_output: true,
    },
    KnownModel {
        id: "grok-3",
        display_name: "Grok 3",
        context_length: Some(131_072),
        tools: true,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "grok-3-mini",
        display_name: "Grok 3 Mini",
        context_length: Some(131_072),
        tools: true,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "grok-2-vision",
        display_name: "Grok 2 Vision",
        context_length: Some(32_768),
        tools: true,
        vision: true,
        json_output: true,
    },
];
