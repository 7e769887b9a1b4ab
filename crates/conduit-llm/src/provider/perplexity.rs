//! Perplexity has no model listing endpoint, so this table is also what
//! `list_models` returns

use super::{Dialect, never, no_headers};
use crate::catalog::KnownModel;

pub(super) static DIALECT: Dialect = Dialect {
    known_models: MODELS,
    headers: no_headers,
    stream_usage: never,
};

static MODELS: &[KnownModel] = &[
    KnownModel {
        id: "sonar",
        display_name: "Sonar",
        context_length: Some(128_000),
        tools: false,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "sonar-pro",
        display_name: "Sonar Pro",
        context_length: Some(200_000),
        tools: false,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "sonar-reasoning",
        display_name: "Sonar Reasoning",
        context_length: Some(128_000),
        tools: false,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "sonar-reasoning-pro",
        display_name: "Sonar Reasoning Pro",
        context_length: Some(128_000),
        tools: false,
        vision: false,
        json_output: true,
    },
    KnownModel {
        id: "sonar-deep-research",
        display_name: "Sonar Deep Research",
        context_length: Some(128_000),
        tools: false,
        vision: false,
        json_output: true,
    },
];
