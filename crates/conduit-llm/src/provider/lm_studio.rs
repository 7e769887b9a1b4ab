//! Whatever model is loaded locally is unknown ahead of time, so LM Studio
//! relies entirely on the catalog defaults

use super::{Dialect, never, no_headers};

pub(super) static DIALECT: Dialect = Dialect {
    known_models: &[],
    headers: no_headers,
    stream_usage: never,
};
