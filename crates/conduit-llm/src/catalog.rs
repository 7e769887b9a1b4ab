//! Built-in model metadata
//!
//! Listing endpoints only return ids, so capability flags and context sizes
//! come from per-vendor tables compiled into the binary. Ids are matched by
//! longest prefix, which covers dated snapshots such as
//! `gpt-4o-2024-08-06`.

use conduit_core::Capabilities;

use crate::types::ModelDescriptor;

/// Substrings that mark a model id as an embedding model
const EMBEDDING_MARKERS: &[&str] = &["embed", "bge", "e5-", "gte-", "minilm", "nomic", "mxbai", "slate"];

/// Static metadata for one model family
#[derive(Debug, Clone, Copy)]
pub struct KnownModel {
    /// Model id or id prefix
    pub id: &'static str,
    pub display_name: &'static str,
    pub context_length: Option<u32>,
    pub tools: bool,
    pub vision: bool,
    pub json_output: bool,
}

impl KnownModel {
    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            id: self.id.to_owned(),
            display_name: self.display_name.to_owned(),
            context_length: self.context_length,
            supports_tools: self.tools,
            supports_vision: self.vision,
            supports_json_output: self.json_output,
        }
    }
}

/// Whether `id` looks like an embedding rather than a chat model
pub fn is_embedding_model(id: &str) -> bool {
    let id = id.to_ascii_lowercase();
    EMBEDDING_MARKERS.iter().any(|marker| id.contains(marker))
}

/// Entry with the longest id prefix matching `id`
pub fn lookup<'a>(table: &'a [KnownModel], id: &str) -> Option<&'a KnownModel> {
    table
        .iter()
        .filter(|model| id.starts_with(model.id))
        .max_by_key(|model| model.id.len())
}

/// Descriptor for `id`, falling back to conservative defaults
///
/// Unknown models are assumed to handle tools and JSON output when the
/// vendor does, and to have no vision support.
pub fn describe(table: &[KnownModel], capabilities: &Capabilities, id: &str) -> ModelDescriptor {
    match lookup(table, id) {
        Some(known) => ModelDescriptor {
            id: id.to_owned(),
            display_name: if known.id == id {
                known.display_name.to_owned()
            } else {
                id.to_owned()
            },
            ..known.descriptor()
        },
        None => ModelDescriptor {
            id: id.to_owned(),
            display_name: id.to_owned(),
            context_length: None,
            supports_tools: capabilities.tools,
            supports_vision: false,
            supports_json_output: capabilities.json_object || capabilities.json_schema,
        },
    }
}
