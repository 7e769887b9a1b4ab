use std::collections::BTreeMap;

use crate::types::ToolCall;

/// One streamed fragment of a tool call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallDelta {
    /// Position of the call in the final list
    pub index: u32,
    pub id: Option<String>,
    /// Name fragment
    pub name: Option<String>,
    /// Arguments fragment
    pub arguments: Option<String>,
}

#[derive(Debug, Default)]
struct PartialCall {
    id: String,
    name: String,
    arguments: String,
}

/// Reassembles tool calls from index-addressed stream fragments
///
/// A call is created on first sight of its index. The id is taken from the
/// first non-empty fragment that carries one; name and arguments only ever
/// grow.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: BTreeMap<u32, PartialCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, delta: ToolCallDelta) {
        let call = self.calls.entry(delta.index).or_default();

        if call.id.is_empty()
            && let Some(id) = delta.id.filter(|id| !id.is_empty())
        {
            call.id = id;
        }
        if let Some(name) = delta.name {
            call.name.push_str(&name);
        }
        if let Some(arguments) = delta.arguments {
            call.arguments.push_str(&arguments);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Completed calls in index order
    pub fn finish(self) -> Vec<ToolCall> {
        self.calls
            .into_values()
            .map(|call| ToolCall::function(call.id, call.name, call.arguments))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn delta(index: u32, id: Option<&str>, name: Option<&str>, arguments: Option<&str>) -> ToolCallDelta {
        ToolCallDelta {
            index,
            id: id.map(str::to_owned),
            name: name.map(str::to_owned),
            arguments: arguments.map(str::to_owned),
        }
    }

    #[test]
    fn fragments_concatenate_per_index() {
        let mut acc = ToolCallAccumulator::new();
        acc.apply(delta(0, Some("c1"), Some("get_"), None));
        acc.apply(delta(0, None, Some("weather"), Some("{\"city\":")));
        acc.apply(delta(0, None, None, Some("\"Paris\"}")));

        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ToolCall::function("c1", "get_weather", r#"{"city":"Paris"}"#));
        assert_eq!(calls[0].parsed_arguments().unwrap(), json!({"city": "Paris"}));
    }

    #[test]
    fn interleaved_indices_keep_their_identity() {
        let mut acc = ToolCallAccumulator::new();
        acc.apply(delta(1, Some("b"), Some("second"), Some("{")));
        acc.apply(delta(0, Some("a"), Some("first"), Some("[")));
        acc.apply(delta(1, None, None, Some("}")));
        acc.apply(delta(0, None, None, Some("]")));

        let calls = acc.finish();
        assert_eq!(
            calls,
            vec![ToolCall::function("a", "first", "[]"), ToolCall::function("b", "second", "{}")]
        );
    }

    #[test]
    fn id_is_never_overwritten() {
        let mut acc = ToolCallAccumulator::new();
        acc.apply(delta(0, Some(""), Some("f"), None));
        acc.apply(delta(0, Some("real"), None, None));
        acc.apply(delta(0, Some(""), None, None));
        acc.apply(delta(0, Some("other"), None, None));

        assert_eq!(acc.finish()[0].id, "real");
    }

    #[test]
    fn sparse_indices_come_out_in_order() {
        let mut acc = ToolCallAccumulator::new();
        acc.apply(delta(7, Some("z"), Some("late"), None));
        acc.apply(delta(2, Some("y"), Some("early"), None));

        let ids: Vec<String> = acc.finish().into_iter().map(|call| call.id).collect();
        assert_eq!(ids, ["y", "z"]);
    }

    #[test]
    fn empty_accumulator_finishes_empty() {
        let acc = ToolCallAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.finish().is_empty());
    }
}
