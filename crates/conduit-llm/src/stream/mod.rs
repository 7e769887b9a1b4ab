mod accumulator;
mod decoder;

pub use accumulator::{ToolCallAccumulator, ToolCallDelta};
pub use decoder::{DATA_PREFIX, DONE_MARKER, Frame, StreamFrameDecoder, frames};
