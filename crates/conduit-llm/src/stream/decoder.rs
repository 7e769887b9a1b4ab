//! Server-sent event line framing
//!
//! Vendors stream `data: <json>` lines terminated by `data: [DONE]`. Reads
//! from the connection split that text at arbitrary byte offsets, so the
//! decoder keeps the unfinished tail of the last read and only ever emits
//! whole lines.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::BytesMut;
use futures_util::{Stream, StreamExt, stream};

/// Prefix marking an event payload line
pub const DATA_PREFIX: &str = "data:";

/// Payload signalling the end of the stream
pub const DONE_MARKER: &str = "[DONE]";

/// One decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Payload text following the `data:` prefix
    Data(String),
    /// Terminal marker; nothing after it is decoded
    Done,
}

/// Incremental line splitter for event streams
#[derive(Debug, Default)]
pub struct StreamFrameDecoder {
    buffer: BytesMut,
    /// Bytes at the front of `buffer` already known to contain no newline
    scanned: usize,
    done: bool,
}

impl StreamFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminal marker has been seen
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one read from the connection, returning every completed frame
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        if self.done {
            return frames;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(self.scanned + offset + 1);
            self.scanned = 0;

            if let Some(frame) = self.decode_line(&line) {
                frames.push(frame);
                if self.done {
                    return frames;
                }
            }
        }

        self.scanned = self.buffer.len();
        frames
    }

    /// Flush a final line that arrived without a trailing newline
    pub fn finish(&mut self) -> Option<Frame> {
        if self.done || self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        self.scanned = 0;
        self.decode_line(&rest)
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<Frame> {
        let line = String::from_utf8_lossy(raw);
        let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim();

        if payload.is_empty() {
            return None;
        }

        if payload == DONE_MARKER {
            self.done = true;
            self.buffer.clear();
            self.scanned = 0;
            return Some(Frame::Done);
        }

        Some(Frame::Data(payload.to_owned()))
    }
}

struct FrameState<S> {
    body: Pin<Box<S>>,
    decoder: StreamFrameDecoder,
    pending: VecDeque<Frame>,
    exhausted: bool,
}

/// Decode a byte stream lazily into frames
///
/// The body is only polled when no decoded frame is waiting, and polling
/// stops after the terminal marker. A transport error is yielded once and
/// ends the sequence.
pub fn frames<S, B, E>(body: S) -> impl Stream<Item = Result<Frame, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let state = FrameState {
        body: Box::pin(body),
        decoder: StreamFrameDecoder::new(),
        pending: VecDeque::new(),
        exhausted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(frame) = state.pending.pop_front() {
                return Some((Ok(frame), state));
            }
            if state.exhausted || state.decoder.is_done() {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let decoded = state.decoder.push(chunk.as_ref());
                    state.pending.extend(decoded);
                }
                Some(Err(e)) => {
                    state.exhausted = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.exhausted = true;
                    state.pending.extend(state.decoder.finish());
                }
            }
        }
    })
}
