//! Incremental decoder for the relayed server-sent-event stream.
//!
//! Chunk boundaries are arbitrary: a chunk may end in the middle of a
//! multi-byte character, a `data:` line, or a JSON payload. The decoder
//! carries each of those across calls to [`SseDecoder::feed`], so the
//! assembled text never depends on how the bytes were split.
//!
//! A `data:` payload that does not parse is treated as the first part of a
//! payload that is still arriving. It is held in
//! [`FrameState::AwaitingMoreBytes`] and re-joined with a newline to the
//! following line(s) until it parses.

use aftergame_types::llm::{CompletionChunk, STREAM_DONE_SENTINEL};

const DATA_PREFIX: &str = "data:";

/// Upper bound on a held fragment before the stream is considered corrupt.
pub const MAX_PENDING_FRAME_BYTES: usize = 1024 * 1024;

/// Output of a single decode step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    /// Non-empty incremental assistant text.
    Delta(String),
    /// The end-of-stream sentinel was observed.
    Done,
}

/// Frame reassembly state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameState {
    /// No partial payload is held.
    Ready,
    /// A payload failed to parse and waits for its continuation.
    AwaitingMoreBytes(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("pending stream frame exceeded {limit} bytes")]
    FrameTooLarge { limit: usize },
}

/// Streaming decoder state for one assistant reply.
#[derive(Debug)]
pub struct SseDecoder {
    utf8_carry: Vec<u8>,
    line_buf: String,
    state: FrameState,
    assembled: String,
    done: bool,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            utf8_carry: Vec::new(),
            line_buf: String::new(),
            state: FrameState::Ready,
            assembled: String::new(),
            done: false,
        }
    }

    /// Consume one chunk of bytes and return the frames it completed.
    ///
    /// After [`DecodedFrame::Done`] every further byte is ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<DecodedFrame>, DecodeError> {
        let mut out = Vec::new();
        if self.done {
            return Ok(out);
        }

        let text = self.decode_utf8(chunk);
        self.line_buf.push_str(&text);

        while let Some(pos) = self.line_buf.find('\n') {
            let mut line: String = self.line_buf.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            self.process_line(&line, &mut out)?;
            if self.done {
                self.line_buf.clear();
                self.utf8_carry.clear();
                break;
            }
        }

        Ok(out)
    }

    /// Signal end of the byte stream. Anything unterminated is discarded.
    pub fn finish(&mut self) {
        if let FrameState::AwaitingMoreBytes(pending) = &self.state {
            tracing::warn!(
                pending_bytes = pending.len(),
                "stream ended with an incomplete frame; discarding"
            );
        }
        if !self.line_buf.is_empty() || !self.utf8_carry.is_empty() {
            tracing::debug!(
                trailing_bytes = self.line_buf.len() + self.utf8_carry.len(),
                "discarding unterminated trailing stream content"
            );
        }
        self.state = FrameState::Ready;
        self.line_buf.clear();
        self.utf8_carry.clear();
    }

    /// Whether the end-of-stream sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    /// All deltas so far, concatenated in arrival order.
    pub fn text(&self) -> &str {
        &self.assembled
    }

    pub fn into_text(self) -> String {
        self.assembled
    }

    /// Decode as much of `carry ++ chunk` as possible. An incomplete trailing
    /// sequence is kept for the next chunk; invalid sequences become U+FFFD.
    fn decode_utf8(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.utf8_carry);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            self.utf8_carry = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    fn process_line(&mut self, line: &str, out: &mut Vec<DecodedFrame>) -> Result<(), DecodeError> {
        if let FrameState::AwaitingMoreBytes(pending) = &self.state {
            if line.starts_with(DATA_PREFIX) {
                tracing::warn!(
                    pending_bytes = pending.len(),
                    "new frame arrived before the pending fragment completed; dropping fragment"
                );
                self.state = FrameState::Ready;
            } else if line.is_empty() || line.starts_with(':') {
                return Ok(());
            } else {
                let candidate = format!("{pending}\n{line}");
                self.state = FrameState::Ready;
                return self.handle_payload(candidate, out);
            }
        }

        if line.is_empty() || line.starts_with(':') {
            return Ok(());
        }
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(());
        };
        let payload = payload.trim();

        if payload == STREAM_DONE_SENTINEL {
            self.done = true;
            out.push(DecodedFrame::Done);
            return Ok(());
        }

        self.handle_payload(payload.to_string(), out)
    }

    fn handle_payload(
        &mut self,
        payload: String,
        out: &mut Vec<DecodedFrame>,
    ) -> Result<(), DecodeError> {
        let value: serde_json::Value = match serde_json::from_str(&payload) {
            Ok(v) => v,
            Err(_) => {
                if payload.len() > MAX_PENDING_FRAME_BYTES {
                    return Err(DecodeError::FrameTooLarge {
                        limit: MAX_PENDING_FRAME_BYTES,
                    });
                }
                self.state = FrameState::AwaitingMoreBytes(payload);
                return Ok(());
            }
        };

        match serde_json::from_value::<CompletionChunk>(value) {
            Ok(chunk) => {
                if let Some(text) = chunk.delta_text().filter(|t| !t.is_empty()) {
                    self.assembled.push_str(text);
                    out.push(DecodedFrame::Delta(text.to_string()));
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring stream frame without a delta");
            }
        }
        Ok(())
    }
}
