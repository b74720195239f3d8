const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// A `data:` line of a server-sent event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    Done,
}

/// Longest line accepted before the stream is treated as broken.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SseFrameError {
    #[error("event stream line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

/// Incremental line framer for `text/event-stream` bodies.
///
/// Bytes are buffered until a newline arrives, so a frame split across any
/// number of network reads (including inside a multi-byte UTF-8 sequence) is
/// decoded exactly once. Lines without the `data:` tag are ignored. After
/// `data: [DONE]` every further byte is discarded.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    buffer: Vec<u8>,
    // Bytes of `buffer` already known to hold no newline.
    scanned: usize,
    done: bool,
}

impl SseFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds one network read and returns every frame it completed.
    ///
    /// A line longer than [`MAX_LINE_BYTES`] fails the decoder; it yields
    /// nothing afterwards.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, SseFrameError> {
        if self.done {
            return Ok(Vec::new());
        }

        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut line_start = 0;
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let line_end = self.scanned + offset + 1;
            self.scanned = line_end;
            if line_end - line_start > MAX_LINE_BYTES {
                return Err(self.overflow());
            }

            let frame = decode_line(&self.buffer[line_start..line_end]);
            line_start = line_end;

            if let Some(frame) = frame {
                let finished = frame == SseFrame::Done;
                frames.push(frame);
                if finished {
                    self.done = true;
                    self.reset();
                    return Ok(frames);
                }
            }
        }

        self.buffer.drain(..line_start);
        self.scanned = self.buffer.len();
        if self.buffer.len() > MAX_LINE_BYTES {
            return Err(self.overflow());
        }
        Ok(frames)
    }

    /// Flushes a trailing line the upstream closed without terminating.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if self.done || self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        let frame = decode_line(&line);
        if frame == Some(SseFrame::Done) {
            self.done = true;
        }
        frame
    }

    fn overflow(&mut self) -> SseFrameError {
        self.done = true;
        self.reset();
        SseFrameError::LineTooLong {
            limit: MAX_LINE_BYTES,
        }
    }

    fn reset(&mut self) {
        self.buffer = Vec::new();
        self.scanned = 0;
    }
}

fn decode_line(line: &[u8]) -> Option<SseFrame> {
    let text = String::from_utf8_lossy(line);
    let payload = text.trim().strip_prefix(DATA_PREFIX)?.trim_start();

    if payload.is_empty() {
        return None;
    }

    if payload == DONE_SENTINEL {
        return Some(SseFrame::Done);
    }

    Some(SseFrame::Data(payload.to_string()))
}
