//! Line framing over a growing response buffer.

/// Slices a monotonically growing text buffer into newly arrived,
/// newline-terminated lines.
///
/// The framer keeps a cursor over how much of the cumulative buffer has
/// already been delivered; it never re-emits a line. An incomplete trailing
/// fragment (a record whose newline has not arrived yet) stays buffered
/// until the next call sees its terminator, so a chunk boundary in the
/// middle of a JSON record cannot produce a misparse. Once the transport
/// has ended, [`flush`](LineFramer::flush) drains that tail.
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Bytes of the cumulative buffer already sliced into lines.
    processed_len: usize,
}

impl LineFramer {
    /// Create a framer for a new stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// How much of the cumulative buffer has been consumed.
    pub fn processed_len(&self) -> usize {
        self.processed_len
    }

    /// Emit the complete, non-blank lines that arrived since the last call.
    ///
    /// `cumulative` must be the full text received so far on the stream;
    /// it may only grow between calls. The cursor advances through the last
    /// newline in the new segment; anything after it is held back.
    pub fn drain_lines(&mut self, cumulative: &str) -> Vec<String> {
        debug_assert!(
            cumulative.len() >= self.processed_len,
            "cumulative stream buffer shrank"
        );

        let tail = &cumulative[self.processed_len..];
        let Some(last_newline) = tail.rfind('\n') else {
            return Vec::new();
        };

        let complete = &tail[..=last_newline];
        self.processed_len += last_newline + 1;

        complete
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Drain an unterminated trailing fragment after the transport ended.
    ///
    /// Returns `None` when the buffer ended on a newline or the tail is
    /// blank.
    pub fn flush(&mut self, cumulative: &str) -> Option<String> {
        let tail = &cumulative[self.processed_len..];
        self.processed_len = cumulative.len();

        let line = tail.trim_end_matches('\r');
        if line.trim().is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }

    /// Reset the cursor for a new stream.
    pub fn reset(&mut self) {
        self.processed_len = 0;
    }
}
