// ABOUTME: Incremental line splitting over byte chunks.
// ABOUTME: Splits on newline, strips CRLF, and carries partial lines across chunk boundaries.

/// Accumulates byte chunks and yields completed text lines.
///
/// A line ends at `\n`; a `\r` directly before it is stripped. Bytes after
/// the last newline stay buffered until the next chunk, or come out of
/// `finish` when the stream ends. Invalid UTF-8 is replaced rather than
/// failing, since a stray byte must not kill a live stream.
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Feed a chunk and get every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Consume the buffer at end of stream. A trailing line without a final
    /// newline is still delivered; an empty remainder yields nothing.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}
