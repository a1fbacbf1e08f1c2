/// Tracks the read position of a [`TokenReader`](crate::reader::TokenReader).
///
/// Both counters are 1-based once something has been read; `line_index` is 0
/// before the first line is fetched and `token_index` is 0 right after a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationTracker {
    /// Number of lines fetched so far.
    pub line_index: usize,
    /// Number of tokens consumed on the current line.
    pub token_index: usize,
}

impl LocationTracker {
    /// Creates a new tracker at the start of a stream.
    pub fn new() -> Self {
        LocationTracker { line_index: 0, token_index: 0 }
    }

    /// Advances the tracker to the next line.
    pub fn next_line(&mut self) {
        self.line_index += 1;
        self.token_index = 0;
    }

    /// Advances the tracker past one token of the current line.
    pub fn next_token(&mut self) {
        self.token_index += 1;
    }

    /// Marks `count` tokens of the current line as consumed.
    pub fn consume_line(&mut self, count: usize) {
        self.token_index = count;
    }
}
