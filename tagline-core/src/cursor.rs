/// Caret over the active page's text.
///
/// Rows and columns count characters, so offsets line up with span ranges.
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Current cursor position (row, col)
    pub row: usize,
    pub col: usize,
    /// Character offset at which each line starts
    line_starts: Vec<usize>,
    /// Character count of each line, excluding the newline
    line_lens: Vec<usize>,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            line_starts: vec![0],
            line_lens: vec![0],
        }
    }

    /// Load content, compute line offsets and put the caret at the start
    pub fn set_content(&mut self, content: &str) {
        self.line_starts.clear();
        self.line_lens.clear();

        let mut start = 0;
        for line in content.split('\n') {
            let len = line.chars().count();
            self.line_starts.push(start);
            self.line_lens.push(len);
            start += len + 1;
        }

        self.row = 0;
        self.col = 0;
    }

    /// Get current cursor position as (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Character offset of the caret
    pub fn offset(&self) -> usize {
        self.cursor_to_offset(self.row, self.col)
    }

    /// Convert (row, col) to character offset
    pub fn cursor_to_offset(&self, row: usize, col: usize) -> usize {
        match self.line_starts.get(row) {
            Some(start) => start + col.min(self.line_len(row)),
            None => self.end_offset(),
        }
    }

    /// Convert character offset to (row, col)
    pub fn offset_to_cursor(&self, offset: usize) -> (usize, usize) {
        for (i, &start) in self.line_starts.iter().enumerate().rev() {
            if offset >= start {
                return (i, (offset - start).min(self.line_len(i)));
            }
        }
        (0, 0)
    }

    /// Set cursor to character offset
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let (row, col) = self.offset_to_cursor(offset);
        self.row = row;
        self.col = col;
    }

    fn line_len(&self, row: usize) -> usize {
        self.line_lens.get(row).copied().unwrap_or(0)
    }

    fn end_offset(&self) -> usize {
        let last = self.line_starts.len() - 1;
        self.line_starts[last] + self.line_len(last)
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.line_starts.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            // Wrap to end of previous line
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.line_starts.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_to_start(&mut self) {
        self.col = 0;
    }

    pub fn move_to_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// Jump to the end of the current word, the natural place to close a
    /// selection.
    pub fn move_word_forward(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        let mut offset = self.offset();

        while offset < chars.len() && chars[offset].is_whitespace() {
            offset += 1;
        }
        while offset < chars.len() && !chars[offset].is_whitespace() {
            offset += 1;
        }

        self.set_cursor_offset(offset);
    }

    /// Jump to the start of the previous word
    pub fn move_word_back(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        let mut offset = self.offset().min(chars.len());

        while offset > 0 && chars[offset - 1].is_whitespace() {
            offset -= 1;
        }
        while offset > 0 && !chars[offset - 1].is_whitespace() {
            offset -= 1;
        }

        self.set_cursor_offset(offset);
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}
