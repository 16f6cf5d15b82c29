mod lex;

pub use lex::LexState;

use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::syntax::Position;

/// One line of buffer content plus its cached lexical state.
///
/// `text` excludes the trailing newline. `lex` is the state in effect at the
/// line's first character; it is owned by the buffer's relex pass and the
/// scanning code only ever reads it.
#[derive(Debug, Clone)]
pub struct Line {
    text: String,
    chars: usize,
    lex: LexState,
}

impl Line {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            chars: text.chars().count(),
            lex: LexState::default(),
        }
    }

    /// Line content without the trailing newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters (not bytes).
    pub fn len(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    /// Content with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// Lexical state at the start of this line.
    pub fn lex(&self) -> LexState {
        self.lex
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.chars().nth(offset)
    }
}

/// A line-oriented text buffer.
///
/// The xi-rope holds the document as the single source of truth; a derived
/// per-line cache carries owned line text and the lexical-state flags the
/// scanning code reads. The cache is rebuilt from the rope after each edit
/// (owned-text scaffold), then the relex pass recomputes the flags from the
/// first affected line.
///
/// The scanning and indentation functions take `&Buffer` and never mutate
/// it; all edits funnel through [`Buffer::edit`].
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    lines: Vec<Line>,
    tab_width: usize,
}

impl Buffer {
    /// Create a buffer from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    /// Create a buffer from a string slice.
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self {
            rope: Rope::from(text),
            lines: Vec::new(),
            tab_width: 8,
        };
        buf.rebuild_lines();
        buf.relex(0, false);
        buf
    }

    /// Replace the byte range with `text` and refresh the line cache and
    /// lexical flags.
    pub fn edit(&mut self, range: Range<usize>, text: &str) {
        let first_line = self.line_of_byte(range.start);
        // An edit confined to one line cannot change the start state of any
        // line at or before it, so the relex pass may stop at the first
        // unchanged downstream state.
        let single_line = !text.contains('\n') && first_line == self.line_of_byte(range.end);
        let old_lex: Vec<LexState> = self.lines.iter().map(|l| l.lex).collect();

        let mut builder = Builder::new(self.rope.len());
        builder.replace(range, Rope::from(text));
        let delta: Delta<RopeInfo> = builder.build();
        self.rope = delta.apply(&self.rope);
        self.rebuild_lines();

        let keep = if single_line {
            self.lines.len()
        } else {
            first_line + 1
        };
        for i in 0..keep.min(self.lines.len()).min(old_lex.len()) {
            self.lines[i].lex = old_lex[i];
        }
        self.relex(first_line, single_line);
    }

    fn rebuild_lines(&mut self) {
        let text = self.rope.to_string();
        self.lines = text.split('\n').map(Line::new).collect();
    }

    /// Recompute cached lexical flags from `from` downward. With `converge`
    /// set, stops at the first line whose recomputed state matches the cache
    /// (only sound when the edit did not add or remove lines).
    fn relex(&mut self, from: usize, converge: bool) {
        let n = self.lines.len();
        for i in from..n {
            let next = lex::scan_line(&self.lines[i].text, self.lines[i].lex);
            if i + 1 >= n {
                break;
            }
            if converge && self.lines[i + 1].lex == next {
                break;
            }
            self.lines[i + 1].lex = next;
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Character length of a line, 0 when out of range.
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, Line::len)
    }

    /// Cached lexical state at the start of a line.
    pub fn lex(&self, idx: usize) -> LexState {
        self.lines.get(idx).map_or(LexState::None, Line::lex)
    }

    pub fn is_blank(&self, idx: usize) -> bool {
        self.lines.get(idx).is_some_and(Line::is_blank)
    }

    /// Character at a position; `None` at or past the end of the line.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.lines.get(pos.line)?.char_at(pos.offset)
    }

    /// Whole document text (exact round-trip).
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Document length in bytes.
    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, width: usize) {
        self.tab_width = width.max(1);
    }

    /// Display column of a position, expanding tabs to the next tab stop.
    pub fn column_at(&self, pos: Position) -> usize {
        let Some(line) = self.lines.get(pos.line) else {
            return 0;
        };
        let mut col = 0;
        for c in line.text.chars().take(pos.offset) {
            col = self.next_column(col, c);
        }
        col
    }

    /// Column of the first non-whitespace character of a line.
    pub fn indentation_of(&self, idx: usize) -> usize {
        let Some(line) = self.lines.get(idx) else {
            return 0;
        };
        let mut col = 0;
        for c in line.text.chars() {
            if !c.is_whitespace() {
                break;
            }
            col = self.next_column(col, c);
        }
        col
    }

    fn next_column(&self, col: usize, c: char) -> usize {
        if c == '\t' {
            col + self.tab_width - col % self.tab_width
        } else {
            col + 1
        }
    }

    /// Byte offset of the start of a line.
    pub fn byte_of_line(&self, idx: usize) -> usize {
        self.lines
            .iter()
            .take(idx)
            .map(|l| l.text.len() + 1)
            .sum()
    }

    fn line_of_byte(&self, byte: usize) -> usize {
        let mut start = 0;
        for (i, line) in self.lines.iter().enumerate() {
            let end = start + line.text.len() + 1;
            if byte < end {
                return i;
            }
            start = end;
        }
        self.lines.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_has_one_empty_line() {
        let buf = Buffer::from_text("");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_len(0), 0);
    }

    #[test]
    fn trailing_newline_yields_final_empty_line() {
        let buf = Buffer::from_text("abc\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0).unwrap().text(), "abc");
        assert_eq!(buf.line(1).unwrap().text(), "");
    }

    #[test]
    fn char_at_and_line_len() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.char_at(Position::new(0, 1)), Some('b'));
        assert_eq!(buf.char_at(Position::new(0, 2)), None);
        assert_eq!(buf.char_at(Position::new(1, 0)), Some('c'));
        assert_eq!(buf.line_len(1), 2);
    }

    #[test]
    fn column_expands_tabs() {
        let buf = Buffer::from_text("\ta\tb");
        assert_eq!(buf.column_at(Position::new(0, 1)), 8);
        assert_eq!(buf.column_at(Position::new(0, 2)), 9);
        assert_eq!(buf.column_at(Position::new(0, 3)), 16);
    }

    #[test]
    fn indentation_of_mixed_whitespace() {
        let buf = Buffer::from_text("    x");
        assert_eq!(buf.indentation_of(0), 4);

        let mut tabbed = Buffer::from_text("\t  y");
        tabbed.set_tab_width(4);
        assert_eq!(tabbed.indentation_of(0), 6);
    }

    #[test]
    fn relex_marks_multiline_string() {
        let buf = Buffer::from_text("(x \"open\nstill in\nout\" done)");
        assert_eq!(buf.lex(0), LexState::None);
        assert_eq!(buf.lex(1), LexState::InString);
        assert_eq!(buf.lex(2), LexState::InString);
    }

    #[test]
    fn relex_marks_block_comment() {
        let buf = Buffer::from_text("a #| b\nc |# d\ne");
        assert_eq!(buf.lex(1), LexState::InBlockComment);
        assert_eq!(buf.lex(2), LexState::None);
    }

    #[test]
    fn edit_closing_a_string_clears_downstream_flags() {
        let mut buf = Buffer::from_text("x \"ab\ncd");
        assert_eq!(buf.lex(1), LexState::InString);
        // close the string at the end of line 0
        buf.edit(5..5, "\"");
        assert_eq!(buf.line(0).unwrap().text(), "x \"ab\"");
        assert_eq!(buf.lex(1), LexState::None);
    }

    #[test]
    fn edit_spanning_lines_relexes_to_end() {
        let mut buf = Buffer::from_text("\"a\nb\"\nc");
        assert_eq!(buf.lex(1), LexState::InString);
        assert_eq!(buf.lex(2), LexState::None);
        // delete the closing quote together with the line break before it
        buf.edit(2..5, "");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.lex(1), LexState::InString);
    }

    #[test]
    fn edit_round_trips_text() {
        let mut buf = Buffer::from_text("hello world");
        buf.edit(5..5, ",");
        assert_eq!(buf.text(), "hello, world");
        buf.edit(0..6, "");
        assert_eq!(buf.text(), " world");
    }

    #[test]
    fn byte_of_line_counts_newlines() {
        let buf = Buffer::from_text("ab\ncde\nf");
        assert_eq!(buf.byte_of_line(0), 0);
        assert_eq!(buf.byte_of_line(1), 3);
        assert_eq!(buf.byte_of_line(2), 7);
    }
}
