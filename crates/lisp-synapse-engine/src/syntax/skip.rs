use crate::buffer::Buffer;
use crate::syntax::{Position, SyntaxCursor};

/// Advances past whitespace, including line boundaries. Stops at the first
/// non-whitespace character or the end of the buffer.
pub fn skip_whitespace(buf: &Buffer, pos: Position) -> Position {
    let mut cur = SyntaxCursor::new(buf, pos);
    while matches!(cur.peek_next(), Some(c) if c.is_whitespace()) {
        cur.next();
    }
    cur.pos()
}

/// Given a position at (or inside) a `;` line comment, advances to the start
/// of the next line. Comments are line-terminated; with no next line the
/// result is the end of the buffer.
pub fn skip_line_comment(buf: &Buffer, pos: Position) -> Position {
    if pos.line + 1 < buf.line_count() {
        Position::new(pos.line + 1, 0)
    } else {
        Position::new(pos.line, buf.line_len(pos.line))
    }
}

/// Given a position at an opening quote, advances past the string and
/// returns the position just after the closing quote.
///
/// A backslash always escapes the character after it, including another
/// backslash or the quote itself. An unterminated string is not an error:
/// the scan reaches the end of the buffer and reports `None`, which callers
/// treat as "no further structure".
pub fn skip_string(buf: &Buffer, pos: Position) -> Option<Position> {
    let mut cur = SyntaxCursor::new(buf, pos);
    let quote = cur.next()?;
    loop {
        match cur.next() {
            None => return None,
            Some('\\') => {
                cur.next();
            }
            Some(c) if c == quote => return Some(cur.pos()),
            Some(_) => {}
        }
    }
}
