use crate::buffer::Buffer;
use crate::syntax::matcher::containing_sexp;
use crate::syntax::skip::{skip_line_comment, skip_string, skip_whitespace};
use crate::syntax::{Position, SyntaxCursor};

/// Skips whitespace and `;` comments, interleaved: after each comment the
/// scan re-checks for whitespace and further comments.
pub(crate) fn skip_blanks(buf: &Buffer, pos: Position) -> Position {
    let mut p = pos;
    loop {
        p = skip_whitespace(buf, p);
        match buf.char_at(p) {
            Some(';') => p = skip_line_comment(buf, p),
            _ => return p,
        }
    }
}

/// Moves forward over one balanced expression and returns the position just
/// past its end.
///
/// Returns `None` when the next non-blank character is `)` (the enclosing
/// list ends here), when the buffer is exhausted, or when the expression is
/// unterminated. All of these are "nothing to do" outcomes, never errors.
pub fn forward_sexp(buf: &Buffer, pos: Position) -> Option<Position> {
    let p = skip_blanks(buf, pos);
    match buf.char_at(p)? {
        ')' => None,
        '(' => scan_list_forward(buf, p),
        '"' => skip_string(buf, p),
        _ => {
            // a symbol token: maximal run of non-whitespace, non-paren chars
            let mut cur = SyntaxCursor::new(buf, p);
            while matches!(cur.peek_next(), Some(c) if !c.is_whitespace() && c != '(' && c != ')')
            {
                cur.next();
            }
            Some(cur.pos())
        }
    }
}

/// Consumes a parenthesized list starting at `open`, counting nested
/// delimiters and treating strings and `;` comments as opaque.
fn scan_list_forward(buf: &Buffer, open: Position) -> Option<Position> {
    let mut cur = SyntaxCursor::new(buf, open);
    cur.next();
    let mut depth = 1usize;
    loop {
        let at = cur.pos();
        match cur.next() {
            None => return None,
            Some('(') => depth += 1,
            Some(')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(cur.pos());
                }
            }
            Some('"') => cur = SyntaxCursor::new(buf, skip_string(buf, at)?),
            Some(';') => cur = SyntaxCursor::new(buf, skip_line_comment(buf, at)),
            Some('\\') => {
                cur.next();
            }
            Some(_) => {}
        }
    }
}

/// Moves backward over one balanced expression and returns its start.
///
/// Inside a list this is the start of the sexp immediately preceding `pos`;
/// at top level it is the start of the preceding token, or the opening
/// delimiter of the preceding list.
pub fn backward_sexp(buf: &Buffer, pos: Position) -> Option<Position> {
    match containing_sexp(buf, pos) {
        Some(open) => {
            let first = down_list(buf, open)?;
            let mut last = None;
            let mut cur = first;
            loop {
                if cur >= pos {
                    break;
                }
                match buf.char_at(cur) {
                    None | Some(')') => break,
                    Some(_) => {}
                }
                last = Some(cur);
                match forward_sexp(buf, cur) {
                    Some(end) if end < pos => cur = skip_blanks(buf, end),
                    _ => break,
                }
            }
            last
        }
        None => {
            // top level: back over whitespace to the previous token or list
            let mut cur = SyntaxCursor::new(buf, pos);
            loop {
                match cur.prev() {
                    None => return None,
                    Some(c) if c.is_whitespace() => continue,
                    Some(')') => return containing_sexp(buf, cur.pos()),
                    Some(_) => loop {
                        let start = cur.pos();
                        match cur.prev() {
                            None => return Some(cur.pos()),
                            Some(c) if c.is_whitespace() => return Some(start),
                            Some(_) => {}
                        }
                    },
                }
            }
        }
    }
}

/// Descends into the next list: finds the first `(` forward of `pos`
/// (skipping strings and comments as opaque) and returns the position of
/// the first element inside it.
///
/// Returns `None` when a `)` is reached first or the buffer ends.
pub fn down_list(buf: &Buffer, pos: Position) -> Option<Position> {
    let mut p = pos;
    loop {
        p = skip_blanks(buf, p);
        match buf.char_at(p)? {
            ')' => return None,
            '(' => {
                let mut cur = SyntaxCursor::new(buf, p);
                cur.next();
                let inside = skip_blanks(buf, cur.pos());
                return if buf.char_at(inside).is_some() {
                    Some(inside)
                } else {
                    None
                };
            }
            '"' => p = skip_string(buf, p)?,
            _ => {
                let mut cur = SyntaxCursor::new(buf, p);
                cur.next();
                p = cur.pos();
            }
        }
    }
}

/// Moves to the opening delimiter of the innermost list enclosing `pos`.
pub fn backward_up_list(buf: &Buffer, pos: Position) -> Option<Position> {
    containing_sexp(buf, pos)
}
