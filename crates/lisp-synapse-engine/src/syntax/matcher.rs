use crate::buffer::Buffer;
use crate::syntax::{Position, SyntaxCursor};

/// Finds the innermost unmatched `(` enclosing `start`, scanning backward
/// character by character.
///
/// An open paren in column 0 met while unmatched closes remain is taken as
/// the start of a top-level form: the scan stops and reports `None` rather
/// than walking the whole buffer. Reaching the start of the buffer also
/// reports `None`; both mean "no enclosing expression".
///
/// Known limitation: the backward scan does not treat strings or comments as
/// opaque, so a paren inside a string literal before `start` corrupts the
/// count. See the tests pinning that behavior.
pub fn containing_sexp(buf: &Buffer, start: Position) -> Option<Position> {
    let mut cur = SyntaxCursor::new(buf, start);
    let mut unmatched_close = 0usize;
    loop {
        match cur.prev() {
            None => return None,
            Some(')') => unmatched_close += 1,
            Some('(') => {
                if unmatched_close == 0 {
                    return Some(cur.pos());
                }
                if cur.pos().offset == 0 {
                    // top-level form boundary
                    return None;
                }
                unmatched_close -= 1;
            }
            Some(_) => {}
        }
    }
}

/// Finds the delimiter matching the one at `pos`, for bracket highlighting.
///
/// Runs the same raw counting scan as [`containing_sexp`], forward from a
/// `(` or backward from a `)`. Returns `None` when `pos` does not hold a
/// delimiter or the buffer ends before the count balances.
pub fn matching_delimiter(buf: &Buffer, pos: Position) -> Option<Position> {
    match buf.char_at(pos)? {
        '(' => {
            let mut cur = SyntaxCursor::new(buf, pos);
            let mut depth = 0usize;
            loop {
                let at = cur.pos();
                match cur.next() {
                    None => return None,
                    Some('(') => depth += 1,
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(at);
                        }
                    }
                    Some(_) => {}
                }
            }
        }
        ')' => {
            let mut cur = SyntaxCursor::new(buf, pos);
            cur.next();
            let mut depth = 0usize;
            loop {
                match cur.prev() {
                    None => return None,
                    Some(')') => depth += 1,
                    Some('(') => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(cur.pos());
                        }
                    }
                    Some(_) => {}
                }
            }
        }
        _ => None,
    }
}
