use crate::buffer::{Buffer, LexState};
use crate::mode::{HeadClass, ModeConfig};
use crate::syntax::navigate::skip_blanks;
use crate::syntax::{
    Position, SyntaxCursor, containing_sexp, down_list, forward_sexp, skip_whitespace,
};

/// Computes the indentation column for a line.
///
/// Walks back to a model line, consults the line's cached lexical state for
/// string/block-comment continuations, then derives the column from the
/// enclosing list and the classification of its head token.
///
/// ```
/// use lisp_synapse_engine::{Buffer, ModeConfig, correct_indentation};
///
/// let buf = Buffer::from_text("(let ((x 1))\nx)");
/// let mode = ModeConfig::default();
/// assert_eq!(correct_indentation(&buf, &mode, 1), 2);
/// ```
pub fn correct_indentation(buf: &Buffer, mode: &ModeConfig, line: usize) -> usize {
    let in_block_comment = buf.lex(line) == LexState::InBlockComment;

    // Model line: nearest non-blank line above. Outside block comments a
    // pure comment line does not qualify.
    let mut model = None;
    let mut i = line;
    while i > 0 {
        i -= 1;
        if buf.is_blank(i) {
            continue;
        }
        if !in_block_comment && buf.line(i).is_some_and(|l| l.trimmed().starts_with(';')) {
            continue;
        }
        model = Some(i);
        break;
    }
    let Some(model) = model else {
        return 0;
    };
    let Some(model_line) = buf.line(model) else {
        return 0;
    };

    // Continuation of a multi-line string follows the model, nudged one
    // column when the model itself opens with a quote.
    if buf.lex(line) == LexState::InString {
        let extra = usize::from(model_line.trimmed().starts_with('"'));
        return buf.indentation_of(model) + extra;
    }

    if model_line.trimmed().is_empty() {
        return 0;
    }
    if model_line.trimmed().starts_with(';') {
        // only reachable inside block comments; propagate the comment column
        return buf.indentation_of(model);
    }

    let anchor = Position::new(line, 0);
    let Some(open) = containing_sexp(buf, anchor) else {
        return 0;
    };

    // `'(` and `'#(` data prefixes: content indents flush after the paren.
    let prev1 = char_before(buf, open, 1);
    let prev2 = char_before(buf, open, 2);
    if prev1 == Some('\'') || (prev1 == Some('#') && prev2 == Some('\'')) {
        return buf.column_at(open) + 1;
    }

    let flush = buf.column_at(open) + 1;
    let Some(first) = down_list(buf, open) else {
        return flush;
    };
    match buf.char_at(first) {
        None | Some(')') => return flush,
        Some('(') => return buf.column_at(first),
        Some(_) => {}
    }

    let (token, tok_end) = symbol_token(buf, first);
    match mode.classify(&token) {
        HeadClass::DoLoop => {
            // Body clauses align under the bindings list once the anchor is
            // past the end-test form; the end-test itself gets one level.
            let one_level = buf.column_at(open) + mode.indent_unit;
            let bindings = skip_blanks(buf, tok_end);
            let Some(bind_end) = forward_sexp(buf, tok_end) else {
                return one_level;
            };
            let Some(test_end) = forward_sexp(buf, bind_end) else {
                return one_level;
            };
            if test_end <= anchor {
                buf.column_at(bindings)
            } else {
                one_level
            }
        }
        HeadClass::Body => buf.column_at(open) + mode.indent_unit,
        HeadClass::Call => {
            let second = skip_whitespace(buf, tok_end);
            if second.line != first.line {
                return flush;
            }
            match buf.char_at(second) {
                None | Some(')') | Some(';') => flush,
                Some(_) => buf.column_at(second),
            }
        }
    }
}

/// Rewrites the leading whitespace of a line to the computed column (as
/// spaces), going through the buffer's edit path so lexical flags stay
/// fresh. Returns the column.
pub fn apply_indentation(buf: &mut Buffer, mode: &ModeConfig, line: usize) -> usize {
    let col = correct_indentation(buf, mode, line);
    let Some(l) = buf.line(line) else {
        return col;
    };
    let current: String = l.text().chars().take_while(|c| c.is_whitespace()).collect();
    let desired = " ".repeat(col);
    if current != desired {
        let start = buf.byte_of_line(line);
        buf.edit(start..start + current.len(), &desired);
    }
    col
}

/// Reindents the non-blank lines in `lines`, top to bottom, so later lines
/// see the corrected columns of earlier ones.
pub fn reindent_range(buf: &mut Buffer, mode: &ModeConfig, lines: std::ops::Range<usize>) {
    let end = lines.end.min(buf.line_count());
    for line in lines.start..end {
        if !buf.is_blank(line) {
            apply_indentation(buf, mode, line);
        }
    }
}

/// Reindents every non-blank line of the buffer.
pub fn reindent_all(buf: &mut Buffer, mode: &ModeConfig) {
    reindent_range(buf, mode, 0..buf.line_count());
}

fn char_before(buf: &Buffer, pos: Position, back: usize) -> Option<char> {
    let offset = pos.offset.checked_sub(back)?;
    buf.char_at(Position::new(pos.line, offset))
}

/// Reads the symbol token starting at `start`: a maximal run of
/// non-whitespace, non-paren characters. Returns the token text and the
/// position just past it.
fn symbol_token(buf: &Buffer, start: Position) -> (String, Position) {
    let mut token = String::new();
    let mut cur = SyntaxCursor::new(buf, start);
    while let Some(c) = cur.peek_next() {
        if c.is_whitespace() || c == '(' || c == ')' {
            break;
        }
        token.push(c);
        cur.next();
    }
    (token, cur.pos())
}
