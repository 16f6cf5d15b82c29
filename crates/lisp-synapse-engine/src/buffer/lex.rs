/// Lexical state carried over a line boundary.
///
/// Each line caches the state in effect at its first character. The flags are
/// recomputed by [`relex`](crate::buffer::Buffer::relex_from) after every
/// edit and consumed read-only by the scanning and indentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    /// Ordinary code.
    #[default]
    None,
    /// Inside a double-quoted string that opened on an earlier line.
    InString,
    /// Inside a `#| … |#` block comment.
    InBlockComment,
}

/// Scans one line of text and returns the state in effect at the start of
/// the next line.
///
/// A `;` line comment swallows the rest of the line without affecting the
/// carried state. A backslash always escapes the following character, both
/// inside strings and outside them (`#\"` and `#\(` character literals).
/// Block comments do not nest.
pub(crate) fn scan_line(text: &str, start: LexState) -> LexState {
    let mut state = start;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            LexState::InString => match c {
                '\\' => {
                    chars.next();
                }
                '"' => state = LexState::None,
                _ => {}
            },
            LexState::InBlockComment => {
                if c == '|' && chars.peek() == Some(&'#') {
                    chars.next();
                    state = LexState::None;
                }
            }
            LexState::None => match c {
                '\\' => {
                    chars.next();
                }
                '"' => state = LexState::InString,
                ';' => return state,
                '#' if chars.peek() == Some(&'|') => {
                    chars.next();
                    state = LexState::InBlockComment;
                }
                _ => {}
            },
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_code_stays_none() {
        assert_eq!(scan_line("(foo bar)", LexState::None), LexState::None);
    }

    #[test]
    fn unterminated_string_carries_over() {
        assert_eq!(scan_line("(x \"abc", LexState::None), LexState::InString);
    }

    #[test]
    fn string_closed_on_same_line() {
        assert_eq!(scan_line("(x \"abc\")", LexState::None), LexState::None);
    }

    #[test]
    fn escaped_quote_does_not_close() {
        assert_eq!(scan_line("\"a\\\"", LexState::None), LexState::InString);
    }

    #[test]
    fn string_closes_from_carried_state() {
        assert_eq!(scan_line("tail\" more", LexState::InString), LexState::None);
    }

    #[test]
    fn line_comment_hides_string_opener() {
        assert_eq!(scan_line("(a) ; \"not open", LexState::None), LexState::None);
    }

    #[test]
    fn block_comment_opens_and_carries() {
        assert_eq!(scan_line("a #| b", LexState::None), LexState::InBlockComment);
    }

    #[test]
    fn block_comment_closes() {
        assert_eq!(
            scan_line("still |# code", LexState::InBlockComment),
            LexState::None
        );
    }

    #[test]
    fn semicolon_inside_block_comment_is_inert() {
        assert_eq!(
            scan_line("; not a comment #|", LexState::InBlockComment),
            LexState::InBlockComment
        );
    }

    #[test]
    fn char_literal_quote_is_escaped() {
        // #\" is a character literal, not a string opener
        assert_eq!(scan_line("(c #\\\" d)", LexState::None), LexState::None);
    }
}
