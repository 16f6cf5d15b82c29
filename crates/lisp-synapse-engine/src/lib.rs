pub mod buffer;
pub mod indent;
pub mod mode;
pub mod syntax;

// Re-export key types for easier usage
pub use buffer::{Buffer, LexState, Line};
pub use indent::{apply_indentation, correct_indentation, reindent_all, reindent_range};
pub use mode::{HeadClass, ModeConfig};
pub use syntax::{
    Position, SyntaxCursor, backward_sexp, backward_up_list, containing_sexp, down_list,
    forward_sexp, matching_delimiter, skip_line_comment, skip_string, skip_whitespace,
};
