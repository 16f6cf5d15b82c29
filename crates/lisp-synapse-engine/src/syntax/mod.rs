pub mod cursor;
pub mod matcher;
pub mod navigate;
pub mod position;
pub mod skip;

pub use cursor::SyntaxCursor;
pub use matcher::{containing_sexp, matching_delimiter};
pub use navigate::{backward_sexp, backward_up_list, down_list, forward_sexp};
pub use position::Position;
pub use skip::{skip_line_comment, skip_string, skip_whitespace};
