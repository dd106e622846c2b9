pub mod cursor;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod parser_utils;
pub mod preprocess;
pub mod span;
pub mod token;

pub use errors::{ParserError, TokenizerError};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, Parser};
pub use preprocess::strip_comments;
