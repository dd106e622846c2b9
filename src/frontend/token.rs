use super::span::Span;

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Punctuation.
    Dot,
    Equals,
    Semicolon,
    Colon,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // Binary operators.
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Caret,

    // Literals. Numbers keep their source text and are parsed by the parser.
    Identifier(String),
    String(String),
    Number(String),

    // Keywords.
    Var,
    Const,
    Null,
    Function,
    Return,

    EndOfInput,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl Token {
    /// Text carried by the token, if it has any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Token::Identifier(s) | Token::String(s) | Token::Number(s) => Some(s),
            Token::EndOfInput => None,
            other => Some(other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Token::Dot => ".",
            Token::Equals => "=",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Caret => "^",
            Token::Var => "var",
            Token::Const => "const",
            Token::Null => "null",
            Token::Function => "function",
            Token::Return => "return",
            Token::Identifier(_) | Token::String(_) | Token::Number(_) | Token::EndOfInput => "",
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Var | Token::Const | Token::Null | Token::Function | Token::Return
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier `{}`", name),
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Number(n) => write!(f, "number `{}`", n),
            Token::EndOfInput => write!(f, "end of input"),
            t if t.is_keyword() => write!(f, "keyword `{}`", t.symbol()),
            t => write!(f, "`{}`", t.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text() {
        assert_eq!(Token::Identifier("x".to_owned()).value(), Some("x"));
        assert_eq!(Token::Caret.value(), Some("^"));
        assert_eq!(Token::EndOfInput.value(), None);

        assert_eq!(Token::Equals.to_string(), "`=`");
        assert_eq!(Token::Const.to_string(), "keyword `const`");
        assert_eq!(Token::Number("1.5".to_owned()).to_string(), "number `1.5`");
    }
}
