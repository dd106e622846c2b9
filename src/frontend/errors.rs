use super::span::{CodePosition, Span};
use super::token::Token;

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TokenizerError {
    #[error("Unknown character '{character}' at {position}.")]
    UnknownCharacter {
        character: char,
        position: CodePosition,
    },
    #[error("Expected escape character at {position}, but got {found}.")]
    InvalidEscape {
        found: EscapeFound,
        position: CodePosition,
    },
    #[error("Unterminated string literal starting at {position}.")]
    UnterminatedString { position: CodePosition },
}

/// What followed a backslash inside a string literal.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EscapeFound {
    Char(char),
    EndOfInput,
}

impl fmt::Display for EscapeFound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EscapeFound::Char(ch) => write!(f, "'{}'", ch.escape_default()),
            EscapeFound::EndOfInput => write!(f, "end of input"),
        }
    }
}

pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// Syntactic construct a parser error refers to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Item {
    VariableName,
    FunctionName,
    FunctionParams,
    FunctionBody,
    Arguments,
    ObjectKey,
    ObjectProperty,
    ObjectLiteral,
    ComputedMember,
    Expression,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Item::VariableName => "variable name",
            Item::FunctionName => "function name",
            Item::FunctionParams => "function parameters",
            Item::FunctionBody => "function body",
            Item::Arguments => "arguments",
            Item::ObjectKey => "object literal key",
            Item::ObjectProperty => "object literal property",
            Item::ObjectLiteral => "object literal",
            Item::ComputedMember => "computed member",
            Item::Expression => "expression",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParserErrorType {
    #[error("Expected {expected} after {item}, but got {got}")]
    ExpectedAfter {
        expected: Token,
        item: Item,
        got: Token,
    },
    #[error("Expected {expected} to close {item}, but got {got}")]
    ExpectedClosing {
        expected: Token,
        item: Item,
        got: Token,
    },
    #[error("Expected expression, but got {0}")]
    ExpectedExpr(Token),
    #[error("Expected identifier for {0}, but got {1}")]
    ExpectedIdentifier(Item, Token),
    #[error("Expected property name after `.`, but got {0}")]
    ExpectedPropertyName(Token),
    #[error("Constant `{0}` must be assigned a value")]
    ConstWithoutInitializer(String),
    #[error("Invalid number literal `{0}`")]
    InvalidNumber(String),
    #[error("Function parameters must be identifiers, but got {0}")]
    InvalidParameter(&'static str),
    #[error("Cannot assign to {0}")]
    InvalidAssignmentTarget(&'static str),
    #[error("`return` is reserved and not supported")]
    ReservedReturn,
}

#[derive(Debug, Error, PartialEq, Clone)]
#[error("{error} at {span}.")]
pub struct ParserError {
    pub span: Span,
    pub error: ParserErrorType,
}

pub type ParserResult<T> = Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let position = CodePosition::new(4, 1, 5);
        let error = TokenizerError::UnknownCharacter {
            character: '@',
            position,
        };
        assert_eq!(error.to_string(), "Unknown character '@' at 1:5.");

        let error = TokenizerError::InvalidEscape {
            found: EscapeFound::Char('q'),
            position,
        };
        assert_eq!(
            error.to_string(),
            "Expected escape character at 1:5, but got 'q'."
        );

        let error = ParserError {
            span: Span::at(position),
            error: ParserErrorType::ExpectedAfter {
                expected: Token::Equals,
                item: Item::VariableName,
                got: Token::EndOfInput,
            },
        };
        assert_eq!(
            error.to_string(),
            "Expected `=` after variable name, but got end of input at 1:5."
        );
    }
}
