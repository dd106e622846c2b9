use super::cursor::Cursor;
use super::errors::{EscapeFound, TokenizerError, TokenizerResult};
use super::span::{CodePosition, Span};
use super::token::{SpannedToken, Token};

/// Converts source text into tokens. The returned sequence always ends with a
/// single `Token::EndOfInput`.
#[tracing::instrument(level = "trace", skip_all)]
pub fn tokenize(source: &str) -> TokenizerResult<Vec<SpannedToken>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let at_end = token.token == Token::EndOfInput;
        tokens.push(token);
        if at_end {
            break;
        }
    }

    tracing::debug!(tokens = tokens.len(), "tokenized source");
    Ok(tokens)
}

pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token. Whitespace and `;` are skipped.
    pub fn next_token(&mut self) -> TokenizerResult<SpannedToken> {
        self.cursor.take_while(is_skipped_char);

        let start_pos = self.cursor.get_position();
        let token = self.lex_token()?;
        let end_pos = self.cursor.get_position();

        Ok(SpannedToken {
            token,
            span: Span::new(start_pos, end_pos),
        })
    }

    fn lex_token(&mut self) -> TokenizerResult<Token> {
        let position = self.cursor.get_position();
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Ok(Token::EndOfInput),
        };

        let token = match ch {
            // Binary operators.
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Caret,

            // Punctuation.
            '=' => Token::Equals,
            ':' => Token::Colon,
            '.' => Token::Dot,
            ',' => Token::Comma,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,

            // String literals.
            '"' => self.lex_string(position)?,

            // Numbers.
            _ if ch.is_ascii_digit() => self.lex_number(byte_idx),

            // Identifiers.
            _ if ch.is_ascii_alphabetic() => self.lex_identifier_or_kw(byte_idx),

            _ => {
                return Err(TokenizerError::UnknownCharacter {
                    character: ch,
                    position,
                })
            }
        };

        Ok(token)
    }

    /// Scans up to the closing '"', resolving escapes. The opening quote at
    /// `start` has already been consumed.
    fn lex_string(&mut self, start: CodePosition) -> TokenizerResult<Token> {
        let mut text = String::new();

        loop {
            match self.cursor.take() {
                None => return Err(TokenizerError::UnterminatedString { position: start }),
                Some((_, '"')) => return Ok(Token::String(text)),
                Some((_, '\\')) => {
                    let position = self.cursor.get_position();
                    let found = match self.cursor.take() {
                        Some((_, ch)) => ch,
                        None => {
                            return Err(TokenizerError::InvalidEscape {
                                found: EscapeFound::EndOfInput,
                                position,
                            })
                        }
                    };
                    match unescape(found) {
                        Some(ch) => text.push(ch),
                        None => {
                            return Err(TokenizerError::InvalidEscape {
                                found: EscapeFound::Char(found),
                                position,
                            })
                        }
                    }
                }
                Some((_, ch)) => text.push(ch),
            }
        }
    }

    /// Scans digits and dots. The text is validated as a decimal by the parser,
    /// so `1.2.3` is still a single token here.
    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(|ch| ch.is_ascii_digit() || ch == '.');

        let end_idx = self.cursor.next_byte_idx();
        Token::Number(self.source[start_idx..end_idx].to_owned())
    }

    /// Scan up to end of lexemme and return it as identifier. Checks for keywords.
    fn lex_identifier_or_kw(&mut self, start_idx: usize) -> Token {
        self.cursor
            .take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');

        let end_idx = self.cursor.next_byte_idx();

        match &self.source[start_idx..end_idx] {
            "var" => Token::Var,
            "const" => Token::Const,
            "null" => Token::Null,
            "function" => Token::Function,
            "return" => Token::Return,
            other => Token::Identifier(other.to_owned()),
        }
    }
}

fn is_skipped_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | ';')
}

fn unescape(ch: char) -> Option<char> {
    let escaped = match ch {
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        'n' => '\n',
        'b' => '\u{8}',
        'v' => '\u{b}',
        'f' => '\u{c}',
        'a' => '\u{7}',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        _ => return None,
    };
    Some(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_owned())
    }

    fn number(text: &str) -> Token {
        Token::Number(text.to_owned())
    }

    #[test]
    fn test_variable_declaration() {
        assert_eq!(
            kinds("var x = 1 + 2;"),
            vec![
                Token::Var,
                ident("x"),
                Token::Equals,
                number("1"),
                Token::Plus,
                number("2"),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            kinds("a.b[c]({ k: v, }) - * / % ^"),
            vec![
                ident("a"),
                Token::Dot,
                ident("b"),
                Token::LeftBracket,
                ident("c"),
                Token::RightBracket,
                Token::LeftParen,
                Token::LeftBrace,
                ident("k"),
                Token::Colon,
                ident("v"),
                Token::Comma,
                Token::RightBrace,
                Token::RightParen,
                Token::Minus,
                Token::Asterisk,
                Token::Slash,
                Token::Percent,
                Token::Caret,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("var const null function return variable true"),
            vec![
                Token::Var,
                Token::Const,
                Token::Null,
                Token::Function,
                Token::Return,
                ident("variable"),
                ident("true"),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_whitespace_and_semicolons_are_dropped() {
        assert_eq!(kinds(" \t\r\n;;"), vec![Token::EndOfInput]);
        assert_eq!(kinds(""), vec![Token::EndOfInput]);
        assert_eq!(kinds("a;b"), vec![ident("a"), ident("b"), Token::EndOfInput]);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            kinds("snake_case x1"),
            vec![ident("snake_case"), ident("x1"), Token::EndOfInput]
        );
    }

    #[test]
    fn test_numbers_keep_embedded_dots() {
        assert_eq!(
            kinds("3.14 1.2.3 42"),
            vec![number("3.14"), number("1.2.3"), number("42"), Token::EndOfInput]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\tb\n\"q\" \\ \' \0""#),
            vec![
                Token::String("a\tb\n\"q\" \\ ' \0".to_owned()),
                Token::EndOfInput
            ]
        );
        assert_eq!(
            kinds(r#""\b\v\f\a\r""#),
            vec![
                Token::String("\u{8}\u{b}\u{c}\u{7}\r".to_owned()),
                Token::EndOfInput
            ]
        );
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(
            tokenize(r#""bad \q""#),
            Err(TokenizerError::InvalidEscape {
                found: EscapeFound::Char('q'),
                position: CodePosition::new(6, 1, 7),
            })
        );
        assert!(matches!(
            tokenize("\"dangling \\"),
            Err(TokenizerError::InvalidEscape {
                found: EscapeFound::EndOfInput,
                ..
            })
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize("x = \"open"),
            Err(TokenizerError::UnterminatedString {
                position: CodePosition::new(4, 1, 5),
            })
        );
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            tokenize("var x = 1\nx @ 2"),
            Err(TokenizerError::UnknownCharacter {
                character: '@',
                position: CodePosition::new(12, 2, 3),
            })
        );
        assert!(tokenize("_hidden").is_err());
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("var name\n  = 10").unwrap();
        let spans: Vec<_> = tokens
            .iter()
            .map(|t| (t.span.start_pos.line_no, t.span.start_pos.column_no))
            .collect();
        assert_eq!(spans, vec![(1, 1), (1, 5), (2, 3), (2, 5), (2, 7)]);
        assert_eq!(tokens[1].span.extract_string("var name\n  = 10"), Some("name"));
    }
}
