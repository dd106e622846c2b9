use super::errors::{Item, ParserError, ParserErrorType, ParserResult};
use super::grammar::{Accessor, BinaryOperator, Expr, FuncInfo, Literal, Program, Property};
use super::grammar::{Stmt, VariableDecl};
use super::parser_utils::Precedence;
use super::span::{CodePosition, Span};
use super::token::{SpannedToken, Token};

use rust_decimal::Decimal;
use std::rc::Rc;

/// Parses a token sequence into a program, stopping at the first error.
pub fn parse(tokens: Vec<SpannedToken>) -> ParserResult<Program> {
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: std::vec::IntoIter<SpannedToken>,
    current: SpannedToken,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next().unwrap_or_else(|| SpannedToken {
            token: Token::EndOfInput,
            span: Span::at(CodePosition::new(0, 1, 1)),
        });

        Parser { tokens, current }
    }

    /// Advances the stream. Past the last token the stream keeps yielding
    /// end-of-input, even when the caller's tokens lack a terminator.
    fn bump(&mut self) {
        let next = self.tokens.next().unwrap_or_else(|| SpannedToken {
            token: Token::EndOfInput,
            span: Span::at(self.current.span.end_pos),
        });
        self.current = next;
    }

    /// Checks whether or not the current token matches the given token.
    fn check(&self, t: &Token) -> bool {
        &self.current.token == t
    }

    /// Checks whether or not the current token matches the given token.
    /// If true consume it and return true, else return false.
    fn check_consume(&mut self, t: &Token) -> bool {
        if self.check(t) {
            self.bump();
            return true;
        }
        false
    }

    fn expect(&mut self, expected: Token) {
        debug_assert_eq!(self.current.token, expected);
        self.bump();
    }

    /// Consumes `expected`, which must follow `item`.
    fn consume(&mut self, expected: Token, item: Item) -> ParserResult<()> {
        if self.check_consume(&expected) {
            return Ok(());
        }
        let got = self.current.token.clone();
        Err(self.error_here(ParserErrorType::ExpectedAfter {
            expected,
            item,
            got,
        }))
    }

    /// Consumes `expected`, which must close `item`.
    fn consume_closing(&mut self, expected: Token, item: Item) -> ParserResult<()> {
        if self.check_consume(&expected) {
            return Ok(());
        }
        let got = self.current.token.clone();
        Err(self.error_here(ParserErrorType::ExpectedClosing {
            expected,
            item,
            got,
        }))
    }

    fn error_here(&self, error: ParserErrorType) -> ParserError {
        ParserError {
            span: self.current.span,
            error,
        }
    }

    /// Parses the whole token stream as a sequence of statements.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse(mut self) -> ParserResult<Program> {
        let mut body = vec![];

        while !self.check(&Token::EndOfInput) {
            body.push(self.parse_statement()?);
        }

        tracing::debug!(statements = body.len(), "parsed program");
        Ok(Program::new(body))
    }

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        match self.current.token {
            Token::Var | Token::Const => self.parse_variable_decl(),
            Token::Function => self.parse_func_decl(),
            Token::Return => Err(self.error_here(ParserErrorType::ReservedReturn)),
            _ => Ok(Stmt::Expression(self.parse_expression()?)),
        }
    }

    /// `var name`, `var name = expr` or `const name = expr`, each optionally
    /// followed by `;`.
    fn parse_variable_decl(&mut self) -> ParserResult<Stmt> {
        let is_constant = self.check(&Token::Const);
        self.bump();

        let name_span = self.current.span;
        let name = self.parse_identifier(Item::VariableName)?;

        let initializer = if self.check_consume(&Token::Equals) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.check_consume(&Token::Semicolon);

        if is_constant && initializer.is_none() {
            return Err(ParserError {
                span: name_span,
                error: ParserErrorType::ConstWithoutInitializer(name),
            });
        }

        Ok(Stmt::VariableDecl(VariableDecl {
            name,
            initializer,
            is_constant,
        }))
    }

    fn parse_func_decl(&mut self) -> ParserResult<Stmt> {
        self.expect(Token::Function);
        let name = self.parse_identifier(Item::FunctionName)?;

        self.consume(Token::LeftParen, Item::FunctionName)?;
        let params = self.parse_comma_sep(|this| {
            let span = this.current.span;
            match this.parse_expression()? {
                Expr::Identifier(param) => Ok(param),
                other => Err(ParserError {
                    span,
                    error: ParserErrorType::InvalidParameter(other.kind_name()),
                }),
            }
        })?;

        self.consume(Token::LeftBrace, Item::FunctionParams)?;
        let mut body = vec![];
        while !self.check(&Token::RightBrace) && !self.check(&Token::EndOfInput) {
            body.push(self.parse_statement()?);
        }
        self.consume_closing(Token::RightBrace, Item::FunctionBody)?;

        Ok(Stmt::FuncDecl(Rc::new(FuncInfo { name, params, body })))
    }

    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        self.parse_assignment()
    }

    /// Right associative: `a = b = c` assigns `c` to `b`, then to `a`.
    fn parse_assignment(&mut self) -> ParserResult<Expr> {
        let target_span = self.current.span;
        let target = self.parse_object_or_additive()?;

        if !self.check_consume(&Token::Equals) {
            return Ok(target);
        }

        let value = self.parse_assignment()?;
        match target {
            Expr::Identifier(_) | Expr::Member(..) => {
                Ok(Expr::Assignment(Box::new(target), Box::new(value)))
            }
            other => Err(ParserError {
                span: target_span,
                error: ParserErrorType::InvalidAssignmentTarget(other.kind_name()),
            }),
        }
    }

    fn parse_object_or_additive(&mut self) -> ParserResult<Expr> {
        if self.check(&Token::LeftBrace) {
            self.parse_object_literal()
        } else {
            self.parse_binary(Precedence::Lowest)
        }
    }

    /// `{ key: expr, shorthand, ... }`. The last property may omit the comma.
    fn parse_object_literal(&mut self) -> ParserResult<Expr> {
        self.expect(Token::LeftBrace);
        let mut properties = vec![];

        while !self.check(&Token::EndOfInput) && !self.check(&Token::RightBrace) {
            let key = self.parse_identifier(Item::ObjectKey)?;

            if self.check_consume(&Token::Comma) || self.check(&Token::RightBrace) {
                properties.push(Property { key, value: None });
                continue;
            }

            self.consume(Token::Colon, Item::ObjectKey)?;
            let value = self.parse_expression()?;
            properties.push(Property {
                key,
                value: Some(value),
            });

            if !self.check(&Token::RightBrace) {
                self.consume(Token::Comma, Item::ObjectProperty)?;
            }
        }

        self.consume_closing(Token::RightBrace, Item::ObjectLiteral)?;
        Ok(Expr::Object(properties))
    }

    /// Precedence climbing over the binary operators.
    fn parse_binary(&mut self, min_precedence: Precedence) -> ParserResult<Expr> {
        let mut lhs = self.parse_call_member()?;

        while let Some(op) = BinaryOperator::from_token(&self.current.token) {
            if !op.is_higher_precedence(min_precedence) {
                break;
            }

            self.bump();
            let rhs = self.parse_binary(op.precedence())?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    fn parse_call_member(&mut self) -> ParserResult<Expr> {
        let mut expr = self.parse_member()?;

        while self.check_consume(&Token::LeftParen) {
            let args = self.parse_comma_sep(Self::parse_expression)?;
            expr = Expr::Call(Box::new(expr), args);
        }

        Ok(expr)
    }

    fn parse_member(&mut self) -> ParserResult<Expr> {
        let mut object = self.parse_primary()?;

        loop {
            let accessor = if self.check_consume(&Token::Dot) {
                let name = match &self.current.token {
                    Token::Identifier(name) => name.clone(),
                    got => {
                        let error = ParserErrorType::ExpectedPropertyName(got.clone());
                        return Err(self.error_here(error));
                    }
                };
                self.bump();
                Accessor::Named(name)
            } else if self.check_consume(&Token::LeftBracket) {
                let property = self.parse_expression()?;
                self.consume_closing(Token::RightBracket, Item::ComputedMember)?;
                Accessor::Computed(Box::new(property))
            } else {
                break;
            };

            object = Expr::Member(Box::new(object), accessor);
        }

        Ok(object)
    }

    fn parse_primary(&mut self) -> ParserResult<Expr> {
        let expr = match self.current.token.clone() {
            Token::Identifier(name) => Expr::Identifier(name),
            Token::Null => Expr::Literal(Literal::Null),
            Token::String(s) => Expr::Literal(Literal::Str(s)),
            Token::Number(text) => match text.parse::<Decimal>() {
                Ok(n) => Expr::Literal(Literal::Number(n)),
                Err(_) => return Err(self.error_here(ParserErrorType::InvalidNumber(text))),
            },
            Token::LeftParen => {
                self.bump();
                let sub_expr = self.parse_expression()?;
                self.consume_closing(Token::RightParen, Item::Expression)?;
                return Ok(sub_expr);
            }
            // A stray separator in expression position is skipped.
            Token::Semicolon => {
                self.bump();
                return self.parse_primary();
            }
            got => return Err(self.error_here(ParserErrorType::ExpectedExpr(got))),
        };

        self.bump();
        Ok(expr)
    }

    fn parse_identifier(&mut self, item: Item) -> ParserResult<String> {
        match &self.current.token {
            Token::Identifier(name) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            got => {
                let error = ParserErrorType::ExpectedIdentifier(item, got.clone());
                Err(self.error_here(error))
            }
        }
    }

    /// Parses a comma separated list up to and including the closing `)`.
    /// The opening `(` must already be consumed.
    fn parse_comma_sep<T, F>(&mut self, parser: F) -> ParserResult<Vec<T>>
    where
        F: Fn(&mut Parser) -> ParserResult<T>,
    {
        let mut args = vec![];
        if self.check_consume(&Token::RightParen) {
            return Ok(args);
        }

        args.push(parser(self)?);
        while self.check_consume(&Token::Comma) {
            args.push(parser(self)?);
        }

        self.consume_closing(Token::RightParen, Item::Arguments)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> ParserResult<Program> {
        parse(tokenize(source).unwrap())
    }

    fn ast(source: &str) -> String {
        parse_source(source).unwrap().ast_string()
    }

    fn error(source: &str) -> ParserErrorType {
        parse_source(source).unwrap_err().error
    }

    fn num(n: i64) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Number(Decimal::from(n))))
    }

    #[test]
    fn test_variable_declaration_tree() {
        let program = parse_source("var x = 1 + 2;").unwrap();
        assert_eq!(
            program,
            Program::new(vec![Stmt::VariableDecl(VariableDecl {
                name: "x".to_owned(),
                initializer: Some(Expr::Binary(BinaryOperator::Add, num(1), num(2))),
                is_constant: false,
            })])
        );
    }

    #[test]
    fn test_declarations() {
        assert_eq!(ast("var x"), "(var x)");
        assert_eq!(ast("var x; x"), "(var x)\nx");
        assert_eq!(ast("const y = \"s\""), "(const y \"s\")");
        assert_eq!(ast("var a = null var b = a"), "(var a null)\n(var b a)");
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(ast("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(ast("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(ast("2 ^ 3 * 4"), "(* (^ 2 3) 4)");
        assert_eq!(ast("2 * 3 ^ 2"), "(^ (* 2 3) 2)");
        assert_eq!(ast("(1 + 2) % 3"), "(% (+ 1 2) 3)");
        assert_eq!(ast("10 / 4 - 1.5"), "(- (/ 10 4) 1.5)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(ast("a = b = 3"), "(= a (= b 3))");
        assert_eq!(ast("o.a = 2"), "(= (. o a) 2)");
        assert_eq!(ast("o[k] = { }"), "(= ([] o k) (object))");
    }

    #[test]
    fn test_members_and_calls() {
        assert_eq!(ast("a.b.c"), "(. (. a b) c)");
        assert_eq!(ast("a[\"b\"].c"), "(. ([] a \"b\") c)");
        assert_eq!(ast("f()()"), "(call (call f))");
        assert_eq!(ast("o.f(1, x + 1)"), "(call (. o f) 1 (+ x 1))");
        assert_eq!(ast("print({ a: 1 })"), "(call print (object (a 1)))");
    }

    #[test]
    fn test_object_literals() {
        assert_eq!(ast("{ a: 1, b }"), "(object (a 1) b)");
        assert_eq!(ast("{ a, b: 2, }"), "(object a (b 2))");
        assert_eq!(ast("{ a: { b: 1 } }"), "(object (a (object (b 1))))");
        assert_eq!(
            error("{ a: 1 b: 2 }"),
            ParserErrorType::ExpectedAfter {
                expected: Token::Comma,
                item: Item::ObjectProperty,
                got: Token::Identifier("b".to_owned()),
            }
        );
        assert_eq!(
            error("{ a: 1,"),
            ParserErrorType::ExpectedClosing {
                expected: Token::RightBrace,
                item: Item::ObjectLiteral,
                got: Token::EndOfInput,
            }
        );
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(
            ast("function add(a, b) { a + b }"),
            "(function add (a b) (+ a b))"
        );
        assert_eq!(ast("function nop() {}"), "(function nop ())");
        assert_eq!(
            ast("function outer() { var x = 1 function inner() { x } inner }"),
            "(function outer () (var x 1) (function inner () x) inner)"
        );
    }

    #[test]
    fn test_function_parameters_must_be_identifiers() {
        assert_eq!(
            error("function f(a, 1) {}"),
            ParserErrorType::InvalidParameter("NumberLiteral")
        );
        assert_eq!(
            error("function f(a.b) {}"),
            ParserErrorType::InvalidParameter("MemberExpression")
        );
    }

    #[test]
    fn test_declaration_errors() {
        assert_eq!(
            error("var const x;"),
            ParserErrorType::ExpectedIdentifier(Item::VariableName, Token::Const)
        );
        assert_eq!(
            error("const x;"),
            ParserErrorType::ConstWithoutInitializer("x".to_owned())
        );
        assert_eq!(
            error("function (a) {}"),
            ParserErrorType::ExpectedIdentifier(Item::FunctionName, Token::LeftParen)
        );
        assert_eq!(
            error("function f(a) a"),
            ParserErrorType::ExpectedAfter {
                expected: Token::LeftBrace,
                item: Item::FunctionParams,
                got: Token::Identifier("a".to_owned()),
            }
        );
    }

    #[test]
    fn test_expression_errors() {
        assert_eq!(error("1 +"), ParserErrorType::ExpectedExpr(Token::EndOfInput));
        assert_eq!(error("1.2.3"), ParserErrorType::InvalidNumber("1.2.3".to_owned()));
        assert_eq!(
            error("1 = 2"),
            ParserErrorType::InvalidAssignmentTarget("NumberLiteral")
        );
        assert_eq!(
            error("o.1"),
            ParserErrorType::ExpectedPropertyName(Token::Number("1".to_owned()))
        );
        assert_eq!(
            error("(1 + 2"),
            ParserErrorType::ExpectedClosing {
                expected: Token::RightParen,
                item: Item::Expression,
                got: Token::EndOfInput,
            }
        );
        assert_eq!(
            error("f(1 2)"),
            ParserErrorType::ExpectedClosing {
                expected: Token::RightParen,
                item: Item::Arguments,
                got: Token::Number("2".to_owned()),
            }
        );
        assert_eq!(error("return 1"), ParserErrorType::ReservedReturn);
    }

    #[test]
    fn test_error_span_points_at_offending_token() {
        let err = parse_source("var x = 1\nvar = 2").unwrap_err();
        assert_eq!(err.span.start_pos, CodePosition::new(14, 2, 5));
        assert_eq!(
            err.to_string(),
            "Expected identifier for variable name, but got `=` at 2:5."
        );
    }

    fn spanned(tokens: Vec<Token>) -> Vec<SpannedToken> {
        let span = Span::at(CodePosition::new(0, 1, 1));
        tokens
            .into_iter()
            .map(|token| SpannedToken { token, span })
            .collect()
    }

    #[test]
    fn test_semicolon_tokens_from_callers() {
        let tokens = spanned(vec![
            Token::Var,
            Token::Identifier("x".to_owned()),
            Token::Semicolon,
            Token::Identifier("x".to_owned()),
            Token::Equals,
            Token::Semicolon,
            Token::Number("4".to_owned()),
        ]);
        assert_eq!(parse(tokens).unwrap().ast_string(), "(var x)\n(= x 4)");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(vec![]).unwrap(), Program::default());
        assert_eq!(parse_source("  ;; ").unwrap(), Program::default());
    }
}
