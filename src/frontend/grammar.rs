use rust_decimal::Decimal;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

/// Output of the parser: the ordered top-level statements.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Program(Program),
    VariableDecl(VariableDecl),
    FuncDecl(Rc<FuncInfo>),
    Expression(Expr),
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub initializer: Option<Expr>,
    pub is_constant: bool,
}

/// Declaration of a user function. Shared with the function values created
/// from it, so the body is never copied.
#[derive(Debug, PartialEq, Clone)]
pub struct FuncInfo {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Assignment(Box<Expr>, Box<Expr>),
    Binary(BinaryOperator, Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Member(Box<Expr>, Accessor),
    Identifier(String),
    Literal(Literal),
    Object(Vec<Property>),
}

/// Property part of a member expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Accessor {
    /// `object.name`
    Named(String),
    /// `object[expr]`
    Computed(Box<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(Decimal),
    Str(String),
    Null,
}

/// Object literal entry. A missing value is shorthand for the variable with
/// the same name as the key.
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: String,
    pub value: Option<Expr>,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
        }
    }
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    pub fn ast_string(&self) -> String {
        let stmts: Vec<_> = self.body.iter().map(|s| s.ast_string()).collect();
        stmts.join("\n")
    }
}

impl Stmt {
    /// Name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Program(_) => "Program",
            Stmt::VariableDecl(_) => "VariableDeclaration",
            Stmt::FuncDecl(_) => "FunctionDeclaration",
            Stmt::Expression(expr) => expr.kind_name(),
        }
    }

    pub fn ast_string(&self) -> String {
        match self {
            Stmt::Program(program) => {
                sexpr("program", program.body.iter().map(Stmt::ast_string))
            }
            Stmt::VariableDecl(decl) => {
                let keyword = if decl.is_constant { "const" } else { "var" };
                match &decl.initializer {
                    Some(init) => format!("({} {} {})", keyword, decl.name, init.ast_string()),
                    None => format!("({} {})", keyword, decl.name),
                }
            }
            Stmt::FuncDecl(info) => {
                let head = format!("function {} ({})", info.name, info.params.join(" "));
                sexpr(&head, info.body.iter().map(Stmt::ast_string))
            }
            Stmt::Expression(expr) => expr.ast_string(),
        }
    }
}

impl Expr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Assignment(..) => "Assignment",
            Expr::Binary(..) => "BinaryExpression",
            Expr::Call(..) => "CallExpression",
            Expr::Member(..) => "MemberExpression",
            Expr::Identifier(_) => "Identifier",
            Expr::Literal(Literal::Number(_)) => "NumberLiteral",
            Expr::Literal(Literal::Str(_)) => "StringLiteral",
            Expr::Literal(Literal::Null) => "NullLiteral",
            Expr::Object(_) => "ObjectLiteral",
        }
    }

    pub fn ast_string(&self) -> String {
        match self {
            Expr::Literal(l) => match l {
                Literal::Number(n) => n.to_string(),
                Literal::Str(s) => format!("\"{}\"", s),
                Literal::Null => "null".to_owned(),
            },
            Expr::Binary(op, lhs, rhs) => format!(
                "({} {} {})",
                op.symbol(),
                lhs.ast_string(),
                rhs.ast_string()
            ),
            Expr::Identifier(name) => name.clone(),
            Expr::Assignment(target, value) => {
                format!("(= {} {})", target.ast_string(), value.ast_string())
            }
            Expr::Call(callee, args) => sexpr(
                "call",
                std::iter::once(callee.ast_string()).chain(args.iter().map(Expr::ast_string)),
            ),
            Expr::Member(object, Accessor::Named(name)) => {
                format!("(. {} {})", object.ast_string(), name)
            }
            Expr::Member(object, Accessor::Computed(property)) => {
                format!("([] {} {})", object.ast_string(), property.ast_string())
            }
            Expr::Object(properties) => sexpr(
                "object",
                properties.iter().map(|p| match &p.value {
                    Some(value) => format!("({} {})", p.key, value.ast_string()),
                    None => p.key.clone(),
                }),
            ),
        }
    }
}

/// Formats `(head part1 part2 ...)`.
fn sexpr(head: &str, parts: impl IntoIterator<Item = String>) -> String {
    let mut out = format!("({}", head);
    for part in parts {
        out.push(' ');
        out.push_str(&part);
    }
    out.push(')');
    out
}
