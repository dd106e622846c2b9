use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RuntimeError {
    #[error("Cannot find undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("Cannot declare already defined variable '{0}'.")]
    Redeclaration(String),
    #[error("Cannot assign to constant variable '{0}'.")]
    ConstantAssignment(String),
    #[error("Left side of a member expression must be an object, but got {0}.")]
    NotAnObject(&'static str),
    #[error("Object has no property '{0}'.")]
    UndefinedProperty(String),
    #[error("Property key must be a string or a number, but got {0}.")]
    InvalidPropertyKey(&'static str),
    #[error("Function '{name}' expected {expected} arguments, but got {found}.")]
    MissingArgument {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Cannot assign to {0}.")]
    InvalidAssignmentTarget(&'static str),
    #[error("Arithmetic error in '{operator}': {reason}.")]
    Arithmetic {
        operator: &'static str,
        reason: &'static str,
    },
    #[error("Format placeholder {{{0}}} has no matching argument.")]
    FormatIndex(String),
    #[error("Failed to write output: {0}.")]
    Output(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
