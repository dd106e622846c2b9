pub mod frontend;
pub mod treewalk_interpreter;

use frontend::grammar::{Program, Stmt};
use frontend::{ParserError, TokenizerError};
use treewalk_interpreter::{Environment, Interpreter, RuntimeError, RuntimeValue};

use std::io::Write;
use std::sync::Once;
use thiserror::Error;

/// Failure of any phase of the pipeline.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum LangError {
    #[error("TokenizerError: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("ParserError: {0}")]
    Parser(#[from] ParserError),
    #[error("RuntimeError: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Strips comments, then tokenizes and parses.
pub fn parse_source(source: &str) -> Result<Program, LangError> {
    let source = frontend::strip_comments(source);
    let tokens = frontend::tokenize(&source)?;
    Ok(frontend::parse(tokens)?)
}

/// Runs a whole program in `env`. Bindings it declares stay in `env`.
pub fn run<W: Write>(
    source: &str,
    interpreter: &mut Interpreter<W>,
    env: &Environment,
) -> Result<RuntimeValue, LangError> {
    let program = parse_source(source)?;
    Ok(interpreter.evaluate(&Stmt::Program(program), env)?)
}

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`. Does nothing when
/// the variable is unset, and only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
