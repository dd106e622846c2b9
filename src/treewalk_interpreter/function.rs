use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeResult};
use super::interpreter::Interpreter;
use super::value::RuntimeValue;
use crate::frontend::grammar::FuncInfo;

use std::fmt;
use std::io::Write;
use std::rc::Rc;

pub struct LangFnData {
    info: Rc<FuncInfo>,
    closure: Environment,
}

/// User function together with the scope it was declared in.
#[derive(Clone)]
pub struct LangFn(Rc<LangFnData>);

impl LangFn {
    pub fn new(info: Rc<FuncInfo>, closure: Environment) -> Self {
        LangFn(Rc::new(LangFnData { info, closure }))
    }

    pub fn name(&self) -> &str {
        &self.0.info.name
    }

    pub fn params(&self) -> &[String] {
        &self.0.info.params
    }

    /// Runs the body in a fresh scope whose parent is the declaring scope.
    /// Extra arguments are ignored; missing ones are an error.
    pub fn execute<W: Write>(
        &self,
        args: Vec<RuntimeValue>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<RuntimeValue> {
        let params = self.params();
        if args.len() < params.len() {
            return Err(RuntimeError::MissingArgument {
                name: self.name().to_owned(),
                expected: params.len(),
                found: args.len(),
            });
        }

        tracing::trace!(function = self.name(), args = args.len(), "calling function");

        // Create a new environment pointing to surrounding closure
        let env = Environment::with_enclosing(&self.0.closure);
        for (param, arg) in params.iter().zip(args) {
            env.declare(param, arg, false)?;
        }

        interpreter.eval_statements(&self.0.info.body, &env)
    }
}

impl fmt::Debug for LangFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl PartialEq<LangFn> for LangFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for LangFn {}
