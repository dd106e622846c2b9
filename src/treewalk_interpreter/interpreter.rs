use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeResult};
use super::function::LangFn;
use super::value::{ObjectRef, RuntimeValue};
use crate::frontend::grammar::{
    Accessor, BinaryOperator, Expr, Literal, Program, Property, Stmt, VariableDecl,
};

use std::io::{self, Write};

/// Tree-walking evaluator. Scope is passed explicitly; the interpreter only
/// owns the stream that `print` writes to.
pub struct Interpreter<W: Write = io::Stdout> {
    output: W,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::new_with_output(io::stdout())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new_with_output(output: W) -> Self {
        Interpreter { output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    #[tracing::instrument(level = "trace", skip_all, fields(kind = stmt.kind_name()))]
    pub fn evaluate(&mut self, stmt: &Stmt, env: &Environment) -> RuntimeResult<RuntimeValue> {
        match stmt {
            Stmt::Program(program) => self.eval_program(program, env),
            Stmt::VariableDecl(decl) => self.eval_variable_decl(decl, env),
            Stmt::FuncDecl(func_info) => {
                let func = LangFn::new(func_info.clone(), env.clone());
                tracing::trace!(name = %func_info.name, "declaring function");
                env.declare(&func_info.name, RuntimeValue::Function(func), true)
            }
            Stmt::Expression(expr) => self.eval_expression(expr, env),
        }
    }

    pub fn eval_program(
        &mut self,
        program: &Program,
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        self.eval_statements(&program.body, env)
    }

    /// Evaluates in order and yields the value of the last statement, or
    /// `Null` for an empty list.
    pub fn eval_statements(
        &mut self,
        stmts: &[Stmt],
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        let mut last = RuntimeValue::Null;
        for stmt in stmts.iter() {
            last = self.evaluate(stmt, env)?;
        }
        Ok(last)
    }

    fn eval_variable_decl(
        &mut self,
        decl: &VariableDecl,
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        let value = match &decl.initializer {
            Some(expr) => self.eval_expression(expr, env)?,
            None => RuntimeValue::Null,
        };
        tracing::trace!(name = %decl.name, constant = decl.is_constant, "declaring variable");
        env.declare(&decl.name, value, decl.is_constant)
    }

    pub fn eval_expression(
        &mut self,
        expr: &Expr,
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        match expr {
            Expr::Literal(l) => Ok(self.eval_literal(l)),
            Expr::Identifier(name) => env.lookup(name),
            Expr::Binary(op, lhs, rhs) => self.eval_binary_operator(*op, lhs, rhs, env),
            Expr::Assignment(target, value) => self.eval_assignment(target, value, env),
            Expr::Call(callee, args) => self.eval_func_call(callee, args, env),
            Expr::Member(object, accessor) => self.eval_member_get(object, accessor, env),
            Expr::Object(properties) => self.eval_object_literal(properties, env),
        }
    }

    fn eval_literal(&self, l: &Literal) -> RuntimeValue {
        match l {
            Literal::Number(n) => RuntimeValue::number(*n),
            Literal::Str(s) => RuntimeValue::String(s.clone()),
            Literal::Null => RuntimeValue::Null,
        }
    }

    pub fn eval_binary_operator(
        &mut self,
        op: BinaryOperator,
        lhs: &Expr,
        rhs: &Expr,
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        let lhs = self.eval_expression(lhs, env)?;
        let rhs = self.eval_expression(rhs, env)?;
        RuntimeValue::apply_binary_op(op, lhs, rhs)
    }

    fn eval_assignment(
        &mut self,
        target: &Expr,
        value: &Expr,
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        match target {
            Expr::Identifier(name) => {
                let value = self.eval_expression(value, env)?;
                env.assign(name, value)
            }
            Expr::Member(object, accessor) => {
                let object = self.eval_object(object, env)?;
                let key = self.eval_property_key(accessor, env)?;
                let value = self.eval_expression(value, env)?;
                object.set(key, value.clone());
                Ok(value)
            }
            other => Err(RuntimeError::InvalidAssignmentTarget(other.kind_name())),
        }
    }

    fn eval_func_call(
        &mut self,
        callee: &Expr,
        raw_args: &[Expr],
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        let mut args = Vec::with_capacity(raw_args.len());
        for raw_arg in raw_args.iter() {
            args.push(self.eval_expression(raw_arg, env)?);
        }

        match self.eval_expression(callee, env)? {
            RuntimeValue::NativeFunction(func) => func.execute(args, env, &mut self.output),
            RuntimeValue::Function(func) => func.execute(args, self),
            other => {
                tracing::debug!(callee = other.type_name(), "call on a non-function value");
                Ok(RuntimeValue::Null)
            }
        }
    }

    fn eval_member_get(
        &mut self,
        object: &Expr,
        accessor: &Accessor,
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        let object = self.eval_object(object, env)?;
        let key = self.eval_property_key(accessor, env)?;
        object.get(&key).ok_or(RuntimeError::UndefinedProperty(key))
    }

    fn eval_object(&mut self, expr: &Expr, env: &Environment) -> RuntimeResult<ObjectRef> {
        match self.eval_expression(expr, env)? {
            RuntimeValue::Object(object) => Ok(object),
            other => Err(RuntimeError::NotAnObject(other.type_name())),
        }
    }

    fn eval_property_key(
        &mut self,
        accessor: &Accessor,
        env: &Environment,
    ) -> RuntimeResult<String> {
        match accessor {
            Accessor::Named(name) => Ok(name.clone()),
            Accessor::Computed(expr) => match self.eval_expression(expr, env)? {
                RuntimeValue::String(s) => Ok(s),
                RuntimeValue::Number(Some(n)) => Ok(n.to_string()),
                other => Err(RuntimeError::InvalidPropertyKey(other.type_name())),
            },
        }
    }

    fn eval_object_literal(
        &mut self,
        properties: &[Property],
        env: &Environment,
    ) -> RuntimeResult<RuntimeValue> {
        let object = ObjectRef::default();
        for property in properties.iter() {
            let value = match &property.value {
                Some(expr) => self.eval_expression(expr, env)?,
                None => env.lookup(&property.key)?,
            };
            object.set(property.key.clone(), value);
        }
        Ok(RuntimeValue::Object(object))
    }
}
