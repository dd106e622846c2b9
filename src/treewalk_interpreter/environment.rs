use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::errors::{RuntimeError, RuntimeResult};
use super::native_function::get_native_funcs;
use super::value::RuntimeValue;

/// Lexical scope. Clones share the same scope, which is how closures keep
/// their declaring scope alive.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: RuntimeValue,
    pub is_constant: bool,
}

struct EnvironmentData {
    values: HashMap<String, Binding>,
    enclosing: Option<Environment>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Root scope with the built-in constants and native functions.
    pub fn prelude() -> Self {
        let env = Environment::new();
        let builtins = [
            ("true", RuntimeValue::Boolean(Some(true))),
            ("false", RuntimeValue::Boolean(Some(false))),
            ("null", RuntimeValue::Null),
        ];
        for (name, value) in builtins {
            env.insert_builtin(name, value);
        }
        for native_func in get_native_funcs().into_iter() {
            let name = native_func.name().to_owned();
            env.insert_builtin(&name, RuntimeValue::NativeFunction(native_func));
        }
        env
    }

    /// Scope for user programs: a child of a fresh prelude, so user code may
    /// shadow the built-ins.
    pub fn global() -> Self {
        Environment::with_enclosing(&Environment::prelude())
    }

    fn insert_builtin(&self, name: &str, value: RuntimeValue) {
        let binding = Binding {
            value,
            is_constant: true,
        };
        self.env_ptr
            .borrow_mut()
            .values
            .insert(name.to_owned(), binding);
    }

    pub fn enclosing(&self) -> Option<Environment> {
        self.env_ptr.borrow().enclosing.clone()
    }

    /// Adds a binding to this scope. Names already bound in this scope are
    /// rejected; outer bindings are shadowed.
    pub fn declare(
        &self,
        name: &str,
        value: RuntimeValue,
        is_constant: bool,
    ) -> RuntimeResult<RuntimeValue> {
        match self.env_ptr.borrow_mut().values.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(RuntimeError::Redeclaration(name.to_owned())),
            Entry::Vacant(slot) => {
                slot.insert(Binding {
                    value: value.clone(),
                    is_constant,
                });
                Ok(value)
            }
        }
    }

    /// Nearest scope, starting from this one, that binds `name`.
    pub fn resolve(&self, name: &str) -> RuntimeResult<Environment> {
        let mut env = self.clone();
        loop {
            if env.env_ptr.borrow().values.contains_key(name) {
                return Ok(env);
            }
            env = match env.enclosing() {
                Some(enclosing) => enclosing,
                None => return Err(RuntimeError::UndefinedVariable(name.to_owned())),
            };
        }
    }

    pub fn lookup(&self, name: &str) -> RuntimeResult<RuntimeValue> {
        let env = self.resolve(name)?;
        let data = env.env_ptr.borrow();
        match data.values.get(name) {
            Some(binding) => Ok(binding.value.clone()),
            None => Err(RuntimeError::UndefinedVariable(name.to_owned())),
        }
    }

    /// Replaces the value in the scope that binds `name`.
    pub fn assign(&self, name: &str, value: RuntimeValue) -> RuntimeResult<RuntimeValue> {
        let env = self.resolve(name)?;
        let mut data = env.env_ptr.borrow_mut();
        match data.values.get_mut(name) {
            Some(binding) if binding.is_constant => {
                Err(RuntimeError::ConstantAssignment(name.to_owned()))
            }
            Some(binding) => {
                binding.value = value.clone();
                Ok(value)
            }
            None => Err(RuntimeError::UndefinedVariable(name.to_owned())),
        }
    }

    pub fn is_constant(&self, name: &str) -> RuntimeResult<bool> {
        let env = self.resolve(name)?;
        let data = env.env_ptr.borrow();
        Ok(data.values.get(name).map_or(false, |b| b.is_constant))
    }
}

impl fmt::Debug for Environment {
    // Values may hold closures over this scope, so only names are printed.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let data = self.env_ptr.borrow();
        let mut names: Vec<_> = data.values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_enclosing", &data.enclosing.is_some())
            .finish()
    }
}
