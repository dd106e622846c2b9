mod environment;
mod errors;
mod function;
mod interpreter;
mod native_function;
mod value;

pub use environment::{Binding, Environment};
pub use errors::{RuntimeError, RuntimeResult};
pub use function::LangFn;
pub use interpreter::Interpreter;
pub use native_function::{interpolate, NativeFn};
pub use value::{ObjectRef, RuntimeValue};
