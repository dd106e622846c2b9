use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeResult};
use super::value::RuntimeValue;

use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Host callable. Returning `None` means the call evaluates to `Null`.
pub type NativeFnType =
    fn(Vec<RuntimeValue>, &Environment, &mut dyn Write) -> RuntimeResult<Option<RuntimeValue>>;

pub struct NativeFnData {
    pub name: String,
    pub func: NativeFnType,
}

#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnData>);

impl NativeFn {
    pub fn new(name: &str, func: NativeFnType) -> Self {
        let name = name.to_owned();
        NativeFn(Rc::new(NativeFnData { name, func }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn execute(
        &self,
        args: Vec<RuntimeValue>,
        env: &Environment,
        output: &mut dyn Write,
    ) -> RuntimeResult<RuntimeValue> {
        let value = (self.0.func)(args, env, output)?;
        Ok(value.unwrap_or(RuntimeValue::Null))
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native fn {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // You cannot derive Eq for function pointers in Rust. Also, LLVM
    // can combine two different functions into one that have identical
    // bodies. Wrap function pointer in Rc and compare the Rcs.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeFn {}

pub fn get_native_funcs() -> Vec<NativeFn> {
    vec![NativeFn::new("print", print)]
}

/// Writes the first argument followed by a newline. With further arguments the
/// first one is a template for `interpolate`.
fn print(
    mut args: Vec<RuntimeValue>,
    _env: &Environment,
    output: &mut dyn Write,
) -> RuntimeResult<Option<RuntimeValue>> {
    let text = if args.is_empty() {
        RuntimeValue::Null.to_string()
    } else {
        let template = args.remove(0).to_string();
        if args.is_empty() {
            template
        } else {
            interpolate(&template, &args)?
        }
    };

    writeln!(output, "{}", text).map_err(|e| RuntimeError::Output(e.to_string()))?;
    Ok(None)
}

/// Replaces `{N}` with the N-th argument. `{{` and `}}` produce literal braces;
/// anything else is copied as is.
pub fn interpolate(template: &str, args: &[RuntimeValue]) -> RuntimeResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    digits.push(d);
                    chars.next();
                }

                if digits.is_empty() || chars.peek() != Some(&'}') {
                    out.push('{');
                    out.push_str(&digits);
                    continue;
                }

                chars.next();
                let arg = digits
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| args.get(idx))
                    .ok_or_else(|| RuntimeError::FormatIndex(digits.clone()))?;
                out.push_str(&arg.to_string());
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call_print(args: Vec<RuntimeValue>) -> RuntimeResult<(RuntimeValue, String)> {
        let mut output = vec![];
        let print = NativeFn::new("print", print);
        let value = print.execute(args, &Environment::new(), &mut output)?;
        Ok((value, String::from_utf8(output).unwrap()))
    }

    #[test]
    fn test_print_returns_null() {
        let (value, text) = call_print(vec![RuntimeValue::number(3)]).unwrap();
        assert_eq!(value, RuntimeValue::Null);
        assert_eq!(text, "3\n");
    }

    #[test]
    fn test_print_without_arguments() {
        let (_, text) = call_print(vec![]).unwrap();
        assert_eq!(text, "undefined\n");
    }

    #[test]
    fn test_print_interpolates_extra_arguments() {
        let args = vec![
            RuntimeValue::String("{1} + {0} = {2}".to_owned()),
            RuntimeValue::number(1),
            RuntimeValue::number(2),
            RuntimeValue::number(3),
        ];
        let (_, text) = call_print(args).unwrap();
        assert_eq!(text, "2 + 1 = 3\n");
    }

    #[test]
    fn test_single_argument_is_not_a_template() {
        let (_, text) = call_print(vec![RuntimeValue::String("{0}".to_owned())]).unwrap();
        assert_eq!(text, "{0}\n");
    }

    #[test]
    fn test_interpolate() {
        let args = [RuntimeValue::String("x".to_owned())];
        assert_eq!(interpolate("{{{0}}}", &args).unwrap(), "{x}");
        assert_eq!(interpolate("{a} {0", &args).unwrap(), "{a} {0");
        assert_eq!(interpolate("} {0}", &args).unwrap(), "} x");
        assert_eq!(
            interpolate("{1}", &args),
            Err(RuntimeError::FormatIndex("1".to_owned()))
        );
    }

    #[test]
    fn test_native_identity() {
        let funcs = get_native_funcs();
        assert_eq!(funcs[0].name(), "print");
        assert_eq!(funcs[0], funcs[0].clone());
        assert_ne!(funcs[0], NativeFn::new("print", print));
    }
}
