//! Expression evaluator
//!
//! Walks an AST and produces an `f64`. Trigonometric functions work in
//! radians. Non-finite results (e.g. `log(0)`) are returned as-is; callers
//! decide how to surface them.

use super::parser::{BinaryOperator, BuiltinFunction, Expr};
use super::Env;

/// Largest n for which n! fits in an f64
pub const MAX_FACTORIAL: u32 = 170;

/// Error during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Eval error: {}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// Evaluate an expression against a variable environment
pub fn evaluate(expr: &Expr, env: &Env) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),

        Expr::Variable(name) => resolve_variable(name, env),

        Expr::FunctionCall { function, args } => evaluate_function(*function, args, env),

        Expr::BinaryOp { op, left, right } => {
            let l = evaluate(left, env)?;
            let r = evaluate(right, env)?;
            evaluate_binary_op(*op, l, r)
        }

        Expr::Negate(operand) => Ok(-evaluate(operand, env)?),
    }
}

/// Environment first, then the built-in constants
fn resolve_variable(name: &str, env: &Env) -> Result<f64, EvalError> {
    if let Some(value) = env.get(name) {
        return Ok(*value);
    }
    match name {
        "pi" | "PI" | "π" => Ok(std::f64::consts::PI),
        "e" | "E" => Ok(std::f64::consts::E),
        _ => Err(EvalError::new(format!("Unknown variable: {}", name))),
    }
}

fn evaluate_binary_op(op: BinaryOperator, l: f64, r: f64) -> Result<f64, EvalError> {
    match op {
        BinaryOperator::Add => Ok(l + r),
        BinaryOperator::Subtract => Ok(l - r),
        BinaryOperator::Multiply => Ok(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                Err(EvalError::new("Division by zero"))
            } else {
                Ok(l / r)
            }
        }
        BinaryOperator::Power => Ok(l.powf(r)),
    }
}

fn evaluate_function(
    function: BuiltinFunction,
    args: &[Expr],
    env: &Env,
) -> Result<f64, EvalError> {
    require_args(function, args, 1)?;
    let val = evaluate(&args[0], env)?;

    match function {
        BuiltinFunction::Sin => Ok(val.sin()),
        BuiltinFunction::Cos => Ok(val.cos()),
        BuiltinFunction::Tan => Ok(val.tan()),
        BuiltinFunction::Asin => Ok(val.asin()),
        BuiltinFunction::Acos => Ok(val.acos()),
        BuiltinFunction::Atan => Ok(val.atan()),
        BuiltinFunction::Sqrt => {
            if val < 0.0 {
                Err(EvalError::new("sqrt of negative number"))
            } else {
                Ok(val.sqrt())
            }
        }
        BuiltinFunction::Sqr => Ok(val * val),
        BuiltinFunction::Log10 => Ok(val.log10()),
        BuiltinFunction::Log => Ok(val.ln()),
        BuiltinFunction::Exp => Ok(val.exp()),
        BuiltinFunction::Abs => Ok(val.abs()),
        BuiltinFunction::Fact => factorial(val),
    }
}

fn require_args(function: BuiltinFunction, args: &[Expr], count: usize) -> Result<(), EvalError> {
    if args.len() != count {
        return Err(EvalError::new(format!(
            "{} expects {} argument(s), got {}",
            function.name(),
            count,
            args.len()
        )));
    }
    Ok(())
}

/// n! for non-negative integers up to [`MAX_FACTORIAL`]
pub fn factorial(n: f64) -> Result<f64, EvalError> {
    if n.fract() != 0.0 || n < 0.0 || n > f64::from(MAX_FACTORIAL) {
        return Err(EvalError::new(format!(
            "factorial is defined for integers 0..={} only, got {}",
            MAX_FACTORIAL, n
        )));
    }
    Ok((2..=n as u32).fold(1.0, |acc, i| acc * f64::from(i)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::parse;
    use crate::expr::tokenizer::tokenize;

    fn eval_with(text: &str, env: &Env) -> Result<f64, EvalError> {
        let tokens = tokenize(text).map_err(|e| EvalError::new(e.message))?;
        let expr = parse(tokens).map_err(|e| EvalError::new(e.message))?;
        evaluate(&expr, env)
    }

    fn eval(text: &str) -> Result<f64, EvalError> {
        eval_with(text, &Env::new())
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(eval("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(eval("10 / 4 - 1").unwrap(), 1.5);
    }

    #[test]
    fn test_power_right_associative() {
        assert_eq!(eval("2^3^2").unwrap(), 512.0);
        assert_eq!(eval("2*3^2").unwrap(), 18.0);
        assert_eq!(eval("-2^2").unwrap(), -4.0);
    }

    #[test]
    fn test_functions_in_radians() {
        assert!((eval("sin(pi / 2)").unwrap() - 1.0).abs() < 1e-12);
        assert!((eval("cos(0)").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(eval("sqrt(16)").unwrap(), 4.0);
        assert!((eval("log10(1000)").unwrap() - 3.0).abs() < 1e-12);
        assert!((eval("log(e)").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_variables_from_env() {
        let mut env = Env::new();
        env.insert("x".to_string(), 3.0);
        assert_eq!(eval_with("x^2 + 1", &env).unwrap(), 10.0);
    }

    #[test]
    fn test_env_shadows_constants() {
        let mut env = Env::new();
        env.insert("e".to_string(), 2.0);
        assert_eq!(eval_with("e * 2", &env).unwrap(), 4.0);
    }

    #[test]
    fn test_unknown_variable() {
        let err = eval("y + 1").unwrap_err();
        assert!(err.message.contains("Unknown variable"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval("1 / 0").unwrap_err();
        assert_eq!(err.message, "Division by zero");
    }

    #[test]
    fn test_sqrt_negative() {
        assert!(eval("sqrt(-1)").is_err());
    }

    #[test]
    fn test_log_zero_is_non_finite() {
        assert!(eval("log(0)").unwrap().is_infinite());
    }

    #[test]
    fn test_wrong_arity() {
        let err = eval("sin(1, 2)").unwrap_err();
        assert!(err.message.contains("expects 1"));
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert_eq!(factorial(5.0).unwrap(), 120.0);
        assert!(factorial(170.0).unwrap().is_finite());
        assert!(factorial(171.0).is_err());
        assert!(factorial(-1.0).is_err());
        assert!(factorial(2.5).is_err());
    }
}
