//! Math expression evaluator
//!
//! The scientific calculator and the function sampler only depend on the
//! [`ExpressionEvaluator`] / [`CompiledExpression`] traits; [`StandardEvaluator`]
//! is the built-in implementation (tokenizer → parser → evaluator).
//!
//! Supported syntax: `+ - * / ^ ( )`, unary minus, named variables, the
//! constants `pi`/`e`, and the functions `sin cos tan asin acos atan sqrt sqr
//! log10 log ln exp abs fact`. `log` is the natural logarithm.

pub mod evaluator;
pub mod parser;
pub mod tokenizer;

use std::collections::HashMap;

use thiserror::Error;

use crate::error::CalcError;

pub use evaluator::{factorial, EvalError, MAX_FACTORIAL};
pub use parser::{BinaryOperator, BuiltinFunction, Expr, ParseError, MAX_DEPTH};
pub use tokenizer::{Token, TokenizeError};

/// Named-variable environment for evaluation
pub type Env = HashMap<String, f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<ExprError> for CalcError {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::Tokenize(e) => CalcError::Parse(e.to_string()),
            ExprError::Parse(e) => CalcError::Parse(e.to_string()),
            ExprError::Eval(e) => CalcError::Domain(e.message),
        }
    }
}

/// A parsed expression that can be evaluated repeatedly
pub trait CompiledExpression {
    fn evaluate(&self, env: &Env) -> Result<f64, ExprError>;
}

/// Parses expression text into something evaluable
pub trait ExpressionEvaluator {
    type Compiled: CompiledExpression;

    fn parse(&self, text: &str) -> Result<Self::Compiled, ExprError>;

    /// Parse and evaluate once with an empty environment
    fn evaluate_str(&self, text: &str) -> Result<f64, ExprError> {
        self.parse(text)?.evaluate(&Env::new())
    }
}

/// The built-in evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl ExpressionEvaluator for StandardEvaluator {
    type Compiled = Expr;

    fn parse(&self, text: &str) -> Result<Expr, ExprError> {
        let tokens = tokenizer::tokenize(text)?;
        Ok(parser::parse(tokens)?)
    }
}

impl CompiledExpression for Expr {
    fn evaluate(&self, env: &Env) -> Result<f64, ExprError> {
        Ok(evaluator::evaluate(self, env)?)
    }
}
