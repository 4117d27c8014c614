//! Keypad calculator engines
//!
//! Both engines are plain value types: every operation consumes the current
//! state and returns the next one, so a UI only has to hold the latest value.

pub mod basic;
pub mod scientific;

pub use basic::{parse_keys, BasicCalculator, BasicKey, Operator};
pub use scientific::{
    evaluate_expression, rewrite_expression, AngleMode, Function, ScientificCalculator,
    ScientificKey,
};
