//! Scientific calculator: expression accumulation over an injected evaluator
//!
//! Keypad tokens build up a text expression that is handed to an
//! [`ExpressionEvaluator`] on `=`. Function buttons (`sin`, `log`, `n!`, ...)
//! act directly on the number currently shown, honouring the angle mode and
//! the one-shot inverse toggle.
//!
//! Angle mode only affects the function buttons. A trig function typed into
//! the expression text (for example `sin(30)` followed by `=`) is evaluated
//! by the expression evaluator, which always works in radians.

use std::f64::consts::{E, PI};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::expr::{factorial, ExpressionEvaluator};
use crate::format::{
    ensure_finite, format_number, parse_number, round_to_precision, ERROR_DISPLAY,
    SCIENTIFIC_DISPLAY_LIMIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    Degrees,
    Radians,
}

impl AngleMode {
    fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleMode::Degrees => value.to_radians(),
            AngleMode::Radians => value,
        }
    }

    fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleMode::Degrees => value.to_degrees(),
            AngleMode::Radians => value,
        }
    }
}

/// Function buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Sin,
    Cos,
    Tan,
    /// Base-10 logarithm; inverse is `10^x`
    Log,
    /// Natural logarithm; inverse is `e^x`
    Ln,
    /// Square root; inverse is `x²`
    Sqrt,
    Fact,
    Pi,
    E,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "log" => Function::Log,
            "ln" => Function::Ln,
            "sqrt" | "√" => Function::Sqrt,
            "fact" | "n!" => Function::Fact,
            "pi" | "π" => Function::Pi,
            "e" => Function::E,
            _ => return None,
        };
        Some(f)
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Sqrt => "sqrt",
            Function::Fact => "fact",
            Function::Pi => "pi",
            Function::E => "e",
        }
    }

    /// Label used in previews and deferred expression text
    fn label(self, inverse: bool) -> &'static str {
        match (self, inverse) {
            (Function::Sin, false) => "sin",
            (Function::Sin, true) => "asin",
            (Function::Cos, false) => "cos",
            (Function::Cos, true) => "acos",
            (Function::Tan, false) => "tan",
            (Function::Tan, true) => "atan",
            (Function::Log, false) => "log",
            (Function::Log, true) => "10^",
            (Function::Ln, false) => "ln",
            (Function::Ln, true) => "e^",
            (Function::Sqrt, false) => "√",
            (Function::Sqrt, true) => "sqr",
            (Function::Fact, _) => "fact",
            (Function::Pi, _) => "π",
            (Function::E, _) => "e",
        }
    }

    /// Apply the function to a number.
    ///
    /// Trig inputs are converted from degrees when `mode` is
    /// [`AngleMode::Degrees`]; inverse-trig outputs are converted back.
    pub fn apply(self, value: f64, mode: AngleMode, inverse: bool) -> CalcResult<f64> {
        let result = match (self, inverse) {
            (Function::Sin, false) => mode.to_radians(value).sin(),
            (Function::Sin, true) => mode.from_radians(value.asin()),
            (Function::Cos, false) => mode.to_radians(value).cos(),
            (Function::Cos, true) => mode.from_radians(value.acos()),
            (Function::Tan, false) => mode.to_radians(value).tan(),
            (Function::Tan, true) => mode.from_radians(value.atan()),
            (Function::Log, false) => value.log10(),
            (Function::Log, true) => 10f64.powf(value),
            (Function::Ln, false) => value.ln(),
            (Function::Ln, true) => value.exp(),
            (Function::Sqrt, false) => value.sqrt(),
            (Function::Sqrt, true) => value * value,
            (Function::Fact, _) => {
                return factorial(value).map_err(|e| CalcError::domain(e.message));
            }
            (Function::Pi, _) => PI,
            (Function::E, _) => E,
        };
        ensure_finite(result, self.name())
    }
}

/// One scientific keypad press
#[derive(Debug, Clone, PartialEq)]
pub enum ScientificKey {
    /// Literal text: digits, `.`, operators, parentheses
    Token(String),
    Function(Function),
    ToggleInverse,
    Degrees,
    Radians,
    Equals,
    Clear,
    Backspace,
}

impl FromStr for ScientificKey {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "" => return Err(CalcError::parse("Empty key")),
            "inv" => ScientificKey::ToggleInverse,
            "deg" => ScientificKey::Degrees,
            "rad" => ScientificKey::Radians,
            "=" => ScientificKey::Equals,
            "C" | "c" | "clear" => ScientificKey::Clear,
            "DEL" | "del" | "<" => ScientificKey::Backspace,
            "x^y" => ScientificKey::Token("^".to_string()),
            other => match Function::from_name(other) {
                Some(f) => ScientificKey::Function(f),
                None => ScientificKey::Token(other.to_string()),
            },
        };
        Ok(key)
    }
}

/// Evaluate keypad expression text: rewrite keypad glyphs, evaluate, check
/// finiteness, round to 12 significant digits.
pub fn evaluate_expression<V: ExpressionEvaluator>(
    evaluator: &V,
    expression: &str,
) -> CalcResult<f64> {
    let rewritten = rewrite_expression(expression);
    let value = evaluator.evaluate_str(&rewritten)?;
    ensure_finite(value, "Result").map(round_to_precision)
}

/// Rewrite keypad text into evaluator syntax.
///
/// `π` and a standalone `e` become parenthesised literals, `√(` becomes
/// `sqrt(`, `log(` becomes `log10(` and `ln(` becomes `log(`.
pub fn rewrite_expression(expression: &str) -> String {
    let chars: Vec<char> = expression.chars().collect();
    let is_word = |c: Option<&char>| c.is_some_and(|c| c.is_alphanumeric() || *c == '_');

    let mut out = String::with_capacity(expression.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            'π' => out.push_str(&format!("({})", PI)),
            'e' if !is_word(i.checked_sub(1).and_then(|p| chars.get(p)))
                && !is_word(chars.get(i + 1)) =>
            {
                out.push_str(&format!("({})", E))
            }
            '√' => out.push_str("sqrt"),
            '×' => out.push('*'),
            '÷' => out.push('/'),
            other => out.push(other),
        }
    }

    // Order matters: natural log takes the `log(` name once base-10 has moved
    out.replace("log(", "log10(").replace("ln(", "log(")
}

fn is_operator_token(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '+' | '-' | '*' | '/' | '^' | '×' | '÷'))
}

/// State of the scientific calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientificCalculator {
    pub display_value: String,
    /// Raw text handed to the evaluator on `=`
    pub expression: String,
    pub is_radians: bool,
    /// One-shot inverse toggle
    pub is_inverse: bool,
}

impl Default for ScientificCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScientificCalculator {
    pub fn new() -> Self {
        Self {
            display_value: "0".to_string(),
            expression: String::new(),
            is_radians: false,
            is_inverse: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.display_value == ERROR_DISPLAY
    }

    pub fn angle_mode(&self) -> AngleMode {
        if self.is_radians {
            AngleMode::Radians
        } else {
            AngleMode::Degrees
        }
    }

    /// The expression is a finished trace (`... =`)
    fn is_completed(&self) -> bool {
        self.expression.ends_with(" =")
    }

    pub fn press<V: ExpressionEvaluator>(self, key: ScientificKey, evaluator: &V) -> Self {
        match key {
            ScientificKey::Token(token) => self.append_token(&token),
            ScientificKey::Function(f) => self.apply_function(f),
            ScientificKey::ToggleInverse => self.toggle_inverse(),
            ScientificKey::Degrees => self.set_angle_mode(AngleMode::Degrees),
            ScientificKey::Radians => self.set_angle_mode(AngleMode::Radians),
            ScientificKey::Equals => self.evaluate(evaluator),
            ScientificKey::Clear => self.clear(),
            ScientificKey::Backspace => self.backspace(),
        }
    }

    /// Append literal text to both the display and the expression.
    ///
    /// After a finished trace an operator continues from the shown result and
    /// anything else starts a new expression. From `"Error"` this behaves like
    /// `clear()` followed by the token.
    pub fn append_token(self, token: &str) -> Self {
        if token.is_empty() {
            return self;
        }
        let mut state = if self.is_error() { self.clear() } else { self };

        if state.is_completed() {
            if is_operator_token(token) {
                state.expression = state.display_value.clone();
            } else {
                state.expression.clear();
                state.display_value = "0".to_string();
            }
        }

        let display = if state.display_value == "0" && token != "." {
            token.to_string()
        } else {
            format!("{}{}", state.display_value, token)
        };
        if display.chars().count() > SCIENTIFIC_DISPLAY_LIMIT {
            return state;
        }

        state.display_value = display;
        state.expression.push_str(token);
        state
    }

    pub fn toggle_inverse(mut self) -> Self {
        self.is_inverse = !self.is_inverse;
        self
    }

    pub fn set_angle_mode(mut self, mode: AngleMode) -> Self {
        self.is_radians = mode == AngleMode::Radians;
        self
    }

    /// Apply a function button to the number on display.
    ///
    /// `pi`/`e` insert the constant without consuming an operand. When the
    /// display is not a plain number the function is appended as a prefix
    /// (`sin(`) and left for `=` to evaluate.
    pub fn apply_function(self, function: Function) -> Self {
        if self.is_error() {
            return self;
        }
        let mut state = self;

        if matches!(function, Function::Pi | Function::E) {
            if state.is_completed() {
                state.expression.clear();
            }
            let value = if function == Function::Pi { PI } else { E };
            state.expression.push_str(function.label(false));
            state.display_value = value.to_string();
            return state;
        }

        let operand_text = state.display_value.clone();
        let operand = match operand_text.as_str() {
            "π" => Some(PI),
            "e" => Some(E),
            text => parse_number(text).ok(),
        };

        let Some(value) = operand else {
            let prefix = format!("{}(", function.label(state.is_inverse));
            let mut state = state.append_token(&prefix);
            state.is_inverse = false;
            return state;
        };

        let preview = format!("{}({})", function.label(state.is_inverse), operand_text);
        state.display_value = match function.apply(value, state.angle_mode(), state.is_inverse) {
            Ok(result) => format_number(result),
            Err(_) => ERROR_DISPLAY.to_string(),
        };
        state.expression = format!("{} =", preview);
        state.is_inverse = false;
        state
    }

    /// Evaluate the accumulated expression
    pub fn evaluate<V: ExpressionEvaluator>(self, evaluator: &V) -> Self {
        if self.is_error() || self.is_completed() {
            return self;
        }
        let mut state = self;

        if state.expression.is_empty() {
            state.expression = format!("{} =", state.display_value);
            return state;
        }

        state.display_value = match evaluate_expression(evaluator, &state.expression) {
            Ok(value) => format_number(value),
            Err(_) => ERROR_DISPLAY.to_string(),
        };
        state.expression = format!("{} =", state.expression);
        state
    }

    /// Reset display and expression; the angle mode is kept
    pub fn clear(self) -> Self {
        Self {
            is_radians: self.is_radians,
            ..Self::new()
        }
    }

    pub fn backspace(self) -> Self {
        if self.is_error() {
            return self.clear();
        }
        let mut state = self;

        let mut display = state.display_value.clone();
        display.pop();
        if display.is_empty() || display == "-" {
            display = "0".to_string();
        }

        if state.is_completed() {
            // A finished trace cannot be edited; restart from the display
            state.expression = if display == "0" {
                String::new()
            } else {
                display.clone()
            };
        } else {
            state.expression.pop();
        }
        state.display_value = display;
        state
    }
}
