//! Basic calculator: a binary-operator chain with no precedence
//!
//! `2 + 3 × 4 =` evaluates left to right and yields `20`. Every operation
//! consumes the current state and returns the next one.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::format::{
    clamp_length, ensure_finite, format_number, parse_number, round_to_precision,
    BASIC_DISPLAY_LIMIT, ERROR_DISPLAY,
};

/// Operators available on the basic keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `first % second`, the floating-point remainder
    Remainder,
}

impl Operator {
    /// Map a key glyph to an operator. Accepts both ASCII and keypad glyphs.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Subtract),
            '*' | '×' | 'x' | 'X' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            '%' => Some(Operator::Remainder),
            _ => None,
        }
    }

    /// Glyph used in the expression trace
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Remainder => "%",
        }
    }

    /// Apply the operator. Zero divisors are domain errors, never infinities.
    pub fn apply(self, first: f64, second: f64) -> CalcResult<f64> {
        let result = match self {
            Operator::Add => first + second,
            Operator::Subtract => first - second,
            Operator::Multiply => first * second,
            Operator::Divide => {
                if second == 0.0 {
                    return Err(CalcError::domain("Division by zero"));
                }
                first / second
            }
            Operator::Remainder => {
                if second == 0.0 {
                    return Err(CalcError::domain("Remainder by zero"));
                }
                first % second
            }
        };
        ensure_finite(result, "Result")
    }
}

/// A single keypad press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicKey {
    Digit(char),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
}

/// Parse a keystroke string such as `"12+3×4="`.
///
/// Digits, `.`, operator glyphs, `=`, `C` (clear) and `<` (backspace) are
/// recognised; whitespace is ignored.
pub fn parse_keys(text: &str) -> CalcResult<Vec<BasicKey>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '0'..='9' => Ok(BasicKey::Digit(c)),
            '.' => Ok(BasicKey::Decimal),
            '=' => Ok(BasicKey::Equals),
            'c' | 'C' => Ok(BasicKey::Clear),
            '<' | '⌫' => Ok(BasicKey::Backspace),
            other => Operator::from_symbol(other)
                .map(BasicKey::Operator)
                .ok_or_else(|| CalcError::parse(format!("Unknown key: '{}'", other))),
        })
        .collect()
}

/// State of the basic calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicCalculator {
    /// Operand being entered, the last result, or `"Error"`
    pub display_value: String,
    /// Secondary display: the running trace
    pub expression: String,
    pub first_operand: Option<f64>,
    pub operator: Option<Operator>,
    /// The next digit starts a fresh operand
    pub waiting_for_second_operand: bool,
}

impl Default for BasicCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicCalculator {
    pub fn new() -> Self {
        Self {
            display_value: "0".to_string(),
            expression: String::new(),
            first_operand: None,
            operator: None,
            waiting_for_second_operand: false,
        }
    }

    fn error_state() -> Self {
        Self {
            display_value: ERROR_DISPLAY.to_string(),
            ..Self::new()
        }
    }

    pub fn is_error(&self) -> bool {
        self.display_value == ERROR_DISPLAY
    }

    /// Apply one key press
    pub fn press(self, key: BasicKey) -> Self {
        match key {
            BasicKey::Digit(d) => self.input_digit(d),
            BasicKey::Decimal => self.input_decimal(),
            BasicKey::Operator(op) => self.set_operator(op),
            BasicKey::Equals => self.equals(),
            BasicKey::Clear => self.clear(),
            BasicKey::Backspace => self.backspace(),
        }
    }

    /// Apply a sequence of key presses in order
    pub fn press_all(self, keys: impl IntoIterator<Item = BasicKey>) -> Self {
        keys.into_iter().fold(self, Self::press)
    }

    /// Enter a digit `0`-`9`. Other characters leave the state unchanged.
    ///
    /// From the `"Error"` state this behaves like `clear()` followed by the digit.
    pub fn input_digit(self, digit: char) -> Self {
        if !digit.is_ascii_digit() {
            return self;
        }
        let mut state = if self.is_error() { Self::new() } else { self };

        let display = if state.waiting_for_second_operand {
            state.waiting_for_second_operand = false;
            digit.to_string()
        } else if state.display_value == "0" {
            digit.to_string()
        } else {
            format!("{}{}", state.display_value, digit)
        };

        state.display_value = clamp_length(&display, BASIC_DISPLAY_LIMIT);
        state.expression = state.entry_expression();
        state
    }

    /// Enter a decimal point; at most one per operand
    pub fn input_decimal(self) -> Self {
        let mut state = if self.is_error() { Self::new() } else { self };

        if state.waiting_for_second_operand {
            state.waiting_for_second_operand = false;
            state.display_value = "0.".to_string();
        } else if !state.display_value.contains('.') {
            let display = format!("{}.", state.display_value);
            state.display_value = clamp_length(&display, BASIC_DISPLAY_LIMIT);
        }

        state.expression = state.entry_expression();
        state
    }

    /// Select the pending operator, resolving any pending computation first
    pub fn set_operator(self, op: Operator) -> Self {
        if self.is_error() {
            return self;
        }
        let mut state = self;

        if state.operator.is_some() && !state.waiting_for_second_operand {
            match state.perform_calculation() {
                Ok(result) => {
                    state.first_operand = Some(result);
                    state.display_value = format_number(result);
                }
                Err(_) => return Self::error_state(),
            }
        } else {
            match parse_number(&state.display_value) {
                Ok(value) => state.first_operand = Some(value),
                Err(_) => return Self::error_state(),
            }
        }

        state.operator = Some(op);
        state.waiting_for_second_operand = true;
        state.expression = state.entry_expression();
        state
    }

    /// Resolve `first op display`, rounded to 12 significant digits.
    ///
    /// With no pending operator the result is just the parsed display value.
    pub fn perform_calculation(&self) -> CalcResult<f64> {
        let second = parse_number(&self.display_value)?;
        match (self.first_operand, self.operator) {
            (Some(first), Some(op)) => op.apply(first, second).map(round_to_precision),
            _ => Ok(second),
        }
    }

    /// The `=` key
    pub fn equals(self) -> Self {
        if self.is_error() {
            return self;
        }
        let mut state = self;

        match (state.first_operand, state.operator) {
            (Some(first), Some(op)) => {
                let trace = format!(
                    "{} {} {} =",
                    format_number(first),
                    op.symbol(),
                    state.display_value
                );
                match state.perform_calculation() {
                    Ok(result) => {
                        state.display_value = format_number(result);
                        state.first_operand = Some(result);
                    }
                    Err(_) => {
                        state.display_value = ERROR_DISPLAY.to_string();
                        state.first_operand = None;
                    }
                }
                state.expression = trace;
                state.operator = None;
            }
            _ => {
                // Bare value: show it as a finished trace, once
                if !state.expression.ends_with('=') {
                    let base = if state.expression.is_empty() {
                        state.display_value.clone()
                    } else {
                        state.expression.clone()
                    };
                    state.expression = format!("{} =", base);
                }
            }
        }

        state.waiting_for_second_operand = false;
        state
    }

    pub fn clear(self) -> Self {
        Self::new()
    }

    /// Drop the last character of the display.
    ///
    /// The trace loses the same text: if it ends with the old display, that
    /// suffix is replaced by the shortened display; otherwise (e.g. a
    /// completed `"12 + 3 ="` trace) one trailing character is dropped.
    pub fn backspace(self) -> Self {
        if self.is_error() || (self.waiting_for_second_operand && self.operator.is_some()) {
            return self;
        }
        let mut state = self;

        let mut display = state.display_value.clone();
        let mut expression = state.expression.clone();
        if display != "0" {
            display.pop();
            match expression.strip_suffix(state.display_value.as_str()) {
                Some(prefix) => expression = format!("{}{}", prefix, display),
                None => {
                    expression.pop();
                }
            }
        }

        if display.is_empty() || display == "-" {
            display = "0".to_string();
        }
        if expression.is_empty() && display != "0" {
            expression = display.clone();
        } else if display == "0" && expression == "0" {
            expression.clear();
        }

        state.expression = expression.trim_end().to_string();
        state.display_value = display;
        state
    }

    /// Trace for the operand currently being entered
    fn entry_expression(&self) -> String {
        match (self.first_operand, self.operator) {
            (Some(first), Some(op)) if self.waiting_for_second_operand => {
                format!("{} {}", format_number(first), op.symbol())
            }
            (Some(first), Some(op)) => format!(
                "{} {} {}",
                format_number(first),
                op.symbol(),
                self.display_value
            ),
            _ if self.display_value == "0" => String::new(),
            _ => self.display_value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(keys: &str) -> BasicCalculator {
        BasicCalculator::new().press_all(parse_keys(keys).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let calc = BasicCalculator::new();
        assert_eq!(calc.display_value, "0");
        assert_eq!(calc.expression, "");
        assert_eq!(calc.first_operand, None);
        assert_eq!(calc.operator, None);
        assert!(!calc.waiting_for_second_operand);
    }

    #[test]
    fn test_leading_zero_replaced() {
        let calc = run("007");
        assert_eq!(calc.display_value, "7");
        assert_eq!(calc.expression, "7");
    }

    #[test]
    fn test_display_capped_at_fifteen_chars() {
        let calc = run("12345678901234567");
        assert_eq!(calc.display_value, "123456789012345");
    }

    #[test]
    fn test_single_decimal_point() {
        let calc = run("1.2.3");
        assert_eq!(calc.display_value, "1.23");
    }

    #[test]
    fn test_decimal_starts_second_operand() {
        let calc = run("5+.");
        assert_eq!(calc.display_value, "0.");
        assert_eq!(calc.expression, "5 + 0.");
    }

    #[test]
    fn test_operator_trace() {
        let calc = run("12*");
        assert_eq!(calc.expression, "12 ×");
        assert_eq!(calc.first_operand, Some(12.0));
        assert!(calc.waiting_for_second_operand);

        let calc = calc.input_digit('3');
        assert_eq!(calc.expression, "12 × 3");
        assert_eq!(calc.display_value, "3");
    }

    #[test]
    fn test_left_to_right_chain() {
        let calc = run("2+3*4=");
        assert_eq!(calc.display_value, "20");
        assert_eq!(calc.expression, "5 × 4 =");
    }

    #[test]
    fn test_changing_operator_does_not_compute() {
        let calc = run("6+-2=");
        assert_eq!(calc.display_value, "4");
        assert_eq!(calc.expression, "6 - 2 =");
    }

    #[test]
    fn test_division_by_zero_is_error() {
        let calc = run("8/0=");
        assert_eq!(calc.display_value, ERROR_DISPLAY);
        assert_eq!(calc.expression, "8 ÷ 0 =");
        assert_eq!(calc.first_operand, None);
        assert_eq!(calc.operator, None);
    }

    #[test]
    fn test_division_by_zero_while_chaining() {
        let calc = run("8/0+");
        assert!(calc.is_error());
        assert_eq!(calc.expression, "");
        assert_eq!(calc.operator, None);
    }

    #[test]
    fn test_remainder() {
        assert_eq!(run("10%4=").display_value, "2");
        assert!(run("10%0=").is_error());
    }

    #[test]
    fn test_result_rounded() {
        assert_eq!(run("1/3=").display_value, "0.333333333333");
        assert_eq!(run(".1+.2=").display_value, "0.3");
    }

    #[test]
    fn test_perform_calculation_error_kind() {
        let calc = run("8/0");
        assert_eq!(
            calc.perform_calculation(),
            Err(CalcError::Domain("Division by zero".to_string()))
        );
    }

    #[test]
    fn test_perform_calculation_without_operator() {
        let calc = run("42");
        assert_eq!(calc.perform_calculation(), Ok(42.0));
    }

    #[test]
    fn test_equals_on_bare_value_is_idempotent() {
        let calc = run("7==");
        assert_eq!(calc.display_value, "7");
        assert_eq!(calc.expression, "7 =");
    }

    #[test]
    fn test_equals_with_pending_operator_reuses_display() {
        let calc = run("5+=");
        assert_eq!(calc.display_value, "10");
        assert_eq!(calc.expression, "5 + 5 =");
    }

    #[test]
    fn test_repeated_equals_redisplays() {
        let calc = run("2+3==");
        assert_eq!(calc.display_value, "5");
        assert_eq!(calc.first_operand, Some(5.0));
        assert_eq!(calc.operator, None);
    }

    #[test]
    fn test_result_chains_into_next_operator() {
        let calc = run("2+3=*4=");
        assert_eq!(calc.display_value, "20");
        assert_eq!(calc.expression, "5 × 4 =");
    }

    #[test]
    fn test_backspace() {
        let calc = run("123<");
        assert_eq!(calc.display_value, "12");
        assert_eq!(calc.expression, "12");

        let calc = run("5<");
        assert_eq!(calc.display_value, "0");
        assert_eq!(calc.expression, "");
    }

    #[test]
    fn test_backspace_noop_while_waiting() {
        let before = run("5+");
        let after = before.clone().backspace();
        assert_eq!(before, after);
    }

    #[test]
    fn test_backspace_second_operand() {
        let calc = run("5+34<");
        assert_eq!(calc.display_value, "3");
        assert_eq!(calc.expression, "5 + 3");
    }

    #[test]
    fn test_backspace_negative_result_to_zero() {
        let calc = run("2-3=<");
        assert_eq!(calc.display_value, "0");
        assert_eq!(calc.expression, "2 - 3");
    }

    #[test]
    fn test_backspace_after_equals_trims_trace() {
        let calc = run("12+3=<");
        assert_eq!(calc.display_value, "1");
        assert_eq!(calc.expression, "12 + 3");
    }

    #[test]
    fn test_clear_resets() {
        assert_eq!(run("5+3C"), BasicCalculator::new());
    }

    #[test]
    fn test_error_requires_digit_or_clear() {
        let calc = run("1/0=");
        assert!(calc.is_error());

        // Operators, equals and backspace leave the error in place
        let still = calc.clone().set_operator(Operator::Add).equals().backspace();
        assert!(still.is_error());

        // A digit starts over
        let calc = calc.input_digit('4');
        assert_eq!(calc.display_value, "4");
        assert_eq!(calc.expression, "4");
        assert_eq!(calc.first_operand, None);
    }

    #[test]
    fn test_decimal_after_error() {
        let calc = run("1/0=.");
        assert_eq!(calc.display_value, "0.");
    }

    #[test]
    fn test_non_digit_ignored() {
        let calc = BasicCalculator::new().input_digit('a');
        assert_eq!(calc, BasicCalculator::new());
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            parse_keys("1 ÷ 2 =").unwrap(),
            vec![
                BasicKey::Digit('1'),
                BasicKey::Operator(Operator::Divide),
                BasicKey::Digit('2'),
                BasicKey::Equals,
            ]
        );
        assert!(parse_keys("1 & 2").is_err());
    }
}
