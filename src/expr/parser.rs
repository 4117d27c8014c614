//! Expression parser
//!
//! Converts a sequence of tokens into an Abstract Syntax Tree (AST).
//! Uses recursive descent parsing with operator precedence:
//! `+ -` < `* /` < unary minus < `^` (right-associative).

use super::tokenizer::Token;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Subtract),
            '*' => Some(BinaryOperator::Multiply),
            '/' => Some(BinaryOperator::Divide),
            '^' => Some(BinaryOperator::Power),
            _ => None,
        }
    }
}

/// Functions the evaluator knows, resolved at parse time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Sqr,
    Log10,
    /// Natural logarithm
    Log,
    Exp,
    Abs,
    Fact,
}

impl BuiltinFunction {
    /// Look up a function by name (case-insensitive). `ln` is an alias of `log`.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name.to_ascii_lowercase().as_str() {
            "sin" => BuiltinFunction::Sin,
            "cos" => BuiltinFunction::Cos,
            "tan" => BuiltinFunction::Tan,
            "asin" => BuiltinFunction::Asin,
            "acos" => BuiltinFunction::Acos,
            "atan" => BuiltinFunction::Atan,
            "sqrt" => BuiltinFunction::Sqrt,
            "sqr" => BuiltinFunction::Sqr,
            "log10" => BuiltinFunction::Log10,
            "log" | "ln" => BuiltinFunction::Log,
            "exp" => BuiltinFunction::Exp,
            "abs" => BuiltinFunction::Abs,
            "fact" => BuiltinFunction::Fact,
            _ => return None,
        };
        Some(f)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinFunction::Sin => "sin",
            BuiltinFunction::Cos => "cos",
            BuiltinFunction::Tan => "tan",
            BuiltinFunction::Asin => "asin",
            BuiltinFunction::Acos => "acos",
            BuiltinFunction::Atan => "atan",
            BuiltinFunction::Sqrt => "sqrt",
            BuiltinFunction::Sqr => "sqr",
            BuiltinFunction::Log10 => "log10",
            BuiltinFunction::Log => "log",
            BuiltinFunction::Exp => "exp",
            BuiltinFunction::Abs => "abs",
            BuiltinFunction::Fact => "fact",
        }
    }
}

/// Abstract Syntax Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal
    Number(f64),
    /// A named variable or constant
    Variable(String),
    /// Function call: name(arg1, arg2, ...)
    FunctionCall {
        function: BuiltinFunction,
        args: Vec<Expr>,
    },
    /// Binary operation: left op right
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary minus
    Negate(Box<Expr>),
}

/// Error during parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Deepest nesting the parser accepts, counting parentheses, function calls,
/// unary signs and chained operators alike
pub const MAX_DEPTH: usize = 128;

/// A parsed subtree and its height
type Parsed = Result<(Expr, usize), ParseError>;

/// Parser for expression tokens
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse the tokens into an AST
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new("Empty expression", 0));
        }
        let (expr, _) = self.expression()?;

        if !self.is_at_end() {
            return Err(ParseError::new(
                format!("Unexpected token after expression: {:?}", self.peek()),
                self.position,
            ));
        }

        Ok(expr)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it is one of the given operators
    fn match_any_operator(&mut self, ops: &[char]) -> Option<BinaryOperator> {
        if let Some(Token::Operator(c)) = self.peek() {
            if ops.contains(c) {
                let op = BinaryOperator::from_char(*c);
                self.advance();
                return op;
            }
        }
        None
    }

    fn too_deep(&self) -> ParseError {
        ParseError::new(
            format!("Expression is nested more than {} levels deep", MAX_DEPTH),
            self.position,
        )
    }

    /// Step one level down the recursive descent
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Accept a node only if the tree stays within [`MAX_DEPTH`]
    fn node(&self, expr: Expr, height: usize) -> Parsed {
        if height > MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok((expr, height))
    }

    fn binary(&self, op: BinaryOperator, left: (Expr, usize), right: (Expr, usize)) -> Parsed {
        let height = left.1.max(right.1) + 1;
        self.node(
            Expr::BinaryOp {
                op,
                left: Box::new(left.0),
                right: Box::new(right.0),
            },
            height,
        )
    }

    fn expression(&mut self) -> Parsed {
        self.term()
    }

    /// Term: factor (( "+" | "-" ) factor)*
    fn term(&mut self) -> Parsed {
        let mut left = self.factor()?;

        while let Some(op) = self.match_any_operator(&['+', '-']) {
            let right = self.factor()?;
            left = self.binary(op, left, right)?;
        }

        Ok(left)
    }

    /// Factor: unary (( "*" | "/" ) unary)*
    fn factor(&mut self) -> Parsed {
        let mut left = self.unary()?;

        while let Some(op) = self.match_any_operator(&['*', '/']) {
            let right = self.unary()?;
            left = self.binary(op, left, right)?;
        }

        Ok(left)
    }

    /// Unary: ( "-" | "+" ) unary | power
    fn unary(&mut self) -> Parsed {
        if self.match_any_operator(&['-']).is_some() {
            self.enter()?;
            let (operand, height) = self.unary()?;
            self.leave();
            self.node(Expr::Negate(Box::new(operand)), height + 1)
        } else if self.match_any_operator(&['+']).is_some() {
            self.enter()?;
            let operand = self.unary()?;
            self.leave();
            Ok(operand)
        } else {
            self.power()
        }
    }

    /// Power: call ( "^" unary )?   (right-associative)
    fn power(&mut self) -> Parsed {
        let left = self.call()?;

        if self.match_any_operator(&['^']).is_some() {
            self.enter()?;
            let right = self.unary()?;
            self.leave();
            self.binary(BinaryOperator::Power, left, right)
        } else {
            Ok(left)
        }
    }

    /// Call: IDENTIFIER "(" arguments ")" | primary
    fn call(&mut self) -> Parsed {
        if let Some(Token::Identifier(name)) = self.peek().cloned() {
            if self.tokens.get(self.position + 1) == Some(&Token::OpenParen) {
                let function = BuiltinFunction::from_name(&name).ok_or_else(|| {
                    ParseError::new(format!("Unknown function: {}", name), self.position)
                })?;
                self.advance(); // name
                self.advance(); // (
                self.enter()?;
                let (args, height) = self.arguments()?;
                self.leave();
                if !self.match_token(&Token::CloseParen) {
                    return Err(ParseError::new(
                        "Expected ')' after function arguments",
                        self.position,
                    ));
                }
                return self.node(Expr::FunctionCall { function, args }, height + 1);
            }
        }
        self.primary()
    }

    /// Arguments: ( expr ( "," expr )* )?
    fn arguments(&mut self) -> Result<(Vec<Expr>, usize), ParseError> {
        let mut args = Vec::new();
        let mut height = 0;

        if let Some(Token::CloseParen) = self.peek() {
            return Ok((args, height));
        }

        loop {
            let (arg, arg_height) = self.expression()?;
            args.push(arg);
            height = height.max(arg_height);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok((args, height))
    }

    /// Primary: NUMBER | IDENTIFIER | "(" expr ")"
    fn primary(&mut self) -> Parsed {
        let token = self.peek().cloned();

        match token {
            Some(Token::Number(n)) => {
                self.advance();
                Ok((Expr::Number(n), 1))
            }
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok((Expr::Variable(name), 1))
            }
            Some(Token::OpenParen) => {
                self.advance();
                self.enter()?;
                let expr = self.expression()?;
                self.leave();
                if !self.match_token(&Token::CloseParen) {
                    return Err(ParseError::new(
                        "Expected ')' after expression",
                        self.position,
                    ));
                }
                Ok(expr)
            }
            Some(token) => Err(ParseError::new(
                format!("Unexpected token: {:?}", token),
                self.position,
            )),
            None => Err(ParseError::new(
                "Unexpected end of expression",
                self.position,
            )),
        }
    }
}

/// Convenience function to parse tokens into an AST
pub fn parse(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}
