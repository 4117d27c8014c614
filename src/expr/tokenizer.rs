//! Expression tokenizer
//!
//! Converts expression strings like "sin(x) * 2^3" into a sequence of tokens
//! that can be parsed into an AST.

/// A token in an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal (e.g., 123, 45.67, .5, 1.5e10)
    Number(f64),
    /// A function or variable name
    Identifier(String),
    /// Arithmetic operators: + - * / ^
    Operator(char),
    /// Opening parenthesis
    OpenParen,
    /// Closing parenthesis
    CloseParen,
    /// Comma separator for function arguments
    Comma,
}

/// Error during tokenization
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizeError {
    pub message: String,
    pub position: usize,
}

impl TokenizeError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tokenize error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenizer for expressions
pub struct Tokenizer {
    chars: Vec<char>,
    position: usize,
}

impl Tokenizer {
    /// Create a new tokenizer for the given expression string
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire expression into a vector of tokens
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Get the next token, or None if at end of input
    fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let token = match c {
            '(' => {
                self.advance();
                Token::OpenParen
            }
            ')' => {
                self.advance();
                Token::CloseParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }

            '+' | '-' | '*' | '/' | '^' => {
                self.advance();
                Token::Operator(c)
            }

            // Keypad glyphs
            '×' => {
                self.advance();
                Token::Operator('*')
            }
            '÷' => {
                self.advance();
                Token::Operator('/')
            }

            c if c.is_ascii_digit() => self.read_number()?,
            '.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => self.read_number()?,

            c if c.is_alphabetic() || c == '_' => self.read_identifier(),

            c => {
                return Err(TokenizeError::new(
                    format!("Unexpected character: '{}'", c),
                    self.position,
                ));
            }
        };

        Ok(Some(token))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                into.push(c);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a number (integer, decimal, or scientific notation)
    fn read_number(&mut self) -> Result<Token, TokenizeError> {
        let start_pos = self.position;
        let mut num_str = String::new();

        self.read_digits(&mut num_str);

        if self.peek() == Some('.') {
            num_str.push('.');
            self.advance();
            self.read_digits(&mut num_str);
        }

        // Exponent only when digits follow, so "2e" stays number + identifier
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_follows = match self.peek_at(1) {
                Some(d) if d.is_ascii_digit() => true,
                Some('+' | '-') => self.peek_at(2).is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                num_str.push('e');
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    num_str.push(sign);
                    self.advance();
                }
                self.read_digits(&mut num_str);
            }
        }

        num_str
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| TokenizeError::new(format!("Invalid number: {}", num_str), start_pos))
    }

    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        Token::Identifier(ident)
    }
}

/// Convenience function to tokenize an expression string
pub fn tokenize(text: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_number() {
        let tokens = tokenize("42").unwrap();
        assert_eq!(tokens, vec![Token::Number(42.0)]);
    }

    #[test]
    fn test_tokenize_decimal_forms() {
        assert_eq!(tokenize("3.567").unwrap(), vec![Token::Number(3.567)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn test_tokenize_scientific_notation() {
        assert_eq!(tokenize("1.5e10").unwrap(), vec![Token::Number(1.5e10)]);
        assert_eq!(tokenize("2E-5").unwrap(), vec![Token::Number(2e-5)]);
    }

    #[test]
    fn test_tokenize_number_followed_by_e_identifier() {
        assert_eq!(
            tokenize("2e").unwrap(),
            vec![Token::Number(2.0), Token::Identifier("e".to_string())]
        );
    }

    #[test]
    fn test_tokenize_function_call() {
        let tokens = tokenize("log10(x)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("log10".to_string()),
                Token::OpenParen,
                Token::Identifier("x".to_string()),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_all_operators() {
        let tokens = tokenize("+ - * / ^ × ÷").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Operator('+'),
                Token::Operator('-'),
                Token::Operator('*'),
                Token::Operator('/'),
                Token::Operator('^'),
                Token::Operator('*'),
                Token::Operator('/'),
            ]
        );
    }

    #[test]
    fn test_tokenize_negative_number_as_operator() {
        // Minus is always an operator; the parser handles unary minus
        let tokens = tokenize("-5").unwrap();
        assert_eq!(tokens, vec![Token::Operator('-'), Token::Number(5.0)]);
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn test_tokenize_error_unexpected_char() {
        let err = tokenize("2 # 3").unwrap_err();
        assert!(err.message.contains("Unexpected"));
        assert_eq!(err.position, 2);
    }
}
