//! Tokenizer and recursive-descent parser for the closed expression grammar
//!
//! Names are resolved while parsing, so an AST can only ever refer to the
//! fixed constant and function tables.

use num_bigint::BigInt;

use crate::core::value::MAX_INT_DIGITS;
use crate::core::{Constant, EvalError, EvalResult, Function, Operation, Value};

/// Deepest nesting of parentheses, calls, signs and exponents accepted
pub const MAX_NESTING: usize = 200;
/// Most tokens one expression may hold
pub const MAX_TOKENS: usize = 1000;

/// Token types from lexical analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(Value),
    /// Identifier (constant or function name)
    Name(String),
    /// Binary operator (`+` and `-` double as unary signs)
    Operator(Operation),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

/// Abstract Syntax Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(Value),
    /// Named constant
    Constant(Constant),
    /// Binary operation
    BinaryOp {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: Operation,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
    /// Single-argument function call
    Call {
        /// Function being called
        func: Function,
        /// Argument expression
        arg: Box<AstNode>,
    },
}

impl AstNode {
    /// Creates a new number node
    #[must_use]
    pub fn number(value: Value) -> Self {
        Self::Number(value)
    }

    /// Creates a new binary operation node
    #[must_use]
    pub fn binary(left: AstNode, op: Operation, right: AstNode) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a new negation node
    #[must_use]
    pub fn negate(inner: AstNode) -> Self {
        Self::Negate(Box::new(inner))
    }

    /// Creates a new call node
    #[must_use]
    pub fn call(func: Function, arg: AstNode) -> Self {
        Self::Call {
            func,
            arg: Box::new(arg),
        }
    }
}

/// Tokenizer for converting expression strings to tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the entire input
    pub fn tokenize(&mut self) -> EvalResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            if tokens.len() == MAX_TOKENS {
                return Err(EvalError::Syntax(format!(
                    "expression longer than {MAX_TOKENS} tokens"
                )));
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input
    pub fn next_token(&mut self) -> EvalResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => self.read_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.read_name(),
            '+' => {
                self.advance();
                Token::Operator(Operation::Add)
            }
            '-' => {
                self.advance();
                Token::Operator(Operation::Subtract)
            }
            '*' => {
                self.advance();
                if self.current_char() == Some('*') {
                    self.advance();
                    Token::Operator(Operation::Power)
                } else {
                    Token::Operator(Operation::Multiply)
                }
            }
            '/' => {
                self.advance();
                Token::Operator(Operation::Divide)
            }
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            _ => {
                return Err(EvalError::Syntax(format!("unexpected character '{ch}'")));
            }
        };

        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn skip_digits(&mut self) -> usize {
        let mut count = 0;
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            count += 1;
        }
        count
    }

    fn read_number(&mut self) -> EvalResult<Token> {
        let start = self.pos;
        let mut digits = self.skip_digits();
        let mut is_float = false;

        if self.current_char() == Some('.') {
            is_float = true;
            self.advance();
            digits += self.skip_digits();
        }

        if digits == 0 {
            return Err(EvalError::Syntax("lone '.'".into()));
        }

        // An exponent only counts when digits follow; "2e" is 2 followed by the name e
        if matches!(self.current_char(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_char(1) {
                Some('+' | '-') => self.peek_char(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.advance();
                if matches!(self.current_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];

        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| EvalError::Syntax(format!("invalid number '{text}'")))?;
            return Ok(Token::Number(Value::Float(value)));
        }

        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(EvalError::Syntax(format!(
                "leading zeros in integer literal '{text}'"
            )));
        }

        if text.len() > MAX_INT_DIGITS {
            return Err(EvalError::Syntax(format!(
                "integer literal longer than {MAX_INT_DIGITS} digits"
            )));
        }

        text.parse::<BigInt>()
            .map(|n| Token::Number(Value::Int(n)))
            .map_err(|_| EvalError::Syntax(format!("invalid number '{text}'")))
    }

    fn read_name(&mut self) -> Token {
        let start = self.pos;
        while self
            .current_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Token::Name(self.input[start..self.pos].to_string())
    }
}

/// Recursive descent parser for expressions
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= factor (('*' | '/') factor)*
/// factor     ::= ('+' | '-') factor | power
/// power      ::= primary ('**' factor)?     // right associative
/// primary    ::= NUMBER | NAME | NAME '(' expression ')' | '(' expression ')'
/// ```
///
/// Every recursive path passes through `factor`, so counting entries there
/// bounds the recursion at [`MAX_NESTING`].
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Creates a new parser from tokens
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses a string expression into an AST
    pub fn parse_str(input: &str) -> EvalResult<AstNode> {
        let tokens = Tokenizer::new(input).tokenize()?;
        Self::new(tokens).parse()
    }

    /// Parses all tokens into a single AST
    pub fn parse(&mut self) -> EvalResult<AstNode> {
        if self.tokens.is_empty() {
            return Err(EvalError::Syntax("empty expression".into()));
        }

        let ast = self.parse_expression()?;

        if let Some(token) = self.current() {
            return Err(EvalError::Syntax(format!(
                "unexpected {token:?} at position {}",
                self.pos
            )));
        }

        Ok(ast)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expression(&mut self) -> EvalResult<AstNode> {
        let mut left = self.parse_term()?;

        while let Some(Token::Operator(op @ (Operation::Add | Operation::Subtract))) =
            self.current()
        {
            let op = *op;
            self.advance();
            let right = self.parse_term()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> EvalResult<AstNode> {
        let mut left = self.parse_factor()?;

        while let Some(Token::Operator(op @ (Operation::Multiply | Operation::Divide))) =
            self.current()
        {
            let op = *op;
            self.advance();
            let right = self.parse_factor()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> EvalResult<AstNode> {
        if self.depth == MAX_NESTING {
            return Err(EvalError::Syntax("too many nested parentheses".into()));
        }
        self.depth += 1;
        let factor = self.parse_signed();
        self.depth -= 1;
        factor
    }

    fn parse_signed(&mut self) -> EvalResult<AstNode> {
        match self.current() {
            Some(Token::Operator(Operation::Subtract)) => {
                self.advance();
                Ok(AstNode::negate(self.parse_factor()?))
            }
            Some(Token::Operator(Operation::Add)) => {
                self.advance();
                self.parse_factor()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> EvalResult<AstNode> {
        let base = self.parse_primary()?;

        if matches!(self.current(), Some(Token::Operator(Operation::Power))) {
            self.advance();
            // The exponent may carry its own sign: 2**-1
            let exponent = self.parse_factor()?;
            return Ok(AstNode::binary(base, Operation::Power, exponent));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> EvalResult<AstNode> {
        let token = self
            .advance()
            .ok_or_else(|| EvalError::Syntax("unexpected end of expression".into()))?;

        match token {
            Token::Number(n) => Ok(AstNode::number(n)),
            Token::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect_right_paren()?;
                Ok(expr)
            }
            Token::Name(name) => {
                if matches!(self.current(), Some(Token::LeftParen)) {
                    self.advance();
                    let func = Self::resolve_function(&name)?;
                    let arg = self.parse_expression()?;
                    self.expect_right_paren()?;
                    Ok(AstNode::call(func, arg))
                } else {
                    Self::resolve_constant(&name).map(AstNode::Constant)
                }
            }
            Token::Operator(_) | Token::RightParen => {
                Err(EvalError::Syntax(format!("unexpected token {token:?}")))
            }
        }
    }

    fn expect_right_paren(&mut self) -> EvalResult<()> {
        match self.advance() {
            Some(Token::RightParen) => Ok(()),
            Some(t) => Err(EvalError::Syntax(format!("expected ')' but found {t:?}"))),
            None => Err(EvalError::Syntax("unclosed parenthesis".into())),
        }
    }

    fn resolve_function(name: &str) -> EvalResult<Function> {
        if let Some(func) = Function::from_name(name) {
            return Ok(func);
        }
        if Constant::from_name(name).is_some() {
            return Err(EvalError::Type(format!("'{name}' is not callable")));
        }
        Err(EvalError::UnknownIdentifier(name.to_string()))
    }

    fn resolve_constant(name: &str) -> EvalResult<Constant> {
        if let Some(constant) = Constant::from_name(name) {
            return Ok(constant);
        }
        if Function::from_name(name).is_some() {
            return Err(EvalError::Type(format!("function '{name}' used as a value")));
        }
        Err(EvalError::UnknownIdentifier(name.to_string()))
    }
}
