//! Expression parser for formula fields.
//!
//! A small recursive descent parser over arithmetic on numbers and named
//! variables. Variables are element ids; their values are supplied by the
//! caller as [`Bindings`] at evaluation time, so an expression is never
//! executed as code.
//!
//! # BNF Grammar
//!
//! ```bnf
//! Expression     ::= Addition
//! Addition       ::= Multiplication ( ( "+" | "-" ) Multiplication )*
//! Multiplication ::= Unary ( ( "*" | "/" ) Unary )*
//! Unary          ::= ( "+" | "-" ) Unary | Primary
//! Primary        ::= Number | Identifier | "(" Expression ")"
//! Number         ::= [0-9]+ ( "." [0-9]* )? | "." [0-9]+
//! Identifier     ::= [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Binary operators are left-associative; unary operators bind tighter than
//! any binary operator. Identifiers are case-sensitive.

use std::collections::HashMap;

/// Values bound to identifiers for one evaluation.
pub type Bindings = HashMap<String, f64>;

/// Represents a token in the expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),

    Plus,
    Minus,
    Multiply,
    Divide,

    LeftParen,
    RightParen,

    Eof,
}

/// Abstract syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl Expr {
    /// Names of all variables in the expression, first appearance first,
    /// without duplicates.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            Expr::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expr::Unary { operand, .. } => operand.collect_variables(names),
        }
    }
}

/// Lexical analyzer for tokenizing expressions.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Reads a decimal literal: `12`, `12.`, `12.5` or `.5`.
    fn read_number(&mut self) -> Result<f64, String> {
        let mut number_str = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('.') {
            number_str.push('.');
            self.advance();

            while let Some(ch) = self.current_char {
                if ch.is_ascii_digit() {
                    number_str.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if number_str == "." {
            return Err("Invalid number: .".to_string());
        }

        if matches!(self.current_char, Some(ch) if ch.is_ascii_alphabetic() || ch == '_' || ch == '.') {
            return Err(format!("Malformed number near '{}'", number_str));
        }

        number_str
            .parse::<f64>()
            .map_err(|_| format!("Invalid number: {}", number_str))
    }

    fn read_identifier(&mut self) -> String {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        identifier
    }

    pub fn next_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace();

        match self.current_char {
            None => Ok(Token::Eof),

            Some(ch) => match ch {
                '0'..='9' | '.' => Ok(Token::Number(self.read_number()?)),

                'A'..='Z' | 'a'..='z' | '_' => Ok(Token::Identifier(self.read_identifier())),

                '+' => {
                    self.advance();
                    Ok(Token::Plus)
                }
                '-' => {
                    self.advance();
                    Ok(Token::Minus)
                }
                '*' => {
                    self.advance();
                    Ok(Token::Multiply)
                }
                '/' => {
                    self.advance();
                    Ok(Token::Divide)
                }
                '(' => {
                    self.advance();
                    Ok(Token::LeftParen)
                }
                ')' => {
                    self.advance();
                    Ok(Token::RightParen)
                }

                _ => Err(format!("Unexpected character: '{}'", ch)),
            },
        }
    }
}

/// Recursive descent parser for formula expressions.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, String> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;

        Ok(Self {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<(), String> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        if std::mem::discriminant(&self.current_token) == std::mem::discriminant(&expected) {
            self.advance()
        } else {
            Err(format!("Expected {:?}, found {:?}", expected, self.current_token))
        }
    }

    /// Parses the whole input; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, String> {
        let expr = self.parse_addition()?;

        if self.current_token != Token::Eof {
            return Err(format!("Unexpected token at end: {:?}", self.current_token));
        }

        Ok(expr)
    }

    fn parse_addition(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_multiplication()?;

        while matches!(self.current_token, Token::Plus | Token::Minus) {
            let op = match self.current_token {
                Token::Plus => BinaryOp::Add,
                _ => BinaryOp::Subtract,
            };
            self.advance()?;
            let right = self.parse_multiplication()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_unary()?;

        while matches!(self.current_token, Token::Multiply | Token::Divide) {
            let op = match self.current_token {
                Token::Multiply => BinaryOp::Multiply,
                _ => BinaryOp::Divide,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        let operator = match self.current_token {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            operator,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match &self.current_token {
            Token::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expr::Number(value))
            }

            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                if self.current_token == Token::LeftParen {
                    return Err(format!("Function calls are not supported: {}", name));
                }
                Ok(Expr::Variable(name))
            }

            Token::LeftParen => {
                self.advance()?;
                let expr = self.parse_addition()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }

            _ => Err(format!("Unexpected token: {:?}", self.current_token)),
        }
    }
}

/// Walks an [`Expr`] against a set of variable bindings.
pub struct ExpressionEvaluator<'a> {
    bindings: &'a Bindings,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self { bindings }
    }

    /// Evaluates an expression tree. Division by zero follows IEEE 754
    /// (infinite or NaN results); callers decide whether those are usable.
    pub fn evaluate(&self, expr: &Expr) -> Result<f64, String> {
        match expr {
            Expr::Number(value) => Ok(*value),

            Expr::Variable(name) => self
                .bindings
                .get(name)
                .copied()
                .ok_or_else(|| format!("Unbound variable: {}", name)),

            Expr::Binary { left, operator, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;

                Ok(match operator {
                    BinaryOp::Add => left_val + right_val,
                    BinaryOp::Subtract => left_val - right_val,
                    BinaryOp::Multiply => left_val * right_val,
                    BinaryOp::Divide => left_val / right_val,
                })
            }

            Expr::Unary { operator, operand } => {
                let operand_val = self.evaluate(operand)?;

                Ok(match operator {
                    UnaryOp::Plus => operand_val,
                    UnaryOp::Minus => -operand_val,
                })
            }
        }
    }
}

/// Parses `input` in one step.
pub fn parse_expression(input: &str) -> Result<Expr, String> {
    Parser::new(input)?.parse()
}
