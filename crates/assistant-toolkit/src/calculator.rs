//! Calculator Tool
//!
//! Evaluates arithmetic expressions without touching any general-purpose
//! interpreter. Supports `+ - * / ^`, parentheses, and unary minus.

use async_trait::async_trait;
use serde_json::json;

use assistant_core::{
    ParameterSchema, Result, Tool, ToolCall, ToolOutcome, ToolSchema,
};

/// Tool for evaluating mathematical expressions
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculator".into(),
            description: "Evaluate mathematical expressions safely. \
                Return the result in plain text format without LaTeX notation."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "expression",
                "Mathematical expression to evaluate (e.g., '2 + 2', '(10 * 5) / 2')",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolOutcome> {
        let expression = call.str_arg("expression").unwrap_or_default();
        if expression.trim().is_empty() {
            return Ok(ToolOutcome::failure(
                "calculator",
                "No expression provided",
            ));
        }

        match evaluate(expression) {
            Ok(value) => Ok(ToolOutcome::success(
                "calculator",
                format!("{} = {}", expression.trim(), format_number(value)),
            )
            .with_data(json!({
                "expression": expression.trim(),
                "result": value,
            }))),
            Err(e) => Ok(ToolOutcome::failure(
                "calculator",
                format!("Calculation error: {}", e),
            )),
        }
    }
}

/// Render whole results without a trailing `.0`
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{}'", literal))?;
                tokens.push(Token::Number(value));
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '^' => {
                tokens.push(Token::Caret);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            other => return Err(format!("invalid character '{}' in expression", other)),
        }
    }

    if tokens.is_empty() {
        return Err("empty expression".into());
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // sum := product { ('+' | '-') product }
    fn sum(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.product()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.product()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.product()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // product := power { ('*' | '/') power }
    fn product(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.power()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.power()?;
                }
                Token::Slash => {
                    self.advance();
                    let divisor = self.power()?;
                    if divisor == 0.0 {
                        return Err("division by zero".into());
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // power := unary [ '^' power ]   (right-associative)
    fn power(&mut self) -> std::result::Result<f64, String> {
        let base = self.unary()?;
        if self.peek() == Some(Token::Caret) {
            self.advance();
            let exponent = self.power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // unary := [ '-' ] atom
    fn unary(&mut self) -> std::result::Result<f64, String> {
        if self.peek() == Some(Token::Minus) {
            self.advance();
            return Ok(-self.unary()?);
        }
        self.atom()
    }

    // atom := number | '(' sum ')'
    fn atom(&mut self) -> std::result::Result<f64, String> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.sum()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err("missing closing parenthesis".into()),
                }
            }
            Some(token) => Err(format!("unexpected token {:?}", token)),
            None => Err("unexpected end of expression".into()),
        }
    }
}

fn evaluate(expr: &str) -> std::result::Result<f64, String> {
    let mut parser = Parser {
        tokens: tokenize(expr)?,
        pos: 0,
    };
    let value = parser.sum()?;

    if parser.pos != parser.tokens.len() {
        return Err("trailing input after expression".into());
    }
    if !value.is_finite() {
        return Err("result is not a finite number".into());
    }

    Ok(value)
}
