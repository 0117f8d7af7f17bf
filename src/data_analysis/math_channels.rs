// src/data_analysis/math_channels.rs

//! Math channels: arithmetic expressions over named log columns.
//!
//! Column names are written bare (`RPM`) when they are plain identifiers, or
//! between backticks (`` `Actual Torque` ``) otherwise. Supported operators
//! are `+ - * /`, `**` and unary minus, with the usual precedence.

use ndarray::{Array1, Zip};
use tracing::{info, warn};

use crate::config::MathChannel;
use crate::data_input::log_data::TelemetryLog;
use crate::error::{ExpressionError, TelemetryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }
}

/// Parsed math-channel expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Column(String),
    Negate(Box<Expression>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Column(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Column(name) => format!("name '{name}'"),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Power => "'**'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExpressionError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            _ if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => tokens.push((Token::Plus, start)),
            '-' => tokens.push((Token::Minus, start)),
            '/' => tokens.push((Token::Slash, start)),
            '(' => tokens.push((Token::LParen, start)),
            ')' => tokens.push((Token::RParen, start)),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    tokens.push((Token::Power, start));
                } else {
                    tokens.push((Token::Star, start));
                }
            }
            '`' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == '`')
                    .ok_or(ExpressionError::UnterminatedColumn { position: start })?;
                let name: String = chars[i + 1..i + 1 + close].iter().collect();
                tokens.push((Token::Column(name), start));
                i += close + 1;
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let mut end = i;
                while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.') {
                    end += 1;
                }
                if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
                    let mut exp_end = end + 1;
                    if exp_end < chars.len() && (chars[exp_end] == '+' || chars[exp_end] == '-') {
                        exp_end += 1;
                    }
                    if exp_end < chars.len() && chars[exp_end].is_ascii_digit() {
                        while exp_end < chars.len() && chars[exp_end].is_ascii_digit() {
                            exp_end += 1;
                        }
                        end = exp_end;
                    }
                }
                let text: String = chars[i..end].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidNumber { text: text.clone() })?;
                tokens.push((Token::Number(value), start));
                i = end;
                continue;
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut end = i;
                while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                tokens.push((Token::Column(chars[i..end].iter().collect()), start));
                i = end;
                continue;
            }
            _ => {
                return Err(ExpressionError::UnexpectedChar {
                    found: c,
                    position: start,
                })
            }
        }
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end_position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn unexpected(&self) -> ExpressionError {
        match self.tokens.get(self.pos) {
            Some((token, position)) => ExpressionError::UnexpectedToken {
                found: token.describe(),
                position: *position,
            },
            None => ExpressionError::UnexpectedToken {
                found: "end of expression".to_string(),
                position: self.end_position,
            },
        }
    }

    fn expression(&mut self) -> Result<Expression, ExpressionError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expression::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expression, ExpressionError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expression::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expression, ExpressionError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expression::Negate(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    // `**` is right-associative and binds tighter than a unary minus on its left.
    fn power(&mut self) -> Result<Expression, ExpressionError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expression::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expression, ExpressionError> {
        match self.peek() {
            Some(Token::Number(_)) | Some(Token::Column(_)) => match self.advance() {
                Some((Token::Number(n), _)) => Ok(Expression::Number(n)),
                Some((Token::Column(name), _)) => Ok(Expression::Column(name)),
                _ => Err(self.unexpected()),
            },
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.expression()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.unexpected());
                }
                self.pos += 1;
                Ok(inner)
            }
            _ => Err(self.unexpected()),
        }
    }
}

/// Intermediate value during evaluation; scalars broadcast against series.
enum Operand {
    Scalar(f64),
    Series(Array1<f64>),
}

impl Operand {
    fn combine(self, op: BinaryOp, rhs: Operand) -> Operand {
        match (self, rhs) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Operand::Scalar(op.apply(a, b)),
            (Operand::Series(a), Operand::Scalar(b)) => {
                Operand::Series(a.mapv_into(|x| op.apply(x, b)))
            }
            (Operand::Scalar(a), Operand::Series(b)) => {
                Operand::Series(b.mapv_into(|y| op.apply(a, y)))
            }
            (Operand::Series(a), Operand::Series(b)) => Operand::Series(
                Zip::from(&a)
                    .and(&b)
                    .map_collect(|&x, &y| op.apply(x, y)),
            ),
        }
    }
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            end_position: source.chars().count(),
        };
        let expression = parser.expression()?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.unexpected());
        }
        Ok(expression)
    }

    /// Column names referenced by the expression, in order of appearance.
    pub fn columns(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Number(_) => {}
            Expression::Column(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expression::Negate(inner) => inner.collect_columns(names),
            Expression::Binary { lhs, rhs, .. } => {
                lhs.collect_columns(names);
                rhs.collect_columns(names);
            }
        }
    }

    /// Evaluates element-wise over the log; the result has one value per row.
    pub fn evaluate(&self, log: &TelemetryLog) -> Result<Array1<f64>, ExpressionError> {
        Ok(match self.eval_operand(log)? {
            Operand::Scalar(value) => Array1::from_elem(log.row_count(), value),
            Operand::Series(values) => values,
        })
    }

    fn eval_operand(&self, log: &TelemetryLog) -> Result<Operand, ExpressionError> {
        match self {
            Expression::Number(n) => Ok(Operand::Scalar(*n)),
            Expression::Column(name) => log
                .channel(name)
                .map(|values| Operand::Series(values.clone()))
                .ok_or_else(|| ExpressionError::UnknownColumn(name.clone())),
            Expression::Negate(inner) => Ok(match inner.eval_operand(log)? {
                Operand::Scalar(v) => Operand::Scalar(-v),
                Operand::Series(values) => Operand::Series(values.mapv_into(|v| -v)),
            }),
            Expression::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval_operand(log)?;
                let rhs = rhs.eval_operand(log)?;
                Ok(lhs.combine(*op, rhs))
            }
        }
    }
}

/// Creates each math channel in order, so later channels may use earlier ones.
/// A channel that fails to parse or evaluate is reported and skipped.
///
/// Returns the names of the channels that were created.
pub fn apply_math_channels(log: &mut TelemetryLog, channels: &[MathChannel]) -> Vec<String> {
    if channels.is_empty() {
        return Vec::new();
    }

    info!("Creating math channels...");
    let mut created = Vec::new();
    for channel in channels {
        let result = Expression::parse(&channel.expression)
            .and_then(|expression| expression.evaluate(log))
            .map_err(|source| TelemetryError::Expression {
                channel: channel.name.clone(),
                source,
            });
        match result {
            Ok(values) => match log.insert_channel(channel.name.as_str(), values) {
                Ok(()) => {
                    info!("  Successfully created channel: '{}'", channel.name);
                    created.push(channel.name.clone());
                }
                Err(e) => warn!("  Could not store channel '{}': {}", channel.name, e),
            },
            Err(e) => {
                warn!(
                    "  {} (expression '{}'). Skipping this channel...",
                    e, channel.expression
                );
            }
        }
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn motor_log() -> TelemetryLog {
        let mut log = TelemetryLog::new(3);
        log.insert_channel("RPM", array![0.0, 955.0, 1910.0]).unwrap();
        log.insert_channel("Actual Torque", array![10.0, 100.0, 50.0])
            .unwrap();
        log.insert_channel("BSE 1 Voltage", array![0.512, 1.512, 0.612])
            .unwrap();
        log
    }

    fn math(name: &str, expression: &str) -> MathChannel {
        MathChannel {
            name: name.to_string(),
            expression: expression.to_string(),
        }
    }

    #[test]
    fn test_precedence() {
        let log = TelemetryLog::new(1);
        let eval = |src: &str| Expression::parse(src).unwrap().evaluate(&log).unwrap()[0];
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("8 / 4 / 2"), 1.0);
        assert_eq!(eval("-2 ** 2"), -4.0);
        assert_eq!(eval("2 ** 3 ** 2"), 512.0);
        assert_eq!(eval("2 ** -1"), 0.5);
        assert_eq!(eval("--3"), 3.0);
    }

    #[test]
    fn test_number_forms() {
        let log = TelemetryLog::new(1);
        let eval = |src: &str| Expression::parse(src).unwrap().evaluate(&log).unwrap()[0];
        assert_eq!(eval(".512"), 0.512);
        assert_eq!(eval("1e16"), 1e16);
        assert_eq!(eval("3.5E-2"), 0.035);
        assert_eq!(eval("9550"), 9550.0);
    }

    #[test]
    fn test_mechanical_power_channel() {
        let log = motor_log();
        let expr = Expression::parse("`Actual Torque` * RPM / 9550").unwrap();
        assert_eq!(expr.columns(), vec!["Actual Torque", "RPM"]);
        let power = expr.evaluate(&log).unwrap();
        assert_eq!(power[0], 0.0);
        assert_relative_eq!(power[1], 10.0, epsilon = 1e-12);
        assert_relative_eq!(power[2], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scalar_expression_broadcasts() {
        let log = motor_log();
        let values = Expression::parse("3 * 2").unwrap().evaluate(&log).unwrap();
        assert_eq!(values, array![6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_division_by_zero_follows_ieee() {
        let log = motor_log();
        let values = Expression::parse("100 / RPM").unwrap().evaluate(&log).unwrap();
        assert!(values[0].is_infinite());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Expression::parse("   "), Err(ExpressionError::Empty));
        assert!(matches!(
            Expression::parse("`Actual Torque * 2"),
            Err(ExpressionError::UnterminatedColumn { position: 0 })
        ));
        assert!(matches!(
            Expression::parse("RPM # 2"),
            Err(ExpressionError::UnexpectedChar { found: '#', .. })
        ));
        assert!(matches!(
            Expression::parse("(RPM + 1"),
            Err(ExpressionError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            Expression::parse("RPM 2"),
            Err(ExpressionError::UnexpectedToken { position: 4, .. })
        ));
        assert!(matches!(
            Expression::parse("1.2.3"),
            Err(ExpressionError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_unknown_column() {
        let log = motor_log();
        let err = Expression::parse("`Torque Command` / 1e16")
            .unwrap()
            .evaluate(&log)
            .unwrap_err();
        assert_eq!(err, ExpressionError::UnknownColumn("Torque Command".to_string()));
    }

    #[test]
    fn test_apply_in_order_and_skip_failures() {
        let mut log = motor_log();
        let created = apply_math_channels(
            &mut log,
            &[
                math("mech_power_kW", "`Actual Torque` * RPM / 9550"),
                math("broken", "`Missing Column` * 2"),
                math("Brake Pressure 1", "(`BSE 1 Voltage` - .512) * 3737.5"),
                math("double_power", "mech_power_kW * 2"),
            ],
        );
        assert_eq!(created, vec!["mech_power_kW", "Brake Pressure 1", "double_power"]);
        assert!(!log.has_channel("broken"));
        assert_relative_eq!(log.channel("double_power").unwrap()[1], 20.0, epsilon = 1e-12);
        assert_relative_eq!(
            log.channel("Brake Pressure 1").unwrap()[1],
            3737.5,
            epsilon = 1e-9
        );
    }
}

// src/data_analysis/math_channels.rs
