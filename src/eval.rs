use crate::settings::{AllowedOperations, Settings};
use thiserror::Error;
use tracing::debug;

pub fn evaluate(input: &str, settings: &Settings) -> Result<f64, EvalError> {
    let expression = Expression::parse(input, &settings.allowed_operations)?;
    debug!(?expression, "parsed expression");
    expression.compute()
}

#[derive(Error, Debug, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    MalformedExpression(#[from] Malformed),
    #[error("Operation '{0}' not allowed by settings")]
    OperationNotAllowed(String),
    #[error("Unknown {arity} operator: {token}")]
    UnknownOperator { arity: Arity, token: String },
    #[error("Cannot take square root of negative number")]
    DomainError,
    #[error("Attempted to divide by zero")]
    DivisionByZero,
}

#[derive(Error, Debug, PartialEq)]
pub enum Malformed {
    #[error("Cannot parse number: {0}")]
    NotANumber(String),
    #[error("Expression not recognized. Use 'a op b' or 'sqrt a'")]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Unary => f.write_str("unary"),
            Arity::Binary => f.write_str("binary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Sqrt,
}

impl UnaryOperator {
    /// Expects an already lower-cased token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "sqrt" => Some(Self::Sqrt),
            _ => None,
        }
    }

    pub fn apply(self, operand: f64) -> Result<f64, EvalError> {
        match self {
            Self::Sqrt if operand < 0.0 => Err(EvalError::DomainError),
            Self::Sqrt => Ok(operand.sqrt()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    /// Binary symbols are matched case-sensitively; `x` is an alias for `*`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" | "x" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "^" => Some(Self::Pow),
            _ => None,
        }
    }

    pub fn apply(self, left: f64, right: f64) -> Result<f64, EvalError> {
        let result = match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            // infinity is never a valid quotient
            Self::Div if right == 0.0 => return Err(EvalError::DivisionByZero),
            Self::Div => left / right,
            Self::Pow => left.powf(right),
        };
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expression {
    Literal(f64),
    Unary {
        op: UnaryOperator,
        operand: f64,
    },
    Binary {
        left: f64,
        op: BinaryOperator,
        right: f64,
    },
}

impl Expression {
    /// Parses one line of input. The operator is checked against `allowed`
    /// before any operand is looked at.
    pub fn parse(input: &str, allowed: &AllowedOperations) -> Result<Self, EvalError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();

        match tokens.as_slice() {
            [literal] => Ok(Self::Literal(parse_number(literal)?)),
            [op, operand] => {
                let op = op.to_lowercase();
                check_allowed(&op, allowed)?;
                let operand = parse_number(operand)?;
                let op = UnaryOperator::from_token(&op).ok_or(EvalError::UnknownOperator {
                    arity: Arity::Unary,
                    token: op,
                })?;
                Ok(Self::Unary { op, operand })
            }
            [left, op, right] => {
                check_allowed(op, allowed)?;
                let left = parse_number(left)?;
                let right = parse_number(right)?;
                let op = BinaryOperator::from_token(op).ok_or_else(|| {
                    EvalError::UnknownOperator {
                        arity: Arity::Binary,
                        token: op.to_string(),
                    }
                })?;
                Ok(Self::Binary { left, op, right })
            }
            _ => Err(EvalError::from(Malformed::Unrecognized)),
        }
    }

    pub fn compute(&self) -> Result<f64, EvalError> {
        match *self {
            Self::Literal(value) => Ok(value),
            Self::Unary { op, operand } => op.apply(operand),
            Self::Binary { left, op, right } => op.apply(left, right),
        }
    }
}

fn check_allowed(op: &str, allowed: &AllowedOperations) -> Result<(), EvalError> {
    if allowed.permits(op) {
        Ok(())
    } else {
        Err(EvalError::OperationNotAllowed(op.to_string()))
    }
}

fn parse_number(token: &str) -> Result<f64, Malformed> {
    match token.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(Malformed::NotANumber(token.to_string())),
    }
}
