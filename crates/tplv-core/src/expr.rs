//! # Expression Model
//!
//! Already-parsed binding expressions. Templates bind output keys to one of
//! four shapes:
//!
//! - `attribute` — a direct property reference (`st:result/st:value`).
//! - `literal` — a constant.
//! - `xpath` — the single-argument wrapper function whose literal argument
//!   is a property path, bound against the feature type's namespaces.
//! - `function` — any other named function over argument expressions.
//!
//! In YAML documents each shape is written as a one-key map:
//!
//! ```yaml
//! cql: { function: { name: strConcat, args: [ { literal: "#" }, { attribute: id } ] } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Integer(i)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

/// A binding expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Direct property reference.
    Attribute(String),
    /// Constant value.
    Literal(Literal),
    /// `xpath(<literal>)`: a property path carried as a literal argument.
    #[serde(rename = "xpath")]
    XPath(Box<Expression>),
    /// Named function over ordered arguments.
    Function {
        name: String,
        #[serde(default)]
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn attribute(path: impl Into<String>) -> Self {
        Expression::Attribute(path.into())
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal(value.into())
    }

    /// `xpath('<path>')` over a text literal.
    pub fn xpath(path: impl Into<String>) -> Self {
        Expression::XPath(Box::new(Expression::Literal(Literal::Text(path.into()))))
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Attribute(path) => f.write_str(path),
            Expression::Literal(lit) => write!(f, "{lit}"),
            Expression::XPath(arg) => match arg.as_ref() {
                Expression::Literal(lit) => write!(f, "xpath('{lit}')"),
                other => write!(f, "xpath({other})"),
            },
            Expression::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
