//! Comparison operators for the `Compare` validator.

use std::cmp::Ordering;

use serde_json::Value;

use crate::value::{loose_cmp, loose_eq, strict_eq};

/// Operator accepted by the `operator` rule parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`: loose equality.
    Eq,
    /// `===`: strict equality.
    StrictEq,
    /// `!=`
    Ne,
    /// `!==`
    StrictNe,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl CompareOp {
    /// Parse an operator symbol. Unknown symbols yield `None`.
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "===" => Some(CompareOp::StrictEq),
            "!=" => Some(CompareOp::Ne),
            "!==" => Some(CompareOp::StrictNe),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::StrictEq => "===",
            CompareOp::Ne => "!=",
            CompareOp::StrictNe => "!==",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    /// Wording used in failure messages ("must be <relation> <target>").
    pub fn relation(&self) -> &'static str {
        match self {
            CompareOp::Eq | CompareOp::StrictEq => "equal to",
            CompareOp::Ne | CompareOp::StrictNe => "not equal to",
            CompareOp::Gt => "greater than",
            CompareOp::Ge => "greater than or equal to",
            CompareOp::Lt => "less than",
            CompareOp::Le => "less than or equal to",
        }
    }

    /// Evaluate `candidate <op> target`.
    pub fn holds(&self, candidate: Option<&Value>, target: Option<&Value>) -> bool {
        match self {
            CompareOp::Eq => loose_eq(candidate, target),
            CompareOp::StrictEq => strict_eq(candidate, target),
            CompareOp::Ne => !loose_eq(candidate, target),
            CompareOp::StrictNe => !strict_eq(candidate, target),
            CompareOp::Gt => loose_cmp(candidate, target) == Some(Ordering::Greater),
            CompareOp::Ge => matches!(
                loose_cmp(candidate, target),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompareOp::Lt => loose_cmp(candidate, target) == Some(Ordering::Less),
            CompareOp::Le => matches!(
                loose_cmp(candidate, target),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}
