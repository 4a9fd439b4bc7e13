/*
 * evaluate.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Folding constant host expressions.
 */

//! Compile-time evaluation of simple expressions.
//!
//! Only expressions whose value is certain are folded. Identifiers resolve
//! through program-level `const` bindings; anything else makes the whole
//! expression inconclusive.

use std::fmt;

use crate::ast::{ExprId, ExprKind, HostAst};

const MAX_DEPTH: usize = 64;

/// A primitive value known at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl ConstValue {
    fn truthy(&self) -> bool {
        match self {
            ConstValue::String(s) => !s.is_empty(),
            ConstValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ConstValue::Boolean(b) => *b,
            ConstValue::Null => false,
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            ConstValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            ConstValue::Number(n) => *n,
            ConstValue::Boolean(b) => f64::from(u8::from(*b)),
            ConstValue::Null => 0.0,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::String(s) => f.write_str(s),
            ConstValue::Number(n) if n.is_nan() => f.write_str("NaN"),
            ConstValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Also covers negative zero.
            ConstValue::Number(n) if *n == 0.0 => f.write_str("0"),
            ConstValue::Number(n) => write!(f, "{n}"),
            ConstValue::Boolean(b) => write!(f, "{b}"),
            ConstValue::Null => f.write_str("null"),
        }
    }
}

/// Evaluate `expr`, or `None` when its value cannot be known statically.
pub fn evaluate(ast: &HostAst, expr: ExprId) -> Option<ConstValue> {
    Evaluator { ast }.eval(expr, 0)
}

struct Evaluator<'a> {
    ast: &'a HostAst,
}

impl Evaluator<'_> {
    fn eval(&self, id: ExprId, depth: usize) -> Option<ConstValue> {
        if depth > MAX_DEPTH {
            tracing::trace!(expr = id.index(), "evaluation depth exceeded");
            return None;
        }
        let depth = depth + 1;
        match &self.ast.expr(id).kind {
            ExprKind::String(s) => Some(ConstValue::String(s.clone())),
            ExprKind::Number(n) => Some(ConstValue::Number(*n)),
            ExprKind::Boolean(b) => Some(ConstValue::Boolean(*b)),
            ExprKind::Null => Some(ConstValue::Null),
            ExprKind::Parenthesized(inner) => self.eval(*inner, depth),
            ExprKind::Identifier(name) => {
                let bound = self.ast.binding(name)?;
                self.eval(bound, depth)
            }
            ExprKind::Template {
                quasis,
                substitutions,
            } => {
                let mut out = String::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(sub) = substitutions.get(i) {
                        out.push_str(&self.eval(*sub, depth)?.to_string());
                    }
                }
                Some(ConstValue::String(out))
            }
            ExprKind::Unary { operator, argument } => {
                let value = self.eval(*argument, depth)?;
                match operator.as_str() {
                    "-" => Some(ConstValue::Number(-value.to_number())),
                    "+" => Some(ConstValue::Number(value.to_number())),
                    "!" => Some(ConstValue::Boolean(!value.truthy())),
                    _ => None,
                }
            }
            ExprKind::Binary {
                operator,
                left,
                right,
            } => self.binary(operator, *left, *right, depth),
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(*test, depth)?.truthy() {
                    self.eval(*consequent, depth)
                } else {
                    self.eval(*alternate, depth)
                }
            }
            ExprKind::TaggedTemplate(_) | ExprKind::Other => None,
        }
    }

    fn binary(&self, operator: &str, left: ExprId, right: ExprId, depth: usize) -> Option<ConstValue> {
        let lhs = self.eval(left, depth)?;
        match operator {
            "||" if lhs.truthy() => return Some(lhs),
            "&&" if !lhs.truthy() => return Some(lhs),
            "??" if lhs != ConstValue::Null => return Some(lhs),
            "||" | "&&" | "??" => return self.eval(right, depth),
            _ => {}
        }

        let rhs = self.eval(right, depth)?;
        let value = match operator {
            "+" => match (&lhs, &rhs) {
                (ConstValue::String(_), _) | (_, ConstValue::String(_)) => {
                    ConstValue::String(format!("{lhs}{rhs}"))
                }
                _ => ConstValue::Number(lhs.to_number() + rhs.to_number()),
            },
            "-" => ConstValue::Number(lhs.to_number() - rhs.to_number()),
            "*" => ConstValue::Number(lhs.to_number() * rhs.to_number()),
            "/" => ConstValue::Number(lhs.to_number() / rhs.to_number()),
            "%" => ConstValue::Number(lhs.to_number() % rhs.to_number()),
            "===" => ConstValue::Boolean(lhs == rhs),
            "!==" => ConstValue::Boolean(lhs != rhs),
            _ => return None,
        };
        Some(value)
    }
}
