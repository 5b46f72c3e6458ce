//! Tree-walking interpreter

use std::borrow::Cow;

use serde_json::Value;
use swatch_core::CallContext;

use crate::ast::{CompareOp, Expr};
use crate::error::ConditionError;

/// Evaluate `expr` against `data` and reduce the result to a boolean
pub fn evaluate(ctx: &CallContext, expr: &Expr, data: &Value) -> Result<bool, ConditionError> {
    let value = eval(ctx, expr, data)?;
    Ok(truthy(&value))
}

fn eval<'a>(ctx: &CallContext, expr: &'a Expr, data: &'a Value) -> Result<Cow<'a, Value>, ConditionError> {
    ctx.check()?;

    match expr {
        Expr::Literal(value) => Ok(Cow::Borrowed(value)),
        Expr::Path(segments) => Ok(lookup(data, segments)
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Owned(Value::Null))),
        Expr::List(items) => {
            let values = items
                .iter()
                .map(|item| eval(ctx, item, data).map(Cow::into_owned))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Cow::Owned(Value::Array(values)))
        }
        Expr::Not(inner) => {
            let value = eval(ctx, inner, data)?;
            Ok(Cow::Owned(Value::Bool(!truthy(&value))))
        }
        Expr::And(items) => {
            for item in items {
                let value = eval(ctx, item, data)?;
                if !truthy(&value) {
                    return Ok(Cow::Owned(Value::Bool(false)));
                }
            }
            Ok(Cow::Owned(Value::Bool(true)))
        }
        Expr::Or(items) => {
            for item in items {
                let value = eval(ctx, item, data)?;
                if truthy(&value) {
                    return Ok(Cow::Owned(Value::Bool(true)));
                }
            }
            Ok(Cow::Owned(Value::Bool(false)))
        }
        Expr::Compare { op, left, right } => {
            let left = eval(ctx, left, data)?;
            let right = eval(ctx, right, data)?;
            compare(*op, &left, &right).map(|b| Cow::Owned(Value::Bool(b)))
        }
    }
}

/// Walk a dotted path; numeric segments index into arrays
fn lookup<'a>(data: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y))
        }
        _ => left == right,
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, ConditionError> {
    let mismatch = || ConditionError::TypeMismatch {
        op,
        left: type_name(left),
        right: type_name(right),
    };

    match op {
        CompareOp::Eq => Ok(equals(left, right)),
        CompareOp::Ne => Ok(!equals(left, right)),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
            let ordering = match (left, right) {
                (Value::Number(a), Value::Number(b)) => a
                    .as_f64()
                    .zip(b.as_f64())
                    .and_then(|(a, b)| a.partial_cmp(&b)),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => return Err(mismatch()),
            };
            let Some(ordering) = ordering else {
                return Ok(false);
            };
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Le => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            })
        }
        CompareOp::In => contains(right, left).ok_or_else(mismatch),
        CompareOp::NotIn => contains(right, left).map(|found| !found).ok_or_else(mismatch),
        CompareOp::Contains => match (left, right) {
            (Value::String(_) | Value::Array(_) | Value::Null, _) => {
                contains(left, right).ok_or_else(mismatch)
            }
            _ => Err(mismatch()),
        },
        CompareOp::StartsWith | CompareOp::EndsWith => match (left, right) {
            (Value::Null, _) => Ok(false),
            (Value::String(s), Value::String(affix)) => Ok(if op == CompareOp::StartsWith {
                s.starts_with(affix.as_str())
            } else {
                s.ends_with(affix.as_str())
            }),
            _ => Err(mismatch()),
        },
    }
}

/// Membership of `needle` in `haystack`. `None` when the haystack cannot
/// contain anything; a missing (null) haystack contains nothing.
fn contains(haystack: &Value, needle: &Value) -> Option<bool> {
    match haystack {
        Value::Null => Some(false),
        Value::Array(items) => Some(items.iter().any(|item| equals(item, needle))),
        Value::String(s) => match needle {
            Value::String(n) => Some(s.contains(n.as_str())),
            Value::Null => Some(false),
            _ => None,
        },
        _ => None,
    }
}
