use std::cmp::Ordering;

use super::domain::{FieldValue, Profile};
use super::scheme::{Condition, Operator};

/// Evaluates one condition against the profile.
///
/// Total over every operand pair: unknown operands, type mismatches and
/// unrecognised operators all resolve to `false`.
pub fn evaluate(profile: &Profile, condition: &Condition) -> bool {
    let actual = profile.get(&condition.field);
    let expected = &condition.value;

    match &condition.op {
        Operator::Equals => equals(actual, expected),
        Operator::NotEquals => not_equals(actual, expected),
        Operator::LessThan => compare(actual, expected).is_some_and(Ordering::is_lt),
        Operator::LessOrEqual => compare(actual, expected).is_some_and(Ordering::is_le),
        Operator::GreaterThan => compare(actual, expected).is_some_and(Ordering::is_gt),
        Operator::GreaterOrEqual => compare(actual, expected).is_some_and(Ordering::is_ge),
        Operator::In => member_of(actual, expected),
        Operator::Exists => exists(actual, expected),
        Operator::Unrecognized(_) => false,
    }
}

fn equals(actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Unknown, _) | (_, FieldValue::Unknown) => false,
        (FieldValue::Integer(left), FieldValue::Integer(right)) => left == right,
        (FieldValue::Text(left), FieldValue::Text(right)) => left == right,
        (FieldValue::Boolean(left), FieldValue::Boolean(right)) => left == right,
        (FieldValue::List(left), FieldValue::List(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(left, right)| equals(left, right))
        }
        _ => match (actual.as_number(), expected.as_number()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        },
    }
}

fn not_equals(actual: &FieldValue, expected: &FieldValue) -> bool {
    actual.is_known() && expected.is_known() && !equals(actual, expected)
}

fn compare(actual: &FieldValue, expected: &FieldValue) -> Option<Ordering> {
    match (actual, expected) {
        (FieldValue::Integer(left), FieldValue::Integer(right)) => Some(left.cmp(right)),
        _ => actual.as_number()?.partial_cmp(&expected.as_number()?),
    }
}

fn member_of(actual: &FieldValue, expected: &FieldValue) -> bool {
    match expected {
        FieldValue::List(items) => items.iter().any(|item| equals(actual, item)),
        _ => false,
    }
}

fn exists(actual: &FieldValue, expected: &FieldValue) -> bool {
    match expected {
        FieldValue::Boolean(required) => actual.is_known() == *required,
        _ => false,
    }
}
