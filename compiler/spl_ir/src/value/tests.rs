#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_default_is_unset() {
    assert_eq!(Value::default(), Value::Unset);
    assert!(Value::default().is_unset());
}

#[test]
fn test_equality_compares_tag_then_payload() {
    assert_eq!(Value::from(3), Value::Number(3));
    assert_ne!(Value::from(3), Value::from(4));
    assert_ne!(Value::from(1), Value::from(true));
    assert_ne!(Value::from(0), Value::from(false));
    assert_eq!(Value::Unset, Value::Unset);
    assert_ne!(Value::Unset, Value::from(0));
}

#[test]
fn test_accessors_report_mismatch() {
    assert_eq!(Value::from(5).as_number(), Ok(5));
    assert_eq!(
        Value::from(true).as_number(),
        Err(TypeMismatch {
            expected: ValueTag::Number,
            found: ValueTag::Boolean,
        })
    );
    assert_eq!(Value::from(false).as_boolean(), Ok(false));
    assert!(Value::Unset.as_boolean().is_err());
    let id = FunctionId::new(2);
    assert_eq!(Value::from(id).as_function(), Ok(id));
    assert!(Value::from(2).as_function().is_err());
}

#[test]
fn test_coerce_to_boolean() {
    assert_eq!(Value::from(0).coerce_to_boolean(), Ok(false));
    assert_eq!(Value::from(-7).coerce_to_boolean(), Ok(true));
    assert_eq!(Value::from(true).coerce_to_boolean(), Ok(true));
    assert_eq!(
        Value::Unset.coerce_to_boolean(),
        Err(TypeMismatch {
            expected: ValueTag::Boolean,
            found: ValueTag::Unset,
        })
    );
    assert!(Value::from(FunctionId::new(0)).coerce_to_boolean().is_err());
}

#[test]
fn test_display() {
    assert_eq!(Value::from(-12).to_string(), "-12");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::from(FunctionId::new(0)).to_string(), "<function>");
    assert_eq!(Value::Unset.to_string(), "UNSET");
}

#[test]
fn test_type_mismatch_message() {
    let err = Value::Unset.as_number().unwrap_err();
    assert_eq!(err.to_string(), "type mismatch: expected number, found unset");
}
