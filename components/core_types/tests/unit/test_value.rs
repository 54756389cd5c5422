//! Unit tests for Value

use core_types::Value;

#[test]
fn primitive_conversions() {
    assert_eq!(Value::from(true), Value::Boolean(true));
    assert_eq!(Value::from(7), Value::Smi(7));
    assert_eq!(Value::from(1.5), Value::Double(1.5));
    assert_eq!(Value::from("a"), Value::String("a".to_string()));
    assert_eq!(Value::from(String::from("b")), Value::String("b".to_string()));
}

#[test]
fn display_numbers() {
    assert_eq!(Value::Smi(-3).to_string(), "-3");
    assert_eq!(Value::Double(3.5).to_string(), "3.5");
    assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
}

#[test]
fn display_nested_array() {
    let value = Value::Array(vec![
        Value::Smi(1),
        Value::Array(vec![Value::Smi(2), Value::Smi(3)]),
    ]);
    assert_eq!(value.to_string(), "1,2,3");
}

#[test]
fn arrays_compare_elementwise() {
    let a = Value::from(vec![Value::Smi(1), Value::from("x")]);
    let b = Value::from(vec![Value::Smi(1), Value::from("x")]);
    let c = Value::from(vec![Value::from("x"), Value::Smi(1)]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn smi_and_double_are_distinct() {
    assert_ne!(Value::Smi(1), Value::Double(1.0));
}

#[test]
fn native_objects_downcast_by_type() {
    let value = Value::native(vec![1u8, 2]);
    assert_eq!(value.downcast_native::<Vec<u8>>(), Some(vec![1, 2]));
    assert!(value.downcast_native::<String>().is_none());
    assert_eq!(value.to_string(), "[object Object]");
}

#[test]
fn native_object_held_mutably_does_not_downcast() {
    let value = Value::native(String::from("busy"));
    if let Value::NativeObject(object) = &value {
        let _held = object.borrow_mut();
        assert_eq!(value.downcast_native::<String>(), None);
    }
    assert_eq!(value.downcast_native::<String>(), Some("busy".to_string()));
}
