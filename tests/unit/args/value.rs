use super::*;

#[test]
fn render_forms() {
    assert_eq!(Value::from("abc").render(), "abc");
    assert_eq!(Value::from(-3).render(), "-3");
    assert_eq!(Value::from(2.0).render(), "2");
    assert_eq!(Value::from(0.25).render(), "0.25");
    assert_eq!(Value::from(true).render(), "1");
    assert_eq!(Value::from(false).render(), "0");
    assert_eq!(
        Value::from(vec![Value::from("yuv420p"), Value::from("rgb24")]).render(),
        "yuv420p|rgb24"
    );
}

#[test]
fn untagged_json_picks_the_narrowest_variant() {
    let v: Vec<Value> = serde_json::from_str(r#"[true, 3, 3.5, "x", [1, "y"]]"#).unwrap();
    assert_eq!(
        v,
        vec![
            Value::Bool(true),
            Value::Int(3),
            Value::Float(3.5),
            Value::Str("x".to_string()),
            Value::List(vec![Value::Int(1), Value::Str("y".to_string())]),
        ]
    );
}

#[test]
fn integer_coercion() {
    assert_eq!(i64::from_value(&Value::from(" 12 ")), Some(12));
    assert_eq!(i64::from_value(&Value::from(4.0)), Some(4));
    assert_eq!(i64::from_value(&Value::from(4.5)), None);
    assert_eq!(i64::from_value(&Value::from("abc")), None);
    assert_eq!(i64::from_value(&Value::List(vec![])), None);
}

#[test]
fn bool_coercion() {
    assert_eq!(bool::from_value(&Value::from("true")), Some(true));
    assert_eq!(bool::from_value(&Value::from(0)), Some(false));
    assert_eq!(bool::from_value(&Value::from(2)), None);
}
