use opl_dat::{key, row, Number, Row, Scalar};

#[test]
fn test_row_macro_empty() {
    let r = row! {};
    assert!(r.is_empty());
    assert_eq!(r, Row::new());
}

#[test]
fn test_row_macro_values() {
    let r = row! { "capacity" => 100, "cost" => 2.5, "label" => "main" };
    assert_eq!(r.len(), 3);
    assert_eq!(r.get("capacity"), Some(&Scalar::Number(Number::Integer(100))));
    assert_eq!(r.get("cost"), Some(&Scalar::Number(Number::Float(2.5))));
    assert_eq!(r.get("label"), Some(&Scalar::Text("main".to_string())));
}

#[test]
fn test_row_macro_keeps_field_order() {
    let r = row! { "z" => 1, "a" => 2, "m" => 3, };
    let fields: Vec<_> = r.fields().cloned().collect();
    assert_eq!(fields, vec!["z", "a", "m"]);
}

#[test]
fn test_row_macro_last_value_wins() {
    let r = row! { "v" => 1, "v" => 2 };
    assert_eq!(r.len(), 1);
    assert_eq!(r.get("v").and_then(Scalar::as_i64), Some(2));
}

#[test]
fn test_row_macro_with_expressions() {
    let base = 40;
    let name = String::from("hub");
    let r = row! { "weight" => base + 2, "node" => name.clone(), "cap" => Scalar::infinity() };
    assert_eq!(r.get("weight").and_then(Scalar::as_i64), Some(42));
    assert_eq!(r.get("node").and_then(Scalar::as_str), Some("hub"));
    assert!(r
        .get("cap")
        .and_then(Scalar::as_number)
        .map_or(false, Number::is_infinite));
}

#[test]
fn test_key_macro() {
    assert!(key![].is_empty());
    assert_eq!(
        key!["Detroit", 3, 0.5],
        vec![
            Scalar::from("Detroit"),
            Scalar::Number(Number::Integer(3)),
            Scalar::Number(Number::Float(0.5)),
        ]
    );
    assert_eq!(key!["a",], vec![Scalar::from("a")]);
}

#[test]
fn test_whole_float_key_matches_integer_key() {
    assert_eq!(key![2.0], key![2]);
}
