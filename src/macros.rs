/// Builds a [`Row`](crate::Row) from `field => value` pairs.
///
/// ```rust
/// use opl_dat::{row, Scalar};
///
/// let r = row! { "capacity" => 100, "label" => "main" };
/// assert_eq!(r.get("label"), Some(&Scalar::from("main")));
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::Row::new()
    };

    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $(
            row.insert(::std::string::String::from($field), $crate::Scalar::from($value));
        )+
        row
    }};
}

/// Builds a primary-key tuple.
///
/// ```rust
/// use opl_dat::{key, Scalar};
///
/// assert_eq!(key!["Detroit", 3], vec![Scalar::from("Detroit"), Scalar::from(3)]);
/// ```
#[macro_export]
macro_rules! key {
    () => {
        ::std::vec::Vec::<$crate::Scalar>::new()
    };

    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Scalar::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Row, Scalar};

    #[test]
    fn test_row_macro() {
        assert_eq!(row! {}, Row::new());

        let r = row! { "a" => 1, "b" => 2.5, "c" => "x" };
        assert_eq!(r.len(), 3);
        assert_eq!(r.get("a"), Some(&Scalar::Number(Number::Integer(1))));
        assert_eq!(r.get("b"), Some(&Scalar::Number(Number::Float(2.5))));
        assert_eq!(r.get("c"), Some(&Scalar::Text("x".to_string())));
    }

    #[test]
    fn test_key_macro() {
        assert!(key![].is_empty());
        let k = key!["Detroit", "Boston"];
        assert_eq!(k, vec![Scalar::from("Detroit"), Scalar::from("Boston")]);
    }
}
