//! Tests for deep merge.

#[cfg(test)]
mod tests {
    use crate::merge::{merge, merge_values};
    use crate::value::{from_json, to_json, Map, Value};
    use pretty_assertions::assert_eq;
    use std::borrow::Cow;

    fn map(json: &str) -> Map {
        match from_json(json).expect("fixture should be valid JSON") {
            Value::Map(m) => m,
            other => panic!("fixture is not a map: {:?}", other),
        }
    }

    #[test]
    fn test_merge_no_sources_is_empty() {
        let merged = merge::<Map>(&[]);
        assert!(matches!(merged, Cow::Owned(_)));
        assert_eq!(merged.into_owned(), Map::new());
    }

    #[test]
    fn test_merge_single_source_is_identity() {
        let obj = map(r#"{"a": {"b": 1}}"#);
        let snapshot = obj.clone();

        let merged = merge(&[&obj]);
        match merged {
            Cow::Borrowed(r) => assert!(std::ptr::eq(r, &obj)),
            Cow::Owned(_) => panic!("single source should be returned as-is"),
        }
        assert_eq!(obj, snapshot);
    }

    #[test]
    fn test_merge_disjoint_keys_is_union() {
        let a = map(r#"{"a": 1, "b": {"c": "x"}}"#);
        let b = map(r#"{"d": [1, 2], "e": null}"#);
        assert_eq!(
            merge(&[&a, &b]).into_owned(),
            map(r#"{"a": 1, "b": {"c": "x"}, "d": [1, 2], "e": null}"#)
        );
    }

    #[test]
    fn test_merge_later_scalar_wins() {
        let a = map(r#"{"a": 1, "b": 1}"#);
        let b = map(r#"{"a": 0, "c": 1}"#);
        assert_eq!(
            merge(&[&a, &b]).into_owned(),
            map(r#"{"a": 0, "b": 1, "c": 1}"#)
        );
        assert_eq!(
            merge(&[&map(r#"{"a": 1}"#), &map(r#"{"a": 2}"#)]).into_owned(),
            map(r#"{"a": 2}"#)
        );
    }

    #[test]
    fn test_merge_scalar_overrides_record() {
        let a = map(r#"{"a": {"b": 1}}"#);
        let b = map(r#"{"a": 1}"#);
        assert_eq!(merge(&[&a, &b]).into_owned(), map(r#"{"a": 1}"#));
    }

    #[test]
    fn test_merge_record_overrides_scalar() {
        let a = map(r#"{"a": 1}"#);
        let b = map(r#"{"a": {"b": 1}}"#);
        assert_eq!(merge(&[&a, &b]).into_owned(), map(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_merge_list_overrides_record() {
        let a = map(r#"{"a": {"b": 1}}"#);
        let b = map(r#"{"a": [{"c": 1}]}"#);
        assert_eq!(merge(&[&a, &b]).into_owned(), map(r#"{"a": [{"c": 1}]}"#));
    }

    #[test]
    fn test_merge_deep() {
        let a = map(r#"{"a": 1, "b": {"c": 1, "d": {"e": 1}, "f": {"g": 1}}}"#);
        let b = map(r#"{"b": {"c": 0, "d": 0, "f": {"h": 1}, "i": 1}}"#);
        assert_eq!(
            merge(&[&a, &b]).into_owned(),
            map(r#"{"a": 1, "b": {"c": 0, "d": 0, "f": {"g": 1, "h": 1}, "i": 1}}"#)
        );
    }

    #[test]
    fn test_merge_three_layers() {
        let a = map(r#"{"x": {"y": 1, "z": 1}}"#);
        let b = map(r#"{"x": {"y": 2}}"#);
        let c = map(r#"{"x": {"w": 3}, "v": true}"#);
        assert_eq!(
            merge(&[&a, &b, &c]).into_owned(),
            map(r#"{"x": {"y": 2, "z": 1, "w": 3}, "v": true}"#)
        );
    }

    #[test]
    fn test_merge_keys_in_first_seen_order() {
        let a = map(r#"{"z": 1, "b": {"y": 1, "c": 1}}"#);
        let b = map(r#"{"a": 1, "b": {"x": 1, "y": 2}, "z": 2}"#);
        let merged = Value::Map(merge(&[&a, &b]).into_owned());
        assert_eq!(
            to_json(&merged).unwrap(),
            r#"{"z":2,"b":{"y":2,"c":1,"x":1},"a":1}"#
        );
    }

    #[test]
    fn test_merge_does_not_mutate_sources() {
        let a = map(r#"{"a": 1, "b": {"c": 1, "d": {"e": 1}}}"#);
        let b = map(r#"{"a": 0, "b": {"d": {"f": 1}}}"#);
        let (a_copy, b_copy) = (a.clone(), b.clone());

        let _ = merge(&[&a, &b]);

        assert_eq!(a, a_copy);
        assert_eq!(b, b_copy);
    }

    #[test]
    fn test_merge_values_skips_non_maps() {
        let a = from_json(r#"{"a": 1}"#).unwrap();
        let scalar = Value::Int(1);
        let b = from_json(r#"{"b": 2}"#).unwrap();
        assert_eq!(
            merge_values(&[&a, &scalar, &b]).into_owned(),
            from_json(r#"{"a": 1, "b": 2}"#).unwrap()
        );
    }

    #[test]
    fn test_merge_values_single_is_identity() {
        let scalar = Value::String("s".into());
        assert!(matches!(merge_values(&[&scalar]), Cow::Borrowed(v) if std::ptr::eq(v, &scalar)));
        assert_eq!(merge_values(&[]).into_owned(), Value::Map(Map::new()));
    }
}
