use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Patch {
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    re_group_id: Option<Option<String>>,
}

fn parse(json: &str) -> Option<Option<String>> {
    serde_json::from_str::<Patch>(json).unwrap().re_group_id
}

#[test]
fn absent_key_leaves_value() {
    assert_eq!(parse("{}"), None);
}

#[test]
fn null_clears_value() {
    assert_eq!(parse(r#"{"re_group_id": null}"#), Some(None));
}

#[test]
fn value_sets_it() {
    assert_eq!(
        parse(r#"{"re_group_id": "a1b2c3d4"}"#),
        Some(Some("a1b2c3d4".to_string()))
    );
}

#[test]
fn wrong_type_is_an_error() {
    assert!(serde_json::from_str::<Patch>(r#"{"re_group_id": 7}"#).is_err());
}
