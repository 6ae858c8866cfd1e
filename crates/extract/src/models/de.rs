//! Lenient deserializers for record files written by older tooling, where
//! lists were stored as comma separated strings and flags as free text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::normalize::{MISSING_NUMBER, parse_flag, split_list, to_number};

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Integer(i64),
    Text(String),
}

pub(crate) fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<ListOrText>::deserialize(deserializer)? {
        Some(ListOrText::List(list)) => list,
        Some(ListOrText::Text(text)) => split_list(&text),
        None => Vec::new(),
    })
}

pub(crate) fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(flag)) => flag,
        Some(Flag::Integer(number)) => number != 0,
        Some(Flag::Text(text)) => parse_flag(&text),
        None => false,
    })
}

/// Whole numbers, floats (rounded like spreadsheet cells), numeric text and
/// `null` all read as a number; anything else is [`MISSING_NUMBER`].
pub(crate) fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_i64().unwrap_or_else(|| to_number(&number.to_string())),
        Some(Value::String(text)) => to_number(&text),
        _ => MISSING_NUMBER,
    })
}

/// An icon is a non-blank file name; `false`, `""` and `null` mean none.
pub(crate) fn lenient_icon<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) if !name.trim().is_empty() => Some(name),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "string_or_list")]
        list: Vec<String>,
        #[serde(default, deserialize_with = "lenient_flag")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_number")]
        number: i64,
        #[serde(default, deserialize_with = "lenient_icon")]
        icon: Option<String>,
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn lists() {
        assert_eq!(sample(json!({ "list": ["a", "b"] })).list, vec!["a", "b"]);
        assert_eq!(sample(json!({ "list": "a, b" })).list, vec!["a", "b"]);
        assert!(sample(json!({ "list": null })).list.is_empty());
        assert!(sample(json!({})).list.is_empty());
    }

    #[test]
    fn flags() {
        assert!(sample(json!({ "flag": true })).flag);
        assert!(sample(json!({ "flag": 1 })).flag);
        assert!(sample(json!({ "flag": "Ja" })).flag);
        assert!(!sample(json!({ "flag": "" })).flag);
        assert!(!sample(json!({ "flag": 0 })).flag);
        assert!(!sample(json!({ "flag": null })).flag);
    }

    #[rstest]
    #[case(json!({ "number": 12 }), 12)]
    #[case(json!({ "number": 12.0 }), 12)]
    #[case(json!({ "number": 0.4 }), 1)]
    #[case(json!({ "number": "1100" }), 1100)]
    #[case(json!({ "number": null }), 0)]
    #[case(json!({ "number": [1] }), 0)]
    #[case(json!({}), 0)]
    fn test_numbers(#[case] input: serde_json::Value, #[case] expected: i64) {
        assert_eq!(sample(input).number, expected);
    }

    #[test]
    fn icons() {
        assert_eq!(sample(json!({ "icon": "Rex.png" })).icon.as_deref(), Some("Rex.png"));
        assert_eq!(sample(json!({ "icon": false })).icon, None);
        assert_eq!(sample(json!({ "icon": " " })).icon, None);
        assert_eq!(sample(json!({ "icon": null })).icon, None);
    }
}
