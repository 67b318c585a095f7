//! Deserializers for fields whose shape depends on which endpoint produced
//! the record. Search results come from the full-text index, where a
//! repeated field holding one value is a bare string, booleans are stored
//! as `"true"`/`"false"` atoms and every number is a float.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrVec {
    Null(()),
    String(String),
    Vec(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    String(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    String(String),
}

pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrVec::deserialize(deserializer)? {
        StringOrVec::Null(()) => Vec::new(),
        StringOrVec::String(s) if s.is_empty() => Vec::new(),
        StringOrVec::String(s) => vec![s],
        StringOrVec::Vec(v) => v,
    })
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got {other:?}"
            ))),
        },
    }
}

pub(crate) fn grade<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match number {
        Number::Int(n) => Ok(Some(n)),
        Number::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
        Number::Float(f) => Err(serde::de::Error::custom(format!(
            "expected a whole grade, got {f}"
        ))),
        Number::String(s) if s.is_empty() => Ok(None),
        Number::String(s) => s
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| Some(f as i64))
            .ok_or_else(|| serde::de::Error::custom(format!("expected a grade, got {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "super::string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "super::flag")]
        promoted: bool,
        #[serde(default, deserialize_with = "super::grade")]
        min_grade: Option<i64>,
    }

    #[test]
    fn search_document_shapes() {
        let doc: Doc = serde_json::from_value(json!({
            "tags": "Growth Mindset",
            "promoted": "false",
            "min_grade": 0.0
        }))
        .unwrap();
        assert_eq!(doc.tags, ["Growth Mindset"]);
        assert!(!doc.promoted);
        assert_eq!(doc.min_grade, Some(0));
    }

    #[test]
    fn record_shapes() {
        let doc: Doc = serde_json::from_value(json!({
            "tags": ["a", "b"],
            "promoted": true,
            "min_grade": null
        }))
        .unwrap();
        assert_eq!(doc.tags, ["a", "b"]);
        assert!(doc.promoted);
        assert_eq!(doc.min_grade, None);

        let empty: Doc = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(empty.tags.is_empty());
    }

    #[test]
    fn unknown_flag_text_is_rejected() {
        assert!(serde_json::from_value::<Doc>(json!({"promoted": "maybe"})).is_err());
        assert!(serde_json::from_value::<Doc>(json!({"min_grade": 2.5})).is_err());
    }
}
