use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Answers collected so far, keyed by field id, in insertion order.
pub type Draft = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    None,
    Text(String),
    Bool(bool),
    Number(i64),
    List(Vec<String>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.trim().is_empty(),
            Self::List(v) => v.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Text form used when a value is shown in an input or sent upstream.
    pub fn to_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Text(v) => v.clone(),
            Self::Bool(v) => v.to_string(),
            Self::Number(v) => v.to_string(),
            Self::List(v) => v.join(", "),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Draft, Value};

    #[test]
    fn whitespace_text_counts_as_empty() {
        assert!(Value::text("   ").is_empty());
        assert!(Value::None.is_empty());
        assert!(!Value::Bool(false).is_empty());
        assert!(!Value::text("Ada").is_empty());
    }

    #[test]
    fn draft_reads_plain_json_object() {
        let draft: Draft =
            serde_json::from_str(r#"{"first_name":"Ada","dob":null,"zip":"10001"}"#)
                .expect("draft json");
        assert_eq!(draft.get("first_name"), Some(&Value::text("Ada")));
        assert_eq!(draft.get("dob"), Some(&Value::None));
        assert_eq!(draft.keys().collect::<Vec<_>>(), vec!["first_name", "dob", "zip"]);
    }
}
