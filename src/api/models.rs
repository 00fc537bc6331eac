use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Custom deserializer: accepts the code as a JSON string or number
fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for sickCd, got {}",
            other
        ))),
    }
}

/// One matchable result item returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "sickCd", deserialize_with = "deserialize_code")]
    pub code: String,
    #[serde(rename = "sickNm")]
    pub name: String,
}

impl Candidate {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Name contains the query and the code does not, both case-insensitive.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) && !self.code.to_lowercase().contains(&query)
    }
}
