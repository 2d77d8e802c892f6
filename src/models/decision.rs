use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub type Params = serde_json::Map<String, Value>;

/// Structured turn decision as produced by the heuristics or the model,
/// before the action label is resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default, deserialize_with = "nullable_params")]
    pub params: Params,
    #[serde(default)]
    pub response: Option<String>,
}

fn nullable_params<'de, D>(deserializer: D) -> Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Params>::deserialize(deserializer)?.unwrap_or_default())
}

impl Decision {
    pub fn new(action: &str, response: impl Into<String>) -> Self {
        Self {
            action: Some(action.to_string()),
            intent: None,
            params: Params::new(),
            response: Some(response.into()),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Copies `action` into `intent` or the reverse when only one is set.
    pub fn normalized(mut self) -> Self {
        match (has_text(&self.action), has_text(&self.intent)) {
            (false, true) => self.action = self.intent.clone(),
            (true, false) => self.intent = self.action.clone(),
            _ => {}
        }
        self
    }

    /// The raw action label: `action`, else `intent`, else empty.
    pub fn label(&self) -> &str {
        [&self.action, &self.intent]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty())
            .unwrap_or("")
    }

    pub fn param(&self, key: &str) -> Option<String> {
        param_text(&self.params, key)
    }

    pub fn response_text(&self) -> Option<&str> {
        self.response.as_deref().filter(|r| !r.trim().is_empty())
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Reads a param as text. Numbers and booleans are rendered, blanks are absent.
pub fn param_text(params: &Params, key: &str) -> Option<String> {
    let text = match params.get(key)? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_copied_into_missing_action() {
        let d: Decision =
            serde_json::from_str(r#"{"intent":"available_rooms","params":null}"#).unwrap();
        let d = d.normalized();
        assert_eq!(d.action.as_deref(), Some("available_rooms"));
        assert!(d.params.is_empty());
    }

    #[test]
    fn test_action_copied_into_blank_intent() {
        let d: Decision =
            serde_json::from_str(r#"{"action":"create_booking","intent":"  "}"#).unwrap();
        let d = d.normalized();
        assert_eq!(d.intent.as_deref(), Some("create_booking"));
        assert_eq!(d.label(), "create_booking");
    }

    #[test]
    fn test_param_text_coerces_numbers() {
        let d: Decision = serde_json::from_str(
            r#"{"action":"create_booking","params":{"roomId":7,"checkInDate":" ","note":null}}"#,
        )
        .unwrap();
        assert_eq!(d.param("roomId").as_deref(), Some("7"));
        assert_eq!(d.param("checkInDate"), None);
        assert_eq!(d.param("note"), None);
    }
}
