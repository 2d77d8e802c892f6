use serde::{Deserialize, Serialize};

use super::{AgentAction, BackendResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role.eq_ignore_ascii_case("user")
    }

    pub fn is_assistant(&self) -> bool {
        self.role.eq_ignore_ascii_case("assistant")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Blank or missing session ids share the `"default"` session.
    pub fn session_key(&self) -> String {
        match self.session_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => "default".to_string(),
        }
    }

    /// Trimmed content of the newest message, if it has any text.
    pub fn latest_content(&self) -> Option<&str> {
        self.messages
            .last()
            .map(|m| m.content.trim())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub action: AgentAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_response: Option<BackendResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<String>,
}

impl ChatResponse {
    pub fn reply(reply: impl Into<String>, action: AgentAction) -> Self {
        Self {
            reply: reply.into(),
            action,
            backend_response: None,
            raw_model_output: None,
        }
    }

    pub fn with_raw(mut self, raw: Option<&str>) -> Self {
        self.raw_model_output = raw.map(str::to_string);
        self
    }
}
