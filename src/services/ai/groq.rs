use async_trait::async_trait;
use serde_json::json;

use super::{completion_text, http_client, send_json, LlmProvider};

const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub struct GroqProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> anyhow::Result<Self> {
        Ok(Self {
            api_key,
            model,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        // JSON mode keeps the reply a single decision object.
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
        });

        let request = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body);

        let data = send_json(request, "Groq").await?;
        completion_text(&data, "/choices/0/message/content", "Groq")
    }
}
