use async_trait::async_trait;
use serde_json::json;

use super::{completion_text, http_client, send_json, LlmProvider};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> anyhow::Result<Self> {
        Ok(Self {
            api_key,
            model,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let api_key = self.api_key.trim();
        anyhow::ensure!(
            !api_key.is_empty(),
            "Gemini API key is not configured, set GEMINI_API_KEY"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let request = self
            .client
            .post(format!("{API_BASE}/{}:generateContent", self.model))
            .query(&[("key", api_key)])
            .json(&body);

        let data = send_json(request, "Gemini").await?;
        completion_text(&data, "/candidates/0/content/parts/0/text", "Gemini")
    }
}
