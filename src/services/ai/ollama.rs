use async_trait::async_trait;
use serde_json::{json, Value};

use super::{completion_text, http_client, send_json, LlmProvider};

/// Local models served by an Ollama daemon.
pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: http_client()?,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn chat_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
            "format": "json",
            "options": { "temperature": 0.2 },
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = self.client.post(self.chat_url()).json(&self.chat_body(prompt));

        let data = send_json(request, "Ollama").await?;
        completion_text(&data, "/message/content", "Ollama")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let provider =
            OllamaProvider::new("http://localhost:11434/".to_string(), "llama3".to_string()).unwrap();
        assert_eq!(provider.chat_url(), "http://localhost:11434/api/chat");

        let body = provider.chat_body("hello");
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["stream"], false);
        assert!(body.get("prompt").is_none());
    }

    #[test]
    fn test_reads_chat_message_content() {
        let data = json!({ "message": { "role": "assistant", "content": "{\"action\":\"small_talk\"}" }, "done": true });
        assert_eq!(
            completion_text(&data, "/message/content", "Ollama").unwrap(),
            "{\"action\":\"small_talk\"}"
        );
        assert!(completion_text(&json!({ "response": "hi" }), "/message/content", "Ollama").is_err());
    }
}
