pub mod gemini;
pub mod groq;
pub mod ollama;
pub mod prompt;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote text generation: one prompt in, one completion out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}

/// Sends a JSON request and returns the decoded body, failing on non-2xx.
async fn send_json(request: reqwest::RequestBuilder, provider: &str) -> anyhow::Result<Value> {
    let resp = request
        .send()
        .await
        .with_context(|| format!("failed to call {provider} API"))?;

    let status = resp.status();
    let data: Value = resp
        .json()
        .await
        .with_context(|| format!("failed to parse {provider} response"))?;

    if !status.is_success() {
        anyhow::bail!("{provider} API error ({status}): {data}");
    }
    Ok(data)
}

/// Non-blank text at `pointer` in a provider response.
fn completion_text(data: &Value, pointer: &str, provider: &str) -> anyhow::Result<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no completion text in {provider} response"))
}
