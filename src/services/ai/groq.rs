use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{ChatOptions, LlmProvider, Message};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// OpenAI-compatible chat completions on Groq.
pub struct GroqProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

/// System prompt first, then the turns as-is; roles are already
/// `user`/`assistant`.
fn build_request(
    model: &str,
    system_prompt: &str,
    messages: &[Message],
    options: &ChatOptions,
) -> serde_json::Value {
    let turns = std::iter::once(json!({ "role": "system", "content": system_prompt })).chain(
        messages
            .iter()
            .map(|msg| json!({ "role": msg.role, "content": msg.content })),
    );

    json!({
        "model": model,
        "messages": turns.collect::<Vec<_>>(),
        "temperature": options.temperature,
        "max_tokens": options.max_output_tokens,
    })
}

fn extract_text(data: &serde_json::Value) -> Option<String> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> anyhow::Result<String> {
        let body = build_request(&self.model, system_prompt, messages, options);

        let resp = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call Groq API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Groq response")?;

        if !status.is_success() {
            anyhow::bail!("Groq API error ({}): {}", status, data);
        }

        extract_text(&data).ok_or_else(|| anyhow::anyhow!("missing content in Groq response"))
    }
}
