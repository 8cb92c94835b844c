use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{ChatOptions, LlmProvider, Message};

/// Local models served by Ollama's `/api/chat`.
pub struct OllamaProvider {
    url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            url,
            model,
            client: reqwest::Client::new(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.url.trim_end_matches('/'))
    }
}

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

    // Non-streaming; sampling settings live under `options`.
    json!({
        "model": model,
        "messages": turns.collect::<Vec<_>>(),
        "stream": false,
        "options": {
            "temperature": options.temperature,
            "num_predict": options.max_output_tokens,
        },
    })
}

fn extract_text(data: &serde_json::Value) -> Option<String> {
    data["message"]["content"].as_str().map(str::to_string)
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> anyhow::Result<String> {
        let body = build_request(&self.model, system_prompt, messages, options);

        let data: serde_json::Value = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .context("failed to call Ollama API")?
            .error_for_status()
            .context("Ollama API returned error")?
            .json()
            .await
            .context("failed to parse Ollama response")?;

        extract_text(&data).ok_or_else(|| anyhow::anyhow!("missing content in Ollama response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let messages = vec![Message {
            role: "user".to_string(),
            content: "Có tour Huế không?".to_string(),
        }];
        let options = ChatOptions {
            temperature: 0.5,
            max_output_tokens: 1024,
        };

        let body = build_request("llama3.2", "system", &messages, &options);
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 1024);
        assert_eq!(body["options"]["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Có tour Huế không?");
    }

    #[test]
    fn test_chat_url_tolerates_trailing_slash() {
        let provider = OllamaProvider::new("http://localhost:11434/".to_string(), "m".to_string());
        assert_eq!(provider.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_extract_text() {
        let data = json!({ "message": { "role": "assistant", "content": "Có ạ" } });
        assert_eq!(extract_text(&data).as_deref(), Some("Có ạ"));
        assert_eq!(extract_text(&json!({ "error": "model not found" })), None);
    }
}
