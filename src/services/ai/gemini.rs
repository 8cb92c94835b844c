use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{ChatOptions, LlmProvider, Message};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

/// Gemini only knows `user` and `model`.
fn gemini_role(role: &str) -> &'static str {
    if role == "user" {
        "user"
    } else {
        "model"
    }
}

fn build_request(
    system_prompt: &str,
    messages: &[Message],
    options: &ChatOptions,
) -> serde_json::Value {
    let contents: Vec<serde_json::Value> = messages
        .iter()
        .map(|msg| {
            json!({
                "role": gemini_role(&msg.role),
                "parts": [{ "text": msg.content }],
            })
        })
        .collect();

    json!({
        "system_instruction": { "parts": [{ "text": system_prompt }] },
        "contents": contents,
        "generationConfig": {
            "temperature": options.temperature,
            "maxOutputTokens": options.max_output_tokens,
        },
    })
}

/// Concatenate the text parts of the first candidate.
fn extract_text(data: &serde_json::Value) -> Option<String> {
    let parts = data["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> anyhow::Result<String> {
        let body = build_request(system_prompt, messages, options);

        let resp = self
            .client
            .post(format!("{GEMINI_API_BASE}/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call Gemini API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Gemini response")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API error ({}): {}", status, data);
        }

        extract_text(&data).ok_or_else(|| anyhow::anyhow!("missing content in Gemini response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_maps_roles_and_options() {
        let messages = vec![
            Message {
                role: "user".to_string(),
                content: "Xin chào".to_string(),
            },
            Message {
                role: "assistant".to_string(),
                content: "Chào bạn!".to_string(),
            },
        ];
        let options = ChatOptions {
            temperature: 0.7,
            max_output_tokens: 1024,
        };

        let body = build_request("system", &messages, &options);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][1]["parts"][0]["text"], "Chào bạn!");
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "system");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let data = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Xin " }, { "text": "chào" }] } }]
        });
        assert_eq!(extract_text(&data).as_deref(), Some("Xin chào"));
    }

    #[test]
    fn test_extract_text_missing() {
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        let blocked = json!({ "candidates": [{ "content": { "parts": [] } }] });
        assert_eq!(extract_text(&blocked), None);
    }
}
