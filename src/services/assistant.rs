//! Conversation orchestrator: classify, fetch context, ask the model.

use std::sync::Arc;

use anyhow::Context;

use crate::db::TravelStore;
use crate::models::ConversationTurn;
use crate::services::ai::{ChatOptions, LlmProvider, Message};
use crate::services::{classifier, context};

pub const SYSTEM_PROMPT: &str = "Bạn là trợ lý du lịch AI của Visita - nền tảng đặt tour du lịch hàng đầu Việt Nam.

## Vai trò của bạn:
- Hỗ trợ khách hàng tìm kiếm và đặt tour du lịch
- Trả lời câu hỏi về các tour, giá cả, lịch trình
- Cung cấp thông tin về booking và thanh toán
- Tư vấn điểm đến phù hợp với nhu cầu khách hàng

## Nguyên tắc:
1. Luôn trả lời bằng tiếng Việt
2. Thân thiện, chuyên nghiệp và hữu ích
3. Chỉ sử dụng thông tin chính xác từ dữ liệu hệ thống, không tự bịa ra tour, giá hay booking
4. Nếu không có thông tin, hướng dẫn khách liên hệ hotline hoặc nhân viên hỗ trợ
5. Định dạng giá tiền theo VND (ví dụ: 2.500.000₫)
6. Giữ câu trả lời ngắn gọn, dễ hiểu

## Khả năng:
- Tìm kiếm tour theo điểm đến, giá, thời gian
- Tra cứu thông tin booking (cần mã booking, email hoặc số điện thoại)
- Kiểm tra trạng thái thanh toán
- Gợi ý tour phù hợp

Khi được cung cấp dữ liệu từ hệ thống, hãy trình bày thông tin một cách rõ ràng và hấp dẫn.";

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

pub struct Assistant {
    store: Arc<dyn TravelStore>,
    llm: Arc<dyn LlmProvider>,
}

impl Assistant {
    pub fn new(store: Arc<dyn TravelStore>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { store, llm }
    }

    /// Answer one user turn. `history` is the earlier conversation, oldest
    /// first; it is read, never modified. Store and model failures
    /// propagate unchanged.
    pub async fn answer(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> anyhow::Result<String> {
        let classification = classifier::classify(message);

        let context = context::build_context(self.store.as_ref(), &classification)
            .context("failed to assemble context")?;

        // Parameters carry customer identifiers; only the intent is logged.
        tracing::info!(
            intent = classification.intent.as_str(),
            has_context = context.is_some(),
            history_len = history.len(),
            "processing chat message"
        );

        let messages = build_messages(message, history, context.as_deref());
        let options = ChatOptions {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        };

        self.llm.chat(SYSTEM_PROMPT, &messages, &options).await
    }
}

fn model_role(role: &str) -> &'static str {
    if role == "user" {
        "user"
    } else {
        "assistant"
    }
}

/// History turns in order, then the current message with the context block
/// appended after a blank line.
fn build_messages(
    message: &str,
    history: &[ConversationTurn],
    context: Option<&str>,
) -> Vec<Message> {
    let mut messages: Vec<Message> = history
        .iter()
        .map(|turn| Message {
            role: model_role(&turn.role).to_string(),
            content: turn.content.clone(),
        })
        .collect();

    let content = match context {
        Some(context) => format!("{message}\n\n{context}"),
        None => message.to_string(),
    };
    messages.push(Message {
        role: "user".to_string(),
        content,
    });

    messages
}
