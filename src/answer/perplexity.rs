//! Perplexity API 客户端（OpenAI 兼容格式）
//!
//! Perplexity 提供与 OpenAI 完全兼容的 chat/completions 接口，回答自带联网检索。
//! - Base URL: https://api.perplexity.ai
//! - 模型: sonar-pro（深度检索）, sonar（轻量）

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::answer::AnswerProvider;

/// Perplexity API 常量
pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
pub const PERPLEXITY_SONAR_PRO: &str = "sonar-pro";

/// 系统提示：强制联网检索，禁止模型凭记忆作答
const FRESHNESS_PROMPT: &str = "Always perform a web search using the latest data sources before answering. Never rely on your own memory or training data. Your priority is to fetch and return fresh, real-time information from the web.";

/// Perplexity 检索客户端：持有 Client 与 model 名，answer 时取首条 content
pub struct PerplexityProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl PerplexityProvider {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("PERPLEXITY_API_KEY").ok())
            .unwrap_or_else(|| "pplx-placeholder".to_string());

        let config = OpenAIConfig::new()
            .with_api_base(base_url.unwrap_or(PERPLEXITY_BASE_URL))
            .with_api_key(api_key);

        // 配置留空时退回默认模型
        let model = if model.trim().is_empty() { PERPLEXITY_SONAR_PRO } else { model };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn to_messages(&self, query: &str) -> Vec<ChatCompletionRequestMessage> {
        vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(FRESHNESS_PROMPT)
                    .build()
                    .unwrap(),
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(query)
                    .build()
                    .unwrap(),
            ),
        ]
    }
}

#[async_trait]
impl AnswerProvider for PerplexityProvider {
    async fn answer(&self, query: &str) -> Result<String, String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.to_messages(query))
            .build()
            .map_err(|e| e.to_string())?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| e.to_string())?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        // 与线上行为一致：空回复给出固定文案而非报错
        if content.is_empty() {
            return Ok("No response from assistant.".to_string());
        }
        Ok(content)
    }

    fn backend_name(&self) -> &str {
        "perplexity"
    }
}
