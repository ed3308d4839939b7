//! web_search 工具：实时检索并整理给助手的文本
//!
//! 查询先做年份改写（把写死的 2024 换成当前年份，纠正助手训练数据的时间锚点），
//! 再交给检索后端；后端失败时返回固定占位文本而不是报错，
//! 单个检索故障只降级这一次回答、不终止整个回合。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Local};
use serde_json::Value;

use crate::answer::AnswerProvider;
use crate::tools::Tool;

/// 助手训练数据里常见的过期年份
const STALE_YEAR: &str = "2024";

/// 检索后端失败时回传助手的占位文本（与线上行为一致）
pub const SOFT_FAILURE_TEXT: &str = "Something went wrong.";

/// 把查询里写死的过期年份换成当前年份；重复调用结果不变
pub fn rewrite_stale_year(query: &str, current_year: i32) -> String {
    if query.contains(STALE_YEAR) {
        query.replace(STALE_YEAR, &current_year.to_string())
    } else {
        query.to_string()
    }
}

/// web_search 工具：检索后端与结果大小上限由配置决定
pub struct WebSearchTool {
    provider: Arc<dyn AnswerProvider>,
    max_result_chars: usize,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn AnswerProvider>, max_result_chars: usize) -> Self {
        Self { provider, max_result_chars }
    }

    fn truncate(&self, text: String) -> String {
        if text.chars().count() > self.max_result_chars {
            text.chars().take(self.max_result_chars).collect::<String>() + "\n...[truncated]"
        } else {
            text
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Real-time web search for fresh information (weather, news, prices, events). Args: {\"query\": \"...\"}."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim();
        if query.is_empty() {
            return Err("Missing query".to_string());
        }

        let query = rewrite_stale_year(query, Local::now().year());
        tracing::info!(query = %query, backend = %self.provider.backend_name(), "web_search lookup");

        match self.provider.answer(&query).await {
            Ok(text) => Ok(self.truncate(text)),
            Err(e) => {
                tracing::warn!(error = %e, "answer backend failed, returning placeholder");
                Ok(SOFT_FAILURE_TEXT.to_string())
            }
        }
    }
}
