//! 远程运行服务适配层
//!
//! `RunProvider` 把助手后端抽象成线程 / 消息 / 运行 / 工具输出六个原语；
//! 生产走 OpenAI Assistants v2，本地与测试走可脚本化的 Mock。

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockRunProvider;
pub use openai::OpenAiRunProvider;
pub use traits::{
    PendingToolCall, ProviderError, RunProvider, RunSnapshot, RunStatus, ToolOutput,
};

use std::sync::Arc;

use crate::config::AppConfig;

/// 根据配置与环境变量选择运行服务后端（OpenAI Assistants / Mock）
///
/// 需要 OPENAI_API_KEY 与助手 ID（[provider].assistant_id 或环境变量 ASSISTANT_ID）同时可用，
/// 缺任何一个都退回 Mock。
pub fn create_run_provider(cfg: &AppConfig) -> Arc<dyn RunProvider> {
    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let assistant_id = cfg
        .provider
        .assistant_id
        .clone()
        .or_else(|| std::env::var("ASSISTANT_ID").ok());

    match (api_key, assistant_id) {
        (Some(key), Some(assistant)) => {
            tracing::info!("Using OpenAI assistants backend ({})", assistant);
            Arc::new(OpenAiRunProvider::new(
                cfg.provider.base_url.as_deref(),
                &assistant,
                &key,
                cfg.provider.request_timeout_secs,
            ))
        }
        _ => {
            tracing::warn!("OPENAI_API_KEY or assistant id not set, using Mock run provider");
            Arc::new(MockRunProvider::new())
        }
    }
}
