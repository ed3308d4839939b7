//! 实时检索后端（web_search 工具的数据源）
//!
//! `AnswerProvider` 统一 Perplexity（联网问答）与 SerpAPI（Google 检索）两种后端；
//! 无凭据时退回 Mock，保证服务离线也能跑通全流程。

pub mod mock;
pub mod perplexity;
pub mod serpapi;
pub mod traits;

pub use mock::MockAnswerProvider;
pub use perplexity::PerplexityProvider;
pub use serpapi::SerpApiProvider;
pub use traits::AnswerProvider;

use std::sync::Arc;

use crate::config::AppConfig;

/// 根据配置与环境变量选择检索后端（Perplexity / SerpAPI / Mock）
///
/// backend 配置为 serpapi 时优先 SerpAPI；否则只要有 PERPLEXITY_API_KEY 就走 Perplexity，
/// 再退而求其次用 SERPAPI_KEY，两个 Key 都没有则用 Mock。
pub fn create_answer_provider(cfg: &AppConfig) -> Arc<dyn AnswerProvider> {
    let backend = cfg.tools.answer.backend.to_lowercase();
    let perplexity_key = std::env::var("PERPLEXITY_API_KEY").ok();
    let serpapi_key = std::env::var("SERPAPI_KEY").ok();

    let prefer_serpapi = backend == "serpapi" && serpapi_key.is_some();

    if !prefer_serpapi && perplexity_key.is_some() {
        tracing::info!("Using Perplexity answer backend ({})", cfg.tools.answer.model);
        Arc::new(PerplexityProvider::new(
            cfg.tools.answer.base_url.as_deref(),
            &cfg.tools.answer.model,
            perplexity_key.as_deref(),
        ))
    } else if let Some(key) = serpapi_key {
        tracing::info!("Using SerpAPI answer backend ({})", cfg.tools.answer.location);
        Arc::new(SerpApiProvider::new(
            &key,
            &cfg.tools.answer.location,
            cfg.tools.answer.timeout_secs,
        ))
    } else {
        tracing::warn!("PERPLEXITY_API_KEY / SERPAPI_KEY not set, using Mock answer backend");
        Arc::new(MockAnswerProvider::new())
    }
}
