//! 实时检索后端统一接口

use async_trait::async_trait;

/// 实时检索后端：给定查询返回一段可直接回传助手的文本
///
/// 失败由调用方决定如何降级（web_search 工具会软化为占位文本）。
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, query: &str) -> Result<String, String>;

    /// 后端名称（日志用）
    fn backend_name(&self) -> &str;
}
