//! 运行服务统一接口
//!
//! 把远程助手服务抽象成六个原语：建线程、追加消息、启动运行、查询状态、
//! 提交工具输出、取最新回复。重试与轮询策略都在编排层，适配器本身不重试。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 运行服务调用错误（按边界分类，编排层据此决定回合结局）
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// 线程（或运行）不存在
    #[error("Invalid thread: {0}")]
    InvalidThread(String),

    /// 运行已不在等待这批工具输出（过期、已被取消等）
    #[error("Stale run: {0}")]
    StaleRun(String),

    /// 线程里还没有助手回复
    #[error("No assistant reply in thread")]
    NoReply,

    /// 网络错误、服务 5xx、请求超时
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// 响应体结构不符合预期
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// 远程运行的即时状态（与 Assistants API 的 run.status 对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    Incomplete,
    /// 未识别的状态按瞬态处理，由回合时限兜底
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 助手暂停时要求执行的一次函数调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToolCall {
    /// 调用 ID，提交输出时必须原样回传
    pub id: String,
    pub name: String,
    /// JSON 字符串形式的参数（与线上格式一致，留给执行层解析）
    pub arguments: String,
}

/// 一次状态查询的快照：状态 + 暂停时的待执行调用
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub status: RunStatus,
    pub pending_calls: Vec<PendingToolCall>,
}

impl RunSnapshot {
    pub fn status_only(status: RunStatus) -> Self {
        Self { status, pending_calls: Vec::new() }
    }
}

/// 按调用 ID 回传的工具执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

/// 远程运行服务客户端（OpenAI Assistants 兼容 / Mock）
#[async_trait]
pub trait RunProvider: Send + Sync {
    /// 新建会话线程，返回线程 ID
    async fn create_thread(&self) -> Result<String, ProviderError>;

    /// 向线程追加一条用户消息，返回消息 ID
    async fn append_message(&self, thread_id: &str, text: &str) -> Result<String, ProviderError>;

    /// 对线程启动一次运行，返回运行 ID
    async fn start_run(&self, thread_id: &str) -> Result<String, ProviderError>;

    /// 查询运行当前状态；requires_action 时快照携带待执行调用
    async fn run_status(&self, thread_id: &str, run_id: &str)
        -> Result<RunSnapshot, ProviderError>;

    /// 一次性提交本批全部工具输出，运行随后恢复
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<(), ProviderError>;

    /// 线程中最新一条助手消息的文本
    async fn latest_reply(&self, thread_id: &str) -> Result<String, ProviderError>;

    /// 后端名称（日志用）
    fn backend_name(&self) -> &str;
}
