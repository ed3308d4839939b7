//! 回合错误分类
//!
//! ToolError 描述单次工具调用的失败；TurnError 是整回合的结局分类，
//! HTTP 层据此决定状态码与对外文案（详细原因只进日志，不回给调用方）。

use thiserror::Error;

use crate::provider::{ProviderError, RunStatus};

/// 工具调用错误（未注册、参数不可解析、执行失败、超时）
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {0}")]
    Failed(String),

    #[error("Tool timeout: {0}")]
    Timeout(String),
}

/// 一个回合的失败结局
#[derive(Error, Debug)]
pub enum TurnError {
    /// 运行进入异常终态（failed / cancelled / expired / incomplete）
    #[error("Run {status}")]
    RunTerminated { status: RunStatus },

    /// 运行服务调用失败（建线程、追加消息、轮询、提交输出任一环节）
    #[error("Provider fault: {0}")]
    Provider(#[from] ProviderError),

    /// 工具调用失败（含未注册工具与参数解析失败）
    #[error("Tool fault: {0}")]
    Tool(#[from] ToolError),

    /// 回合超出总时限
    #[error("Turn deadline exceeded")]
    DeadlineExceeded,

    /// 服务停机，回合被取消
    #[error("Turn cancelled")]
    Cancelled,
}

/// 一个回合的唯一结果：最终回复文本或失败结局
pub type TurnResult = Result<String, TurnError>;
