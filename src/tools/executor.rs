//! 工具执行器
//!
//! 持有 ToolRegistry 与全局超时，execute(tool_name, args) 在超时内调用对应工具，
//! 未注册、超时或失败分别转为 ToolError 的对应变体；每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::ToolError;
use crate::tools::ToolRegistry;

/// 工具执行器：对每次调用施加超时，并将结果映射为 ToolError
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 执行指定工具；未注册返回 UnknownTool，超时返回 Timeout，工具返回 Err 则转为 Failed；输出 JSON 审计日志
    pub async fn execute(
        &self,
        tool_name: &str,
        args: serde_json::Value,
    ) -> Result<String, ToolError> {
        let start = Instant::now();
        let args_preview = args_preview(&args);

        let Some(tool) = self.registry.get(tool_name) else {
            audit_log(tool_name, false, "unknown_tool", start, &args_preview);
            return Err(ToolError::UnknownTool(tool_name.to_string()));
        };

        let result = timeout(self.timeout, tool.execute(args)).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        audit_log(tool_name, ok, outcome, start, &args_preview);

        match result {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => Err(ToolError::Failed(format!("{}: {}", tool_name, e))),
            Err(_) => Err(ToolError::Timeout(tool_name.to_string())),
        }
    }

    /// 已注册的工具名（启动日志用）
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    /// 工具目录 JSON（透传注册表）
    pub fn catalog_json(&self) -> serde_json::Value {
        self.registry.catalog_json()
    }
}

fn audit_log(tool: &str, ok: bool, outcome: &str, start: Instant, args_preview: &str) {
    let duration_ms = start.elapsed().as_millis() as u64;
    let audit = serde_json::json!({
        "event": "tool_audit",
        "tool": tool,
        "ok": ok,
        "outcome": outcome,
        "duration_ms": duration_ms,
        "args_preview": args_preview,
    });
    tracing::info!(audit = %audit.to_string(), "tool");
}

fn args_preview(args: &serde_json::Value) -> String {
    let s = args.to_string();
    if s.len() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}
