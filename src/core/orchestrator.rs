//! 回合编排器
//!
//! 驱动一次完整回合：追加消息 → 启动运行 → 轮询状态 → 暂停时代答工具调用 →
//! 提交输出恢复运行 → 终态时取回复。全程唯一出口是交付槽：
//! 超时、停机、任何一步失败都只产生一个对外结果。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::answer::create_answer_provider;
use crate::config::{AppConfig, OrchestratorSection};
use crate::core::delivery::TurnDelivery;
use crate::core::error::{ToolError, TurnError, TurnResult};
use crate::provider::{
    create_run_provider, PendingToolCall, ProviderError, RunProvider, RunStatus, ToolOutput,
};
use crate::tools::{ToolExecutor, ToolRegistry, WebSearchTool};

/// 运行完成但线程里没有助手消息时的回复文案（与线上行为一致）
const EMPTY_REPLY_FALLBACK: &str = "No response";

/// 回合编排参数（来自 [orchestrator] 配置段）
#[derive(Debug, Clone)]
pub struct TurnOptions {
    pub poll_interval: Duration,
    pub turn_deadline: Duration,
    pub default_thread: Option<String>,
}

impl TurnOptions {
    pub fn from_config(cfg: &OrchestratorSection) -> Self {
        Self {
            poll_interval: Duration::from_millis(cfg.poll_interval_ms),
            turn_deadline: Duration::from_secs(cfg.turn_deadline_secs),
            default_thread: cfg.default_thread.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            turn_deadline: Duration::from_secs(120),
            default_thread: None,
        }
    }
}

/// 回合编排器：一次 run_turn 等于一个回合
pub struct RunOrchestrator {
    provider: Arc<dyn RunProvider>,
    tools: ToolExecutor,
    options: TurnOptions,
    shutdown: CancellationToken,
    /// 未携带 threadId 的请求共用的线程；未配置时首次用到才创建
    default_thread: OnceCell<String>,
}

impl RunOrchestrator {
    pub fn new(
        provider: Arc<dyn RunProvider>,
        tools: ToolExecutor,
        options: TurnOptions,
        shutdown: CancellationToken,
    ) -> Self {
        let default_thread = match &options.default_thread {
            Some(id) => OnceCell::new_with(Some(id.clone())),
            None => OnceCell::new(),
        };
        Self { provider, tools, options, shutdown, default_thread }
    }

    /// 新建一个会话线程（/thread 路由用）
    pub async fn create_thread(&self) -> Result<String, ProviderError> {
        self.provider.create_thread().await
    }

    /// 工具目录（/tools 路由用）
    pub fn tool_catalog(&self) -> serde_json::Value {
        self.tools.catalog_json()
    }

    /// 驱动一个完整回合并返回唯一结果
    pub async fn run_turn(&self, thread_id: Option<&str>, message: &str) -> TurnResult {
        let (delivery, rx) = TurnDelivery::channel();
        self.run_turn_with(thread_id, message, &delivery).await;
        match rx.await {
            Ok(result) => result,
            // 驱动循环的所有退出路径都会交付，此分支不应到达
            Err(_) => Err(TurnError::Provider(ProviderError::Unavailable(
                "turn ended without a result".to_string(),
            ))),
        }
    }

    /// 同 run_turn，但交付槽由调用方持有；返回前恰好交付一次
    pub async fn run_turn_with(
        &self,
        thread_id: Option<&str>,
        message: &str,
        delivery: &TurnDelivery,
    ) {
        let deadline = self.options.turn_deadline;
        match timeout(deadline, self.drive_turn(thread_id, message, delivery)).await {
            Ok(()) => {}
            Err(_) => {
                tracing::warn!(deadline_secs = deadline.as_secs(), "turn deadline exceeded");
                delivery.deliver(Err(TurnError::DeadlineExceeded));
            }
        }
    }

    /// 解析本回合使用的线程：显式传入 > 配置默认 > 惰性新建并复用
    async fn resolve_thread(&self, requested: Option<&str>) -> Result<String, ProviderError> {
        match requested {
            Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
            _ => self
                .default_thread
                .get_or_try_init(|| async {
                    let id = self.provider.create_thread().await?;
                    tracing::info!(thread = %id, "created default thread");
                    Ok(id)
                })
                .await
                .cloned(),
        }
    }

    /// 状态机主体；每条退出路径都以一次交付收尾
    async fn drive_turn(&self, thread_id: Option<&str>, message: &str, delivery: &TurnDelivery) {
        let thread_id = match self.resolve_thread(thread_id).await {
            Ok(id) => id,
            Err(e) => {
                delivery.deliver(Err(e.into()));
                return;
            }
        };

        tracing::info!(thread = %thread_id, "appending user message");
        if let Err(e) = self.provider.append_message(&thread_id, message).await {
            delivery.deliver(Err(e.into()));
            return;
        }

        let run_id = match self.provider.start_run(&thread_id).await {
            Ok(id) => id,
            Err(e) => {
                delivery.deliver(Err(e.into()));
                return;
            }
        };
        tracing::info!(thread = %thread_id, run = %run_id, "run started");

        loop {
            if self.shutdown.is_cancelled() {
                delivery.deliver(Err(TurnError::Cancelled));
                return;
            }

            let snapshot = match self.provider.run_status(&thread_id, &run_id).await {
                Ok(s) => s,
                Err(e) => {
                    delivery.deliver(Err(e.into()));
                    return;
                }
            };
            tracing::debug!(run = %run_id, status = %snapshot.status, "run status");

            match snapshot.status {
                RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling => {
                    if !self.wait_interval().await {
                        delivery.deliver(Err(TurnError::Cancelled));
                        return;
                    }
                }
                RunStatus::Unknown => {
                    tracing::warn!(run = %run_id, "unrecognized run status, continuing to poll");
                    if !self.wait_interval().await {
                        delivery.deliver(Err(TurnError::Cancelled));
                        return;
                    }
                }
                RunStatus::RequiresAction => {
                    let outputs =
                        match self.answer_tool_calls(&run_id, &snapshot.pending_calls).await {
                            Ok(outputs) => outputs,
                            Err(e) => {
                                delivery.deliver(Err(e));
                                return;
                            }
                        };
                    if let Err(e) = self
                        .provider
                        .submit_tool_outputs(&thread_id, &run_id, outputs)
                        .await
                    {
                        delivery.deliver(Err(e.into()));
                        return;
                    }
                    tracing::info!(run = %run_id, "tool outputs submitted, resuming poll");
                    if !self.wait_interval().await {
                        delivery.deliver(Err(TurnError::Cancelled));
                        return;
                    }
                }
                RunStatus::Completed => {
                    let reply = match self.provider.latest_reply(&thread_id).await {
                        Ok(text) => text,
                        Err(ProviderError::NoReply) => EMPTY_REPLY_FALLBACK.to_string(),
                        Err(e) => {
                            delivery.deliver(Err(e.into()));
                            return;
                        }
                    };
                    tracing::info!(run = %run_id, "run completed");
                    delivery.deliver(Ok(reply));
                    return;
                }
                RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Incomplete => {
                    tracing::warn!(run = %run_id, status = %snapshot.status, "run ended abnormally");
                    delivery.deliver(Err(TurnError::RunTerminated { status: snapshot.status }));
                    return;
                }
            }
        }
    }

    /// 等一个轮询间隔；停机时返回 false
    async fn wait_interval(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.options.poll_interval) => true,
        }
    }

    /// 逐个执行暂停里的全部调用并汇齐输出；任一失败都终止回合。
    /// 服务端要求一次补齐整批输出，运行才会恢复，所以不能只答第一个。
    async fn answer_tool_calls(
        &self,
        run_id: &str,
        calls: &[PendingToolCall],
    ) -> Result<Vec<ToolOutput>, TurnError> {
        if calls.is_empty() {
            return Err(TurnError::Provider(ProviderError::Malformed(
                "run paused with no pending tool calls".to_string(),
            )));
        }
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            tracing::info!(run = %run_id, tool = %call.name, call = %call.id, "answering tool call");
            let args: serde_json::Value = serde_json::from_str(&call.arguments)
                .map_err(|e| ToolError::InvalidArguments(format!("{}: {}", call.name, e)))?;
            let output = self.tools.execute(&call.name, args).await?;
            outputs.push(ToolOutput { tool_call_id: call.id.clone(), output });
        }
        Ok(outputs)
    }
}

/// 按配置组装编排器：选后端、注册工具、设参数
pub fn create_orchestrator(cfg: &AppConfig, shutdown: CancellationToken) -> RunOrchestrator {
    let provider = create_run_provider(cfg);
    let answerer = create_answer_provider(cfg);

    let mut tools = ToolRegistry::new();
    tools.register(WebSearchTool::new(answerer, cfg.tools.answer.max_result_chars));

    let executor = ToolExecutor::new(tools, cfg.tools.tool_timeout_secs);
    tracing::info!(tools = ?executor.tool_names(), "function tools registered");

    RunOrchestrator::new(
        provider,
        executor,
        TurnOptions::from_config(&cfg.orchestrator),
        shutdown,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::MockAnswerProvider;
    use crate::provider::{MockRunProvider, RunSnapshot};

    fn pending_call(id: &str, name: &str, arguments: &str) -> PendingToolCall {
        PendingToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    fn action_snapshot(calls: Vec<PendingToolCall>) -> RunSnapshot {
        RunSnapshot { status: RunStatus::RequiresAction, pending_calls: calls }
    }

    fn fast_options() -> TurnOptions {
        TurnOptions {
            poll_interval: Duration::from_millis(5),
            turn_deadline: Duration::from_secs(5),
            default_thread: None,
        }
    }

    fn orchestrator_with(
        provider: Arc<MockRunProvider>,
        answerer: Arc<MockAnswerProvider>,
        options: TurnOptions,
    ) -> RunOrchestrator {
        let mut registry = ToolRegistry::new();
        registry.register(WebSearchTool::new(answerer, 8000));
        let executor = ToolExecutor::new(registry, 5);
        RunOrchestrator::new(provider, executor, options, CancellationToken::new())
    }

    #[tokio::test]
    async fn test_immediate_completion_skips_tools() {
        let provider = Arc::new(MockRunProvider::new().with_reply("Hello!"));
        let answerer = Arc::new(MockAnswerProvider::new());
        let orchestrator = orchestrator_with(provider.clone(), answerer.clone(), fast_options());

        let result = orchestrator.run_turn(Some("thread_1"), "Hello").await;
        assert_eq!(result.unwrap(), "Hello!");
        assert_eq!(answerer.call_count(), 0);
        assert!(provider.submitted().is_empty());
        assert_eq!(provider.appended(), vec![("thread_1".to_string(), "Hello".to_string())]);
    }

    #[tokio::test]
    async fn test_tool_round_trip_with_year_rewrite() {
        let provider = Arc::new(
            MockRunProvider::new()
                .with_script(vec![
                    Ok(RunSnapshot::status_only(RunStatus::InProgress)),
                    Ok(action_snapshot(vec![pending_call(
                        "call_123",
                        "web_search",
                        r#"{"query": "What's the weather in Delhi in 2024?"}"#,
                    )])),
                    Ok(RunSnapshot::status_only(RunStatus::Completed)),
                ])
                .with_reply("32C and clear in Delhi today."),
        );
        let answerer = Arc::new(MockAnswerProvider::with_reply("32C, clear sky"));
        let orchestrator = orchestrator_with(provider.clone(), answerer.clone(), fast_options());

        let result = orchestrator.run_turn(Some("thread_1"), "weather?").await;
        assert_eq!(result.unwrap(), "32C and clear in Delhi today.");

        // 查询里的 2024 已换成当前年份
        use chrono::Datelike;
        let current_year = chrono::Local::now().year().to_string();
        let queries = answerer.queries();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains(&current_year));

        // 一次暂停恰好提交一批输出，按调用 ID 对应
        let submitted = provider.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].len(), 1);
        assert_eq!(submitted[0][0].tool_call_id, "call_123");
        assert_eq!(submitted[0][0].output, "32C, clear sky");
    }

    #[tokio::test]
    async fn test_multiple_pending_calls_one_submission() {
        let provider = Arc::new(MockRunProvider::new().with_script(vec![
            Ok(action_snapshot(vec![
                pending_call("call_a", "web_search", r#"{"query": "a"}"#),
                pending_call("call_b", "web_search", r#"{"query": "b"}"#),
            ])),
            Ok(RunSnapshot::status_only(RunStatus::Completed)),
        ]));
        let answerer = Arc::new(MockAnswerProvider::new());
        let orchestrator = orchestrator_with(provider.clone(), answerer.clone(), fast_options());

        orchestrator.run_turn(Some("t"), "go").await.unwrap();

        let submitted = provider.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].len(), 2);
        assert_eq!(submitted[0][0].tool_call_id, "call_a");
        assert_eq!(submitted[0][1].tool_call_id, "call_b");
        assert_eq!(answerer.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_run_maps_to_terminated() {
        let provider = Arc::new(
            MockRunProvider::new()
                .with_script(vec![Ok(RunSnapshot::status_only(RunStatus::Failed))]),
        );
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::RunTerminated { status: RunStatus::Failed }));
        assert_eq!(err.to_string(), "Run failed");
    }

    #[tokio::test]
    async fn test_cancelled_run_maps_to_terminated() {
        let provider = Arc::new(
            MockRunProvider::new()
                .with_script(vec![Ok(RunSnapshot::status_only(RunStatus::Cancelled))]),
        );
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Run cancelled");
    }

    #[tokio::test]
    async fn test_expired_and_incomplete_are_terminal() {
        for status in [RunStatus::Expired, RunStatus::Incomplete] {
            let provider = Arc::new(
                MockRunProvider::new()
                    .with_script(vec![Ok(RunSnapshot::status_only(status))]),
            );
            let orchestrator =
                orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

            let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
            assert!(matches!(err, TurnError::RunTerminated { status: s } if s == status));
            assert_eq!(err.to_string(), format!("Run {}", status));
        }
    }

    #[tokio::test]
    async fn test_poll_error_is_fatal() {
        let provider = Arc::new(MockRunProvider::new().with_script(vec![Err(
            ProviderError::Unavailable("502 from upstream".to_string()),
        )]));
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Provider(ProviderError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fatal() {
        let provider = Arc::new(MockRunProvider::new().with_script(vec![
            Ok(action_snapshot(vec![pending_call("call_1", "database_query", "{}")])),
            Ok(RunSnapshot::status_only(RunStatus::Completed)),
        ]));
        let orchestrator = orchestrator_with(
            provider.clone(),
            Arc::new(MockAnswerProvider::new()),
            fast_options(),
        );

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Tool(ToolError::UnknownTool(_))));
        assert!(provider.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_arguments_are_fatal() {
        let provider = Arc::new(MockRunProvider::new().with_script(vec![
            Ok(action_snapshot(vec![pending_call("call_1", "web_search", "not json")])),
            Ok(RunSnapshot::status_only(RunStatus::Completed)),
        ]));
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Tool(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_pause_without_calls_is_fault() {
        let provider = Arc::new(MockRunProvider::new().with_script(vec![
            Ok(action_snapshot(vec![])),
            Ok(RunSnapshot::status_only(RunStatus::Completed)),
        ]));
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Provider(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_submit_error_is_fatal() {
        let provider = Arc::new(
            MockRunProvider::new()
                .with_script(vec![
                    Ok(action_snapshot(vec![pending_call(
                        "call_1",
                        "web_search",
                        r#"{"query": "x"}"#,
                    )])),
                    Ok(RunSnapshot::status_only(RunStatus::Completed)),
                ])
                .with_submit_error(ProviderError::StaleRun("run expired".to_string())),
        );
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Provider(ProviderError::StaleRun(_))));
    }

    #[tokio::test]
    async fn test_append_error_is_fatal() {
        let provider = Arc::new(MockRunProvider::new().with_append_error(
            ProviderError::InvalidThread("no such thread".to_string()),
        ));
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let err = orchestrator.run_turn(Some("thread_gone"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Provider(ProviderError::InvalidThread(_))));
    }

    #[tokio::test]
    async fn test_start_error_is_fatal() {
        let provider = Arc::new(MockRunProvider::new().with_start_error(
            ProviderError::Unavailable("run create 503".to_string()),
        ));
        let orchestrator = orchestrator_with(
            provider.clone(),
            Arc::new(MockAnswerProvider::new()),
            fast_options(),
        );

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Provider(ProviderError::Unavailable(_))));
        // 消息已写入线程，但运行从未开始
        assert_eq!(provider.appended().len(), 1);
        assert!(provider.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_bounds_endless_run() {
        let provider = Arc::new(
            MockRunProvider::new()
                .with_script(vec![Ok(RunSnapshot::status_only(RunStatus::InProgress))]),
        );
        let options = TurnOptions {
            poll_interval: Duration::from_millis(10),
            turn_deadline: Duration::from_millis(60),
            default_thread: None,
        };
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), options);

        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_unknown_status_keeps_polling() {
        let provider = Arc::new(MockRunProvider::new().with_script(vec![
            Ok(RunSnapshot::status_only(RunStatus::Unknown)),
            Ok(RunSnapshot::status_only(RunStatus::Completed)),
        ]));
        let orchestrator =
            orchestrator_with(provider.clone(), Arc::new(MockAnswerProvider::new()), fast_options());

        let result = orchestrator.run_turn(Some("t"), "hi").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_configured_default_thread() {
        let provider = Arc::new(MockRunProvider::new().with_reply("ok"));
        let options = TurnOptions {
            default_thread: Some("thread_lobby".to_string()),
            ..fast_options()
        };
        let orchestrator =
            orchestrator_with(provider.clone(), Arc::new(MockAnswerProvider::new()), options);

        orchestrator.run_turn(None, "hi").await.unwrap();
        assert_eq!(provider.appended()[0].0, "thread_lobby");
        assert_eq!(provider.threads_created(), 0);
    }

    #[tokio::test]
    async fn test_lazy_default_thread_created_once() {
        let provider = Arc::new(MockRunProvider::new().with_reply("ok"));
        let orchestrator = orchestrator_with(
            provider.clone(),
            Arc::new(MockAnswerProvider::new()),
            fast_options(),
        );

        orchestrator.run_turn(None, "first").await.unwrap();
        orchestrator.run_turn(None, "second").await.unwrap();

        assert_eq!(provider.threads_created(), 1);
        let appended = provider.appended();
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].0, appended[1].0);
    }

    #[tokio::test]
    async fn test_completed_without_reply_falls_back() {
        let provider =
            Arc::new(MockRunProvider::new().with_reply_error(ProviderError::NoReply));
        let orchestrator =
            orchestrator_with(provider, Arc::new(MockAnswerProvider::new()), fast_options());

        let result = orchestrator.run_turn(Some("t"), "hi").await;
        assert_eq!(result.unwrap(), "No response");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_turn() {
        let provider = Arc::new(
            MockRunProvider::new()
                .with_script(vec![Ok(RunSnapshot::status_only(RunStatus::InProgress))]),
        );
        let mut registry = ToolRegistry::new();
        registry.register(WebSearchTool::new(Arc::new(MockAnswerProvider::new()), 8000));
        let executor = ToolExecutor::new(registry, 5);
        let shutdown = CancellationToken::new();
        let orchestrator =
            RunOrchestrator::new(provider, executor, fast_options(), shutdown.clone());

        shutdown.cancel();
        let err = orchestrator.run_turn(Some("t"), "hi").await.unwrap_err();
        assert!(matches!(err, TurnError::Cancelled));
    }

    #[tokio::test]
    async fn test_late_delivery_is_rejected() {
        let provider = Arc::new(MockRunProvider::new().with_reply("done"));
        let orchestrator = orchestrator_with(
            provider,
            Arc::new(MockAnswerProvider::new()),
            fast_options(),
        );

        let (delivery, rx) = TurnDelivery::channel();
        orchestrator.run_turn_with(Some("t"), "hi", &delivery).await;
        assert!(delivery.is_delivered());
        // 回合收尾后出现的迟到错误只能落空
        assert!(!delivery.deliver(Err(TurnError::DeadlineExceeded)));
        assert_eq!(rx.await.unwrap().unwrap(), "done");
    }

    #[tokio::test]
    async fn test_mock_echo_turn() {
        // 无凭据兜底链路：空脚本 + 无预设回复 = 回显
        let provider = Arc::new(MockRunProvider::new());
        let orchestrator = orchestrator_with(
            provider,
            Arc::new(MockAnswerProvider::new()),
            fast_options(),
        );

        let result = orchestrator.run_turn(Some("t"), "ping").await;
        assert_eq!(result.unwrap(), "Echo from Mock: ping");
    }

    #[test]
    fn test_create_orchestrator_registers_web_search() {
        let orchestrator = create_orchestrator(&AppConfig::default(), CancellationToken::new());
        let catalog = orchestrator.tool_catalog();
        let tools = catalog.as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "web_search");
    }
}
