//! Mock 运行服务（用于测试与无凭据兜底，无需 API）
//!
//! 两种用法：
//! - 兜底：默认构造时每次运行立即 completed，回复回显最后一条用户消息；
//! - 脚本：`with_script` 预设逐次轮询返回的快照或错误，弹尽后重复最后一项；
//!   追加的消息与提交的工具输出都会被记录，供断言检查。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::traits::{ProviderError, RunProvider, RunSnapshot, RunStatus, ToolOutput};

/// 可脚本化的 Mock 运行服务
#[derive(Default)]
pub struct MockRunProvider {
    inner: Mutex<MockInner>,
}

#[derive(Default)]
struct MockInner {
    script: VecDeque<Result<RunSnapshot, ProviderError>>,
    reply: Option<Result<String, ProviderError>>,
    append_error: Option<ProviderError>,
    start_error: Option<ProviderError>,
    submit_error: Option<ProviderError>,
    appended: Vec<(String, String)>,
    submitted: Vec<Vec<ToolOutput>>,
    threads_created: usize,
}

impl MockRunProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预设轮询脚本；最后一项在弹尽后会一直重复
    pub fn with_script(self, steps: Vec<Result<RunSnapshot, ProviderError>>) -> Self {
        self.inner.lock().unwrap().script = steps.into();
        self
    }

    pub fn with_reply(self, text: &str) -> Self {
        self.inner.lock().unwrap().reply = Some(Ok(text.to_string()));
        self
    }

    pub fn with_reply_error(self, err: ProviderError) -> Self {
        self.inner.lock().unwrap().reply = Some(Err(err));
        self
    }

    pub fn with_append_error(self, err: ProviderError) -> Self {
        self.inner.lock().unwrap().append_error = Some(err);
        self
    }

    pub fn with_start_error(self, err: ProviderError) -> Self {
        self.inner.lock().unwrap().start_error = Some(err);
        self
    }

    pub fn with_submit_error(self, err: ProviderError) -> Self {
        self.inner.lock().unwrap().submit_error = Some(err);
        self
    }

    /// 已追加的 (线程, 文本) 记录
    pub fn appended(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().appended.clone()
    }

    /// 每次 submit_tool_outputs 收到的完整输出批次
    pub fn submitted(&self) -> Vec<Vec<ToolOutput>> {
        self.inner.lock().unwrap().submitted.clone()
    }

    pub fn threads_created(&self) -> usize {
        self.inner.lock().unwrap().threads_created
    }
}

#[async_trait]
impl RunProvider for MockRunProvider {
    async fn create_thread(&self) -> Result<String, ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        inner.threads_created += 1;
        Ok(format!("thread_mock_{}", Uuid::new_v4().simple()))
    }

    async fn append_message(&self, thread_id: &str, text: &str) -> Result<String, ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.append_error {
            return Err(err.clone());
        }
        inner.appended.push((thread_id.to_string(), text.to_string()));
        Ok(format!("msg_mock_{}", Uuid::new_v4().simple()))
    }

    async fn start_run(&self, _thread_id: &str) -> Result<String, ProviderError> {
        let inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.start_error {
            return Err(err.clone());
        }
        Ok(format!("run_mock_{}", Uuid::new_v4().simple()))
    }

    async fn run_status(
        &self,
        _thread_id: &str,
        _run_id: &str,
    ) -> Result<RunSnapshot, ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        // 最后一项不弹出，持续重复；空脚本按立即完成处理
        let step = if inner.script.len() > 1 {
            inner.script.pop_front()
        } else {
            inner.script.front().cloned()
        };
        step.unwrap_or_else(|| Ok(RunSnapshot::status_only(RunStatus::Completed)))
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.submit_error {
            return Err(err.clone());
        }
        inner.submitted.push(outputs);
        Ok(())
    }

    async fn latest_reply(&self, _thread_id: &str) -> Result<String, ProviderError> {
        let inner = self.inner.lock().unwrap();
        match &inner.reply {
            Some(r) => r.clone(),
            None => inner
                .appended
                .last()
                .map(|(_, text)| Ok(format!("Echo from Mock: {}", text)))
                .unwrap_or(Err(ProviderError::NoReply)),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
