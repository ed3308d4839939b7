//! OpenAI Assistants v2 REST 适配
//!
//! 六个原语各对应一个端点，所有请求带 `OpenAI-Beta: assistants=v2` 头。
//! HTTP 映射：404 → InvalidThread；提交工具输出遇 400 → StaleRun；
//! 其余非 2xx 与网络错误 → Unavailable；响应体解析失败 → Malformed。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{
    PendingToolCall, ProviderError, RunProvider, RunSnapshot, RunStatus, ToolOutput,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Assistants 运行服务客户端
pub struct OpenAiRunProvider {
    client: Client,
    base_url: String,
    api_key: String,
    assistant_id: String,
}

impl OpenAiRunProvider {
    pub fn new(
        base_url: Option<&str>,
        assistant_id: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url
                .unwrap_or(OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            assistant_id: assistant_id.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

// ---- 线上格式 ----

#[derive(Deserialize)]
struct ObjectHandle {
    id: String,
}

#[derive(Serialize)]
struct CreateMessageBody<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunBody<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct RunBody {
    id: String,
    status: RunStatus,
    required_action: Option<RequiredAction>,
}

#[derive(Deserialize)]
struct RequiredAction {
    submit_tool_outputs: Option<SubmitToolOutputsAction>,
}

#[derive(Deserialize)]
struct SubmitToolOutputsAction {
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    /// JSON 字符串（线上就是字符串，不在适配层解析）
    arguments: String,
}

#[derive(Serialize)]
struct SubmitOutputsBody {
    tool_outputs: Vec<ToolOutput>,
}

#[derive(Deserialize)]
struct MessageListBody {
    data: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Vec<WireContent>,
}

#[derive(Deserialize)]
struct WireContent {
    #[serde(rename = "type")]
    kind: String,
    /// 非文本内容块（如图片）没有这个字段
    text: Option<WireText>,
}

#[derive(Deserialize)]
struct WireText {
    value: String,
}

/// 运行对象 → 状态快照（requires_action 时携带全部待执行调用）
fn snapshot_from_run(run: RunBody) -> RunSnapshot {
    let pending_calls = run
        .required_action
        .and_then(|a| a.submit_tool_outputs)
        .map(|a| {
            a.tool_calls
                .into_iter()
                .map(|c| PendingToolCall {
                    id: c.id,
                    name: c.function.name,
                    arguments: c.function.arguments,
                })
                .collect()
        })
        .unwrap_or_default();
    RunSnapshot { status: run.status, pending_calls }
}

/// 消息列表（新在前）中最新一条助手文本
fn extract_latest_reply(list: MessageListBody) -> Option<String> {
    list.data
        .into_iter()
        .find(|m| m.role == "assistant")
        .and_then(|m| m.content.into_iter().find(|c| c.kind == "text"))
        .and_then(|c| c.text)
        .map(|t| t.value)
}

/// 错误详情里保留的响应体长度（只进日志，不回给调用方）
fn body_snippet(body: &str) -> String {
    if body.chars().count() > 200 {
        body.chars().take(200).collect::<String>() + "..."
    } else {
        body.to_string()
    }
}

/// 非 2xx 响应统一转错误
async fn error_for(resp: Response, what: &str) -> ProviderError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let detail = format!("{}: HTTP {}: {}", what, status, body_snippet(&body));
    if status == StatusCode::NOT_FOUND {
        ProviderError::InvalidThread(detail)
    } else {
        ProviderError::Unavailable(detail)
    }
}

#[async_trait]
impl RunProvider for OpenAiRunProvider {
    async fn create_thread(&self) -> Result<String, ProviderError> {
        let url = self.endpoint("threads");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("create thread: {}", e)))?;
        if !resp.status().is_success() {
            return Err(error_for(resp, "create thread").await);
        }
        let handle: ObjectHandle = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("create thread: {}", e)))?;
        tracing::debug!(thread = %handle.id, "thread created");
        Ok(handle.id)
    }

    async fn append_message(&self, thread_id: &str, text: &str) -> Result<String, ProviderError> {
        let url = self.endpoint(&format!("threads/{}/messages", thread_id));
        let body = CreateMessageBody { role: "user", content: text };
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("append message: {}", e)))?;
        if !resp.status().is_success() {
            return Err(error_for(resp, "append message").await);
        }
        let handle: ObjectHandle = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("append message: {}", e)))?;
        Ok(handle.id)
    }

    async fn start_run(&self, thread_id: &str) -> Result<String, ProviderError> {
        let url = self.endpoint(&format!("threads/{}/runs", thread_id));
        let body = CreateRunBody { assistant_id: &self.assistant_id };
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("start run: {}", e)))?;
        if !resp.status().is_success() {
            return Err(error_for(resp, "start run").await);
        }
        let run: RunBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("start run: {}", e)))?;
        tracing::debug!(thread = %thread_id, run = %run.id, "run started");
        Ok(run.id)
    }

    async fn run_status(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<RunSnapshot, ProviderError> {
        let url = self.endpoint(&format!("threads/{}/runs/{}", thread_id, run_id));
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("run status: {}", e)))?;
        if !resp.status().is_success() {
            return Err(error_for(resp, "run status").await);
        }
        let run: RunBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("run status: {}", e)))?;
        Ok(snapshot_from_run(run))
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<(), ProviderError> {
        let url = self.endpoint(&format!(
            "threads/{}/runs/{}/submit_tool_outputs",
            thread_id, run_id
        ));
        let body = SubmitOutputsBody { tool_outputs: outputs };
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("submit tool outputs: {}", e)))?;
        // 运行已离开 requires_action（过期、被取消）时服务端回 400
        if resp.status() == StatusCode::BAD_REQUEST {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::StaleRun(format!(
                "submit tool outputs: {}",
                body_snippet(&detail)
            )));
        }
        if !resp.status().is_success() {
            return Err(error_for(resp, "submit tool outputs").await);
        }
        Ok(())
    }

    async fn latest_reply(&self, thread_id: &str) -> Result<String, ProviderError> {
        let url = self.endpoint(&format!("threads/{}/messages", thread_id));
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("limit", "20")])
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("list messages: {}", e)))?;
        if !resp.status().is_success() {
            return Err(error_for(resp, "list messages").await);
        }
        let list: MessageListBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("list messages: {}", e)))?;
        extract_latest_reply(list).ok_or(ProviderError::NoReply)
    }

    fn backend_name(&self) -> &str {
        "openai-assistants"
    }
}
