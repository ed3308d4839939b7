//! Mock 检索后端（用于测试与无凭据兜底，无需 API）

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::answer::AnswerProvider;

/// Mock 检索后端：返回固定文本并记录收到的查询
#[derive(Default)]
pub struct MockAnswerProvider {
    reply: Option<String>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockAnswerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(text: &str) -> Self {
        Self { reply: Some(text.to_string()), ..Self::default() }
    }

    /// 每次调用都失败（测试软降级路径）
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// 收到过的全部查询（已做年份改写后的形态）
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerProvider for MockAnswerProvider {
    async fn answer(&self, query: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err("mock answer failure".to_string());
        }
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Ok(format!("Canned answer for: {}", query)),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
