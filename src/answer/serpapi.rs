//! SerpAPI 检索客户端（Google 引擎）
//!
//! GET https://serpapi.com/search.json，取 organic_results 前几条，
//! 整理成「标题 / 摘要 / 链接」的编号列表回传助手。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::answer::AnswerProvider;

pub const SERPAPI_BASE_URL: &str = "https://serpapi.com/search.json";

/// 回传的最多结果条数
const MAX_RESULTS: usize = 5;

/// SerpAPI 客户端：检索地理位置与超时由配置决定
pub struct SerpApiProvider {
    client: Client,
    api_key: String,
    location: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

/// organic_results → 编号列表文本；无结果时 None
fn format_results(results: &[OrganicResult]) -> Option<String> {
    if results.is_empty() {
        return None;
    }
    let lines: Vec<String> = results
        .iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(i, r)| {
            let mut line = format!("{}. {}", i + 1, r.title.as_deref().unwrap_or("(untitled)"));
            if let Some(snippet) = &r.snippet {
                line.push_str(&format!("\n   {}", snippet));
            }
            if let Some(link) = &r.link {
                line.push_str(&format!("\n   {}", link));
            }
            line
        })
        .collect();
    Some(lines.join("\n"))
}

impl SerpApiProvider {
    pub fn new(api_key: &str, location: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.to_string(),
            location: location.to_string(),
        }
    }
}

#[async_trait]
impl AnswerProvider for SerpApiProvider {
    async fn answer(&self, query: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(SERPAPI_BASE_URL)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("location", self.location.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| format!("Parse response: {}", e))?;

        format_results(&body.organic_results)
            .ok_or_else(|| "No organic results".to_string())
    }

    fn backend_name(&self) -> &str {
        "serpapi"
    }
}
