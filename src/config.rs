//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `BEELINE__*` 覆盖（双下划线表示嵌套，如 `BEELINE__SERVER__PORT=8080`）。
//! API Key 一律走独立环境变量（OPENAI_API_KEY / ASSISTANT_ID / PERPLEXITY_API_KEY / SERPAPI_KEY），不进配置文件。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub orchestrator: OrchestratorSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// [server] 段：HTTP 监听端口
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

fn default_port() -> u16 {
    3000
}

/// [provider] 段：远程运行服务（OpenAI Assistants 兼容）
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    /// 服务根地址，未设置时用官方 API
    pub base_url: Option<String>,
    /// 助手 ID，也可用环境变量 ASSISTANT_ID
    pub assistant_id: Option<String>,
    /// 单次 HTTP 请求超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: None,
            assistant_id: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// [orchestrator] 段：运行轮询节奏与回合上限
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorSection {
    /// 运行状态轮询间隔（毫秒）
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 单回合总时限（秒），超时即终止并返回错误
    #[serde(default = "default_turn_deadline_secs")]
    pub turn_deadline_secs: u64,
    /// 请求未携带 threadId 时使用的默认线程；未设置则首次用到时创建并复用
    pub default_thread: Option<String>,
}

impl Default for OrchestratorSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            turn_deadline_secs: default_turn_deadline_secs(),
            default_thread: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_turn_deadline_secs() -> u64 {
    120
}

/// [tools] 段：工具超时与检索后端
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// 单次工具调用超时（秒）
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    #[serde(default)]
    pub answer: AnswerSection,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout_secs(),
            answer: AnswerSection::default(),
        }
    }
}

fn default_tool_timeout_secs() -> u64 {
    30
}

/// [tools.answer] 段：web_search 背后的实时检索后端
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSection {
    /// 后端：perplexity / serpapi；优先级由 API Key 与 backend 共同决定
    #[serde(default = "default_answer_backend")]
    pub backend: String,
    #[serde(default = "default_answer_model")]
    pub model: String,
    pub base_url: Option<String>,
    /// SerpAPI 检索地理位置
    #[serde(default = "default_search_location")]
    pub location: String,
    #[serde(default = "default_answer_timeout_secs")]
    pub timeout_secs: u64,
    /// 返回给助手的检索文本上限（字符）
    #[serde(default = "default_max_result_chars")]
    pub max_result_chars: usize,
}

impl Default for AnswerSection {
    fn default() -> Self {
        Self {
            backend: default_answer_backend(),
            model: default_answer_model(),
            base_url: None,
            location: default_search_location(),
            timeout_secs: default_answer_timeout_secs(),
            max_result_chars: default_max_result_chars(),
        }
    }
}

fn default_answer_backend() -> String {
    "perplexity".to_string()
}

fn default_answer_model() -> String {
    crate::answer::perplexity::PERPLEXITY_SONAR_PRO.to_string()
}

fn default_search_location() -> String {
    "New Delhi, India".to_string()
}

fn default_answer_timeout_secs() -> u64 {
    15
}

fn default_max_result_chars() -> usize {
    8000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            provider: ProviderSection::default(),
            orchestrator: OrchestratorSection::default(),
            tools: ToolsSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 BEELINE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 BEELINE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(
                config::File::with_name(name).required(false),
            );
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("BEELINE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.provider.request_timeout_secs, 60);
        assert_eq!(cfg.orchestrator.poll_interval_ms, 2000);
        assert_eq!(cfg.orchestrator.turn_deadline_secs, 120);
        assert!(cfg.orchestrator.default_thread.is_none());
        assert_eq!(cfg.tools.tool_timeout_secs, 30);
        assert_eq!(cfg.tools.answer.backend, "perplexity");
        assert_eq!(cfg.tools.answer.model, "sonar-pro");
        assert_eq!(cfg.tools.answer.location, "New Delhi, India");
        assert_eq!(cfg.tools.answer.max_result_chars, 8000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beeline.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[orchestrator]
poll_interval_ms = 500
default_thread = "thread_abc123"

[tools.answer]
backend = "serpapi"
"#,
        )
        .unwrap();

        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.orchestrator.poll_interval_ms, 500);
        assert_eq!(cfg.orchestrator.default_thread.as_deref(), Some("thread_abc123"));
        assert_eq!(cfg.tools.answer.backend, "serpapi");
        // 未出现在文件里的键保持默认
        assert_eq!(cfg.orchestrator.turn_deadline_secs, 120);
        assert_eq!(cfg.tools.answer.model, "sonar-pro");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beeline.toml");
        std::fs::write(&path, "[provider]\nrequest_timeout_secs = 10\n").unwrap();

        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg.provider.request_timeout_secs, 10);
        assert!(cfg.provider.assistant_id.is_none());
        assert_eq!(cfg.server.port, 3000);
    }
}
