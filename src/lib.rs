//! Beeline - 远程智能体回合编排服务
//!
//! 模块划分：
//! - **answer**: 实时检索后端（Perplexity / SerpAPI / Mock）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 回合编排：运行状态机、单次结果交付、错误分类
//! - **provider**: 远程运行服务适配（线程 / 消息 / 运行 / 工具输出原语）
//! - **server**: HTTP 前门（/thread、/message 路由与 CORS）
//! - **tools**: 函数工具注册表与执行器（web_search）

pub mod answer;
pub mod config;
pub mod core;
pub mod provider;
pub mod server;
pub mod tools;

pub use crate::core::orchestrator::RunOrchestrator;
