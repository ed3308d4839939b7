//! Beeline - 智能体回合编排服务
//!
//! 入口：初始化日志、加载配置、创建编排器并启动 HTTP 服务。

use std::sync::Arc;

use anyhow::Context;
use beeline::config::{load_config, AppConfig};
use beeline::core::create_orchestrator;
use beeline::server::{create_router, AppState};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, falling back to defaults");
        AppConfig::default()
    });

    let shutdown = CancellationToken::new();
    let orchestrator = create_orchestrator(&cfg, shutdown.clone());
    let state = Arc::new(AppState { orchestrator });
    let app = create_router(state);

    // 端口：环境变量优先于配置文件
    let port = std::env::var("BEELINE_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(cfg.server.port);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Beeline listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listen address")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server run failed")?;

    Ok(())
}

/// Ctrl-C 后取消所有在途回合并停止接收新连接
async fn shutdown_signal(token: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, cancelling in-flight turns");
    token.cancel();
}
