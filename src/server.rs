//! HTTP 前门：/thread、/message、/health、/tools
//!
//! 路由与字段名同线上服务保持兼容（threadId / message / error），
//! 成功回 {"message"}，失败回 {"error"}；详细失败原因只进日志不外泄。

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::core::{RunOrchestrator, TurnError};
use crate::provider::ProviderError;

/// 路由层共享状态
pub struct AppState {
    pub orchestrator: RunOrchestrator,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub message: String,
    /// 缺省时走编排器的默认线程
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub thread_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 组装路由（全路由放行 CORS）
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/thread", get(create_thread))
        .route("/message", post(post_message))
        .route("/tools", get(list_tools))
        .route("/health", get(|| async { "OK" }))
        .layer(cors)
        .with_state(state)
}

/// GET /thread：新建会话线程
async fn create_thread(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThreadResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.orchestrator.create_thread().await {
        Ok(thread_id) => Ok(Json(ThreadResponse { thread_id })),
        Err(e) => {
            tracing::error!(error = %e, "thread creation failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse { error: "Failed to create thread".to_string() }),
            ))
        }
    }
}

/// POST /message：驱动一个完整回合，返回助手回复
async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let text = payload.message.trim();
    if text.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "message is required".to_string() }),
        ));
    }

    match state
        .orchestrator
        .run_turn(payload.thread_id.as_deref(), text)
        .await
    {
        Ok(message) => Ok(Json(MessageResponse { message })),
        Err(e) => Err(turn_error_response(&e)),
    }
}

/// GET /tools：本服务实现的函数工具目录（与助手侧声明核对用）
async fn list_tools(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.orchestrator.tool_catalog())
}

/// 回合错误 → 状态码与对外文案
fn turn_error_response(err: &TurnError) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!(error = %err, "turn failed");
    let (status, message) = match err {
        TurnError::RunTerminated { status } => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Run {}", status))
        }
        TurnError::Provider(ProviderError::InvalidThread(_)) => {
            (StatusCode::NOT_FOUND, "Thread not found".to_string())
        }
        TurnError::DeadlineExceeded => {
            (StatusCode::GATEWAY_TIMEOUT, "Turn timed out".to_string())
        }
        TurnError::Cancelled => {
            (StatusCode::SERVICE_UNAVAILABLE, "Server shutting down".to_string())
        }
        TurnError::Provider(_) | TurnError::Tool(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error".to_string())
        }
    };
    (status, Json(ErrorResponse { error: message }))
}
