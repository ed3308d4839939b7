//! 核心编排层：错误分类、单次结果交付、回合状态机

pub mod delivery;
pub mod error;
pub mod orchestrator;

pub use delivery::TurnDelivery;
pub use error::{ToolError, TurnError, TurnResult};
pub use orchestrator::{create_orchestrator, RunOrchestrator, TurnOptions};
