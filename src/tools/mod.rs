pub mod executor;
pub mod registry;
pub mod web_search;

pub use executor::ToolExecutor;
pub use registry::{Tool, ToolRegistry};
pub use web_search::{rewrite_stale_year, WebSearchTool};
