//! Tool plumbing: the `Tool` trait, parameter handling, the registry that
//! dispatches calls, and the context threaded into every tool.

pub mod tool;
pub mod tool_context;
pub mod tool_registry;

pub use tool::{ParameterDefinition, Tool, ToolParameters, ToolResult};
pub use tool_context::ToolContext;
pub use tool_registry::ToolRegistry;
