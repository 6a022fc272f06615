//! Tool implementations for the commander server, organized by
//! functionality: terminal sessions, the command gate, file operations,
//! search, and the platform process table.

pub mod file_ops;
pub mod gate_tools;
pub mod helpers;
pub mod process_tools;
pub mod search;
pub mod terminal_tools;

pub use file_ops::*;
pub use gate_tools::*;
pub use process_tools::*;
pub use search::*;
pub use terminal_tools::*;

use commander_toolcore::ToolRegistry;

/// Register every tool the server exposes.
pub fn register_default_tools(registry: &mut ToolRegistry) {
    registry.register_with_categories(ExecuteCommandTool, vec!["terminal".to_string()]);
    registry.register_with_categories(ReadOutputTool, vec!["terminal".to_string()]);
    registry.register_with_categories(ForceTerminateTool, vec!["terminal".to_string()]);
    registry.register_with_categories(ListSessionsTool, vec!["terminal".to_string()]);

    registry.register_with_categories(BlockCommandTool, vec!["gate".to_string()]);
    registry.register_with_categories(UnblockCommandTool, vec!["gate".to_string()]);
    registry.register_with_categories(ListBlockedCommandsTool, vec!["gate".to_string()]);

    registry.register_with_categories(ReadFileTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(WriteFileTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(CreateDirectoryTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(ListDirectoryTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(MoveFileTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(GetFileInfoTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(ListAllowedDirectoriesTool, vec!["filesystem".to_string()]);
    registry.register_with_categories(SearchFilesTool, vec!["filesystem".to_string()]);

    registry.register_with_categories(ListProcessesTool, vec!["process".to_string()]);
    registry.register_with_categories(KillProcessTool, vec!["process".to_string()]);
}
