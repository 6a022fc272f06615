// Tools for managing the blocked-command pattern set.

use async_trait::async_trait;
use std::collections::HashMap;

use commander_gate::GateUpdate;
use commander_toolcore::tool_context::ToolContext;
use commander_toolcore::{param, ParameterDefinition, Tool, ToolParameters, ToolResult};

/// Add a pattern to the blocklist.
pub struct BlockCommandTool;

#[async_trait]
impl Tool for BlockCommandTool {
    fn name(&self) -> &str {
        "block_command"
    }

    fn description(&self) -> &str {
        "Add a case-insensitive substring pattern to the blocked-command list"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("pattern", "string", "Substring pattern to block", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let pattern = match params.get_required::<String>("pattern") {
            Ok(pattern) => pattern,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let Some(gate) = context.gate() else {
            return ToolResult::error("Command gate not available".to_string());
        };

        match gate.block(&pattern) {
            Ok(GateUpdate::Added) => {
                ToolResult::success(format!("Blocked command pattern: {}", pattern))
            }
            Ok(_) => ToolResult::success(format!("Pattern already blocked: {}", pattern)),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

/// Remove a pattern from the blocklist.
pub struct UnblockCommandTool;

#[async_trait]
impl Tool for UnblockCommandTool {
    fn name(&self) -> &str {
        "unblock_command"
    }

    fn description(&self) -> &str {
        "Remove a pattern from the blocked-command list"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("pattern", "string", "Substring pattern to unblock", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let pattern = match params.get_required::<String>("pattern") {
            Ok(pattern) => pattern,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let Some(gate) = context.gate() else {
            return ToolResult::error("Command gate not available".to_string());
        };

        match gate.unblock(&pattern) {
            Ok(GateUpdate::Removed) => {
                ToolResult::success(format!("Unblocked command pattern: {}", pattern))
            }
            // Absence is an ordinary outcome, reported as text.
            Ok(_) => ToolResult::success(format!("Pattern not found: {}", pattern)),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

/// List the blocklist, sorted.
pub struct ListBlockedCommandsTool;

#[async_trait]
impl Tool for ListBlockedCommandsTool {
    fn name(&self) -> &str {
        "list_blocked_commands"
    }

    fn description(&self) -> &str {
        "List all blocked command patterns, sorted"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn execute(&self, _params: ToolParameters, context: &ToolContext) -> ToolResult {
        let Some(gate) = context.gate() else {
            return ToolResult::error("Command gate not available".to_string());
        };

        let patterns = gate.list();
        if patterns.is_empty() {
            return ToolResult::success("No blocked command patterns".to_string());
        }
        ToolResult::success(patterns.join("\n"))
    }
}
