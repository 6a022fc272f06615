// Tools for the shell session manager: execute, read, terminate, list.

use async_trait::async_trait;
use std::collections::HashMap;

use commander_toolcore::tool_context::ToolContext;
use commander_toolcore::{param, ParameterDefinition, Tool, ToolParameters, ToolResult};
use commander_types::SessionId;

/// Start a shell command and return within the timeout with whatever output
/// has accumulated so far; the command keeps running in the background.
pub struct ExecuteCommandTool;

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command. Returns the session id and the output captured before the timeout; the command keeps running. Use read_output with the id to collect more output later."
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("command", "string", "Shell command to execute", required),
            param!("timeout_ms", "integer", "How long to wait for initial output, in milliseconds (default: 1000)", optional),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let command = match params.get_required::<String>("command") {
            Ok(command) => command,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let timeout_ms = match params.get_optional::<u64>("timeout_ms") {
            Ok(timeout) => timeout,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let Some(ref manager) = context.terminal_manager else {
            return ToolResult::error("Terminal manager not available".to_string());
        };

        match manager.execute(&command, timeout_ms).await {
            Ok(result) => ToolResult::success(
                serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.output.clone()),
            ),
            Err(e) => ToolResult::error(format!("Failed to execute command: {}", e)),
        }
    }
}

/// Read the output a session has accumulated so far.
pub struct ReadOutputTool;

#[async_trait]
impl Tool for ReadOutputTool {
    fn name(&self) -> &str {
        "read_output"
    }

    fn description(&self) -> &str {
        "Read the accumulated output of a session. Live sessions return a growing snapshot; finished sessions return their final output."
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("id", "integer", "Session id returned by execute_command", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let id = match params.get_required::<SessionId>("id") {
            Ok(id) => id,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let Some(ref manager) = context.terminal_manager else {
            return ToolResult::error("Terminal manager not available".to_string());
        };

        // An unknown id yields a diagnostic message, not an error.
        ToolResult::success(manager.read_output(id))
    }
}

/// Request termination of a running session.
pub struct ForceTerminateTool;

#[async_trait]
impl Tool for ForceTerminateTool {
    fn name(&self) -> &str {
        "force_terminate"
    }

    fn description(&self) -> &str {
        "Force-terminate a running session. The session is archived immediately; its output stays readable via read_output."
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("id", "integer", "Session id to terminate", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let id = match params.get_required::<SessionId>("id") {
            Ok(id) => id,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let Some(ref manager) = context.terminal_manager else {
            return ToolResult::error("Terminal manager not available".to_string());
        };

        match manager.force_terminate(id).await {
            Ok(true) => ToolResult::success(format!("Terminated session {}", id)),
            Ok(false) => {
                ToolResult::success(format!("No active session found for ID {}", id))
            }
            Err(e) => ToolResult::error(format!("Failed to terminate session {}: {}", id, e)),
        }
    }
}

/// List the sessions whose process is still running.
pub struct ListSessionsTool;

#[async_trait]
impl Tool for ListSessionsTool {
    fn name(&self) -> &str {
        "list_sessions"
    }

    fn description(&self) -> &str {
        "List all active sessions with their runtime in seconds"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn execute(&self, _params: ToolParameters, context: &ToolContext) -> ToolResult {
        let Some(ref manager) = context.terminal_manager else {
            return ToolResult::error("Terminal manager not available".to_string());
        };

        let sessions = manager.list_sessions();
        if sessions.is_empty() {
            return ToolResult::success("No active sessions".to_string());
        }
        ToolResult::success(
            serde_json::to_string_pretty(&sessions).unwrap_or_else(|_| String::new()),
        )
    }
}
