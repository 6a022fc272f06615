// Process table tools. These shell out to the platform utilities (`ps` /
// `kill` on POSIX, `tasklist` / `taskkill` on Windows) rather than walk the
// process table themselves.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::process::Command as AsyncCommand;

use commander_toolcore::tool_context::ToolContext;
use commander_toolcore::{param, ParameterDefinition, Tool, ToolParameters, ToolResult};

/// List running processes.
pub struct ListProcessesTool;

#[async_trait]
impl Tool for ListProcessesTool {
    fn name(&self) -> &str {
        "list_processes"
    }

    fn description(&self) -> &str {
        "List running processes with pid, name, and cpu/memory usage"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn execute(&self, _params: ToolParameters, _context: &ToolContext) -> ToolResult {
        let output = if cfg!(windows) {
            AsyncCommand::new("tasklist").args(["/FO", "CSV"]).output().await
        } else {
            AsyncCommand::new("ps")
                .args(["-eo", "pid,comm,pcpu,pmem"])
                .output()
                .await
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => return ToolResult::error(format!("Failed to list processes: {}", e)),
        };
        if !output.status.success() {
            return ToolResult::error(format!(
                "Process listing exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        ToolResult::success(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Terminate an arbitrary process by pid.
pub struct KillProcessTool;

#[async_trait]
impl Tool for KillProcessTool {
    fn name(&self) -> &str {
        "kill_process"
    }

    fn description(&self) -> &str {
        "Terminate a process by pid (SIGTERM on POSIX, taskkill on Windows)"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("pid", "integer", "Process id to terminate", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, _context: &ToolContext) -> ToolResult {
        let pid = match params.get_required::<u32>("pid") {
            Ok(pid) => pid,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let status = if cfg!(windows) {
            AsyncCommand::new("taskkill")
                .args(["/F", "/PID", &pid.to_string()])
                .status()
                .await
        } else {
            AsyncCommand::new("kill")
                .args(["-TERM", &pid.to_string()])
                .status()
                .await
        };

        match status {
            Ok(status) if status.success() => {
                ToolResult::success(format!("Sent termination signal to process {}", pid))
            }
            Ok(status) => ToolResult::error(format!(
                "Failed to terminate process {} (exit {:?})",
                pid,
                status.code()
            )),
            Err(e) => ToolResult::error(format!("Failed to terminate process {}: {}", pid, e)),
        }
    }
}
