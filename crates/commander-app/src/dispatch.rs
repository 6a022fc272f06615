use anyhow::Result;
use commander_toolcore::{ToolContext, ToolRegistry, ToolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// One tool invocation, read as a single JSON line from stdin.
#[derive(Debug, Deserialize)]
pub struct ToolCallRequest {
    pub tool: String,
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

/// One result, written as a single JSON line to stdout.
#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ToolResult> for ToolCallResponse {
    fn from(result: ToolResult) -> Self {
        Self {
            success: result.success,
            content: result.content,
            error: result.error,
        }
    }
}

/// Serve tool calls over stdin/stdout, one JSON object per line.
///
/// Malformed lines produce an error response rather than terminating
/// the loop; EOF on stdin ends it.
pub async fn run_dispatch_loop(registry: &ToolRegistry, context: &ToolContext) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolCallRequest>(line) {
            Ok(request) => {
                let params = commander_toolcore::ToolParameters {
                    data: request.arguments,
                };
                registry
                    .execute_tool(&request.tool, params, context)
                    .await
                    .into()
            }
            Err(e) => ToolCallResponse {
                success: false,
                content: String::new(),
                error: Some(format!("Invalid request: {}", e)),
            },
        };

        let mut payload = serde_json::to_string(&response)?;
        payload.push('\n');
        stdout.write_all(payload.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_with_and_without_arguments() {
        let req: ToolCallRequest =
            serde_json::from_str(r#"{"tool": "list_sessions"}"#).unwrap();
        assert_eq!(req.tool, "list_sessions");
        assert!(req.arguments.is_empty());

        let req: ToolCallRequest = serde_json::from_str(
            r#"{"tool": "execute_command", "arguments": {"command": "echo hi", "timeout_ms": 500}}"#,
        )
        .unwrap();
        assert_eq!(req.tool, "execute_command");
        assert_eq!(req.arguments["command"], serde_json::json!("echo hi"));
    }

    #[test]
    fn response_omits_error_when_absent() {
        let response = ToolCallResponse {
            success: true,
            content: "ok".to_string(),
            error: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("error"));
    }
}
