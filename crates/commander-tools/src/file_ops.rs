// File operation tools. Every caller-supplied path is resolved and checked
// against the context's allowed directories before any I/O happens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;

use commander_toolcore::tool_context::ToolContext;
use commander_toolcore::{param, ParameterDefinition, Tool, ToolParameters, ToolResult};

/// Read a file's full contents.
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the complete contents of a file from an allowed directory"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("path", "string", "Path to the file, absolute or relative to the work directory", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let path = match params.get_required::<String>("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let full_path = match context.validate_path(&path) {
            Ok(full_path) => full_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        if full_path.is_dir() {
            return ToolResult::error(format!(
                "Path '{}' is a directory, not a file. Use list_directory to see its contents.",
                path
            ));
        }

        match fs::read_to_string(&full_path) {
            Ok(content) => ToolResult::success(content),
            Err(e) => ToolResult::error(format!("Failed to read file '{}': {}", path, e)),
        }
    }
}

/// Write (create or overwrite) a file.
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file in an allowed directory, creating it if needed"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("path", "string", "Path to the file", required),
            param!("content", "string", "Content to write", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let path = match params.get_required::<String>("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let content = match params.get_required::<String>("content") {
            Ok(content) => content,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let full_path = match context.validate_path(&path) {
            Ok(full_path) => full_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        if let Some(parent) = full_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return ToolResult::error(format!("Failed to create parent directory: {}", e));
            }
        }

        match fs::write(&full_path, &content) {
            Ok(()) => ToolResult::success(format!(
                "Wrote {} bytes to {}",
                content.len(),
                path
            )),
            Err(e) => ToolResult::error(format!("Failed to write file '{}': {}", path, e)),
        }
    }
}

/// Create a directory (and any missing parents).
pub struct CreateDirectoryTool;

#[async_trait]
impl Tool for CreateDirectoryTool {
    fn name(&self) -> &str {
        "create_directory"
    }

    fn description(&self) -> &str {
        "Create a directory (including parents) in an allowed directory"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("path", "string", "Directory path to create", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let path = match params.get_required::<String>("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let full_path = match context.validate_path(&path) {
            Ok(full_path) => full_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        match fs::create_dir_all(&full_path) {
            Ok(()) => ToolResult::success(format!("Created directory {}", path)),
            Err(e) => ToolResult::error(format!("Failed to create directory '{}': {}", path, e)),
        }
    }
}

/// List the entries of a directory.
pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List the files and subdirectories of a directory in an allowed directory"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("path", "string", "Directory to list (default: the work directory)", optional, "."),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let path = params
            .get_optional::<String>("path")
            .unwrap_or(None)
            .unwrap_or_else(|| ".".to_string());
        let full_path = match context.validate_path(&path) {
            Ok(full_path) => full_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(e) => return ToolResult::error(format!("Failed to list '{}': {}", path, e)),
        };

        let mut lines = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let tag = match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => "[DIR] ",
                _ => "[FILE]",
            };
            lines.push(format!("{} {}", tag, name));
        }
        lines.sort();

        if lines.is_empty() {
            ToolResult::success(format!("Directory '{}' is empty", path))
        } else {
            ToolResult::success(lines.join("\n"))
        }
    }
}

/// Rename or move a file or directory.
pub struct MoveFileTool;

#[async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &str {
        "move_file"
    }

    fn description(&self) -> &str {
        "Move or rename a file or directory; both paths must be in allowed directories"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("source", "string", "Existing path", required),
            param!("destination", "string", "New path", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let source = match params.get_required::<String>("source") {
            Ok(source) => source,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let destination = match params.get_required::<String>("destination") {
            Ok(destination) => destination,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let source_path = match context.validate_path(&source) {
            Ok(source_path) => source_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let destination_path = match context.validate_path(&destination) {
            Ok(destination_path) => destination_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        match fs::rename(&source_path, &destination_path) {
            Ok(()) => ToolResult::success(format!("Moved {} to {}", source, destination)),
            Err(e) => ToolResult::error(format!(
                "Failed to move '{}' to '{}': {}",
                source, destination, e
            )),
        }
    }
}

/// Metadata for a file or directory.
pub struct GetFileInfoTool;

#[async_trait]
impl Tool for GetFileInfoTool {
    fn name(&self) -> &str {
        "get_file_info"
    }

    fn description(&self) -> &str {
        "Get size, type and timestamps for a file or directory"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("path", "string", "Path to inspect", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let path = match params.get_required::<String>("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let full_path = match context.validate_path(&path) {
            Ok(full_path) => full_path,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let metadata = match fs::metadata(&full_path) {
            Ok(metadata) => metadata,
            Err(e) => return ToolResult::error(format!("Failed to stat '{}': {}", path, e)),
        };

        let mut lines = vec![
            format!("path: {}", full_path.display()),
            format!("type: {}", if metadata.is_dir() { "directory" } else { "file" }),
            format!("size: {}", metadata.len()),
        ];
        if let Ok(modified) = metadata.modified() {
            lines.push(format!("modified: {}", DateTime::<Utc>::from(modified).to_rfc3339()));
        }
        if let Ok(created) = metadata.created() {
            lines.push(format!("created: {}", DateTime::<Utc>::from(created).to_rfc3339()));
        }

        ToolResult::success(lines.join("\n"))
    }
}

/// Report the configured allowlist.
pub struct ListAllowedDirectoriesTool;

#[async_trait]
impl Tool for ListAllowedDirectoriesTool {
    fn name(&self) -> &str {
        "list_allowed_directories"
    }

    fn description(&self) -> &str {
        "List the directories file operations are allowed to touch"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn execute(&self, _params: ToolParameters, context: &ToolContext) -> ToolResult {
        let dirs: Vec<String> = context
            .allowed_directories
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        ToolResult::success(dirs.join("\n"))
    }
}
