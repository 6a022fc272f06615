// Glob search with optional per-line text matching.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::fs;

use commander_toolcore::tool_context::ToolContext;
use commander_toolcore::{param, ParameterDefinition, Tool, ToolParameters, ToolResult};

use crate::helpers::build_glob_pattern;

/// Find files by glob pattern, optionally filtering to lines matching a
/// query. Matches outside the allowed directories are silently skipped.
pub struct SearchFilesTool;

#[async_trait]
impl Tool for SearchFilesTool {
    fn name(&self) -> &str {
        "search_files"
    }

    fn description(&self) -> &str {
        "Find files matching a glob pattern; with a query, return matching lines as path:line:text"
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("pattern", "string", "Glob pattern to match files (e.g. 'src/**/*.rs')", required),
            param!("query", "string", "Text to search for inside matching files", optional),
            param!("case_insensitive", "boolean", "Case insensitive text search", optional, false),
            param!("max_results", "integer", "Maximum number of results to return", optional, 100),
        ])
    }

    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult {
        let pattern = match params.get_required::<String>("pattern") {
            Ok(pattern) => pattern,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let query = params.get_optional::<String>("query").unwrap_or(None);
        let case_insensitive = params
            .get_optional::<bool>("case_insensitive")
            .unwrap_or(None)
            .unwrap_or(false);
        let max_results = params
            .get_optional::<i64>("max_results")
            .unwrap_or(None)
            .unwrap_or(100)
            .max(1) as usize;

        let line_regex = match &query {
            Some(query) => {
                let escaped = regex::escape(query);
                let regex_str = if case_insensitive {
                    format!("(?i){}", escaped)
                } else {
                    escaped
                };
                match Regex::new(&regex_str) {
                    Ok(regex) => Some(regex),
                    Err(e) => return ToolResult::error(format!("Invalid query: {}", e)),
                }
            }
            None => None,
        };

        let glob_pattern = build_glob_pattern(&pattern, &context.work_dir);
        let paths = match glob::glob(&glob_pattern) {
            Ok(paths) => paths,
            Err(e) => return ToolResult::error(format!("Invalid glob pattern: {}", e)),
        };

        let mut results = Vec::new();
        for path in paths.flatten() {
            if results.len() >= max_results {
                break;
            }
            if !path.is_file() {
                continue;
            }
            // The allowlist applies to search results too.
            if context.validate_path(&path.to_string_lossy()).is_err() {
                continue;
            }

            let relative = path
                .strip_prefix(&context.work_dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();

            match &line_regex {
                None => results.push(relative),
                Some(regex) => {
                    let Ok(content) = fs::read_to_string(&path) else {
                        continue;
                    };
                    for (line_num, line) in content.lines().enumerate() {
                        if regex.is_match(line) {
                            results.push(format!("{}:{}:{}", relative, line_num + 1, line.trim()));
                            if results.len() >= max_results {
                                break;
                            }
                        }
                    }
                }
            }
        }

        if results.is_empty() {
            ToolResult::success("No matches found".to_string())
        } else {
            ToolResult::success(results.join("\n"))
        }
    }
}
