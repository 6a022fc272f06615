use std::collections::HashMap;
use std::sync::Arc;

use super::tool::{Tool, ToolParameters, ToolResult};
use super::tool_context::ToolContext;

/// Name-keyed collection of tools with optional category tags.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    categories: HashMap<String, Vec<String>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name. Re-registering a name replaces
    /// the earlier tool.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    pub fn register_with_categories<T: Tool + 'static>(&mut self, tool: T, categories: Vec<String>) {
        let name = tool.name().to_string();
        for category in categories {
            self.categories
                .entry(category)
                .or_default()
                .push(name.clone());
        }
        self.register(tool);
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn get_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn get_all_tools(&self) -> Vec<&Arc<dyn Tool>> {
        self.tools.values().collect()
    }

    pub fn get_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.categories.keys().cloned().collect();
        categories.sort();
        categories
    }

    pub fn get_tools_by_category(&self, category: &str) -> Vec<&Arc<dyn Tool>> {
        self.categories
            .get(category)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| self.tools.get(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch a call by tool name. An unknown name is an error result,
    /// not a panic or an Err: the caller gets a uniform ToolResult.
    pub async fn execute_tool(
        &self,
        name: &str,
        params: ToolParameters,
        context: &ToolContext,
    ) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => tool.execute(params, context).await,
            None => ToolResult::error(format!("Tool '{}' not found", name)),
        }
    }
}
