use std::collections::HashMap;

use commander_toolcore::tool::{ParameterDefinition, Tool, ToolParameters, ToolResult};
use commander_toolcore::tool_context::ToolContext;
use commander_toolcore::tool_registry::ToolRegistry;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Debug, Clone)]
struct TestTool {
    name: String,
    description: String,
    should_fail: bool,
}

impl TestTool {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            should_fail: false,
        }
    }

    fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait::async_trait]
impl Tool for TestTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn execute(&self, params: ToolParameters, _context: &ToolContext) -> ToolResult {
        if self.should_fail {
            ToolResult::error("Test tool failed intentionally".to_string())
        } else {
            ToolResult::success(format!(
                "Executed {} with {} parameters",
                self.name,
                params.data.len()
            ))
        }
    }
}

fn create_test_context() -> (ToolContext, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let context = ToolContext::new(temp_dir.path().to_path_buf());
    (context, temp_dir)
}

#[tokio::test]
async fn test_registry_initialization() {
    let registry = ToolRegistry::new();
    assert_eq!(registry.get_all_tools().len(), 0);
    assert!(registry.get_tool_names().is_empty());
    assert!(registry.get_categories().is_empty());
    assert!(!registry.has_tool("any_tool"));
}

#[tokio::test]
async fn test_single_tool_registration() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool::new("test_tool", "A test tool"));

    assert!(registry.has_tool("test_tool"));
    assert_eq!(registry.get_all_tools().len(), 1);
    assert_eq!(registry.get_tool_names(), vec!["test_tool"]);
    assert_eq!(registry.get_tool("test_tool").unwrap().name(), "test_tool");
}

#[tokio::test]
async fn test_duplicate_registration_replaces() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool::new("duplicate_tool", "First instance"));
    registry.register(TestTool::new("duplicate_tool", "Second instance"));

    assert_eq!(registry.get_all_tools().len(), 1);
    assert_eq!(
        registry.get_tool("duplicate_tool").unwrap().description(),
        "Second instance"
    );
}

#[tokio::test]
async fn test_registration_with_categories() {
    let mut registry = ToolRegistry::new();
    registry.register_with_categories(
        TestTool::new("categorized_tool", "A categorized tool"),
        vec!["terminal".to_string(), "session".to_string()],
    );

    assert_eq!(registry.get_categories(), vec!["session", "terminal"]);
    let terminal_tools = registry.get_tools_by_category("terminal");
    assert_eq!(terminal_tools.len(), 1);
    assert_eq!(terminal_tools[0].name(), "categorized_tool");
    assert!(registry.get_tools_by_category("missing").is_empty());
}

#[tokio::test]
async fn test_tool_execution_success() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool::new("exec_tool", "Execution test"));

    let (context, _dir) = create_test_context();
    let result = registry
        .execute_tool("exec_tool", ToolParameters::default(), &context)
        .await;
    assert!(result.success);
    assert_eq!(result.content, "Executed exec_tool with 0 parameters");
}

#[tokio::test]
async fn test_tool_execution_failure() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool::new("failing_tool", "Always fails").failing());

    let (context, _dir) = create_test_context();
    let result = registry
        .execute_tool("failing_tool", ToolParameters::default(), &context)
        .await;
    assert!(!result.success);
    assert_eq!(result.error.unwrap(), "Test tool failed intentionally");
}

#[tokio::test]
async fn test_tool_execution_not_found() {
    let registry = ToolRegistry::new();
    let (context, _dir) = create_test_context();
    let result = registry
        .execute_tool("nonexistent_tool", ToolParameters::default(), &context)
        .await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_parameters_from_json() {
    let params = ToolParameters::from_json(serde_json::json!({
        "command": "echo hi",
        "timeout_ms": 250,
    }));
    assert_eq!(params.get_required::<String>("command").unwrap(), "echo hi");
    assert_eq!(params.get_optional::<u64>("timeout_ms").unwrap(), Some(250));
    assert_eq!(params.get_optional::<u64>("missing").unwrap(), None);
    assert!(params.get_required::<String>("missing").is_err());
    assert!(params.get_required::<u64>("command").is_err());
}
