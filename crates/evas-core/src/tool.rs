//! Tool capability classes
//!
//! Tool tokens are opaque names supplied by the host. They are classified
//! here only to reason about what an allowlist grants, most importantly
//! whether it grants file mutation.

use serde::{Deserialize, Serialize};

/// Capability class of a tool token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolClass {
    /// File read operations
    FileRead,
    /// File/content search (glob, grep)
    FileSearch,
    /// File write/edit operations
    FileWrite,
    /// File delete operations
    FileDelete,
    /// Shell/bash command execution
    ShellExecute,
    /// Network requests and web search
    NetworkAccess,
    /// Task/todo bookkeeping and sub-agent spawning
    TaskManage,
    /// MCP tool execution
    McpTool,
    /// Anything else
    Other(String),
}

impl ToolClass {
    /// Classify a tool token by name
    pub fn classify(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "read" | "read_file" | "file_read" | "ls" => ToolClass::FileRead,
            "glob" | "grep" | "search" => ToolClass::FileSearch,
            "write" | "write_file" | "file_write" | "edit" | "multiedit" | "multi_edit"
            | "notebookedit" | "notebook_edit" => ToolClass::FileWrite,
            "delete" | "remove" | "rm" => ToolClass::FileDelete,
            "bash" | "shell" | "exec" | "execute" => ToolClass::ShellExecute,
            "webfetch" | "websearch" | "web_fetch" | "web_search" | "fetch" | "http" => {
                ToolClass::NetworkAccess
            }
            "task" | "todowrite" | "todo_write" => ToolClass::TaskManage,
            name if name.starts_with("mcp_") => ToolClass::McpTool,
            name => ToolClass::Other(name.to_string()),
        }
    }

    /// Whether this class can change files on disk
    pub fn is_mutation(&self) -> bool {
        matches!(self, ToolClass::FileWrite | ToolClass::FileDelete)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ToolClass::FileRead => "file:read",
            ToolClass::FileSearch => "file:search",
            ToolClass::FileWrite => "file:write",
            ToolClass::FileDelete => "file:delete",
            ToolClass::ShellExecute => "shell:execute",
            ToolClass::NetworkAccess => "network:access",
            ToolClass::TaskManage => "task:manage",
            ToolClass::McpTool => "mcp:tool",
            ToolClass::Other(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for ToolClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
