//! Tool declarations and the process-wide registry.
//!
//! The registry is purely descriptive from the session core's point of
//! view: declarations are sent once at agent creation, and the only
//! runtime dispatch happens inside the client's run-processing loop when
//! the service asks for function outputs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::ParameterSchema;

/// A capability declared to the remote agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    Function { function: FunctionDeclaration },
    CodeInterpreter,
}

/// Declaration of one invokable function: name, schema, description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Handler signature: pure, synchronous, deterministic given its input.
type Handler = dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync;

/// A declared function together with its local implementation.
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: ParameterSchema,
    handler: Arc<Handler>,
}

impl FunctionTool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(&serde_json::Value) -> serde_json::Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The wire declaration for this function.
    pub fn declaration(&self) -> ToolDefinition {
        ToolDefinition::Function {
            function: FunctionDeclaration {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameters.schema.clone(),
            },
        }
    }

    /// Run the handler against parsed arguments.
    pub fn invoke(&self, args: &serde_json::Value) -> serde_json::Value {
        (self.handler)(args)
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Read-only set of declared capabilities, shared across all sessions'
/// agents.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<FunctionTool>,
    code_interpreter: bool,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function tool.
    pub fn register(mut self, tool: FunctionTool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Also declare the code-execution capability.
    pub fn with_code_interpreter(mut self) -> Self {
        self.code_interpreter = true;
        self
    }

    /// Declarations for agent creation, functions first.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.iter().map(|t| t.declaration()).collect();
        if self.code_interpreter {
            defs.push(ToolDefinition::CodeInterpreter);
        }
        defs
    }

    pub fn get(&self, name: &str) -> Option<&FunctionTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Execute a declared function by name against JSON-encoded
    /// arguments, returning the JSON-encoded output the service expects
    /// back. Unknown names and unparseable arguments produce an error
    /// object rather than a failure.
    pub fn dispatch(&self, name: &str, arguments: &str) -> String {
        let args: serde_json::Value =
            serde_json::from_str(arguments).unwrap_or_else(|_| serde_json::json!({}));
        let output = match self.get(name) {
            Some(tool) => tool.invoke(&args),
            None => serde_json::json!({"error": format!("Unknown tool: {name}")}),
        };
        output.to_string()
    }
}
