//! Declared capabilities bound into every created agent.

pub mod builtin;
pub mod registry;
pub mod types;

pub use builtin::default_registry;
pub use registry::{FunctionDeclaration, FunctionTool, ToolDefinition, ToolRegistry};
pub use types::ParameterSchema;
