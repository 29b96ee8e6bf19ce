use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogueError {
    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // Graph integrity errors
    #[error("Node '{0}' not found in graph")]
    UnknownNode(String),

    #[error("Conditional cycle detected at node '{0}'")]
    ConditionalCycle(String),

    #[error("Branch resolution exceeded max depth ({depth}) at node '{node_id}'")]
    ResolveDepthExceeded { node_id: String, depth: usize },
}

pub type Result<T> = std::result::Result<T, DialogueError>;
