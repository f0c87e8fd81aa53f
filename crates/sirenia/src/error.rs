#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },
    #[error("edge {edge} references unknown node: {id}")]
    UnknownNode { edge: usize, id: String },
    #[error("node {node} references unknown parent: {parent}")]
    UnknownParent { node: String, parent: String },
    #[error("node {node} is its own ancestor")]
    ParentCycle { node: String },
    #[error("unknown {kind} strategy: {value}")]
    UnknownStrategy { kind: &'static str, value: String },
    #[error("invalid layout options: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
