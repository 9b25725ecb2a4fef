use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a sprig repository (or any parent): {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] sprig_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] sprig_refs::RefError),

    #[error("tree error: {0}")]
    Tree(#[from] sprig_tree::TreeError),

    #[error("graph error: {0}")]
    Graph(#[from] sprig_graph::GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
