use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{what} '{id}' not found")]
    NotFound { what: &'static str, id: String },
    #[error("invalid {path}: expected {expected}, got {received}")]
    Validation {
        path: String,
        expected: &'static str,
        received: String,
    },
    #[error("unsupported query operator '{0}'")]
    UnsupportedOperator(String),
    #[error("entity '{0}' already exists")]
    AlreadyExists(String),
}

impl GraphError {
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        GraphError::NotFound {
            what,
            id: id.into(),
        }
    }

    pub fn validation(
        path: impl Into<String>,
        expected: &'static str,
        received: impl Into<String>,
    ) -> Self {
        GraphError::Validation {
            path: path.into(),
            expected,
            received: received.into(),
        }
    }
}
