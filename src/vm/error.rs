use crate::vm::ValueKind;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("unbound variable: `{0}`")]
    UnboundVariable(String),

    #[error("unsupported file format: `{0}`")]
    UnsupportedFormat(String),

    #[error("unsupported operation: `{0}`")]
    UnsupportedOperation(String),

    #[error("type mismatch: `{name}` is a {found}, expected a {expected}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("no collaborator registered for `{0}`")]
    NoCollaborator(String),

    #[error("{verb} failed: {message}")]
    CollaboratorFailure { verb: String, message: String },

    #[error("invalid bytecode: {0}")]
    InvalidBytecode(String),
}

impl RuntimeError {
    pub fn collaborator_failure<S, T>(verb: S, message: T) -> RuntimeError
    where
        S: Into<String>,
        T: ToString,
    {
        RuntimeError::CollaboratorFailure {
            verb: verb.into(),
            message: message.to_string(),
        }
    }

    pub fn type_mismatch<S>(name: S, expected: ValueKind, found: ValueKind) -> RuntimeError
    where
        S: Into<String>,
    {
        RuntimeError::TypeMismatch {
            name: name.into(),
            expected,
            found,
        }
    }
}
