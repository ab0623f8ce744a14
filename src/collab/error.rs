use std::io;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("unsupported file format `{0}`")]
    UnsupportedFormat(String),

    #[error("i/o failure: {0}")]
    Io(String),

    #[error("malformed {format} input: {message}")]
    Malformed { format: String, message: String },
}

impl LoadError {
    pub fn malformed<S: Into<String>, T: Into<String>>(format: S, message: T) -> LoadError {
        LoadError::Malformed {
            format: format.into(),
            message: message.into(),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(error: io::Error) -> Self {
        LoadError::Io(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new<S: Into<String>>(message: S) -> CollaboratorError {
        CollaboratorError(message.into())
    }
}

impl From<LoadError> for CollaboratorError {
    fn from(error: LoadError) -> Self {
        CollaboratorError(error.to_string())
    }
}

impl From<io::Error> for CollaboratorError {
    fn from(error: io::Error) -> Self {
        CollaboratorError(error.to_string())
    }
}
