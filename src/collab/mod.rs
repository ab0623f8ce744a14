mod analyzer;
mod error;
mod loader;
mod registry;
mod stats;
mod verbs;

pub use analyzer::{Analyzer, SequenceAnalyzer};
pub use error::{CollaboratorError, LoadError};
pub use loader::{FileLoader, SequenceLoader};
pub use registry::{Collaborator, Collaborators, Request, Verb};
pub use verbs::{ConditionFilter, SequenceExporter};
