use crate::collab::{
    Analyzer, CollaboratorError, ConditionFilter, FileLoader, SequenceAnalyzer, SequenceExporter,
    SequenceLoader,
};
use crate::vm::Value;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Filter,
    Export,
    Train,
    Predict,
    GenerateProof,
    VerifyProof,
    SubmitProof,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[rustfmt::skip]
        let pretty = match self {
            Verb::Filter        => "FILTER",
            Verb::Export        => "EXPORT",
            Verb::Train         => "TRAIN",
            Verb::Predict       => "PREDICT",
            Verb::GenerateProof => "GENERATE_PROOF",
            Verb::VerifyProof   => "VERIFY_PROOF",
            Verb::SubmitProof   => "SUBMIT_PROOF",
        };

        write!(f, "{}", pretty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub verb: Verb,
    pub args: Vec<Value>,
    pub operands: Vec<String>,
}

// only EXPORT may answer `None`
pub trait Collaborator: Send + Sync {
    fn call(&self, request: Request) -> Result<Option<Value>, CollaboratorError>;
}

impl<F> Collaborator for F
where
    F: Fn(Request) -> Result<Option<Value>, CollaboratorError> + Send + Sync,
{
    fn call(&self, request: Request) -> Result<Option<Value>, CollaboratorError> {
        self(request)
    }
}

#[derive(Clone)]
pub struct Collaborators {
    loader: Arc<dyn FileLoader>,
    analyzer: Arc<dyn Analyzer>,
    verbs: HashMap<Verb, Arc<dyn Collaborator>>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut verbs: Vec<_> = self.verbs.keys().collect();
        verbs.sort_by_key(|verb| verb.to_string());

        f.debug_struct("Collaborators").field("verbs", &verbs).finish()
    }
}

impl Default for Collaborators {
    fn default() -> Collaborators {
        Collaborators::reference()
    }
}

impl Collaborators {
    pub fn new<L, A>(loader: L, analyzer: A) -> Collaborators
    where
        L: FileLoader + 'static,
        A: Analyzer + 'static,
    {
        Collaborators {
            loader: Arc::new(loader),
            analyzer: Arc::new(analyzer),
            verbs: HashMap::new(),
        }
    }

    // TRAIN, PREDICT and the proof verbs stay unregistered
    pub fn reference() -> Collaborators {
        Collaborators::new(SequenceLoader, SequenceAnalyzer)
            .with(Verb::Filter, ConditionFilter)
            .with(Verb::Export, SequenceExporter)
    }

    pub fn with<C: Collaborator + 'static>(mut self, verb: Verb, collaborator: C) -> Collaborators {
        self.register(verb, collaborator);
        self
    }

    pub fn register<C: Collaborator + 'static>(&mut self, verb: Verb, collaborator: C) {
        self.verbs.insert(verb, Arc::new(collaborator));
    }

    pub fn loader(&self) -> &Arc<dyn FileLoader> {
        &self.loader
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    pub fn get(&self, verb: Verb) -> Option<&Arc<dyn Collaborator>> {
        self.verbs.get(&verb)
    }
}
