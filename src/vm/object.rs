use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

// `quality` holds decoded Phred scores, one per base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub sequence: String,
    pub quality: Option<Vec<u8>>,
}

impl Record {
    pub fn new<S: Into<String>>(id: S, sequence: S, quality: Option<Vec<u8>>) -> Record {
        Record {
            id: id.into(),
            sequence: sequence.into(),
            quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub format: String,
    pub source: String,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new<S: Into<String>>(format: S, source: S, records: Vec<Record>) -> Dataset {
        Dataset {
            format: format.into(),
            source: source.into(),
            records,
        }
    }

    pub fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            format: self.format.clone(),
            source: self.source.clone(),
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub phred_scores: Vec<u8>,
    pub coverage_depth: f64,
    pub gc_content: f64,
    pub read_length: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub id: String,
    pub statement: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub id: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Dataset,
    Metrics,
    Proof,
    Model,
    Boolean,
    Scalar,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Dataset => write!(f, "dataset"),
            ValueKind::Metrics => write!(f, "metrics"),
            ValueKind::Proof => write!(f, "proof"),
            ValueKind::Model => write!(f, "model"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Scalar => write!(f, "scalar"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Dataset(Arc<Dataset>),
    Metrics(Arc<Metrics>),
    Proof(Arc<Proof>),
    Model(Arc<Model>),
    Boolean(bool),
    Scalar(f64),
}

impl Value {
    pub fn dataset(dataset: Dataset) -> Value {
        Value::Dataset(Arc::new(dataset))
    }

    pub fn metrics(metrics: Metrics) -> Value {
        Value::Metrics(Arc::new(metrics))
    }

    pub fn proof(proof: Proof) -> Value {
        Value::Proof(Arc::new(proof))
    }

    pub fn model(model: Model) -> Value {
        Value::Model(Arc::new(model))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Dataset(_) => ValueKind::Dataset,
            Value::Metrics(_) => ValueKind::Metrics,
            Value::Proof(_) => ValueKind::Proof,
            Value::Model(_) => ValueKind::Model,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Scalar(_) => ValueKind::Scalar,
        }
    }

    pub fn as_dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Value::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(scalar) => Some(*scalar),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(boolean) => Some(*boolean),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Dataset(dataset) => write!(
                f,
                "{} dataset `{}` [{}]",
                dataset.format,
                dataset.source,
                dataset.records.iter().map(|record| &record.id).join(", ")
            ),
            Value::Metrics(metrics) => write!(
                f,
                "metrics {{ coverage: {}, gc: {}, read_length: {}, phred_scores: {} }}",
                metrics.coverage_depth,
                metrics.gc_content,
                metrics.read_length,
                metrics.phred_scores.len()
            ),
            Value::Proof(proof) => write!(f, "proof `{}` of \"{}\"", proof.id, proof.statement),
            Value::Model(model) => write!(f, "model `{}`", model.id),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Scalar(x) => write!(f, "{}", x),
        }
    }
}
