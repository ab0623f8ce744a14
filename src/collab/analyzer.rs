use crate::collab::stats;
use crate::collab::CollaboratorError;
use crate::vm::{Dataset, Value};

pub trait Analyzer: Send + Sync {
    fn supports(&self, operation: &str) -> bool;

    fn analyze(
        &self,
        operation: &str,
        dataset: &Dataset,
        parameters: &[String],
    ) -> Result<Value, CollaboratorError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceAnalyzer;

impl SequenceAnalyzer {
    pub const OPERATIONS: [&'static str; 5] = [
        "COUNT_GC",
        "READ_COUNT",
        "MEAN_LENGTH",
        "MEAN_QUALITY",
        "COVERAGE",
    ];
}

impl Analyzer for SequenceAnalyzer {
    fn supports(&self, operation: &str) -> bool {
        Self::OPERATIONS.iter().any(|supported| *supported == operation)
    }

    fn analyze(
        &self,
        operation: &str,
        dataset: &Dataset,
        parameters: &[String],
    ) -> Result<Value, CollaboratorError> {
        if !parameters.is_empty() {
            return Err(CollaboratorError::new(format!(
                "{} takes no parameters, got {}",
                operation,
                parameters.len()
            )));
        }

        #[rustfmt::skip]
        let scalar = match operation {
            "COUNT_GC"     => stats::gc_content(dataset),
            "READ_COUNT"   => dataset.records.len() as f64,
            "MEAN_LENGTH"  => stats::mean_length(dataset),
            "MEAN_QUALITY" => stats::mean_dataset_quality(dataset),
            "COVERAGE"     => stats::coverage_depth(dataset),
            operation      => {
                return Err(CollaboratorError::new(format!("unknown operation {}", operation)))
            }
        };

        Ok(Value::Scalar(scalar))
    }
}
