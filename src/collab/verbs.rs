use crate::collab::loader::encode_quality;
use crate::collab::stats;
use crate::collab::{Collaborator, CollaboratorError, Request};
use crate::vm::{Dataset, Record, Value};

use std::fs;
use std::sync::Arc;

use tracing::debug;

fn dataset_arg(request: &Request) -> Result<&Arc<Dataset>, CollaboratorError> {
    match request.args.first() {
        Some(Value::Dataset(dataset)) => Ok(dataset),
        Some(value) => Err(CollaboratorError::new(format!(
            "{} expects a dataset, got a {}",
            request.verb,
            value.kind()
        ))),
        None => Err(CollaboratorError::new(format!("{} expects a dataset", request.verb))),
    }
}

fn operand(request: &Request, index: usize) -> Result<&str, CollaboratorError> {
    request
        .operands
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| {
            CollaboratorError::new(format!("{} is missing operand {}", request.verb, index))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Length,
    Quality,
    Gc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Neq,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Condition {
    field: Field,
    comparison: Comparison,
    threshold: f64,
}

impl Condition {
    // <field> <comparison> <number>
    fn parse(condition: &str) -> Result<Condition, CollaboratorError> {
        let malformed = || CollaboratorError::new(format!("malformed condition \"{}\"", condition));

        let parts: Vec<&str> = condition.split_whitespace().collect();
        let (field, comparison, threshold) = match parts.as_slice() {
            [field, comparison, threshold] => (*field, *comparison, *threshold),
            _ => return Err(malformed()),
        };

        let field = match field.to_ascii_uppercase().as_str() {
            "LENGTH" | "LEN" => Field::Length,
            "QUAL" | "QUALITY" => Field::Quality,
            "GC" => Field::Gc,
            _ => return Err(malformed()),
        };

        #[rustfmt::skip]
        let comparison = match comparison {
            ">"  => Comparison::Gt,
            ">=" => Comparison::Ge,
            "<"  => Comparison::Lt,
            "<=" => Comparison::Le,
            "==" => Comparison::Eq,
            "!=" => Comparison::Neq,
            _    => return Err(malformed()),
        };

        let threshold = threshold.parse::<f64>().map_err(|_| malformed())?;

        Ok(Condition {
            field,
            comparison,
            threshold,
        })
    }

    fn matches(&self, record: &Record) -> bool {
        let value = match self.field {
            Field::Length => record.sequence.chars().count() as f64,
            Field::Quality => stats::mean_quality(record),
            Field::Gc => stats::record_gc(record),
        };

        #[rustfmt::skip]
        let result = match self.comparison {
            Comparison::Gt  => value > self.threshold,
            Comparison::Ge  => value >= self.threshold,
            Comparison::Lt  => value < self.threshold,
            Comparison::Le  => value <= self.threshold,
            Comparison::Eq  => value == self.threshold,
            Comparison::Neq => value != self.threshold,
        };

        result
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionFilter;

impl Collaborator for ConditionFilter {
    fn call(&self, request: Request) -> Result<Option<Value>, CollaboratorError> {
        let dataset = dataset_arg(&request)?;
        let condition = Condition::parse(operand(&request, 0)?)?;

        let records: Vec<Record> = dataset
            .records
            .iter()
            .filter(|record| condition.matches(record))
            .cloned()
            .collect();

        debug!(
            kept = records.len(),
            dropped = dataset.records.len() - records.len(),
            "filtered"
        );

        Ok(Some(Value::dataset(dataset.with_records(records))))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceExporter;

fn fasta_record(record: &Record) -> Result<String, CollaboratorError> {
    Ok(format!(">{}\n{}\n", record.id, record.sequence))
}

fn fastq_record(record: &Record) -> Result<String, CollaboratorError> {
    let quality = record
        .quality
        .as_ref()
        .ok_or_else(|| CollaboratorError::new(format!("record `{}` has no qualities", record.id)))?;

    Ok(format!(
        "@{}\n{}\n+\n{}\n",
        record.id,
        record.sequence,
        encode_quality(quality)
    ))
}

impl SequenceExporter {
    fn render(dataset: &Dataset, format: &str) -> Result<String, CollaboratorError> {
        let render_record: fn(&Record) -> Result<String, CollaboratorError> = match format {
            "FASTA" => fasta_record,
            "FASTQ" => fastq_record,
            format => return Err(CollaboratorError::new(format!("cannot export as `{}`", format))),
        };

        dataset.records.iter().map(render_record).collect()
    }
}

impl Collaborator for SequenceExporter {
    fn call(&self, request: Request) -> Result<Option<Value>, CollaboratorError> {
        let dataset = dataset_arg(&request)?;
        let path = operand(&request, 0)?;
        let format = request
            .operands
            .get(1)
            .map(String::as_str)
            .unwrap_or_else(|| dataset.format.as_str());

        let text = SequenceExporter::render(dataset, format)?;
        fs::write(path, text)?;

        debug!(path, format, records = dataset.records.len(), "exported");

        Ok(None)
    }
}
