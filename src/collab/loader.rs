use crate::collab::stats;
use crate::collab::{CollaboratorError, LoadError};
use crate::vm::{Dataset, Metrics, Record};

use std::fs;

use tracing::debug;

const PHRED_OFFSET: u8 = 33;

/// `load` must equal reading the whole file and calling `decode`; the chunked
/// LOAD path relies on it.
pub trait FileLoader: Send + Sync {
    fn supports(&self, format: &str) -> bool;

    fn load(&self, path: &str, format: &str) -> Result<Dataset, LoadError> {
        if !self.supports(format) {
            return Err(LoadError::UnsupportedFormat(format.to_string()));
        }

        let bytes = fs::read(path)?;
        self.decode(path, format, bytes)
    }

    fn decode(&self, path: &str, format: &str, bytes: Vec<u8>) -> Result<Dataset, LoadError>;

    fn filter(&self, dataset: &Dataset, min_phred: f64) -> Result<Dataset, CollaboratorError>;

    fn analyze_quality(&self, dataset: &Dataset) -> Result<Metrics, CollaboratorError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceLoader;

impl SequenceLoader {
    pub const FORMATS: [&'static str; 3] = ["FASTA", "FASTQ", "VCF"];
}

impl FileLoader for SequenceLoader {
    fn supports(&self, format: &str) -> bool {
        Self::FORMATS.iter().any(|supported| *supported == format)
    }

    fn decode(&self, path: &str, format: &str, bytes: Vec<u8>) -> Result<Dataset, LoadError> {
        let text =
            String::from_utf8(bytes).map_err(|err| LoadError::malformed(format, err.to_string()))?;

        let records = match format {
            "FASTA" => parse_fasta(&text)?,
            "FASTQ" => parse_fastq(&text)?,
            "VCF" => parse_vcf(&text)?,
            _ => return Err(LoadError::UnsupportedFormat(format.to_string())),
        };

        debug!(path, format, records = records.len(), "decoded");

        Ok(Dataset::new(format, path, records))
    }

    fn filter(&self, dataset: &Dataset, min_phred: f64) -> Result<Dataset, CollaboratorError> {
        let records = dataset
            .records
            .iter()
            .filter(|record| stats::mean_quality(record) >= min_phred)
            .cloned()
            .collect();

        Ok(dataset.with_records(records))
    }

    fn analyze_quality(&self, dataset: &Dataset) -> Result<Metrics, CollaboratorError> {
        let phred_scores = dataset
            .records
            .iter()
            .filter_map(|record| record.quality.as_ref())
            .flatten()
            .copied()
            .collect();

        Ok(Metrics {
            phred_scores,
            coverage_depth: stats::coverage_depth(dataset),
            gc_content: stats::gc_content(dataset),
            read_length: stats::mean_length(dataset),
        })
    }
}

fn parse_fasta(text: &str) -> Result<Vec<Record>, LoadError> {
    let mut records: Vec<Record> = vec![];

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            records.push(Record::new(header.trim(), "", None));
        } else {
            match records.last_mut() {
                Some(record) => record.sequence.push_str(line),
                None => {
                    return Err(LoadError::malformed(
                        "FASTA",
                        format!("line {}: sequence data before the first header", n + 1),
                    ))
                }
            }
        }
    }

    Ok(records)
}

fn parse_fastq(text: &str) -> Result<Vec<Record>, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim_end()));
    let mut records = vec![];

    while let Some((n, header)) = lines.next() {
        // blank lines only between records; sequence and quality may be empty
        if header.is_empty() {
            continue;
        }

        let truncated = || LoadError::malformed("FASTQ", format!("line {}: truncated record", n));
        let mut next = || lines.next().ok_or_else(truncated);
        let (_, sequence) = next()?;
        let (separator_line, separator) = next()?;
        let (quality_line, quality) = next()?;

        let id = header
            .strip_prefix('@')
            .ok_or_else(|| LoadError::malformed("FASTQ", format!("line {}: expected `@`", n)))?;

        if !separator.starts_with('+') {
            return Err(LoadError::malformed(
                "FASTQ",
                format!("line {}: expected `+`", separator_line),
            ));
        }

        if quality.len() != sequence.len() {
            return Err(LoadError::malformed(
                "FASTQ",
                format!("line {}: quality length does not match sequence", quality_line),
            ));
        }

        let scores = quality
            .bytes()
            .map(|q| {
                q.checked_sub(PHRED_OFFSET).ok_or_else(|| {
                    LoadError::malformed("FASTQ", format!("line {}: invalid quality", quality_line))
                })
            })
            .collect::<Result<Vec<u8>, LoadError>>()?;

        records.push(Record::new(id.trim(), sequence, Some(scores)));
    }

    Ok(records)
}

// <CHROM> <POS> <ID> <REF> <ALT> [<QUAL> ...]
//
// One record per variant: the ID (or `CHROM:POS` when it is `.`) and the ALT
// allele. A numeric QUAL becomes the score of every ALT base.
fn parse_vcf(text: &str) -> Result<Vec<Record>, LoadError> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            let fields: Vec<&str> = line.split_whitespace().collect();

            let (chrom, pos, id, alt) = match fields.as_slice() {
                [chrom, pos, id, _, alt, ..] => (*chrom, *pos, *id, *alt),
                _ => {
                    return Err(LoadError::malformed(
                        "VCF",
                        format!("line {}: expected at least 5 columns", n),
                    ))
                }
            };

            let id = match id {
                "." => format!("{}:{}", chrom, pos),
                id => id.to_string(),
            };

            let quality = match fields.get(5) {
                None | Some(&".") => None,
                Some(qual) => {
                    let qual = qual.parse::<f64>().map_err(|_| {
                        LoadError::malformed("VCF", format!("line {}: invalid QUAL `{}`", n, qual))
                    })?;
                    Some(vec![qual.round().clamp(0.0, 255.0) as u8; alt.len()])
                }
            };

            Ok(Record::new(id, alt.to_string(), quality))
        })
        .collect()
}

pub fn encode_quality(scores: &[u8]) -> String {
    scores
        .iter()
        .map(|&q| char::from(q.saturating_add(PHRED_OFFSET)))
        .collect()
}
