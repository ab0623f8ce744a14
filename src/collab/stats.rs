use crate::vm::{Dataset, Record};

fn is_gc(base: char) -> bool {
    matches!(base, 'G' | 'C' | 'g' | 'c')
}

// records without qualities score 0
pub fn mean_quality(record: &Record) -> f64 {
    match &record.quality {
        Some(quality) if !quality.is_empty() => {
            quality.iter().map(|&q| f64::from(q)).sum::<f64>() / quality.len() as f64
        }
        _ => 0.0,
    }
}

pub fn record_gc(record: &Record) -> f64 {
    let len = record.sequence.chars().count();

    if len == 0 {
        0.0
    } else {
        record.sequence.chars().filter(|&base| is_gc(base)).count() as f64 / len as f64
    }
}

pub fn total_bases(dataset: &Dataset) -> usize {
    dataset
        .records
        .iter()
        .map(|record| record.sequence.chars().count())
        .sum()
}

pub fn gc_content(dataset: &Dataset) -> f64 {
    let total = total_bases(dataset);

    if total == 0 {
        return 0.0;
    }

    let gc: usize = dataset
        .records
        .iter()
        .map(|record| record.sequence.chars().filter(|&base| is_gc(base)).count())
        .sum();

    gc as f64 / total as f64
}

pub fn mean_length(dataset: &Dataset) -> f64 {
    if dataset.records.is_empty() {
        0.0
    } else {
        total_bases(dataset) as f64 / dataset.records.len() as f64
    }
}

// total bases over the longest record
pub fn coverage_depth(dataset: &Dataset) -> f64 {
    let longest = dataset
        .records
        .iter()
        .map(|record| record.sequence.chars().count())
        .max()
        .unwrap_or(0);

    if longest == 0 {
        0.0
    } else {
        total_bases(dataset) as f64 / longest as f64
    }
}

pub fn mean_dataset_quality(dataset: &Dataset) -> f64 {
    let scores: Vec<u8> = dataset
        .records
        .iter()
        .filter_map(|record| record.quality.as_ref())
        .flatten()
        .copied()
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|&q| f64::from(q)).sum::<f64>() / scores.len() as f64
    }
}
