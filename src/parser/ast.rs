use std::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, PartialEq)]
pub struct QualityFilter {
    pub min_phred: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Load {
        format: String,
        path: String,
        target: String,
        quality_filter: Option<QualityFilter>,
    },
    Analyze {
        target: String,
        operation: String,
        parameters: Vec<String>,
        output: String,
    },
    Filter {
        target: String,
        condition: String,
        output: String,
    },
    Export {
        source: String,
        path: String,
        format: Option<String>,
    },
    Train {
        data: String,
        reference: String,
        output: String,
    },
    Predict {
        data: String,
        model: Option<String>,
        output: String,
    },
    GenerateProof {
        dataset: String,
        query: String,
        output: String,
    },
    VerifyProof {
        proof: String,
        output: String,
    },
    SubmitProof {
        proof: String,
        network: String,
        output: Option<String>,
    },
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Load { .. } => "LOAD",
            Statement::Analyze { .. } => "ANALYZE",
            Statement::Filter { .. } => "FILTER",
            Statement::Export { .. } => "EXPORT",
            Statement::Train { .. } => "TRAIN",
            Statement::Predict { .. } => "PREDICT",
            Statement::GenerateProof { .. } => "GENERATE",
            Statement::VerifyProof { .. } => "VERIFY",
            Statement::SubmitProof { .. } => "SUBMIT",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Load {
                format,
                path,
                target,
                quality_filter,
            } => {
                write!(f, "LOAD {} \"{}\" -> {}", format, path, target)?;
                if let Some(filter) = quality_filter {
                    write!(f, " QUALITY ABOVE {}", filter.min_phred)?;
                }
                Ok(())
            }
            Statement::Analyze {
                target,
                operation,
                parameters,
                output,
            } => {
                write!(f, "ANALYZE {} {}", target, operation)?;
                if !parameters.is_empty() {
                    write!(f, " {}", parameters.iter().join(" "))?;
                }
                write!(f, " -> {}", output)
            }
            Statement::Filter {
                target,
                condition,
                output,
            } => write!(f, "FILTER {} WHERE \"{}\" -> {}", target, condition, output),
            Statement::Export {
                source,
                path,
                format,
            } => {
                write!(f, "EXPORT {} TO \"{}\"", source, path)?;
                if let Some(format) = format {
                    write!(f, " AS {}", format)?;
                }
                Ok(())
            }
            Statement::Train {
                data,
                reference,
                output,
            } => write!(f, "TRAIN MODEL ON {} WITH {} -> {}", data, reference, output),
            Statement::Predict {
                data,
                model,
                output,
            } => match model {
                Some(model) => {
                    write!(f, "PREDICT IMPACT {} USING {} -> {}", data, model, output)
                }
                None => write!(f, "PREDICT IMPACT {} -> {}", data, output),
            },
            Statement::GenerateProof {
                dataset,
                query,
                output,
            } => write!(f, "GENERATE PROOF {} \"{}\" -> {}", dataset, query, output),
            Statement::VerifyProof { proof, output } => {
                write!(f, "VERIFY {} -> {}", proof, output)
            }
            Statement::SubmitProof {
                proof,
                network,
                output,
            } => {
                write!(f, "SUBMIT {} TO {}", proof, network)?;
                if let Some(output) = output {
                    write!(f, " -> {}", output)?;
                }
                Ok(())
            }
        }
    }
}

pub type Program = Vec<Statement>;

// Statement
pub fn load<S: Into<String>>(format: S, path: S, target: S, min_phred: Option<f64>) -> Statement {
    Statement::Load {
        format: format.into(),
        path: path.into(),
        target: target.into(),
        quality_filter: min_phred.map(|min_phred| QualityFilter { min_phred }),
    }
}

pub fn analyze<S: Into<String>>(
    target: S,
    operation: S,
    parameters: Vec<S>,
    output: S,
) -> Statement {
    Statement::Analyze {
        target: target.into(),
        operation: operation.into(),
        parameters: parameters.into_iter().map(Into::into).collect(),
        output: output.into(),
    }
}

pub fn filter<S: Into<String>>(target: S, condition: S, output: S) -> Statement {
    Statement::Filter {
        target: target.into(),
        condition: condition.into(),
        output: output.into(),
    }
}

pub fn export<S: Into<String>>(source: S, path: S, format: Option<S>) -> Statement {
    Statement::Export {
        source: source.into(),
        path: path.into(),
        format: format.map(Into::into),
    }
}

pub fn train<S: Into<String>>(data: S, reference: S, output: S) -> Statement {
    Statement::Train {
        data: data.into(),
        reference: reference.into(),
        output: output.into(),
    }
}

pub fn predict<S: Into<String>>(data: S, model: Option<S>, output: S) -> Statement {
    Statement::Predict {
        data: data.into(),
        model: model.map(Into::into),
        output: output.into(),
    }
}

pub fn generate_proof<S: Into<String>>(dataset: S, query: S, output: S) -> Statement {
    Statement::GenerateProof {
        dataset: dataset.into(),
        query: query.into(),
        output: output.into(),
    }
}

pub fn verify_proof<S: Into<String>>(proof: S, output: S) -> Statement {
    Statement::VerifyProof {
        proof: proof.into(),
        output: output.into(),
    }
}

pub fn submit_proof<S: Into<String>>(proof: S, network: S, output: Option<S>) -> Statement {
    Statement::SubmitProof {
        proof: proof.into(),
        network: network.into(),
        output: output.map(Into::into),
    }
}
