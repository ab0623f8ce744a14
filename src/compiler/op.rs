use std::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    LoadFile,
    FilterQuality,
    Analyze,
    Filter,
    Export,
    Store,
    LoadVar,
    Train,
    Predict,
    GenerateProof,
    VerifyProof,
    SubmitProof,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[rustfmt::skip]
        let pretty = match self {
            Opcode::LoadFile      => "LOAD_FILE",
            Opcode::FilterQuality => "FILTER_QUALITY",
            Opcode::Analyze       => "ANALYZE",
            Opcode::Filter        => "FILTER",
            Opcode::Export        => "EXPORT",
            Opcode::Store         => "STORE",
            Opcode::LoadVar       => "LOAD_VAR",
            Opcode::Train         => "TRAIN",
            Opcode::Predict       => "PREDICT",
            Opcode::GenerateProof => "GENERATE_PROOF",
            Opcode::VerifyProof   => "VERIFY_PROOF",
            Opcode::SubmitProof   => "SUBMIT_PROOF",
        };

        write!(f, "{}", pretty)
    }
}

// Value-producing instructions leave their result in the VM register.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    LoadFile { format: String, path: String },
    FilterQuality { min_phred: f64 },
    Analyze { operation: String, parameters: Vec<String> },
    Filter { condition: String },
    Export { path: String, format: Option<String> },
    Store(String),
    LoadVar(String),

    // Extension verbs resolve their inputs by name
    Train { data: String, reference: String },
    Predict { data: String, model: Option<String> },
    GenerateProof { dataset: String, query: String },
    VerifyProof { proof: String },
    SubmitProof { proof: String, network: String },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::LoadFile { .. } => Opcode::LoadFile,
            Instruction::FilterQuality { .. } => Opcode::FilterQuality,
            Instruction::Analyze { .. } => Opcode::Analyze,
            Instruction::Filter { .. } => Opcode::Filter,
            Instruction::Export { .. } => Opcode::Export,
            Instruction::Store(_) => Opcode::Store,
            Instruction::LoadVar(_) => Opcode::LoadVar,
            Instruction::Train { .. } => Opcode::Train,
            Instruction::Predict { .. } => Opcode::Predict,
            Instruction::GenerateProof { .. } => Opcode::GenerateProof,
            Instruction::VerifyProof { .. } => Opcode::VerifyProof,
            Instruction::SubmitProof { .. } => Opcode::SubmitProof,
        }
    }

    pub fn operands(&self) -> Vec<String> {
        match self {
            Instruction::LoadFile { format, path } => vec![format.clone(), path.clone()],
            Instruction::FilterQuality { min_phred } => vec![min_phred.to_string()],
            Instruction::Analyze {
                operation,
                parameters,
            } => {
                let mut operands = vec![operation.clone()];
                operands.extend(parameters.iter().cloned());
                operands
            }
            Instruction::Filter { condition } => vec![condition.clone()],
            Instruction::Export { path, format } => {
                let mut operands = vec![path.clone()];
                operands.extend(format.iter().cloned());
                operands
            }
            Instruction::Store(name) | Instruction::LoadVar(name) => vec![name.clone()],
            Instruction::Train { data, reference } => vec![data.clone(), reference.clone()],
            Instruction::Predict { data, model } => {
                let mut operands = vec![data.clone()];
                operands.extend(model.clone());
                operands
            }
            Instruction::GenerateProof { dataset, query } => vec![dataset.clone(), query.clone()],
            Instruction::VerifyProof { proof } => vec![proof.clone()],
            Instruction::SubmitProof { proof, network } => vec![proof.clone(), network.clone()],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();

        if operands.is_empty() {
            write!(f, "{}", self.opcode())
        } else {
            write!(f, "{} {}", self.opcode(), operands.iter().join(", "))
        }
    }
}
