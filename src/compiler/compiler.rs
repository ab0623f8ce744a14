use crate::compiler::Instruction;
use crate::parser::ast::*;

use std::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, PartialEq)]
pub struct ByteCode {
    pub instructions: Vec<Instruction>,
}

impl fmt::Display for ByteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.instructions
                .iter()
                .enumerate()
                .map(|(pc, instruction)| format!("{:04} {}", pc, instruction))
                .join("\n")
        )
    }
}

#[derive(Debug, Default)]
pub struct Compiler {
    instructions: Vec<Instruction>,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            instructions: vec![],
        }
    }

    pub fn compile(mut self, ast: &[Statement]) -> ByteCode {
        ast.iter().for_each(|stmt| self.compile_stmt(stmt));

        ByteCode {
            instructions: self.instructions,
        }
    }

    fn compile_stmt(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Load {
                format,
                path,
                target,
                quality_filter,
            } => {
                self.emit(Instruction::LoadFile {
                    format: format.clone(),
                    path: path.clone(),
                });
                if let Some(filter) = quality_filter {
                    self.emit(Instruction::FilterQuality {
                        min_phred: filter.min_phred,
                    });
                }
                self.emit(Instruction::Store(target.clone()));
            }
            Statement::Analyze {
                target,
                operation,
                parameters,
                output,
            } => {
                self.emit(Instruction::LoadVar(target.clone()));
                self.emit(Instruction::Analyze {
                    operation: operation.clone(),
                    parameters: parameters.clone(),
                });
                self.emit(Instruction::Store(output.clone()));
            }
            Statement::Filter {
                target,
                condition,
                output,
            } => {
                self.emit(Instruction::LoadVar(target.clone()));
                self.emit(Instruction::Filter {
                    condition: condition.clone(),
                });
                self.emit(Instruction::Store(output.clone()));
            }
            Statement::Export {
                source,
                path,
                format,
            } => {
                self.emit(Instruction::LoadVar(source.clone()));
                self.emit(Instruction::Export {
                    path: path.clone(),
                    format: format.clone(),
                });
            }
            Statement::Train {
                data,
                reference,
                output,
            } => {
                self.emit(Instruction::Train {
                    data: data.clone(),
                    reference: reference.clone(),
                });
                self.emit(Instruction::Store(output.clone()));
            }
            Statement::Predict {
                data,
                model,
                output,
            } => {
                self.emit(Instruction::Predict {
                    data: data.clone(),
                    model: model.clone(),
                });
                self.emit(Instruction::Store(output.clone()));
            }
            Statement::GenerateProof {
                dataset,
                query,
                output,
            } => {
                self.emit(Instruction::GenerateProof {
                    dataset: dataset.clone(),
                    query: query.clone(),
                });
                self.emit(Instruction::Store(output.clone()));
            }
            Statement::VerifyProof { proof, output } => {
                self.emit(Instruction::VerifyProof {
                    proof: proof.clone(),
                });
                self.emit(Instruction::Store(output.clone()));
            }
            Statement::SubmitProof {
                proof,
                network,
                output,
            } => {
                self.emit(Instruction::SubmitProof {
                    proof: proof.clone(),
                    network: network.clone(),
                });
                if let Some(output) = output {
                    self.emit(Instruction::Store(output.clone()));
                }
            }
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

pub fn lower(ast: &[Statement]) -> Vec<Instruction> {
    Compiler::new().compile(ast).instructions
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::compiler::Opcode;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    use test_case::test_case;

    fn load_file(format: &str, path: &str) -> Instruction {
        Instruction::LoadFile {
            format: format.to_string(),
            path: path.to_string(),
        }
    }

    fn store(name: &str) -> Instruction {
        Instruction::Store(name.to_string())
    }

    fn load_var(name: &str) -> Instruction {
        Instruction::LoadVar(name.to_string())
    }

    #[test_case(
        "LOAD FASTA \"genome.fa\" -> ref",
        vec![load_file("FASTA", "genome.fa"), store("ref")] ;
        "load"
    )]
    #[test_case(
        "LOAD BAM \"s.bam\" QUALITY ABOVE 30 -> reads",
        vec![
            load_file("BAM", "s.bam"),
            Instruction::FilterQuality { min_phred: 30.0 },
            store("reads"),
        ] ;
        "load with quality filter"
    )]
    #[test_case(
        "ANALYZE genome WINDOW k -> w",
        vec![
            load_var("genome"),
            Instruction::Analyze {
                operation: "WINDOW".to_string(),
                parameters: vec!["k".to_string()],
            },
            store("w"),
        ] ;
        "analyze"
    )]
    #[test_case(
        "FILTER genome WHERE \"LENGTH > 10\" -> long",
        vec![
            load_var("genome"),
            Instruction::Filter { condition: "LENGTH > 10".to_string() },
            store("long"),
        ] ;
        "filter"
    )]
    #[test_case(
        "EXPORT long TO \"out.fa\"",
        vec![
            load_var("long"),
            Instruction::Export { path: "out.fa".to_string(), format: None },
        ] ;
        "export"
    )]
    #[test_case(
        "TRAIN MODEL ON v WITH r -> m",
        vec![
            Instruction::Train { data: "v".to_string(), reference: "r".to_string() },
            store("m"),
        ] ;
        "train"
    )]
    #[test_case(
        "PREDICT IMPACT v USING m -> i\nPREDICT IMPACT v -> j",
        vec![
            Instruction::Predict { data: "v".to_string(), model: Some("m".to_string()) },
            store("i"),
            Instruction::Predict { data: "v".to_string(), model: None },
            store("j"),
        ] ;
        "predict with and without model"
    )]
    #[test_case(
        "SUBMIT p TO ETHEREUM",
        vec![Instruction::SubmitProof { proof: "p".to_string(), network: "ETHEREUM".to_string() }] ;
        "submit without output"
    )]
    fn test_compile(input: &str, expected: Vec<Instruction>) {
        let ast = parse(tokenize(input).unwrap()).unwrap();

        assert_eq!(lower(&ast), expected)
    }

    #[test]
    fn lowering_is_deterministic() {
        let ast = parse(
            tokenize(
                "LOAD FASTA \"p\" -> a\n\
                 ANALYZE a COUNT_GC -> b\n\
                 GENERATE PROOF a \"QUERY x\" -> p\n\
                 VERIFY p -> ok",
            )
            .unwrap(),
        )
        .unwrap();

        let first = lower(&ast);
        let second = lower(&ast);

        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|i| i.opcode()).collect::<Vec<_>>(),
            vec![
                Opcode::LoadFile,
                Opcode::Store,
                Opcode::LoadVar,
                Opcode::Analyze,
                Opcode::Store,
                Opcode::GenerateProof,
                Opcode::Store,
                Opcode::VerifyProof,
                Opcode::Store,
            ]
        );
    }

    #[test]
    fn disassembly() {
        let ast = parse(tokenize("LOAD FASTA \"p\" -> a QUALITY ABOVE 20").unwrap()).unwrap();
        let byte_code = Compiler::new().compile(&ast);

        assert_eq!(
            byte_code.to_string(),
            "0000 LOAD_FILE FASTA, p\n0001 FILTER_QUALITY 20\n0002 STORE a"
        );
    }
}
