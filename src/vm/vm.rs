use crate::collab::{Collaborators, LoadError, Request, Verb};
use crate::compiler::{Instruction, Opcode};
use crate::parser::ast::Statement;
use crate::vm::chunked;
use crate::vm::{Dataset, Environment, Result, RuntimeError, Value, ValueKind, VmConfig};

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rayon::ThreadPool;
use tracing::{debug, error, info};

const LOAD: &str = "LOAD";
const ANALYZE: &str = "ANALYZE";
const QUALITY: &str = "QUALITY";

// `name` is what errors report the value as
#[derive(Debug)]
struct Register {
    name: String,
    value: Value,
}

#[derive(Debug)]
pub struct VirtualMachine {
    env: Environment,
    collaborators: Collaborators,
    config: VmConfig,
    pool: Option<ThreadPool>,
    register: Option<Register>,
}

impl VirtualMachine {
    pub fn new(collaborators: Collaborators) -> VirtualMachine {
        VirtualMachine::with_config(collaborators, VmConfig::default())
    }

    pub fn with_config(collaborators: Collaborators, config: VmConfig) -> VirtualMachine {
        VirtualMachine {
            env: Environment::empty(),
            collaborators,
            config,
            pool: None,
            register: None,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    fn reset(&mut self) {
        self.env.clear();
        self.register = None;
    }

    pub fn run_program(&mut self, program: &[Statement]) -> Result<()> {
        self.reset();
        info!(statements = program.len(), "run started");

        for (index, stmt) in program.iter().enumerate() {
            debug!(index, statement = %stmt, "execute");

            if let Err(err) = self.exec_stmt(stmt) {
                error!(
                    index,
                    verb = stmt.kind(),
                    error = %err,
                    bound = self.env.len(),
                    "run aborted"
                );
                return Err(err);
            }
        }

        info!(bound = self.env.len(), "run finished");
        Ok(())
    }

    pub fn run_bytecode(&mut self, instructions: &[Instruction]) -> Result<()> {
        self.reset();
        info!(instructions = instructions.len(), "run started");

        for (pc, instruction) in instructions.iter().enumerate() {
            debug!(pc, instruction = %instruction, "execute");

            if let Err(err) = self.exec_instruction(instruction) {
                error!(
                    pc,
                    opcode = %instruction.opcode(),
                    error = %err,
                    bound = self.env.len(),
                    "run aborted"
                );
                return Err(err);
            }
        }

        self.register = None;
        info!(bound = self.env.len(), "run finished");
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Load {
                format,
                path,
                target,
                quality_filter,
            } => {
                let mut value = self.load(format, path)?;
                if let Some(filter) = quality_filter {
                    value = self.filter_quality(path, &value, filter.min_phred)?;
                }
                self.env.set(target.as_str(), value);
            }
            Statement::Analyze {
                target,
                operation,
                parameters,
                output,
            } => {
                let value = self.resolve(target)?;
                let result = self.analyze(target, &value, operation, parameters)?;
                self.env.set(output.as_str(), result);
            }
            Statement::Filter {
                target,
                condition,
                output,
            } => {
                let value = self.resolve(target)?;
                let result = self.filter(value, condition)?;
                self.env.set(output.as_str(), result);
            }
            Statement::Export {
                source,
                path,
                format,
            } => {
                let value = self.resolve(source)?;
                self.export(value, path, format.as_deref())?;
            }
            Statement::Train {
                data,
                reference,
                output,
            } => {
                let result = self.train(data, reference)?;
                self.env.set(output.as_str(), result);
            }
            Statement::Predict {
                data,
                model,
                output,
            } => {
                let result = self.predict(data, model.as_deref())?;
                self.env.set(output.as_str(), result);
            }
            Statement::GenerateProof {
                dataset,
                query,
                output,
            } => {
                let result = self.generate_proof(dataset, query)?;
                self.env.set(output.as_str(), result);
            }
            Statement::VerifyProof { proof, output } => {
                let result = self.verify_proof(proof)?;
                self.env.set(output.as_str(), result);
            }
            Statement::SubmitProof {
                proof,
                network,
                output,
            } => {
                let result = self.submit_proof(proof, network)?;
                if let Some(output) = output {
                    self.env.set(output.as_str(), result);
                }
            }
        }

        Ok(())
    }

    fn exec_instruction(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction {
            Instruction::LoadFile { format, path } => {
                let value = self.load(format, path)?;
                self.put(path, value);
            }
            Instruction::FilterQuality { min_phred } => {
                let register = self.take_register(instruction.opcode())?;
                let value = self.filter_quality(&register.name, &register.value, *min_phred)?;
                self.put(&register.name, value);
            }
            Instruction::Analyze {
                operation,
                parameters,
            } => {
                let register = self.take_register(instruction.opcode())?;
                let value = self.analyze(&register.name, &register.value, operation, parameters)?;
                self.put(&register.name, value);
            }
            Instruction::Filter { condition } => {
                let register = self.take_register(instruction.opcode())?;
                let value = self.filter(register.value, condition)?;
                self.put(&register.name, value);
            }
            Instruction::Export { path, format } => {
                let register = self.take_register(instruction.opcode())?;
                self.export(register.value, path, format.as_deref())?;
            }
            Instruction::Store(name) => {
                let register = self.take_register(instruction.opcode())?;
                self.env.set(name.as_str(), register.value);
            }
            Instruction::LoadVar(name) => {
                let value = self.resolve(name)?;
                self.put(name, value);
            }
            Instruction::Train { data, reference } => {
                let value = self.train(data, reference)?;
                self.put(data, value);
            }
            Instruction::Predict { data, model } => {
                let value = self.predict(data, model.as_deref())?;
                self.put(data, value);
            }
            Instruction::GenerateProof { dataset, query } => {
                let value = self.generate_proof(dataset, query)?;
                self.put(dataset, value);
            }
            Instruction::VerifyProof { proof } => {
                let value = self.verify_proof(proof)?;
                self.put(proof, value);
            }
            Instruction::SubmitProof { proof, network } => {
                let value = self.submit_proof(proof, network)?;
                self.put(proof, value);
            }
        }

        Ok(())
    }

    fn put(&mut self, name: &str, value: Value) {
        self.register = Some(Register {
            name: name.to_string(),
            value,
        });
    }

    fn take_register(&mut self, opcode: Opcode) -> Result<Register> {
        self.register
            .take()
            .ok_or_else(|| {
                RuntimeError::InvalidBytecode(format!("{} with an empty register", opcode))
            })
    }

    fn resolve(&self, name: &str) -> Result<Value> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnboundVariable(name.to_string()))
    }

    fn load(&mut self, format: &str, path: &str) -> Result<Value> {
        let loader = Arc::clone(self.collaborators.loader());

        if !loader.supports(format) {
            return Err(RuntimeError::UnsupportedFormat(format.to_string()));
        }

        let size = fs::metadata(path).map(|metadata| metadata.len()).ok();

        let dataset = match size {
            Some(size) if size >= self.config.parallel_threshold => {
                let bytes = self.read_chunked(path, size)?;
                loader.decode(path, format, bytes)
            }
            _ => loader.load(path, format),
        }
        .map_err(load_failure)?;

        Ok(Value::dataset(dataset))
    }

    fn read_chunked(&mut self, path: &str, size: u64) -> Result<Vec<u8>> {
        let pool = match self.pool.take() {
            Some(pool) => pool,
            None => chunked::build_pool(self.config.workers)
                .map_err(|err| RuntimeError::collaborator_failure(LOAD, err))?,
        };

        let bytes = chunked::read_chunked(&pool, Path::new(path), size, self.config.chunk_size);
        self.pool = Some(pool);

        bytes.map_err(|err| load_failure(LoadError::from(err)))
    }

    fn filter_quality(&self, name: &str, value: &Value, min_phred: f64) -> Result<Value> {
        let dataset = expect_dataset(name, value)?;

        self.collaborators
            .loader()
            .filter(&dataset, min_phred)
            .map(Value::dataset)
            .map_err(|err| RuntimeError::collaborator_failure(LOAD, err))
    }

    fn analyze(
        &self,
        name: &str,
        value: &Value,
        operation: &str,
        parameters: &[String],
    ) -> Result<Value> {
        let dataset = expect_dataset(name, value)?;

        if operation == QUALITY {
            self.collaborators
                .loader()
                .analyze_quality(&dataset)
                .map(Value::metrics)
                .map_err(|err| RuntimeError::collaborator_failure(ANALYZE, err))
        } else if self.collaborators.analyzer().supports(operation) {
            self.collaborators
                .analyzer()
                .analyze(operation, &dataset, parameters)
                .map_err(|err| RuntimeError::collaborator_failure(ANALYZE, err))
        } else {
            Err(RuntimeError::UnsupportedOperation(operation.to_string()))
        }
    }

    fn filter(&self, value: Value, condition: &str) -> Result<Value> {
        self.delegate_value(Verb::Filter, vec![value], vec![condition.to_string()])
    }

    fn export(&self, value: Value, path: &str, format: Option<&str>) -> Result<()> {
        let mut operands = vec![path.to_string()];
        operands.extend(format.map(str::to_string));

        self.delegate(Verb::Export, vec![value], operands).map(|_| ())
    }

    fn train(&self, data: &str, reference: &str) -> Result<Value> {
        let args = vec![self.resolve(data)?, self.resolve(reference)?];
        self.delegate_value(Verb::Train, args, vec![])
    }

    fn predict(&self, data: &str, model: Option<&str>) -> Result<Value> {
        let mut args = vec![self.resolve(data)?];
        if let Some(model) = model {
            args.push(self.resolve(model)?);
        }

        self.delegate_value(Verb::Predict, args, vec![])
    }

    fn generate_proof(&self, dataset: &str, query: &str) -> Result<Value> {
        let args = vec![self.resolve(dataset)?];
        self.delegate_value(Verb::GenerateProof, args, vec![query.to_string()])
    }

    fn verify_proof(&self, proof: &str) -> Result<Value> {
        let args = vec![self.resolve(proof)?];
        self.delegate_value(Verb::VerifyProof, args, vec![])
    }

    fn submit_proof(&self, proof: &str, network: &str) -> Result<Value> {
        let args = vec![self.resolve(proof)?];
        self.delegate_value(Verb::SubmitProof, args, vec![network.to_string()])
    }

    fn delegate(
        &self,
        verb: Verb,
        args: Vec<Value>,
        operands: Vec<String>,
    ) -> Result<Option<Value>> {
        let collaborator = self
            .collaborators
            .get(verb)
            .ok_or_else(|| RuntimeError::NoCollaborator(verb.to_string()))?;

        debug!(%verb, args = args.len(), ?operands, "delegate");

        collaborator
            .call(Request {
                verb,
                args,
                operands,
            })
            .map_err(|err| RuntimeError::collaborator_failure(verb.to_string(), err))
    }

    fn delegate_value(&self, verb: Verb, args: Vec<Value>, operands: Vec<String>) -> Result<Value> {
        self.delegate(verb, args, operands)?.ok_or_else(|| {
            RuntimeError::collaborator_failure(verb.to_string(), "no value returned")
        })
    }
}

fn expect_dataset(name: &str, value: &Value) -> Result<Arc<Dataset>> {
    match value {
        Value::Dataset(dataset) => Ok(Arc::clone(dataset)),
        value => Err(RuntimeError::type_mismatch(name, ValueKind::Dataset, value.kind())),
    }
}

fn load_failure(error: LoadError) -> RuntimeError {
    match error {
        LoadError::UnsupportedFormat(format) => RuntimeError::UnsupportedFormat(format),
        error => RuntimeError::collaborator_failure(LOAD, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::collab::{CollaboratorError, Request};
    use crate::compiler::lower;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::vm::{Model, Proof};

    use std::io::Write;
    use std::sync::Mutex;

    use lazy_static::lazy_static;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    type Response = std::result::Result<Option<Value>, CollaboratorError>;
    type Outcome = (Result<()>, Environment);
    type Runner = fn(&str, Collaborators, VmConfig) -> Outcome;

    lazy_static! {
        static ref FASTA: String = (0..200)
            .map(|i| format!(">seq{}\n{}\n", i, "ACGTGGCCAT".repeat(i % 7 + 1)))
            .collect();
    }

    const FASTQ: &str = "@good\nGGCC\n+\nIIII\n@bad\nATAT\n+\n$$$$\n";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn path(file: &NamedTempFile) -> String {
        file.path().to_str().unwrap().to_string()
    }

    fn sequential() -> VmConfig {
        VmConfig::default().sequential()
    }

    fn chunked() -> VmConfig {
        VmConfig::default()
            .with_parallel_threshold(0)
            .with_chunk_size(7)
            .with_workers(4)
    }

    fn proof_collaborators() -> Collaborators {
        let train = |request: Request| -> Response {
            Ok(Some(Value::model(Model {
                id: format!("model-{}", request.args.len()),
                payload: vec![],
            })))
        };
        let predict = |request: Request| -> Response {
            match request.args.get(1) {
                Some(Value::Model(_)) => Ok(Some(Value::Scalar(0.25))),
                Some(other) => {
                    Err(CollaboratorError::new(format!("not a model: {}", other.kind())))
                }
                None => Ok(Some(Value::Scalar(0.5))),
            }
        };
        let generate = |request: Request| -> Response {
            Ok(Some(Value::proof(Proof {
                id: "p1".to_string(),
                statement: request.operands[0].clone(),
                payload: vec![1, 2, 3],
            })))
        };
        let verify = |request: Request| -> Response {
            Ok(Some(Value::Boolean(request.args[0].kind() == ValueKind::Proof)))
        };
        let submit = |request: Request| -> Response {
            if request.operands[0] == "ETHEREUM" {
                Ok(Some(Value::Boolean(true)))
            } else {
                Err(CollaboratorError::new(format!("unknown network {}", request.operands[0])))
            }
        };

        Collaborators::reference()
            .with(Verb::Train, train)
            .with(Verb::Predict, predict)
            .with(Verb::GenerateProof, generate)
            .with(Verb::VerifyProof, verify)
            .with(Verb::SubmitProof, submit)
    }

    fn program(source: &str) -> Vec<Statement> {
        parse(tokenize(source).unwrap()).unwrap()
    }

    fn run_program(source: &str, collaborators: Collaborators, config: VmConfig) -> Outcome {
        let mut vm = VirtualMachine::with_config(collaborators, config);
        let result = vm.run_program(&program(source));
        (result, vm.into_environment())
    }

    fn run_bytecode(source: &str, collaborators: Collaborators, config: VmConfig) -> Outcome {
        let mut vm = VirtualMachine::with_config(collaborators, config);
        let result = vm.run_bytecode(&lower(&program(source)));
        (result, vm.into_environment())
    }

    fn run(source: &str, collaborators: Collaborators) -> (Result<()>, Environment) {
        let (ast_result, ast_env) = run_program(source, collaborators.clone(), sequential());
        let (byte_result, byte_env) = run_bytecode(source, collaborators, sequential());

        assert_eq!(ast_result, byte_result);
        assert_eq!(ast_env, byte_env);

        (ast_result, ast_env)
    }

    #[test]
    fn load_then_count_gc() {
        let file = write_temp(">a\nGGCC\n>b\nATAT\n");
        let source = format!("LOAD FASTA \"{}\" -> g\nANALYZE g COUNT_GC -> r", path(&file));

        let (result, env) = run(&source, Collaborators::reference());

        assert_eq!(result, Ok(()));
        assert_eq!(env.get("r"), Some(&Value::Scalar(0.5)));
        assert_eq!(env.get("g").unwrap().kind(), ValueKind::Dataset);
    }

    #[test]
    fn unbound_variable() {
        let (result, env) = run("ANALYZE undefined COUNT_GC -> r", Collaborators::reference());

        assert_eq!(result, Err(RuntimeError::UnboundVariable("undefined".to_string())));
        assert!(env.is_empty());
    }

    #[test]
    fn unsupported_format() {
        let (result, env) = run("LOAD XYZ \"f\" -> g", Collaborators::reference());

        assert_eq!(result, Err(RuntimeError::UnsupportedFormat("XYZ".to_string())));
        assert!(!env.contains("g"));
    }

    #[test]
    fn failed_run_keeps_earlier_bindings() {
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> genome\n\
             ANALYZE genome READ_COUNT -> n\n\
             ANALYZE genome ALIGN -> aligned\n\
             ANALYZE genome COUNT_GC -> gc",
            path(&file)
        );

        let (result, env) = run(&source, Collaborators::reference());

        assert_eq!(result, Err(RuntimeError::UnsupportedOperation("ALIGN".to_string())));
        assert_eq!(env.get("n"), Some(&Value::Scalar(200.0)));
        assert!(env.contains("genome"));
        assert!(!env.contains("gc"));
    }

    #[test_case(run_program ; "ast")]
    #[test_case(run_bytecode ; "bytecode")]
    fn chunked_load_matches_sequential(runner: Runner) {
        let file = write_temp(FASTA.as_str());
        let source = format!("LOAD FASTA \"{}\" -> genome", path(&file));

        let (sequential_result, sequential_env) =
            runner(&source, Collaborators::reference(), sequential());
        let (chunked_result, chunked_env) = runner(&source, Collaborators::reference(), chunked());

        assert_eq!(sequential_result, Ok(()));
        assert_eq!(chunked_result, Ok(()));
        assert_eq!(sequential_env.get("genome"), chunked_env.get("genome"));
        assert_eq!(
            sequential_env.get("genome").unwrap().as_dataset().unwrap().records.len(),
            200
        );
    }

    #[test]
    fn chunked_load_of_missing_file() {
        let (result, _) = run_program(
            "LOAD FASTA \"/definitely/not/here.fa\" -> g",
            Collaborators::reference(),
            chunked(),
        );

        assert!(matches!(
            result,
            Err(RuntimeError::CollaboratorFailure { ref verb, .. }) if verb == "LOAD"
        ));
    }

    #[test]
    fn quality_filter_and_metrics() {
        let file = write_temp(FASTQ);
        let source = format!(
            "LOAD FASTQ \"{}\" QUALITY ABOVE 20 -> reads\nANALYZE reads QUALITY -> metrics",
            path(&file)
        );

        let (result, env) = run(&source, Collaborators::reference());
        assert_eq!(result, Ok(()));

        let reads = env.get("reads").unwrap().as_dataset().unwrap();
        assert_eq!(reads.records.len(), 1);
        assert_eq!(reads.records[0].id, "good");

        match env.get("metrics") {
            Some(Value::Metrics(metrics)) => {
                assert_eq!(metrics.phred_scores, vec![40, 40, 40, 40]);
                assert_eq!(metrics.gc_content, 1.0);
            }
            other => panic!("expected metrics, got {:?}", other),
        }
    }

    #[test]
    fn analyze_requires_a_dataset() {
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> g\nANALYZE g COUNT_GC -> gc\nANALYZE gc COUNT_GC -> again",
            path(&file)
        );

        let (result, _) = run(&source, Collaborators::reference());

        assert_eq!(
            result,
            Err(RuntimeError::type_mismatch("gc", ValueKind::Dataset, ValueKind::Scalar))
        );
    }

    #[test]
    fn filter_and_export() {
        let file = write_temp(FASTQ);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.fa");
        let source = format!(
            "LOAD FASTQ \"{}\" -> reads\n\
             FILTER reads WHERE \"QUAL >= 30\" -> good\n\
             EXPORT good TO \"{}\" AS FASTA",
            path(&file),
            out.to_str().unwrap()
        );

        let (result, env) = run(&source, Collaborators::reference());

        assert_eq!(result, Ok(()));
        assert_eq!(env.len(), 2);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), ">good\nGGCC\n");
    }

    #[test]
    fn extension_verbs() {
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> genome\n\
             TRAIN MODEL ON genome WITH genome -> model\n\
             PREDICT IMPACT genome USING model -> impact\n\
             GENERATE PROOF genome \"QUERY rs123\" -> proof\n\
             VERIFY proof -> valid\n\
             SUBMIT proof TO ETHEREUM\n\
             SUBMIT proof TO ETHEREUM -> accepted",
            path(&file)
        );

        let (result, env) = run(&source, proof_collaborators());

        assert_eq!(result, Ok(()));
        assert_eq!(env.get("model").unwrap().kind(), ValueKind::Model);
        assert_eq!(env.get("impact"), Some(&Value::Scalar(0.25)));
        assert_eq!(env.get("valid"), Some(&Value::Boolean(true)));
        assert_eq!(env.get("accepted"), Some(&Value::Boolean(true)));
        match env.get("proof") {
            Some(Value::Proof(proof)) => assert_eq!(proof.statement, "QUERY rs123"),
            other => panic!("expected a proof, got {:?}", other),
        }
    }

    #[test_case(run_program ; "ast")]
    #[test_case(run_bytecode ; "bytecode")]
    fn predict_without_model(runner: Runner) {
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> genome\nPREDICT IMPACT genome -> impact",
            path(&file)
        );

        let (result, env) = runner(&source, proof_collaborators(), sequential());

        assert_eq!(result, Ok(()));
        assert_eq!(env.get("impact").and_then(Value::as_scalar), Some(0.5));
    }

    #[test]
    fn variant_pipeline() {
        let genome = write_temp(">test\nATGCGCTAGC\n");
        let variants = write_temp(
            "##fileformat=VCFv4.2\n\
             #CHROM  POS ID  REF ALT QUAL    FILTER  INFO\n\
             chr1    100 rs1 A   T   30  PASS    DP=50\n",
        );
        let source = format!(
            "LOAD FASTA \"{}\" -> genome\n\
             LOAD VCF \"{}\" -> variants\n\
             ANALYZE genome COUNT_GC -> gc_content\n\
             PREDICT IMPACT variants -> predictions\n\
             GENERATE PROOF genome \"QUERY variant_rs1\" -> proof\n\
             VERIFY proof -> is_valid",
            path(&genome),
            path(&variants)
        );

        let (result, env) = run(&source, proof_collaborators());

        assert_eq!(result, Ok(()));
        assert_eq!(env.get("gc_content").and_then(Value::as_scalar), Some(0.6));
        assert_eq!(env.get("predictions").and_then(Value::as_scalar), Some(0.5));
        assert_eq!(env.get("is_valid").and_then(Value::as_boolean), Some(true));

        let variants = env.get("variants").and_then(Value::as_dataset).unwrap();
        assert_eq!(variants.records[0].id, "rs1");
    }

    #[test]
    fn collaborator_failures_are_wrapped() {
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> genome\n\
             GENERATE PROOF genome \"QUERY rs123\" -> proof\n\
             SUBMIT proof TO BITCOIN -> accepted",
            path(&file)
        );

        let (result, env) = run(&source, proof_collaborators());

        assert_eq!(
            result,
            Err(RuntimeError::collaborator_failure("SUBMIT_PROOF", "unknown network BITCOIN"))
        );
        assert!(env.contains("proof"));
        assert!(!env.contains("accepted"));
    }

    #[test_case("TRAIN MODEL ON a WITH b -> m", "TRAIN" ; "train")]
    #[test_case("VERIFY p -> ok", "VERIFY_PROOF" ; "verify")]
    fn missing_collaborator(source: &str, verb: &str) {
        let file = write_temp(">x\nA\n");
        let bindings: String = ["a", "b", "p"]
            .iter()
            .map(|name| format!("LOAD FASTA \"{}\" -> {}\n", path(&file), name))
            .collect();

        let (result, env) = run(&(bindings + source), Collaborators::reference());

        assert_eq!(env.len(), 3);

        assert_eq!(result, Err(RuntimeError::NoCollaborator(verb.to_string())));
    }

    #[test]
    fn collaborator_must_answer() {
        let silent = |_: Request| -> Response { Ok(None) };
        let collaborators = Collaborators::reference().with(Verb::Filter, silent);
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> g\nFILTER g WHERE \"LENGTH > 1\" -> h",
            path(&file)
        );

        let (result, _) = run(&source, collaborators);

        assert_eq!(
            result,
            Err(RuntimeError::collaborator_failure("FILTER", "no value returned"))
        );
    }

    #[test]
    fn collaborator_receives_resolved_values() {
        let seen = Arc::new(Mutex::new(vec![]));
        let log = Arc::clone(&seen);
        let filter = move |request: Request| -> Response {
            log.lock().unwrap().push((request.verb, request.args.len(), request.operands.clone()));
            Ok(request.args.into_iter().next())
        };
        let collaborators = Collaborators::reference().with(Verb::Filter, filter);
        let file = write_temp(FASTA.as_str());
        let source = format!(
            "LOAD FASTA \"{}\" -> g\nFILTER g WHERE \"GC > 0.4\" -> h",
            path(&file)
        );

        let mut vm = VirtualMachine::with_config(collaborators, sequential());
        vm.run_program(&program(&source)).unwrap();

        assert_eq!(vm.environment().get("g"), vm.environment().get("h"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Verb::Filter, 1, vec!["GC > 0.4".to_string()])]
        );
    }

    #[test]
    fn every_run_starts_fresh() {
        let file = write_temp(FASTA.as_str());
        let mut vm = VirtualMachine::with_config(Collaborators::reference(), sequential());

        vm.run_program(&program(&format!("LOAD FASTA \"{}\" -> first", path(&file))))
            .unwrap();
        vm.run_program(&program(&format!("LOAD FASTA \"{}\" -> second", path(&file))))
            .unwrap();

        assert!(!vm.environment().contains("first"));
        assert!(vm.environment().contains("second"));
    }

    #[test_case(vec![Instruction::Store("x".to_string())], "STORE" ; "store")]
    #[test_case(
        vec![Instruction::FilterQuality { min_phred: 20.0 }],
        "FILTER_QUALITY" ;
        "filter quality"
    )]
    fn empty_register(instructions: Vec<Instruction>, opcode: &str) {
        let mut vm = VirtualMachine::new(Collaborators::reference());

        assert_eq!(
            vm.run_bytecode(&instructions),
            Err(RuntimeError::InvalidBytecode(format!("{} with an empty register", opcode)))
        );
    }
}
