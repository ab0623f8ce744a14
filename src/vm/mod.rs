pub mod chunked;
mod config;
mod environment;
mod error;
mod object;
mod vm;

pub use config::VmConfig;
pub use environment::Environment;
pub use error::{Result, RuntimeError};
pub use object::{Dataset, Metrics, Model, Proof, Record, Value, ValueKind};
pub use vm::VirtualMachine;
