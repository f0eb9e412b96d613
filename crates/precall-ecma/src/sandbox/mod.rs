//! Compiling a fragment and running it as an isolated module.
//!
//! Everything engine-specific sits behind [`Sandbox`], so a stricter
//! executor can replace [`EngineSandbox`] without touching matching or
//! serialization.

pub mod compile;
pub mod module;
pub mod tag;

use precall_core::Result;
use tracing::trace;

pub use compile::{compile, CompiledUnit};
pub use module::ModuleRecord;

use crate::serialize::ExecutionResult;

/// Runs one compiled unit and returns what it exported.
pub trait Sandbox {
    fn run(&mut self, unit: &CompiledUnit) -> Result<ExecutionResult>;
}

/// Executes every unit in a fresh [`ModuleRecord`], i.e. a fresh engine
/// context with its own `module` object.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineSandbox;

impl Sandbox for EngineSandbox {
    fn run(&mut self, unit: &CompiledUnit) -> Result<ExecutionResult> {
        let mut record = ModuleRecord::new(unit.filename.as_str())?;
        record.execute(unit)?;
        record.export_value()
    }
}

/// Compile and run `literal`. An empty literal is not executed and yields
/// [`ExecutionResult::Absent`].
pub fn evaluate(sandbox: &mut dyn Sandbox, literal: &str, filename: &str) -> Result<ExecutionResult> {
    if literal.is_empty() {
        trace!("empty fragment, skipping execution");
        return Ok(ExecutionResult::Absent);
    }
    let unit = compile(literal, filename)?;
    sandbox.run(&unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl Sandbox for Unreachable {
        fn run(&mut self, unit: &CompiledUnit) -> Result<ExecutionResult> {
            panic!("unexpected execution of {:?}", unit.code)
        }
    }

    #[test]
    fn empty_literal_is_never_executed() {
        let result = evaluate(&mut Unreachable, "", "a.js").unwrap();
        assert_eq!(result, ExecutionResult::Absent);
    }

    #[test]
    fn compile_errors_stop_before_execution() {
        let err = evaluate(&mut Unreachable, "module.exports=(", "a.js").unwrap_err();
        assert!(matches!(err, precall_core::Error::Compile { .. }));
    }
}
