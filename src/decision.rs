//! Boolean gates over a dynamic context.

use crate::Result;
use crate::compile::Compiler;
use crate::error::Error;
use crate::value::Fields;
use cel_interpreter::{Program, Value};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const LOG_TARGET: &str = "  decision";

/// How a decision combines the outcomes of its expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Every expression must evaluate to `true`.
    AllTrue,
    /// At least one expression must evaluate to `true`.
    AnyTrue,
}

/// A boolean gate: one or more compiled expressions combined by a
/// [`Mode`], evaluated against a caller-supplied context.
///
/// Expressions are evaluated in lexicographic source order, so which error
/// surfaces first is deterministic; pass/fail never depends on order.
/// Concurrent [`eval`](Decision::eval) calls proceed in parallel;
/// [`add_expression`](Decision::add_expression) briefly excludes them.
#[derive(Debug)]
pub struct Decision {
    mode: Mode,
    compiler: Arc<Compiler>,
    programs: RwLock<BTreeMap<String, Arc<Program>>>,
}

impl Decision {
    /// Creates a decision from boolean-valued expression sources, using
    /// the process-wide shared compiler.
    ///
    /// # Errors
    /// `NoExpressions` when `sources` is empty; `EmptyExpression` or
    /// `Compile` when any source fails to compile (construction aborts
    /// entirely).
    pub fn new(mode: Mode, sources: &[&str]) -> Result<Self> {
        Self::with_compiler(mode, sources, Compiler::shared())
    }

    /// Creates a decision that compiles and evaluates through an explicit
    /// compiler.
    pub fn with_compiler(mode: Mode, sources: &[&str], compiler: Arc<Compiler>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::NoExpressions);
        }
        let mut programs = BTreeMap::new();
        for source in sources {
            let program = compiler.compile(source)?;
            let _ = programs.insert((*source).to_string(), program);
        }
        Ok(Self {
            mode,
            compiler,
            programs: RwLock::new(programs),
        })
    }

    /// Compiles one more expression and adds it to the gate. Safe to call
    /// concurrently with `eval`.
    pub fn add_expression(&self, source: &str) -> Result<()> {
        // Compile before taking the write lock so readers are excluded
        // only for the map insert.
        let program = self.compiler.compile(source)?;
        let mut programs = self.programs.write();
        let _ = programs.insert(source.to_string(), program);
        Ok(())
    }

    /// Evaluates the gate against a context.
    ///
    /// # Errors
    /// `NoExpressions` when the gate has none. Under [`Mode::AllTrue`],
    /// the first expression that is not boolean `true` yields `Denied` and
    /// the first evaluation error yields `Eval`. Under [`Mode::AnyTrue`],
    /// evaluation errors count as "not satisfied" and the scan continues;
    /// `Denied` is returned only when no expression evaluates to `true`.
    pub fn eval(&self, fields: &Fields) -> Result<()> {
        let programs = self.programs.read();
        if programs.is_empty() {
            return Err(Error::NoExpressions);
        }

        let ctx = self.compiler.evaluation_context(fields);
        match self.mode {
            Mode::AllTrue => {
                for (source, program) in programs.iter() {
                    match program.execute(&ctx) {
                        Ok(Value::Bool(true)) => {}
                        Ok(_) => {
                            log::debug!(target: LOG_TARGET, "denied by '{source}'");
                            return Err(Error::Denied);
                        }
                        Err(e) => return Err(Error::eval(source, e)),
                    }
                }
                Ok(())
            }
            Mode::AnyTrue => {
                for (source, program) in programs.iter() {
                    match program.execute(&ctx) {
                        Ok(Value::Bool(true)) => return Ok(()),
                        Ok(_) => {}
                        Err(e) => {
                            log::debug!(target: LOG_TARGET, "'{source}' failed ({e}), treated as unsatisfied");
                        }
                    }
                }
                Err(Error::Denied)
            }
        }
    }

    /// The expression sources, sorted lexicographically.
    #[must_use]
    pub fn expressions(&self) -> Vec<String> {
        self.programs.read().keys().cloned().collect()
    }

    /// The aggregation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn compiler(&self) -> &Arc<Compiler> {
        &self.compiler
    }
}
