//! Conditional context patches, gated by a [`Decision`].

use crate::Result;
use crate::compile::Compiler;
use crate::decision::Decision;
use crate::error::Error;
use crate::value::{Fields, cel_to_json, key_to_string};
use cel_interpreter::{Program, Value};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

const LOG_TARGET: &str = "   trigger";

/// A conditional data patch: when its [`Decision`] passes, evaluates one
/// or more map-valued patch expressions against the context and merges
/// their results.
///
/// The decision is shared, never mutated. Patch expressions are evaluated
/// in lexicographic source order; on key collision the expression later in
/// that order wins. Results that are not map-shaped are discarded
/// silently — by contract they mean "no patch produced".
#[derive(Debug)]
pub struct Trigger {
    decision: Arc<Decision>,
    compiler: Arc<Compiler>,
    programs: RwLock<BTreeMap<String, Arc<Program>>>,
}

impl Trigger {
    /// Creates a trigger from map-valued patch expression sources,
    /// compiling through the decision's compiler.
    ///
    /// # Errors
    /// Same validation rules as [`Decision::new`]: `NoExpressions` for an
    /// empty list, `EmptyExpression`/`Compile` when any source fails, and
    /// construction aborts entirely on the first failure.
    pub fn new(decision: Arc<Decision>, sources: &[&str]) -> Result<Self> {
        let compiler = Arc::clone(decision.compiler());
        Self::with_compiler(decision, sources, compiler)
    }

    /// Creates a trigger that compiles and evaluates through an explicit
    /// compiler.
    pub fn with_compiler(decision: Arc<Decision>, sources: &[&str], compiler: Arc<Compiler>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::NoExpressions);
        }
        let mut programs = BTreeMap::new();
        for source in sources {
            let program = compiler.compile(source)?;
            let _ = programs.insert((*source).to_string(), program);
        }
        Ok(Self {
            decision,
            compiler,
            programs: RwLock::new(programs),
        })
    }

    /// Compiles one more patch expression and adds it. Safe to call
    /// concurrently with `fire`.
    pub fn add_expression(&self, source: &str) -> Result<()> {
        let program = self.compiler.compile(source)?;
        let mut programs = self.programs.write();
        let _ = programs.insert(source.to_string(), program);
        Ok(())
    }

    /// Evaluates the gate and, when it passes, computes the merged patch.
    ///
    /// A failing gate — denied or broken — is not an error here: the
    /// trigger simply produces an empty patch. Only failures while
    /// computing the patch itself surface as errors.
    ///
    /// # Errors
    /// `NoExpressions` when the trigger has no patch expressions; `Eval`
    /// when a patch expression fails during execution.
    pub fn fire(&self, fields: &Fields) -> Result<Fields> {
        let programs = self.programs.read();
        if programs.is_empty() {
            return Err(Error::NoExpressions);
        }

        if let Err(e) = self.decision.eval(fields) {
            log::debug!(target: LOG_TARGET, "gate closed ({e}), no patch produced");
            return Ok(Fields::new());
        }

        let ctx = self.compiler.evaluation_context(fields);
        let mut patch = Fields::new();
        for (source, program) in programs.iter() {
            match program.execute(&ctx) {
                Ok(Value::Map(map)) => {
                    for (key, value) in map.map.iter() {
                        let json = cel_to_json(value).map_err(|e| Error::eval(source, e))?;
                        let _ = patch.insert(key_to_string(key), json);
                    }
                }
                Ok(other) => {
                    log::debug!(target: LOG_TARGET, "'{source}' produced a non-map value ({other:?}), discarded");
                }
                Err(e) => return Err(Error::eval(source, e)),
            }
        }
        Ok(patch)
    }

    /// Fires the trigger and merges the resulting patch into the supplied
    /// context in place; returns the patch.
    ///
    /// # Errors
    /// Same as [`Trigger::fire`].
    pub fn apply(&self, fields: &mut Fields) -> Result<Fields> {
        let patch = self.fire(fields)?;
        for (key, value) in &patch {
            let _ = fields.insert(key.clone(), value.clone());
        }
        Ok(patch)
    }

    /// The patch expression sources, sorted lexicographically.
    #[must_use]
    pub fn expressions(&self) -> Vec<String> {
        self.programs.read().keys().cloned().collect()
    }

    /// The gate this trigger evaluates before patching.
    #[must_use]
    pub const fn decision(&self) -> &Arc<Decision> {
        &self.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Mode;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        let serde_json::Value::Object(fields) = value else {
            panic!("expected an object");
        };
        fields
    }

    fn signup_decision() -> Arc<Decision> {
        Arc::new(Decision::new(Mode::AllTrue, &["this.event == 'signup'"]).unwrap())
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_patch_produced_when_gate_passes() {
        let trigger = Trigger::new(signup_decision(), &["{'source': 'web', 'verified': false}"]).unwrap();
        let patch = trigger.fire(&fields(json!({"event": "signup"}))).unwrap();

        assert_eq!(patch.get("source"), Some(&json!("web")));
        assert_eq!(patch.get("verified"), Some(&json!(false)));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_gate_failure_yields_empty_patch() {
        let trigger = Trigger::new(signup_decision(), &["{'source': 'web'}"]).unwrap();
        let patch = trigger.fire(&fields(json!({"event": "login"}))).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_gate_eval_error_also_yields_empty_patch() {
        let decision = Arc::new(Decision::new(Mode::AllTrue, &["size(this.missing) > 0"]).unwrap());
        let trigger = Trigger::new(decision, &["{'source': 'web'}"]).unwrap();
        let patch = trigger.fire(&fields(json!({"event": "signup"}))).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_patch_reads_context() {
        let trigger = Trigger::new(signup_decision(), &["{'greeting': 'hello ' + this.name}"]).unwrap();
        let patch = trigger.fire(&fields(json!({"event": "signup", "name": "bob"}))).unwrap();
        assert_eq!(patch.get("greeting"), Some(&json!("hello bob")));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_later_sorted_expression_wins_on_collision() {
        let trigger = Trigger::new(
            signup_decision(),
            &["{'a_first': true, 'origin': 'alpha'}", "{'origin': 'beta'}"],
        )
        .unwrap();
        let patch = trigger.fire(&fields(json!({"event": "signup"}))).unwrap();

        // "{'a_first'..." sorts before "{'origin': 'beta'}", so beta wins.
        assert_eq!(patch.get("origin"), Some(&json!("beta")));
        assert_eq!(patch.get("a_first"), Some(&json!(true)));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_non_map_result_discarded() {
        let trigger = Trigger::new(signup_decision(), &["'just a string'", "{'kept': 1}"]).unwrap();
        let patch = trigger.fire(&fields(json!({"event": "signup"}))).unwrap();

        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("kept"), Some(&json!(1)));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_patch_eval_error_surfaces() {
        let trigger = Trigger::new(signup_decision(), &["{'x': size(this.missing)}"]).unwrap();
        let err = trigger.fire(&fields(json!({"event": "signup"}))).unwrap_err();
        assert!(matches!(err, Error::Eval { .. }));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_apply_merges_in_place() {
        let trigger = Trigger::new(signup_decision(), &["{'verified': false}"]).unwrap();
        let mut ctx = fields(json!({"event": "signup", "name": "bob"}));

        let patch = trigger.apply(&mut ctx).unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(ctx.get("verified"), Some(&json!(false)));
        assert_eq!(ctx.get("name"), Some(&json!("bob")));
    }

    #[test]
    fn test_empty_construction_rejected() {
        let result = Trigger::new(signup_decision(), &[]);
        assert!(matches!(result, Err(Error::NoExpressions)));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_add_expression_and_listing() {
        let trigger = Trigger::new(signup_decision(), &["{'b': 2}"]).unwrap();
        trigger.add_expression("{'a': 1}").unwrap();
        assert_eq!(trigger.expressions(), vec!["{'a': 1}", "{'b': 2}"]);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_decision_is_shared_not_copied() {
        let decision = signup_decision();
        let trigger = Trigger::new(Arc::clone(&decision), &["{'a': 1}"]).unwrap();

        decision.add_expression("this.email != ''").unwrap();
        assert_eq!(trigger.decision().expressions().len(), 2);
    }
}
