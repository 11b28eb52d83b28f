//! Adapter around the CEL compiler: validation, program caching, and
//! evaluation-context construction.

use crate::cache::ProgramCache;
use crate::error::Error;
use crate::funcs::Registry;
use crate::value::{Fields, fields_to_cel};
use crate::Result;
use cel_interpreter::{Context, Program};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

const LOG_TARGET: &str = "   compile";

/// The reserved variable every expression reads the context through.
pub const CONTEXT_VAR: &str = "this";

/// Compiles expression source text into executable programs.
///
/// A `Compiler` owns a function [`Registry`] and a [`ProgramCache`];
/// compiling the same source twice within the cache TTL returns the same
/// program without recompiling. Construct one per tenant for isolation, or
/// use [`Compiler::shared`] for the process-wide instance.
///
/// Compilation fails fast at registration time: empty source, syntax
/// errors, and references to variables other than `this` are rejected
/// here, never deferred to evaluation.
#[derive(Debug)]
pub struct Compiler {
    registry: Registry,
    cache: ProgramCache,
}

impl Compiler {
    /// Creates a compiler with the given registry and the default cache
    /// TTL.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            cache: ProgramCache::default(),
        }
    }

    /// Creates a compiler whose cache evicts programs after `ttl`.
    #[must_use]
    pub fn with_ttl(registry: Registry, ttl: Duration) -> Self {
        Self {
            registry,
            cache: ProgramCache::new(ttl),
        }
    }

    /// The process-wide compiler: standard registry, default TTL.
    /// Initialized on first use and alive for the process lifetime.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<Compiler>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::new(Registry::standard()))))
    }

    /// The function registry this compiler installs at evaluation time.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The compiled-program cache.
    #[must_use]
    pub const fn cache(&self) -> &ProgramCache {
        &self.cache
    }

    /// Compiles source text, reusing a cached program when one is live.
    ///
    /// # Errors
    /// `EmptyExpression` for blank source; `Compile` when the source fails
    /// to parse or references a variable other than `this`.
    pub fn compile(&self, source: &str) -> Result<Arc<Program>> {
        if source.trim().is_empty() {
            return Err(Error::EmptyExpression);
        }
        if let Some(program) = self.cache.get(source) {
            log::debug!(target: LOG_TARGET, "cache hit for '{source}'");
            return Ok(program);
        }

        let program = Program::compile(source).map_err(|e| Error::compile(source, e))?;
        for variable in program.references().variables() {
            if variable != CONTEXT_VAR {
                return Err(Error::compile(
                    source,
                    format!("undeclared variable '{variable}': the context is bound to '{CONTEXT_VAR}'"),
                ));
            }
        }

        let program = Arc::new(program);
        self.cache.insert(source, Arc::clone(&program));
        log::debug!(target: LOG_TARGET, "compiled and cached '{source}'");
        Ok(program)
    }

    /// Builds the evaluation context for one call: binds `this` to the
    /// converted field map and installs every registry function.
    pub(crate) fn evaluation_context(&self, fields: &Fields) -> Context<'_> {
        let mut ctx = Context::default();
        self.registry.install(&mut ctx);
        ctx.add_variable_from_value(CONTEXT_VAR, fields_to_cel(fields));
        ctx
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}
