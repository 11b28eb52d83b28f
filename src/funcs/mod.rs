//! Extension-function library callable from expressions.
//!
//! The catalog is exposed as a [`Registry`]: an explicit, constructible set
//! of named bindings that can be installed into a CEL evaluation context.
//! [`Registry::standard`] yields the full standard catalog; entries can be
//! added or removed to extend the surface or to isolate tests.
//!
//! Every function fails with a typed evaluation error when its arity or an
//! argument type is violated — never a silent coercion, never a panic. The
//! one documented exception is `jsonDecode`, which swallows parse failures
//! and yields an empty map.

pub(crate) mod crypto;
pub(crate) mod encode;
pub(crate) mod geo;
pub(crate) mod hash;
pub(crate) mod jwt;
pub(crate) mod net;
pub(crate) mod strings;
pub(crate) mod template;
pub(crate) mod time;

use cel_interpreter::{Context, ExecutionError};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type Binder = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// A named set of extension functions installable into an evaluation
/// context.
///
/// Registration order is irrelevant; names are kept sorted so the listing
/// returned by [`Registry::names`] is deterministic.
#[derive(Clone)]
pub struct Registry {
    binders: BTreeMap<String, Binder>,
}

impl Registry {
    /// Creates a registry with no functions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            binders: BTreeMap::new(),
        }
    }

    /// Creates the standard catalog.
    #[must_use]
    #[expect(clippy::too_many_lines, reason = "One line per catalog entry")]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("now", |ctx| { ctx.add_function("now", time::now); });
        registry.register("uuid", |ctx| { ctx.add_function("uuid", time::uuid_v4); });
        registry.register("sha1", |ctx| { ctx.add_function("sha1", hash::sha1_hex); });
        registry.register("sha256", |ctx| { ctx.add_function("sha256", hash::sha256_hex); });
        registry.register("sha3", |ctx| { ctx.add_function("sha3", hash::sha3_hex); });
        registry.register("base64Encode", |ctx| { ctx.add_function("base64Encode", encode::base64_encode); });
        registry.register("base64Decode", |ctx| { ctx.add_function("base64Decode", encode::base64_decode); });
        registry.register("jsonEncode", |ctx| { ctx.add_function("jsonEncode", encode::json_encode); });
        registry.register("jsonDecode", |ctx| { ctx.add_function("jsonDecode", |input: Arc<String>| Ok::<_, ExecutionError>(encode::json_decode(input))); });
        registry.register("includes", |ctx| { ctx.add_function("includes", strings::includes); });
        registry.register("replace", |ctx| { ctx.add_function("replace", strings::replace_all); });
        registry.register("join", |ctx| { ctx.add_function("join", strings::join); });
        registry.register("split", |ctx| { ctx.add_function("split", |input: Arc<String>, separator: Arc<String>| Ok::<_, ExecutionError>(strings::split(input, separator))); });
        registry.register("titleCase", |ctx| { ctx.add_function("titleCase", strings::title_case); });
        registry.register("lowerCase", |ctx| { ctx.add_function("lowerCase", strings::lower_case); });
        registry.register("upperCase", |ctx| { ctx.add_function("upperCase", strings::upper_case); });
        registry.register("trimSpace", |ctx| { ctx.add_function("trimSpace", strings::trim_space); });
        registry.register("trimPrefix", |ctx| { ctx.add_function("trimPrefix", strings::trim_prefix); });
        registry.register("trimSuffix", |ctx| { ctx.add_function("trimSuffix", strings::trim_suffix); });
        registry.register("typeOf", |ctx| { ctx.add_function("typeOf", strings::type_of); });
        registry.register("geoDistance", |ctx| { ctx.add_function("geoDistance", geo::geo_distance); });
        registry.register("render", |ctx| { ctx.add_function("render", template::render); });
        registry.register("parseClaims", |ctx| { ctx.add_function("parseClaims", jwt::parse_claims); });
        registry.register("parseHeader", |ctx| { ctx.add_function("parseHeader", jwt::parse_header); });
        registry.register("parseSignature", |ctx| { ctx.add_function("parseSignature", jwt::parse_signature); });
        registry.register("encrypt", |ctx| { ctx.add_function("encrypt", crypto::encrypt); });
        registry.register("decrypt", |ctx| { ctx.add_function("decrypt", crypto::decrypt); });
        registry.register("parseHost", |ctx| { ctx.add_function("parseHost", net::parse_host); });
        registry.register("parsePath", |ctx| { ctx.add_function("parsePath", net::parse_path); });
        registry.register("parseScheme", |ctx| { ctx.add_function("parseScheme", net::parse_scheme); });
        registry.register("parseQuery", |ctx| { ctx.add_function("parseQuery", net::parse_query); });
        registry
    }

    /// Adds (or replaces) a function binding.
    ///
    /// The binder is expected to install a function under the same `name`
    /// it is registered with; the registry name is what
    /// [`Registry::contains`] and [`Registry::names`] report.
    pub fn register(&mut self, name: impl Into<String>, binder: impl Fn(&mut Context<'_>) + Send + Sync + 'static) {
        let _ = self.binders.insert(name.into(), Arc::new(binder));
    }

    /// Removes a function binding, returning whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.binders.remove(name).is_some()
    }

    /// Whether a function with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.binders.contains_key(name)
    }

    /// The registered function names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.binders.keys().map(String::as_str).collect()
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.binders.len()
    }

    /// Whether the registry has no functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    /// Installs every binding into the given evaluation context.
    pub(crate) fn install(&self, ctx: &mut Context<'_>) {
        for binder in self.binders.values() {
            binder(ctx);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("names", &self.names()).finish()
    }
}
