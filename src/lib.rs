//! Expression-gated decisions and context patches.
//!
//! A [`Decision`] is a boolean gate: one or more CEL expressions combined
//! by a [`Mode`] and evaluated against a caller-supplied context map bound
//! to the variable `this`. A [`Trigger`] pairs a decision with map-valued
//! patch expressions: when the gate passes, the patches are evaluated and
//! merged back into (or alongside) the context.
//!
//! ```
//! use rulegate::{Decision, Fields, Mode, Trigger};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> rulegate::Result<()> {
//! let decision = Arc::new(Decision::new(
//!     Mode::AllTrue,
//!     &["this.event == 'signup' && has(this.email)"],
//! )?);
//! let trigger = Trigger::new(
//!     decision,
//!     &["{'updated_at': now(), 'password': sha1(this.password)}"],
//! )?;
//!
//! let mut ctx = Fields::new();
//! ctx.insert("event".to_string(), json!("signup"));
//! ctx.insert("email".to_string(), json!("bob@acme.com"));
//! ctx.insert("password".to_string(), json!("123456"));
//!
//! let patch = trigger.apply(&mut ctx)?;
//! assert!(patch.contains_key("password"));
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`decision`]: boolean gates and their aggregation modes
//! - [`trigger`]: conditional context patches
//! - [`compile`]: the CEL compiler adapter and program cache wiring
//! - [`funcs`]: the extension-function registry and standard catalog
//! - [`cache`]: the TTL-bounded compiled-program cache
//! - [`error`]: the error taxonomy
//! - [`value`]: context field maps and value conversions

pub type Result<T, E = crate::error::Error> = core::result::Result<T, E>;

pub mod cache;
pub mod compile;
pub mod decision;
pub mod error;
pub mod funcs;
pub mod trigger;
pub mod value;

pub use crate::cache::ProgramCache;
pub use crate::compile::Compiler;
pub use crate::decision::{Decision, Mode};
pub use crate::error::Error;
pub use crate::funcs::Registry;
pub use crate::trigger::Trigger;
pub use crate::value::Fields;
