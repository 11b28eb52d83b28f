//! Error taxonomy for decisions, triggers, and expression compilation.

/// Errors produced while constructing or evaluating decisions and triggers.
///
/// Construction failures (`NoExpressions`, `EmptyExpression`, `Compile`)
/// abort setup entirely; there is never a partially usable [`Decision`] or
/// [`Trigger`]. Evaluation failures (`Eval`) abort only the current call,
/// leaving the component reusable. `Denied` is not a failure at all: it is
/// the sentinel for "the rule correctly rejected this input", and callers
/// can distinguish it from a broken rule with [`Error::is_denied`].
///
/// [`Decision`]: crate::Decision
/// [`Trigger`]: crate::Trigger
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A decision or trigger was constructed with, or evaluated without,
    /// any expressions.
    #[error("no expressions")]
    NoExpressions,

    /// An empty source string was supplied at registration time.
    #[error("empty expression")]
    EmptyExpression,

    /// The expression failed to parse or validate at registration time.
    #[error("could not compile expression '{source_text}': {message}")]
    Compile {
        /// The offending expression source.
        source_text: String,
        /// The underlying compiler diagnostic.
        message: String,
    },

    /// A compiled expression raised an error during evaluation.
    #[error("failed to evaluate expression '{source_text}': {message}")]
    Eval {
        /// The offending expression source.
        source_text: String,
        /// The underlying evaluation diagnostic.
        message: String,
    },

    /// The predicate was not satisfied.
    #[error("evaluation denied")]
    Denied,
}

impl Error {
    pub(crate) fn compile(source_text: &str, message: impl ToString) -> Self {
        Self::Compile {
            source_text: source_text.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn eval(source_text: &str, message: impl ToString) -> Self {
        Self::Eval {
            source_text: source_text.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error is the `Denied` sentinel rather than a genuine
    /// compilation or evaluation failure.
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_is_distinct() {
        assert!(Error::Denied.is_denied());
        assert!(!Error::NoExpressions.is_denied());
        assert!(!Error::eval("this.x", "boom").is_denied());
    }

    #[test]
    fn test_messages_carry_source_text() {
        let err = Error::compile("this.x ==", "unexpected end of input");
        assert!(err.to_string().contains("this.x =="));

        let err = Error::eval("sha1(this.n)", "unexpected type");
        assert!(err.to_string().contains("sha1(this.n)"));
    }
}
