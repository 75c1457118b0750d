//! Non-fatal warnings raised while substituting tokens.
//!
//! Substitution never fails because of a missing translation. Instead a [`Diagnostic`]
//! is handed to a [`DiagnosticSink`] and the best-effort text is used.

use std::fmt::Display;

/// A warning produced during token substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The locale has a record for the id but no value, so the fallback locale's value was used.
    FallbackUsed {
        id: String,
        locale: String,
        fallback: String,
    },
    /// The id is unknown to the locale; the bare id was substituted.
    UnresolvedToken {
        id: String,
        raw: String,
        location: Option<String>,
    },
}

impl Diagnostic {
    pub fn id(&self) -> &str {
        match self {
            Diagnostic::FallbackUsed { id, .. } | Diagnostic::UnresolvedToken { id, .. } => id,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::FallbackUsed {
                id,
                locale,
                fallback,
            } => write!(
                f,
                "No translation for `{}` in locale `{}`, using fallback `{}`",
                id, locale, fallback
            ),
            Diagnostic::UnresolvedToken { id, raw, location } => {
                write!(f, "Unknown translation id `{}` (`{}`)", id, raw)?;
                if let Some(location) = location {
                    write!(f, " in {}", location)?;
                }
                Ok(())
            }
        }
    }
}

/// Receiver for substitution warnings.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects every warning, in emission order.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards warnings to the `tracing` subscriber as `warn` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::FallbackUsed { id, locale, .. } => {
                tracing::warn!(%id, %locale, "{}", diagnostic);
            }
            Diagnostic::UnresolvedToken { id, .. } => {
                tracing::warn!(%id, "{}", diagnostic);
            }
        }
    }
}
