//! Unified, `miette`-based diagnostics for the entrydoc compiler.
//!
//! Every failure of a compilation is a [`CompileError`]: an [`ErrorKind`]
//! describing what went wrong plus an [`ErrorContext`] describing where in
//! the node tree it happened. Handlers never build contexts by hand; they go
//! through [`ErrorReporting`], which the evaluation frame implements.
//!
//! There is no partial-result mode. A compilation either yields a document
//! or exactly one of these errors.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::tree::{NodeId, NodeKind, RefKind};

/// Type-safe error classification used by tests and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Containment grammar violations, missing or duplicated root.
    Structural,
    /// Named lookups that found nothing when the document was read.
    Reference,
    /// A single-value slot was given more than one value.
    Arity,
    /// Unreadable or malformed tree input.
    Input,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Structural => "structural",
            ErrorCategory::Reference => "reference",
            ErrorCategory::Arity => "arity",
            ErrorCategory::Input => "input",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All error kinds as a clean enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Structural errors
    #[error("{node} requires {required}")]
    MissingAncestor { node: NodeKind, required: String },
    #[error("missing root Project")]
    MissingRoot,
    #[error("found {count} Project nodes, expected exactly one root Project")]
    DuplicateRoot { count: usize },
    #[error("id '{id}' is used by more than one entity")]
    DuplicateId { id: String },
    #[error("object '{object}' selects picture '{picture}' which it does not own")]
    InvalidSelection { object: String, picture: String },
    #[error("{node} cannot be used as a Param value")]
    MisplacedValue { node: NodeKind },
    #[error("node {node} has not been evaluated yet")]
    UnknownInstance { node: NodeId },
    #[error("{node} cannot have child nodes, found {count}")]
    UnexpectedChildren { node: NodeKind, count: usize },

    // Reference errors
    #[error("could not find {kind} named '{name}'")]
    UnresolvedReference { kind: RefKind, name: String },

    // Arity errors
    #[error("{node} accepts at most one value, found {found}")]
    TooManyValues { node: NodeKind, found: usize },

    // Input errors
    #[error("{message}")]
    Input { message: String },
}

impl ErrorKind {
    /// Get the error category for test assertions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingAncestor { .. }
            | Self::MissingRoot
            | Self::DuplicateRoot { .. }
            | Self::DuplicateId { .. }
            | Self::InvalidSelection { .. }
            | Self::MisplacedValue { .. }
            | Self::UnknownInstance { .. }
            | Self::UnexpectedChildren { .. } => ErrorCategory::Structural,

            Self::UnresolvedReference { .. } => ErrorCategory::Reference,

            Self::TooManyValues { .. } => ErrorCategory::Arity,

            Self::Input { .. } => ErrorCategory::Input,
        }
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The node being evaluated when the error was raised (if any).
    pub node: Option<NodeId>,
    /// Ancestor chain of that node, e.g. `Project > Scene > Object`.
    pub path: Option<String>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no node, path, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context pointing at a node and its ancestry.
    pub fn at(node: NodeId, path: impl Into<String>) -> Self {
        Self {
            node: Some(node),
            path: Some(path.into()),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// The single error type of the crate.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub ctx: ErrorContext,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, ctx: ErrorContext) -> Self {
        Self {
            kind,
            ctx,
            source: None,
        }
    }

    /// An error with no tree position, e.g. raised while extracting the document.
    pub fn bare(kind: ErrorKind) -> Self {
        Self::new(kind, ErrorContext::none())
    }

    /// Input error wrapping an I/O or decoding failure.
    pub fn input<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::Input {
                message: message.into(),
            },
            ctx: ErrorContext::none(),
            source: Some(Box::new(cause)),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.ctx.help = Some(help.into());
        self
    }
}

impl Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("entrydoc::{}", self.category())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match (&self.ctx.help, &self.ctx.path) {
            (Some(help), _) => Some(Box::new(help)),
            (None, Some(path)) => Some(Box::new(format!("while evaluating {path}"))),
            (None, None) => None,
        }
    }
}

/// Context-aware error creation - each evaluation frame knows where it is.
pub trait ErrorReporting {
    /// Create an error positioned at the reporting context.
    fn report(&self, kind: ErrorKind) -> CompileError;

    fn missing_ancestor(&self, node: NodeKind, required: &str) -> CompileError {
        self.report(ErrorKind::MissingAncestor {
            node,
            required: required.into(),
        })
    }

    fn too_many_values(&self, node: NodeKind, found: usize) -> CompileError {
        self.report(ErrorKind::TooManyValues { node, found })
    }

    fn misplaced_value(&self, node: NodeKind) -> CompileError {
        self.report(ErrorKind::MisplacedValue { node })
    }

    fn unexpected_children(&self, node: NodeKind, count: usize) -> CompileError {
        self.report(ErrorKind::UnexpectedChildren { node, count })
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_missing_ancestor_message() {
        let err = CompileError::bare(ErrorKind::MissingAncestor {
            node: NodeKind::Scene,
            required: "Project".into(),
        });
        assert_eq!(err.to_string(), "Scene requires Project");
        assert_eq!(err.category(), ErrorCategory::Structural);
    }

    #[test]
    fn test_report_includes_code_and_path() {
        let err = CompileError::new(
            ErrorKind::UnresolvedReference {
                kind: RefKind::Variable,
                name: "score".into(),
            },
            ErrorContext::at(NodeId::from_index(3), "Project > Scene > Object"),
        );
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("entrydoc::reference"));
        assert!(output.contains("score"));
        assert!(output.contains("Project > Scene > Object"));
    }

    #[test]
    fn test_explicit_help_wins_over_path() {
        let err = CompileError::new(
            ErrorKind::TooManyValues {
                node: NodeKind::Param,
                found: 2,
            },
            ErrorContext::at(NodeId::from_index(1), "Project").with_help("pass one child"),
        );
        let help = err.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("pass one child"));
        assert_eq!(err.category(), ErrorCategory::Arity);
    }
}
