pub use crate::compiler::{compile, compile_with, CompileOptions, Session};
pub use crate::diagnostics::{CompileError, ErrorCategory, ErrorContext, ErrorKind};
pub use crate::document::ProjectDocument;
pub use crate::tree::{Node, NodeId, NodeKind, NodeSpec, NodeTree, RefKind};

pub mod cli;
pub mod compiler;
pub mod diagnostics;
pub mod document;
mod draft;
mod handlers;
pub mod ids;
mod resolve;
mod scope;
pub mod slots;
pub mod tree;
