//! Ambient ancestor context, threaded explicitly through the walk.
//!
//! Every node is evaluated with the [`Scope`] its parent produced. A handler
//! reads the bindings it needs through the `require_*` methods, which fail
//! with a structural error naming the node and the missing ancestor, and
//! hands a (possibly extended) copy down to its children. Bindings therefore
//! only ever flow downwards and vanish once a subtree is done.

use crate::diagnostics::{CompileError, ErrorContext, ErrorKind, ErrorReporting};
use crate::draft::{ObjectKey, SequenceKey, StatementsKey};
use crate::tree::{NodeId, NodeKind, NodeTree};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Scope {
    /// Set by the compiler for the whole walk; a Project attaches to it.
    pub root: bool,
    /// The Project node whose draft is being filled.
    pub project: Option<NodeId>,
    pub scene: Option<String>,
    pub object: Option<ObjectKey>,
    /// Where a Statement inserts its block.
    pub statements: Option<StatementsKey>,
    /// Where a Script, Param or reference inserts its value.
    pub params: Option<SequenceKey>,
}

impl Scope {
    /// The scope handed to top-level nodes.
    pub fn root() -> Self {
        Self {
            root: true,
            ..Self::default()
        }
    }

    pub fn require_root(&self, frame: &Frame<'_>) -> Result<(), CompileError> {
        if self.root {
            Ok(())
        } else {
            Err(frame.missing_ancestor(frame.kind, "the compiler root"))
        }
    }

    pub fn require_project(&self, frame: &Frame<'_>) -> Result<NodeId, CompileError> {
        self.project
            .ok_or_else(|| frame.missing_ancestor(frame.kind, "Project"))
    }

    pub fn require_scene(&self, frame: &Frame<'_>) -> Result<&str, CompileError> {
        self.scene
            .as_deref()
            .ok_or_else(|| frame.missing_ancestor(frame.kind, "Scene"))
    }

    pub fn require_object(&self, frame: &Frame<'_>) -> Result<ObjectKey, CompileError> {
        self.object
            .ok_or_else(|| frame.missing_ancestor(frame.kind, "Object"))
    }

    pub fn require_statements(&self, frame: &Frame<'_>) -> Result<StatementsKey, CompileError> {
        self.statements
            .ok_or_else(|| frame.missing_ancestor(frame.kind, "Script or Object"))
    }

    pub fn require_params(&self, frame: &Frame<'_>) -> Result<SequenceKey, CompileError> {
        self.params
            .ok_or_else(|| frame.missing_ancestor(frame.kind, "Statement or Script"))
    }
}

/// The node currently being evaluated; positions errors in the tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'t> {
    pub node: NodeId,
    pub kind: NodeKind,
    pub tree: &'t NodeTree,
}

impl<'t> Frame<'t> {
    pub fn new(tree: &'t NodeTree, node: NodeId, kind: NodeKind) -> Self {
        Self { node, kind, tree }
    }

    pub fn path(&self) -> String {
        self.tree.path(self.node)
    }
}

impl ErrorReporting for Frame<'_> {
    fn report(&self, kind: ErrorKind) -> CompileError {
        CompileError::new(kind, ErrorContext::at(self.node, self.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorCategory;
    use crate::tree::Node;

    #[test]
    fn missing_binding_names_node_and_ancestor() {
        let mut tree = NodeTree::new();
        let scene = tree.add_root(Node::scene("s1"));
        let frame = Frame::new(&tree, scene, NodeKind::Scene);

        let err = Scope::root().require_project(&frame).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Structural);
        assert_eq!(err.to_string(), "Scene requires Project");
        assert_eq!(err.ctx.node, Some(scene));
        assert_eq!(err.ctx.path.as_deref(), Some("Scene"));
    }

    #[test]
    fn present_bindings_are_returned() {
        let mut tree = NodeTree::new();
        let project = tree.add_root(Node::project("demo"));
        let frame = Frame::new(&tree, project, NodeKind::Scene);
        let scope = Scope {
            project: Some(project),
            scene: Some("ab12".into()),
            ..Scope::root()
        };
        assert_eq!(scope.require_project(&frame).unwrap(), project);
        assert_eq!(scope.require_scene(&frame).unwrap(), "ab12");
        assert!(scope.require_params(&frame).is_err());
    }
}
