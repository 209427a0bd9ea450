//! Compilation entry point.
//!
//! [`compile`] walks a [`NodeTree`] once in pre-order, threading a
//! [`Scope`] from each node to its children, then reads the drafts into a
//! [`ProjectDocument`]. [`Session`] exposes the same machinery step by step
//! and keeps per-instance memory, so single nodes can be edited and
//! evaluated again without disturbing the rest of the document.

use std::collections::HashMap;

use log::{debug, trace};

use crate::diagnostics::{CompileError, ErrorContext, ErrorKind, ErrorReporting};
use crate::document::ProjectDocument;
use crate::draft::{Drafts, ProjectDraft};
use crate::handlers;
use crate::ids::{IdIssuer, ENTITY_ID_LEN};
use crate::resolve;
use crate::scope::{Frame, Scope};
use crate::tree::{Node, NodeId, NodeTree};

/// Knobs for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Seeds id generation; implies an isolated namespace.
    pub seed: Option<u64>,
    /// Issue ids from a namespace private to this compilation.
    pub isolated_ids: bool,
}

impl CompileOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            isolated_ids: true,
        }
    }

    fn issuer(&self) -> IdIssuer {
        match (self.seed, self.isolated_ids) {
            (Some(seed), _) => IdIssuer::seeded(seed),
            (None, true) => IdIssuer::isolated(),
            (None, false) => IdIssuer::new(),
        }
    }
}

/// What the compiler remembers about one node instance.
#[derive(Debug, Default)]
struct Instance {
    id: Option<String>,
    /// Extra ids owned by the node, e.g. function local variables.
    suffixes: Vec<String>,
    /// Scope the node was last evaluated under.
    scope: Scope,
}

/// Mutable state of a compilation, shared by all handlers.
#[derive(Debug)]
pub(crate) struct BuildState {
    pub(crate) drafts: Drafts,
    pub(crate) project: Option<ProjectDraft>,
    project_nodes: Vec<NodeId>,
    issuer: IdIssuer,
    memory: HashMap<NodeId, Instance>,
}

impl BuildState {
    fn new(issuer: IdIssuer) -> Self {
        Self {
            drafts: Drafts::default(),
            project: None,
            project_nodes: Vec::new(),
            issuer,
            memory: HashMap::new(),
        }
    }

    /// The node's id: `explicit` if given, else one issued on first use and
    /// reused on every later evaluation.
    pub(crate) fn instance_id(&mut self, node: NodeId, explicit: Option<&str>) -> String {
        if let Some(id) = explicit {
            self.issuer.reserve(id);
            return id.to_string();
        }
        let issuer = &mut self.issuer;
        let instance = self.memory.entry(node).or_default();
        instance
            .id
            .get_or_insert_with(|| issuer.next_id(ENTITY_ID_LEN))
            .clone()
    }

    /// `count` memoized short ids owned by `node`.
    pub(crate) fn instance_suffixes(&mut self, node: NodeId, count: usize) -> Vec<String> {
        let issuer = &mut self.issuer;
        let instance = self.memory.entry(node).or_default();
        while instance.suffixes.len() < count {
            instance.suffixes.push(issuer.next_id(ENTITY_ID_LEN));
        }
        instance.suffixes[..count].to_vec()
    }

    /// Records a Project node attaching to the compiler root.
    pub(crate) fn claim_root(&mut self, node: NodeId) {
        if !self.project_nodes.contains(&node) {
            self.project_nodes.push(node);
        }
    }

    pub(crate) fn project_mut(&mut self, frame: &Frame<'_>) -> Result<&mut ProjectDraft, CompileError> {
        self.project
            .as_mut()
            .ok_or_else(|| frame.missing_ancestor(frame.kind, "Project"))
    }

    fn remember_scope(&mut self, node: NodeId, scope: &Scope) {
        self.memory.entry(node).or_default().scope = scope.clone();
    }

    fn extract(&self) -> Result<ProjectDocument, CompileError> {
        resolve::extract(self.project.as_ref(), &self.project_nodes, &self.drafts)
    }
}

/// Evaluates `node` and its subtree under `scope`.
fn walk(tree: &NodeTree, state: &mut BuildState, node: NodeId, scope: &Scope) -> Result<(), CompileError> {
    let Some(declared) = tree.node(node) else {
        return Err(CompileError::bare(ErrorKind::UnknownInstance { node }));
    };
    let frame = Frame::new(tree, node, declared.kind());
    trace!("evaluating {} {} ({})", frame.kind, node, frame.path());

    state.remember_scope(node, scope);
    let inner = handlers::dispatch(state, &frame, declared, scope)?;
    for child in tree.children(node) {
        walk(tree, state, *child, &inner)?;
    }
    Ok(())
}

/// A compilation in progress.
#[derive(Debug)]
pub struct Session {
    tree: NodeTree,
    state: BuildState,
    evaluated: bool,
}

impl Session {
    pub fn new(tree: NodeTree) -> Self {
        Self::with_options(tree, &CompileOptions::default())
    }

    pub fn with_options(tree: NodeTree, options: &CompileOptions) -> Self {
        Self {
            tree,
            state: BuildState::new(options.issuer()),
            evaluated: false,
        }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Runs the evaluation pass over every root of the tree.
    pub fn evaluate(&mut self) -> Result<(), CompileError> {
        debug!("evaluating {} nodes from {} roots", self.tree.len(), self.tree.roots().len());
        let scope = Scope::root();
        for root in self.tree.roots() {
            walk(&self.tree, &mut self.state, *root, &scope)?;
        }
        self.evaluated = true;
        Ok(())
    }

    /// Replaces a node's attributes. The change takes effect on the next
    /// evaluation of that node.
    pub fn update(&mut self, node: NodeId, declared: Node) -> Result<Node, CompileError> {
        self.tree
            .set(node, declared)
            .ok_or_else(|| CompileError::bare(ErrorKind::UnknownInstance { node }))
    }

    /// Evaluates one node and its subtree again, under the scope it was
    /// last evaluated with. Its entries move to the tail of their
    /// collections.
    pub fn reevaluate(&mut self, node: NodeId) -> Result<(), CompileError> {
        let Some(scope) = self.state.memory.get(&node).map(|i| i.scope.clone()) else {
            return Err(CompileError::new(
                ErrorKind::UnknownInstance { node },
                ErrorContext::at(node, self.tree.path(node)),
            ));
        };
        debug!("re-evaluating {} ({})", node, self.tree.path(node));
        walk(&self.tree, &mut self.state, node, &scope)
    }

    /// Reads the current drafts into a document, resolving every reference.
    pub fn document(&self) -> Result<ProjectDocument, CompileError> {
        if !self.evaluated {
            return Err(CompileError::new(ErrorKind::MissingRoot, ErrorContext::none())
                .with_help("call evaluate() before reading the document"));
        }
        self.state.extract()
    }

    pub fn finish(self) -> Result<ProjectDocument, CompileError> {
        self.document()
    }
}

/// Compiles `tree` into a project document.
pub fn compile(tree: &NodeTree) -> Result<ProjectDocument, CompileError> {
    compile_with(tree, &CompileOptions::default())
}

pub fn compile_with(tree: &NodeTree, options: &CompileOptions) -> Result<ProjectDocument, CompileError> {
    let mut session = Session::with_options(tree.clone(), options);
    session.evaluate()?;
    let document = session.finish()?;
    debug!(
        "compiled project {:?} with {} objects",
        document.name,
        document.objects.len()
    );
    Ok(document)
}
