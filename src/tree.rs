//! Input node trees.
//!
//! A [`NodeTree`] is an arena of declared nodes addressed by [`NodeId`].
//! The id of a node is its instance identity: it stays the same when the
//! node's attributes are edited and the node is evaluated again.
//!
//! Trees are built in code with [`NodeTree::add_root`] / [`NodeTree::push`],
//! or loaded from JSON/YAML through [`NodeSpec`].

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::diagnostics::CompileError;
use crate::document::{Deletable, FunctionType, ObjectType, RotateMethod};

// ============================================================================
// NODE HANDLES
// ============================================================================

/// Stable handle of a node instance inside a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kinds, named the way they appear in input files and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Project,
    Scene,
    Object,
    Picture,
    Sound,
    Variable,
    Message,
    Function,
    Table,
    Statement,
    Script,
    Param,
    VariableParam,
    ObjectParam,
    PictureParam,
    SoundParam,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Project => "Project",
            NodeKind::Scene => "Scene",
            NodeKind::Object => "Object",
            NodeKind::Picture => "Picture",
            NodeKind::Sound => "Sound",
            NodeKind::Variable => "Variable",
            NodeKind::Message => "Message",
            NodeKind::Function => "Function",
            NodeKind::Table => "Table",
            NodeKind::Statement => "Statement",
            NodeKind::Script => "Script",
            NodeKind::Param => "Param",
            NodeKind::VariableParam => "VariableParam",
            NodeKind::ObjectParam => "ObjectParam",
            NodeKind::PictureParam => "PictureParam",
            NodeKind::SoundParam => "SoundParam",
        }
    }

    /// Kinds that contribute a single record and take no child nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Picture
                | NodeKind::Sound
                | NodeKind::Variable
                | NodeKind::Message
                | NodeKind::Function
                | NodeKind::Table
                | NodeKind::VariableParam
                | NodeKind::ObjectParam
                | NodeKind::PictureParam
                | NodeKind::SoundParam
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a named-reference param points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Variable,
    Object,
    Picture,
    Sound,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefKind::Variable => "variable",
            RefKind::Object => "object",
            RefKind::Picture => "picture",
            RefKind::Sound => "sound",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// ATTRIBUTE SETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAttrs {
    pub name: Option<String>,
    pub speed: u32,
    pub interface: Map<String, Value>,
    pub expansion_blocks: Vec<String>,
    pub ai_utilize_blocks: Vec<String>,
    pub hardware_lite_blocks: Vec<String>,
    pub external_modules: Vec<String>,
    pub external_modules_lite: Vec<String>,
}

impl Default for ProjectAttrs {
    fn default() -> Self {
        Self {
            name: None,
            speed: 60,
            interface: Map::new(),
            expansion_blocks: Vec::new(),
            ai_utilize_blocks: Vec::new(),
            hardware_lite_blocks: Vec::new(),
            external_modules: Vec::new(),
            external_modules_lite: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneAttrs {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectAttrs {
    pub id: Option<String>,
    pub name: String,
    pub object_type: ObjectType,
    pub lock: bool,
    pub rotate_method: RotateMethod,
    pub x: f64,
    pub y: f64,
    /// Defaults to half the width.
    pub reg_x: Option<f64>,
    /// Defaults to half the height.
    pub reg_y: Option<f64>,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub direction: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    /// Makes this the object selected in the editor interface.
    pub selected: bool,

    // text boxes only
    pub text: String,
    /// Defaults to `"{font_size}px Nanum Gothic"`.
    pub font: Option<String>,
    pub font_size: f64,
    pub text_align: u8,
    pub colour: String,
    pub bg_color: String,
    pub under_line: bool,
    pub strike: bool,
    pub line_break: bool,
}

impl ObjectAttrs {
    pub fn sprite(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn text_box(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type: ObjectType::TextBox,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for ObjectAttrs {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            object_type: ObjectType::Sprite,
            lock: false,
            rotate_method: RotateMethod::Free,
            x: 0.0,
            y: 0.0,
            reg_x: None,
            reg_y: None,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            direction: 90.0,
            width: 0.0,
            height: 0.0,
            visible: false,
            selected: false,
            text: "글상자".to_string(),
            font: None,
            font_size: 20.0,
            text_align: 0,
            colour: "#000000".to_string(),
            bg_color: "#ffffff".to_string(),
            under_line: false,
            strike: false,
            line_break: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PictureAttrs {
    pub id: Option<String>,
    pub name: String,
    pub fileurl: String,
    /// Defaults to `fileurl`.
    pub thumb_url: Option<String>,
    /// Defaults to the extension of `fileurl`, else `png`.
    pub image_type: Option<String>,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundAttrs {
    pub id: Option<String>,
    pub name: String,
    pub fileurl: String,
    pub duration: f64,
    /// Defaults to the extension of `fileurl` with its dot, else `.mp3`.
    pub ext: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariableAttrs {
    pub name: String,
    pub value: Value,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub is_cloud: bool,
    pub is_real_time: bool,
    pub cloud_date: Value,
}

impl Default for VariableAttrs {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: Value::Null,
            visible: false,
            x: 0.0,
            y: 0.0,
            is_cloud: false,
            is_real_time: false,
            cloud_date: Value::Bool(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageAttrs {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionAttrs {
    pub content: String,
    #[serde(rename = "type")]
    pub function_type: FunctionType,
    pub use_local_variables: bool,
    pub local_variables: Vec<LocalVariableAttrs>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalVariableAttrs {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableAttrs {
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptAttrs {
    #[serde(rename = "type")]
    pub opcode: String,
    pub x: f64,
    pub y: f64,
    pub assemble: bool,
    pub copyable: bool,
    pub deletable: Deletable,
    pub emphasized: bool,
    pub movable: Option<bool>,
    pub read_only: Option<bool>,
    pub extensions: Vec<String>,
}

impl ScriptAttrs {
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            opcode: opcode.into(),
            ..Self::default()
        }
    }
}

impl Default for ScriptAttrs {
    fn default() -> Self {
        Self {
            opcode: String::new(),
            x: 0.0,
            y: 0.0,
            assemble: true,
            copyable: true,
            deletable: Deletable::default(),
            emphasized: false,
            movable: None,
            read_only: None,
            extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParamAttrs {
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefAttrs {
    pub name: String,
}

// ============================================================================
// NODES
// ============================================================================

/// One declared node: its kind plus its attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    Project(ProjectAttrs),
    Scene(SceneAttrs),
    Object(ObjectAttrs),
    Picture(PictureAttrs),
    Sound(SoundAttrs),
    Variable(VariableAttrs),
    Message(MessageAttrs),
    Function(FunctionAttrs),
    Table(TableAttrs),
    Statement,
    Script(ScriptAttrs),
    Param(ParamAttrs),
    VariableParam(RefAttrs),
    ObjectParam(RefAttrs),
    PictureParam(RefAttrs),
    SoundParam(RefAttrs),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Project(_) => NodeKind::Project,
            Node::Scene(_) => NodeKind::Scene,
            Node::Object(_) => NodeKind::Object,
            Node::Picture(_) => NodeKind::Picture,
            Node::Sound(_) => NodeKind::Sound,
            Node::Variable(_) => NodeKind::Variable,
            Node::Message(_) => NodeKind::Message,
            Node::Function(_) => NodeKind::Function,
            Node::Table(_) => NodeKind::Table,
            Node::Statement => NodeKind::Statement,
            Node::Script(_) => NodeKind::Script,
            Node::Param(_) => NodeKind::Param,
            Node::VariableParam(_) => NodeKind::VariableParam,
            Node::ObjectParam(_) => NodeKind::ObjectParam,
            Node::PictureParam(_) => NodeKind::PictureParam,
            Node::SoundParam(_) => NodeKind::SoundParam,
        }
    }

    /// The reference kind and target name of a named-reference param.
    pub fn as_reference(&self) -> Option<(RefKind, &str)> {
        match self {
            Node::VariableParam(r) => Some((RefKind::Variable, &r.name)),
            Node::ObjectParam(r) => Some((RefKind::Object, &r.name)),
            Node::PictureParam(r) => Some((RefKind::Picture, &r.name)),
            Node::SoundParam(r) => Some((RefKind::Sound, &r.name)),
            _ => None,
        }
    }

    /// Short label for outlines: kind plus its most telling attribute.
    pub fn label(&self) -> String {
        match self {
            Node::Project(a) => match &a.name {
                Some(name) => format!("Project \"{name}\""),
                None => "Project".to_string(),
            },
            Node::Scene(a) => format!("Scene \"{}\"", a.name),
            Node::Object(a) => format!("Object \"{}\"", a.name),
            Node::Picture(a) => format!("Picture \"{}\"", a.name),
            Node::Sound(a) => format!("Sound \"{}\"", a.name),
            Node::Variable(a) => format!("Variable \"{}\"", a.name),
            Node::Message(a) => format!("Message \"{}\"", a.name),
            Node::Script(a) => format!("Script {}", a.opcode),
            Node::Param(a) => match &a.value {
                Some(value) => format!("Param {value}"),
                None => "Param".to_string(),
            },
            other => match other.as_reference() {
                Some((_, name)) => format!("{} \"{name}\"", other.kind()),
                None => other.kind().to_string(),
            },
        }
    }

    pub fn project(name: impl Into<String>) -> Self {
        Node::Project(ProjectAttrs {
            name: Some(name.into()),
            ..ProjectAttrs::default()
        })
    }

    pub fn scene(name: impl Into<String>) -> Self {
        Node::Scene(SceneAttrs {
            id: None,
            name: name.into(),
        })
    }

    pub fn sprite(name: impl Into<String>) -> Self {
        Node::Object(ObjectAttrs::sprite(name))
    }

    pub fn text_box(name: impl Into<String>) -> Self {
        Node::Object(ObjectAttrs::text_box(name))
    }

    pub fn picture(name: impl Into<String>, fileurl: impl Into<String>, width: f64, height: f64) -> Self {
        Node::Picture(PictureAttrs {
            name: name.into(),
            fileurl: fileurl.into(),
            width,
            height,
            ..PictureAttrs::default()
        })
    }

    pub fn sound(name: impl Into<String>, fileurl: impl Into<String>, duration: f64) -> Self {
        Node::Sound(SoundAttrs {
            name: name.into(),
            fileurl: fileurl.into(),
            duration,
            ..SoundAttrs::default()
        })
    }

    pub fn variable(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Node::Variable(VariableAttrs {
            name: name.into(),
            value: value.into(),
            ..VariableAttrs::default()
        })
    }

    pub fn message(name: impl Into<String>) -> Self {
        Node::Message(MessageAttrs {
            id: None,
            name: name.into(),
        })
    }

    pub fn statement() -> Self {
        Node::Statement
    }

    pub fn script(opcode: impl Into<String>) -> Self {
        Node::Script(ScriptAttrs::new(opcode))
    }

    pub fn param(value: impl Into<Value>) -> Self {
        Node::Param(ParamAttrs {
            value: Some(value.into()),
        })
    }

    /// A param slot with no value of its own; filled by its child or null.
    pub fn empty_param() -> Self {
        Node::Param(ParamAttrs::default())
    }

    pub fn reference(kind: RefKind, name: impl Into<String>) -> Self {
        let attrs = RefAttrs { name: name.into() };
        match kind {
            RefKind::Variable => Node::VariableParam(attrs),
            RefKind::Object => Node::ObjectParam(attrs),
            RefKind::Picture => Node::PictureParam(attrs),
            RefKind::Sound => Node::SoundParam(attrs),
        }
    }
}

/// Serialized form of a node and its subtree, as found in tree files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeSpec {
    #[serde(flatten)]
    pub node: Node,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// A tree file holds either one root node or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum SpecFile {
    Many(Vec<NodeSpec>),
    One(NodeSpec),
}

impl SpecFile {
    fn into_roots(self) -> Vec<NodeSpec> {
        match self {
            SpecFile::Many(roots) => roots,
            SpecFile::One(root) => vec![root],
        }
    }
}

// ============================================================================
// TREE ARENA
// ============================================================================

#[derive(Debug, Clone)]
struct NodeSlot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    slots: Vec<NodeSlot>,
    roots: Vec<NodeId>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::from_index(self.slots.len() as u32);
        self.slots.push(NodeSlot {
            node,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Adds a top-level node.
    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.insert(node, None);
        self.roots.push(id);
        id
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// # Panics
    /// If `parent` does not belong to this tree.
    pub fn push(&mut self, parent: NodeId, node: Node) -> NodeId {
        assert!(self.contains(parent), "parent {parent} is not in this tree");
        let id = self.insert(node, Some(parent));
        self.slots[parent.index() as usize].children.push(id);
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        (id.index() as usize) < self.slots.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index() as usize).map(|s| &s.node)
    }

    /// Replaces a node's attributes, keeping its identity and children.
    pub fn set(&mut self, id: NodeId, node: Node) -> Option<Node> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        Some(std::mem::replace(&mut slot.node, node))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.index() as usize)
            .map(|s| s.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.index() as usize).and_then(|s| s.parent)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Ancestry of a node as `Project > Scene > Object`.
    pub fn path(&self, id: NodeId) -> String {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else { break };
            chain.push(node.kind().as_str());
            current = self.parent(node_id);
        }
        chain.reverse();
        chain.join(" > ")
    }

    /// Number of nodes of the given kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.slots.iter().filter(|s| s.node.kind() == kind).count()
    }

    /// Indented outline of the whole tree.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.outline_into(*root, 0, &mut out);
        }
        out
    }

    fn outline_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.label());
        out.push('\n');
        for child in self.children(id) {
            self.outline_into(*child, depth + 1, out);
        }
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    pub fn from_specs(specs: Vec<NodeSpec>) -> Self {
        let mut tree = Self::new();
        for spec in specs {
            let root = tree.add_root(spec.node);
            tree.attach_children(root, spec.children);
        }
        tree
    }

    fn attach_children(&mut self, parent: NodeId, children: Vec<NodeSpec>) {
        for spec in children {
            let id = self.push(parent, spec.node);
            self.attach_children(id, spec.children);
        }
    }

    pub fn from_json(text: &str) -> Result<Self, CompileError> {
        let file: SpecFile = serde_json::from_str(text)
            .map_err(|e| CompileError::input(format!("invalid JSON tree: {e}"), e))?;
        Ok(Self::from_specs(file.into_roots()))
    }

    pub fn from_yaml(text: &str) -> Result<Self, CompileError> {
        let file: SpecFile = serde_yaml::from_str(text)
            .map_err(|e| CompileError::input(format!("invalid YAML tree: {e}"), e))?;
        Ok(Self::from_specs(file.into_roots()))
    }

    /// Loads a tree file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::input(format!("cannot read '{}': {e}", path.display()), e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_links_parent_and_children() {
        let mut tree = NodeTree::new();
        let project = tree.add_root(Node::project("demo"));
        let scene = tree.push(project, Node::scene("s1"));
        let object = tree.push(scene, Node::sprite("bot"));

        assert_eq!(tree.children(project), &[scene]);
        assert_eq!(tree.parent(object), Some(scene));
        assert_eq!(tree.path(object), "Project > Scene > Object");
        assert_eq!(tree.roots(), &[project]);
    }

    #[test]
    fn set_keeps_identity() {
        let mut tree = NodeTree::new();
        let scene = tree.add_root(Node::scene("a"));
        let child = tree.push(scene, Node::sprite("bot"));
        let old = tree.set(scene, Node::scene("b"));
        assert_eq!(old, Some(Node::scene("a")));
        assert_eq!(tree.node(scene), Some(&Node::scene("b")));
        assert_eq!(tree.children(scene), &[child]);
    }

    #[test]
    fn loads_json_with_defaults() {
        let tree = NodeTree::from_json(
            r#"{
                "kind": "Project", "name": "demo",
                "children": [
                    { "kind": "Scene", "name": "s1", "children": [
                        { "kind": "Object", "name": "bot", "width": 100, "children": [
                            { "kind": "Statement", "children": [
                                { "kind": "Script", "type": "move_direction", "children": [
                                    { "kind": "Param", "value": 10 }
                                ]}
                            ]}
                        ]}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(tree.len(), 6);
        let Some(Node::Project(project)) = tree.node(tree.roots()[0]) else {
            panic!("expected a project root");
        };
        assert_eq!(project.speed, 60);

        let object = NodeId::from_index(2);
        let Some(Node::Object(attrs)) = tree.node(object) else {
            panic!("expected an object");
        };
        assert_eq!(attrs.width, 100.0);
        assert_eq!(attrs.scale_x, 1.0);
        assert_eq!(attrs.direction, 90.0);

        let Some(Node::Script(script)) = tree.node(NodeId::from_index(4)) else {
            panic!("expected a script");
        };
        assert_eq!(script.opcode, "move_direction");
        assert!(script.assemble);
        assert_eq!(script.deletable, Deletable::Level(1));
    }

    #[test]
    fn loads_yaml_root_list() {
        let tree = NodeTree::from_yaml(
            "- kind: Project\n  name: demo\n  children:\n    - kind: Variable\n      name: score\n      value: 0\n",
        )
        .unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(
            tree.node(NodeId::from_index(1)).map(Node::kind),
            Some(NodeKind::Variable)
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = NodeTree::from_json(r#"{ "kind": "Sprite" }"#).unwrap_err();
        assert_eq!(err.category(), crate::diagnostics::ErrorCategory::Input);
    }

    #[test]
    fn reference_constructor_and_accessor_agree() {
        let node = Node::reference(RefKind::Sound, "bark");
        assert_eq!(node.kind(), NodeKind::SoundParam);
        assert_eq!(node.as_reference(), Some((RefKind::Sound, "bark")));
        assert_eq!(Node::statement().as_reference(), None);
        assert!(node.kind().is_leaf());
        assert!(!NodeKind::Param.is_leaf());
    }

    #[test]
    fn outline_lists_labels() {
        let mut tree = NodeTree::new();
        let project = tree.add_root(Node::project("demo"));
        let statement = tree.push(project, Node::statement());
        tree.push(statement, Node::reference(RefKind::Variable, "score"));
        assert_eq!(
            tree.outline(),
            "Project \"demo\"\n  Statement\n    VariableParam \"score\"\n"
        );
    }
}
