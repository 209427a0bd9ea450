//! The compiled project document.
//!
//! These types mirror the block-coding environment's project JSON field by
//! field; serde attributes carry the exact wire names. A document is built
//! once by [`crate::compiler`] and treated as immutable afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of a compiled project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub speed: u32,
    pub interface: Map<String, Value>,
    pub scenes: Vec<Scene>,
    pub objects: Vec<ObjectEntry>,
    pub variables: Vec<Variable>,
    pub messages: Vec<Message>,
    pub functions: Vec<Function>,
    pub tables: Vec<Value>,
    pub expansion_blocks: Vec<String>,
    pub ai_utilize_blocks: Vec<String>,
    pub hardware_lite_blocks: Vec<String>,
    pub external_modules: Vec<String>,
    pub external_modules_lite: Vec<String>,
}

impl ProjectDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectEntry> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Ids of every entity outside the scripts, in document order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> + '_ {
        let objects = self.objects.iter().flat_map(|object| {
            std::iter::once(object.id.as_str())
                .chain(object.sprite.pictures.iter().map(|p| p.id.as_str()))
                .chain(object.sprite.sounds.iter().map(|s| s.id.as_str()))
        });
        self.scenes
            .iter()
            .map(|s| s.id.as_str())
            .chain(objects)
            .chain(self.variables.iter().map(|v| v.id.as_str()))
            .chain(self.messages.iter().map(|m| m.id.as_str()))
            .chain(self.functions.iter().map(|f| f.id.as_str()))
    }

    /// Every id in the document, script blocks included. Script blocks are
    /// read back from each object's `script` string, so this is meant for
    /// consumers of a finished document.
    pub fn all_ids(&self) -> Result<Vec<String>, serde_json::Error> {
        let mut ids: Vec<String> = self.entity_ids().map(str::to_string).collect();
        for object in &self.objects {
            for block in object.statements()? {
                collect_block_ids(&block, &mut ids);
            }
        }
        Ok(ids)
    }
}

fn collect_block_ids(block: &[BlockValue], ids: &mut Vec<String>) {
    for value in block {
        if let BlockValue::Block(node) = value {
            ids.push(node.id.clone());
            collect_block_ids(&node.params, ids);
            for inner in &node.statements {
                collect_block_ids(inner, ids);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectType {
    #[default]
    #[serde(rename = "sprite")]
    Sprite,
    #[serde(rename = "textBox")]
    TextBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateMethod {
    #[default]
    Free,
    Vertical,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub lock: bool,
    pub scene: String,
    /// JSON text of the object's statement blocks.
    pub script: String,
    pub selected_picture_id: Option<String>,
    pub sprite: Sprite,
    pub entity: Entity,
    pub object_type: ObjectType,
    pub rotate_method: RotateMethod,
}

impl ObjectEntry {
    /// Parses [`ObjectEntry::script`] back into statement blocks.
    pub fn statements(&self) -> Result<Vec<StatementBlock>, serde_json::Error> {
        serde_json::from_str(&self.script)
    }

    pub fn picture(&self, name: &str) -> Option<&Picture> {
        self.sprite.pictures.iter().find(|p| p.name == name)
    }

    pub fn sound(&self, name: &str) -> Option<&Sound> {
        self.sprite.sounds.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sprite {
    pub pictures: Vec<Picture>,
    pub sounds: Vec<Sound>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub x: f64,
    pub y: f64,
    pub reg_x: f64,
    pub reg_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub direction: f64,
    pub width: f64,
    pub height: f64,
    pub font: String,
    pub visible: bool,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
}

/// Extra entity fields carried only by text boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub text: String,
    pub text_align: u8,
    pub colour: String,
    pub bg_color: String,
    pub under_line: bool,
    pub strike: bool,
    pub line_break: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    pub id: String,
    pub name: String,
    pub fileurl: String,
    pub thumb_url: String,
    pub image_type: String,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub id: String,
    pub name: String,
    pub fileurl: String,
    pub duration: f64,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    pub value: Value,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    /// Owning object id; `None` for globals.
    pub object: Option<String>,
    pub is_cloud: bool,
    pub is_real_time: bool,
    pub cloud_date: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    #[default]
    Normal,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub function_type: FunctionType,
    pub use_local_variables: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_variables: Vec<LocalVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVariable {
    pub id: String,
    pub name: String,
    pub value: Value,
}

/// `deletable` is either a numeric level or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Deletable {
    Flag(bool),
    Level(i64),
}

impl Default for Deletable {
    fn default() -> Self {
        Deletable::Level(1)
    }
}

/// One executable block and everything nested under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptNode {
    pub id: String,
    #[serde(rename = "type")]
    pub opcode: String,
    pub params: Vec<BlockValue>,
    pub statements: Vec<StatementBlock>,
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

/// An element of a params list or statement block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockValue {
    Block(Box<ScriptNode>),
    Literal(Value),
}

impl BlockValue {
    pub fn as_block(&self) -> Option<&ScriptNode> {
        match self {
            BlockValue::Block(node) => Some(node),
            BlockValue::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            BlockValue::Block(_) => None,
            BlockValue::Literal(value) => Some(value),
        }
    }
}

pub type StatementBlock = Vec<BlockValue>;
