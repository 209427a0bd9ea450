//! Phase-one drafts of the document.
//!
//! While the tree is walked, objects, statement blocks and scripts live in
//! arenas addressed by small copyable keys, so that a handler deep in the
//! tree can append into a collection owned by an ancestor without holding a
//! borrow on it. Re-evaluated nodes allocate fresh drafts; the old ones stay
//! in the arena but are no longer reachable from any collection.

use serde_json::{Map, Value};

use crate::document::{
    Entity, Function, Message, ObjectType, Picture, RotateMethod, Scene, Sound, Variable,
};
use crate::resolve::LazyRef;
use crate::slots::SlotList;
use crate::tree::{ProjectAttrs, ScriptAttrs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectKey(usize);

/// A params list or a statement block: an ordered list of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SequenceKey(usize);

/// An ordered list of statement blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StatementsKey(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScriptKey(usize);

/// One element of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    Literal(Value),
    Script(ScriptKey),
    Reference(LazyRef),
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectDraft {
    pub name: Option<String>,
    pub speed: u32,
    pub interface: Map<String, Value>,
    pub expansion_blocks: Vec<String>,
    pub ai_utilize_blocks: Vec<String>,
    pub hardware_lite_blocks: Vec<String>,
    pub external_modules: Vec<String>,
    pub external_modules_lite: Vec<String>,
    pub scenes: SlotList<Scene>,
    pub objects: SlotList<ObjectKey>,
    pub variables: SlotList<Variable>,
    pub messages: SlotList<Message>,
    pub functions: SlotList<Function>,
    pub tables: SlotList<Value>,
}

impl ProjectDraft {
    pub fn new(attrs: &ProjectAttrs) -> Self {
        Self {
            name: attrs.name.clone(),
            speed: attrs.speed,
            interface: attrs.interface.clone(),
            expansion_blocks: attrs.expansion_blocks.clone(),
            ai_utilize_blocks: attrs.ai_utilize_blocks.clone(),
            hardware_lite_blocks: attrs.hardware_lite_blocks.clone(),
            external_modules: attrs.external_modules.clone(),
            external_modules_lite: attrs.external_modules_lite.clone(),
            scenes: SlotList::new(),
            objects: SlotList::new(),
            variables: SlotList::new(),
            messages: SlotList::new(),
            functions: SlotList::new(),
            tables: SlotList::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectDraft {
    pub id: String,
    pub name: String,
    pub text: Option<String>,
    pub lock: bool,
    pub scene: String,
    pub object_type: ObjectType,
    pub rotate_method: RotateMethod,
    pub entity: Entity,
    pub selected_picture_id: Option<String>,
    pub pictures: SlotList<Picture>,
    pub sounds: SlotList<Sound>,
    pub script: StatementsKey,
}

#[derive(Debug, Clone)]
pub(crate) struct ScriptDraft {
    pub id: String,
    pub attrs: ScriptAttrs,
    pub params: SequenceKey,
    pub statements: StatementsKey,
}

#[derive(Debug, Default)]
pub(crate) struct Drafts {
    objects: Vec<ObjectDraft>,
    sequences: Vec<SlotList<Entry>>,
    statements: Vec<SlotList<SequenceKey>>,
    scripts: Vec<ScriptDraft>,
}

impl Drafts {
    pub fn add_object(&mut self, draft: ObjectDraft) -> ObjectKey {
        self.objects.push(draft);
        ObjectKey(self.objects.len() - 1)
    }

    pub fn object(&self, key: ObjectKey) -> &ObjectDraft {
        &self.objects[key.0]
    }

    pub fn object_mut(&mut self, key: ObjectKey) -> &mut ObjectDraft {
        &mut self.objects[key.0]
    }

    pub fn new_sequence(&mut self) -> SequenceKey {
        self.sequences.push(SlotList::new());
        SequenceKey(self.sequences.len() - 1)
    }

    pub fn sequence(&self, key: SequenceKey) -> &SlotList<Entry> {
        &self.sequences[key.0]
    }

    pub fn sequence_mut(&mut self, key: SequenceKey) -> &mut SlotList<Entry> {
        &mut self.sequences[key.0]
    }

    pub fn new_statements(&mut self) -> StatementsKey {
        self.statements.push(SlotList::new());
        StatementsKey(self.statements.len() - 1)
    }

    pub fn statements(&self, key: StatementsKey) -> &SlotList<SequenceKey> {
        &self.statements[key.0]
    }

    pub fn statements_mut(&mut self, key: StatementsKey) -> &mut SlotList<SequenceKey> {
        &mut self.statements[key.0]
    }

    pub fn add_script(&mut self, draft: ScriptDraft) -> ScriptKey {
        self.scripts.push(draft);
        ScriptKey(self.scripts.len() - 1)
    }

    pub fn script(&self, key: ScriptKey) -> &ScriptDraft {
        &self.scripts[key.0]
    }
}
