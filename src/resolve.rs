//! Phase two: resolve deferred references and render the document.
//!
//! Named references are recorded during the walk as [`LazyRef`]s and looked
//! up only here, when the drafts are read into a [`ProjectDocument`]. An
//! entity may therefore be declared before or after the param naming it.
//! Lookups are a linear scan by name; the first match wins.

use std::collections::HashSet;

use log::debug;
use serde_json::Value;

use crate::diagnostics::{CompileError, ErrorContext, ErrorKind};
use crate::document::{
    BlockValue, ObjectEntry, ProjectDocument, ScriptNode, Sprite, StatementBlock,
};
use crate::draft::{Drafts, Entry, ObjectKey, ProjectDraft, ScriptKey, SequenceKey, StatementsKey};
use crate::tree::{NodeId, RefKind};

/// A name lookup recorded at declaration time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LazyRef {
    pub kind: RefKind,
    pub name: String,
    /// Object whose assets are searched, for picture and sound references.
    pub owner: Option<ObjectKey>,
    pub node: NodeId,
    pub path: String,
}

impl LazyRef {
    fn resolve(&self, project: &ProjectDraft, drafts: &Drafts) -> Result<String, CompileError> {
        let found = match self.kind {
            RefKind::Variable => project
                .variables
                .iter()
                .find(|v| v.name == self.name)
                .map(|v| v.id.clone()),
            RefKind::Object => project
                .objects
                .iter()
                .map(|key| drafts.object(*key))
                .find(|o| o.name == self.name)
                .map(|o| o.id.clone()),
            RefKind::Picture => self.owner.and_then(|key| {
                drafts
                    .object(key)
                    .pictures
                    .iter()
                    .find(|p| p.name == self.name)
                    .map(|p| p.id.clone())
            }),
            RefKind::Sound => self.owner.and_then(|key| {
                drafts
                    .object(key)
                    .sounds
                    .iter()
                    .find(|s| s.name == self.name)
                    .map(|s| s.id.clone())
            }),
        };
        found.ok_or_else(|| {
            CompileError::new(
                ErrorKind::UnresolvedReference {
                    kind: self.kind,
                    name: self.name.clone(),
                },
                ErrorContext::at(self.node, self.path.clone()),
            )
        })
    }
}

/// Reads the drafts into a finished document.
///
/// `project_nodes` lists every distinct Project node seen by the walk.
pub(crate) fn extract(
    project: Option<&ProjectDraft>,
    project_nodes: &[NodeId],
    drafts: &Drafts,
) -> Result<ProjectDocument, CompileError> {
    if project_nodes.len() > 1 {
        return Err(CompileError::bare(ErrorKind::DuplicateRoot {
            count: project_nodes.len(),
        }));
    }
    let Some(project) = project else {
        return Err(CompileError::bare(ErrorKind::MissingRoot)
            .with_help("wrap the tree in a single Project node"));
    };

    let mut renderer = Renderer {
        project,
        drafts,
        block_ids: Vec::new(),
    };
    let mut objects = Vec::with_capacity(project.objects.len());
    for key in &project.objects {
        objects.push(renderer.object(*key)?);
    }

    let document = ProjectDocument {
        name: project.name.clone(),
        speed: project.speed,
        interface: project.interface.clone(),
        scenes: project.scenes.iter().cloned().collect(),
        objects,
        variables: project.variables.iter().cloned().collect(),
        messages: project.messages.iter().cloned().collect(),
        functions: project.functions.iter().cloned().collect(),
        tables: project.tables.iter().cloned().collect(),
        expansion_blocks: project.expansion_blocks.clone(),
        ai_utilize_blocks: project.ai_utilize_blocks.clone(),
        hardware_lite_blocks: project.hardware_lite_blocks.clone(),
        external_modules: project.external_modules.clone(),
        external_modules_lite: project.external_modules_lite.clone(),
    };

    check_unique_ids(&document, &renderer.block_ids)?;
    debug!(
        "extracted document: {} scenes, {} objects, {} variables",
        document.scenes.len(),
        document.objects.len(),
        document.variables.len()
    );
    Ok(document)
}

/// Script block ids come from the rendered blocks, not from the encoded
/// script strings.
fn check_unique_ids(document: &ProjectDocument, block_ids: &[String]) -> Result<(), CompileError> {
    let mut seen = HashSet::with_capacity(block_ids.len());
    let ids = document
        .entity_ids()
        .chain(block_ids.iter().map(String::as_str));
    for id in ids {
        if !seen.insert(id) {
            return Err(CompileError::bare(ErrorKind::DuplicateId { id: id.to_string() })
                .with_help("explicit ids must not repeat across scenes, objects, assets and messages"));
        }
    }
    Ok(())
}

struct Renderer<'a> {
    project: &'a ProjectDraft,
    drafts: &'a Drafts,
    /// Ids of every block rendered so far.
    block_ids: Vec<String>,
}

impl Renderer<'_> {
    fn object(&mut self, key: ObjectKey) -> Result<ObjectEntry, CompileError> {
        let drafts = self.drafts;
        let draft = drafts.object(key);

        if let Some(picture) = &draft.selected_picture_id {
            if !draft.pictures.iter().any(|p| &p.id == picture) {
                return Err(CompileError::bare(ErrorKind::InvalidSelection {
                    object: draft.name.clone(),
                    picture: picture.clone(),
                }));
            }
        }

        let blocks = self.statements(draft.script)?;
        let script = serde_json::to_string(&blocks)
            .map_err(|e| CompileError::input(format!("cannot encode script of '{}'", draft.name), e))?;

        Ok(ObjectEntry {
            id: draft.id.clone(),
            name: draft.name.clone(),
            text: draft.text.clone(),
            lock: draft.lock,
            scene: draft.scene.clone(),
            script,
            selected_picture_id: draft.selected_picture_id.clone(),
            sprite: Sprite {
                pictures: draft.pictures.iter().cloned().collect(),
                sounds: draft.sounds.iter().cloned().collect(),
            },
            entity: draft.entity.clone(),
            object_type: draft.object_type,
            rotate_method: draft.rotate_method,
        })
    }

    fn statements(&mut self, key: StatementsKey) -> Result<Vec<StatementBlock>, CompileError> {
        let drafts = self.drafts;
        drafts
            .statements(key)
            .iter()
            .map(|block| self.sequence(*block))
            .collect()
    }

    fn sequence(&mut self, key: SequenceKey) -> Result<StatementBlock, CompileError> {
        let drafts = self.drafts;
        drafts
            .sequence(key)
            .iter()
            .map(|entry| self.entry(entry))
            .collect()
    }

    fn entry(&mut self, entry: &Entry) -> Result<BlockValue, CompileError> {
        match entry {
            Entry::Literal(value) => Ok(BlockValue::Literal(value.clone())),
            Entry::Script(key) => Ok(BlockValue::Block(Box::new(self.script(*key)?))),
            Entry::Reference(reference) => {
                let id = reference.resolve(self.project, self.drafts)?;
                Ok(BlockValue::Literal(Value::String(id)))
            }
        }
    }

    fn script(&mut self, key: ScriptKey) -> Result<ScriptNode, CompileError> {
        let drafts = self.drafts;
        let draft = drafts.script(key);
        let attrs = &draft.attrs;
        self.block_ids.push(draft.id.clone());
        Ok(ScriptNode {
            id: draft.id.clone(),
            opcode: attrs.opcode.clone(),
            params: self.sequence(draft.params)?,
            statements: self.statements(draft.statements)?,
            x: attrs.x,
            y: attrs.y,
            assemble: attrs.assemble,
            copyable: attrs.copyable,
            deletable: attrs.deletable,
            emphasized: attrs.emphasized,
            movable: attrs.movable,
            read_only: attrs.read_only,
            extensions: attrs.extensions.clone(),
        })
    }
}
