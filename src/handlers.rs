//! One handler per node kind.
//!
//! Every handler follows the same steps: check the ambient bindings it
//! needs, take the node's memoized id, build its fragment, upsert the
//! fragment into the collection its ancestors expose, and return the scope
//! its children will see.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::compiler::BuildState;
use crate::diagnostics::{CompileError, ErrorReporting};
use crate::document::{
    Dimension, Entity, Function, LocalVariable, Message, ObjectType, Picture, Scene, Sound,
    TextStyle, Variable,
};
use crate::draft::{Entry, ObjectDraft, ProjectDraft, ScriptDraft};
use crate::resolve::LazyRef;
use crate::scope::{Frame, Scope};
use crate::slots::InstanceToken;
use crate::tree::{
    FunctionAttrs, MessageAttrs, Node, NodeKind, ObjectAttrs, ParamAttrs, PictureAttrs,
    ProjectAttrs, RefKind, SceneAttrs, ScriptAttrs, SoundAttrs, TableAttrs, VariableAttrs,
};

/// Font string the editor stores for sprites, which have no text.
const SPRITE_FONT: &str = "undefinedpx ";

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([^./]*)$").expect("valid regex"));

/// Runs the handler for `node` and returns the scope for its children.
pub(crate) fn dispatch(
    state: &mut BuildState,
    frame: &Frame<'_>,
    node: &Node,
    scope: &Scope,
) -> Result<Scope, CompileError> {
    let children = frame.tree.children(frame.node).len();
    if frame.kind.is_leaf() && children > 0 {
        return Err(frame
            .unexpected_children(frame.kind, children)
            .with_help("only Project, Scene, Object, Statement, Script and Param nest other nodes"));
    }

    match node {
        Node::Project(attrs) => project(state, frame, scope, attrs),
        Node::Scene(attrs) => scene(state, frame, scope, attrs),
        Node::Object(attrs) => object(state, frame, scope, attrs),
        Node::Picture(attrs) => picture(state, frame, scope, attrs),
        Node::Sound(attrs) => sound(state, frame, scope, attrs),
        Node::Variable(attrs) => variable(state, frame, scope, attrs),
        Node::Message(attrs) => message(state, frame, scope, attrs),
        Node::Function(attrs) => function(state, frame, scope, attrs),
        Node::Table(attrs) => table(state, frame, scope, attrs),
        Node::Statement => statement(state, frame, scope),
        Node::Script(attrs) => script(state, frame, scope, attrs),
        Node::Param(attrs) => param(state, frame, scope, attrs),
        Node::VariableParam(r) => reference(state, frame, scope, RefKind::Variable, &r.name),
        Node::ObjectParam(r) => reference(state, frame, scope, RefKind::Object, &r.name),
        Node::PictureParam(r) => reference(state, frame, scope, RefKind::Picture, &r.name),
        Node::SoundParam(r) => reference(state, frame, scope, RefKind::Sound, &r.name),
    }
}

fn token(frame: &Frame<'_>) -> InstanceToken {
    InstanceToken::of(frame.node)
}

fn log_replaced(frame: &Frame<'_>, replaced: bool) {
    if replaced {
        debug!("{} {} replaced its previous entry", frame.kind, frame.node);
    }
}

// ============================================================================
// PROJECT STRUCTURE
// ============================================================================

fn project(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &ProjectAttrs,
) -> Result<Scope, CompileError> {
    scope.require_root(frame)?;
    state.claim_root(frame.node);
    state.project = Some(ProjectDraft::new(attrs));
    Ok(Scope {
        root: false,
        project: Some(frame.node),
        ..scope.clone()
    })
}

fn scene(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &SceneAttrs,
) -> Result<Scope, CompileError> {
    scope.require_project(frame)?;
    let id = state.instance_id(frame.node, attrs.id.as_deref());
    let replaced = state.project_mut(frame)?.scenes.upsert(
        token(frame),
        Scene {
            id: id.clone(),
            name: attrs.name.clone(),
        },
    );
    log_replaced(frame, replaced);
    Ok(Scope {
        scene: Some(id),
        ..scope.clone()
    })
}

fn object(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &ObjectAttrs,
) -> Result<Scope, CompileError> {
    let scene = scope.require_scene(frame)?.to_string();
    scope.require_project(frame)?;

    let id = state.instance_id(frame.node, attrs.id.as_deref());
    let script = state.drafts.new_statements();
    let is_text_box = attrs.object_type == ObjectType::TextBox;

    let draft = ObjectDraft {
        id: id.clone(),
        name: attrs.name.clone(),
        text: is_text_box.then(|| attrs.text.clone()),
        lock: attrs.lock,
        scene,
        object_type: attrs.object_type,
        rotate_method: attrs.rotate_method,
        entity: entity(attrs),
        selected_picture_id: None,
        pictures: Default::default(),
        sounds: Default::default(),
        script,
    };
    let key = state.drafts.add_object(draft);

    let project = state.project_mut(frame)?;
    let replaced = project.objects.upsert(token(frame), key);
    if attrs.selected {
        project
            .interface
            .insert("object".to_string(), Value::String(id));
    }
    log_replaced(frame, replaced);

    Ok(Scope {
        object: Some(key),
        statements: Some(script),
        ..scope.clone()
    })
}

fn entity(attrs: &ObjectAttrs) -> Entity {
    let text = (attrs.object_type == ObjectType::TextBox).then(|| TextStyle {
        font_size: attrs.font_size,
        text: attrs.text.clone(),
        text_align: attrs.text_align,
        colour: attrs.colour.clone(),
        bg_color: attrs.bg_color.clone(),
        under_line: attrs.under_line,
        strike: attrs.strike,
        line_break: attrs.line_break,
    });
    let font = match (&attrs.font, attrs.object_type) {
        (Some(font), _) => font.clone(),
        (None, ObjectType::TextBox) => format!("{}px Nanum Gothic", attrs.font_size),
        (None, ObjectType::Sprite) => SPRITE_FONT.to_string(),
    };
    Entity {
        x: attrs.x,
        y: attrs.y,
        reg_x: attrs.reg_x.unwrap_or(attrs.width / 2.0),
        reg_y: attrs.reg_y.unwrap_or(attrs.height / 2.0),
        scale_x: attrs.scale_x,
        scale_y: attrs.scale_y,
        rotation: attrs.rotation,
        direction: attrs.direction,
        width: attrs.width,
        height: attrs.height,
        font,
        visible: attrs.visible,
        text,
    }
}

// ============================================================================
// ASSETS
// ============================================================================

fn extension(fileurl: &str) -> Option<&str> {
    EXTENSION
        .captures(fileurl)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|ext| !ext.is_empty())
}

fn picture(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &PictureAttrs,
) -> Result<Scope, CompileError> {
    let key = match scope.object {
        Some(key) if state.drafts.object(key).object_type == ObjectType::Sprite => key,
        _ => return Err(frame.missing_ancestor(frame.kind, "a sprite Object")),
    };
    let id = state.instance_id(frame.node, attrs.id.as_deref());
    let picture = Picture {
        id: id.clone(),
        name: attrs.name.clone(),
        fileurl: attrs.fileurl.clone(),
        thumb_url: attrs.thumb_url.clone().unwrap_or_else(|| attrs.fileurl.clone()),
        image_type: attrs
            .image_type
            .clone()
            .or_else(|| extension(&attrs.fileurl).map(str::to_string))
            .unwrap_or_else(|| "png".to_string()),
        dimension: Dimension {
            width: attrs.width,
            height: attrs.height,
        },
    };

    let object = state.drafts.object_mut(key);
    let replaced = object.pictures.upsert(token(frame), picture);
    if attrs.selected {
        object.selected_picture_id = Some(id);
    }
    log_replaced(frame, replaced);
    Ok(scope.clone())
}

fn sound(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &SoundAttrs,
) -> Result<Scope, CompileError> {
    let key = scope.require_object(frame)?;
    let id = state.instance_id(frame.node, attrs.id.as_deref());
    let sound = Sound {
        id,
        name: attrs.name.clone(),
        fileurl: attrs.fileurl.clone(),
        duration: attrs.duration,
        ext: attrs
            .ext
            .clone()
            .or_else(|| extension(&attrs.fileurl).map(|ext| format!(".{ext}")))
            .unwrap_or_else(|| ".mp3".to_string()),
    };
    let replaced = state.drafts.object_mut(key).sounds.upsert(token(frame), sound);
    log_replaced(frame, replaced);
    Ok(scope.clone())
}

// ============================================================================
// PROJECT-LEVEL RECORDS
// ============================================================================

fn variable(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &VariableAttrs,
) -> Result<Scope, CompileError> {
    scope.require_project(frame)?;
    let id = state.instance_id(frame.node, None);
    let object = scope.object.map(|key| state.drafts.object(key).id.clone());
    let variable = Variable {
        id,
        name: attrs.name.clone(),
        value: attrs.value.clone(),
        visible: attrs.visible,
        x: attrs.x,
        y: attrs.y,
        object,
        is_cloud: attrs.is_cloud,
        is_real_time: attrs.is_real_time,
        cloud_date: attrs.cloud_date.clone(),
    };
    let replaced = state.project_mut(frame)?.variables.upsert(token(frame), variable);
    log_replaced(frame, replaced);
    Ok(scope.clone())
}

fn message(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &MessageAttrs,
) -> Result<Scope, CompileError> {
    scope.require_project(frame)?;
    // An empty id counts as none.
    let explicit = attrs.id.as_deref().filter(|id| !id.is_empty());
    let id = state.instance_id(frame.node, explicit);
    let message = Message {
        id,
        name: attrs.name.clone(),
    };
    let replaced = state.project_mut(frame)?.messages.upsert(token(frame), message);
    log_replaced(frame, replaced);
    Ok(scope.clone())
}

fn function(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &FunctionAttrs,
) -> Result<Scope, CompileError> {
    scope.require_project(frame)?;
    let id = state.instance_id(frame.node, None);
    let suffixes = state.instance_suffixes(frame.node, attrs.local_variables.len());
    let local_variables = attrs
        .local_variables
        .iter()
        .zip(suffixes)
        .map(|(local, suffix)| LocalVariable {
            id: format!("{id}_{suffix}"),
            name: local.name.clone(),
            value: local.value.clone(),
        })
        .collect();
    let function = Function {
        id,
        content: attrs.content.clone(),
        function_type: attrs.function_type,
        use_local_variables: attrs.use_local_variables,
        local_variables,
    };
    let replaced = state.project_mut(frame)?.functions.upsert(token(frame), function);
    log_replaced(frame, replaced);
    Ok(scope.clone())
}

fn table(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &TableAttrs,
) -> Result<Scope, CompileError> {
    scope.require_project(frame)?;
    let replaced = state
        .project_mut(frame)?
        .tables
        .upsert(token(frame), attrs.data.clone());
    log_replaced(frame, replaced);
    Ok(scope.clone())
}

// ============================================================================
// SCRIPTS
// ============================================================================

fn statement(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
) -> Result<Scope, CompileError> {
    let parent = scope.require_statements(frame)?;
    let block = state.drafts.new_sequence();
    let replaced = state.drafts.statements_mut(parent).upsert(token(frame), block);
    log_replaced(frame, replaced);
    Ok(Scope {
        params: Some(block),
        ..scope.clone()
    })
}

fn script(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &ScriptAttrs,
) -> Result<Scope, CompileError> {
    let parent = scope.require_params(frame)?;
    let id = state.instance_id(frame.node, None);
    let params = state.drafts.new_sequence();
    let statements = state.drafts.new_statements();
    let key = state.drafts.add_script(ScriptDraft {
        id,
        attrs: attrs.clone(),
        params,
        statements,
    });
    let replaced = state
        .drafts
        .sequence_mut(parent)
        .upsert(token(frame), Entry::Script(key));
    log_replaced(frame, replaced);
    Ok(Scope {
        statements: Some(statements),
        params: Some(params),
        ..scope.clone()
    })
}

fn param(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    attrs: &ParamAttrs,
) -> Result<Scope, CompileError> {
    let target = scope.require_params(frame)?;
    let children = frame.tree.children(frame.node);

    let values = children.len() + usize::from(attrs.value.is_some());
    if values > 1 {
        return Err(frame
            .too_many_values(frame.kind, values)
            .with_help("give a Param either a value or a single child node"));
    }

    match children.first().and_then(|child| frame.tree.node(*child)) {
        Some(child) => {
            // The child contributes the value itself, into the same list.
            let kind = child.kind();
            if kind != NodeKind::Script && child.as_reference().is_none() {
                return Err(frame.misplaced_value(kind));
            }
        }
        None => {
            let value = attrs.value.clone().unwrap_or(Value::Null);
            let replaced = state
                .drafts
                .sequence_mut(target)
                .upsert(token(frame), Entry::Literal(value));
            log_replaced(frame, replaced);
        }
    }
    Ok(scope.clone())
}

fn reference(
    state: &mut BuildState,
    frame: &Frame<'_>,
    scope: &Scope,
    kind: RefKind,
    name: &str,
) -> Result<Scope, CompileError> {
    let target = scope.require_params(frame)?;
    let owner = match kind {
        RefKind::Picture | RefKind::Sound => Some(scope.require_object(frame)?),
        RefKind::Variable | RefKind::Object => {
            scope.require_project(frame)?;
            None
        }
    };
    let lazy = LazyRef {
        kind,
        name: name.to_string(),
        owner,
        node: frame.node,
        path: frame.path(),
    };
    let replaced = state
        .drafts
        .sequence_mut(target)
        .upsert(token(frame), Entry::Reference(lazy));
    log_replaced(frame, replaced);
    Ok(scope.clone())
}
