//! Incremental evaluation: node updates, re-evaluation and instance identity.

use entrydoc::tree::{ObjectAttrs, PictureAttrs};
use entrydoc::{CompileOptions, ErrorKind, Node, NodeId, NodeTree, Session};
use serde_json::json;

struct Fixture {
    tree: NodeTree,
    s1: NodeId,
    bot: NodeId,
    script: NodeId,
}

fn fixture() -> Fixture {
    let mut tree = NodeTree::new();
    let project = tree.add_root(Node::project("live"));
    let s1 = tree.push(project, Node::scene("s1"));
    tree.push(project, Node::scene("s2"));
    let bot = tree.push(s1, Node::sprite("bot"));
    tree.push(s1, Node::sprite("cat"));
    let block = tree.push(bot, Node::statement());
    let script = tree.push(block, Node::script("move_direction"));
    tree.push(script, Node::param(10));
    Fixture {
        tree,
        s1,
        bot,
        script,
    }
}

fn session(tree: NodeTree) -> Session {
    let mut session = Session::with_options(tree, &CompileOptions::seeded(5));
    session.evaluate().unwrap();
    session
}

#[test]
fn test_reevaluation_moves_entry_to_tail() {
    let f = fixture();
    let mut session = session(f.tree);
    let before = session.document().unwrap();
    let scenes: Vec<_> = before.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(scenes, ["s1", "s2"]);

    session.reevaluate(f.s1).unwrap();
    let after = session.document().unwrap();
    let scenes: Vec<_> = after.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(scenes, ["s2", "s1"]);
    assert_eq!(after.scene("s1").unwrap().id, before.scene("s1").unwrap().id);
}

#[test]
fn test_reevaluation_is_idempotent() {
    let f = fixture();
    let mut session = session(f.tree);
    session.reevaluate(f.bot).unwrap();
    let once = session.document().unwrap();
    session.reevaluate(f.bot).unwrap();
    let twice = session.document().unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.objects.len(), 2);
    let names: Vec<_> = twice.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["cat", "bot"]);
}

#[test]
fn test_update_keeps_identity() {
    let f = fixture();
    let mut session = session(f.tree);
    let before = session.document().unwrap();
    let id = before.object("bot").unwrap().id.clone();

    let mut renamed = ObjectAttrs::sprite("robot");
    renamed.x = 40.0;
    let previous = session.update(f.bot, Node::Object(renamed)).unwrap();
    assert_eq!(previous, Node::sprite("bot"));
    session.reevaluate(f.bot).unwrap();

    let after = session.document().unwrap();
    assert!(after.object("bot").is_none());
    let robot = after.object("robot").unwrap();
    assert_eq!(robot.id, id);
    assert_eq!(robot.entity.x, 40.0);
    assert_eq!(after.objects.len(), 2);
}

#[test]
fn test_script_reevaluation_keeps_block_count() {
    let f = fixture();
    let mut session = session(f.tree);
    session.update(f.script, Node::script("move_x")).unwrap();
    session.reevaluate(f.script).unwrap();

    let document = session.finish().unwrap();
    let blocks = document.object("bot").unwrap().statements().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].len(), 1);
    let script = blocks[0][0].as_block().unwrap();
    assert_eq!(script.opcode, "move_x");
    assert_eq!(script.params.len(), 1);
}

#[test]
fn test_unevaluated_node_cannot_be_reevaluated() {
    let f = fixture();
    let mut tree = f.tree;
    let extra = tree.push(f.bot, Node::statement());
    let mut session = Session::with_options(tree, &CompileOptions::seeded(5));

    let err = session.reevaluate(extra).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownInstance { node: extra });
}

#[test]
fn test_document_before_evaluation_fails() {
    let f = fixture();
    let session = Session::new(f.tree);
    let err = session.document().unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRoot);
}

#[test]
fn test_reevaluated_variable_keeps_owner() {
    let f = fixture();
    let mut tree = f.tree;
    let local = tree.push(f.bot, Node::variable("hp", 3));
    let mut session = session(tree);
    let owner = session.document().unwrap().object("bot").unwrap().id.clone();

    session.update(local, Node::variable("hp", 10)).unwrap();
    session.reevaluate(local).unwrap();

    let document = session.document().unwrap();
    assert_eq!(document.variables.len(), 1);
    let hp = document.variable("hp").unwrap();
    assert_eq!(hp.value, json!(10));
    assert_eq!(hp.object.as_deref(), Some(owner.as_str()));
}

#[test]
fn test_stale_picture_selection_is_rejected() {
    let f = fixture();
    let mut tree = f.tree;
    let picture = tree.push(
        f.bot,
        Node::Picture(PictureAttrs {
            id: Some("pic-a".into()),
            name: "walk".into(),
            fileurl: "/media/walk.png".into(),
            selected: true,
            ..PictureAttrs::default()
        }),
    );
    let mut session = session(tree);
    let bot = session.document().unwrap();
    assert_eq!(
        bot.object("bot").unwrap().selected_picture_id.as_deref(),
        Some("pic-a")
    );

    session
        .update(
            picture,
            Node::Picture(PictureAttrs {
                id: Some("pic-b".into()),
                name: "walk".into(),
                fileurl: "/media/walk.png".into(),
                ..PictureAttrs::default()
            }),
        )
        .unwrap();
    session.reevaluate(picture).unwrap();

    let err = session.document().unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::InvalidSelection {
            object: "bot".into(),
            picture: "pic-a".into(),
        }
    );
}
