#![cfg(feature = "memory")]

use std::collections::HashMap;

use metaview::memory::{MemoryModel, ObjectId};
use metaview::tree::{ELEMENT_FOREGROUND, SLOT_FOREGROUND};
use metaview::{IconKey, IconProvider, Session, TreeContent, TreeNode, TypeRef};

fn model() -> (MemoryModel, ObjectId, ObjectId) {
    let mut model = MemoryModel::new();
    let element = model.metaclass("ModelElement", &[]);
    model.attribute(element, "getName", TypeRef::String);
    let tree = model.metaclass("ModelTree", &[element]);
    model.reference(tree, "getOwner", tree);
    let package = model.metaclass("Package", &[tree]);
    model.references(package, "getOwnedElement", tree);
    model.reference(package, "getRepresented", tree);
    let class = model.metaclass("Class", &[tree]);
    model.attribute(class, "isLeaf", TypeRef::primitive("boolean"));

    let root = model.create(package);
    model.set(root, "getName", "Orders");
    let order = model.create(class);
    model.set(order, "getName", "Order");
    model.set(order, "isLeaf", true);
    model.link(order, "getOwner", root);
    let line = model.create(class);
    model.set(line, "getName", "Line");
    model.link(line, "getOwner", root);
    model.link_all(root, "getOwnedElement", [order, line]);
    (model, root, order)
}

fn slot<'a>(nodes: &'a [TreeNode<MemoryModel>], name: &str) -> &'a TreeNode<MemoryModel> {
    nodes
        .iter()
        .find(|n| matches!(n, TreeNode::Slot(s) if s.name() == name))
        .unwrap_or_else(|| panic!("no slot {name}"))
}

#[test]
fn test_element_nodes() {
    let (model, root, _) = model();
    let session = Session::new(model);
    let tree = session.tree([&root]);

    let roots = tree.roots();
    assert_eq!(roots.len(), 1);
    let node = &roots[0];
    assert_eq!(tree.label(node), "Orders : Package > ModelTree > ModelElement");
    assert_eq!(tree.icon_key(node), IconKey::Metaclass("Package".into()));
    assert!(!tree.is_leaf(node));
    assert!(!tree.is_grayed(node));
    assert_eq!(tree.foreground(node), ELEMENT_FOREGROUND);
}

#[test]
fn test_slot_nodes() {
    let (model, root, _) = model();
    let session = Session::new(model);
    let tree = session.tree([&root]);
    let slots = tree.children(&tree.roots()[0]);

    // empty getOwner and getRepresented are hidden
    assert_eq!(slots.len(), 2);

    let owned = slot(&slots, "getOwnedElement");
    assert_eq!(tree.label(owned), "getOwnedElement : ModelTree[*] = [2]");
    assert_eq!(tree.icon_key(owned).as_str(), "assoc-n");
    assert!(tree.is_grayed(owned));
    assert!(!tree.is_leaf(owned));
    assert_eq!(tree.foreground(owned), SLOT_FOREGROUND);

    let name = slot(&slots, "getName");
    assert_eq!(tree.label(name), "getName : string = \"Orders\"");
    assert_eq!(tree.icon_key(name), IconKey::Atomic);
    assert!(tree.is_leaf(name));
}

#[test]
fn test_empty_slots_keep_reference_icons() {
    let (model, root, _) = model();
    let session = Session::new(model);
    let tree = session.tree([&root]).with_empty_slots(true);
    let slots = tree.children(&tree.roots()[0]);
    assert_eq!(slots.len(), 4);

    let owner = slot(&slots, "getOwner");
    assert_eq!(tree.label(owner), "getOwner : ModelTree = [0]");
    assert_eq!(tree.icon_key(owner), IconKey::SingleReference);
    assert!(tree.is_leaf(owner));
}

#[test]
fn test_reference_slots_expand_to_elements() {
    let (model, root, _) = model();
    let session = Session::new(model);
    let tree = session.tree([&root]);
    let slots = tree.children(&tree.roots()[0]);

    let children = tree.children(slot(&slots, "getOwnedElement"));
    let labels: Vec<_> = children.iter().map(|n| tree.label(n)).collect();
    assert_eq!(
        labels,
        [
            "Orders.Order : Class > ModelTree > ModelElement",
            "Orders.Line : Class > ModelTree > ModelElement"
        ]
    );

    let order_slots = tree.children(&children[0]);
    let owner = slot(&order_slots, "getOwner");
    assert_eq!(tree.label(owner), "getOwner : ModelTree = [1]");
    assert_eq!(tree.icon_key(owner), IconKey::SingleReference);
    match &tree.children(owner)[0] {
        TreeNode::Element(info) => assert_eq!(info.name(), "Orders"),
        other => panic!("expected element node, got {other:?}"),
    }
}

#[test]
fn test_outline() {
    let (model, _, order) = model();
    let session = Session::new(model);
    let outline = session.tree([&order]).outline(2);
    assert_eq!(
        outline,
        "[Class] Orders.Order : Class > ModelTree > ModelElement\n\
         \x20 [atomic] isLeaf : boolean = true\n\
         \x20 [assoc-1] getOwner : ModelTree = [1]\n\
         \x20 [atomic] getName : string = \"Order\"\n"
    );
}

struct Icons(HashMap<&'static str, u32>);

impl IconProvider for Icons {
    type Icon = u32;

    fn lookup(&self, key: &str) -> Option<u32> {
        self.0.get(key).copied()
    }
}

#[test]
fn test_icon_provider() {
    let (model, root, _) = model();
    let session = Session::new(model);
    let tree = session.tree([&root]);
    let icons = Icons(HashMap::from([("Package", 1), ("assoc-n", 2)]));

    let node = &tree.roots()[0];
    assert_eq!(tree.icon(node, &icons), Some(1));
    let slots = tree.children(node);
    assert_eq!(tree.icon(slot(&slots, "getOwnedElement"), &icons), Some(2));
    assert_eq!(tree.icon(slot(&slots, "getName"), &icons), None);
}
