use std::fmt;
use std::rc::Rc;

use crate::Session;
use crate::host::ObjectModel;
use crate::model::{ElementInfo, ModelValue, Slot};

use super::icon::{ELEMENT_FOREGROUND, IconKey, IconProvider, Rgb, SLOT_FOREGROUND};

/// The node contract a generic tree widget consumes.
pub trait TreeContent {
    type Node;

    fn roots(&self) -> Vec<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn is_leaf(&self, node: &Self::Node) -> bool;

    fn label(&self, node: &Self::Node) -> String;

    fn icon_key(&self, node: &Self::Node) -> IconKey;

    fn is_grayed(&self, node: &Self::Node) -> bool;

    fn foreground(&self, node: &Self::Node) -> Rgb;

    fn icon<P: IconProvider>(&self, node: &Self::Node, provider: &P) -> Option<P::Icon> {
        provider.lookup(self.icon_key(node).as_str())
    }
}

/// A node of a [`ModelTree`]: an element or one of its slots.
pub enum TreeNode<H: ObjectModel> {
    Element(Rc<ElementInfo<H>>),
    Slot(Rc<Slot<H>>),
}

impl<H: ObjectModel> Clone for TreeNode<H> {
    fn clone(&self) -> Self {
        match self {
            TreeNode::Element(e) => TreeNode::Element(e.clone()),
            TreeNode::Slot(s) => TreeNode::Slot(s.clone()),
        }
    }
}

impl<H: ObjectModel> fmt::Debug for TreeNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::Element(e) => f.debug_tuple("Element").field(e).finish(),
            TreeNode::Slot(s) => f.debug_tuple("Slot").field(s).finish(),
        }
    }
}

/// Element/slot tree over a set of root instances.
///
/// Elements expand to their slots; slots holding element references expand
/// to descriptors of the referenced elements. Model references may form
/// cycles, so the tree is only finite up to the depth a host expands it.
pub struct ModelTree<'s, H: ObjectModel> {
    session: &'s Session<H>,
    roots: Vec<Rc<ElementInfo<H>>>,
    include_empty: bool,
}

impl<'s, H: ObjectModel> ModelTree<'s, H> {
    pub(crate) fn new(session: &'s Session<H>, roots: Vec<Rc<ElementInfo<H>>>) -> Self {
        Self {
            session,
            roots,
            include_empty: false,
        }
    }

    /// Show slots whose value is absent or an empty list.
    pub fn with_empty_slots(mut self, include: bool) -> Self {
        self.include_empty = include;
        self
    }

    /// Indented text rendering, expanded down to `max_depth` levels.
    pub fn outline(&self, max_depth: usize) -> String {
        let mut out = String::new();
        for root in self.roots() {
            self.write_node(&mut out, &root, 0, max_depth);
        }
        out
    }

    fn write_node(&self, out: &mut String, node: &TreeNode<H>, depth: usize, max_depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("[{}] {}\n", self.icon_key(node), self.label(node)));
        if depth + 1 >= max_depth || self.is_leaf(node) {
            return;
        }
        for child in self.children(node) {
            self.write_node(out, &child, depth + 1, max_depth);
        }
    }
}

impl<H: ObjectModel> TreeContent for ModelTree<'_, H> {
    type Node = TreeNode<H>;

    fn roots(&self) -> Vec<TreeNode<H>> {
        self.roots.iter().cloned().map(TreeNode::Element).collect()
    }

    fn children(&self, node: &TreeNode<H>) -> Vec<TreeNode<H>> {
        match node {
            TreeNode::Element(info) => info
                .slots(self.include_empty)
                .into_iter()
                .map(TreeNode::Slot)
                .collect(),
            TreeNode::Slot(slot) => slot
                .model_value()
                .elements()
                .iter()
                .map(|e| TreeNode::Element(self.session.element_info(e)))
                .collect(),
        }
    }

    fn is_leaf(&self, node: &TreeNode<H>) -> bool {
        match node {
            TreeNode::Element(_) => false,
            TreeNode::Slot(slot) => slot.model_value().elements().is_empty(),
        }
    }

    fn label(&self, node: &TreeNode<H>) -> String {
        match node {
            TreeNode::Element(info) => info.signature(true),
            TreeNode::Slot(slot) if slot.model_value().is_element_container() => format!(
                "{} = [{}]",
                slot.feature().signature(None, false),
                slot.card()
            ),
            TreeNode::Slot(slot) => slot.text(),
        }
    }

    fn icon_key(&self, node: &TreeNode<H>) -> IconKey {
        match node {
            TreeNode::Element(info) => IconKey::Metaclass(info.metaclass_name().to_string()),
            TreeNode::Slot(slot) => match slot.model_value() {
                ModelValue::Element(_) => IconKey::SingleReference,
                ModelValue::ElementList(_) => IconKey::MultipleReference,
                ModelValue::None if slot.feature().is_association_end() => {
                    if slot.feature().is_multiple() {
                        IconKey::MultipleReference
                    } else {
                        IconKey::SingleReference
                    }
                }
                _ => IconKey::Atomic,
            },
        }
    }

    fn is_grayed(&self, node: &TreeNode<H>) -> bool {
        matches!(node, TreeNode::Slot(_))
    }

    fn foreground(&self, node: &TreeNode<H>) -> Rgb {
        match node {
            TreeNode::Element(_) => ELEMENT_FOREGROUND,
            TreeNode::Slot(_) => SLOT_FOREGROUND,
        }
    }
}
