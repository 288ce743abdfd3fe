//! Logical parents and dotted paths.
//!
//! A [`ParentTable`] says, per metaclass, which accessor yields an
//! instance's logical parent. The first entry whose metaclass the instance
//! belongs to decides; instances matching no entry are roots.

use std::collections::HashSet;

use crate::host::{ObjectModel, RawValue};
use crate::{Error, Result};

use super::naming::declared_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentEntry {
    pub metaclass: String,
    pub accessor: String,
}

/// Ordered metaclass-name to parent-accessor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentTable {
    entries: Vec<ParentEntry>,
}

impl Default for ParentTable {
    fn default() -> Self {
        Self::empty()
            .with_entry("ModelTree", "getOwner")
            .with_entry("Behavior", "getOwner")
            .with_entry("BpmnRootElement", "getOwner")
            .with_entry("Feature", "getOwner")
            .with_entry("AbstractDiagram", "getOrigin")
            .with_entry("BpmnFlowElement", "getContainer")
    }
}

impl ParentTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry; earlier entries take precedence.
    pub fn with_entry(mut self, metaclass: impl Into<String>, accessor: impl Into<String>) -> Self {
        self.entries.push(ParentEntry {
            metaclass: metaclass.into(),
            accessor: accessor.into(),
        });
        self
    }

    pub fn entries(&self) -> &[ParentEntry] {
        &self.entries
    }
}

/// Parent and path resolution over one host.
pub struct Hierarchy<'a, H: ObjectModel> {
    host: &'a H,
    table: &'a ParentTable,
    max_depth: usize,
    separator: &'a str,
}

impl<'a, H: ObjectModel> Hierarchy<'a, H> {
    pub fn new(host: &'a H, table: &'a ParentTable, max_depth: usize, separator: &'a str) -> Self {
        Self {
            host,
            table,
            max_depth,
            separator,
        }
    }

    /// The logical parent of `element`, or `None` for a root.
    ///
    /// Table entries naming metaclasses the host does not know are skipped.
    pub fn parent(&self, element: &H::Element) -> Result<Option<H::Element>> {
        for entry in self.table.entries() {
            let Some(metaclass) = self.host.resolve_metaclass(&entry.metaclass) else {
                tracing::trace!(
                    metaclass = %entry.metaclass,
                    "parent table entry not in metamodel"
                );
                continue;
            };
            if !self.host.is_instance_of(element, &metaclass) {
                continue;
            }
            return match self.host.invoke_accessor(element, &entry.accessor)? {
                RawValue::Element(parent) => Ok(Some(parent)),
                RawValue::Null => Ok(None),
                other => {
                    tracing::warn!(
                        accessor = %entry.accessor,
                        value = %other.describe(),
                        "parent accessor did not return an element"
                    );
                    Ok(None)
                }
            };
        }
        Ok(None)
    }

    /// Ancestors of `element`, nearest first.
    ///
    /// Fails with [`Error::AncestorCycle`] if an ancestor repeats and with
    /// [`Error::AncestorDepthExceeded`] past the configured depth.
    pub fn parents(&self, element: &H::Element) -> Result<Vec<H::Element>> {
        let mut visited = HashSet::from([self.host.instance_stable_identifier(element)]);
        let mut ancestors = Vec::new();
        let mut current = self.parent(element)?;
        while let Some(parent) = current {
            let identifier = self.host.instance_stable_identifier(&parent);
            if !visited.insert(identifier.clone()) {
                tracing::warn!(%identifier, "ancestor cycle detected");
                return Err(Error::AncestorCycle { identifier });
            }
            if ancestors.len() == self.max_depth {
                tracing::warn!(limit = self.max_depth, "ancestor chain too deep");
                return Err(Error::AncestorDepthExceeded {
                    limit: self.max_depth,
                });
            }
            current = self.parent(&parent)?;
            ancestors.push(parent);
        }
        Ok(ancestors)
    }

    /// Dotted path from the root down to `element`.
    ///
    /// Falls back to the element's stable identifier when any name on the
    /// way is absent or blank, or when the ancestors cannot be walked.
    pub fn path(&self, element: &H::Element) -> String {
        let ancestors = match self.parents(element) {
            Ok(ancestors) => ancestors,
            Err(e) => {
                tracing::debug!(error = %e, "path falls back to identifier");
                return self.host.instance_stable_identifier(element);
            }
        };
        let names: Option<Vec<String>> = ancestors
            .iter()
            .rev()
            .chain(std::iter::once(element))
            .map(|e| declared_name(self.host, e))
            .collect();
        match names {
            Some(names) => names.join(self.separator),
            None => self.host.instance_stable_identifier(element),
        }
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::host::TypeRef;
    use crate::memory::{MemoryModel, ObjectId};

    fn tree_model() -> (MemoryModel, [ObjectId; 3]) {
        let mut model = MemoryModel::new();
        let tree = model.metaclass("ModelTree", &[]);
        model.attribute(tree, "getName", TypeRef::String);
        model.reference(tree, "getOwner", tree);
        let package = model.metaclass("Package", &[tree]);

        let a = model.create(package);
        let b = model.create(package);
        let c = model.create(package);
        model.set(a, "getName", "A");
        model.set(b, "getName", "B");
        model.set(c, "getName", "C");
        model.link(b, "getOwner", a);
        model.link(c, "getOwner", b);
        (model, [a, b, c])
    }

    #[test]
    fn parents_nearest_first_and_dotted_path() {
        let (model, [a, b, c]) = tree_model();
        let table = ParentTable::default();
        let h = Hierarchy::new(&model, &table, 256, ".");

        assert_eq!(h.parent(&c).unwrap(), Some(b));
        assert_eq!(h.parent(&a).unwrap(), None);
        assert_eq!(h.parents(&c).unwrap(), vec![b, a]);
        assert_eq!(h.path(&c), "A.B.C");
        assert_eq!(h.path(&a), "A");
    }

    #[test]
    fn blank_ancestor_name_falls_back_to_identifier() {
        let (mut model, [_, b, c]) = tree_model();
        model.set(b, "getName", "  ");
        let table = ParentTable::default();
        let h = Hierarchy::new(&model, &table, 256, ".");
        assert_eq!(h.path(&c), model.identifier(c));
    }

    #[test]
    fn cycles_are_reported() {
        let (mut model, [a, _, c]) = tree_model();
        model.link(a, "getOwner", c);
        let table = ParentTable::default();
        let h = Hierarchy::new(&model, &table, 256, ".");
        assert!(matches!(h.parents(&c), Err(Error::AncestorCycle { .. })));
        assert_eq!(h.path(&c), model.identifier(c));
    }

    #[test]
    fn depth_limit() {
        let (model, [_, _, c]) = tree_model();
        let table = ParentTable::default();
        let h = Hierarchy::new(&model, &table, 1, ".");
        assert_eq!(
            h.parents(&c),
            Err(Error::AncestorDepthExceeded { limit: 1 })
        );
    }

    #[test]
    fn unmatched_metaclass_is_a_root() {
        let mut model = MemoryModel::new();
        let note = model.metaclass("Note", &[]);
        model.attribute(note, "getName", TypeRef::String);
        let n = model.create(note);
        model.set(n, "getName", "todo");

        let table = ParentTable::default();
        let h = Hierarchy::new(&model, &table, 256, ".");
        assert_eq!(h.parent(&n).unwrap(), None);
        assert_eq!(h.path(&n), "todo");
    }

    #[test]
    fn first_matching_entry_wins() {
        let (mut model, [a, b, c]) = tree_model();
        let tree = model.resolve_metaclass("ModelTree").unwrap();
        model.reference(tree, "getOrigin", tree);
        model.link(c, "getOrigin", a);

        let table = ParentTable::empty()
            .with_entry("Package", "getOrigin")
            .with_entry("ModelTree", "getOwner");
        let h = Hierarchy::new(&model, &table, 256, ".");
        assert_eq!(h.parent(&c).unwrap(), Some(a));
        assert_eq!(h.parent(&b).unwrap(), None);
    }

    #[test]
    fn faulting_parent_accessor_propagates_and_path_degrades() {
        let (mut model, [_, b, c]) = tree_model();
        model.fail(b, "getOwner", "detached");
        let table = ParentTable::default();
        let h = Hierarchy::new(&model, &table, 256, "/");
        assert!(matches!(h.parents(&c), Err(Error::Accessor(_))));
        assert_eq!(h.path(&c), model.identifier(c));
    }
}
