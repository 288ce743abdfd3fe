use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::host::{AccessorDescriptor, AccessorFault, ObjectModel, RawValue, TypeRef};

/// Handle to a metaclass of a [`MemoryModel`].
///
/// Handles created with [`MemoryModel::alias`] denote the same metaclass
/// but compare unequal, like distinct reflective handles of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetaclassId {
    def: usize,
    alias: u32,
}

/// Handle to an object of a [`MemoryModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

struct AccessorDef {
    name: String,
    parameter_types: Vec<TypeRef<MetaclassId>>,
    return_type: TypeRef<MetaclassId>,
    returns_collection: bool,
}

struct MetaclassDef {
    name: String,
    qualified_name: Option<String>,
    supers: Vec<MetaclassId>,
    subs: Vec<MetaclassId>,
    accessors: Vec<AccessorDef>,
    aliases: u32,
}

enum Stored {
    Value(RawValue<ObjectId>),
    Fault(String),
}

struct ObjectData {
    metaclass: MetaclassId,
    identifier: Uuid,
    values: HashMap<String, Stored>,
}

/// A metamodel and its instances, held in memory.
///
/// Instance names come from the `getName` accessor. Collection accessors
/// without a stored value answer an empty sequence, other accessors answer
/// null.
#[derive(Default)]
pub struct MemoryModel {
    metaclasses: Vec<MetaclassDef>,
    by_name: HashMap<String, MetaclassId>,
    objects: Vec<ObjectData>,
}

const NAME_ACCESSOR: &str = "getName";

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a metaclass with its direct super-metaclasses, primary first.
    ///
    /// Defining an existing name returns the existing metaclass unchanged.
    pub fn metaclass(&mut self, name: &str, supers: &[MetaclassId]) -> MetaclassId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = MetaclassId {
            def: self.metaclasses.len(),
            alias: 0,
        };
        self.metaclasses.push(MetaclassDef {
            name: name.to_string(),
            qualified_name: None,
            supers: supers.to_vec(),
            subs: Vec::new(),
            accessors: Vec::new(),
            aliases: 0,
        });
        for parent in supers {
            self.metaclasses[parent.def].subs.push(id);
        }
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// A new, distinct handle for an existing metaclass.
    pub fn alias(&mut self, metaclass: MetaclassId) -> MetaclassId {
        let def = &mut self.metaclasses[metaclass.def];
        def.aliases += 1;
        MetaclassId {
            def: metaclass.def,
            alias: def.aliases,
        }
    }

    pub fn set_qualified_name(&mut self, metaclass: MetaclassId, qualified_name: &str) {
        self.metaclasses[metaclass.def].qualified_name = Some(qualified_name.to_string());
    }

    /// Declare an accessor operation.
    pub fn accessor(
        &mut self,
        metaclass: MetaclassId,
        name: &str,
        return_type: TypeRef<MetaclassId>,
        returns_collection: bool,
    ) {
        self.operation_def(metaclass, name, Vec::new(), return_type, returns_collection);
    }

    /// Declare a single-valued accessor.
    pub fn attribute(&mut self, metaclass: MetaclassId, name: &str, ty: TypeRef<MetaclassId>) {
        self.accessor(metaclass, name, ty, false);
    }

    /// Declare a single-valued reference to instances of `target`.
    pub fn reference(&mut self, metaclass: MetaclassId, name: &str, target: MetaclassId) {
        self.accessor(metaclass, name, TypeRef::Metaclass(target), false);
    }

    /// Declare a list-valued reference to instances of `target`.
    pub fn references(&mut self, metaclass: MetaclassId, name: &str, target: MetaclassId) {
        self.accessor(
            metaclass,
            name,
            TypeRef::collection_of("List", TypeRef::Metaclass(target)),
            true,
        );
    }

    /// Declare an operation taking parameters.
    pub fn operation(
        &mut self,
        metaclass: MetaclassId,
        name: &str,
        parameters: &[TypeRef<MetaclassId>],
        return_type: TypeRef<MetaclassId>,
    ) {
        self.operation_def(metaclass, name, parameters.to_vec(), return_type, false);
    }

    fn operation_def(
        &mut self,
        metaclass: MetaclassId,
        name: &str,
        parameter_types: Vec<TypeRef<MetaclassId>>,
        return_type: TypeRef<MetaclassId>,
        returns_collection: bool,
    ) {
        self.metaclasses[metaclass.def].accessors.push(AccessorDef {
            name: name.to_string(),
            parameter_types,
            return_type,
            returns_collection,
        });
    }

    /// Create an instance of `metaclass` with a fresh random identifier.
    pub fn create(&mut self, metaclass: MetaclassId) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(ObjectData {
            metaclass,
            identifier: Uuid::new_v4(),
            values: HashMap::new(),
        });
        id
    }

    /// Store the value an accessor answers for an object.
    pub fn set(&mut self, object: ObjectId, accessor: &str, value: impl Into<RawValue<ObjectId>>) {
        self.store(object, accessor, Stored::Value(value.into()));
    }

    pub fn link(&mut self, object: ObjectId, accessor: &str, target: ObjectId) {
        self.set(object, accessor, RawValue::Element(target));
    }

    pub fn link_all(
        &mut self,
        object: ObjectId,
        accessor: &str,
        targets: impl IntoIterator<Item = ObjectId>,
    ) {
        self.set(object, accessor, RawValue::elements(targets));
    }

    /// Make an accessor fail for an object.
    pub fn fail(&mut self, object: ObjectId, accessor: &str, reason: &str) {
        self.store(object, accessor, Stored::Fault(reason.to_string()));
    }

    fn store(&mut self, object: ObjectId, accessor: &str, stored: Stored) {
        self.objects[object.0]
            .values
            .insert(accessor.to_string(), stored);
    }

    pub fn identifier(&self, object: ObjectId) -> String {
        self.objects[object.0].identifier.to_string()
    }

    /// The metaclass and its ancestors, each once, breadth first.
    fn lineage(&self, metaclass: MetaclassId) -> Vec<MetaclassId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([canonical(metaclass)]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.def) {
                continue;
            }
            order.push(current);
            queue.extend(self.metaclasses[current.def].supers.iter().copied().map(canonical));
        }
        order
    }

    fn find_accessor(&self, metaclass: MetaclassId, name: &str) -> Option<&AccessorDef> {
        self.lineage(metaclass).into_iter().find_map(|m| {
            self.metaclasses[m.def]
                .accessors
                .iter()
                .find(|a| a.name == name)
        })
    }

    fn descriptors(
        &self,
        metaclass: MetaclassId,
    ) -> impl Iterator<Item = AccessorDescriptor<MetaclassId>> + '_ {
        self.metaclasses[metaclass.def]
            .accessors
            .iter()
            .map(move |a| AccessorDescriptor {
                name: a.name.clone(),
                declaring_type: metaclass,
                parameter_types: a.parameter_types.clone(),
                return_type: a.return_type.clone(),
                returns_collection: a.returns_collection,
            })
    }
}

fn canonical(metaclass: MetaclassId) -> MetaclassId {
    MetaclassId {
        def: metaclass.def,
        alias: 0,
    }
}

impl ObjectModel for MemoryModel {
    type Metaclass = MetaclassId;
    type Element = ObjectId;

    fn resolve_metaclass(&self, name: &str) -> Option<MetaclassId> {
        self.by_name.get(name).copied()
    }

    fn metaclass_name(&self, metaclass: &MetaclassId) -> Option<String> {
        self.metaclasses.get(metaclass.def).map(|m| m.name.clone())
    }

    fn metaclass_qualified_name(&self, metaclass: &MetaclassId) -> Option<String> {
        self.metaclasses
            .get(metaclass.def)
            .and_then(|m| m.qualified_name.clone())
    }

    fn sub_metaclasses(&self, metaclass: &MetaclassId) -> Vec<MetaclassId> {
        self.metaclasses[metaclass.def].subs.clone()
    }

    fn super_metaclasses(&self, metaclass: &MetaclassId) -> Vec<MetaclassId> {
        self.metaclasses[metaclass.def].supers.clone()
    }

    fn declared_accessors(
        &self,
        metaclass: &MetaclassId,
        inherited: bool,
    ) -> Vec<AccessorDescriptor<MetaclassId>> {
        if inherited {
            self.lineage(*metaclass)
                .into_iter()
                .flat_map(|m| self.descriptors(m))
                .collect()
        } else {
            self.descriptors(canonical(*metaclass)).collect()
        }
    }

    fn invoke_accessor(
        &self,
        element: &ObjectId,
        accessor: &str,
    ) -> Result<RawValue<ObjectId>, AccessorFault> {
        let object = self
            .objects
            .get(element.0)
            .ok_or_else(|| AccessorFault::new(accessor, "unknown object"))?;
        let def = self
            .find_accessor(object.metaclass, accessor)
            .ok_or_else(|| AccessorFault::new(accessor, "no such accessor"))?;
        match object.values.get(accessor) {
            Some(Stored::Value(value)) => Ok(value.clone()),
            Some(Stored::Fault(reason)) => Err(AccessorFault::new(accessor, reason.clone())),
            None if def.returns_collection => Ok(RawValue::Sequence(Vec::new())),
            None => Ok(RawValue::Null),
        }
    }

    fn instance_metaclass(&self, element: &ObjectId) -> MetaclassId {
        self.objects[element.0].metaclass
    }

    fn is_instance_of(&self, element: &ObjectId, metaclass: &MetaclassId) -> bool {
        self.lineage(self.objects[element.0].metaclass)
            .iter()
            .any(|m| m.def == metaclass.def)
    }

    fn instance_declared_name(&self, element: &ObjectId) -> Option<String> {
        match self.objects[element.0].values.get(NAME_ACCESSOR) {
            Some(Stored::Value(RawValue::Str(name))) => Some(name.clone()),
            _ => None,
        }
    }

    fn instance_stable_identifier(&self, element: &ObjectId) -> String {
        self.identifier(*element)
    }

    fn instances_of(&self, metaclass: &MetaclassId) -> Vec<ObjectId> {
        (0..self.objects.len())
            .map(ObjectId)
            .filter(|o| self.is_instance_of(o, metaclass))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumLiteral;

    fn model() -> (MemoryModel, MetaclassId, MetaclassId) {
        let mut model = MemoryModel::new();
        let element = model.metaclass("ModelElement", &[]);
        model.attribute(element, "getName", TypeRef::String);
        let classifier = model.metaclass("Classifier", &[element]);
        model.attribute(
            classifier,
            "getVisibility",
            TypeRef::enumeration("uml.Visibility"),
        );
        model.references(classifier, "getParts", element);
        (model, element, classifier)
    }

    #[test]
    fn inherited_accessors_follow_own_ones() {
        let (model, _, classifier) = model();
        let names: Vec<_> = model
            .declared_accessors(&classifier, true)
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["getVisibility", "getParts", "getName"]);

        let own: Vec<_> = model
            .declared_accessors(&classifier, false)
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(own, ["getVisibility", "getParts"]);
    }

    #[test]
    fn invocation_defaults_and_faults() {
        let (mut model, _, classifier) = model();
        let c = model.create(classifier);

        assert_eq!(model.invoke_accessor(&c, "getName"), Ok(RawValue::Null));
        assert_eq!(
            model.invoke_accessor(&c, "getParts"),
            Ok(RawValue::Sequence(vec![]))
        );
        assert!(model.invoke_accessor(&c, "getMissing").is_err());

        let public = EnumLiteral::new("Visibility", "Public");
        model.set(c, "getVisibility", public.clone());
        assert_eq!(
            model.invoke_accessor(&c, "getVisibility"),
            Ok(RawValue::Literal(public))
        );

        model.fail(c, "getName", "detached");
        let fault = model.invoke_accessor(&c, "getName").unwrap_err();
        assert_eq!(fault.accessor, "getName");
        assert_eq!(fault.reason, "detached");
    }

    #[test]
    fn instance_queries() {
        let (mut model, element, classifier) = model();
        let c = model.create(classifier);
        let e = model.create(element);
        model.set(c, "getName", "Order");

        assert!(model.is_instance_of(&c, &element));
        assert!(!model.is_instance_of(&e, &classifier));
        assert_eq!(model.instance_declared_name(&c).as_deref(), Some("Order"));
        assert_eq!(model.instance_declared_name(&e), None);
        assert_eq!(model.instances_of(&element), vec![c, e]);
        assert_ne!(model.identifier(c), model.identifier(e));
        assert_eq!(model.sub_metaclasses(&element), vec![classifier]);
    }

    #[test]
    fn aliases_share_the_definition() {
        let (mut model, _, classifier) = model();
        let alias = model.alias(classifier);
        assert_ne!(alias, classifier);
        assert_eq!(model.metaclass_name(&alias).as_deref(), Some("Classifier"));
        assert_eq!(model.declared_accessors(&alias, false).len(), 2);
    }
}
