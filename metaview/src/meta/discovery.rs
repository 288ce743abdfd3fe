use std::collections::HashSet;
use std::rc::Rc;

use crate::Config;
use crate::host::{AccessorDescriptor, AccessorFault, ObjectModel, RawValue, TypeRef};

use super::feature::{Evaluator, MetaFeature, SyntheticFn};

struct SyntheticFeature<H: ObjectModel> {
    metaclass: String,
    name: String,
    value_type: TypeRef<H::Metaclass>,
    multiple: bool,
    evaluator: Rc<SyntheticFn<H>>,
}

/// Derived features appended to discovery results, keyed by metaclass name.
///
/// Registered at setup time; entries for a metaclass keep their
/// registration order.
pub struct SyntheticFeatures<H: ObjectModel> {
    entries: Vec<SyntheticFeature<H>>,
}

impl<H: ObjectModel> Default for SyntheticFeatures<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: ObjectModel> SyntheticFeatures<H> {
    pub fn register<F>(
        &mut self,
        metaclass: impl Into<String>,
        name: impl Into<String>,
        value_type: TypeRef<H::Metaclass>,
        multiple: bool,
        evaluator: F,
    ) where
        F: Fn(&H, &H::Element) -> Result<RawValue<H::Element>, AccessorFault> + 'static,
    {
        self.entries.push(SyntheticFeature {
            metaclass: metaclass.into(),
            name: name.into(),
            value_type,
            multiple,
            evaluator: Rc::new(evaluator),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn for_metaclass<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SyntheticFeature<H>> {
        self.entries.iter().filter(move |e| e.metaclass == name)
    }
}

/// Discover the features of a metaclass.
///
/// Accessor-backed features come first, in the host's declaration order,
/// followed by the synthetic features registered for the metaclass name.
/// Only nullary accessors whose names pass the configured pattern and
/// denylist are kept; an accessor name reported twice (an override seen
/// through inheritance) yields one feature.
pub fn discover_features<H: ObjectModel>(
    host: &H,
    config: &Config,
    synthetic: &SyntheticFeatures<H>,
    metaclass: &H::Metaclass,
    include_inherited: bool,
) -> Vec<Rc<MetaFeature<H>>> {
    let Some(metaclass_name) = host.metaclass_name(metaclass) else {
        tracing::warn!(?metaclass, "not a metaclass of this metamodel, no features discovered");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut features: Vec<Rc<MetaFeature<H>>> = host
        .declared_accessors(metaclass, include_inherited)
        .into_iter()
        .filter(|acc| is_feature_accessor(config, acc))
        .filter(|acc| seen.insert(acc.name.clone()))
        .map(|acc| Rc::new(accessor_feature(host, acc)))
        .collect();

    for entry in synthetic.for_metaclass(&metaclass_name) {
        features.push(Rc::new(MetaFeature::new(
            host,
            metaclass.clone(),
            entry.name.clone(),
            entry.value_type.clone(),
            entry.multiple,
            Evaluator::Synthetic(entry.evaluator.clone()),
        )));
    }

    tracing::debug!(
        metaclass = %metaclass_name,
        inherited = include_inherited,
        count = features.len(),
        "features discovered"
    );
    features
}

fn is_feature_accessor<M>(config: &Config, acc: &AccessorDescriptor<M>) -> bool {
    acc.is_nullary() && config.is_accessor_name(&acc.name)
}

fn accessor_feature<H: ObjectModel>(
    host: &H,
    acc: AccessorDescriptor<H::Metaclass>,
) -> MetaFeature<H> {
    let value_type = acc.value_type().clone();
    MetaFeature::new(
        host,
        acc.declaring_type,
        acc.name,
        value_type,
        acc.returns_collection,
        Evaluator::Accessor,
    )
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::{MemoryModel, MetaclassId};

    fn use_case_model() -> (MemoryModel, MetaclassId, MetaclassId) {
        let mut model = MemoryModel::new();
        let element = model.metaclass("ModelElement", &[]);
        model.attribute(element, "getName", TypeRef::String);
        model.attribute(element, "getClass", TypeRef::named("java.lang.Class"));
        model.attribute(element, "isValid", TypeRef::primitive("boolean"));

        let actor = model.metaclass("Actor", &[element]);
        let use_case = model.metaclass("UseCase", &[element]);
        model.attribute(use_case, "isAbstract", TypeRef::primitive("boolean"));
        model.references(use_case, "getActors", actor);
        model.operation(use_case, "getExtension", &[TypeRef::String], TypeRef::String);
        model.attribute(use_case, "computeSize", TypeRef::primitive("int"));
        (model, use_case, actor)
    }

    fn names(features: &[Rc<MetaFeature<MemoryModel>>]) -> Vec<&str> {
        features.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn keeps_nullary_getters_outside_the_denylist() {
        let (model, use_case, _) = use_case_model();
        let features = discover_features(
            &model,
            &Config::default(),
            &SyntheticFeatures::default(),
            &use_case,
            true,
        );
        assert_eq!(names(&features), ["isAbstract", "getActors", "getName"]);
    }

    #[test]
    fn own_features_only() {
        let (model, use_case, _) = use_case_model();
        let features = discover_features(
            &model,
            &Config::default(),
            &SyntheticFeatures::default(),
            &use_case,
            false,
        );
        assert_eq!(names(&features), ["isAbstract", "getActors"]);
    }

    #[test]
    fn collection_accessors_are_multiple_with_unwrapped_type() {
        let (model, use_case, actor) = use_case_model();
        let features = discover_features(
            &model,
            &Config::default(),
            &SyntheticFeatures::default(),
            &use_case,
            true,
        );
        let actors = features.iter().find(|f| f.name() == "getActors").unwrap();
        assert!(actors.is_multiple());
        assert!(actors.is_association_end());
        assert_eq!(actors.value_type(), &TypeRef::Metaclass(actor));
        assert_eq!(actors.type_name(), "Actor");
        assert_eq!(actors.owner_name(), "UseCase");

        let name = features.iter().find(|f| f.name() == "getName").unwrap();
        assert_eq!(name.owner_name(), "ModelElement");
    }

    #[test]
    fn synthetic_features_follow_in_registration_order() {
        let (model, use_case, _) = use_case_model();
        let mut synthetic = SyntheticFeatures::<MemoryModel>::default();
        synthetic.register("UseCase", "SIZE", TypeRef::primitive("int"), false, |_, _| {
            Ok(RawValue::from(3i64))
        });
        synthetic.register("Actor", "ROLE", TypeRef::String, false, |_, _| Ok("x".into()));
        synthetic.register("UseCase", "LABEL", TypeRef::String, false, |_, _| {
            Ok("uc".into())
        });

        let features = discover_features(&model, &Config::default(), &synthetic, &use_case, true);
        assert_eq!(
            names(&features),
            ["isAbstract", "getActors", "getName", "SIZE", "LABEL"]
        );
        assert!(features[3].is_synthetic());
        assert_eq!(features[3].owner_name(), "UseCase");
    }

    #[test]
    fn discovery_is_idempotent() {
        let (model, use_case, _) = use_case_model();
        let config = Config::default();
        let synthetic = SyntheticFeatures::default();
        let first = discover_features(&model, &config, &synthetic, &use_case, true);
        let second = discover_features(&model, &config, &synthetic, &use_case, true);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.is_multiple(), b.is_multiple());
        }
    }

    #[test]
    fn custom_pattern_and_denylist() {
        let (model, use_case, _) = use_case_model();
        let config = Config::default()
            .with_accessor_pattern("^(get|is|compute)")
            .unwrap()
            .with_excluded_accessor("isAbstract");
        let features =
            discover_features(&model, &config, &SyntheticFeatures::default(), &use_case, false);
        assert_eq!(names(&features), ["getActors", "computeSize"]);
    }
}
