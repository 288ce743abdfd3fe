use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::host::{AccessorFault, ObjectModel, RawValue, TypeRef};
use crate::meta::{
    MetaFeature, MetaclassInfo, MetaclassView, SyntheticFeatures, discover_features, type_name,
};
use crate::model::{ElementInfo, Hierarchy, ParentTable, name_or_id};
use crate::tree::ModelTree;
use crate::{Config, Error, Result};

const HTML_FEATURE_ITEM: &str = "<li>${mclass}.<b>${fname}</b> : <em>${ftype}</em>${fmult}</li>";
const HTML_METACLASS_LAYOUT: &str = "<h3>$mcsig</h3><ul>$mcbody</ul>";

/// A browsing session over one host object model.
///
/// Owns every cache the engine keeps: metaclass descriptors keyed by
/// metaclass name (built once, never invalidated while the session lives)
/// and, when [`Config::cache_elements`] is set, element descriptors keyed by
/// stable identifier. Independent sessions share nothing.
///
/// A session is single-threaded: caches sit in `RefCell`s and handles are
/// shared with `Rc`, so it is neither `Send` nor `Sync`.
///
/// # Example
///
/// ```rust
/// use metaview::memory::MemoryModel;
/// use metaview::{Session, TypeRef};
///
/// let mut model = MemoryModel::new();
/// let element = model.metaclass("ModelElement", &[]);
/// model.attribute(element, "getName", TypeRef::String);
/// let actor = model.metaclass("Actor", &[element]);
/// let use_case = model.metaclass("UseCase", &[element]);
/// model.references(use_case, "getActors", actor);
///
/// let login = model.create(use_case);
/// model.set(login, "getName", "Login");
/// let clerk = model.create(actor);
/// model.set(clerk, "getName", "Clerk");
/// model.link_all(login, "getActors", [clerk]);
///
/// let session = Session::new(model);
/// let info = session.element_info(&login);
/// assert_eq!(info.signature(true), "Login : UseCase > ModelElement");
/// for slot in info.slots(false) {
///     println!("  {}", slot.text());
/// }
///
/// let actors = info.slot("getActors")?.card();
/// assert_eq!(actors, 1);
/// # Ok::<(), metaview::Error>(())
/// ```
pub struct Session<H: ObjectModel> {
    host: Rc<H>,
    config: Config,
    synthetic: SyntheticFeatures<H>,
    parents: ParentTable,
    metaclasses: RefCell<HashMap<String, Rc<MetaclassInfo<H>>>>,
    elements: RefCell<HashMap<String, Rc<ElementInfo<H>>>>,
}

impl<H: ObjectModel> Session<H> {
    /// Create a session with the default configuration and parent table.
    pub fn new(host: H) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config(host: H, config: Config) -> Self {
        Self::shared(Rc::new(host), config)
    }

    /// Create a session over a host that is also used elsewhere.
    pub fn shared(host: Rc<H>, config: Config) -> Self {
        Self {
            host,
            config,
            synthetic: SyntheticFeatures::default(),
            parents: ParentTable::default(),
            metaclasses: RefCell::new(HashMap::new()),
            elements: RefCell::new(HashMap::new()),
        }
    }

    /// Replace the table that defines logical parents.
    pub fn with_parent_table(mut self, table: ParentTable) -> Self {
        self.parents = table;
        self.elements.get_mut().clear();
        self
    }

    /// Add a derived feature to every instance of the named metaclass.
    ///
    /// The feature is appended after the accessor-backed ones, in
    /// registration order. Metaclass descriptors are never rebuilt, so
    /// registration fails with [`Error::LateSyntheticFeature`] once any
    /// descriptor has been built.
    pub fn register_synthetic_feature<F>(
        &mut self,
        metaclass: impl Into<String>,
        name: impl Into<String>,
        value_type: TypeRef<H::Metaclass>,
        multiple: bool,
        evaluator: F,
    ) -> Result
    where
        F: Fn(&H, &H::Element) -> std::result::Result<RawValue<H::Element>, AccessorFault>
            + 'static,
    {
        let (metaclass, name) = (metaclass.into(), name.into());
        if self.cached_metaclasses() > 0 {
            tracing::warn!(%metaclass, feature = %name, "synthetic feature registered too late");
            return Err(Error::LateSyntheticFeature {
                metaclass,
                feature: name,
            });
        }
        self.synthetic
            .register(metaclass, name, value_type, multiple, evaluator);
        Ok(())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parent_table(&self) -> &ParentTable {
        &self.parents
    }

    /// Discover the features of a metaclass without touching the cache.
    pub fn discover_features(
        &self,
        metaclass: &H::Metaclass,
        include_inherited: bool,
    ) -> Vec<Rc<MetaFeature<H>>> {
        discover_features(
            self.host.as_ref(),
            &self.config,
            &self.synthetic,
            metaclass,
            include_inherited,
        )
    }

    /// Like [`discover_features`](Self::discover_features), by metaclass name.
    ///
    /// An unknown name yields no features.
    pub fn discover_features_by_name(
        &self,
        name: &str,
        include_inherited: bool,
    ) -> Vec<Rc<MetaFeature<H>>> {
        match self.host.resolve_metaclass(name) {
            Some(metaclass) => self.discover_features(&metaclass, include_inherited),
            None => {
                tracing::warn!(metaclass = %name, "unresolved metaclass, no features discovered");
                Vec::new()
            }
        }
    }

    /// The cached descriptor of a metaclass, built on first request.
    ///
    /// The cache is keyed by metaclass name, so distinct handles the host
    /// returns for the same logical metaclass share one descriptor. Handles
    /// the host cannot name get a fresh, uncached descriptor.
    pub fn metaclass_info(&self, metaclass: &H::Metaclass) -> Rc<MetaclassInfo<H>> {
        let Some(name) = self.host.metaclass_name(metaclass) else {
            let name = type_name(self.host.as_ref(), &TypeRef::Metaclass(metaclass.clone()));
            tracing::warn!(?metaclass, "unnamed metaclass, descriptor not cached");
            return Rc::new(self.build_metaclass_info(metaclass, name));
        };
        if let Some(info) = self.metaclasses.borrow().get(&name) {
            return info.clone();
        }

        tracing::debug!(metaclass = %name, "building metaclass descriptor");
        let info = Rc::new(self.build_metaclass_info(metaclass, name.clone()));
        self.metaclasses.borrow_mut().insert(name, info.clone());
        info
    }

    fn build_metaclass_info(&self, metaclass: &H::Metaclass, name: String) -> MetaclassInfo<H> {
        let features = self.discover_features(metaclass, self.config.include_inherited);
        MetaclassInfo::build(self.host.as_ref(), metaclass.clone(), name, features)
    }

    pub fn metaclass_info_by_name(&self, name: &str) -> Result<Rc<MetaclassInfo<H>>> {
        self.host
            .resolve_metaclass(name)
            .map(|metaclass| self.metaclass_info(&metaclass))
            .ok_or_else(|| Error::UnresolvedMetaclass(name.to_string()))
    }

    /// Number of metaclass descriptors built so far.
    pub fn cached_metaclasses(&self) -> usize {
        self.metaclasses.borrow().len()
    }

    /// Describe an instance.
    ///
    /// Builds a fresh descriptor on every call unless element caching is
    /// enabled, in which case descriptors are reused by stable identifier.
    pub fn element_info(&self, element: &H::Element) -> Rc<ElementInfo<H>> {
        let identifier = self.host.instance_stable_identifier(element);
        if self.config.cache_elements {
            if let Some(info) = self.elements.borrow().get(&identifier) {
                return info.clone();
            }
        }

        let metaclass = self.metaclass_info(&self.host.instance_metaclass(element));
        let info = Rc::new(ElementInfo::new(
            self.host.clone(),
            element.clone(),
            identifier.clone(),
            name_or_id(self.host.as_ref(), element),
            self.path(element),
            metaclass.clone(),
            metaclass.signature(&self.config.signature_separator),
        ));
        if self.config.cache_elements {
            self.elements.borrow_mut().insert(identifier, info.clone());
        }
        info
    }

    pub fn element_infos<'a>(
        &self,
        elements: impl IntoIterator<Item = &'a H::Element>,
    ) -> Vec<Rc<ElementInfo<H>>>
    where
        H::Element: 'a,
    {
        elements.into_iter().map(|e| self.element_info(e)).collect()
    }

    pub fn hierarchy(&self) -> Hierarchy<'_, H> {
        Hierarchy::new(
            self.host.as_ref(),
            &self.parents,
            self.config.max_ancestor_depth,
            &self.config.path_separator,
        )
    }

    pub fn parent(&self, element: &H::Element) -> Result<Option<H::Element>> {
        self.hierarchy().parent(element)
    }

    pub fn parents(&self, element: &H::Element) -> Result<Vec<H::Element>> {
        self.hierarchy().parents(element)
    }

    pub fn path(&self, element: &H::Element) -> String {
        self.hierarchy().path(element)
    }

    /// Console rendering of an instance: signature and non-empty slots.
    pub fn describe(&self, element: &H::Element) -> String {
        self.element_info(element).text(false)
    }

    /// Console or HTML rendering of a metaclass and its features.
    pub fn describe_metaclass(&self, name: &str, html: bool) -> Result<String> {
        let info = self.metaclass_info_by_name(name)?;
        let text = if html {
            let view = MetaclassView {
                signature_separator: &self.config.signature_separator,
                feature_template: Some(HTML_FEATURE_ITEM),
                feature_separator: Some(""),
                html: true,
            };
            info.text(Some(HTML_METACLASS_LAYOUT), &view)
        } else {
            let view = MetaclassView {
                signature_separator: &self.config.signature_separator,
                ..MetaclassView::default()
            };
            info.text(None, &view)
        };
        Ok(text)
    }

    /// Instances of a metaclass whose declared name equals `name`.
    pub fn instances_named(&self, metaclass: &str, name: &str) -> Result<Vec<H::Element>> {
        let mc = self
            .host
            .resolve_metaclass(metaclass)
            .ok_or_else(|| Error::UnresolvedMetaclass(metaclass.to_string()))?;
        Ok(self
            .host
            .instances_of(&mc)
            .into_iter()
            .filter(|e| self.host.instance_declared_name(e).as_deref() == Some(name))
            .collect())
    }

    /// The single instance of a metaclass with the given name.
    ///
    /// Fails with [`Error::AmbiguousOrMissingNamedInstance`] unless exactly
    /// one instance matches.
    pub fn instance_named(&self, metaclass: &str, name: &str) -> Result<H::Element> {
        let mut found = self.instances_named(metaclass, name)?;
        if found.len() == 1 {
            if let Some(element) = found.pop() {
                return Ok(element);
            }
        }
        Err(Error::AmbiguousOrMissingNamedInstance {
            metaclass: metaclass.to_string(),
            name: name.to_string(),
            matches: found.len(),
        })
    }

    /// A tree view rooted at the given instances, hiding empty slots.
    pub fn tree<'a>(&self, roots: impl IntoIterator<Item = &'a H::Element>) -> ModelTree<'_, H>
    where
        H::Element: 'a,
    {
        ModelTree::new(self, self.element_infos(roots))
    }
}
