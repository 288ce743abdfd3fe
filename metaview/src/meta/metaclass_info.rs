use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::host::ObjectModel;
use crate::template::substitute;

use super::feature::MetaFeature;

/// Cached description of one metaclass: its inheritance chain and its
/// features in discovery order.
///
/// Built once per metaclass name by [`Session::metaclass_info`](crate::Session::metaclass_info).
pub struct MetaclassInfo<H: ObjectModel> {
    metaclass: H::Metaclass,
    name: String,
    qualified_name: Option<String>,
    chain: Vec<String>,
    subs: Vec<String>,
    features: Vec<Rc<MetaFeature<H>>>,
}

impl<H: ObjectModel> MetaclassInfo<H> {
    pub(crate) fn build(
        host: &H,
        metaclass: H::Metaclass,
        name: String,
        features: Vec<Rc<MetaFeature<H>>>,
    ) -> Self {
        let subs = host
            .sub_metaclasses(&metaclass)
            .iter()
            .filter_map(|m| host.metaclass_name(m))
            .collect();
        Self {
            chain: inheritance_chain(host, &metaclass, &name),
            qualified_name: host.metaclass_qualified_name(&metaclass),
            subs,
            metaclass,
            name,
            features,
        }
    }

    pub fn metaclass(&self) -> &H::Metaclass {
        &self.metaclass
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    /// The metaclass followed by its primary ancestors, nearest first.
    pub fn super_metaclasses(&self) -> &[String] {
        &self.chain
    }

    /// Names of the direct sub-metaclasses.
    pub fn sub_metaclasses(&self) -> &[String] {
        &self.subs
    }

    pub fn features(&self) -> &[Rc<MetaFeature<H>>] {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&Rc<MetaFeature<H>>> {
        self.features.iter().find(|f| f.name() == name)
    }

    /// The inheritance chain joined by `separator`, e.g. `UseCase > ModelElement`.
    pub fn signature(&self, separator: &str) -> String {
        self.chain.join(separator)
    }

    /// One rendered feature signature per feature, joined by `separator`
    /// (newline, or `<br/>` in HTML mode, when `None`).
    pub fn body(&self, template: Option<&str>, separator: Option<&str>, html: bool) -> String {
        let separator = separator.unwrap_or(if html { "<br/>" } else { "\n" });
        self.features
            .iter()
            .map(|f| f.signature(template, html))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Signature followed by the body.
    ///
    /// `layout` may use `$mcsig` and `$mcbody`; it defaults to the two joined
    /// by a line break.
    pub fn text(&self, layout: Option<&str>, view: &MetaclassView<'_>) -> String {
        let layout = layout.unwrap_or(if view.html {
            "$mcsig<br/>$mcbody"
        } else {
            "$mcsig\n$mcbody"
        });
        let signature = self.signature(view.signature_separator);
        let body = self.body(view.feature_template, view.feature_separator, view.html);
        substitute(
            layout,
            &[("mcsig", signature.as_str()), ("mcbody", body.as_str())],
        )
    }
}

/// Rendering options for [`MetaclassInfo::text`].
#[derive(Debug, Clone, Copy)]
pub struct MetaclassView<'a> {
    pub signature_separator: &'a str,
    pub feature_template: Option<&'a str>,
    pub feature_separator: Option<&'a str>,
    pub html: bool,
}

impl Default for MetaclassView<'_> {
    fn default() -> Self {
        Self {
            signature_separator: " > ",
            feature_template: None,
            feature_separator: None,
            html: false,
        }
    }
}

impl<H: ObjectModel> fmt::Debug for MetaclassInfo<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaclassInfo")
            .field("name", &self.name)
            .field("chain", &self.chain)
            .field("features", &self.features)
            .finish()
    }
}

impl<H: ObjectModel> fmt::Display for MetaclassInfo<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Follow the first super-metaclass upwards, stopping on unnamed handles
/// or on a name already visited.
fn inheritance_chain<H: ObjectModel>(
    host: &H,
    metaclass: &H::Metaclass,
    name: &str,
) -> Vec<String> {
    let mut chain = vec![name.to_string()];
    let mut seen: HashSet<String> = chain.iter().cloned().collect();
    let mut current = host.super_metaclasses(metaclass).into_iter().next();
    while let Some(parent) = current {
        let Some(parent_name) = host.metaclass_name(&parent) else {
            break;
        };
        if !seen.insert(parent_name.clone()) {
            tracing::warn!(metaclass = %name, at = %parent_name, "inheritance cycle");
            break;
        }
        chain.push(parent_name);
        current = host.super_metaclasses(&parent).into_iter().next();
    }
    chain
}
