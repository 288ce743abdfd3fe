use crate::host::ObjectModel;

/// Maps metaclass names to reference documentation pages.
pub trait DocumentationResolver {
    fn url_for_metaclass_name(&self, name: &str) -> Option<String>;
}

/// Derives API reference URLs from qualified metaclass names.
///
/// `org.uml.statik.UseCase` under the prefix `org.uml.` and the root
/// `https://docs.example.org/api` maps to
/// `https://docs.example.org/api/org/uml/statik/UseCase.html`. Metaclasses
/// outside the prefix, or without a qualified name, have no page.
pub struct ReferenceDocs<'h, H: ObjectModel> {
    host: &'h H,
    root_url: String,
    package_prefix: String,
}

impl<'h, H: ObjectModel> ReferenceDocs<'h, H> {
    pub fn new(
        host: &'h H,
        root_url: impl Into<String>,
        package_prefix: impl Into<String>,
    ) -> Self {
        Self {
            host,
            root_url: root_url.into().trim_end_matches('/').to_string(),
            package_prefix: package_prefix.into(),
        }
    }
}

impl<H: ObjectModel> DocumentationResolver for ReferenceDocs<'_, H> {
    fn url_for_metaclass_name(&self, name: &str) -> Option<String> {
        let metaclass = self.host.resolve_metaclass(name)?;
        let qualified = self.host.metaclass_qualified_name(&metaclass)?;
        qualified
            .starts_with(&self.package_prefix)
            .then(|| format!("{}/{}.html", self.root_url, qualified.replace('.', "/")))
    }
}
