use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::host::ObjectModel;
use crate::meta::MetaFeature;

use super::{ModelValue, classify};

/// One feature bound to one instance.
///
/// The value is computed on first access and kept for the lifetime of the
/// slot. An accessor fault becomes a [`ModelValue::Failed`] marker, so one
/// broken feature never prevents the others from being shown.
pub struct Slot<H: ObjectModel> {
    host: Rc<H>,
    feature: Rc<MetaFeature<H>>,
    element: H::Element,
    value: OnceCell<ModelValue<H::Element>>,
}

impl<H: ObjectModel> Slot<H> {
    pub(crate) fn new(host: Rc<H>, feature: Rc<MetaFeature<H>>, element: H::Element) -> Self {
        Self {
            host,
            feature,
            element,
            value: OnceCell::new(),
        }
    }

    pub fn element(&self) -> &H::Element {
        &self.element
    }

    pub fn feature(&self) -> &Rc<MetaFeature<H>> {
        &self.feature
    }

    pub fn name(&self) -> &str {
        self.feature.name()
    }

    pub fn model_value(&self) -> &ModelValue<H::Element> {
        self.value.get_or_init(|| self.evaluate())
    }

    /// Whether the value has been computed yet.
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.model_value().is_empty()
    }

    pub fn card(&self) -> usize {
        self.model_value().card()
    }

    /// `signature = value`
    pub fn text(&self) -> String {
        format!(
            "{} = {}",
            self.feature.signature(None, false),
            self.model_value().text(self.host.as_ref())
        )
    }

    fn evaluate(&self) -> ModelValue<H::Element> {
        match self.feature.evaluate(&self.host, &self.element) {
            Ok(raw) => {
                let value = classify(raw);
                tracing::trace!(
                    feature = %self.feature.name(),
                    kind = %value.kind(),
                    "slot evaluated"
                );
                value
            }
            Err(fault) => {
                tracing::warn!(
                    feature = %self.feature.qualified(),
                    element = ?self.element,
                    reason = %fault.reason,
                    "accessor failed"
                );
                ModelValue::Failed {
                    feature: self.feature.name().to_string(),
                    reason: fault.reason,
                }
            }
        }
    }
}

impl<H: ObjectModel> fmt::Debug for Slot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("feature", &self.feature)
            .field("element", &self.element)
            .field("value", &self.value.get())
            .finish()
    }
}
