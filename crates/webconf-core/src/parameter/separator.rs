//! Fieldset separator.

use super::{DeserializationUnit, Persistable, Renderable, SerializationUnit, Updatable};
use crate::template::render_legend;

/// Starts a new fieldset in the form, optionally with a legend.
///
/// A separator has no id and no value. It is never updated or persisted;
/// those operations are no-ops that expose zero-length units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Separator {
    label: Option<String>,
}

impl Separator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            label: (!label.is_empty()).then_some(label),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn debug_summary(&self) -> String {
        match &self.label {
            Some(label) => format!("separator '{}'", label),
            None => "separator".to_string(),
        }
    }
}

impl Renderable for Separator {
    fn render_html(&self, _submitted: Option<&str>) -> String {
        render_legend(self.label.as_deref().unwrap_or_default())
    }
}

impl Updatable for Separator {
    fn update(&mut self, _submitted: &str) {}
}

impl Persistable for Separator {
    fn serialize(&self) -> SerializationUnit<'_> {
        SerializationUnit { bytes: &[] }
    }

    fn prepare_deserialization(&mut self) -> DeserializationUnit<'_> {
        DeserializationUnit {
            bytes: Default::default(),
        }
    }

    fn deserialize(&mut self) {}
}
