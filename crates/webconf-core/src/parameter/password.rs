//! Password parameter.

use super::{
    DeserializationUnit, ParameterError, Persistable, Renderable, SerializationUnit,
    TextParameter, Updatable,
};
use crate::buffer::ValueBuffer;
use crate::template::InputType;
use tracing::debug;

/// Shown instead of the value in diagnostics.
pub const REDACTED: &str = "<hidden>";

/// A [`TextParameter`] holding a secret.
///
/// The stored value is never written into markup, so the field always renders
/// blank. A blank submission therefore means "keep the current secret"; only a
/// non-empty submission replaces it.
#[derive(Debug, Clone)]
pub struct PasswordParameter(TextParameter);

impl PasswordParameter {
    pub fn new(label: &str, id: &str, capacity: usize) -> Result<Self, ParameterError> {
        TextParameter::new(label, id, capacity).map(Self)
    }

    pub(crate) fn debug_summary(&self) -> String {
        if cfg!(feature = "debug-password") {
            self.0.debug_summary()
        } else {
            format!("'{}' with value: {}", self.0.id(), REDACTED)
        }
    }
}

forward_text_builders!(PasswordParameter);

impl Renderable for PasswordParameter {
    /// Renders as if an empty value had been submitted, whatever was passed.
    fn render_html(&self, _submitted: Option<&str>) -> String {
        self.0.render_as(InputType::Password, Some(""))
    }
}

impl Updatable for PasswordParameter {
    fn update(&mut self, submitted: &str) {
        let candidate = ValueBuffer::with_value(self.0.capacity(), submitted);
        if candidate.is_empty() {
            debug!(id = self.0.id(), "Password was not changed");
        } else {
            self.0.replace_buffer(candidate);
            debug!(id = self.0.id(), "Password updated");
        }
    }
}
