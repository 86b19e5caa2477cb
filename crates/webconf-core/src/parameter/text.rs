//! Plain text parameter.

use super::{
    DeserializationUnit, ParameterError, ParameterId, Persistable, Renderable, SerializationUnit,
    Updatable,
};
use crate::buffer::ValueBuffer;
use crate::template::{render_field, FieldMarkup, InputType};
use tracing::debug;

/// A string-valued parameter rendered as a text input.
///
/// This type carries all value, rendering and persistence logic; number and
/// password parameters wrap it and only change how it renders or updates.
#[derive(Debug, Clone)]
pub struct TextParameter {
    label: Option<String>,
    id: ParameterId,
    value: ValueBuffer,
    visible: bool,
    default_value: Option<String>,
    placeholder: Option<String>,
    custom_html: Option<String>,
    error_message: Option<String>,
}

impl TextParameter {
    /// Create a visible parameter with an empty buffer of `capacity` bytes.
    ///
    /// `capacity` is the declared field length and includes the terminator
    /// slot. An empty `label` means no label.
    pub fn new(label: &str, id: &str, capacity: usize) -> Result<Self, ParameterError> {
        Ok(Self {
            label: (!label.is_empty()).then(|| label.to_string()),
            id: ParameterId::new(id)?,
            value: ValueBuffer::new(capacity),
            visible: true,
            default_value: None,
            placeholder: None,
            custom_html: None,
            error_message: None,
        })
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value.set(value);
        self
    }

    /// Value applied when the buffer comes back empty from storage.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Extra attributes inserted verbatim into the input tag.
    pub fn with_custom_html(mut self, custom_html: impl Into<String>) -> Self {
        self.custom_html = Some(custom_html.into());
        self
    }

    /// Leave the parameter out of the form. It is still updated and persisted.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn buffer(&self) -> &ValueBuffer {
        &self.value
    }

    /// Declared buffer length, terminator included.
    pub fn capacity(&self) -> usize {
        self.value.capacity()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn custom_html(&self) -> Option<&str> {
        self.custom_html.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Render with an explicit input type.
    pub(crate) fn render_as(&self, input_type: InputType, submitted: Option<&str>) -> String {
        render_field(&FieldMarkup {
            id: self.id.as_str(),
            label: self.label.as_deref().unwrap_or_default(),
            input_type,
            capacity: self.value.capacity(),
            placeholder: self.placeholder.as_deref().unwrap_or_default(),
            value: submitted.unwrap_or_else(|| self.value.as_str()),
            custom_html: self.custom_html.as_deref().unwrap_or_default(),
            error: self.error_message.as_deref().unwrap_or_default(),
        })
    }

    /// Replace the stored buffer wholesale.
    pub(crate) fn replace_buffer(&mut self, value: ValueBuffer) {
        self.value = value;
    }

    pub(crate) fn debug_summary(&self) -> String {
        format!("'{}' with value: '{}'", self.id, self.value)
    }
}

impl Renderable for TextParameter {
    fn render_html(&self, submitted: Option<&str>) -> String {
        self.render_as(InputType::Text, submitted)
    }
}

impl Updatable for TextParameter {
    fn update(&mut self, submitted: &str) {
        if self.value.set(submitted) {
            debug!(id = %self.id, capacity = self.value.capacity(), "Submitted value truncated");
        }
    }
}

impl Persistable for TextParameter {
    fn serialize(&self) -> SerializationUnit<'_> {
        SerializationUnit {
            bytes: self.value.as_bytes(),
        }
    }

    fn prepare_deserialization(&mut self) -> DeserializationUnit<'_> {
        DeserializationUnit {
            bytes: self.value.as_bytes_mut(),
        }
    }

    fn deserialize(&mut self) {
        self.value.normalize();
        if self.value.is_empty() {
            if let Some(default_value) = &self.default_value {
                self.value.set(default_value);
                debug!(id = %self.id, "Using default value");
            }
        }
    }
}
