//! Configuration parameters.
//!
//! A parameter is a named, form-renderable configuration field backed by a
//! fixed-capacity [`ValueBuffer`]. Behaviour is split into three capabilities:
//!
//! - [`Renderable`] produces the HTML form fragment
//! - [`Updatable`] absorbs a submitted value
//! - [`Persistable`] exposes the buffer to a storage reader/writer
//!
//! [`Parameter`] is the tagged union over all parameter kinds and dispatches
//! every capability to the concrete type.

/// Forwards the [`TextParameter`] builder methods through a wrapper type.
macro_rules! forward_text_builders {
    ($ty:ident) => {
        impl $ty {
            pub fn with_value(self, value: &str) -> Self {
                Self(self.0.with_value(value))
            }

            pub fn with_default(self, default_value: impl Into<String>) -> Self {
                Self(self.0.with_default(default_value))
            }

            pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
                Self(self.0.with_placeholder(placeholder))
            }

            pub fn with_custom_html(self, custom_html: impl Into<String>) -> Self {
                Self(self.0.with_custom_html(custom_html))
            }

            pub fn hidden(self) -> Self {
                Self(self.0.hidden())
            }

            pub fn as_text(&self) -> &TextParameter {
                &self.0
            }

            pub fn as_text_mut(&mut self) -> &mut TextParameter {
                &mut self.0
            }

            pub fn value(&self) -> &str {
                self.0.value()
            }
        }

        impl From<TextParameter> for $ty {
            fn from(p: TextParameter) -> Self {
                Self(p)
            }
        }

        impl Persistable for $ty {
            fn serialize(&self) -> SerializationUnit<'_> {
                self.0.serialize()
            }

            fn prepare_deserialization(&mut self) -> DeserializationUnit<'_> {
                self.0.prepare_deserialization()
            }

            fn deserialize(&mut self) {
                self.0.deserialize()
            }
        }
    };
}

mod number;
mod password;
mod separator;
mod text;

pub use number::NumberParameter;
pub use password::PasswordParameter;
pub use separator::Separator;
pub use text::TextParameter;

use crate::buffer::ValueBuffer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Maximum length of a parameter identifier.
pub const MAX_ID_LEN: usize = 64;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("static id pattern"));

/// Errors raised while building a parameter collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// The identifier is empty, too long or not safe as a form field name.
    #[error("Invalid parameter id: {0:?}")]
    InvalidId(String),

    /// Another parameter in the collection already uses this identifier.
    #[error("Duplicate parameter id: {0}")]
    DuplicateId(String),
}

/// Identifier used both as form field name and storage key.
///
/// Only ASCII letters, digits, `_`, `-` and `.` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterId(String);

impl ParameterId {
    pub fn new(id: &str) -> Result<Self, ParameterError> {
        if id.len() > MAX_ID_LEN || !ID_PATTERN.is_match(id) {
            return Err(ParameterError::InvalidId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParameterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ParameterId {
    type Error = ParameterError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        ParameterId::new(id)
    }
}

/// Read-only view of a value buffer for a storage writer.
///
/// Valid only for the duration of one persistence operation.
#[derive(Debug, Clone, Copy)]
pub struct SerializationUnit<'a> {
    pub bytes: &'a [u8],
}

impl<'a> SerializationUnit<'a> {
    /// Segment length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Writable view of a value buffer for a storage reader to fill.
#[derive(Debug)]
pub struct DeserializationUnit<'a> {
    pub bytes: &'a mut [u8],
}

impl<'a> DeserializationUnit<'a> {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Produces the HTML fragment for a parameter.
pub trait Renderable {
    /// Render the form fragment.
    ///
    /// `submitted` carries the raw value from a previous submission, if any.
    /// It is echoed back in place of the stored value so invalid input is not
    /// lost when the form is shown again.
    fn render_html(&self, submitted: Option<&str>) -> String;
}

/// Absorbs a submitted form value.
pub trait Updatable {
    /// Store `submitted`, truncated to the buffer capacity.
    fn update(&mut self, submitted: &str);
}

/// Moves a parameter value to and from a flat byte store.
pub trait Persistable {
    /// Expose the whole buffer for a writer to copy out.
    fn serialize(&self) -> SerializationUnit<'_>;

    /// Expose the whole buffer for a reader to fill.
    fn prepare_deserialization(&mut self) -> DeserializationUnit<'_>;

    /// Post-process a buffer filled through
    /// [`prepare_deserialization`](Self::prepare_deserialization).
    fn deserialize(&mut self);
}

/// Kind tag of a [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Text,
    Number,
    Password,
    Separator,
}

/// Serializable description of a parameter.
///
/// Password values are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub kind: ParameterKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub capacity: usize,

    pub visible: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Any configuration parameter.
#[derive(Debug, Clone)]
pub enum Parameter {
    Text(TextParameter),
    Number(NumberParameter),
    Password(PasswordParameter),
    Separator(Separator),
}

impl Parameter {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Parameter::Text(_) => ParameterKind::Text,
            Parameter::Number(_) => ParameterKind::Number,
            Parameter::Password(_) => ParameterKind::Password,
            Parameter::Separator(_) => ParameterKind::Separator,
        }
    }

    /// The value-carrying part, `None` for separators.
    pub fn as_text(&self) -> Option<&TextParameter> {
        match self {
            Parameter::Text(p) => Some(p),
            Parameter::Number(p) => Some(p.as_text()),
            Parameter::Password(p) => Some(p.as_text()),
            Parameter::Separator(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextParameter> {
        match self {
            Parameter::Text(p) => Some(p),
            Parameter::Number(p) => Some(p.as_text_mut()),
            Parameter::Password(p) => Some(p.as_text_mut()),
            Parameter::Separator(_) => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.as_text().map(TextParameter::id)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Parameter::Separator(s) => s.label(),
            _ => self.as_text().and_then(TextParameter::label),
        }
    }

    /// Current stored value, `None` for separators.
    pub fn value(&self) -> Option<&str> {
        self.as_text().map(TextParameter::value)
    }

    /// Declared buffer length, zero for separators.
    pub fn capacity(&self) -> usize {
        self.as_text().map_or(0, TextParameter::capacity)
    }

    pub fn is_visible(&self) -> bool {
        self.as_text().map_or(true, TextParameter::is_visible)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Parameter::Separator(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        self.as_text().and_then(TextParameter::error_message)
    }

    /// Attach a validation message. Ignored for separators.
    pub fn set_error(&mut self, message: impl Into<String>) {
        if let Some(p) = self.as_text_mut() {
            p.set_error(message);
        }
    }

    pub fn clear_error(&mut self) {
        if let Some(p) = self.as_text_mut() {
            p.clear_error();
        }
    }

    /// Human readable id/value summary.
    pub fn debug_summary(&self) -> String {
        match self {
            Parameter::Text(p) => p.debug_summary(),
            Parameter::Number(p) => p.as_text().debug_summary(),
            Parameter::Password(p) => p.debug_summary(),
            Parameter::Separator(s) => s.debug_summary(),
        }
    }

    /// Emit [`debug_summary`](Self::debug_summary) to the diagnostic log.
    pub fn debug_to_log(&self) {
        tracing::debug!("{}", self.debug_summary());
    }

    pub fn info(&self) -> ParameterInfo {
        let kind = self.kind();
        match self.as_text() {
            Some(p) => ParameterInfo {
                kind,
                id: Some(p.id().to_string()),
                label: p.label().map(String::from),
                capacity: p.capacity(),
                visible: p.is_visible(),
                value: (kind != ParameterKind::Password).then(|| p.value().to_string()),
                error: p.error_message().map(String::from),
            },
            None => ParameterInfo {
                kind,
                id: None,
                label: self.label().map(String::from),
                capacity: 0,
                visible: true,
                value: None,
                error: None,
            },
        }
    }
}

impl Renderable for Parameter {
    fn render_html(&self, submitted: Option<&str>) -> String {
        match self {
            Parameter::Text(p) => p.render_html(submitted),
            Parameter::Number(p) => p.render_html(submitted),
            Parameter::Password(p) => p.render_html(submitted),
            Parameter::Separator(s) => s.render_html(submitted),
        }
    }
}

impl Updatable for Parameter {
    fn update(&mut self, submitted: &str) {
        match self {
            Parameter::Text(p) => p.update(submitted),
            Parameter::Number(p) => p.update(submitted),
            Parameter::Password(p) => p.update(submitted),
            Parameter::Separator(s) => s.update(submitted),
        }
    }
}

impl Persistable for Parameter {
    fn serialize(&self) -> SerializationUnit<'_> {
        match self {
            Parameter::Text(p) => p.serialize(),
            Parameter::Number(p) => p.serialize(),
            Parameter::Password(p) => p.serialize(),
            Parameter::Separator(s) => s.serialize(),
        }
    }

    fn prepare_deserialization(&mut self) -> DeserializationUnit<'_> {
        match self {
            Parameter::Text(p) => p.prepare_deserialization(),
            Parameter::Number(p) => p.prepare_deserialization(),
            Parameter::Password(p) => p.prepare_deserialization(),
            Parameter::Separator(s) => s.prepare_deserialization(),
        }
    }

    fn deserialize(&mut self) {
        match self {
            Parameter::Text(p) => p.deserialize(),
            Parameter::Number(p) => p.deserialize(),
            Parameter::Password(p) => p.deserialize(),
            Parameter::Separator(s) => s.deserialize(),
        }
    }
}

impl From<TextParameter> for Parameter {
    fn from(p: TextParameter) -> Self {
        Parameter::Text(p)
    }
}

impl From<NumberParameter> for Parameter {
    fn from(p: NumberParameter) -> Self {
        Parameter::Number(p)
    }
}

impl From<PasswordParameter> for Parameter {
    fn from(p: PasswordParameter) -> Self {
        Parameter::Password(p)
    }
}

impl From<Separator> for Parameter {
    fn from(s: Separator) -> Self {
        Parameter::Separator(s)
    }
}
