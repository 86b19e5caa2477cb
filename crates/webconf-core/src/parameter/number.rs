//! Numeric parameter.

use super::{
    DeserializationUnit, ParameterError, Persistable, Renderable, SerializationUnit,
    TextParameter, Updatable,
};
use crate::template::InputType;

/// A [`TextParameter`] rendered as a `number` input.
///
/// The value is still stored as text and no numeric validation happens here;
/// a form validator reports bad input through the error message.
#[derive(Debug, Clone)]
pub struct NumberParameter(TextParameter);

impl NumberParameter {
    pub fn new(label: &str, id: &str, capacity: usize) -> Result<Self, ParameterError> {
        TextParameter::new(label, id, capacity).map(Self)
    }
}

forward_text_builders!(NumberParameter);

impl Renderable for NumberParameter {
    fn render_html(&self, submitted: Option<&str>) -> String {
        self.0.render_as(InputType::Number, submitted)
    }
}

impl Updatable for NumberParameter {
    fn update(&mut self, submitted: &str) {
        self.0.update(submitted)
    }
}
