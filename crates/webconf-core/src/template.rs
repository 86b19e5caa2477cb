//! HTML fragment templates.
//!
//! Markup is produced by pure functions over plain records, so every slot is
//! filled exactly once and submitted content can never be mistaken for a
//! template token.

use std::fmt::Write;

/// CSS class applied to the field wrapper when the field has an error.
pub const ERROR_STYLE: &str = "de";

/// Closes a fieldset opened by [`render_legend`].
pub const FIELDSET_CLOSE: &str = "</fieldset>";

/// HTML input element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Number,
    Password,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Password => "password",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to render one form field.
///
/// Optional slots are plain `&str`; absent values are passed as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMarkup<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub input_type: InputType,
    pub capacity: usize,
    pub placeholder: &'a str,
    pub value: &'a str,
    pub custom_html: &'a str,
    pub error: &'a str,
}

/// Render a form field.
///
/// `custom_html` is inserted verbatim inside the input tag; all other text
/// slots are escaped.
pub fn render_field(field: &FieldMarkup<'_>) -> String {
    let style = if field.error.is_empty() { "" } else { ERROR_STYLE };
    let id = escape(field.id);

    let mut out = String::with_capacity(192 + field.value.len() + field.custom_html.len());
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "<div class='{style}'><label for='{id}'>{label}</label>\
         <input type='{input_type}' id='{id}' name='{id}' maxlength={capacity} \
         placeholder='{placeholder}' value='{value}' {custom}/>\
         <div class='em'>{error}</div></div>",
        label = escape(field.label),
        input_type = field.input_type,
        capacity = field.capacity,
        placeholder = escape(field.placeholder),
        value = escape(field.value),
        custom = field.custom_html,
        error = escape(field.error),
    );
    out
}

/// Open a fieldset, with a legend when `label` is non-empty.
pub fn render_legend(label: &str) -> String {
    if label.is_empty() {
        "<fieldset>".to_string()
    } else {
        format!("<fieldset><legend>{}</legend>", escape(label))
    }
}

/// Escape text for use in element content and single- or double-quoted
/// attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field<'a>() -> FieldMarkup<'a> {
        FieldMarkup {
            id: "sta_ip",
            label: "Static IP",
            input_type: InputType::Text,
            capacity: 16,
            placeholder: "",
            value: "192.168.1.5",
            custom_html: "",
            error: "",
        }
    }

    #[test]
    fn test_render_field_plain() {
        assert_eq!(
            render_field(&field()),
            "<div class=''><label for='sta_ip'>Static IP</label>\
             <input type='text' id='sta_ip' name='sta_ip' maxlength=16 \
             placeholder='' value='192.168.1.5' />\
             <div class='em'></div></div>"
        );
    }

    #[test]
    fn test_render_field_with_error() {
        let markup = render_field(&FieldMarkup {
            error: "Invalid address",
            ..field()
        });
        assert!(markup.starts_with("<div class='de'>"));
        assert!(markup.contains("<div class='em'>Invalid address</div>"));
    }

    #[test]
    fn test_render_field_custom_html_is_verbatim() {
        let markup = render_field(&FieldMarkup {
            input_type: InputType::Number,
            custom_html: "min='1' max='65535'",
            ..field()
        });
        assert!(markup.contains("type='number'"));
        assert!(markup.contains("value='192.168.1.5' min='1' max='65535'/>"));
    }

    #[test]
    fn test_value_cannot_inject_slot_tokens() {
        let markup = render_field(&FieldMarkup {
            value: "{i}{e}{s}",
            ..field()
        });
        assert!(markup.contains("value='{i}{e}{s}'"));
        assert!(markup.contains("<div class='em'></div>"));
    }

    #[test]
    fn test_value_is_escaped() {
        let markup = render_field(&FieldMarkup {
            value: "it's <b>",
            ..field()
        });
        assert!(markup.contains("value='it&#39;s &lt;b&gt;'"));
    }

    #[test]
    fn test_render_legend() {
        assert_eq!(render_legend("Network"), "<fieldset><legend>Network</legend>");
        assert_eq!(render_legend(""), "<fieldset>");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a&b<c>'d"e"#), "a&amp;b&lt;c&gt;&#39;d&quot;e");
        assert_eq!(escape("plain"), "plain");
    }
}
