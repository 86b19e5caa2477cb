//! Ordered parameter collection.
//!
//! A [`ParameterSet`] owns the parameters of one configuration form, in the
//! order they appear on the page and in storage. It drives the three passes
//! over that sequence:
//!
//! - rendering the form fields, optionally echoing a submission
//! - validating and applying a submission
//! - saving to and loading from a [`ByteStorage`]
//!
//! Storage layout is the concatenation of every parameter segment in sequence
//! order, each exactly `capacity` bytes long. Separators take no space. The
//! order must therefore stay stable between save and load.

use crate::parameter::{
    Parameter, ParameterError, ParameterInfo, Persistable, Renderable, Updatable,
};
use crate::storage::{check_bounds, ByteStorage, StorageError};
use crate::submission::Submission;
use crate::template::FIELDSET_CLOSE;
use tracing::{debug, warn};

/// Validation messages reported by a form validator, keyed by parameter id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `message` for the parameter `id`.
    pub fn add(&mut self, id: impl Into<String>, message: impl Into<String>) {
        self.entries.push((id.into(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, msg)| (id.as_str(), msg.as_str()))
    }
}

/// Parameters of one configuration form, in page and storage order.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    ///
    /// Fails if another parameter already uses the same id.
    pub fn add(&mut self, param: impl Into<Parameter>) -> Result<(), ParameterError> {
        let param = param.into();
        if let Some(id) = param.id() {
            if self.get(id).is_some() {
                return Err(ParameterError::DuplicateId(id.to_string()));
            }
        }
        self.params.push(param);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.id() == Some(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.id() == Some(id))
    }

    /// Current value of the parameter `id`.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Parameter::value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render the form fields of all visible parameters.
    ///
    /// A parameter echoes the submitted value only if `submission` contains
    /// its id. Each separator closes the fieldset opened by the previous one,
    /// and the last open fieldset is closed at the end.
    pub fn render_fields(&self, submission: Option<&Submission>) -> String {
        let mut out = String::new();
        let mut fieldset_open = false;

        for param in self.params.iter().filter(|p| p.is_visible()) {
            let submitted = param
                .id()
                .and_then(|id| submission.and_then(|s| s.get(id)));

            if param.is_separator() {
                if fieldset_open {
                    out.push_str(FIELDSET_CLOSE);
                }
                fieldset_open = true;
            }
            out.push_str(&param.render_html(submitted));
        }

        if fieldset_open {
            out.push_str(FIELDSET_CLOSE);
        }
        out
    }

    /// Clear every error message.
    pub fn clear_errors(&mut self) {
        for param in &mut self.params {
            param.clear_error();
        }
    }

    /// Run a form validator against `submission`.
    ///
    /// Error messages from the previous cycle are cleared first. The
    /// validator reports problems into a [`ValidationErrors`] collector and
    /// each message is attached to its parameter. Returns `true` if nothing
    /// was reported.
    pub fn validate<F>(&mut self, submission: &Submission, validator: F) -> bool
    where
        F: FnOnce(&Submission, &ParameterSet, &mut ValidationErrors),
    {
        self.clear_errors();

        let mut errors = ValidationErrors::new();
        validator(submission, self, &mut errors);

        for (id, message) in errors.iter() {
            match self.get_mut(id) {
                Some(param) => param.set_error(message),
                None => warn!(id, message, "Validation error for unknown parameter"),
            }
        }

        debug!(errors = errors.len(), "Form validated");
        errors.is_empty()
    }

    /// Update every parameter whose id is present in `submission`.
    ///
    /// Parameters missing from the submission keep their value.
    pub fn apply(&mut self, submission: &Submission) {
        for param in &mut self.params {
            if let Some(value) = param.id().and_then(|id| submission.get(id)) {
                param.update(value);
            }
        }
    }

    /// Total length of all storage segments.
    pub fn storage_size(&self) -> usize {
        self.params.iter().map(Parameter::capacity).sum()
    }

    /// Write every segment, starting at `offset`.
    ///
    /// Returns the offset just past the last segment.
    pub fn save<S: ByteStorage + ?Sized>(
        &self,
        storage: &mut S,
        offset: usize,
    ) -> Result<usize, StorageError> {
        check_bounds(offset, self.storage_size(), storage.size())?;

        let mut offset = offset;
        for param in &self.params {
            let unit = param.serialize();
            storage.write(offset, unit.bytes)?;
            offset += unit.len();
        }
        Ok(offset)
    }

    /// Read every segment, starting at `offset`, and run the post-load hook
    /// of each parameter.
    ///
    /// Returns the offset just past the last segment.
    pub fn load<S: ByteStorage + ?Sized>(
        &mut self,
        storage: &S,
        offset: usize,
    ) -> Result<usize, StorageError> {
        check_bounds(offset, self.storage_size(), storage.size())?;

        let mut offset = offset;
        for param in &mut self.params {
            let unit = param.prepare_deserialization();
            let len = unit.len();
            storage.read(offset, unit.bytes)?;
            param.deserialize();
            offset += len;
        }
        Ok(offset)
    }

    /// Empty every buffer and apply defaults, as if loaded from blank storage.
    pub fn reset_to_defaults(&mut self) {
        for param in &mut self.params {
            param.prepare_deserialization().bytes.fill(0);
            param.deserialize();
        }
    }

    /// Serializable description of every parameter.
    pub fn infos(&self) -> Vec<ParameterInfo> {
        self.params.iter().map(Parameter::info).collect()
    }

    /// Log the id/value summary of every parameter.
    pub fn debug_to_log(&self) {
        for param in &self.params {
            param.debug_to_log();
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{NumberParameter, PasswordParameter, Separator, TextParameter};
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn wifi_set() -> ParameterSet {
        let mut set = ParameterSet::new();
        set.add(Separator::with_label("WiFi")).unwrap();
        set.add(TextParameter::new("SSID", "ssid", 33).unwrap()).unwrap();
        set.add(PasswordParameter::new("Password", "wifi_pass", 65).unwrap())
            .unwrap();
        set.add(Separator::with_label("MQTT")).unwrap();
        set.add(
            NumberParameter::new("Port", "mqtt_port", 6)
                .unwrap()
                .with_default("1883"),
        )
        .unwrap();
        set.add(
            TextParameter::new("Token", "token", 9)
                .unwrap()
                .with_value("abc")
                .hidden(),
        )
        .unwrap();
        set
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut set = wifi_set();
        let err = set
            .add(TextParameter::new("Again", "ssid", 4).unwrap())
            .unwrap_err();
        assert_eq!(err, ParameterError::DuplicateId("ssid".to_string()));
    }

    #[test]
    fn test_multiple_separators_allowed() {
        let mut set = ParameterSet::new();
        set.add(Separator::new()).unwrap();
        set.add(Separator::new()).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_storage_size_skips_separators() {
        assert_eq!(wifi_set().storage_size(), 33 + 65 + 6 + 9);
    }

    #[test]
    fn test_render_fields_structure() {
        let markup = wifi_set().render_fields(None);

        assert!(markup.starts_with("<fieldset><legend>WiFi</legend><div class=''>"));
        assert!(markup.contains("</div></fieldset><fieldset><legend>MQTT</legend>"));
        assert!(markup.ends_with("</div></fieldset>"));
        assert_eq!(markup.matches("<fieldset>").count(), 2);
        assert_eq!(markup.matches("</fieldset>").count(), 2);
        // Hidden parameter is not rendered.
        assert!(!markup.contains("token"));
    }

    #[test]
    fn test_render_fields_without_separator_has_no_fieldset() {
        let mut set = ParameterSet::new();
        set.add(TextParameter::new("Name", "name", 8).unwrap()).unwrap();
        assert!(!set.render_fields(None).contains("fieldset"));
    }

    #[test]
    fn test_render_fields_echoes_submission() {
        let mut set = wifi_set();
        set.get_mut("ssid").unwrap().update("stored");
        let submission = Submission::from_pairs([("ssid", "typed")]);

        let markup = set.render_fields(Some(&submission));
        assert!(markup.contains("value='typed'"));
        assert!(!markup.contains("stored"));
        // Not in the submission: stored value (here the empty port).
        assert!(markup.contains("name='mqtt_port' maxlength=6 placeholder='' value=''"));
    }

    #[test]
    fn test_validate_attaches_and_clears_errors() {
        let mut set = wifi_set();
        let submission = Submission::from_pairs([("ssid", ""), ("mqtt_port", "x")]);

        let valid = set.validate(&submission, |s, _, errors| {
            if s.get("ssid").map_or(true, str::is_empty) {
                errors.add("ssid", "SSID is required");
            }
            errors.add("nonexistent", "ignored");
        });
        assert!(!valid);
        assert_eq!(
            set.get("ssid").unwrap().error_message(),
            Some("SSID is required")
        );
        assert!(set
            .render_fields(Some(&submission))
            .contains("<div class='em'>SSID is required</div>"));

        let valid = set.validate(&submission, |_, _, _| {});
        assert!(valid);
        assert_eq!(set.get("ssid").unwrap().error_message(), None);
    }

    #[test]
    fn test_validator_sees_current_values() {
        let mut set = wifi_set();
        set.get_mut("ssid").unwrap().update("boat");
        let submission = Submission::new();

        let valid = set.validate(&submission, |_, params, errors| {
            if params.value("ssid") != Some("boat") {
                errors.add("ssid", "unexpected");
            }
        });
        assert!(valid);
    }

    #[test]
    fn test_apply_updates_present_ids_only() {
        let mut set = wifi_set();
        set.get_mut("wifi_pass").unwrap().update("secret1");

        let submission = Submission::from_pairs([
            ("ssid", "boat"),
            ("wifi_pass", ""),
            ("mqtt_port", "8883"),
        ]);
        set.apply(&submission);

        assert_eq!(set.value("ssid"), Some("boat"));
        assert_eq!(set.value("wifi_pass"), Some("secret1"));
        assert_eq!(set.value("mqtt_port"), Some("8883"));
        assert_eq!(set.value("token"), Some("abc"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut set = wifi_set();
        set.apply(&Submission::from_pairs([
            ("ssid", "boat"),
            ("wifi_pass", "hunter22"),
            ("mqtt_port", "8883"),
        ]));

        let mut storage = MemoryStorage::new(set.storage_size() + 4);
        let end = set.save(&mut storage, 4).unwrap();
        assert_eq!(end, 4 + set.storage_size());
        assert_eq!(&storage.as_bytes()[4..8], b"boat");

        let mut restored = wifi_set();
        restored.load(&storage, 4).unwrap();
        assert_eq!(restored.value("ssid"), Some("boat"));
        assert_eq!(restored.value("wifi_pass"), Some("hunter22"));
        assert_eq!(restored.value("mqtt_port"), Some("8883"));
        assert_eq!(restored.value("token"), Some("abc"));
    }

    #[test]
    fn test_load_from_erased_storage_applies_defaults() {
        let mut set = wifi_set();
        let storage = MemoryStorage::new(set.storage_size());
        set.load(&storage, 0).unwrap();

        assert_eq!(set.value("ssid"), Some(""));
        assert_eq!(set.value("mqtt_port"), Some("1883"));
    }

    #[test]
    fn test_save_into_small_storage_fails() {
        let set = wifi_set();
        let mut storage = MemoryStorage::new(set.storage_size() - 1);
        assert!(matches!(
            set.save(&mut storage, 0),
            Err(StorageError::OutOfBounds { .. })
        ));
        // Nothing was written.
        assert!(storage.as_bytes().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut set = wifi_set();
        set.apply(&Submission::from_pairs([("ssid", "boat"), ("mqtt_port", "1")]));
        set.reset_to_defaults();
        assert_eq!(set.value("ssid"), Some(""));
        assert_eq!(set.value("mqtt_port"), Some("1883"));
        assert_eq!(set.value("token"), Some(""));
    }

    #[test]
    fn test_infos_in_order() {
        use crate::parameter::ParameterKind;

        let kinds: Vec<_> = wifi_set().infos().into_iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParameterKind::Separator,
                ParameterKind::Text,
                ParameterKind::Password,
                ParameterKind::Separator,
                ParameterKind::Number,
                ParameterKind::Text,
            ]
        );
    }
}
