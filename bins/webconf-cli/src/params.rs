//! Parameter layout of the demo device.
//!
//! Order matters: it is both the form order and the storage layout. Bump
//! [`CONFIG_VERSION`] whenever it changes.

use webconf_core::{
    NumberParameter, ParameterError, ParameterSet, PasswordParameter, Separator, Submission,
    TextParameter, ValidationErrors,
};

/// Default storage version marker.
pub const CONFIG_VERSION: &str = "wc01";

/// Minimum length of the access point password (WPA2).
const MIN_AP_PASSWORD_LEN: usize = 8;

pub fn device_parameters() -> Result<ParameterSet, ParameterError> {
    let mut set = ParameterSet::new();

    set.add(Separator::with_label("System"))?;
    set.add(TextParameter::new("Thing name", "iwcThingName", 33)?.with_default("webconf-thing"))?;
    set.add(
        PasswordParameter::new("AP password", "iwcApPassword", 33)?
            .with_placeholder("leave blank to keep"),
    )?;

    set.add(Separator::with_label("WiFi"))?;
    set.add(TextParameter::new("WiFi SSID", "iwcWifiSsid", 33)?)?;
    set.add(PasswordParameter::new("WiFi password", "iwcWifiPassword", 65)?)?;
    set.add(TextParameter::new("Static IP", "sta_ip", 16)?.with_placeholder("DHCP if empty"))?;

    set.add(Separator::with_label("MQTT"))?;
    set.add(TextParameter::new("MQTT server", "mqttServer", 64)?)?;
    set.add(
        NumberParameter::new("MQTT port", "mqttPort", 6)?
            .with_default("1883")
            .with_custom_html("min='1' max='65535'"),
    )?;
    set.add(TextParameter::new("MQTT user", "mqttUser", 32)?)?;
    set.add(PasswordParameter::new("MQTT password", "mqttPass", 32)?)?;

    Ok(set)
}

/// Form validator for [`device_parameters`].
pub fn validate(submission: &Submission, params: &ParameterSet, errors: &mut ValidationErrors) {
    if let Some(name) = submission.get("iwcThingName") {
        if name.trim().is_empty() {
            errors.add("iwcThingName", "Thing name must not be empty");
        }
    }

    if let Some(pass) = submission.get("iwcApPassword") {
        let has_stored = params.value("iwcApPassword").is_some_and(|v| !v.is_empty());
        if (pass.is_empty() && !has_stored) || (!pass.is_empty() && pass.len() < MIN_AP_PASSWORD_LEN)
        {
            errors.add(
                "iwcApPassword",
                format!("Password length must be at least {} characters", MIN_AP_PASSWORD_LEN),
            );
        }
    }

    if let Some(port) = submission.get("mqttPort") {
        if !port.is_empty() && !matches!(port.parse::<u16>(), Ok(p) if p > 0) {
            errors.add("mqttPort", "Port must be between 1 and 65535");
        }
    }

    if let Some(ip) = submission.get("sta_ip") {
        if !ip.is_empty() && ip.parse::<std::net::Ipv4Addr>().is_err() {
            errors.add("sta_ip", "Not a valid IPv4 address");
        }
    }
}
