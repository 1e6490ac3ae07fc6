use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";
pub const DEFAULT_COMPANY_NAME: &str = "Assistant";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hi! How can I help you today?";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("apiUrl is required")]
    MissingApiUrl,
    #[error("apiUrl must use http:// or https:// and include a host")]
    InvalidApiUrl,
    #[error("configuration must be a JSON object")]
    NotAnObject,
}

/// Immutable widget configuration, supplied once at init and owned by the
/// runtime for its entire lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub api_url: String,
    pub primary_color: String,
    pub company_name: String,
    pub welcome_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_hint: Option<String>,
}

impl WidgetConfig {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            tenant_hint: None,
        })
    }

    /// Parses the host-supplied init object. Recognized options: `apiUrl`
    /// (required), `primaryColor`, `companyName`, `welcomeMessage`,
    /// `tenantHint`. Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let object = value.as_object().ok_or(ConfigError::NotAnObject)?;

        let api_url = non_empty_string(object.get("apiUrl")).ok_or(ConfigError::MissingApiUrl)?;
        let mut config = Self::new(&api_url)?;

        if let Some(primary_color) = non_empty_string(object.get("primaryColor")) {
            config.primary_color = primary_color;
        }
        if let Some(company_name) = non_empty_string(object.get("companyName")) {
            config.company_name = company_name;
        }
        if let Some(welcome_message) = non_empty_string(object.get("welcomeMessage")) {
            config.welcome_message = welcome_message;
        }
        config.tenant_hint = non_empty_string(object.get("tenantHint"));

        Ok(config)
    }
}

pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::MissingApiUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidApiUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidApiUrl);
    }
    Ok(trimmed.to_string())
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let raw = value?.as_str()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_configuration() {
        let config = WidgetConfig::from_json(&json!({
            "apiUrl": "https://api.example.test/",
            "primaryColor": "#10b981",
            "companyName": "Acme Support",
            "welcomeMessage": "Welcome!",
            "tenantHint": "acme",
        }))
        .expect("full config");

        assert_eq!(config.api_url, "https://api.example.test");
        assert_eq!(config.primary_color, "#10b981");
        assert_eq!(config.company_name, "Acme Support");
        assert_eq!(config.welcome_message, "Welcome!");
        assert_eq!(config.tenant_hint.as_deref(), Some("acme"));
    }

    #[test]
    fn defaults_optional_options() {
        let config = WidgetConfig::from_json(&json!({ "apiUrl": "https://x.test" })).expect("defaulted config");

        assert_eq!(config.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(config.company_name, DEFAULT_COMPANY_NAME);
        assert_eq!(config.welcome_message, DEFAULT_WELCOME_MESSAGE);
        assert!(config.tenant_hint.is_none());
    }

    #[test]
    fn ignores_unknown_options() {
        let config = WidgetConfig::from_json(&json!({
            "apiUrl": "https://x.test",
            "position": "bottom-left",
        }))
        .expect("config with unknown keys");

        assert_eq!(config.api_url, "https://x.test");
    }

    #[test]
    fn rejects_missing_api_url() {
        let error = WidgetConfig::from_json(&json!({ "companyName": "Acme" })).expect_err("missing apiUrl");
        assert_eq!(error, ConfigError::MissingApiUrl);
    }

    #[test]
    fn rejects_schemeless_api_url() {
        let error = WidgetConfig::from_json(&json!({ "apiUrl": "api.example.test" })).expect_err("schemeless apiUrl");
        assert_eq!(error, ConfigError::InvalidApiUrl);
    }

    #[test]
    fn rejects_non_object_configuration() {
        let error = WidgetConfig::from_json(&json!("https://x.test")).expect_err("non-object config");
        assert_eq!(error, ConfigError::NotAnObject);
    }

    #[test]
    fn blank_optional_values_fall_back_to_defaults() {
        let config = WidgetConfig::from_json(&json!({
            "apiUrl": "https://x.test",
            "companyName": "   ",
        }))
        .expect("blank optional values");

        assert_eq!(config.company_name, DEFAULT_COMPANY_NAME);
    }
}
