use serde::{Deserialize, Serialize};
use snafu::Snafu;

use super::callback::AsyncCallback;

/// How the element reaches its backend: a self-hosted endpoint or the
/// hosted integration with client-secret authentication.
#[derive(Debug, Clone)]
pub enum ApiConfig {
    Custom(CustomApiConfig),
    Hosted(HostedApiConfig),
}

impl From<CustomApiConfig> for ApiConfig {
    fn from(config: CustomApiConfig) -> Self {
        Self::Custom(config)
    }
}

impl From<HostedApiConfig> for ApiConfig {
    fn from(config: HostedApiConfig) -> Self {
        Self::Hosted(config)
    }
}

/// Self-hosted backend endpoint description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomApiConfig {
    /// Relative or absolute URL of the backend endpoint.
    pub url: String,
    /// Key verifying the registered domain for the integration.
    pub domain_key: String,
    /// How attachments are uploaded. Required when attachments are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_strategy: Option<FileUploadStrategy>,
}

impl CustomApiConfig {
    pub fn new(url: impl Into<String>, domain_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain_key: domain_key.into(),
            upload_strategy: None,
        }
    }

    pub fn with_upload_strategy(mut self, strategy: FileUploadStrategy) -> Self {
        self.upload_strategy = Some(strategy);
        self
    }
}

/// Strategy used to upload files referenced by composer attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileUploadStrategy {
    TwoPhase,
    #[serde(rename_all = "camelCase")]
    Direct { upload_url: String },
}

/// Error produced by a caller's client-secret refresh callback.
#[derive(Debug, Snafu)]
#[snafu(display("client secret refresh failed: {message}"))]
pub struct ClientSecretError {
    pub message: String,
}

impl ClientSecretError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Callback that returns a fresh client token, given the current (possibly
/// expired) one. The host never awaits it; the element drives the refresh.
pub type ClientSecretProvider =
    AsyncCallback<Option<String>, Result<String, ClientSecretError>>;

/// Hosted integration authentication.
#[derive(Debug, Clone)]
pub struct HostedApiConfig {
    pub get_client_secret: ClientSecretProvider,
}

impl HostedApiConfig {
    pub fn new(get_client_secret: ClientSecretProvider) -> Self {
        Self { get_client_secret }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_strategy_uses_snake_case_tags() {
        let strategy = FileUploadStrategy::TwoPhase;
        assert_eq!(
            serde_json::to_string(&strategy).unwrap(),
            "{\"type\":\"two_phase\"}"
        );

        let strategy = FileUploadStrategy::Direct {
            upload_url: "https://uploads.example.test".to_string(),
        };
        let json = serde_json::to_value(&strategy).unwrap();
        assert_eq!(json["type"], "direct");
        assert_eq!(json["uploadUrl"], "https://uploads.example.test");
    }

    #[test]
    fn custom_config_round_trips() {
        let config = CustomApiConfig::new("http://127.0.0.1:8000/chatkit", "domain_pk_local_dev")
            .with_upload_strategy(FileUploadStrategy::TwoPhase);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CustomApiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
