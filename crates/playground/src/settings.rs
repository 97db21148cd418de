use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use chatkit_host::HostOptions;
use chatkit_options::{
    ColorScheme, ComposerOption, CustomApiConfig, Locale, StartScreenOption, StartScreenPrompt,
    ThreadItemActionsOption, WidgetIcon,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/chatkit";
pub const DEFAULT_DOMAIN_KEY: &str = "domain_pk_local_dev";
pub const DEFAULT_GREETING: &str = "Ask our assistant anything about your project.";
pub const SETTINGS_DIRECTORY_NAME: &str = "chatkit-playground";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_domain_key() -> String {
    DEFAULT_DOMAIN_KEY.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaygroundSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_domain_key")]
    pub domain_key: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub composer_placeholder: String,
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            domain_key: default_domain_key(),
            greeting: default_greeting(),
            color_scheme: ColorScheme::Light,
            locale: String::new(),
            composer_placeholder: String::new(),
        }
    }
}

impl PlaygroundSettings {
    pub fn normalized(mut self) -> Self {
        self.api_url = if self.api_url.trim().is_empty() {
            default_api_url()
        } else {
            self.api_url.trim().to_string()
        };
        self.domain_key = if self.domain_key.trim().is_empty() {
            default_domain_key()
        } else {
            self.domain_key.trim().to_string()
        };
        self.greeting = if self.greeting.trim().is_empty() {
            default_greeting()
        } else {
            self.greeting.trim().to_string()
        };
        self.locale = self.locale.trim().to_string();
        self.composer_placeholder = self.composer_placeholder.trim().to_string();
        self
    }

    /// Parses the configured locale, falling back to the element default
    /// when the tag is unknown.
    pub fn resolved_locale(&self) -> Option<Locale> {
        if self.locale.is_empty() {
            return None;
        }
        match Locale::parse(&self.locale) {
            Ok(locale) => Some(locale),
            Err(error) => {
                tracing::warn!(
                    locale = %self.locale,
                    error = %error,
                    "configured locale is unsupported, element will use English"
                );
                None
            }
        }
    }

    /// Builds the flat host options record the playground commits.
    pub fn to_host_options(&self) -> HostOptions {
        let mut options = HostOptions::new(CustomApiConfig::new(&self.api_url, &self.domain_key))
            .with_theme(self.color_scheme)
            .with_start_screen(
                StartScreenOption::default()
                    .with_greeting(&self.greeting)
                    .with_prompt(
                        StartScreenPrompt::new("Try a greeting", "Hello! What can you do?")
                            .with_icon(WidgetIcon::Sparkle),
                    )
                    .with_prompt(StartScreenPrompt::new(
                        "Summarize docs",
                        "Summarize the README for me.",
                    )),
            )
            .with_thread_item_actions(ThreadItemActionsOption {
                feedback: Some(false),
                ..ThreadItemActionsOption::default()
            });

        if let Some(locale) = self.resolved_locale() {
            options = options.with_locale(locale);
        }
        if !self.composer_placeholder.is_empty() {
            options = options
                .with_composer(ComposerOption::default().with_placeholder(&self.composer_placeholder));
        }

        options
    }
}

pub struct SettingsStore {
    settings: PlaygroundSettings,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".chatkit-playground"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_disk(&config_path);
        Self {
            settings,
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn settings(&self) -> &PlaygroundSettings {
        &self.settings
    }

    pub fn update(&mut self, settings: PlaygroundSettings) -> Result<(), SettingsError> {
        let normalized_settings = settings.normalized();
        self.persist(&normalized_settings)?;
        self.settings = normalized_settings;
        Ok(())
    }

    fn load_from_disk(path: &PathBuf) -> PlaygroundSettings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return PlaygroundSettings::default();
        }

        let figment = Figment::from(Serialized::defaults(PlaygroundSettings::default()))
            .merge(Json::file(path));

        match figment.extract::<PlaygroundSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                PlaygroundSettings::default()
            }
        }
    }

    fn persist(&self, settings: &PlaygroundSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-settings-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(settings).context(SerializeConfigSnafu {
            stage: "serialize-settings-json",
        })?;

        let temp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-settings-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.config_path).context(RenameTempFileSnafu {
            stage: "rename-temporary-settings-file",
            from: temp_path,
            to: self.config_path.clone(),
        })?;

        tracing::info!("saved settings to {:?}", self.config_path);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to create settings directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize settings on `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write settings file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace settings file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_backfills_blank_fields() {
        let settings = PlaygroundSettings {
            api_url: "   ".to_string(),
            greeting: String::new(),
            ..PlaygroundSettings::default()
        }
        .normalized();

        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn unsupported_locale_falls_back_to_element_default() {
        let settings = PlaygroundSettings {
            locale: "tlh".to_string(),
            ..PlaygroundSettings::default()
        };
        assert!(settings.resolved_locale().is_none());

        let settings = PlaygroundSettings {
            locale: "fr".to_string(),
            ..PlaygroundSettings::default()
        };
        let locale = settings.resolved_locale().expect("fr is supported");
        assert_eq!(locale.resolve_translated(), "fr-FR");
    }

    #[test]
    fn host_options_carry_the_configured_surfaces() {
        let settings = PlaygroundSettings {
            composer_placeholder: "Ask anything...".to_string(),
            ..PlaygroundSettings::default()
        };
        let options = settings.to_host_options();

        let start_screen = options.start_screen.as_ref().expect("start screen set");
        assert_eq!(start_screen.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(start_screen.prompts.len(), 2);
        assert_eq!(
            options
                .composer
                .as_ref()
                .and_then(|composer| composer.placeholder.as_deref()),
            Some("Ask anything...")
        );
    }

    #[test]
    fn missing_settings_file_loads_defaults() {
        let store = SettingsStore::new(PathBuf::from("/nonexistent/chatkit/settings.json"));
        assert_eq!(store.settings(), &PlaygroundSettings::default());
    }

    #[test]
    fn malformed_settings_file_loads_defaults() {
        let dir = std::env::temp_dir().join(format!(
            "chatkit-playground-test-{}",
            uuid::Uuid::now_v7().as_simple()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();

        let store = SettingsStore::new(path);
        assert_eq!(store.settings(), &PlaygroundSettings::default());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!(
            "chatkit-playground-test-{}",
            uuid::Uuid::now_v7().as_simple()
        ));
        let path = dir.join(SETTINGS_FILE_NAME);

        let mut store = SettingsStore::new(path.clone());
        let updated = PlaygroundSettings {
            greeting: "Bonjour".to_string(),
            locale: "fr".to_string(),
            ..PlaygroundSettings::default()
        };
        store.update(updated.clone()).expect("persist settings");

        let reloaded = SettingsStore::new(path);
        assert_eq!(reloaded.settings().greeting, "Bonjour");
        assert_eq!(reloaded.settings().locale, "fr");

        let _ = std::fs::remove_dir_all(dir);
    }
}
