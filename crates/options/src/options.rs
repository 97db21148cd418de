use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::api::ApiConfig;
use super::callback::{AsyncCallback, Callback};
use super::composer::ComposerOption;
use super::icons::{HeaderIcon, WidgetIcon};
use super::ids::ThreadId;
use super::locale::Locale;
use super::theme::Theme;
use super::widgets::{ActionConfig, JsonMap, WidgetRoot};

/// The full configuration record pushed into the element.
///
/// Value data, immutable per commit: callers rebuild it (or reuse the same
/// allocation) and the host compares by identity, never by content. Replace
/// semantics on push — the element always receives the complete set.
#[derive(Debug, Clone)]
pub struct ChatKitOptions {
    /// How the element communicates with its backend.
    pub api: ApiConfig,
    /// Locale override for the element UI; element falls back to English
    /// for anything unresolvable.
    pub locale: Option<Locale>,
    pub theme: Option<Theme>,
    /// Thread shown when the element mounts; `None` shows the new thread
    /// view.
    pub initial_thread: Option<ThreadId>,
    /// Handler for the client tools configured on the backend. Routed into
    /// the element's own options rather than wired as an event listener.
    pub on_client_tool: Option<ClientToolHandler>,
    pub header: Option<HeaderOption>,
    pub history: Option<HistoryOption>,
    pub start_screen: Option<StartScreenOption>,
    pub thread_item_actions: Option<ThreadItemActionsOption>,
    pub composer: Option<ComposerOption>,
    pub disclaimer: Option<DisclaimerOption>,
    pub entities: Option<EntitiesOption>,
    pub widgets: Option<WidgetsOption>,
}

impl ChatKitOptions {
    pub fn new(api: impl Into<ApiConfig>) -> Self {
        Self {
            api: api.into(),
            locale: None,
            theme: None,
            initial_thread: None,
            on_client_tool: None,
            header: None,
            history: None,
            start_screen: None,
            thread_item_actions: None,
            composer: None,
            disclaimer: None,
            entities: None,
            widgets: None,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_theme(mut self, theme: impl Into<Theme>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_initial_thread(mut self, thread_id: ThreadId) -> Self {
        self.initial_thread = Some(thread_id);
        self
    }

    pub fn with_header(mut self, header: HeaderOption) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_history(mut self, history: HistoryOption) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_start_screen(mut self, start_screen: StartScreenOption) -> Self {
        self.start_screen = Some(start_screen);
        self
    }

    pub fn with_thread_item_actions(mut self, actions: ThreadItemActionsOption) -> Self {
        self.thread_item_actions = Some(actions);
        self
    }

    pub fn with_composer(mut self, composer: ComposerOption) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn with_disclaimer(mut self, disclaimer: DisclaimerOption) -> Self {
        self.disclaimer = Some(disclaimer);
        self
    }

    pub fn with_entities(mut self, entities: EntitiesOption) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn with_widgets(mut self, widgets: WidgetsOption) -> Self {
        self.widgets = Some(widgets);
        self
    }

    pub fn on_client_tool(mut self, handler: ClientToolHandler) -> Self {
        self.on_client_tool = Some(handler);
        self
    }
}

/// A client tool invocation forwarded from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientToolCall {
    pub name: String,
    #[serde(default)]
    pub params: JsonMap,
}

/// Result payload sent back to the backend as the tool outcome.
pub type ClientToolResult = JsonMap;

/// Asynchronous handler invoked for each client tool call.
pub type ClientToolHandler = AsyncCallback<ClientToolCall, ClientToolResult>;

/// Header configuration.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<HeaderTitleOption>,
    /// Additional custom button on the left side of the header.
    #[serde(skip)]
    pub left_action: Option<HeaderActionConfig>,
    /// Additional custom button on the right side of the header.
    #[serde(skip)]
    pub right_action: Option<HeaderActionConfig>,
}

/// Header title display; defaults to showing thread titles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderTitleOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Static text shown instead of the current thread title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Custom header button: an icon plus a click callback.
#[derive(Debug, Clone)]
pub struct HeaderActionConfig {
    pub icon: HeaderIcon,
    pub on_click: Callback<()>,
}

impl HeaderActionConfig {
    pub fn new(icon: HeaderIcon, on_click: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            icon,
            on_click: Callback::new(move |()| on_click()),
        }
    }
}

/// History panel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_rename: Option<bool>,
}

/// New thread view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartScreenOption {
    /// Greeting text in the new thread view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    /// Starter prompts shown above the composer input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<StartScreenPrompt>,
}

impl StartScreenOption {
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    pub fn with_prompt(mut self, prompt: StartScreenPrompt) -> Self {
        self.prompts.push(prompt);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartScreenPrompt {
    /// Human-readable label shown for the prompt.
    pub label: String,
    /// Text inserted into the composer when the prompt is chosen.
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<WidgetIcon>,
}

impl StartScreenPrompt {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: WidgetIcon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Which per-response actions the element renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadItemActionsOption {
    /// Thumbs up / thumbs down buttons; feedback is sent to the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<bool>,
    /// Retry button in the response view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,
    /// Share button in the response view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<bool>,
}

/// Markdown disclaimer rendered below the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclaimerOption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<bool>,
}

impl DisclaimerOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            high_contrast: None,
        }
    }
}

/// A referenceable item such as a person, document, or internal business
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Human-readable name shown in tags, sources, and previews.
    pub title: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the entity can be clicked or previewed.
    #[serde(default)]
    pub interactive: bool,
    /// Human-readable group name, e.g. "People" or "Documents".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Metadata proxied to the backend; never interpreted here.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            icon: None,
            interactive: false,
            group: None,
            data: BTreeMap::new(),
        }
    }
}

/// Preview document returned for an interactive entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPreview {
    pub preview: Option<WidgetRoot>,
}

/// Entity tag callbacks: autocomplete search, click, and preview.
#[derive(Debug, Clone, Default)]
pub struct EntitiesOption {
    /// Returns entities matching an input query; powers tag autocomplete.
    pub on_tag_search: Option<AsyncCallback<String, Vec<Entity>>>,
    /// Called when a rendered entity is clicked.
    pub on_click: Option<Callback<Entity>>,
    /// Returns the preview document for an entity.
    pub on_request_preview: Option<AsyncCallback<Entity, EntityPreview>>,
}

/// Widget action callback.
#[derive(Debug, Clone, Default)]
pub struct WidgetsOption {
    /// Called when a widget action is triggered.
    pub on_action: Option<Callback<WidgetActionEvent>>,
}

/// Action fired by an interactive widget node, with the widget item that
/// hosted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetActionEvent {
    pub action: ActionConfig,
    pub item: WidgetItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetItem {
    pub id: String,
    pub widget: WidgetRoot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CustomApiConfig;

    #[test]
    fn builder_fills_only_requested_groups() {
        let options = ChatKitOptions::new(CustomApiConfig::new(
            "http://127.0.0.1:8000/chatkit",
            "domain_pk_local_dev",
        ))
        .with_start_screen(
            StartScreenOption::default()
                .with_greeting("What can I help with today?")
                .with_prompt(StartScreenPrompt::new("Try a greeting", "Hello!")),
        );

        assert!(options.header.is_none());
        assert!(options.on_client_tool.is_none());
        let start_screen = options.start_screen.expect("start screen configured");
        assert_eq!(start_screen.prompts.len(), 1);
        assert_eq!(
            start_screen.greeting.as_deref(),
            Some("What can I help with today?")
        );
    }

    #[test]
    fn entity_serializes_without_empty_metadata() {
        let entity = Entity::new("doc_1", "Q2 Planning Doc");
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["id"], "doc_1");
        assert!(json.get("data").is_none());
        assert_eq!(json["interactive"], false);
    }
}
