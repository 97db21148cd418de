//! Splits the caller's flat options record into the element configuration
//! and the event-handler record, with identity-keyed memoization.

use std::sync::Arc;

use chatkit_options::{
    ApiConfig, Callback, ChatKitOptions, ClientToolHandler, ComposerOption, DisclaimerOption,
    EntitiesOption, HeaderOption, HistoryOption, Locale, StartScreenOption, Theme, ThreadId,
    ThreadItemActionsOption, WidgetsOption,
};

use super::events::{EffectEvent, ElementError, EventHandlers, LogEvent};

/// The flat record a caller assembles per commit: declarative configuration
/// mixed with event-handler callbacks.
///
/// The split is a fixed, field-by-field partition. Every `on_*` event field
/// lands in the handler record; everything else — including
/// `on_client_tool`, which the element consumes inline from its own options
/// — lands in the configuration. The two sides are disjoint by
/// construction and together cover every field here.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub api: ApiConfig,
    pub locale: Option<Locale>,
    pub theme: Option<Theme>,
    pub initial_thread: Option<ThreadId>,
    /// Reserved exception: configuration, not an event handler.
    pub on_client_tool: Option<ClientToolHandler>,
    pub header: Option<HeaderOption>,
    pub history: Option<HistoryOption>,
    pub start_screen: Option<StartScreenOption>,
    pub thread_item_actions: Option<ThreadItemActionsOption>,
    pub composer: Option<ComposerOption>,
    pub disclaimer: Option<DisclaimerOption>,
    pub entities: Option<EntitiesOption>,
    pub widgets: Option<WidgetsOption>,

    pub on_ready: Option<Callback<()>>,
    pub on_error: Option<Callback<ElementError>>,
    pub on_response_start: Option<Callback<()>>,
    pub on_response_end: Option<Callback<()>>,
    pub on_log: Option<Callback<LogEvent>>,
    pub on_effect: Option<Callback<EffectEvent>>,
    pub on_thread_change: Option<Callback<Option<ThreadId>>>,
    pub on_thread_load_start: Option<Callback<ThreadId>>,
    pub on_thread_load_end: Option<Callback<ThreadId>>,
}

impl HostOptions {
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
            on_ready: None,
            on_error: None,
            on_response_start: None,
            on_response_end: None,
            on_log: None,
            on_effect: None,
            on_thread_change: None,
            on_thread_load_start: None,
            on_thread_load_end: None,
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

    pub fn on_ready(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Callback::new(move |()| handler()));
        self
    }

    pub fn on_error(mut self, handler: impl Fn(ElementError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Callback::new(handler));
        self
    }

    pub fn on_response_start(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_response_start = Some(Callback::new(move |()| handler()));
        self
    }

    pub fn on_response_end(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_response_end = Some(Callback::new(move |()| handler()));
        self
    }

    pub fn on_log(mut self, handler: impl Fn(LogEvent) + Send + Sync + 'static) -> Self {
        self.on_log = Some(Callback::new(handler));
        self
    }

    pub fn on_effect(mut self, handler: impl Fn(EffectEvent) + Send + Sync + 'static) -> Self {
        self.on_effect = Some(Callback::new(handler));
        self
    }

    pub fn on_thread_change(
        mut self,
        handler: impl Fn(Option<ThreadId>) + Send + Sync + 'static,
    ) -> Self {
        self.on_thread_change = Some(Callback::new(handler));
        self
    }

    pub fn on_thread_load_start(
        mut self,
        handler: impl Fn(ThreadId) + Send + Sync + 'static,
    ) -> Self {
        self.on_thread_load_start = Some(Callback::new(handler));
        self
    }

    pub fn on_thread_load_end(
        mut self,
        handler: impl Fn(ThreadId) + Send + Sync + 'static,
    ) -> Self {
        self.on_thread_load_end = Some(Callback::new(handler));
        self
    }
}

/// The partitioned output: element configuration and handler record, each
/// behind its own `Arc` so downstream identity checks stay cheap.
#[derive(Debug, Clone)]
pub struct NormalizedOptions {
    pub config: Arc<ChatKitOptions>,
    pub handlers: Arc<EventHandlers>,
}

impl NormalizedOptions {
    fn split(options: &HostOptions) -> Self {
        let config = ChatKitOptions {
            api: options.api.clone(),
            locale: options.locale.clone(),
            theme: options.theme.clone(),
            initial_thread: options.initial_thread.clone(),
            on_client_tool: options.on_client_tool.clone(),
            header: options.header.clone(),
            history: options.history.clone(),
            start_screen: options.start_screen.clone(),
            thread_item_actions: options.thread_item_actions.clone(),
            composer: options.composer.clone(),
            disclaimer: options.disclaimer.clone(),
            entities: options.entities.clone(),
            widgets: options.widgets.clone(),
        };

        let handlers = EventHandlers {
            on_ready: options.on_ready.clone(),
            on_error: options.on_error.clone(),
            on_response_start: options.on_response_start.clone(),
            on_response_end: options.on_response_end.clone(),
            on_log: options.on_log.clone(),
            on_effect: options.on_effect.clone(),
            on_thread_change: options.on_thread_change.clone(),
            on_thread_load_start: options.on_thread_load_start.clone(),
            on_thread_load_end: options.on_thread_load_end.clone(),
        };

        Self {
            config: Arc::new(config),
            handlers: Arc::new(handlers),
        }
    }
}

/// Recomputes the partition only when the input record's identity changes.
///
/// Reference-identical input yields reference-identical outputs, so
/// downstream effects keyed on `Arc::ptr_eq` never re-fire for an unchanged
/// record.
#[derive(Default)]
pub struct OptionsNormalizer {
    last: Option<(Arc<HostOptions>, NormalizedOptions)>,
}

impl OptionsNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, options: &Arc<HostOptions>) -> NormalizedOptions {
        if let Some((input, outputs)) = &self.last
            && Arc::ptr_eq(input, options)
        {
            return outputs.clone();
        }

        let outputs = NormalizedOptions::split(options);
        self.last = Some((Arc::clone(options), outputs.clone()));
        outputs
    }
}

#[cfg(test)]
mod tests {
    use chatkit_options::{AsyncCallback, ClientToolCall, ColorScheme, CustomApiConfig, JsonMap};

    use super::*;

    fn api() -> CustomApiConfig {
        CustomApiConfig::new("http://127.0.0.1:8000/chatkit", "domain_pk_local_dev")
    }

    #[test]
    fn event_callbacks_partition_away_from_configuration() {
        let options = Arc::new(
            HostOptions::new(api())
                .with_theme(ColorScheme::Dark)
                .on_error(|_| {})
                .on_ready(|| {})
                .on_client_tool(AsyncCallback::from_sync(|_: ClientToolCall| JsonMap::new())),
        );

        let normalized = OptionsNormalizer::new().normalize(&options);

        // Handler side: exactly the event callbacks.
        assert_eq!(
            normalized.handlers.registered_keys(),
            vec!["onReady", "onError"]
        );
        // Configuration side: declarative settings plus the reserved
        // client-tool exception.
        assert_eq!(
            normalized.config.theme,
            Some(Theme::Scheme(ColorScheme::Dark))
        );
        assert!(normalized.config.on_client_tool.is_some());
    }

    #[test]
    fn identical_input_identity_yields_identical_outputs() {
        let options = Arc::new(HostOptions::new(api()).on_ready(|| {}));
        let mut normalizer = OptionsNormalizer::new();

        let first = normalizer.normalize(&options);
        let second = normalizer.normalize(&options);

        assert!(Arc::ptr_eq(&first.config, &second.config));
        assert!(Arc::ptr_eq(&first.handlers, &second.handlers));
    }

    #[test]
    fn changed_input_identity_recomputes_both_outputs() {
        let mut normalizer = OptionsNormalizer::new();
        let first_input = Arc::new(HostOptions::new(api()));
        let first = normalizer.normalize(&first_input);

        // A fresh allocation, even with equal content, is a new identity.
        let second_input = Arc::new(HostOptions::new(api()));
        let second = normalizer.normalize(&second_input);

        assert!(!Arc::ptr_eq(&first.config, &second.config));
        assert!(!Arc::ptr_eq(&first.handlers, &second.handlers));
    }

    #[test]
    fn handler_callbacks_keep_their_identity_through_the_split() {
        let on_ready = Callback::new(|()| {});
        let mut options = HostOptions::new(api());
        options.on_ready = Some(on_ready.clone());
        let options = Arc::new(options);

        let normalized = OptionsNormalizer::new().normalize(&options);
        let split_handler = normalized
            .handlers
            .on_ready
            .as_ref()
            .expect("ready handler present");
        assert!(split_handler.same_callback(&on_ready));
    }
}
