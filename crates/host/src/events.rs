//! The closed event set emitted by the element, its declarative name table,
//! and the per-commit handler record events dispatch into.

use chatkit_options::{Callback, JsonMap, ThreadId};

/// Every event the element can emit, without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Error,
    ResponseStart,
    ResponseEnd,
    Log,
    Effect,
    ThreadChange,
    ThreadLoadStart,
    ThreadLoadEnd,
}

/// The closed set, in subscription order.
pub const EVENT_KINDS: [EventKind; 9] = [
    EventKind::Ready,
    EventKind::Error,
    EventKind::ResponseStart,
    EventKind::ResponseEnd,
    EventKind::Log,
    EventKind::Effect,
    EventKind::ThreadChange,
    EventKind::ThreadLoadStart,
    EventKind::ThreadLoadEnd,
];

impl EventKind {
    /// Dotted event name on the element boundary.
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Ready => "chatkit.ready",
            Self::Error => "chatkit.error",
            Self::ResponseStart => "chatkit.response.start",
            Self::ResponseEnd => "chatkit.response.end",
            Self::Log => "chatkit.log",
            Self::Effect => "chatkit.effect",
            Self::ThreadChange => "chatkit.thread.change",
            Self::ThreadLoadStart => "chatkit.thread.load.start",
            Self::ThreadLoadEnd => "chatkit.thread.load.end",
        }
    }

    /// Handler key on the caller boundary: `on` + capitalized camel form of
    /// the dotted suffix.
    pub const fn handler_key(self) -> &'static str {
        match self {
            Self::Ready => "onReady",
            Self::Error => "onError",
            Self::ResponseStart => "onResponseStart",
            Self::ResponseEnd => "onResponseEnd",
            Self::Log => "onLog",
            Self::Effect => "onEffect",
            Self::ThreadChange => "onThreadChange",
            Self::ThreadLoadStart => "onThreadLoadStart",
            Self::ThreadLoadEnd => "onThreadLoadEnd",
        }
    }

    pub fn from_dom_name(name: &str) -> Option<Self> {
        EVENT_KINDS
            .into_iter()
            .find(|kind| kind.dom_name() == name)
    }
}

/// Error value surfaced by the element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementError {
    pub message: String,
}

impl ElementError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Diagnostic event usable for logging and analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub name: String,
    pub data: Option<JsonMap>,
}

/// Fire-and-forget client effect triggered by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectEvent {
    pub name: String,
    pub data: Option<JsonMap>,
}

/// One event emitted by the element, with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// The element frame finished loading.
    Ready,
    Error(ElementError),
    /// The assistant began sending a response.
    ResponseStart,
    /// The assistant finished sending a response.
    ResponseEnd,
    Log(LogEvent),
    Effect(EffectEvent),
    /// The active thread changed; `None` means the new thread view.
    ThreadChange { thread_id: Option<ThreadId> },
    /// The element started loading a thread.
    ThreadLoadStart { thread_id: ThreadId },
    /// The element finished loading a thread.
    ThreadLoadEnd { thread_id: ThreadId },
}

impl ElementEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::Error(_) => EventKind::Error,
            Self::ResponseStart => EventKind::ResponseStart,
            Self::ResponseEnd => EventKind::ResponseEnd,
            Self::Log(_) => EventKind::Log,
            Self::Effect(_) => EventKind::Effect,
            Self::ThreadChange { .. } => EventKind::ThreadChange,
            Self::ThreadLoadStart { .. } => EventKind::ThreadLoadStart,
            Self::ThreadLoadEnd { .. } => EventKind::ThreadLoadEnd,
        }
    }
}

/// Per-commit handler record: one optional callback per event kind.
///
/// Derived from the flat host options by the normalizer; dispatch looks the
/// handler up here at fire time, so swapping the record retargets live
/// subscriptions without resubscribing.
#[derive(Debug, Clone, Default)]
pub struct EventHandlers {
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

impl EventHandlers {
    /// Invokes the handler registered for the event, if any.
    ///
    /// Missing handlers drop the event silently, with one exception: an
    /// element error with no `onError` handler still reaches the log.
    pub fn dispatch(&self, event: ElementEvent) {
        match event {
            ElementEvent::Ready => {
                if let Some(handler) = &self.on_ready {
                    handler.call(());
                }
            }
            ElementEvent::Error(error) => match &self.on_error {
                Some(handler) => handler.call(error),
                None => {
                    tracing::error!(
                        message = %error.message,
                        "chatkit element reported an error and no onError handler is registered"
                    );
                }
            },
            ElementEvent::ResponseStart => {
                if let Some(handler) = &self.on_response_start {
                    handler.call(());
                }
            }
            ElementEvent::ResponseEnd => {
                if let Some(handler) = &self.on_response_end {
                    handler.call(());
                }
            }
            ElementEvent::Log(log) => {
                if let Some(handler) = &self.on_log {
                    handler.call(log);
                }
            }
            ElementEvent::Effect(effect) => {
                if let Some(handler) = &self.on_effect {
                    handler.call(effect);
                }
            }
            ElementEvent::ThreadChange { thread_id } => {
                if let Some(handler) = &self.on_thread_change {
                    handler.call(thread_id);
                }
            }
            ElementEvent::ThreadLoadStart { thread_id } => {
                if let Some(handler) = &self.on_thread_load_start {
                    handler.call(thread_id);
                }
            }
            ElementEvent::ThreadLoadEnd { thread_id } => {
                if let Some(handler) = &self.on_thread_load_end {
                    handler.call(thread_id);
                }
            }
        }
    }

    /// Returns true when a handler is registered for the kind.
    pub fn has_handler(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Ready => self.on_ready.is_some(),
            EventKind::Error => self.on_error.is_some(),
            EventKind::ResponseStart => self.on_response_start.is_some(),
            EventKind::ResponseEnd => self.on_response_end.is_some(),
            EventKind::Log => self.on_log.is_some(),
            EventKind::Effect => self.on_effect.is_some(),
            EventKind::ThreadChange => self.on_thread_change.is_some(),
            EventKind::ThreadLoadStart => self.on_thread_load_start.is_some(),
            EventKind::ThreadLoadEnd => self.on_thread_load_end.is_some(),
        }
    }

    /// Handler keys with a registered callback, in table order.
    pub fn registered_keys(&self) -> Vec<&'static str> {
        EVENT_KINDS
            .into_iter()
            .filter(|kind| self.has_handler(*kind))
            .map(EventKind::handler_key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn dotted_names_map_to_capitalized_camel_handler_keys() {
        assert_eq!(
            EventKind::ThreadLoadStart.dom_name(),
            "chatkit.thread.load.start"
        );
        assert_eq!(EventKind::ThreadLoadStart.handler_key(), "onThreadLoadStart");
        assert_eq!(EventKind::Ready.handler_key(), "onReady");
        assert_eq!(EventKind::ResponseEnd.dom_name(), "chatkit.response.end");
    }

    #[test]
    fn from_dom_name_inverts_dom_name_over_the_closed_set() {
        for kind in EVENT_KINDS {
            assert_eq!(EventKind::from_dom_name(kind.dom_name()), Some(kind));
        }
        assert_eq!(EventKind::from_dom_name("chatkit.unknown"), None);
    }

    #[test]
    fn handler_keys_follow_the_dotted_suffix() {
        for kind in EVENT_KINDS {
            let suffix = kind
                .dom_name()
                .strip_prefix("chatkit.")
                .expect("dom names share the element prefix");
            let camel: String = suffix
                .split('.')
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect();
            assert_eq!(kind.handler_key(), format!("on{camel}"));
        }
    }

    #[test]
    fn missing_handler_drops_the_event() {
        let handlers = EventHandlers::default();
        // Must not panic and must not invoke anything.
        handlers.dispatch(ElementEvent::ResponseStart);
        handlers.dispatch(ElementEvent::ThreadChange { thread_id: None });
    }

    #[test]
    fn error_event_reaches_the_registered_handler() {
        let seen = Arc::new(AtomicU32::new(0));
        let counter = seen.clone();
        let handlers = EventHandlers {
            on_error: Some(Callback::new(move |error: ElementError| {
                assert_eq!(error.message, "stream interrupted");
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            ..EventHandlers::default()
        };

        handlers.dispatch(ElementEvent::Error(ElementError::new("stream interrupted")));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_event_without_handler_is_logged_not_thrown() {
        let handlers = EventHandlers::default();
        handlers.dispatch(ElementEvent::Error(ElementError::new("boom")));
    }

    #[test]
    fn registered_keys_reports_table_order() {
        let handlers = EventHandlers {
            on_thread_change: Some(Callback::new(|_| {})),
            on_ready: Some(Callback::new(|_| {})),
            ..EventHandlers::default()
        };
        assert_eq!(handlers.registered_keys(), vec!["onReady", "onThreadChange"]);
    }
}
