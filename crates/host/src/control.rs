//! Shared imperative control surface.
//!
//! The control outlives any particular render of the hosting component: the
//! adapter publishes the element handle and the current handler record into
//! it, and callers hold it to issue imperative calls and to keep event
//! forwarding live across re-renders.

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use chatkit_options::ThreadId;

use super::element::{ChatKitElement, ComposerValue, CustomAction, UserMessage};
use super::events::{ElementEvent, EventHandlers};

// arc-swap needs a sized payload, so the trait object rides inside one.
struct BoundHandle {
    element: Arc<dyn ChatKitElement>,
}

/// Published element handle plus the fire-time handler record.
pub struct ChatKitControl {
    instance: ArcSwapOption<BoundHandle>,
    handlers: ArcSwap<EventHandlers>,
}

impl ChatKitControl {
    pub fn new() -> Self {
        Self {
            instance: ArcSwapOption::const_empty(),
            handlers: ArcSwap::from_pointee(EventHandlers::default()),
        }
    }

    /// Publishes (or clears) the bound element handle.
    pub(crate) fn set_instance(&self, element: Option<Arc<dyn ChatKitElement>>) {
        self.instance
            .store(element.map(|element| Arc::new(BoundHandle { element })));
    }

    /// Swaps the handler record live subscriptions dispatch through.
    pub(crate) fn set_handlers(&self, handlers: Arc<EventHandlers>) {
        self.handlers.store(handlers);
    }

    /// Current handler record snapshot.
    pub fn handlers(&self) -> Arc<EventHandlers> {
        self.handlers.load_full()
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.load().is_some()
    }

    /// Routes one element event to the handler registered *now*, not the
    /// one registered when the subscription was attached.
    pub fn dispatch(&self, event: ElementEvent) {
        self.handlers.load().dispatch(event);
    }

    fn element(&self, method: &'static str) -> Option<Arc<dyn ChatKitElement>> {
        match self.instance.load_full() {
            Some(handle) => Some(Arc::clone(&handle.element)),
            None => {
                tracing::warn!(method, "chatkit element is not mounted");
                None
            }
        }
    }

    /// Focuses the composer input field.
    pub fn focus_composer(&self) {
        if let Some(element) = self.element("focus_composer") {
            element.focus_composer();
        }
    }

    /// Changes the active thread; `None` switches to the new thread view.
    pub fn set_thread_id(&self, thread_id: Option<ThreadId>) {
        if let Some(element) = self.element("set_thread_id") {
            element.set_thread_id(thread_id);
        }
    }

    /// Sends a user message through the bound element.
    pub fn send_user_message(&self, message: UserMessage) {
        if let Some(element) = self.element("send_user_message") {
            element.send_user_message(message);
        }
    }

    /// Sets the composer's content without sending.
    pub fn set_composer_value(&self, value: ComposerValue) {
        if let Some(element) = self.element("set_composer_value") {
            element.set_composer_value(value);
        }
    }

    /// Manually fetches updates from the backend.
    pub fn fetch_updates(&self) {
        if let Some(element) = self.element("fetch_updates") {
            element.fetch_updates();
        }
    }

    /// Sends an application-defined action to the backend.
    pub fn send_custom_action(&self, action: CustomAction) {
        if let Some(element) = self.element("send_custom_action") {
            element.send_custom_action(action);
        }
    }
}

impl Default for ChatKitControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chatkit_options::Callback;

    use super::super::element::{EventListener, ListenerHandle};
    use super::super::events::EventKind;
    use super::*;

    #[derive(Default)]
    struct CallLog {
        calls: Mutex<Vec<String>>,
    }

    impl CallLog {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct LoggingElement {
        log: Arc<CallLog>,
    }

    impl ChatKitElement for LoggingElement {
        fn set_options(&self, _options: Arc<chatkit_options::ChatKitOptions>) {
            self.log.record("set_options");
        }

        fn focus_composer(&self) {
            self.log.record("focus_composer");
        }

        fn set_thread_id(&self, thread_id: Option<ThreadId>) {
            self.log.record(format!("set_thread_id:{thread_id:?}"));
        }

        fn send_user_message(&self, message: UserMessage) {
            self.log.record(format!("send_user_message:{}", message.text));
        }

        fn set_composer_value(&self, value: ComposerValue) {
            self.log.record(format!("set_composer_value:{}", value.text));
        }

        fn fetch_updates(&self) {
            self.log.record("fetch_updates");
        }

        fn send_custom_action(&self, action: CustomAction) {
            self.log
                .record(format!("send_custom_action:{}", action.action.action_type));
        }

        fn subscribe(&self, _kind: EventKind, _listener: EventListener) -> ListenerHandle {
            ListenerHandle::new(|| {})
        }
    }

    #[test]
    fn unmounted_calls_warn_and_do_nothing() {
        let control = ChatKitControl::new();
        assert!(!control.is_mounted());

        // Each call must return without panicking.
        control.focus_composer();
        control.send_user_message(UserMessage::new("hello"));
        control.fetch_updates();
    }

    #[test]
    fn mounted_calls_forward_to_the_element() {
        let log = Arc::new(CallLog::default());
        let control = ChatKitControl::new();
        control.set_instance(Some(Arc::new(LoggingElement { log: log.clone() })));

        control.focus_composer();
        control.send_user_message(UserMessage::new("hi"));
        control.set_thread_id(None);

        assert_eq!(
            log.calls(),
            vec!["focus_composer", "send_user_message:hi", "set_thread_id:None"]
        );
    }

    #[test]
    fn dispatch_reads_the_handler_record_at_fire_time() {
        let control = ChatKitControl::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        control.set_handlers(Arc::new(EventHandlers {
            on_ready: Some(Callback::new(move |()| first.lock().unwrap().push("first"))),
            ..EventHandlers::default()
        }));
        control.dispatch(ElementEvent::Ready);

        let second = seen.clone();
        control.set_handlers(Arc::new(EventHandlers {
            on_ready: Some(Callback::new(move |()| second.lock().unwrap().push("second"))),
            ..EventHandlers::default()
        }));
        control.dispatch(ElementEvent::Ready);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }
}
