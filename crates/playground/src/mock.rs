use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;
use uuid::Uuid;

use chatkit_host::{
    ChatKitElement, ComposerValue, CustomAction, ElementEvent, EventKind, EventListener,
    ListenerHandle, UserMessage,
};
use chatkit_options::{ChatKitOptions, ThreadId};

/// Everything the playground observed crossing the outbound boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    SetOptions,
    FocusComposer,
    SetThreadId(Option<ThreadId>),
    SendUserMessage(String),
    SetComposerValue(String),
    FetchUpdates,
    SendCustomAction(String),
}

type ListenerRegistry = Arc<Mutex<Vec<(EventKind, u64, EventListener)>>>;

/// Stand-in element: records imperative calls, keeps the last pushed
/// options, and delivers emitted events to live subscriptions only.
#[derive(Default)]
pub struct MockElement {
    calls: Mutex<Vec<RecordedCall>>,
    options: ArcSwapOption<ChatKitOptions>,
    listeners: ListenerRegistry,
    next_listener_id: AtomicU64,
}

impl MockElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    pub fn options(&self) -> Option<Arc<ChatKitOptions>> {
        self.options.load_full()
    }

    pub fn push_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RecordedCall::SetOptions))
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().expect("mock registry poisoned").len()
    }

    /// Delivers one event to every live subscription of its kind.
    pub fn emit(&self, event: ElementEvent) {
        let matching: Vec<EventListener> = self
            .listeners
            .lock()
            .expect("mock registry poisoned")
            .iter()
            .filter(|(kind, _, _)| *kind == event.kind())
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(kind = event.kind().dom_name(), "mock element emitting event");
        for listener in matching {
            listener(event.clone());
        }
    }

    /// Emits a thread change carrying a freshly minted thread id.
    pub fn simulate_thread_change(&self) -> ThreadId {
        let thread_id = ThreadId::new(format!("cthr_{}", Uuid::now_v7().as_simple()));
        self.emit(ElementEvent::ThreadChange {
            thread_id: Some(thread_id.clone()),
        });
        thread_id
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }
}

impl ChatKitElement for MockElement {
    fn set_options(&self, options: Arc<ChatKitOptions>) {
        self.options.store(Some(Arc::clone(&options)));
        self.record(RecordedCall::SetOptions);
    }

    fn focus_composer(&self) {
        self.record(RecordedCall::FocusComposer);
    }

    fn set_thread_id(&self, thread_id: Option<ThreadId>) {
        self.record(RecordedCall::SetThreadId(thread_id));
    }

    fn send_user_message(&self, message: UserMessage) {
        self.record(RecordedCall::SendUserMessage(message.text));
    }

    fn set_composer_value(&self, value: ComposerValue) {
        self.record(RecordedCall::SetComposerValue(value.text));
    }

    fn fetch_updates(&self) {
        self.record(RecordedCall::FetchUpdates);
    }

    fn send_custom_action(&self, action: CustomAction) {
        self.record(RecordedCall::SendCustomAction(action.action.action_type));
    }

    fn subscribe(&self, kind: EventKind, listener: EventListener) -> ListenerHandle {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .expect("mock registry poisoned")
            .push((kind, id, listener));

        let registry = Arc::clone(&self.listeners);
        ListenerHandle::new(move || {
            registry
                .lock()
                .expect("mock registry poisoned")
                .retain(|(_, listener_id, _)| *listener_id != id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_subscriptions_no_longer_receive_events() {
        let element = MockElement::new();
        let seen = Arc::new(Mutex::new(0_u32));

        let sink = seen.clone();
        let handle = element.subscribe(
            EventKind::Ready,
            Arc::new(move |_| {
                *sink.lock().unwrap() += 1;
            }),
        );

        element.emit(ElementEvent::Ready);
        drop(handle);
        element.emit(ElementEvent::Ready);

        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(element.listener_count(), 0);
    }

    #[test]
    fn minted_thread_ids_are_unique() {
        let element = MockElement::new();
        let first = element.simulate_thread_change();
        let second = element.simulate_thread_change();
        assert_ne!(first, second);
    }
}
