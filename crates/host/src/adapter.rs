//! Binds a host component's commit lifecycle to one element instance.
//!
//! The adapter owns the element handle for the binding's lifetime, pushes
//! configuration when (and only when) its identity changes, and rewires
//! event subscriptions as one cancellable group per commit. Configuration
//! that arrives before the element definition is available is deferred and
//! applied last-write-wins once the definition lands.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chatkit_options::ChatKitOptions;
use snafu::ensure;

use super::control::ChatKitControl;
use super::element::{ChatKitElement, EventListener, ListenerGroup};
use super::error::{AlreadyBoundSnafu, HostResult};
use super::events::{EVENT_KINDS, EventHandlers};
use super::normalize::NormalizedOptions;
use super::registry::DefinitionNotifier;

/// Binding lifecycle. Configuration pushes and event wiring only happen in
/// `Bound`; transitions are driven solely by the host lifecycle.
enum BindState {
    Unbound,
    Bound {
        element: Arc<dyn ChatKitElement>,
        listeners: Option<ListenerGroup>,
    },
}

pub struct ElementAdapter {
    control: Arc<ChatKitControl>,
    notifier: Arc<dyn DefinitionNotifier>,
    state: BindState,
    committed_config: Option<Arc<ChatKitOptions>>,
    committed_handlers: Option<Arc<EventHandlers>>,
    // Active-flag of the one deferred push that may still fire.
    pending_push: Option<Arc<AtomicBool>>,
}

impl ElementAdapter {
    pub fn new(notifier: Arc<dyn DefinitionNotifier>) -> Self {
        Self {
            control: Arc::new(ChatKitControl::new()),
            notifier,
            state: BindState::Unbound,
            committed_config: None,
            committed_handlers: None,
            pending_push: None,
        }
    }

    /// The shared imperative surface. Stays valid across bind/unbind cycles.
    pub fn control(&self) -> Arc<ChatKitControl> {
        Arc::clone(&self.control)
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindState::Bound { .. })
    }

    /// Attaches the element handle: `Unbound -> Bound`.
    ///
    /// Publishes the handle to the control and replays the latest committed
    /// options so a re-mounted element catches up immediately. At most one
    /// element handle is bound per adapter instance.
    pub fn bind(&mut self, element: Arc<dyn ChatKitElement>) -> HostResult<()> {
        ensure!(
            matches!(self.state, BindState::Unbound),
            AlreadyBoundSnafu {
                stage: "bind-element",
            }
        );

        self.control.set_instance(Some(Arc::clone(&element)));

        if let Some(config) = &self.committed_config {
            Self::push_config(&mut self.pending_push, &self.notifier, &element, config);
        }
        let mut listeners = None;
        if self.committed_handlers.is_some() {
            Self::wire_listeners(&self.control, &element, &mut listeners);
        }

        self.state = BindState::Bound { element, listeners };
        tracing::debug!("chatkit element bound");
        Ok(())
    }

    /// Detaches the element handle: `Bound -> Unbound`.
    ///
    /// Cancels the deferred configuration push and every live subscription
    /// in one step, then clears the published handle. No-op when unbound.
    pub fn unbind(&mut self) {
        Self::cancel_pending(&mut self.pending_push);

        if let BindState::Bound { listeners, .. } = &mut self.state {
            if let Some(group) = listeners.take() {
                group.cancel();
            }
            self.control.set_instance(None);
            tracing::debug!("chatkit element unbound");
        }
        self.state = BindState::Unbound;
    }

    /// Applies one commit of normalized options.
    ///
    /// Both sides are keyed on identity: an unchanged mapping is never
    /// re-applied. When both change, configuration is applied before the
    /// listener rebind.
    pub fn commit(&mut self, normalized: &NormalizedOptions) {
        let config_changed = !self
            .committed_config
            .as_ref()
            .is_some_and(|config| Arc::ptr_eq(config, &normalized.config));
        let handlers_changed = !self
            .committed_handlers
            .as_ref()
            .is_some_and(|handlers| Arc::ptr_eq(handlers, &normalized.handlers));

        self.committed_config = Some(Arc::clone(&normalized.config));
        if handlers_changed {
            self.committed_handlers = Some(Arc::clone(&normalized.handlers));
            // Live subscriptions look handlers up at fire time, so the swap
            // retargets them even before the rewire below.
            self.control.set_handlers(Arc::clone(&normalized.handlers));
        }

        if let BindState::Bound { element, listeners } = &mut self.state {
            if config_changed {
                Self::push_config(
                    &mut self.pending_push,
                    &self.notifier,
                    element,
                    &normalized.config,
                );
            }
            if handlers_changed {
                Self::wire_listeners(&self.control, element, listeners);
            }
        }
    }

    fn cancel_pending(pending: &mut Option<Arc<AtomicBool>>) {
        if let Some(flag) = pending.take() {
            flag.store(false, Ordering::SeqCst);
        }
    }

    fn push_config(
        pending: &mut Option<Arc<AtomicBool>>,
        notifier: &Arc<dyn DefinitionNotifier>,
        element: &Arc<dyn ChatKitElement>,
        config: &Arc<ChatKitOptions>,
    ) {
        // A newer configuration supersedes any still-deferred one.
        Self::cancel_pending(pending);

        if notifier.is_defined() {
            element.set_options(Arc::clone(config));
            return;
        }

        let active = Arc::new(AtomicBool::new(true));
        *pending = Some(Arc::clone(&active));
        let element = Arc::clone(element);
        let config = Arc::clone(config);
        tracing::debug!("element definition not ready; deferring configuration push");
        notifier.when_defined(Box::new(move || {
            if active.load(Ordering::SeqCst) {
                element.set_options(config);
            }
        }));
    }

    fn wire_listeners(
        control: &Arc<ChatKitControl>,
        element: &Arc<dyn ChatKitElement>,
        listeners: &mut Option<ListenerGroup>,
    ) {
        // Detach the previous commit's group before attaching the new one.
        if let Some(previous) = listeners.take() {
            previous.cancel();
        }

        let mut group = ListenerGroup::new();
        for kind in EVENT_KINDS {
            let control = Arc::clone(control);
            let listener: EventListener = Arc::new(move |event| control.dispatch(event));
            group.push(element.subscribe(kind, listener));
        }
        *listeners = Some(group);
    }
}

impl Drop for ElementAdapter {
    fn drop(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU64;

    use chatkit_options::{ColorScheme, CustomApiConfig, ThreadId};

    use super::super::element::{ComposerValue, CustomAction, ListenerHandle, UserMessage};
    use super::super::events::{ElementEvent, EventKind, LogEvent};
    use super::super::normalize::{HostOptions, OptionsNormalizer};
    use super::super::registry::ManualDefinitionNotifier;
    use super::*;

    type ListenerRegistry = Arc<Mutex<Vec<(EventKind, u64, EventListener)>>>;

    #[derive(Default)]
    struct MockElement {
        pushes: Mutex<Vec<Arc<ChatKitOptions>>>,
        listeners: ListenerRegistry,
        next_listener_id: AtomicU64,
    }

    impl MockElement {
        fn push_count(&self) -> usize {
            self.pushes.lock().unwrap().len()
        }

        fn last_push(&self) -> Option<Arc<ChatKitOptions>> {
            self.pushes.lock().unwrap().last().cloned()
        }

        fn listener_count(&self) -> usize {
            self.listeners.lock().unwrap().len()
        }

        fn emit(&self, event: ElementEvent) {
            let matching: Vec<EventListener> = self
                .listeners
                .lock()
                .unwrap()
                .iter()
                .filter(|(kind, _, _)| *kind == event.kind())
                .map(|(_, _, listener)| Arc::clone(listener))
                .collect();
            for listener in matching {
                listener(event.clone());
            }
        }
    }

    impl ChatKitElement for MockElement {
        fn set_options(&self, options: Arc<ChatKitOptions>) {
            self.pushes.lock().unwrap().push(options);
        }

        fn focus_composer(&self) {}
        fn set_thread_id(&self, _thread_id: Option<ThreadId>) {}
        fn send_user_message(&self, _message: UserMessage) {}
        fn set_composer_value(&self, _value: ComposerValue) {}
        fn fetch_updates(&self) {}
        fn send_custom_action(&self, _action: CustomAction) {}

        fn subscribe(&self, kind: EventKind, listener: EventListener) -> ListenerHandle {
            let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
            self.listeners.lock().unwrap().push((kind, id, listener));
            let registry = Arc::clone(&self.listeners);
            ListenerHandle::new(move || {
                registry
                    .lock()
                    .unwrap()
                    .retain(|(_, listener_id, _)| *listener_id != id);
            })
        }
    }

    fn host_options() -> HostOptions {
        HostOptions::new(CustomApiConfig::new(
            "http://127.0.0.1:8000/chatkit",
            "domain_pk_local_dev",
        ))
    }

    fn normalized(options: HostOptions) -> NormalizedOptions {
        OptionsNormalizer::new().normalize(&Arc::new(options))
    }

    #[test]
    fn unchanged_config_identity_is_never_pushed_twice() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        let commit = normalized(host_options().on_ready(|| {}));
        adapter.commit(&commit);
        adapter.commit(&commit);
        adapter.commit(&commit);

        assert_eq!(element.push_count(), 1);
    }

    #[test]
    fn changed_config_identity_pushes_again() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        adapter.commit(&normalized(host_options()));
        adapter.commit(&normalized(host_options().with_theme(ColorScheme::Dark)));

        assert_eq!(element.push_count(), 2);
    }

    #[test]
    fn deferred_push_applies_when_definition_lands() {
        let notifier = Arc::new(ManualDefinitionNotifier::new());
        let mut adapter = ElementAdapter::new(notifier.clone());
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        adapter.commit(&normalized(host_options()));
        assert_eq!(element.push_count(), 0);

        notifier.define();
        assert_eq!(element.push_count(), 1);
    }

    #[test]
    fn unmount_prevents_a_pending_deferred_push() {
        let notifier = Arc::new(ManualDefinitionNotifier::new());
        let mut adapter = ElementAdapter::new(notifier.clone());
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        adapter.commit(&normalized(host_options()));
        adapter.unbind();
        notifier.define();

        assert_eq!(element.push_count(), 0);
    }

    #[test]
    fn newer_commit_supersedes_a_deferred_push() {
        let notifier = Arc::new(ManualDefinitionNotifier::new());
        let mut adapter = ElementAdapter::new(notifier.clone());
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        adapter.commit(&normalized(host_options()));
        let newer = normalized(host_options().with_theme(ColorScheme::Dark));
        adapter.commit(&newer);

        notifier.define();

        // Only the newest configuration is ever applied.
        assert_eq!(element.push_count(), 1);
        let pushed = element.last_push().unwrap();
        assert!(Arc::ptr_eq(&pushed, &newer.config));
    }

    #[test]
    fn handler_update_detaches_old_listeners_before_attaching_new_ones() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        let first_seen = Arc::new(Mutex::new(Vec::new()));
        let sink = first_seen.clone();
        adapter.commit(&normalized(host_options().on_log(move |log: LogEvent| {
            sink.lock().unwrap().push(log.name);
        })));
        assert_eq!(element.listener_count(), EVENT_KINDS.len());

        let second_seen = Arc::new(Mutex::new(Vec::new()));
        let sink = second_seen.clone();
        adapter.commit(&normalized(host_options().on_log(move |log: LogEvent| {
            sink.lock().unwrap().push(log.name);
        })));

        // The rebind replaced, not accumulated, the subscriptions.
        assert_eq!(element.listener_count(), EVENT_KINDS.len());

        element.emit(ElementEvent::Log(LogEvent {
            name: "composer.focus".to_string(),
            data: None,
        }));

        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(*second_seen.lock().unwrap(), vec!["composer.focus"]);
    }

    #[test]
    fn binding_twice_fails_and_keeps_the_existing_binding() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let first = Arc::new(MockElement::default());
        let second = Arc::new(MockElement::default());

        adapter.bind(first).unwrap();
        let error = adapter.bind(second).unwrap_err();
        assert!(error.to_string().contains("already has a bound element"));
        assert!(adapter.is_bound());
    }

    #[test]
    fn rebinding_replays_the_latest_committed_configuration() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let first = Arc::new(MockElement::default());
        adapter.bind(first.clone()).unwrap();

        let commit = normalized(host_options().on_ready(|| {}));
        adapter.commit(&commit);
        adapter.unbind();
        assert_eq!(first.listener_count(), 0);

        let second = Arc::new(MockElement::default());
        adapter.bind(second.clone()).unwrap();

        assert_eq!(second.push_count(), 1);
        assert!(Arc::ptr_eq(&second.last_push().unwrap(), &commit.config));
        assert_eq!(second.listener_count(), EVENT_KINDS.len());
    }

    #[test]
    fn unbind_clears_the_published_control_handle() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let control = adapter.control();
        let element = Arc::new(MockElement::default());

        adapter.bind(element).unwrap();
        assert!(control.is_mounted());

        adapter.unbind();
        assert!(!control.is_mounted());
    }

    #[test]
    fn events_dispatch_through_the_current_handler_record() {
        let notifier = Arc::new(ManualDefinitionNotifier::defined());
        let mut adapter = ElementAdapter::new(notifier);
        let element = Arc::new(MockElement::default());
        adapter.bind(element.clone()).unwrap();

        let threads = Arc::new(Mutex::new(Vec::new()));
        let sink = threads.clone();
        adapter.commit(&normalized(host_options().on_thread_change(
            move |thread_id: Option<ThreadId>| {
                sink.lock().unwrap().push(thread_id);
            },
        )));

        element.emit(ElementEvent::ThreadChange {
            thread_id: Some(ThreadId::from("cthr_42")),
        });
        element.emit(ElementEvent::ThreadChange { thread_id: None });

        assert_eq!(
            *threads.lock().unwrap(),
            vec![Some(ThreadId::from("cthr_42")), None]
        );
    }
}
