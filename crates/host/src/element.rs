//! Outbound boundary: the element trait and the value types its methods
//! take, plus the cancellable listener-group mechanism.

use std::sync::Arc;

use chatkit_options::{ActionConfig, Attachment, ChatKitOptions, ThreadId};

use super::events::{ElementEvent, EventKind};

/// A user message submitted through the imperative surface.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMessage {
    pub text: String,
    /// Thread item this message replies to.
    pub reply_to: Option<String>,
    pub attachments: Vec<Attachment>,
    /// Starts a new thread instead of appending to the active one.
    pub new_thread: bool,
}

impl UserMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_to: None,
            attachments: Vec::new(),
            new_thread: false,
        }
    }

    pub fn with_reply_to(mut self, item_id: impl Into<String>) -> Self {
        self.reply_to = Some(item_id.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn in_new_thread(mut self) -> Self {
        self.new_thread = true;
        self
    }
}

/// Composer content set without sending a message.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerValue {
    pub text: String,
    pub reply_to: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl ComposerValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_to: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_reply_to(mut self, item_id: impl Into<String>) -> Self {
        self.reply_to = Some(item_id.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Application-defined action sent back to the backend, optionally tied to
/// the widget item that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAction {
    pub action: ActionConfig,
    pub item_id: Option<String>,
}

impl CustomAction {
    pub fn new(action: ActionConfig) -> Self {
        Self {
            action,
            item_id: None,
        }
    }

    pub fn for_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }
}

/// Listener invoked with each event the subscription's kind matches.
pub type EventListener = Arc<dyn Fn(ElementEvent) + Send + Sync>;

/// Token for one live subscription. Dropping it (or cancelling the group it
/// belongs to) detaches the listener.
pub struct ListenerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    fn trigger(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.trigger();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ListenerHandle")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// Cancellable group of the subscriptions attached by one commit.
///
/// A single `cancel` detaches every member in one step, so a rebind or
/// unmount can never leak listeners.
#[derive(Debug, Default)]
pub struct ListenerGroup {
    handles: Vec<ListenerHandle>,
}

impl ListenerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: ListenerHandle) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn cancel(mut self) {
        for handle in &mut self.handles {
            handle.trigger();
        }
        self.handles.clear();
    }
}

/// The externally supplied interactive element this layer drives.
///
/// Implementations are opaque: the host pushes full option sets (replace
/// semantics, never merge), forwards imperative calls, and subscribes
/// listeners; everything behind those calls belongs to the element.
pub trait ChatKitElement: Send + Sync {
    /// Applies a complete configuration record, replacing the previous one.
    fn set_options(&self, options: Arc<ChatKitOptions>);

    /// Focuses the composer input field.
    fn focus_composer(&self);

    /// Changes the active thread; `None` switches to the new thread view.
    fn set_thread_id(&self, thread_id: Option<ThreadId>);

    /// Sends a user message.
    fn send_user_message(&self, message: UserMessage);

    /// Sets the composer's content without sending.
    fn set_composer_value(&self, value: ComposerValue);

    /// Manually fetches updates from the backend.
    fn fetch_updates(&self);

    /// Sends an application-defined action to the backend.
    fn send_custom_action(&self, action: CustomAction);

    /// Attaches a listener for one event kind; the returned handle detaches
    /// it when cancelled or dropped.
    fn subscribe(&self, kind: EventKind, listener: EventListener) -> ListenerHandle;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn group_cancel_detaches_every_member_once() {
        let cancelled = Arc::new(AtomicU32::new(0));
        let mut group = ListenerGroup::new();
        for _ in 0..3 {
            let counter = cancelled.clone();
            group.push(ListenerHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(group.len(), 3);
        group.cancel();
        assert_eq!(cancelled.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn dropping_a_group_cancels_like_an_explicit_cancel() {
        let cancelled = Arc::new(AtomicU32::new(0));
        {
            let mut group = ListenerGroup::new();
            let counter = cancelled.clone();
            group.push(ListenerHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn message_builders_cover_the_optional_fields() {
        let message = UserMessage::new("hello")
            .with_reply_to("item_9")
            .in_new_thread();
        assert_eq!(message.reply_to.as_deref(), Some("item_9"));
        assert!(message.new_thread);
        assert!(message.attachments.is_empty());
    }
}
