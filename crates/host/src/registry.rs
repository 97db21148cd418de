//! Injectable "element definition is ready" notification seam.
//!
//! The environment that hosts the element decides when its definition is
//! available; the adapter only asks "now?" and "tell me when". Keeping this
//! behind a trait (instead of a process-wide registry lookup) lets tests
//! and non-browser hosts drive the timing explicitly.

use std::sync::Mutex;

type Waiter = Box<dyn FnOnce() + Send>;

/// Reports whether the element definition is available, and runs one-shot
/// waiters when it becomes so.
pub trait DefinitionNotifier: Send + Sync {
    fn is_defined(&self) -> bool;

    /// Runs `waiter` once the definition is available. If it already is,
    /// the waiter runs immediately.
    fn when_defined(&self, waiter: Waiter);
}

/// In-process notifier driven by an explicit `define` call.
#[derive(Default)]
pub struct ManualDefinitionNotifier {
    state: Mutex<NotifierState>,
}

#[derive(Default)]
struct NotifierState {
    defined: bool,
    waiters: Vec<Waiter>,
}

impl ManualDefinitionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the definition already available.
    pub fn defined() -> Self {
        Self {
            state: Mutex::new(NotifierState {
                defined: true,
                waiters: Vec::new(),
            }),
        }
    }

    /// Marks the definition available and flushes queued waiters in order.
    pub fn define(&self) {
        let waiters = {
            let mut state = self.state.lock().expect("notifier lock poisoned");
            if state.defined {
                return;
            }
            state.defined = true;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            waiter();
        }
    }

    /// Number of waiters still queued.
    pub fn pending_waiters(&self) -> usize {
        self.state.lock().expect("notifier lock poisoned").waiters.len()
    }
}

impl DefinitionNotifier for ManualDefinitionNotifier {
    fn is_defined(&self) -> bool {
        self.state.lock().expect("notifier lock poisoned").defined
    }

    fn when_defined(&self, waiter: Waiter) {
        {
            let mut state = self.state.lock().expect("notifier lock poisoned");
            if !state.defined {
                state.waiters.push(waiter);
                return;
            }
        }
        waiter();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn waiter_runs_immediately_when_already_defined() {
        let notifier = ManualDefinitionNotifier::defined();
        let fired = Arc::new(AtomicU32::new(0));
        let counter = fired.clone();
        notifier.when_defined(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.pending_waiters(), 0);
    }

    #[test]
    fn queued_waiters_flush_in_order_on_define() {
        let notifier = ManualDefinitionNotifier::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for index in 0..3 {
            let order = order.clone();
            notifier.when_defined(Box::new(move || {
                order.lock().unwrap().push(index);
            }));
        }

        assert_eq!(notifier.pending_waiters(), 3);
        assert!(!notifier.is_defined());

        notifier.define();
        assert!(notifier.is_defined());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn define_is_idempotent() {
        let notifier = ManualDefinitionNotifier::new();
        notifier.define();
        notifier.define();
        assert!(notifier.is_defined());
    }
}
