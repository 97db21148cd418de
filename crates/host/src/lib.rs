#![deny(unsafe_code)]

//! Host-side integration layer for the embeddable chat element.
//!
//! Two cooperating pieces: the options normalizer splits a caller's flat
//! record into element configuration and event handlers once per distinct
//! input, and the element adapter binds a host component's commit lifecycle
//! to an element instance — pushing configuration on identity change,
//! rewiring event subscriptions as one cancellable group, and forwarding
//! events to whichever handler record is current at fire time.

/// Bind/commit/unbind lifecycle against one element instance.
pub mod adapter;
/// Shared imperative control surface.
pub mod control;
/// The element trait and its value types.
pub mod element;
pub mod error;
/// Closed event set, name table, and handler record.
pub mod events;
/// Flat options record and the identity-memoized partition.
pub mod normalize;
/// Injectable element-definition readiness seam.
pub mod registry;

pub use adapter::ElementAdapter;
pub use control::ChatKitControl;
pub use element::{
    ChatKitElement, ComposerValue, CustomAction, EventListener, ListenerGroup, ListenerHandle,
    UserMessage,
};
pub use error::{AdapterError, HostResult};
pub use events::{
    EVENT_KINDS, EffectEvent, ElementError, ElementEvent, EventHandlers, EventKind, LogEvent,
};
pub use normalize::{HostOptions, NormalizedOptions, OptionsNormalizer};
pub use registry::{DefinitionNotifier, ManualDefinitionNotifier};
