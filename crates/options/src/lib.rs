#![deny(unsafe_code)]

//! Typed configuration surface for the embeddable chat element.
//!
//! Everything here is declarative value data plus opaque callback handles:
//! the option groups a caller assembles per commit, the widget tree nodes
//! passed through to the element unopened, and the wrappers that give
//! caller-supplied closures identity semantics.

/// Backend transport and authentication descriptors.
pub mod api;
/// Callback wrappers with identity semantics.
pub mod callback;
/// Composer, attachment, tool, and model options.
pub mod composer;
pub mod error;
/// Icon vocabularies shared by widgets and the header.
pub mod icons;
pub mod ids;
/// Locale tags and translated-locale resolution.
pub mod locale;
/// The root options record and per-surface option groups.
pub mod options;
pub mod theme;
/// Declarative widget tree nodes, passed through unopened.
pub mod widgets;

pub use api::{
    ApiConfig, ClientSecretError, ClientSecretProvider, CustomApiConfig, FileUploadStrategy,
    HostedApiConfig,
};
pub use callback::{AsyncCallback, BoxFuture, Callback};
pub use composer::{
    Attachment, AttachmentsOption, ComposerOption, DEFAULT_MAX_ATTACHMENT_COUNT,
    DEFAULT_MAX_ATTACHMENT_SIZE, ModelOption, ToolOption,
};
pub use error::{OptionsError, OptionsResult};
pub use icons::{HeaderIcon, WidgetIcon};
pub use ids::ThreadId;
pub use locale::{DEFAULT_LOCALE, Locale, TRANSLATED_LOCALES};
pub use options::{
    ChatKitOptions, ClientToolCall, ClientToolHandler, ClientToolResult, DisclaimerOption,
    EntitiesOption, Entity, EntityPreview, HeaderActionConfig, HeaderOption, HeaderTitleOption,
    HistoryOption, StartScreenOption, StartScreenPrompt, ThreadItemActionsOption,
    WidgetActionEvent, WidgetItem, WidgetsOption,
};
pub use theme::{
    AccentColor, AccentLevel, BaseFontSize, ColorOption, ColorScheme, Density, FontObject, Radius,
    SurfaceColors, Theme, ThemeOption, TypographyOption,
};
pub use widgets::{ActionConfig, JsonMap, WidgetComponent, WidgetRoot};
