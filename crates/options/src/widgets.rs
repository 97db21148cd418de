//! Declarative widget tree nodes.
//!
//! A closed set of tagged variants forming a tree: containers at the inner
//! nodes, display and input primitives at the leaves. The host passes these
//! through to the element unopened; nothing in this workspace interprets
//! them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::icons::WidgetIcon;

/// Arbitrary JSON payload attached to actions and diagnostics.
pub type JsonMap = Map<String, Value>;

/// Top-level widget documents the element can render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WidgetRoot {
    Card(Card),
    ListView(ListView),
    #[serde(rename = "Basic")]
    Basic(BasicRoot),
}

/// Every non-root node the closed set admits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WidgetComponent {
    Text(TextNode),
    Title(Title),
    Caption(Caption),
    Badge(Badge),
    Markdown(Markdown),
    Box(BoxNode),
    Row(RowNode),
    Col(ColNode),
    Divider(Divider),
    Icon(IconNode),
    Image(ImageNode),
    Button(Button),
    Checkbox(Checkbox),
    Spacer(Spacer),
    Select(Select),
    DatePicker(DatePicker),
    Form(Form),
    Input(Input),
    Label(LabelNode),
    RadioGroup(RadioGroup),
    Textarea(Textarea),
    Transition(Transition),
}

// Containers

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicRoot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub children: Vec<BasicChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<WidgetTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<SpacingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<Justification>,
}

/// A basic root nests both components and further roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasicChild {
    Component(Box<WidgetComponent>),
    Root(Box<WidgetRoot>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_form: Option<bool>,
    pub children: Vec<WidgetComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CardSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<SpacingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WidgetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<CardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<CardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<WidgetTheme>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Sm,
    Md,
    Lg,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub children: Vec<ListViewItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<ListLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WidgetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<WidgetTheme>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListLimit {
    Count(u32),
    Auto(ListLimitAuto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListLimitAuto {
    Auto,
}

/// Only valid as a direct child of a `ListView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub struct ListViewItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub children: Vec<WidgetComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
}

// Layout components

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(flatten)]
    pub base: BoxBaseProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub base: BoxBaseProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub base: BoxBaseProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_submit_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(flatten)]
    pub base: BoxBaseProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<LengthValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Divider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush: Option<bool>,
}

/// Wraps one component whose replacement animates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub children: Box<WidgetComponent>,
}

// Text components

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TitleSize>,
    #[serde(flatten)]
    pub text: BaseTextProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CaptionSize>,
    #[serde(flatten)]
    pub text: BaseTextProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_through: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_lines: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<TextEditable>,
    #[serde(flatten)]
    pub text: BaseTextProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextEditable {
    /// Only `false` is meaningful; `true` requires the full settings form.
    Flag(bool),
    Settings(EditableText),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableText {
    /// Field name submitted with the enclosing form.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_focus: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_complete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_autofill_extensions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Markdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
}

// Content components

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<BadgeColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<BadgeVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<BadgeSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pill: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    Discovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Solid,
    Soft,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeSize {
    Sm,
    Md,
    Lg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: WidgetIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<IconSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ImagePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush: Option<bool>,
    #[serde(flatten)]
    pub block: BlockProps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    Cover,
    Contain,
    Fill,
    ScaleDown,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImagePosition {
    #[serde(rename = "top left")]
    TopLeft,
    #[serde(rename = "top")]
    Top,
    #[serde(rename = "top right")]
    TopRight,
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "center")]
    Center,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "bottom left")]
    BottomLeft,
    #[serde(rename = "bottom")]
    Bottom,
    #[serde(rename = "bottom right")]
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Submits the enclosing form when true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_start: Option<WidgetIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_end: Option<WidgetIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<ButtonIconSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ButtonColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ControlVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ControlSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonIconSize {
    Sm,
    Md,
    Lg,
    Xl,
    #[serde(rename = "2xl")]
    TwoXl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    Primary,
    Secondary,
    Info,
    Discovery,
    Success,
    Caution,
    Warning,
    Danger,
}

// Form controls

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Field name submitted with the enclosing form.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_autofill_extensions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_focus: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<FieldVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ControlSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter_size: Option<GutterSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pill: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Number,
    Email,
    Text,
    Password,
    Tel,
    Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Textarea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_focus: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<FieldVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ControlSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter_size: Option<GutterSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_autofill_extensions: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Select {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ControlVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ControlSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePicker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// ISO datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// ISO datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    /// ISO datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ControlVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ControlSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<PopoverSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<PopoverAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopoverSide {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopoverAlign {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkbox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RadioOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_change_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    /// Name of the form field this label describes.
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeightKeyword>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
}

// Shared prop types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetTheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Row,
    Col,
}

/// `number | string` union used by sizing props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthValue {
    Number(f64),
    Text(String),
}

impl From<f64> for LengthValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LengthValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// `number | string | Spacing` union used by padding and margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpacingValue {
    Number(f64),
    Text(String),
    Edges(Spacing),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<LengthValue>,
}

/// Plain CSS color or a light/dark pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Css(String),
    Themed(ThemeColor),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub dark: String,
    pub light: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BorderStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

/// `number | Border | Borders` union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderValue {
    Width(f64),
    Uniform(Border),
    Edges(Borders),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Borders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<BorderEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderEdge {
    Width(f64),
    Detailed(Border),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadiusValue {
    #[serde(rename = "2xs")]
    TwoXs,
    #[serde(rename = "xs")]
    Xs,
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    TwoXl,
    #[serde(rename = "3xl")]
    ThreeXl,
    #[serde(rename = "4xl")]
    FourXl,
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "100%")]
    FullPercent,
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Start,
    Center,
    End,
    Baseline,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Start,
    Center,
    End,
    Between,
    Around,
    Evenly,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexWrap {
    Nowrap,
    Wrap,
    WrapReverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlVariant {
    Solid,
    Soft,
    Outline,
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldVariant {
    Soft,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSize {
    #[serde(rename = "3xs")]
    ThreeXs,
    #[serde(rename = "2xs")]
    TwoXs,
    #[serde(rename = "xs")]
    Xs,
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    TwoXl,
    #[serde(rename = "3xl")]
    ThreeXl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GutterSize {
    #[serde(rename = "2xs")]
    TwoXs,
    #[serde(rename = "xs")]
    Xs,
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleSize {
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    TwoXl,
    #[serde(rename = "3xl")]
    ThreeXl,
    #[serde(rename = "4xl")]
    FourXl,
    #[serde(rename = "5xl")]
    FiveXl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSize {
    Sm,
    Md,
    Lg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconSize {
    #[serde(rename = "xs")]
    Xs,
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    TwoXl,
    #[serde(rename = "3xl")]
    ThreeXl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeightKeyword {
    Normal,
    Medium,
    Semibold,
    Bold,
}

/// Status line rendered at the top of a card or list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetStatus {
    WithFavicon {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        favicon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame: Option<bool>,
    },
    WithIcon {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<WidgetIcon>,
    },
}

/// Application-defined action attached to interactive nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonMap>,
}

impl ActionConfig {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonMap) -> Self {
        self.payload = Some(payload);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAction {
    pub label: String,
    pub action: ActionConfig,
}

/// Sizing and framing props shared by block-level nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<RadiusValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<SpacingValue>,
}

/// Layout props shared by box-like containers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxBaseProps {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WidgetComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<Justification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<FlexWrap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<LengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<SpacingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorValue>,
    #[serde(flatten)]
    pub block: BlockProps,
}

/// Text props shared by text-like leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTextProps {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeightKeyword>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u32>,
}

impl BaseTextProps {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            color: None,
            weight: None,
            text_align: None,
            truncate: None,
            max_lines: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_is_internally_tagged() {
        let root = WidgetRoot::Card(Card {
            key: None,
            id: Some("card-1".to_string()),
            as_form: None,
            children: vec![WidgetComponent::Title(Title {
                key: None,
                id: None,
                size: Some(TitleSize::Lg),
                text: BaseTextProps::new("Order summary"),
            })],
            background: None,
            size: Some(CardSize::Md),
            padding: None,
            status: None,
            collapsed: None,
            confirm: None,
            cancel: None,
            theme: None,
        });

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["type"], "Card");
        assert_eq!(json["children"][0]["type"], "Title");
        assert_eq!(json["children"][0]["value"], "Order summary");

        let parsed: WidgetRoot = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn list_view_item_actions_keep_wire_shape() {
        let item = ListViewItem {
            key: None,
            id: Some("row-1".to_string()),
            children: Vec::new(),
            on_click_action: Some(
                ActionConfig::new("open_claim").with_payload(JsonMap::from_iter([(
                    "claim".to_string(),
                    Value::String("A-1023".to_string()),
                )])),
            ),
            gap: Some(LengthValue::Number(8.0)),
            align: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["onClickAction"]["type"], "open_claim");
        assert_eq!(json["onClickAction"]["payload"]["claim"], "A-1023");
        assert_eq!(json["gap"], 8.0);
    }

    #[test]
    fn length_unions_accept_numbers_and_strings() {
        let parsed: LengthValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(parsed, LengthValue::Number(12.5));

        let parsed: LengthValue = serde_json::from_str("\"100%\"").unwrap();
        assert_eq!(parsed, LengthValue::Text("100%".to_string()));

        let parsed: SpacingValue = serde_json::from_str("{\"x\": 4, \"y\": \"1rem\"}").unwrap();
        assert_eq!(
            parsed,
            SpacingValue::Edges(Spacing {
                x: Some(LengthValue::Number(4.0)),
                y: Some(LengthValue::Text("1rem".to_string())),
                ..Spacing::default()
            })
        );
    }

    #[test]
    fn basic_root_nests_components_and_roots() {
        let json = serde_json::json!({
            "type": "Basic",
            "direction": "col",
            "children": [
                { "type": "Text", "value": "hello" },
                { "type": "ListView", "children": [] }
            ]
        });

        let parsed: WidgetRoot = serde_json::from_value(json).unwrap();
        let WidgetRoot::Basic(basic) = parsed else {
            panic!("expected basic root");
        };
        assert_eq!(basic.children.len(), 2);
        assert!(matches!(basic.children[0], BasicChild::Component(_)));
        assert!(matches!(basic.children[1], BasicChild::Root(_)));
    }
}
