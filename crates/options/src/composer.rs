use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::icons::WidgetIcon;

/// Default attachment size cap: 100 MiB.
pub const DEFAULT_MAX_ATTACHMENT_SIZE: u64 = 100 * 1024 * 1024;
/// Default number of attachments per message.
pub const DEFAULT_MAX_ATTACHMENT_COUNT: u32 = 10;

/// Composer configuration: placeholder, attachments, tool menu, model picker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Attachments are disabled entirely when not configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<AttachmentsOption>,
    /// When non-empty, the user can select a tool from a composer menu.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolOption>,
    /// Models the user can choose from before sending a message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelOption>,
}

impl ComposerOption {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_attachments(mut self, attachments: AttachmentsOption) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn with_tool(mut self, tool: ToolOption) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_model(mut self, model: ModelOption) -> Self {
        self.models.push(model);
        self
    }
}

/// File attachment policy for the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentsOption {
    pub enabled: bool,
    /// Maximum size of one attachment in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Maximum number of attachments in a single message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
    /// Accepted MIME types mapped to their extensions. Empty means all.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub accept: BTreeMap<String, Vec<String>>,
}

impl AttachmentsOption {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            max_size: None,
            max_count: None,
            accept: BTreeMap::new(),
        }
    }

    pub fn effective_max_size(&self) -> u64 {
        self.max_size.unwrap_or(DEFAULT_MAX_ATTACHMENT_SIZE)
    }

    pub fn effective_max_count(&self) -> u32 {
        self.max_count.unwrap_or(DEFAULT_MAX_ATTACHMENT_COUNT)
    }
}

/// Selectable tool shown in the composer menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOption {
    pub id: String,
    /// Label displayed in the tool menu.
    pub label: String,
    /// Icon displayed next to the tool in the menu.
    pub icon: WidgetIcon,
    /// Label displayed in the button when the tool is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_label: Option<String>,
    /// Placeholder shown in the composer while the tool is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_override: Option<String>,
    /// Pinned tools render outside the menu.
    #[serde(default)]
    pub pinned: bool,
    /// Persistent tools stay selected across message submissions.
    #[serde(default)]
    pub persistent: bool,
}

impl ToolOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: WidgetIcon) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon,
            short_label: None,
            placeholder_override: None,
            pinned: false,
            persistent: false,
        }
    }
}

/// Selectable model option shown to end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOption {
    /// Identifier used when submitting a message.
    pub id: String,
    /// Label displayed in the model picker.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Visible but not selectable when true.
    #[serde(default)]
    pub disabled: bool,
    /// Marks the default selected option.
    #[serde(default)]
    pub default: bool,
}

impl ModelOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            disabled: false,
            default: false,
        }
    }
}

/// Attachment associated with a user message. Must already be uploaded by
/// the backend before it is referenced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    File {
        /// Server-generated identifier for the uploaded file.
        id: String,
        /// Original filename shown in the UI.
        name: String,
        mime_type: String,
    },
    Image {
        /// Server-generated identifier for the uploaded image.
        id: String,
        /// URL used to render the image preview.
        preview_url: String,
        name: String,
        mime_type: String,
    },
}

impl Attachment {
    pub fn id(&self) -> &str {
        match self {
            Self::File { id, .. } | Self::Image { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Image { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_policy_falls_back_to_documented_defaults() {
        let policy = AttachmentsOption::enabled();
        assert_eq!(policy.effective_max_size(), 100 * 1024 * 1024);
        assert_eq!(policy.effective_max_count(), 10);

        let policy = AttachmentsOption {
            max_size: Some(1024),
            max_count: Some(2),
            ..AttachmentsOption::enabled()
        };
        assert_eq!(policy.effective_max_size(), 1024);
        assert_eq!(policy.effective_max_count(), 2);
    }

    #[test]
    fn attachment_wire_shape_matches_upload_contract() {
        let attachment = Attachment::Image {
            id: "img_123".to_string(),
            preview_url: "https://cdn.example.test/img_123".to_string(),
            name: "diagram.png".to_string(),
            mime_type: "image/png".to_string(),
        };
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["preview_url"], "https://cdn.example.test/img_123");
        assert_eq!(json["mime_type"], "image/png");
    }

    #[test]
    fn unset_tool_flags_default_to_false() {
        let parsed: ToolOption =
            serde_json::from_str("{\"id\":\"t1\",\"label\":\"Search\",\"icon\":\"search\"}")
                .unwrap();
        assert!(!parsed.pinned);
        assert!(!parsed.persistent);
    }
}
