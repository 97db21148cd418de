use serde::{Deserialize, Serialize};

use super::error::{InvalidAccentLevelSnafu, InvalidBaseFontSizeSnafu, OptionsResult};

/// Visual appearance configuration. Either a bare color scheme or a full
/// customization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Theme {
    Scheme(ColorScheme),
    Custom(ThemeOption),
}

impl Default for Theme {
    fn default() -> Self {
        Self::Scheme(ColorScheme::Light)
    }
}

impl From<ColorScheme> for Theme {
    fn from(scheme: ColorScheme) -> Self {
        Self::Scheme(scheme)
    }
}

impl From<ThemeOption> for Theme {
    fn from(option: ThemeOption) -> Self {
        Self::Custom(option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Full theme customization record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Radius>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<Density>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorOption>,
}

impl ThemeOption {
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = Some(scheme);
        self
    }

    pub fn with_radius(mut self, radius: Radius) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = Some(density);
        self
    }

    pub fn with_accent(mut self, accent: AccentColor) -> Self {
        self.color.get_or_insert_with(ColorOption::default).accent = Some(accent);
        self
    }
}

/// Overall roundness of the rendered UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radius {
    #[default]
    Pill,
    Round,
    Soft,
    Sharp,
}

/// Overall spacing of the rendered UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Normal,
    Spacious,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_size: Option<BaseFontSize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub font_sources: Vec<FontObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family_mono: Option<String>,
}

/// Base font size in pixels, validated to the supported 14-18 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BaseFontSize(u8);

impl BaseFontSize {
    pub fn new(value: u8) -> OptionsResult<Self> {
        if (14..=18).contains(&value) {
            Ok(Self(value))
        } else {
            InvalidBaseFontSizeSnafu {
                stage: "validate-base-font-size",
                value,
            }
            .fail()
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BaseFontSize {
    type Error = crate::error::OptionsError;

    fn try_from(value: u8) -> OptionsResult<Self> {
        Self::new(value)
    }
}

impl From<BaseFontSize> for u8 {
    fn from(size: BaseFontSize) -> Self {
        size.0
    }
}

/// Webfont source descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontObject {
    pub family: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<FontDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(u16),
    Keyword(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontDisplay {
    Auto,
    Block,
    Swap,
    Fallback,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<GrayscaleOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<AccentColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceColors>,
}

/// Grayscale palette derived from a hue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrayscaleOptions {
    /// Hue in degrees, 0-360.
    pub hue: f32,
    /// Tint step applied to the palette, 0-9.
    pub tint: u8,
    /// Optional shade adjustment, -4 to 4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shade: Option<i8>,
}

/// Primary accent color used throughout the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccentColor {
    /// Hex, rgb(a), hsl(a), etc.
    pub primary: String,
    pub level: AccentLevel,
}

impl AccentColor {
    pub fn new(primary: impl Into<String>, level: AccentLevel) -> Self {
        Self {
            primary: primary.into(),
            level,
        }
    }
}

/// Accent palette intensity, validated to the supported 0-3 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AccentLevel(u8);

impl AccentLevel {
    pub fn new(value: u8) -> OptionsResult<Self> {
        if value <= 3 {
            Ok(Self(value))
        } else {
            InvalidAccentLevelSnafu {
                stage: "validate-accent-level",
                value,
            }
            .fail()
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AccentLevel {
    type Error = crate::error::OptionsError;

    fn try_from(value: u8) -> OptionsResult<Self> {
        Self::new(value)
    }
}

impl From<AccentLevel> for u8 {
    fn from(level: AccentLevel) -> Self {
        level.0
    }
}

/// Container background and foreground colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceColors {
    pub background: String,
    pub foreground: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_scheme_serializes_as_string() {
        let theme = Theme::Scheme(ColorScheme::Dark);
        assert_eq!(serde_json::to_string(&theme).unwrap(), "\"dark\"");

        let parsed: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(parsed, Theme::Scheme(ColorScheme::Light));
    }

    #[test]
    fn custom_theme_uses_camel_case_keys() {
        let theme = Theme::Custom(
            ThemeOption::default()
                .with_color_scheme(ColorScheme::Dark)
                .with_radius(Radius::Soft),
        );
        let json = serde_json::to_value(&theme).unwrap();
        assert_eq!(json["colorScheme"], "dark");
        assert_eq!(json["radius"], "soft");
    }

    #[test]
    fn base_font_size_rejects_out_of_range_values() {
        assert!(BaseFontSize::new(13).is_err());
        assert!(BaseFontSize::new(19).is_err());
        assert_eq!(BaseFontSize::new(16).unwrap().get(), 16);

        let parsed: Result<BaseFontSize, _> = serde_json::from_str("12");
        assert!(parsed.is_err());
    }

    #[test]
    fn accent_level_rejects_out_of_range_values() {
        assert!(AccentLevel::new(4).is_err());
        assert_eq!(AccentLevel::new(2).unwrap().get(), 2);
    }
}
