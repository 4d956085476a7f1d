use serde::{Deserialize, Serialize};

/// Preview frame width preset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl ViewportMode {
    pub fn all() -> &'static [ViewportMode] {
        &[ViewportMode::Desktop, ViewportMode::Tablet, ViewportMode::Mobile]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportMode::Desktop => "desktop",
            ViewportMode::Tablet => "tablet",
            ViewportMode::Mobile => "mobile",
        }
    }

    /// CSS width applied to the preview frame
    pub fn frame_width(&self) -> &'static str {
        match self {
            ViewportMode::Desktop => "100%",
            ViewportMode::Tablet => "768px",
            ViewportMode::Mobile => "375px",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|mode| mode.as_str() == value)
    }
}

/// Editor/preview split direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Horizontal => "horizontal",
            LayoutMode::Vertical => "vertical",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            LayoutMode::Horizontal => LayoutMode::Vertical,
            LayoutMode::Vertical => LayoutMode::Horizontal,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(LayoutMode::Horizontal),
            "vertical" => Some(LayoutMode::Vertical),
            _ => None,
        }
    }
}

/// Editor font size preset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    Xlarge,
}

impl FontSize {
    pub fn all() -> &'static [FontSize] {
        &[FontSize::Small, FontSize::Medium, FontSize::Large, FontSize::Xlarge]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
            FontSize::Xlarge => "xlarge",
        }
    }

    pub fn px(&self) -> u8 {
        match self {
            FontSize::Small => 12,
            FontSize::Medium => 14,
            FontSize::Large => 16,
            FontSize::Xlarge => 18,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|size| size.as_str() == value)
    }
}

/// Presentation settings. None of these affect the composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub dark_mode: bool,
    pub font_size: FontSize,
    pub viewport: ViewportMode,
    pub layout: LayoutMode,
}
