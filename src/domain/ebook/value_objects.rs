//! Ebook Context - Value Objects

use serde::{Deserialize, Serialize};

use super::EbookError;

/// 电子书标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, EbookError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(EbookError::InvalidTitle("标题不能为空".to_string()));
        }
        if title.chars().count() > 200 {
            return Err(EbookError::InvalidTitle("标题长度不能超过200字符".to_string()));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 页面模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    #[default]
    Standard,
    TwoColumn,
    ImageLeft,
    ImageRight,
    FullImage,
    Quote,
    ChapterOpener,
}

impl PageTemplate {
    pub const ALL: [PageTemplate; 7] = [
        PageTemplate::Standard,
        PageTemplate::TwoColumn,
        PageTemplate::ImageLeft,
        PageTemplate::ImageRight,
        PageTemplate::FullImage,
        PageTemplate::Quote,
        PageTemplate::ChapterOpener,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageTemplate::Standard => "standard",
            PageTemplate::TwoColumn => "two_column",
            PageTemplate::ImageLeft => "image_left",
            PageTemplate::ImageRight => "image_right",
            PageTemplate::FullImage => "full_image",
            PageTemplate::Quote => "quote",
            PageTemplate::ChapterOpener => "chapter_opener",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// 生成的页面使用的模板：第一节为章节开篇，其余为标准页
    pub fn for_generated_section(section_index: usize) -> Self {
        if section_index == 0 {
            PageTemplate::ChapterOpener
        } else {
            PageTemplate::Standard
        }
    }
}

/// 封面模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoverTemplate {
    #[default]
    Classic,
    Minimal,
    Bold,
    FullImage,
}

impl CoverTemplate {
    pub const ALL: [CoverTemplate; 4] = [
        CoverTemplate::Classic,
        CoverTemplate::Minimal,
        CoverTemplate::Bold,
        CoverTemplate::FullImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverTemplate::Classic => "classic",
            CoverTemplate::Minimal => "minimal",
            CoverTemplate::Bold => "bold",
            CoverTemplate::FullImage => "full_image",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

/// 标题装饰样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeadingAccent {
    None,
    #[default]
    Underline,
    Bar,
    Highlight,
}

const MAX_FONT_LEN: usize = 64;
const MAX_FOOTER_LEN: usize = 200;

/// 视觉主题
///
/// 不变量:
/// - 所有颜色为 `#RGB` 或 `#RRGGBB`
/// - 字体名非空且不超过 64 字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_font: String,
    pub body_font: String,
    pub heading_accent: HeadingAccent,
    pub footer_text: Option<String>,
    pub show_page_numbers: bool,
    pub brand_name: Option<String>,
    pub brand_logo_url: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#1F2937".to_string(),
            secondary_color: "#6366F1".to_string(),
            background_color: "#FFFFFF".to_string(),
            text_color: "#111827".to_string(),
            heading_font: "Playfair Display".to_string(),
            body_font: "Inter".to_string(),
            heading_accent: HeadingAccent::default(),
            footer_text: None,
            show_page_numbers: true,
            brand_name: None,
            brand_logo_url: None,
        }
    }
}

impl Theme {
    /// 校验主题；颜色统一转为大写
    pub fn validated(mut self) -> Result<Self, EbookError> {
        for (name, color) in [
            ("primary_color", &mut self.primary_color),
            ("secondary_color", &mut self.secondary_color),
            ("background_color", &mut self.background_color),
            ("text_color", &mut self.text_color),
        ] {
            if !is_hex_color(color) {
                return Err(EbookError::InvalidTheme(format!(
                    "{} must be a hex color, got '{}'",
                    name, color
                )));
            }
            *color = color.to_ascii_uppercase();
        }

        for (name, font) in [
            ("heading_font", &self.heading_font),
            ("body_font", &self.body_font),
        ] {
            let len = font.trim().chars().count();
            if len == 0 || len > MAX_FONT_LEN {
                return Err(EbookError::InvalidTheme(format!(
                    "{} must be 1-{} characters",
                    name, MAX_FONT_LEN
                )));
            }
        }

        if let Some(footer) = &self.footer_text {
            if footer.chars().count() > MAX_FOOTER_LEN {
                return Err(EbookError::InvalidTheme(format!(
                    "footer_text cannot exceed {} characters",
                    MAX_FOOTER_LEN
                )));
            }
        }

        if let Some(url) = &self.brand_logo_url {
            if !(url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')) {
                return Err(EbookError::InvalidTheme(
                    "brand_logo_url must be an http(s) URL or an absolute path".to_string(),
                ));
            }
        }

        Ok(self)
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
