//! Search needles: the things a find operation looks for.
//!
//! The needle set is closed: template images, text queries, window
//! queries and color queries. Every needle carries a stable string id
//! used as the hook-registry key and in diagnostic messages.

use serde::{Deserialize, Serialize};

use crate::image::{Image, RgbaColor};

/// Whether a text query matches whole lines or single words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextQueryKind {
    Line,
    Word,
}

/// A query for on-screen text, resolved by a text finder provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextQuery {
    pub id: String,
    pub kind: TextQueryKind,
    pub text: String,
}

impl TextQuery {
    /// Query for a whole line of text.
    pub fn line(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: format!("line-query-{}", text),
            kind: TextQueryKind::Line,
            text,
        }
    }

    /// Query for a single word.
    pub fn word(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: format!("word-query-{}", text),
            kind: TextQueryKind::Word,
            text,
        }
    }
}

/// A query for a window, resolved by a window finder provider.
///
/// The matching semantics of `title` (substring, exact, pattern) are the
/// provider's concern; the core passes the query through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowQuery {
    pub id: String,
    pub title: String,
}

impl WindowQuery {
    /// Query for a window by title.
    pub fn title(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: format!("window-query-{}", title),
            title,
        }
    }
}

/// A query for a pixel of a given color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorQuery {
    pub id: String,
    pub color: RgbaColor,
}

impl ColorQuery {
    /// Query for the first pixel matching `color`.
    pub fn color(color: RgbaColor) -> Self {
        Self {
            id: format!("color-query-{}", color.to_hex()),
            color,
        }
    }
}

/// The closed set of things `find` can search for.
#[derive(Debug, Clone, PartialEq)]
pub enum Needle {
    /// Template image match
    Image(Image),
    /// Text line/word match
    Text(TextQuery),
    /// Window match
    Window(WindowQuery),
    /// Pixel color match
    Color(ColorQuery),
}

impl Needle {
    /// Stable identifier, used as hook key and in error messages.
    pub fn id(&self) -> &str {
        match self {
            Needle::Image(image) => &image.id,
            Needle::Text(query) => &query.id,
            Needle::Window(query) => &query.id,
            Needle::Color(query) => &query.id,
        }
    }

    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Needle::Image(_) => "image",
            Needle::Text(_) => "text",
            Needle::Window(_) => "window",
            Needle::Color(_) => "color",
        }
    }
}

impl From<Image> for Needle {
    fn from(image: Image) -> Self {
        Needle::Image(image)
    }
}

impl From<TextQuery> for Needle {
    fn from(query: TextQuery) -> Self {
        Needle::Text(query)
    }
}

impl From<WindowQuery> for Needle {
    fn from(query: WindowQuery) -> Self {
        Needle::Window(query)
    }
}

impl From<ColorQuery> for Needle {
    fn from(query: ColorQuery) -> Self {
        Needle::Color(query)
    }
}
