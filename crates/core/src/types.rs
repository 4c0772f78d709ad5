//! Domain types for representing a generated deck.

use crate::layout::{Frame, SlideSize};
use crate::media::ImageData;
use serde::Serialize;

/// Font family used for slide text.
pub const DEFAULT_FONT: &str = "Arial";

/// Text color used for slide text, as RGB hex.
pub const DEFAULT_COLOR: &str = "000000";

/// An entire deck, built one slide at a time and serialized once.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    /// Slide dimensions shared by every slide.
    pub size: SlideSize,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck with the given slide size.
    pub fn new(size: SlideSize) -> Self {
        Self {
            size,
            slides: Vec::new(),
        }
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// All pictures in the deck, in slide order.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.slides.iter().flat_map(|slide| slide.pictures())
    }
}

/// Which layout rule produced a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlideLayout {
    /// A single centered word.
    Text,
    /// A picture on its own.
    Image,
    /// Picture and text side by side.
    Mix,
    /// Video placeholder text.
    Video,
}

/// A single slide.
#[derive(Debug, Clone)]
pub struct Slide {
    pub layout: SlideLayout,

    /// Elements in z-order (first is bottom-most).
    pub elements: Vec<Element>,
}

impl Slide {
    /// Create an empty slide for the given layout.
    pub fn new(layout: SlideLayout) -> Self {
        Self {
            layout,
            elements: Vec::new(),
        }
    }

    /// Builder method: append an element.
    pub fn with(mut self, element: impl Into<Element>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Text boxes on this slide.
    pub fn text_boxes(&self) -> impl Iterator<Item = &TextBox> {
        self.elements.iter().filter_map(|e| match e {
            Element::TextBox(text) => Some(text),
            Element::Picture(_) => None,
        })
    }

    /// Pictures on this slide.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.elements.iter().filter_map(|e| match e {
            Element::Picture(picture) => Some(picture),
            Element::TextBox(_) => None,
        })
    }
}

/// A visual element on a slide.
#[derive(Debug, Clone)]
pub enum Element {
    TextBox(TextBox),
    Picture(Picture),
}

impl Element {
    pub fn frame(&self) -> Frame {
        match self {
            Self::TextBox(text) => text.frame,
            Self::Picture(picture) => picture.frame,
        }
    }
}

impl From<TextBox> for Element {
    fn from(text: TextBox) -> Self {
        Self::TextBox(text)
    }
}

impl From<Picture> for Element {
    fn from(picture: Picture) -> Self {
        Self::Picture(picture)
    }
}

/// Character formatting for a text box. Text is always centered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Font family; `None` inherits the theme font.
    pub font: Option<String>,

    /// Size in whole points.
    pub size_pt: u32,

    /// RGB hex color; `None` inherits the theme color.
    pub color: Option<String>,
}

impl TextStyle {
    /// Arial in black at the given size.
    pub fn arial(size_pt: u32) -> Self {
        Self {
            font: Some(DEFAULT_FONT.to_string()),
            size_pt,
            color: Some(DEFAULT_COLOR.to_string()),
        }
    }

    /// Theme font and color at the given size.
    pub fn plain(size_pt: u32) -> Self {
        Self {
            font: None,
            size_pt,
            color: None,
        }
    }
}

/// A text box holding one paragraph; each entry of `lines` is separated
/// by a line break.
#[derive(Debug, Clone)]
pub struct TextBox {
    pub frame: Frame,
    pub lines: Vec<String>,
    pub style: TextStyle,
}

impl TextBox {
    pub fn new(frame: Frame, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            frame,
            lines: vec![text.into()],
            style,
        }
    }

    /// Create a text box with several lines in one paragraph.
    pub fn with_lines(frame: Frame, lines: Vec<String>, style: TextStyle) -> Self {
        Self {
            frame,
            lines,
            style,
        }
    }

    /// The text with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A picture placed on a slide.
#[derive(Debug, Clone)]
pub struct Picture {
    pub frame: Frame,
    pub image: ImageData,

    /// Source the image was fetched from, kept as the alt text.
    pub description: String,
}

impl Picture {
    pub fn new(frame: Frame, image: ImageData, description: impl Into<String>) -> Self {
        Self {
            frame,
            image,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::centered_text_frame;

    #[test]
    fn test_slide_builder() {
        let frame = centered_text_frame(SlideSize::default());
        let slide = Slide::new(SlideLayout::Text).with(TextBox::new(
            frame,
            "hello",
            TextStyle::arial(44),
        ));

        assert_eq!(slide.elements.len(), 1);
        assert_eq!(slide.elements[0].frame(), frame);
        assert_eq!(slide.text_boxes().next().map(TextBox::text), Some("hello".to_string()));
        assert_eq!(slide.pictures().count(), 0);
    }

    #[test]
    fn test_deck_append_order() {
        let mut deck = Deck::new(SlideSize::default());
        assert!(deck.is_empty());
        deck.add_slide(Slide::new(SlideLayout::Text));
        deck.add_slide(Slide::new(SlideLayout::Video));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides[1].layout, SlideLayout::Video);
        assert_eq!(deck.pictures().count(), 0);
    }

    #[test]
    fn test_text_box_lines() {
        let text = TextBox::with_lines(
            centered_text_frame(SlideSize::default()),
            vec!["VIDEO".to_string(), "https://x/v.mp4".to_string()],
            TextStyle::plain(28),
        );
        assert_eq!(text.text(), "VIDEO\nhttps://x/v.mp4");
    }
}
