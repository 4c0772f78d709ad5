//! Slide rendering: one slide per token, chosen by token type.

use crate::error::{Error, Result};
use crate::layout::{self, MixAlign, SlideSize, DEFAULT_IMAGE_WIDTH};
use crate::media::ImageData;
use crate::token::{Marker, MarkerKind, Token};
use crate::tokenizer::tokenize;
use crate::types::{Deck, Picture, Slide, SlideLayout, TextBox, TextStyle};
use url::Url;

/// Font size of a word slide, in points.
pub const WORD_FONT_SIZE: u32 = 44;

/// Font size of the caption on a MIX slide, in points.
pub const MIX_FONT_SIZE: u32 = 32;

/// Font size of a video placeholder, in points.
pub const VIDEO_FONT_SIZE: u32 = 28;

/// Label shown above the source on a video placeholder.
pub const VIDEO_LABEL: &str = "VIDEO";

/// Source of image bytes for IMAGE and MIX slides.
///
/// The renderer validates the source before calling `fetch`, so
/// implementations only ever see absolute http(s) URLs.
pub trait ImageFetcher {
    fn fetch(&self, url: &Url) -> Result<ImageData>;
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for &T {
    fn fetch(&self, url: &Url) -> Result<ImageData> {
        (**self).fetch(url)
    }
}

/// Check that an image source is an absolute http(s) URL.
///
/// The scheme prefix is matched literally, so leading whitespace or an
/// upper-case scheme is rejected.
pub fn validate_source(src: &str) -> Result<Url> {
    let invalid = || Error::InvalidSource(src.to_string());

    if !(src.starts_with("http://") || src.starts_with("https://")) {
        return Err(invalid());
    }
    Url::parse(src).map_err(|_| invalid())
}

/// Builds a [`Deck`] from tokens, fetching images as it goes.
pub struct Renderer<F> {
    fetcher: F,
    size: SlideSize,
}

impl<F: ImageFetcher> Renderer<F> {
    /// Create a renderer for widescreen slides.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            size: SlideSize::default(),
        }
    }

    /// Tokenize and render a single document.
    pub fn render_script(&self, script: &str) -> Result<Deck> {
        self.render(&tokenize(script))
    }

    /// Render tokens in order, one slide each.
    ///
    /// The first failing token aborts the whole deck.
    pub fn render(&self, tokens: &[Token]) -> Result<Deck> {
        let mut deck = Deck::new(self.size);

        for token in tokens {
            let slide = match token {
                Token::Word(text) => self.word_slide(text),
                Token::Marker(marker) => match marker.kind {
                    MarkerKind::Image => self.image_slide(marker)?,
                    MarkerKind::Mix => self.mix_slide(marker)?,
                    MarkerKind::Video => self.video_slide(marker),
                },
            };
            deck.add_slide(slide);
        }

        log::debug!(
            "Rendered {} slides ({} pictures)",
            deck.len(),
            deck.pictures().count()
        );

        Ok(deck)
    }

    fn word_slide(&self, text: &str) -> Slide {
        Slide::new(SlideLayout::Text).with(TextBox::new(
            layout::centered_text_frame(self.size),
            text,
            TextStyle::arial(WORD_FONT_SIZE),
        ))
    }

    fn image_slide(&self, marker: &Marker) -> Result<Slide> {
        let src = marker.require("src")?;
        let width_percent = layout::parse_width_percent(marker.get_or("width", DEFAULT_IMAGE_WIDTH))?;
        let image = self.fetch(src)?;

        let frame = layout::image_frame(self.size, width_percent, image.aspect_ratio());

        Ok(Slide::new(SlideLayout::Image).with(Picture::new(frame, image, src)))
    }

    fn mix_slide(&self, marker: &Marker) -> Result<Slide> {
        let src = marker.require("src")?;
        let image = self.fetch(src)?;
        let align = MixAlign::from_attribute(marker.get_or("align", "left"));

        let (picture_frame, text_frame) = layout::mix_frames(self.size, align, image.aspect_ratio());

        Ok(Slide::new(SlideLayout::Mix)
            .with(Picture::new(picture_frame, image, src))
            .with(TextBox::new(
                text_frame,
                marker.get_or("text", ""),
                TextStyle::arial(MIX_FONT_SIZE),
            )))
    }

    fn video_slide(&self, marker: &Marker) -> Slide {
        let lines = vec![
            VIDEO_LABEL.to_string(),
            marker.get_or("src", "").to_string(),
        ];

        Slide::new(SlideLayout::Video).with(TextBox::with_lines(
            layout::centered_text_frame(self.size),
            lines,
            TextStyle::plain(VIDEO_FONT_SIZE),
        ))
    }

    fn fetch(&self, src: &str) -> Result<ImageData> {
        let url = validate_source(src)?;
        log::debug!("Fetching image {}", url);
        self.fetcher.fetch(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{MARGIN, SLIDE_WIDTH};
    use crate::media::test_png;
    use std::cell::RefCell;

    /// Serves one in-memory PNG for every URL and records requests.
    struct StubFetcher {
        width: u32,
        height: u32,
        requests: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageFetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<ImageData> {
            self.requests.borrow_mut().push(url.to_string());
            ImageData::probe(test_png(self.width, self.height), Some("image/png"))
        }
    }

    /// Fails every request the way a 404 would.
    struct FailingFetcher;

    impl ImageFetcher for FailingFetcher {
        fn fetch(&self, url: &Url) -> Result<ImageData> {
            Err(Error::Fetch {
                src: url.to_string(),
                reason: "404 Not Found".to_string(),
            })
        }
    }

    #[test]
    fn test_one_slide_per_word() {
        let fetcher = StubFetcher::new(1, 1);
        let deck = Renderer::new(&fetcher)
            .render_script("the quick brown fox")
            .unwrap();

        assert_eq!(deck.len(), 4);
        let texts: Vec<String> = deck
            .slides
            .iter()
            .map(|s| s.text_boxes().next().unwrap().text())
            .collect();
        assert_eq!(texts, vec!["the", "quick", "brown", "fox"]);
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn test_word_slide_layout() {
        let deck = Renderer::new(StubFetcher::new(1, 1))
            .render_script("hello")
            .unwrap();
        let slide = &deck.slides[0];
        let text = slide.text_boxes().next().unwrap();

        assert_eq!(slide.layout, SlideLayout::Text);
        assert_eq!(text.frame, layout::centered_text_frame(deck.size));
        assert_eq!(text.style, TextStyle::arial(WORD_FONT_SIZE));
    }

    #[test]
    fn test_image_then_word() {
        let fetcher = StubFetcher::new(200, 100);
        let deck = Renderer::new(&fetcher)
            .render_script("[IMAGE src=https://x/y.png width=40%] hello")
            .unwrap();

        assert_eq!(deck.len(), 2);

        let image_slide = &deck.slides[0];
        assert_eq!(image_slide.layout, SlideLayout::Image);
        let picture = image_slide.pictures().next().unwrap();
        let (_, _, width, _) = picture.frame.fractions(deck.size);
        assert!((width - 0.4).abs() < 1e-6);
        assert_eq!(picture.frame.top, MARGIN);
        assert_eq!(picture.frame.height, (picture.frame.width as f64 * 0.5).round() as i64);
        assert_eq!(picture.description, "https://x/y.png");

        let text_slide = &deck.slides[1];
        assert_eq!(text_slide.layout, SlideLayout::Text);
        assert_eq!(text_slide.text_boxes().next().unwrap().text(), "hello");

        assert_eq!(*fetcher.requests.borrow(), vec!["https://x/y.png".to_string()]);
    }

    #[test]
    fn test_image_default_width() {
        let deck = Renderer::new(StubFetcher::new(10, 10))
            .render_script("[IMAGE src=https://x/y.png]")
            .unwrap();
        let picture = deck.slides[0].pictures().next().unwrap();
        assert_eq!(picture.frame.width, (SLIDE_WIDTH as f64 * 0.6) as i64);
    }

    #[test]
    fn test_mix_left_and_right() {
        let fetcher = StubFetcher::new(4, 3);
        let renderer = Renderer::new(&fetcher);
        let half = SLIDE_WIDTH / 2;

        let deck = renderer
            .render_script(r#"[MIX text="A" src=https://x/y.png align=left]"#)
            .unwrap();
        let slide = &deck.slides[0];
        let picture = slide.pictures().next().unwrap();
        let text = slide.text_boxes().next().unwrap();
        assert_eq!(slide.layout, SlideLayout::Mix);
        assert!(picture.frame.right() <= half);
        assert!(text.frame.left >= half);
        assert_eq!(text.text(), "A");
        assert_eq!(text.style.size_pt, MIX_FONT_SIZE);

        let deck = renderer
            .render_script(r#"[MIX text="A" src=https://x/y.png align=right]"#)
            .unwrap();
        let slide = &deck.slides[0];
        assert!(slide.pictures().next().unwrap().frame.left >= half);
        assert!(slide.text_boxes().next().unwrap().frame.right() <= half);
    }

    #[test]
    fn test_mix_defaults() {
        let deck = Renderer::new(StubFetcher::new(4, 3))
            .render_script("[MIX src=https://x/y.png]")
            .unwrap();
        let slide = &deck.slides[0];
        assert_eq!(slide.pictures().next().unwrap().frame.left, MARGIN);
        assert_eq!(slide.text_boxes().next().unwrap().text(), "");
    }

    #[test]
    fn test_video_placeholder() {
        let fetcher = StubFetcher::new(1, 1);
        let deck = Renderer::new(&fetcher)
            .render_script("[VIDEO src=https://x/v.mp4]")
            .unwrap();
        let slide = &deck.slides[0];
        let text = slide.text_boxes().next().unwrap();

        assert_eq!(slide.layout, SlideLayout::Video);
        assert_eq!(text.lines, vec!["VIDEO", "https://x/v.mp4"]);
        assert_eq!(text.style, TextStyle::plain(VIDEO_FONT_SIZE));
        assert_eq!(slide.pictures().count(), 0);
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn test_image_missing_src() {
        let err = Renderer::new(StubFetcher::new(1, 1))
            .render_script("hello [IMAGE width=40%]")
            .unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { kind: MarkerKind::Image, .. }));
    }

    #[test]
    fn test_image_bare_filename_is_rejected() {
        let fetcher = StubFetcher::new(1, 1);
        let err = Renderer::new(&fetcher)
            .render_script("[IMAGE src=photo.png]")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSource(ref src) if src == "photo.png"));
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn test_invalid_width_is_rejected() {
        let err = Renderer::new(StubFetcher::new(1, 1))
            .render_script("[IMAGE src=https://x/y.png width=huge]")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { ref name, .. } if name == "width"));
    }

    #[test]
    fn test_fetch_failure_aborts_deck() {
        let err = Renderer::new(FailingFetcher)
            .render_script("one two [IMAGE src=https://x/missing.png] three")
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }

    #[test]
    fn test_validate_source() {
        assert!(validate_source("https://example.com/a.png").is_ok());
        assert!(validate_source("http://example.com/a.png").is_ok());
        assert!(validate_source("photo.png").is_err());
        assert!(validate_source("/tmp/photo.png").is_err());
        assert!(validate_source("file:///tmp/photo.png").is_err());
        assert!(validate_source("ftp://example.com/a.png").is_err());
    }

    #[test]
    fn test_validate_source_is_literal() {
        assert!(validate_source(" https://example.com/a.png").is_err());
        assert!(validate_source("HTTP://example.com/a.png").is_err());
        assert!(validate_source("https://").is_err());
    }
}
