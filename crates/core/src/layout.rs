//! Slide geometry.
//!
//! All positions are English Metric Units (EMU), the unit OOXML uses for
//! offsets and extents. Layout rules are written as fractions of the slide
//! size and truncated to whole EMU.

use crate::error::{Error, Result};
use serde::Serialize;

/// EMU in one inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Widescreen slide width, 13.33in.
pub const SLIDE_WIDTH: i64 = 12_188_952;

/// Widescreen slide height, 7.5in.
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Outer margin, 0.5in.
pub const MARGIN: i64 = EMU_PER_INCH / 2;

/// Picture width used when an IMAGE marker has no `width` attribute.
pub const DEFAULT_IMAGE_WIDTH: &str = "60%";

/// Slide dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideSize {
    pub width: i64,
    pub height: i64,
}

impl Default for SlideSize {
    fn default() -> Self {
        Self {
            width: SLIDE_WIDTH,
            height: SLIDE_HEIGHT,
        }
    }
}

impl SlideSize {
    fn scale_width(&self, fraction: f64) -> i64 {
        (self.width as f64 * fraction) as i64
    }

    fn scale_height(&self, fraction: f64) -> i64 {
        (self.height as f64 * fraction) as i64
    }

    fn half_width(&self) -> i64 {
        self.width / 2
    }
}

/// Position and size of an element on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    /// `(left, top, width, height)` as fractions of the slide size.
    pub fn fractions(&self, size: SlideSize) -> (f64, f64, f64, f64) {
        let w = size.width as f64;
        let h = size.height as f64;
        (
            self.left as f64 / w,
            self.top as f64 / h,
            self.width as f64 / w,
            self.height as f64 / h,
        )
    }
}

/// Which half of a MIX slide holds the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MixAlign {
    Left,
    Right,
}

impl MixAlign {
    /// Interpret an `align` attribute. Only `left` puts the picture on the
    /// left; any other value puts it on the right.
    pub fn from_attribute(value: &str) -> Self {
        if value == "left" {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Centered text band used by word and video slides.
pub fn centered_text_frame(size: SlideSize) -> Frame {
    Frame::new(
        size.scale_width(0.25),
        size.scale_height(0.35),
        size.scale_width(0.5),
        size.scale_height(0.3),
    )
}

/// Picture frame for an IMAGE slide: `width_percent` of the slide width,
/// centered horizontally, one margin from the top.
pub fn image_frame(size: SlideSize, width_percent: f64, aspect_ratio: f64) -> Frame {
    let width = size.scale_width(width_percent / 100.0);
    let left = (size.width - width) / 2;
    Frame::new(left, MARGIN, width, scaled_height(width, aspect_ratio))
}

/// Picture and text frames for a MIX slide.
///
/// Returns `(picture, text)`. Each occupies one half of the slide inset by
/// a margin on both sides; the text sits in the same band as a word slide.
pub fn mix_frames(size: SlideSize, align: MixAlign, aspect_ratio: f64) -> (Frame, Frame) {
    let half = size.half_width();
    let column_width = half - MARGIN * 2;

    let (picture_left, text_left) = match align {
        MixAlign::Left => (MARGIN, half + MARGIN),
        MixAlign::Right => (half + MARGIN, MARGIN),
    };

    let picture = Frame::new(
        picture_left,
        MARGIN,
        column_width,
        scaled_height(column_width, aspect_ratio),
    );
    let text = Frame::new(
        text_left,
        size.scale_height(0.35),
        column_width,
        size.scale_height(0.3),
    );

    (picture, text)
}

/// Parse a `width` attribute such as `40%` or `40` into a percentage.
pub fn parse_width_percent(value: &str) -> Result<f64> {
    let invalid = || Error::InvalidAttribute {
        name: "width".to_string(),
        value: value.to_string(),
    };

    let percent: f64 = value
        .trim()
        .trim_matches('%')
        .trim()
        .parse()
        .map_err(|_| invalid())?;

    if !percent.is_finite() || percent <= 0.0 {
        return Err(invalid());
    }

    Ok(percent)
}

fn scaled_height(width: i64, aspect_ratio: f64) -> i64 {
    (width as f64 * aspect_ratio).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slide_size() {
        let size = SlideSize::default();
        assert_eq!(size.width, (13.33 * EMU_PER_INCH as f64) as i64);
        assert_eq!(size.height, 15 * EMU_PER_INCH / 2);
    }

    #[test]
    fn test_centered_text_frame() {
        let size = SlideSize::default();
        let frame = centered_text_frame(size);
        assert_eq!(frame, Frame::new(3_047_238, 2_400_300, 6_094_476, 2_057_400));

        let (left, top, width, height) = frame.fractions(size);
        assert!((left - 0.25).abs() < 1e-6);
        assert!((top - 0.35).abs() < 1e-6);
        assert!((width - 0.5).abs() < 1e-6);
        assert!((height - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_image_frame_is_centered() {
        let size = SlideSize::default();
        let frame = image_frame(size, 40.0, 0.5);
        assert_eq!(frame.width, (SLIDE_WIDTH as f64 * 0.4) as i64);
        assert_eq!(frame.top, MARGIN);
        assert_eq!(frame.left, (SLIDE_WIDTH - frame.width) / 2);
        assert!((frame.left - (SLIDE_WIDTH - frame.right())).abs() <= 1);
        assert_eq!(frame.height, (frame.width as f64 * 0.5).round() as i64);
    }

    #[test]
    fn test_mix_frames_left() {
        let size = SlideSize::default();
        let (picture, text) = mix_frames(size, MixAlign::Left, 1.0);
        let half = SLIDE_WIDTH / 2;

        assert_eq!(picture.left, MARGIN);
        assert!(picture.right() <= half);
        assert_eq!(text.left, half + MARGIN);
        assert!(text.right() <= SLIDE_WIDTH);
        assert_eq!(picture.width, text.width);
    }

    #[test]
    fn test_mix_frames_right_swaps_columns() {
        let size = SlideSize::default();
        let (left_picture, left_text) = mix_frames(size, MixAlign::Left, 0.75);
        let (right_picture, right_text) = mix_frames(size, MixAlign::Right, 0.75);

        assert_eq!(right_picture.left, left_text.left);
        assert_eq!(right_text.left, left_picture.left);
        assert_eq!(right_text.top, left_text.top);
        assert_eq!(right_picture.height, left_picture.height);
    }

    #[test]
    fn test_mix_align_from_attribute() {
        assert_eq!(MixAlign::from_attribute("left"), MixAlign::Left);
        assert_eq!(MixAlign::from_attribute("right"), MixAlign::Right);
        assert_eq!(MixAlign::from_attribute("center"), MixAlign::Right);
    }

    #[test]
    fn test_parse_width_percent() {
        assert_eq!(parse_width_percent("40%").unwrap(), 40.0);
        assert_eq!(parse_width_percent("12.5").unwrap(), 12.5);
        assert_eq!(parse_width_percent(DEFAULT_IMAGE_WIDTH).unwrap(), 60.0);
        assert!(parse_width_percent("wide").is_err());
        assert!(parse_width_percent("0%").is_err());
        assert!(parse_width_percent("-5%").is_err());
    }

    #[test]
    fn test_parse_width_percent_inner_space() {
        assert_eq!(parse_width_percent("40 %").unwrap(), 40.0);
        assert_eq!(parse_width_percent(" 25% ").unwrap(), 25.0);
    }
}
