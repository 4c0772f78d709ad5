//! PPTX (Office Open XML) backend for generated decks.
//!
//! Writes a [`deck_core::Deck`] as a .pptx ZIP package and reads generated
//! packages back into a summary of slides and shapes.

pub mod error;
mod parts;
pub mod reader;
pub mod writer;

pub use error::{Error, Result};
pub use reader::{DeckSummary, PptxReader, ShapeKind, ShapeSummary, SlideSummary};
pub use writer::{PptxWriter, PPTX_CONTENT_TYPE};
