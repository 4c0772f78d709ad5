//! Core domain types, script tokenization, and slide layout rules
//! for turning marker scripts into slide decks.

pub mod error;
pub mod layout;
pub mod media;
pub mod render;
pub mod token;
pub mod tokenizer;
pub mod types;

pub use error::{Error, Result};
pub use layout::{Frame, MixAlign, SlideSize};
pub use media::{ImageData, ImageFormat};
pub use render::{validate_source, ImageFetcher, Renderer};
pub use token::{Attributes, Marker, MarkerKind, Token};
pub use tokenizer::{parse_attributes, split_documents, tokenize};
pub use types::{Deck, Element, Picture, Slide, SlideLayout, TextBox, TextStyle};
