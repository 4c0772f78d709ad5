//! Tokens produced by the script tokenizer.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The kind of a bracketed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarkerKind {
    /// `[IMAGE ...]`: a picture on its own.
    Image,
    /// `[MIX ...]`: picture and text side by side.
    Mix,
    /// `[VIDEO ...]`: a placeholder naming a video source.
    Video,
}

impl MarkerKind {
    /// Match the keyword that opens a marker. Keywords are case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "IMAGE" => Some(Self::Image),
            "MIX" => Some(Self::Mix),
            "VIDEO" => Some(Self::Video),
            _ => None,
        }
    }

    /// The keyword as written in a script.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Mix => "MIX",
            Self::Video => "VIDEO",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute name to value mapping parsed from a marker body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Look up an attribute, falling back to `default` when absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Look up an attribute the marker cannot be rendered without.
    pub fn require(&self, kind: MarkerKind, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| Error::MissingAttribute {
            kind,
            name: name.to_string(),
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// A typed marker with its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub attributes: Attributes,
}

impl Marker {
    /// Create a marker of the given kind.
    pub fn new(kind: MarkerKind, attributes: Attributes) -> Self {
        Self { kind, attributes }
    }

    /// Look up a required attribute, naming this marker's kind on failure.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.attributes.require(self.kind, name)
    }

    /// Look up an attribute with a per-kind default.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attributes.get_or(name, default)
    }
}

/// One unit of a script. Each token becomes exactly one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Token {
    /// A plain whitespace-delimited word.
    Word(String),
    /// A bracketed marker.
    Marker(Marker),
}

impl Token {
    /// Create a word token.
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }

    /// The marker kind, if this token is a marker.
    pub fn marker_kind(&self) -> Option<MarkerKind> {
        match self {
            Self::Word(_) => None,
            Self::Marker(marker) => Some(marker.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_kind_keywords() {
        assert_eq!(MarkerKind::from_keyword("IMAGE"), Some(MarkerKind::Image));
        assert_eq!(MarkerKind::from_keyword("MIX"), Some(MarkerKind::Mix));
        assert_eq!(MarkerKind::from_keyword("VIDEO"), Some(MarkerKind::Video));
        assert_eq!(MarkerKind::from_keyword("image"), None);
        assert_eq!(MarkerKind::Mix.to_string(), "MIX");
    }

    #[test]
    fn test_require_missing_attribute() {
        let marker = Marker::new(MarkerKind::Image, Attributes::new());
        let err = marker.require("src").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { kind: MarkerKind::Image, ref name } if name == "src"
        ));
        assert_eq!(
            err.to_string(),
            "[IMAGE] marker is missing required attribute 'src'"
        );
    }

    #[test]
    fn test_get_or_default() {
        let attributes: Attributes = [("align", "right")].into_iter().collect();
        assert_eq!(attributes.get_or("align", "left"), "right");
        assert_eq!(attributes.get_or("width", "60%"), "60%");
    }

    #[test]
    fn test_token_marker_kind() {
        let token = Token::Marker(Marker::new(
            MarkerKind::Video,
            [("src", "https://x/v.mp4")].into_iter().collect(),
        ));
        assert_eq!(token.marker_kind(), Some(MarkerKind::Video));
        assert_eq!(Token::word("hi").marker_kind(), None);
    }
}
