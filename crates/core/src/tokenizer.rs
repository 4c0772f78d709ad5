//! Script tokenization.
//!
//! A script is scanned once, left to right. Bracketed `[IMAGE ...]`,
//! `[MIX ...]` and `[VIDEO ...]` markers become [`Token::Marker`]; every
//! other whitespace-delimited run becomes a [`Token::Word`]. There is no
//! grammar beyond that: unknown or unterminated brackets simply fall
//! through as words.

use crate::token::{Attributes, Marker, MarkerKind, Token};
use regex::Regex;
use std::sync::LazyLock;

/// Separator that splits one script into independent documents.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Regex matching either a known marker or a plain word.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(IMAGE|MIX|VIDEO)(.*?)\]|(\S+)").unwrap());

/// Regex matching `name=value` or `name="quoted value"` inside a marker body.
static ATTRIBUTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)=(".*?"|\S+)"#).unwrap());

/// Tokenize a script into words and markers, preserving input order.
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            if let Some(word) = caps.get(3) {
                return Some(Token::Word(word.as_str().to_string()));
            }

            let kind = caps
                .get(1)
                .and_then(|m| MarkerKind::from_keyword(m.as_str()))?;
            let body = caps.get(2).map_or("", |m| m.as_str());

            Some(Token::Marker(Marker::new(kind, parse_attributes(body))))
        })
        .collect()
}

/// Parse the attribute pairs of a marker body.
///
/// Surrounding double quotes are stripped from values; a repeated name
/// keeps its last value. Text that is not a `name=value` pair is ignored.
pub fn parse_attributes(body: &str) -> Attributes {
    ATTRIBUTE_REGEX
        .captures_iter(body)
        .map(|caps| {
            let name = caps[1].to_string();
            let value = caps[2].trim_matches('"').to_string();
            (name, value)
        })
        .collect()
}

/// Split a script into independent documents on [`DOCUMENT_SEPARATOR`].
///
/// Blank segments are dropped. A script with no content at all still
/// yields one (empty) document.
pub fn split_documents(text: &str) -> Vec<&str> {
    let documents: Vec<&str> = text
        .split(DOCUMENT_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
        .collect();

    if documents.is_empty() {
        vec![""]
    } else {
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_plain_words() {
        let tokens = tokenize("Amazing  grace\nhow\tsweet");
        assert_eq!(
            tokens,
            vec![
                Token::word("Amazing"),
                Token::word("grace"),
                Token::word("how"),
                Token::word("sweet"),
            ]
        );
    }

    #[test]
    fn test_word_count_matches_whitespace_split() {
        let text = "one two, three!  four\n\nfive (six) 7";
        assert_eq!(tokenize(text).len(), text.split_whitespace().count());
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_image_then_word() {
        let tokens = tokenize("[IMAGE src=https://x/y.png width=40%] hello");
        assert_eq!(
            tokens,
            vec![
                Token::Marker(Marker::new(
                    MarkerKind::Image,
                    attrs(&[("src", "https://x/y.png"), ("width", "40%")])
                )),
                Token::word("hello"),
            ]
        );
    }

    #[test]
    fn test_marker_adjacent_to_words() {
        let tokens = tokenize("before[VIDEO src=v.mp4]after");
        assert_eq!(
            tokens,
            vec![Token::word("before[VIDEO"), Token::word("src=v.mp4]after")]
        );

        let tokens = tokenize("before [VIDEO src=v.mp4]after");
        assert_eq!(tokens[0], Token::word("before"));
        assert_eq!(tokens[1].marker_kind(), Some(MarkerKind::Video));
        assert_eq!(tokens[2], Token::word("after"));
    }

    #[test]
    fn test_quoted_value_keeps_spaces() {
        let tokens = tokenize(r#"[MIX text="A quick  brown fox" src=https://x/y.png align=left]"#);
        let Token::Marker(marker) = &tokens[0] else {
            panic!("expected marker, got {:?}", tokens[0]);
        };
        assert_eq!(marker.kind, MarkerKind::Mix);
        assert_eq!(marker.attributes.get("text"), Some("A quick  brown fox"));
        assert_eq!(marker.attributes.get("src"), Some("https://x/y.png"));
        assert_eq!(marker.attributes.get("align"), Some("left"));
    }

    #[test]
    fn test_unknown_marker_falls_back_to_words() {
        let tokens = tokenize("[AUDIO src=a.mp3] [image src=x]");
        assert_eq!(
            tokens,
            vec![
                Token::word("[AUDIO"),
                Token::word("src=a.mp3]"),
                Token::word("[image"),
                Token::word("src=x]"),
            ]
        );
    }

    #[test]
    fn test_unterminated_marker_falls_back_to_words() {
        let tokens = tokenize("[IMAGE src=https://x/y.png\nnext]");
        assert_eq!(
            tokens,
            vec![
                Token::word("[IMAGE"),
                Token::word("src=https://x/y.png"),
                Token::word("next]"),
            ]
        );
    }

    #[test]
    fn test_marker_without_attributes() {
        let tokens = tokenize("[IMAGE]");
        assert_eq!(
            tokens,
            vec![Token::Marker(Marker::new(MarkerKind::Image, Attributes::new()))]
        );
    }

    #[test]
    fn test_parse_attributes() {
        assert_eq!(
            parse_attributes(r#" src=https://x/y.png?a=b width="50%" junk text="" "#),
            attrs(&[("src", "https://x/y.png?a=b"), ("width", "50%"), ("text", "")])
        );
    }

    #[test]
    fn test_parse_attributes_last_value_wins() {
        assert_eq!(
            parse_attributes("align=left align=right"),
            attrs(&[("align", "right")])
        );
    }

    #[test]
    fn test_split_documents() {
        let docs = split_documents("one two\n---\nthree\n---\n   \n");
        assert_eq!(docs, vec!["one two\n", "\nthree\n"]);
    }

    #[test]
    fn test_split_documents_without_separator() {
        assert_eq!(split_documents("just words"), vec!["just words"]);
        assert_eq!(split_documents(""), vec![""]);
        assert_eq!(split_documents("---\n---"), vec![""]);
    }
}
