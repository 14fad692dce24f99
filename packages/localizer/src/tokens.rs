//! Placeholder tokens
//!
//! Encoding and matching of the three in-text token kinds:
//!
//! - element fences, `*text*` for index 0, `**text**` for index 1, ...
//! - expression names, `%[name]`
//! - substitution slots, `~~~$0$~~~`, only ever produced at render time
//!
//! Matching is hand-scanned. Fences are read left to right over runs of marker
//! characters: a run closes the pending fence with the same number of markers and the
//! rest of it opens the next fence, so `*a***b**` is `*a*` then `**b**`. A fence of one
//! width never matches as another, whatever their order in a translated string.

use crate::config::LocalizeConfig;
use crate::error::LocalizeError;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Element,
    Expression,
    Substitution,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Element => "elements",
            TokenKind::Expression => "expressions",
            TokenKind::Substitution => "placeholders",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = LocalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elements" => Ok(TokenKind::Element),
            "expressions" => Ok(TokenKind::Expression),
            "placeholders" => Ok(TokenKind::Substitution),
            other => Err(LocalizeError::UnknownTokenKind(other.to_string())),
        }
    }
}

/// Token encoder bound to one configuration.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    marker: char,
    opening: String,
    closing: String,
    fence: String,
    index_tag: String,
}

impl TokenCodec {
    pub fn new(config: &LocalizeConfig) -> Self {
        TokenCodec {
            marker: config.element_tag,
            opening: config.expression_opening.clone(),
            closing: config.expression_closing.clone(),
            fence: config.placeholder_tag.clone(),
            index_tag: config.placeholder_index_tag.clone(),
        }
    }

    /// Number of marker characters on each side of the element fence for `index`.
    pub fn fence_width(index: usize) -> usize {
        index + 1
    }

    /// Encode `value` as a token of `kind`.
    ///
    /// `index` selects the fence width for elements and is the slot number for
    /// substitutions, in which case `value` is ignored. Expressions ignore `index`.
    pub fn encode(&self, value: &str, kind: TokenKind, index: usize) -> String {
        match kind {
            TokenKind::Element => {
                let fence: String = std::iter::repeat(self.marker)
                    .take(Self::fence_width(index))
                    .collect();
                format!("{fence}{value}{fence}")
            }
            TokenKind::Expression => format!("{}{}{}", self.opening, value, self.closing),
            TokenKind::Substitution => format!(
                "{fence}{tag}{index}{tag}{fence}",
                fence = self.fence,
                tag = self.index_tag
            ),
        }
    }

    /// Same as [`encode`](Self::encode) with the kind given by name.
    pub fn encode_named(&self, value: &str, kind: &str, index: usize) -> crate::Result<String> {
        Ok(self.encode(value, kind.parse()?, index))
    }

    pub fn element(&self, text: &str, index: usize) -> String {
        self.encode(text, TokenKind::Element, index)
    }

    pub fn expression(&self, name: &str) -> String {
        self.encode(name, TokenKind::Expression, 0)
    }

    pub fn substitution(&self, index: usize) -> String {
        self.encode("", TokenKind::Substitution, index)
    }

    pub fn pattern(&self, kind: TokenKind, index: usize) -> TokenPattern {
        match kind {
            TokenKind::Element => TokenPattern::Element {
                marker: self.marker,
                width: Self::fence_width(index),
            },
            TokenKind::Expression => TokenPattern::Expression {
                opening: self.opening.clone(),
                closing: self.closing.clone(),
            },
            TokenKind::Substitution => TokenPattern::Substitution {
                index_tag: self.index_tag.clone(),
            },
        }
    }

    /// Split rendered text on the substitution fence.
    pub fn split_substitutions<'a>(&self, text: &'a str) -> Vec<Part<'a>> {
        let pattern = self.pattern(TokenKind::Substitution, 0);
        text.split(self.fence.as_str())
            .map(|segment| match pattern.find(segment) {
                Some(found) if found.range == (0..segment.len()) => found
                    .inner
                    .parse()
                    .map(Part::Substitution)
                    .unwrap_or(Part::Literal(segment)),
                _ => Part::Literal(segment),
            })
            .collect()
    }
}

/// A segment of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part<'a> {
    Literal(&'a str),
    Substitution(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPattern {
    Element { marker: char, width: usize },
    Expression { opening: String, closing: String },
    Substitution { index_tag: String },
}

/// One token found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    /// Byte range of the whole token, delimiters included.
    pub range: Range<usize>,
    /// The wrapped content.
    pub inner: &'a str,
}

impl TokenPattern {
    pub fn find<'a>(&self, text: &'a str) -> Option<TokenMatch<'a>> {
        self.find_iter(text).into_iter().next()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// All non-overlapping matches, left to right.
    pub fn find_iter<'a>(&self, text: &'a str) -> Vec<TokenMatch<'a>> {
        match self {
            TokenPattern::Element { marker, width } => find_fenced(text, *marker, *width),
            TokenPattern::Expression { opening, closing } => {
                find_delimited(text, opening, closing)
            }
            TokenPattern::Substitution { index_tag } => find_indexed(text, index_tag),
        }
    }
}

/// Maximal runs of `marker` as byte ranges.
fn marker_runs(text: &str, marker: char) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();
    for (offset, c) in text.char_indices() {
        if c != marker {
            continue;
        }
        let end = offset + c.len_utf8();
        match runs.last_mut() {
            Some(run) if run.end == offset => run.end = end,
            _ => runs.push(offset..end),
        }
    }
    runs
}

/// Every element fence in `text`, left to right. A marker run may close the pending
/// fence and open the next one at once, so `*a***b**` holds `*a*` and `**b**`.
fn fences(text: &str, marker: char) -> Vec<(usize, TokenMatch<'_>)> {
    let unit = marker.len_utf8();
    let mut fences = Vec::new();
    // (width, start) of the fence opened by the previous run
    let mut pending: Option<(usize, usize)> = None;

    for run in marker_runs(text, marker) {
        let length = run.len() / unit;
        let mut opening = (length, run.start);

        if let Some((width, start)) = pending.take() {
            if width <= length {
                let close_end = run.start + width * unit;
                fences.push((
                    width,
                    TokenMatch {
                        range: start..close_end,
                        inner: &text[start + width * unit..run.start],
                    },
                ));
                opening = (length - width, close_end);
            }
        }

        if opening.0 > 0 {
            pending = Some(opening);
        }
    }
    fences
}

fn find_fenced(text: &str, marker: char, width: usize) -> Vec<TokenMatch<'_>> {
    fences(text, marker)
        .into_iter()
        .filter(|(found, _)| *found == width)
        .map(|(_, token)| token)
        .collect()
}

fn find_delimited<'a>(text: &'a str, opening: &str, closing: &str) -> Vec<TokenMatch<'a>> {
    let mut matches = Vec::new();
    if opening.is_empty() || closing.is_empty() {
        return matches;
    }

    let mut cursor = 0;
    while let Some(found) = text[cursor..].find(opening) {
        let start = cursor + found;
        let inner_start = start + opening.len();
        let Some(length) = text[inner_start..].find(closing) else {
            break;
        };
        let end = inner_start + length + closing.len();
        matches.push(TokenMatch {
            range: start..end,
            inner: &text[inner_start..inner_start + length],
        });
        cursor = end;
    }
    matches
}

fn find_indexed<'a>(text: &'a str, index_tag: &str) -> Vec<TokenMatch<'a>> {
    let mut matches = Vec::new();
    if index_tag.is_empty() {
        return matches;
    }

    let mut cursor = 0;
    while let Some(found) = text[cursor..].find(index_tag) {
        let start = cursor + found;
        let digits_start = start + index_tag.len();
        let digits = text[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let digits_end = digits_start + digits;
        if digits > 0 && text[digits_end..].starts_with(index_tag) {
            let end = digits_end + index_tag.len();
            matches.push(TokenMatch {
                range: start..end,
                inner: &text[digits_start..digits_end],
            });
            cursor = end;
        } else {
            cursor = digits_start;
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&LocalizeConfig::default())
    }

    #[test]
    fn encodes_each_kind() {
        let codec = codec();
        assert_eq!(codec.element("world", 0), "*world*");
        assert_eq!(codec.element("and", 1), "**and**");
        assert_eq!(codec.expression("user-name"), "%[user-name]");
        assert_eq!(codec.substitution(3), "~~~$3$~~~");
    }

    #[test]
    fn unknown_kind_name_is_rejected() {
        let codec = codec();
        assert!(matches!(
            codec.encode_named("x", "widgets", 0),
            Err(LocalizeError::UnknownTokenKind(name)) if name == "widgets"
        ));
        assert_eq!(codec.encode_named("x", "expressions", 0).unwrap(), "%[x]");
    }

    #[test]
    fn fences_of_different_widths_do_not_cross_match() {
        let codec = codec();
        let text = "**und** dann *Welt*";
        let first = codec.pattern(TokenKind::Element, 0).find(text).unwrap();
        assert_eq!(first.inner, "Welt");
        let second = codec.pattern(TokenKind::Element, 1).find(text).unwrap();
        assert_eq!(second.inner, "und");
        assert_eq!(&text[second.range], "**und**");
    }

    #[test]
    fn adjacent_fences_share_a_marker_run() {
        let codec = codec();
        let text = "Hello *world***and**";
        let first = codec.pattern(TokenKind::Element, 0).find(text).unwrap();
        assert_eq!(first.inner, "world");
        assert_eq!(&text[first.range], "*world*");
        let second = codec.pattern(TokenKind::Element, 1).find(text).unwrap();
        assert_eq!(second.inner, "and");
        assert_eq!(&text[second.range], "**and**");

        let swapped = "**und***Welt*";
        assert_eq!(codec.pattern(TokenKind::Element, 0).find(swapped).unwrap().inner, "Welt");
        assert_eq!(codec.pattern(TokenKind::Element, 1).find(swapped).unwrap().inner, "und");
    }

    #[test]
    fn wide_fence_is_not_a_narrow_one() {
        let codec = codec();
        assert!(!codec.pattern(TokenKind::Element, 0).is_match("say **hi** now"));
    }

    #[test]
    fn fence_requires_content() {
        let codec = codec();
        assert!(!codec.pattern(TokenKind::Element, 0).is_match("a ** b"));
        assert!(!codec.pattern(TokenKind::Element, 2).is_match("*a* **b**"));
    }

    #[test]
    fn finds_every_expression_name() {
        let codec = codec();
        let names: Vec<_> = codec
            .pattern(TokenKind::Expression, 0)
            .find_iter("%[user-name] has %[count1] items")
            .into_iter()
            .map(|m| m.inner)
            .collect();
        assert_eq!(names, vec!["user-name", "count1"]);
    }

    #[test]
    fn splits_rendered_text_into_parts() {
        let codec = codec();
        let parts = codec.split_substitutions("Hello ~~~$0$~~~ and ~~~$1$~~~");
        assert_eq!(
            parts,
            vec![
                Part::Literal("Hello "),
                Part::Substitution(0),
                Part::Literal(" and "),
                Part::Substitution(1),
                Part::Literal(""),
            ]
        );
    }

    #[test]
    fn a_lone_dollar_amount_stays_literal() {
        let codec = codec();
        assert_eq!(
            codec.split_substitutions("costs $5"),
            vec![Part::Literal("costs $5")]
        );
    }
}
