//! Runtime substitution
//!
//! Turns canonical text plus render-time bindings into output segments: literal
//! text interleaved with the bound elements, each filled with the text its fence
//! wrapped in the active translation.

use crate::config::ELEMENT_PLACEHOLDER;
use crate::error::{LocalizeError, Result};
use crate::i18n::{Bindings, I18n};
use crate::markup::{Element, Node, Text};
use crate::tokens::{Part, TokenKind};

/// An element that can receive translated content in place of its placeholder.
pub trait ElementTemplate: Sized {
    fn fill(&self, content: &str) -> Result<Self>;
}

impl ElementTemplate for Element {
    /// Replaces the `$1` child.
    fn fill(&self, content: &str) -> Result<Self> {
        let slot = self.children.iter().position(|child| {
            matches!(child, Node::Text(text) if text.value == ELEMENT_PLACEHOLDER)
        });
        let Some(slot) = slot else {
            return Err(LocalizeError::InvalidStructure(format!(
                "replacement element <{}> should contain {} as child",
                self.name, ELEMENT_PLACEHOLDER
            )));
        };
        let mut filled = self.clone();
        filled.children[slot] = Text::node(content);
        Ok(filled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment<E> {
    Text(String),
    Element(E),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<E> {
    Single(Segment<E>),
    Many(Vec<Segment<E>>),
}

impl<E> Rendered<E> {
    pub fn into_segments(self) -> Vec<Segment<E>> {
        match self {
            Rendered::Single(segment) => vec![segment],
            Rendered::Many(segments) => segments,
        }
    }
}

/// Render canonical `text` with the given element and expression bindings. The
/// active locale's catalog is loaded first if it has not been yet.
pub fn render<E: ElementTemplate>(
    i18n: &mut I18n,
    text: &str,
    elements: &[E],
    expressions: &Bindings,
) -> Result<Rendered<E>> {
    i18n.ensure_loaded()?;
    let codec = i18n.codec();
    let mut text = i18n.t(text, expressions)?;

    let mut substitutes: Vec<Option<E>> = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let found = codec.pattern(TokenKind::Element, index).find(&text);
        let Some(found) = found else {
            return Err(LocalizeError::MissingBinding {
                kind: TokenKind::Element,
                name: index.to_string(),
            });
        };
        let range = found.range.clone();
        let filled = element.fill(found.inner)?;

        text.replace_range(range, &codec.substitution(substitutes.len()));
        substitutes.push(Some(filled));
    }

    let mut segments = Vec::new();
    for part in codec.split_substitutions(&text) {
        match part {
            Part::Literal("") => {}
            Part::Literal(literal) => segments.push(Segment::Text(literal.to_string())),
            Part::Substitution(index) => {
                let element = substitutes
                    .get_mut(index)
                    .and_then(Option::take)
                    .ok_or_else(|| LocalizeError::MissingBinding {
                        kind: TokenKind::Substitution,
                        name: index.to_string(),
                    })?;
                segments.push(Segment::Element(element));
            }
        }
    }

    Ok(match segments.len() {
        0 => Rendered::Single(Segment::Text(String::new())),
        1 => Rendered::Single(segments.remove(0)),
        _ => Rendered::Many(segments),
    })
}
