//! Text aggregation
//!
//! Collapses the children of a markup element into localized runs. A run collects
//! literal text, classifiable expressions and simply-translatable child elements (as
//! element fences) until something that cannot take part in text breaks it.

use crate::classify::ExpressionClassifier;
use crate::config::{LocalizeConfig, ELEMENT_PLACEHOLDER};
use crate::markup::{
    has_words, localized_element, Element, Expression, ExpressionContainer, ExpressionMap, Node,
    Text,
};
use crate::tokens::TokenCodec;
use tracing::debug;

/// Aggregation result before it is turned back into nodes.
#[derive(Debug)]
enum Piece {
    Localized(LocalizedRun),
    Plain(Node),
}

#[derive(Debug)]
struct LocalizedRun {
    text: String,
    elements: Vec<Element>,
    expressions: ExpressionMap,
}

/// Run being accumulated.
#[derive(Debug, Default)]
struct Run {
    text: String,
    /// Children that went into `text`, re-emitted as-is when the run carries no words.
    originals: Vec<Node>,
    elements: Vec<Element>,
    expressions: ExpressionMap,
}

impl Run {
    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.originals.is_empty() && self.elements.is_empty()
    }
}

pub struct TextAggregator<'c> {
    config: &'c LocalizeConfig,
    codec: TokenCodec,
    classifier: ExpressionClassifier,
}

impl<'c> TextAggregator<'c> {
    pub fn new(config: &'c LocalizeConfig) -> Self {
        TextAggregator {
            config,
            codec: TokenCodec::new(config),
            classifier: ExpressionClassifier::new(config),
        }
    }

    pub fn classifier(&self) -> &ExpressionClassifier {
        &self.classifier
    }

    /// Has a closing tag, is not already localized, and has a direct child that is
    /// text with words or a text-producing expression.
    pub fn is_translatable_element(&self, element: &Element) -> bool {
        if !element.closing || element.is_localized(self.config) {
            return false;
        }
        element.children.iter().any(|child| match child {
            Node::Text(text) => has_words(&text.value),
            Node::ExpressionContainer(container) => self.is_text_expression(container),
            _ => false,
        })
    }

    /// Translatable, without a translatable element among its own children.
    pub fn is_simply_translatable(&self, element: &Element) -> bool {
        self.is_translatable_element(element)
            && !element.children.iter().any(|child| match child {
                Node::Element(inner) => self.is_translatable_element(inner),
                _ => false,
            })
    }

    pub fn is_text_expression(&self, container: &ExpressionContainer) -> bool {
        is_text_expression(&container.expression)
    }

    pub fn has_translatable_descendant(&self, node: &Node) -> bool {
        match node {
            Node::Element(element) => {
                self.is_translatable_element(element)
                    || element
                        .children
                        .iter()
                        .any(|child| self.has_translatable_descendant(child))
            }
            Node::Fragment(fragment) => fragment
                .children
                .iter()
                .any(|child| self.has_translatable_descendant(child)),
            _ => false,
        }
    }

    /// Rewrite a child sequence. Returns the new children and the number of
    /// localized elements produced.
    pub fn aggregate(&self, children: Vec<Node>) -> (Vec<Node>, usize) {
        let mut produced = 0;
        let pieces = self.pieces(children, &mut produced);
        let nodes = self.emit_nodes(pieces, &mut produced);
        (nodes, produced)
    }

    fn pieces(&self, children: Vec<Node>, produced: &mut usize) -> Vec<Piece> {
        let mut out = Vec::new();
        let mut run = Run::default();

        for child in children {
            match child {
                Node::Text(text) => {
                    run.text.push_str(&text.value);
                    run.originals.push(Node::Text(text));
                }
                Node::Element(element) if self.is_simply_translatable(&element) => {
                    self.merge_element(element, &mut run, &mut out, produced);
                }
                Node::ExpressionContainer(container) => {
                    match self.classifier.classify(&container.expression) {
                        Some(classified) => {
                            run.text.push_str(&classified.text);
                            run.expressions.extend(classified.expressions);
                            run.originals.push(Node::ExpressionContainer(container));
                        }
                        None => {
                            self.flush(&mut run, &mut out);
                            out.push(Piece::Plain(Node::ExpressionContainer(container)));
                        }
                    }
                }
                other => {
                    self.flush(&mut run, &mut out);
                    out.push(Piece::Plain(other));
                }
            }
        }

        self.flush(&mut run, &mut out);
        out
    }

    /// Splice a simply-translatable child into `run` as an element fence, or emit it
    /// on its own when its content is more than one localized run.
    fn merge_element(
        &self,
        mut element: Element,
        run: &mut Run,
        out: &mut Vec<Piece>,
        produced: &mut usize,
    ) {
        let children = std::mem::take(&mut element.children);
        let mut pieces = self.pieces(children, produced).into_iter();

        let first = pieces.next();
        let rest: Vec<Piece> = pieces.collect();
        let rest_is_plain = rest.iter().all(|piece| match piece {
            Piece::Plain(node) => !self.has_translatable_descendant(node),
            Piece::Localized(_) => false,
        });

        match first {
            Some(Piece::Localized(inner)) if inner.elements.is_empty() && rest_is_plain => {
                let index = run.elements.len();
                run.text.push_str(&self.codec.element(&inner.text, index));
                run.expressions.extend(inner.expressions);

                let mut shell = vec![Text::node(ELEMENT_PLACEHOLDER)];
                shell.extend(self.emit_nodes(rest, produced));
                element.children = shell;
                // A merged element always carries words, so `originals` is never
                // needed for this run.
                run.elements.push(element);
            }
            first => {
                self.flush(run, out);
                let pieces: Vec<Piece> = first.into_iter().chain(rest).collect();
                element.children = self.emit_nodes(pieces, produced);
                out.push(Piece::Plain(Node::Element(element)));
            }
        }
    }

    fn flush(&self, run: &mut Run, out: &mut Vec<Piece>) {
        let run = std::mem::take(run);
        if run.is_empty() {
            return;
        }

        if !has_words(&run.text) {
            out.extend(run.originals.into_iter().map(Piece::Plain));
            return;
        }

        let text = run.text.as_str();
        let trimmed = text.trim();
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];

        debug!(text = trimmed, "added text to translate");

        if !leading.is_empty() {
            out.push(Piece::Plain(Text::node(leading)));
        }
        out.push(Piece::Localized(LocalizedRun {
            text: trimmed.to_string(),
            elements: run.elements,
            expressions: run.expressions,
        }));
        if !trailing.is_empty() {
            out.push(Piece::Plain(Text::node(trailing)));
        }
    }

    fn emit_nodes(&self, pieces: Vec<Piece>, produced: &mut usize) -> Vec<Node> {
        pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Localized(run) => {
                    *produced += 1;
                    Node::Element(localized_element(
                        self.config,
                        &run.text,
                        run.elements,
                        run.expressions,
                    ))
                }
                Piece::Plain(node) => node,
            })
            .collect()
    }
}

/// A string literal that does not look like markup, or a template with words in
/// its literal segments.
pub fn is_text_expression(expression: &Expression) -> bool {
    match expression {
        Expression::String(literal) => {
            !(literal.value.starts_with('<') || literal.value.ends_with('>'))
                && has_words(&literal.value)
        }
        Expression::Template(template) => template.quasis.iter().any(|quasi| has_words(quasi)),
        _ => false,
    }
}
