//! Parser bridge
//!
//! Parses JS/JSX with oxc and lifts the parts the localizer cares about into the
//! owned markup model. Everything else stays verbatim source: a document is a
//! [`HostCode`] holding the outermost JSX trees and lookup calls found in it, with
//! byte ranges so the printer can splice rewritten islands back in place.

use jsx_localizer::markup::{
    self, Attribute, AttributeItem, AttributeValue, Element, Embedded, ExpressionContainer,
    Fragment, HostCode, Node, SpreadAttribute, StringLiteral, TemplateLiteral, Text,
};
use jsx_localizer::{LocalizeConfig, LocalizeError, Result};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, CallExpression, Expression, JSXAttributeItem, JSXAttributeValue, JSXChild,
    JSXElement, JSXExpressionContainer, JSXFragment,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use oxc_syntax::xml_entities::XML_ENTITIES;
use std::borrow::Cow;

/// Parse `source` into a document. `path` picks the source type and names the file
/// in errors.
pub fn parse_document(source: &str, path: &str, config: &LocalizeConfig) -> Result<HostCode> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path)
        .unwrap_or_else(|_| SourceType::mjs())
        .with_jsx(true);

    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = if ret.errors.is_empty() {
            "parser aborted".to_string()
        } else {
            ret.errors
                .iter()
                .map(|error| error.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        };
        return Err(LocalizeError::ParseFailure {
            path: path.to_string(),
            message,
        });
    }

    let converter = Converter::new(source, config);
    let mut collector = EmbeddedCollector::new(&converter, 0);
    collector.visit_program(&ret.program);
    Ok(collector.finish(source))
}

struct Converter<'s> {
    source: &'s str,
    namespace: &'s str,
    callee: String,
}

impl<'s> Converter<'s> {
    fn new(source: &'s str, config: &'s LocalizeConfig) -> Self {
        Converter {
            source,
            namespace: config.i18n_namespace.as_str(),
            callee: config.lookup_callee(),
        }
    }

    fn slice(&self, start: u32, end: u32) -> &'s str {
        &self.source[start as usize..end as usize]
    }

    fn text(&self, span: Span) -> &'s str {
        self.slice(span.start, span.end)
    }

    fn element(&self, it: &JSXElement<'_>) -> Element {
        let opening = &it.opening_element;
        let name_span = opening.name.span();

        let mut cursor = name_span.end;
        let mut attributes = Vec::with_capacity(opening.attributes.len());
        for item in &opening.attributes {
            let span = item.span();
            let leading = self.slice(cursor, span.start).to_string();
            attributes.push(self.attribute(item, leading));
            cursor = span.end;
        }

        let closing = it.closing_element.is_some();
        let rest = self.slice(cursor, opening.span.end);
        let mut tag_trailing = rest.strip_suffix('>').unwrap_or(rest);
        if !closing {
            tag_trailing = tag_trailing
                .trim_end()
                .strip_suffix('/')
                .unwrap_or(tag_trailing);
        }

        Element {
            name: self.text(name_span).to_string(),
            attributes,
            tag_trailing: tag_trailing.to_string(),
            children: it.children.iter().map(|child| self.child(child)).collect(),
            closing,
        }
    }

    fn fragment(&self, it: &JSXFragment<'_>) -> Fragment {
        Fragment {
            children: it.children.iter().map(|child| self.child(child)).collect(),
        }
    }

    fn child(&self, child: &JSXChild<'_>) -> Node {
        match child {
            JSXChild::Text(text) => Text::node(decode_entities(self.text(text.span))),
            JSXChild::Element(element) => Node::Element(self.element(element)),
            JSXChild::Fragment(fragment) => Node::Fragment(self.fragment(fragment)),
            JSXChild::ExpressionContainer(container) => {
                Node::ExpressionContainer(self.container(container))
            }
            JSXChild::Spread(spread) => {
                let code = self.host_code(spread.span.start + 1, spread.span.end - 1, |c| {
                    c.visit_expression(&spread.expression)
                });
                ExpressionContainer::node(markup::Expression::Opaque(code))
            }
        }
    }

    fn attribute(&self, item: &JSXAttributeItem<'_>, leading: String) -> AttributeItem {
        match item {
            JSXAttributeItem::Attribute(attr) => {
                let name_span = attr.name.span();
                let (separator, value) = match &attr.value {
                    Some(value) => (
                        self.slice(name_span.end, value.span().start).to_string(),
                        Some(self.attribute_value(value)),
                    ),
                    None => (String::new(), None),
                };
                AttributeItem::Attribute(Attribute {
                    leading,
                    name: self.text(name_span).to_string(),
                    separator,
                    value,
                })
            }
            JSXAttributeItem::SpreadAttribute(spread) => {
                let code = self.host_code(spread.span.start + 1, spread.span.end - 1, |c| {
                    c.visit_expression(&spread.argument)
                });
                AttributeItem::Spread(SpreadAttribute { leading, code })
            }
        }
    }

    fn attribute_value(&self, value: &JSXAttributeValue<'_>) -> AttributeValue {
        match value {
            JSXAttributeValue::StringLiteral(literal) => AttributeValue::String(StringLiteral {
                value: decode_entities(&literal.value).into_owned(),
                raw: Some(self.text(literal.span).to_string()),
            }),
            JSXAttributeValue::ExpressionContainer(container) => {
                AttributeValue::Expression(self.container(container))
            }
            JSXAttributeValue::Element(element) => {
                AttributeValue::Element(Box::new(self.element(element)))
            }
            JSXAttributeValue::Fragment(fragment) => {
                AttributeValue::Fragment(self.fragment(fragment))
            }
        }
    }

    fn container(&self, it: &JSXExpressionContainer<'_>) -> ExpressionContainer {
        let (inner_start, inner_end) = (it.span.start + 1, it.span.end - 1);
        match it.expression.as_expression() {
            Some(expression) => {
                let span = expression.span();
                ExpressionContainer {
                    leading: self.slice(inner_start, span.start).to_string(),
                    expression: self.expression(expression),
                    trailing: self.slice(span.end, inner_end).to_string(),
                }
            }
            // `{}` or `{/* comment */}`
            None => ExpressionContainer::new(markup::Expression::Opaque(HostCode::new(
                self.slice(inner_start, inner_end),
            ))),
        }
    }

    fn expression(&self, expression: &Expression<'_>) -> markup::Expression {
        match expression {
            Expression::Identifier(identifier) => {
                markup::Expression::Identifier(identifier.name.to_string())
            }
            Expression::StringLiteral(literal) => markup::Expression::String(StringLiteral {
                value: literal.value.to_string(),
                raw: Some(self.text(literal.span).to_string()),
            }),
            Expression::TemplateLiteral(template) => {
                markup::Expression::Template(TemplateLiteral {
                    source: self.text(template.span).to_string(),
                    quasis: template
                        .quasis
                        .iter()
                        .map(|quasi| quasi.value.raw.to_string())
                        .collect(),
                    expressions: template
                        .expressions
                        .iter()
                        .map(|inner| self.expression(inner))
                        .collect(),
                })
            }
            Expression::CallExpression(call) if self.is_lookup(call) => {
                markup::Expression::Call(self.lookup(call))
            }
            _ if expression.is_member_expression() => {
                markup::Expression::Member(self.expression_code(expression))
            }
            _ => markup::Expression::Opaque(self.expression_code(expression)),
        }
    }

    /// `<namespace>.t(...)`
    fn is_lookup(&self, call: &CallExpression<'_>) -> bool {
        match &call.callee {
            Expression::StaticMemberExpression(member) => {
                member.property.name.as_str() == "t"
                    && matches!(&member.object,
                        Expression::Identifier(object) if object.name.as_str() == self.namespace)
            }
            _ => false,
        }
    }

    fn lookup(&self, call: &CallExpression<'_>) -> markup::CallExpression {
        markup::CallExpression {
            callee: self.callee.clone(),
            arguments: call
                .arguments
                .iter()
                .map(|argument| self.argument(argument))
                .collect(),
        }
    }

    fn argument(&self, argument: &Argument<'_>) -> markup::Expression {
        match argument.as_expression() {
            Some(expression) => self.expression(expression),
            None => {
                let span = argument.span();
                markup::Expression::Opaque(self.host_code(span.start, span.end, |c| {
                    c.visit_argument(argument)
                }))
            }
        }
    }

    fn expression_code(&self, expression: &Expression<'_>) -> HostCode {
        let span = expression.span();
        self.host_code(span.start, span.end, |c| c.visit_expression(expression))
    }

    /// Verbatim code for `start..end`, with the islands `visit` finds in it.
    fn host_code(
        &self,
        start: u32,
        end: u32,
        visit: impl FnOnce(&mut EmbeddedCollector<'_, 's>),
    ) -> HostCode {
        let mut collector = EmbeddedCollector::new(self, start);
        visit(&mut collector);
        collector.finish(self.slice(start, end))
    }
}

/// Collects the outermost JSX trees and lookup calls below a node.
struct EmbeddedCollector<'c, 's> {
    converter: &'c Converter<'s>,
    base: u32,
    embedded: Vec<Embedded>,
}

impl<'c, 's> EmbeddedCollector<'c, 's> {
    fn new(converter: &'c Converter<'s>, base: u32) -> Self {
        EmbeddedCollector {
            converter,
            base,
            embedded: Vec::new(),
        }
    }

    fn push(&mut self, span: Span, node: Node) {
        let range = (span.start - self.base) as usize..(span.end - self.base) as usize;
        self.embedded.push(Embedded::new(range, node));
    }

    fn finish(self, source: &str) -> HostCode {
        HostCode {
            source: source.to_string(),
            embedded: self.embedded,
        }
    }
}

impl<'a> Visit<'a> for EmbeddedCollector<'_, '_> {
    fn visit_jsx_element(&mut self, it: &JSXElement<'a>) {
        let node = Node::Element(self.converter.element(it));
        self.push(it.span, node);
    }

    fn visit_jsx_fragment(&mut self, it: &JSXFragment<'a>) {
        let node = Node::Fragment(self.converter.fragment(it));
        self.push(it.span, node);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if self.converter.is_lookup(it) {
            let node = Node::Call(self.converter.lookup(it));
            self.push(it.span, node);
        } else {
            walk::walk_call_expression(self, it);
        }
    }
}

/// JSX text with its character references (`&amp;`, `&#169;`, `&#x2014;`) decoded.
/// Unknown references are kept as written.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match character_reference(rest) {
            Some((c, length)) => {
                decoded.push(c);
                rest = &rest[length..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

/// The character `text` starts with a reference to, and the reference's length.
fn character_reference(text: &str) -> Option<(char, usize)> {
    let end = text[1..].find(';')? + 1;
    let name = &text[1..end];
    let c = match name.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
        None => *XML_ENTITIES.get(name)?,
    };
    Some((c, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsx_localizer::markup::Expression as Expr;

    fn parse(source: &str) -> HostCode {
        parse_document(source, "test.jsx", &LocalizeConfig::default()).unwrap()
    }

    fn only_element(document: &HostCode) -> &Element {
        assert_eq!(document.embedded.len(), 1);
        match &document.embedded[0].node {
            Node::Element(element) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn finds_outermost_markup_only() {
        let document = parse("const a = <div><b>x</b></div>;\nconst b = <p/>;\n");
        assert_eq!(document.embedded.len(), 2);
        assert_eq!(&document.source[document.embedded[0].range.clone()], "<div><b>x</b></div>");
        assert_eq!(&document.source[document.embedded[1].range.clone()], "<p/>");
    }

    #[test]
    fn keeps_attribute_whitespace() {
        let document = parse("x = <input  title = \"Hi\" disabled />;");
        let element = only_element(&document);
        assert!(!element.closing);
        assert_eq!(element.tag_trailing, " ");
        match &element.attributes[0] {
            AttributeItem::Attribute(attr) => {
                assert_eq!(attr.leading, "  ");
                assert_eq!(attr.name, "title");
                assert_eq!(attr.separator, " = ");
            }
            AttributeItem::Spread(_) => panic!("expected attribute"),
        }
        match &element.attributes[1] {
            AttributeItem::Attribute(attr) => {
                assert_eq!(attr.name, "disabled");
                assert!(attr.value.is_none());
            }
            AttributeItem::Spread(_) => panic!("expected attribute"),
        }
    }

    #[test]
    fn classifies_container_expressions() {
        let document = parse("x = <p>{name}{this.props.user}{`a ${b}`}{a && b}</p>;");
        let element = only_element(&document);
        let kinds: Vec<_> = element
            .children
            .iter()
            .map(|child| match child {
                Node::ExpressionContainer(container) => match &container.expression {
                    Expr::Identifier(_) => "identifier",
                    Expr::Member(_) => "member",
                    Expr::Template(_) => "template",
                    Expr::Opaque(_) => "opaque",
                    _ => "other",
                },
                _ => "node",
            })
            .collect();
        assert_eq!(kinds, vec!["identifier", "member", "template", "opaque"]);
    }

    #[test]
    fn lookup_calls_are_islands() {
        let document = parse("const s = i18n.t(\"Hello\");\nconsole.log(i18n.t('Bye'));\n");
        assert_eq!(document.embedded.len(), 2);
        match &document.embedded[1].node {
            Node::Call(call) => {
                assert_eq!(call.callee, "i18n.t");
                assert!(matches!(&call.arguments[0], Expr::String(s) if s.value == "Bye"));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn markup_inside_expressions_is_nested() {
        let document = parse("x = <div>{ok && <span>Saved</span>}</div>;");
        let element = only_element(&document);
        let Node::ExpressionContainer(container) = &element.children[0] else {
            panic!("expected container");
        };
        let Expr::Opaque(code) = &container.expression else {
            panic!("expected opaque expression");
        };
        assert_eq!(code.source, "ok && <span>Saved</span>");
        assert_eq!(&code.source[code.embedded[0].range.clone()], "<span>Saved</span>");
    }

    #[test]
    fn character_references_are_decoded() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&copy; 2024 &#169; &#xA9;"), "© 2024 © ©");
        assert_eq!(decode_entities("a &bogus; & b &"), "a &bogus; & b &");
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn markup_text_and_attributes_are_decoded() {
        let document = parse("x = <p title=\"Q&amp;A\">Tom &amp; Jerry</p>;");
        let element = only_element(&document);
        assert_eq!(element.children, vec![Text::node("Tom & Jerry")]);
        match &element.attributes[0] {
            AttributeItem::Attribute(attr) => match &attr.value {
                Some(AttributeValue::String(literal)) => {
                    assert_eq!(literal.value, "Q&A");
                    assert_eq!(literal.raw.as_deref(), Some("\"Q&amp;A\""));
                }
                other => panic!("expected string value, got {:?}", other),
            },
            AttributeItem::Spread(_) => panic!("expected attribute"),
        }
    }

    #[test]
    fn syntax_errors_are_parse_failures() {
        let err = parse_document("const = <div>", "broken.js", &LocalizeConfig::default())
            .unwrap_err();
        match err {
            LocalizeError::ParseFailure { path, .. } => assert_eq!(path, "broken.js"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
