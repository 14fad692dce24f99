//! Injection pass
//!
//! Walks a document and rewrites every eligible element into localized runs and
//! every translatable attribute into a lookup call. The returned [`InjectReport`]
//! tells the caller which import lines the rewritten file needs.

use crate::aggregate::{is_text_expression, TextAggregator};
use crate::config::LocalizeConfig;
use crate::markup::{
    has_words, lookup_call, AttributeItem, AttributeValue, CallExpression, Element, Embedded,
    Expression, ExpressionContainer, ExpressionMap, HostCode, Node,
};
use bitflags::bitflags;

bitflags! {
    /// Rewrite forms used by an injection pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InjectReport: u8 {
        /// At least one localized element was produced.
        const ELEMENT = 0b01;
        /// At least one attribute became a lookup call.
        const CALL = 0b10;
    }
}

/// Inject localization into a whole document.
pub fn inject(document: HostCode, config: &LocalizeConfig) -> (HostCode, InjectReport) {
    let mut injector = Injector::new(config);
    let document = injector.inject_host_code(document);
    (document, injector.report())
}

pub struct Injector<'c> {
    config: &'c LocalizeConfig,
    aggregator: TextAggregator<'c>,
    report: InjectReport,
}

impl<'c> Injector<'c> {
    pub fn new(config: &'c LocalizeConfig) -> Self {
        Injector {
            config,
            aggregator: TextAggregator::new(config),
            report: InjectReport::empty(),
        }
    }

    pub fn report(&self) -> InjectReport {
        self.report
    }

    pub fn inject_host_code(&mut self, mut code: HostCode) -> HostCode {
        code.embedded = code
            .embedded
            .into_iter()
            .map(|island| self.inject_island(island))
            .collect();
        code
    }

    /// An island is marked modified when anything inside it was rewritten.
    fn inject_island(&mut self, mut island: Embedded) -> Embedded {
        let outer = std::mem::replace(&mut self.report, InjectReport::empty());
        island.node = self.inject_node(island.node);
        if !self.report.is_empty() {
            island.modified = true;
        }
        self.report |= outer;
        island
    }

    pub fn inject_node(&mut self, node: Node) -> Node {
        match node {
            Node::Element(element) => Node::Element(self.inject_element(element)),
            Node::Fragment(mut fragment) => {
                fragment.children = self.inject_children(fragment.children);
                Node::Fragment(fragment)
            }
            Node::ExpressionContainer(container) => {
                Node::ExpressionContainer(self.inject_container(container))
            }
            Node::Call(call) => Node::Call(self.inject_call(call)),
            Node::Text(text) => Node::Text(text),
        }
    }

    pub fn inject_element(&mut self, mut element: Element) -> Element {
        element.attributes = std::mem::take(&mut element.attributes)
            .into_iter()
            .map(|item| self.inject_attribute(item))
            .collect();

        if self.aggregator.is_translatable_element(&element) {
            let (children, produced) = self
                .aggregator
                .aggregate(std::mem::take(&mut element.children));
            element.children = children;
            if produced > 0 {
                self.report |= InjectReport::ELEMENT;
            }
        }

        element.children = self.inject_children(std::mem::take(&mut element.children));
        element
    }

    fn inject_children(&mut self, children: Vec<Node>) -> Vec<Node> {
        children
            .into_iter()
            .map(|child| self.inject_node(child))
            .collect()
    }

    fn inject_attribute(&mut self, item: AttributeItem) -> AttributeItem {
        match item {
            AttributeItem::Spread(mut spread) => {
                spread.code = self.inject_host_code(spread.code);
                AttributeItem::Spread(spread)
            }
            AttributeItem::Attribute(mut attr) => {
                if self.config.is_translatable_attribute_name(&attr.name) {
                    if let Some(call) = attr.value.as_ref().and_then(|v| self.translate_attribute(v))
                    {
                        let container = ExpressionContainer::new(Expression::Call(call));
                        attr.value = Some(AttributeValue::Expression(container));
                        self.report |= InjectReport::CALL;
                        return AttributeItem::Attribute(attr);
                    }
                }
                attr.value = attr.value.map(|value| self.inject_attribute_value(value));
                AttributeItem::Attribute(attr)
            }
        }
    }

    /// Lookup call for a string literal or text-producing expression value.
    fn translate_attribute(&self, value: &AttributeValue) -> Option<CallExpression> {
        match value {
            AttributeValue::String(literal) if has_words(&literal.value) => Some(lookup_call(
                self.config,
                &literal.value,
                ExpressionMap::new(),
            )),
            AttributeValue::Expression(container) if is_text_expression(&container.expression) => {
                let classified = self.aggregator.classifier().classify(&container.expression)?;
                Some(lookup_call(
                    self.config,
                    &classified.text,
                    classified.expressions,
                ))
            }
            _ => None,
        }
    }

    fn inject_attribute_value(&mut self, value: AttributeValue) -> AttributeValue {
        match value {
            AttributeValue::Expression(container) => {
                AttributeValue::Expression(self.inject_container(container))
            }
            AttributeValue::Element(element) => {
                AttributeValue::Element(Box::new(self.inject_element(*element)))
            }
            AttributeValue::Fragment(mut fragment) => {
                fragment.children = self.inject_children(fragment.children);
                AttributeValue::Fragment(fragment)
            }
            AttributeValue::String(literal) => AttributeValue::String(literal),
        }
    }

    fn inject_container(&mut self, mut container: ExpressionContainer) -> ExpressionContainer {
        container.expression = self.inject_expression(container.expression);
        container
    }

    fn inject_call(&mut self, mut call: CallExpression) -> CallExpression {
        call.arguments = call
            .arguments
            .into_iter()
            .map(|argument| self.inject_expression(argument))
            .collect();
        call
    }

    pub fn inject_expression(&mut self, expression: Expression) -> Expression {
        match expression {
            Expression::Member(code) => Expression::Member(self.inject_host_code(code)),
            Expression::Opaque(code) => Expression::Opaque(self.inject_host_code(code)),
            Expression::Template(mut template) => {
                template.expressions = template
                    .expressions
                    .into_iter()
                    .map(|inner| self.inject_expression(inner))
                    .collect();
                Expression::Template(template)
            }
            Expression::Call(call) => Expression::Call(self.inject_call(call)),
            Expression::Array(items) => Expression::Array(self.inject_children(items)),
            Expression::Object(entries) => Expression::Object(
                entries
                    .into_iter()
                    .map(|(name, value)| (name, self.inject_expression(value)))
                    .collect(),
            ),
            Expression::Identifier(_) | Expression::String(_) => expression,
        }
    }
}
