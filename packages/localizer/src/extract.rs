//! Extraction pass
//!
//! Read-only walk recovering catalog entries from localized elements and lookup
//! calls.

use crate::catalog::{TranslationEntry, Translations};
use crate::config::LocalizeConfig;
use crate::digest::generate_key;
use crate::error::{LocalizeError, Result};
use crate::markup::{
    AttributeItem, AttributeValue, CallExpression, Element, Expression, HostCode, Node,
};
use tracing::debug;

/// Collect every localized text in `document`, described by `description`.
pub fn extract(document: &HostCode, description: &str, config: &LocalizeConfig) -> Result<Translations> {
    let mut extractor = Extractor::new(config, description);
    extractor.visit_host_code(document)?;
    Ok(extractor.finish())
}

pub struct Extractor<'c> {
    config: &'c LocalizeConfig,
    description: String,
    translations: Translations,
}

impl<'c> Extractor<'c> {
    pub fn new(config: &'c LocalizeConfig, description: impl Into<String>) -> Self {
        Extractor {
            config,
            description: description.into(),
            translations: Translations::new(),
        }
    }

    pub fn finish(self) -> Translations {
        self.translations
    }

    pub fn visit_host_code(&mut self, code: &HostCode) -> Result<()> {
        for island in &code.embedded {
            self.visit_node(&island.node)?;
        }
        Ok(())
    }

    pub fn visit_node(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Element(element) => self.visit_element(element),
            Node::Fragment(fragment) => self.visit_children(&fragment.children),
            Node::ExpressionContainer(container) => self.visit_expression(&container.expression),
            Node::Call(call) => self.visit_call(call),
            Node::Text(_) => Ok(()),
        }
    }

    fn visit_children(&mut self, children: &[Node]) -> Result<()> {
        for child in children {
            self.visit_node(child)?;
        }
        Ok(())
    }

    fn visit_element(&mut self, element: &Element) -> Result<()> {
        if element.is_localized(self.config) {
            self.extract_element(element)?;
        }

        for item in &element.attributes {
            match item {
                AttributeItem::Attribute(attr) => match &attr.value {
                    Some(AttributeValue::Expression(container)) => {
                        self.visit_expression(&container.expression)?
                    }
                    Some(AttributeValue::Element(inner)) => self.visit_element(inner)?,
                    Some(AttributeValue::Fragment(fragment)) => {
                        self.visit_children(&fragment.children)?
                    }
                    Some(AttributeValue::String(_)) | None => {}
                },
                AttributeItem::Spread(spread) => self.visit_host_code(&spread.code)?,
            }
        }

        self.visit_children(&element.children)
    }

    fn visit_call(&mut self, call: &CallExpression) -> Result<()> {
        if call.is_lookup(self.config) {
            self.extract_call(call)?;
        }
        for argument in &call.arguments {
            self.visit_expression(argument)?;
        }
        Ok(())
    }

    fn visit_expression(&mut self, expression: &Expression) -> Result<()> {
        match expression {
            Expression::Member(code) | Expression::Opaque(code) => self.visit_host_code(code),
            Expression::Template(template) => {
                for inner in &template.expressions {
                    self.visit_expression(inner)?;
                }
                Ok(())
            }
            Expression::Call(call) => self.visit_call(call),
            Expression::Array(items) => self.visit_children(items),
            Expression::Object(entries) => {
                for value in entries.values() {
                    self.visit_expression(value)?;
                }
                Ok(())
            }
            Expression::Identifier(_) | Expression::String(_) => Ok(()),
        }
    }

    fn extract_element(&mut self, element: &Element) -> Result<()> {
        let single = self.config.ensure(element.children.len() == 1, || {
            LocalizeError::InvalidStructure(format!(
                "{} element should only have 1 child, found {}",
                element.name,
                element.children.len()
            ))
        })?;
        if !single {
            return Ok(());
        }

        let text = match &element.children[0] {
            Node::Text(text) => Some(&text.value),
            Node::ExpressionContainer(container) => match &container.expression {
                Expression::String(literal) => Some(&literal.value),
                _ => None,
            },
            _ => None,
        };

        match text {
            Some(text) => self.record(text),
            None => self.config.violation(LocalizeError::InvalidStructure(format!(
                "{} element child should be text",
                element.name
            ))),
        }
    }

    fn extract_call(&mut self, call: &CallExpression) -> Result<()> {
        let has_argument = self.config.ensure(!call.arguments.is_empty(), || {
            LocalizeError::InvalidStructure(format!(
                "{}() should have at least 1 argument",
                call.callee
            ))
        })?;
        if !has_argument {
            return Ok(());
        }

        match &call.arguments[0] {
            Expression::String(literal) => self.record(&literal.value),
            _ => {
                debug!(callee = %call.callee, "skipping lookup call with computed text");
                Ok(())
            }
        }
    }

    fn record(&mut self, text: &str) -> Result<()> {
        let key = generate_key(text, self.config.max_translation_key_length);
        let entry = TranslationEntry::new(self.description.clone(), text);
        self.translations.merge_entry(key, entry, self.config)
    }
}
