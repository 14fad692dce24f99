//! Printer
//!
//! Turns markup trees back into source text. Host code is spliced: islands that no
//! pass modified are copied from the original source byte for byte, so formatting
//! outside rewritten markup is untouched.

use crate::markup::{
    AttributeItem, AttributeValue, CallExpression, Element, Expression, ExpressionContainer,
    Fragment, HostCode, Node, StringLiteral, TemplateLiteral, Text,
};

pub fn print_host_code(code: &HostCode) -> String {
    let mut printer = Printer::default();
    printer.host_code(code);
    printer.out
}

pub fn print_node(node: &Node) -> String {
    let mut printer = Printer::default();
    printer.node(node);
    printer.out
}

pub fn print_expression(expression: &Expression) -> String {
    let mut printer = Printer::default();
    printer.expression(expression);
    printer.out
}

/// Quote `value` as a double-quoted string literal.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn host_code(&mut self, code: &HostCode) {
        let mut cursor = 0;
        for island in &code.embedded {
            self.out.push_str(&code.source[cursor..island.range.start]);
            if island.modified {
                self.node(&island.node);
            } else {
                self.out.push_str(&code.source[island.range.clone()]);
            }
            cursor = island.range.end;
        }
        self.out.push_str(&code.source[cursor..]);
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Element(element) => self.element(element),
            Node::Text(text) => self.text(text),
            Node::ExpressionContainer(container) => self.container(container),
            Node::Fragment(fragment) => self.fragment(fragment),
            Node::Call(call) => self.call(call),
        }
    }

    fn element(&mut self, element: &Element) {
        self.out.push('<');
        self.out.push_str(&element.name);
        for item in &element.attributes {
            match item {
                AttributeItem::Attribute(attr) => {
                    self.out.push_str(&attr.leading);
                    self.out.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        self.out.push_str(&attr.separator);
                        self.attribute_value(value);
                    }
                }
                AttributeItem::Spread(spread) => {
                    self.out.push_str(&spread.leading);
                    self.out.push('{');
                    self.host_code(&spread.code);
                    self.out.push('}');
                }
            }
        }
        self.out.push_str(&element.tag_trailing);

        if !element.closing {
            self.out.push_str("/>");
            return;
        }

        self.out.push('>');
        for child in &element.children {
            self.node(child);
        }
        self.out.push_str("</");
        self.out.push_str(&element.name);
        self.out.push('>');
    }

    fn attribute_value(&mut self, value: &AttributeValue) {
        match value {
            AttributeValue::String(literal) => self.string(literal),
            AttributeValue::Expression(container) => self.container(container),
            AttributeValue::Element(element) => self.element(element),
            AttributeValue::Fragment(fragment) => self.fragment(fragment),
        }
    }

    fn text(&mut self, text: &Text) {
        if text.value.contains(['{', '}', '<', '>', '&']) {
            self.out.push('{');
            self.out.push_str(&quote(&text.value));
            self.out.push('}');
        } else {
            self.out.push_str(&text.value);
        }
    }

    fn container(&mut self, container: &ExpressionContainer) {
        self.out.push('{');
        self.out.push_str(&container.leading);
        self.expression(&container.expression);
        self.out.push_str(&container.trailing);
        self.out.push('}');
    }

    fn fragment(&mut self, fragment: &Fragment) {
        self.out.push_str("<>");
        for child in &fragment.children {
            self.node(child);
        }
        self.out.push_str("</>");
    }

    fn call(&mut self, call: &CallExpression) {
        self.out.push_str(&call.callee);
        self.out.push('(');
        for (i, argument) in call.arguments.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expression(argument);
        }
        self.out.push(')');
    }

    fn string(&mut self, literal: &StringLiteral) {
        match &literal.raw {
            Some(raw) => self.out.push_str(raw),
            None => self.out.push_str(&quote(&literal.value)),
        }
    }

    fn template(&mut self, template: &TemplateLiteral) {
        if template.expressions.iter().all(is_untouched) {
            self.out.push_str(&template.source);
            return;
        }
        self.out.push('`');
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.out.push_str(quasi);
            if let Some(expression) = template.expressions.get(i) {
                self.out.push_str("${");
                self.expression(expression);
                self.out.push('}');
            }
        }
        self.out.push('`');
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Identifier(name) => self.out.push_str(name),
            Expression::Member(code) | Expression::Opaque(code) => self.host_code(code),
            Expression::String(literal) => self.string(literal),
            Expression::Template(template) => self.template(template),
            Expression::Call(call) => self.call(call),
            Expression::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.node(item);
                }
                self.out.push(']');
            }
            Expression::Object(entries) => {
                self.out.push('{');
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&quote(name));
                    self.out.push_str(": ");
                    self.expression(value);
                }
                self.out.push('}');
            }
        }
    }
}

fn is_untouched(expression: &Expression) -> bool {
    match expression {
        Expression::Member(code) | Expression::Opaque(code) => {
            code.embedded.iter().all(|island| !island.modified)
        }
        Expression::Template(template) => template.expressions.iter().all(is_untouched),
        _ => true,
    }
}
