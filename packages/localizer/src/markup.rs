//! Markup AST
//!
//! Owned tree of the markup fragments found in host-language source. Passes take
//! nodes by value and hand back new ones; no node is shared between two parents.
//!
//! Host-language code the engine does not understand is kept verbatim in a
//! [`HostCode`], together with the markup islands found inside it, so that printing
//! can copy untouched code straight from the original source.

use crate::config::LocalizeConfig;
use indexmap::IndexMap;
use std::ops::Range;

/// Placeholder name → original sub-expression, in first-seen order.
pub type ExpressionMap = IndexMap<String, Expression>;

/// Node type union
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    ExpressionContainer(ExpressionContainer),
    Fragment(Fragment),
    Call(CallExpression),
}

/// Element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written, e.g. `div`, `Foo.Bar`.
    pub name: String,
    pub attributes: Vec<AttributeItem>,
    /// Source between the last attribute and the end of the opening tag.
    pub tag_trailing: String,
    pub children: Vec<Node>,
    /// `false` for the self-closing form `<img/>`.
    pub closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            tag_trailing: String::new(),
            children: Vec::new(),
            closing: true,
        }
    }

    pub fn self_closing(name: impl Into<String>) -> Self {
        Element {
            closing: false,
            ..Element::new(name)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes
            .push(AttributeItem::Attribute(Attribute::new(name, Some(value))));
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find_map(|item| match item {
            AttributeItem::Attribute(attr) if attr.name == name => Some(attr),
            _ => None,
        })
    }

    /// Whether this is a canonical localized element for `config`.
    pub fn is_localized(&self, config: &LocalizeConfig) -> bool {
        self.closing && self.name == config.component_name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeItem {
    Attribute(Attribute),
    Spread(SpreadAttribute),
}

/// Attribute node
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Whitespace (and comments) before the attribute name.
    pub leading: String,
    pub name: String,
    /// Source between the name and the value, normally `=`.
    pub separator: String,
    pub value: Option<AttributeValue>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<AttributeValue>) -> Self {
        Attribute {
            leading: " ".to_string(),
            name: name.into(),
            separator: "=".to_string(),
            value,
        }
    }
}

/// `{...props}` inside an opening tag.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadAttribute {
    pub leading: String,
    /// Everything between the braces.
    pub code: HostCode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(StringLiteral),
    Expression(ExpressionContainer),
    Element(Box<Element>),
    Fragment(Fragment),
}

/// Text node
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Text {
            value: value.into(),
        }
    }

    pub fn node(value: impl Into<String>) -> Node {
        Node::Text(Text::new(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionContainer {
    /// Source between `{` and the expression.
    pub leading: String,
    pub expression: Expression,
    /// Source between the expression and `}`.
    pub trailing: String,
}

impl ExpressionContainer {
    pub fn new(expression: Expression) -> Self {
        ExpressionContainer {
            leading: String::new(),
            expression,
            trailing: String::new(),
        }
    }

    pub fn node(expression: Expression) -> Node {
        Node::ExpressionContainer(ExpressionContainer::new(expression))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

/// Embedded host-language expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    /// Member access path such as `this.props.user` or `(user || {}).name`.
    Member(HostCode),
    String(StringLiteral),
    Template(TemplateLiteral),
    /// Lookup call `<namespace>.t(...)`.
    Call(CallExpression),
    /// Anything else, kept verbatim.
    Opaque(HostCode),
    /// Array of markup, as in the generated `elements` attribute.
    Array(Vec<Node>),
    /// Object literal with string keys, as in the generated `expressions` attribute.
    Object(ExpressionMap),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Cooked value.
    pub value: String,
    /// Original source including quotes; `None` for generated literals.
    pub raw: Option<String>,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        StringLiteral {
            value: value.into(),
            raw: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    /// Original source including the backticks.
    pub source: String,
    /// Raw literal segments; always one more than `expressions`.
    pub quasis: Vec<String>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: String,
    pub arguments: Vec<Expression>,
}

impl CallExpression {
    pub fn is_lookup(&self, config: &LocalizeConfig) -> bool {
        self.callee == config.lookup_callee()
    }
}

/// Verbatim host-language code with the markup islands found inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostCode {
    pub source: String,
    /// Sorted, non-overlapping.
    pub embedded: Vec<Embedded>,
}

impl HostCode {
    pub fn new(source: impl Into<String>) -> Self {
        HostCode {
            source: source.into(),
            embedded: Vec::new(),
        }
    }
}

/// A markup island (or lookup call) inside [`HostCode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    /// Byte range within the enclosing `HostCode::source`.
    pub range: Range<usize>,
    pub node: Node,
    /// Set by a rewrite; unmodified islands print as their original source.
    pub modified: bool,
}

impl Embedded {
    pub fn new(range: Range<usize>, node: Node) -> Self {
        Embedded {
            range,
            node,
            modified: false,
        }
    }
}

/// Whether `text` carries human-readable content: at least one letter, in any
/// script. Digits alone do not count, so text such as `42` or `3.50 €` is never
/// localized.
pub fn has_words(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Build the canonical localized element
/// `<Localize elements={[...]} expressions={{...}}>text</Localize>`.
pub fn localized_element(
    config: &LocalizeConfig,
    text: &str,
    elements: Vec<Element>,
    expressions: ExpressionMap,
) -> Element {
    let mut element = Element::new(config.component_name.clone());

    if !elements.is_empty() {
        let array = Expression::Array(elements.into_iter().map(Node::Element).collect());
        element = element.with_attribute(
            "elements",
            AttributeValue::Expression(ExpressionContainer::new(array)),
        );
    }

    if !expressions.is_empty() {
        element = element.with_attribute(
            "expressions",
            AttributeValue::Expression(ExpressionContainer::new(Expression::Object(expressions))),
        );
    }

    element.with_children(vec![Text::node(text)])
}

/// Build the lookup call `<namespace>.t("text", {...})`.
pub fn lookup_call(config: &LocalizeConfig, text: &str, expressions: ExpressionMap) -> CallExpression {
    let mut arguments = vec![Expression::String(StringLiteral::new(text))];
    if !expressions.is_empty() {
        arguments.push(Expression::Object(expressions));
    }
    CallExpression {
        callee: config.lookup_callee(),
        arguments,
    }
}
