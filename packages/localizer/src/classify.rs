//! Expression classification
//!
//! Decides whether an embedded expression can take part in localized text and, if
//! so, what it contributes: literal text, an expression token, or a template with
//! its interpolations replaced by tokens.

use crate::config::LocalizeConfig;
use crate::markup::{Expression, ExpressionMap, TemplateLiteral};
use crate::printer::print_host_code;
use crate::tokens::TokenCodec;
use once_cell::sync::Lazy;
use regex::Regex;

static INTERPOLATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{.+?\}").unwrap());
static INTERPOLATION_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$\{(.+)\}$").unwrap());
static NAME_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z\d.]").unwrap());

/// Compress a printed expression into a placeholder name:
/// `this.props.user.name` → `this-props-user-name`, `${count + 1}` → `count1`.
pub fn placeholder_name(printed: &str) -> String {
    let body = INTERPOLATION_BODY
        .captures(printed)
        .and_then(|caps| caps.get(1))
        .map_or(printed, |m| m.as_str());
    NAME_NOISE.replace_all(body, "").replace('.', "-")
}

/// Text contributed by an expression plus the bindings it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub text: String,
    pub expressions: ExpressionMap,
}

#[derive(Debug, Clone)]
pub struct ExpressionClassifier {
    codec: TokenCodec,
}

impl ExpressionClassifier {
    pub fn new(config: &LocalizeConfig) -> Self {
        ExpressionClassifier {
            codec: TokenCodec::new(config),
        }
    }

    /// `None` means the expression cannot be part of localized text.
    pub fn classify(&self, expression: &Expression) -> Option<Classified> {
        match expression {
            Expression::Identifier(name) => Some(self.reference(name, expression)),
            Expression::Member(code) => Some(self.reference(&print_host_code(code), expression)),
            Expression::String(literal) => Some(Classified {
                text: literal.value.clone(),
                expressions: ExpressionMap::new(),
            }),
            Expression::Template(template) => self.template(template),
            Expression::Call(_)
            | Expression::Opaque(_)
            | Expression::Array(_)
            | Expression::Object(_) => None,
        }
    }

    fn reference(&self, printed: &str, expression: &Expression) -> Classified {
        let name = placeholder_name(printed);
        let mut expressions = ExpressionMap::new();
        let text = self.codec.expression(&name);
        expressions.insert(name, expression.clone());
        Classified { text, expressions }
    }

    fn template(&self, template: &TemplateLiteral) -> Option<Classified> {
        let body = template_body(&template.source);
        let markers: Vec<&str> = INTERPOLATION.find_iter(body).map(|m| m.as_str()).collect();
        if markers.len() != template.expressions.len() {
            return None;
        }

        let mut text = body.to_string();
        let mut expressions = ExpressionMap::new();
        for (marker, expression) in markers.into_iter().zip(&template.expressions) {
            let name = placeholder_name(marker);
            text = text.replacen(marker, &self.codec.expression(&name), 1);
            expressions.insert(name, expression.clone());
        }
        Some(Classified { text, expressions })
    }
}

fn template_body(source: &str) -> &str {
    source
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{HostCode, StringLiteral};

    fn classifier() -> ExpressionClassifier {
        ExpressionClassifier::new(&LocalizeConfig::default())
    }

    fn template(source: &str, expressions: Vec<Expression>) -> Expression {
        Expression::Template(TemplateLiteral {
            source: source.to_string(),
            quasis: Vec::new(),
            expressions,
        })
    }

    #[test]
    fn names_strip_everything_but_path_characters() {
        assert_eq!(placeholder_name("this.props.user.name"), "this-props-user-name");
        assert_eq!(placeholder_name("${count+1}"), "count1");
        assert_eq!(placeholder_name("${ a.b }"), "a-b");
        assert_eq!(placeholder_name("items[0]"), "items0");
    }

    #[test]
    fn member_path_becomes_a_single_token() {
        let member = Expression::Member(HostCode::new("this.props.user.name"));
        let classified = classifier().classify(&member).unwrap();
        assert_eq!(classified.text, "%[this-props-user-name]");
        assert_eq!(classified.expressions.get("this-props-user-name"), Some(&member));
    }

    #[test]
    fn template_interpolations_become_tokens() {
        let user_name = Expression::Member(HostCode::new("user.name"));
        let count = Expression::Opaque(HostCode::new("count+1"));
        let expression = template(
            "`${user.name} has ${count+1} items`",
            vec![user_name.clone(), count.clone()],
        );

        let classified = classifier().classify(&expression).unwrap();
        assert_eq!(classified.text, "%[user-name] has %[count1] items");
        let names: Vec<_> = classified.expressions.keys().cloned().collect();
        assert_eq!(names, vec!["user-name", "count1"]);
        assert_eq!(classified.expressions["user-name"], user_name);
        assert_eq!(classified.expressions["count1"], count);
    }

    #[test]
    fn template_marker_mismatch_is_unclassified() {
        let expression = template(
            r"`costs \${price} for ${name}`",
            vec![Expression::Identifier("name".to_string())],
        );
        assert_eq!(classifier().classify(&expression), None);
    }

    #[test]
    fn string_literal_contributes_its_value() {
        let literal = Expression::String(StringLiteral::new("Hello"));
        let classified = classifier().classify(&literal).unwrap();
        assert_eq!(classified.text, "Hello");
        assert!(classified.expressions.is_empty());
    }

    #[test]
    fn other_expressions_are_not_classified() {
        let opaque = Expression::Opaque(HostCode::new("a && b"));
        assert_eq!(classifier().classify(&opaque), None);
    }
}
