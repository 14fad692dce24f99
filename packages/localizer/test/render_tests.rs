//! Render Tests
//!
//! Runtime substitution of translated text, element fences and expressions.

use jsx_localizer::markup::{Element, Embedded, HostCode, Node, Text};
use jsx_localizer::printer::print_node;
use jsx_localizer::{
    extract, generate_key, inject, render, Bindings, DirectoryLoader, ElementTemplate, I18n,
    LocalizeConfig, LocalizeError, Rendered, Segment, TokenKind, TranslationEntry,
};

fn shell(name: &str) -> Element {
    Element::new(name).with_children(vec![Text::node("$1")])
}

fn filled(name: &str, content: &str) -> Element {
    Element::new(name).with_children(vec![Text::node(content)])
}

fn catalog(locale: &str, pairs: &[(&str, &str)]) -> I18n {
    let mut i18n = I18n::new(LocalizeConfig::default());
    i18n.set_locale(locale);
    i18n.set_translations(
        pairs
            .iter()
            .map(|(source, translated)| {
                (
                    generate_key(source, 16),
                    TranslationEntry::new("", *translated),
                )
            })
            .collect(),
    );
    i18n
}

fn bind(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_renders_translation_without_bindings() {
    let mut i18n = catalog("zh", &[("Hello world", "你好")]);
    let rendered = render::<Element>(&mut i18n, "Hello world", &[], &Bindings::new()).unwrap();
    assert_eq!(rendered, Rendered::Single(Segment::Text("你好".to_string())));
}

#[test]
fn test_swaps_elements() {
    let mut i18n = I18n::new(LocalizeConfig::default());
    let rendered = render(
        &mut i18n,
        "Hello *world* and the **others**",
        &[shell("b"), shell("i")],
        &Bindings::new(),
    )
    .unwrap();

    assert_eq!(
        rendered.into_segments(),
        vec![
            Segment::Text("Hello ".to_string()),
            Segment::Element(filled("b", "world")),
            Segment::Text(" and the ".to_string()),
            Segment::Element(filled("i", "others")),
        ]
    );
}

#[test]
fn test_swaps_expressions() {
    let mut i18n = I18n::new(LocalizeConfig::default());
    let rendered = render::<Element>(
        &mut i18n,
        "Hello %[user] welcome to %[planet]",
        &[],
        &bind(&[("user", "Tester1"), ("planet", "Earth")]),
    )
    .unwrap();
    assert_eq!(
        rendered,
        Rendered::Single(Segment::Text("Hello Tester1 welcome to Earth".to_string()))
    );
}

#[test]
fn test_swaps_elements_and_expressions() {
    let mut i18n = I18n::new(LocalizeConfig::default());
    let segments = render(
        &mut i18n,
        "Hello *%[user]* welcome to **%[planet]**",
        &[shell("b"), shell("i")],
        &bind(&[("user", "Tester1"), ("planet", "Earth")]),
    )
    .unwrap()
    .into_segments();

    assert_eq!(segments.len(), 4);
    assert_eq!(segments[1], Segment::Element(filled("b", "Tester1")));
    assert_eq!(segments[3], Segment::Element(filled("i", "Earth")));
}

#[test]
fn test_translation_may_reorder_elements() {
    let source = "Hello *world* and the **others**";
    let mut i18n = catalog("de", &[(source, "**Die anderen** und *Welt*")]);
    let segments = render(&mut i18n, source, &[shell("b"), shell("i")], &Bindings::new())
        .unwrap()
        .into_segments();

    assert_eq!(
        segments,
        vec![
            Segment::Element(filled("i", "Die anderen")),
            Segment::Text(" und ".to_string()),
            Segment::Element(filled("b", "Welt")),
        ]
    );
}

#[test]
fn test_adjacent_elements_render_after_injection() {
    let config = LocalizeConfig::default();
    let paragraph = Node::Element(Element::new("p").with_children(vec![
        Text::node("Hello "),
        Node::Element(filled("b", "world")),
        Node::Element(filled("i", "and")),
    ]));
    let source = print_node(&paragraph);
    let mut document = HostCode::new(source.clone());
    document.embedded.push(Embedded::new(0..source.len(), paragraph));

    let (document, _) = inject(document, &config);
    let catalog = extract(&document, "src/App.js", &config).unwrap();
    let (_, entry) = catalog.iter().next().unwrap();
    assert_eq!(entry.text, "Hello *world***and**");

    let mut i18n = I18n::new(config);
    let segments = render(&mut i18n, &entry.text, &[shell("b"), shell("i")], &Bindings::new())
        .unwrap()
        .into_segments();
    assert_eq!(
        segments,
        vec![
            Segment::Text("Hello ".to_string()),
            Segment::Element(filled("b", "world")),
            Segment::Element(filled("i", "and")),
        ]
    );
}

#[test]
fn test_translation_may_join_reordered_elements() {
    let source = "Hello *world***and**";
    let mut i18n = catalog("de", &[(source, "**und***Welt* hallo")]);
    let segments = render(&mut i18n, source, &[shell("b"), shell("i")], &Bindings::new())
        .unwrap()
        .into_segments();
    assert_eq!(
        segments,
        vec![
            Segment::Element(filled("i", "und")),
            Segment::Element(filled("b", "Welt")),
            Segment::Text(" hallo".to_string()),
        ]
    );
}

#[test]
fn test_render_loads_the_active_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let source = "Hello *world*";
    std::fs::write(
        dir.path().join("fr.json"),
        format!(
            r#"{{"{}": {{"text": "Bonjour *le monde*"}}}}"#,
            generate_key(source, 16)
        ),
    )
    .unwrap();

    let mut i18n =
        I18n::new(LocalizeConfig::default()).with_loader(DirectoryLoader::new(dir.path()));
    i18n.set_locale("fr");
    let segments = render(&mut i18n, source, &[shell("b")], &Bindings::new())
        .unwrap()
        .into_segments();

    assert!(!i18n.needs_loading());
    assert_eq!(
        segments,
        vec![
            Segment::Text("Bonjour ".to_string()),
            Segment::Element(filled("b", "le monde")),
        ]
    );
}

#[test]
fn test_missing_fence_is_a_missing_binding() {
    let mut i18n = I18n::new(LocalizeConfig::default());
    let err = render(&mut i18n, "Hello world", &[shell("b")], &Bindings::new()).unwrap_err();
    assert!(matches!(
        err,
        LocalizeError::MissingBinding { kind: TokenKind::Element, .. }
    ));
}

#[test]
fn test_missing_expression_binding() {
    let mut i18n = I18n::new(LocalizeConfig::default());
    let err = render::<Element>(&mut i18n, "Hi %[name]", &[], &Bindings::new()).unwrap_err();
    assert!(matches!(
        err,
        LocalizeError::MissingBinding { kind: TokenKind::Expression, .. }
    ));
}

/// Any element representation can be rendered into.
#[derive(Debug, Clone, PartialEq)]
struct Html(String);

impl ElementTemplate for Html {
    fn fill(&self, content: &str) -> jsx_localizer::Result<Self> {
        Ok(Html(self.0.replacen("$1", content, 1)))
    }
}

#[test]
fn test_custom_element_template() {
    let mut i18n = I18n::new(LocalizeConfig::default());
    let segments = render(
        &mut i18n,
        "Read the *docs*",
        &[Html("<a href=\"/docs\">$1</a>".to_string())],
        &Bindings::new(),
    )
    .unwrap()
    .into_segments();

    let html: String = segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => text,
            Segment::Element(Html(html)) => html,
        })
        .collect();
    assert_eq!(html, "Read the <a href=\"/docs\">docs</a>");
}

#[test]
fn test_filled_element_keeps_other_children() {
    let element = Element::new("a")
        .with_children(vec![Text::node("$1"), Node::Element(Element::self_closing("img"))]);
    let out = element.fill("Home").unwrap();
    assert_eq!(out.children[0], Text::node("Home"));
    assert_eq!(out.children.len(), 2);
}
