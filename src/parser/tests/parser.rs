use crate::parser::ast::Node;
use crate::parser::Parser;

fn parse(source: &str) -> crate::parser::ParsedTemplate {
    Parser::new("test", source).parse().unwrap()
}

#[test]
fn parses_text_only() {
    let parsed = parse("hello world");
    assert_eq!(parsed.nodes, vec![Node::Text("hello world".to_string())]);
    assert!(parsed.extends.is_none());
    assert!(parsed.blocks.is_empty());
}

#[test]
fn parses_empty_template() {
    let parsed = parse("");
    assert!(parsed.nodes.is_empty());
}

#[test]
fn parses_text_and_values() {
    let parsed = parse("hello {{ name }}!");
    assert_eq!(parsed.nodes.len(), 3);
    assert!(matches!(parsed.nodes[0], Node::Text(_)));
    assert!(matches!(parsed.nodes[1], Node::Value(_)));
    assert!(matches!(parsed.nodes[2], Node::Text(_)));
}

#[test]
fn comments_are_discarded() {
    let parsed = parse("a{# not rendered #}b");
    assert_eq!(
        parsed.nodes,
        vec![Node::Text("a".to_string()), Node::Text("b".to_string())]
    );
}

#[test]
fn parses_if_chains() {
    let parsed = parse("{% if a %}A{% elif b %}B{% elif c %}C{% else %}D{% endif %}");
    assert_eq!(parsed.nodes.len(), 1);
    match &parsed.nodes[0] {
        Node::If(chain) => {
            assert_eq!(chain.conditions.len(), 3);
            assert_eq!(chain.conditions[1].1, vec![Node::Text("B".to_string())]);
            assert_eq!(chain.otherwise, Some(vec![Node::Text("D".to_string())]));
        }
        node => panic!("expected an if chain, got {:?}", node),
    }
}

#[test]
fn parses_if_without_else() {
    let parsed = parse("{% if a %}A{% endif %}");
    match &parsed.nodes[0] {
        Node::If(chain) => {
            assert_eq!(chain.conditions.len(), 1);
            assert!(chain.otherwise.is_none());
        }
        node => panic!("expected an if chain, got {:?}", node),
    }
}

#[test]
fn parses_nested_structures() {
    let parsed = parse(
        "{% block outer %}{% for x in items %}{% if x %}{{ x }}{% endif %}{% endfor %}{% endblock %}",
    );
    match &parsed.nodes[0] {
        Node::Block(block) => {
            assert_eq!(block.name, "outer");
            match &block.body[0] {
                Node::Forloop(forloop) => {
                    assert_eq!(forloop.value, "x");
                    assert!(matches!(forloop.body[0], Node::If(_)));
                }
                node => panic!("expected a for loop, got {:?}", node),
            }
        }
        node => panic!("expected a block, got {:?}", node),
    }
}

#[test]
fn blocks_register_into_the_block_table() {
    let parsed = parse("{% block a %}x{% block b %}y{% endblock %}{% endblock %}");
    assert!(parsed.blocks.contains_key("a"));
    // nested blocks register too
    assert!(parsed.blocks.contains_key("b"));
}

#[test]
fn named_end_tags_must_match() {
    assert!(Parser::new("test", "{% block a %}x{% endblock a %}").parse().is_ok());

    let err = Parser::new("test", "{% block a %}x{% endblock b %}").parse().unwrap_err();
    assert!(err.to_string().contains("endblock a"));
    assert!(err.to_string().contains("endblock b"));
}

#[test]
fn captures_extends() {
    let parsed = parse("{% extends \"base.html\" %}{% block a %}{% endblock %}");
    assert_eq!(parsed.extends.as_deref(), Some("base.html"));
}

#[test]
fn double_extends_errors() {
    let err = Parser::new("test", "{% extends \"a\" %}{% extends \"b\" %}")
        .parse()
        .unwrap_err();
    assert!(err.to_string().contains("multiple templates"));
}

#[test]
fn late_extends_is_accepted() {
    // warned, not failed
    let parsed = parse("some text {% extends \"base\" %}");
    assert_eq!(parsed.extends.as_deref(), Some("base"));
}

#[test]
fn parses_includes() {
    let parsed = parse("{% include \"header.html\" %}");
    assert_eq!(parsed.nodes, vec![Node::Include("header.html".to_string())]);
}

#[test]
fn parses_macro_definitions() {
    let parsed = parse("{% macro greet(name) %}Hi {{ name }}{% endmacro %}");
    match &parsed.nodes[0] {
        Node::MacroDefinition(definition) => {
            assert_eq!(definition.name, "greet");
            assert_eq!(definition.params, vec!["name".to_string()]);
            assert_eq!(definition.body.len(), 2);
        }
        node => panic!("expected a macro definition, got {:?}", node),
    }
}

#[test]
fn duplicate_blocks_error() {
    let err = Parser::new("test", "{% block a %}{% endblock %}{% block a %}{% endblock %}")
        .parse()
        .unwrap_err();
    assert_eq!(err.to_string(), "Block `a` is defined twice in template `test`");
}

#[test]
fn duplicate_macros_error() {
    let err = Parser::new(
        "test",
        "{% macro a() %}{% endmacro %}{% macro a() %}{% endmacro %}",
    )
    .parse()
    .unwrap_err();
    assert_eq!(err.to_string(), "Macro `a` is defined twice in template `test`");
}

#[test]
fn whitespace_trim_is_applied_while_parsing() {
    let parsed = parse("x  {{- v -}}  y");
    assert_eq!(parsed.nodes[0], Node::Text("x".to_string()));
    assert_eq!(parsed.nodes[2], Node::Text("y".to_string()));

    // without markers the whitespace stays
    let parsed = parse("x  {{ v }}  y");
    assert_eq!(parsed.nodes[0], Node::Text("x  ".to_string()));
    assert_eq!(parsed.nodes[2], Node::Text("  y".to_string()));
}
