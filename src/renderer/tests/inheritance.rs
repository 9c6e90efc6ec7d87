use crate::context::Context;
use crate::engine::Engine;

#[test]
fn render_simple_inheritance() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("top", "{% block pre %}{% endblock pre %}{% block main %}{% endblock main %}"),
            ("bottom", "{% extends \"top\" %}{% block main %}MAIN{% endblock %}"),
        ])
        .unwrap();

    let result = engine.render("bottom", &mut Context::new());
    assert_eq!(result.unwrap(), "MAIN".to_string());
}

#[test]
fn render_simple_inheritance_super() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("top", "{% block main %}P{% endblock main %}"),
            ("bottom", "{% extends \"top\" %}{% block main %}C{{ super }}{% endblock %}"),
        ])
        .unwrap();

    let result = engine.render("bottom", &mut Context::new());
    assert_eq!(result.unwrap(), "CP".to_string());
}

#[test]
fn render_multiple_inheritance() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("top", "{% block pre %}{% endblock pre %}{% block main %}{% endblock main %}"),
            ("mid", "{% extends \"top\" %}{% block pre %}PRE{% endblock pre %}"),
            ("bottom", "{% extends \"mid\" %}{% block main %}MAIN{% endblock main %}"),
        ])
        .unwrap();

    let result = engine.render("bottom", &mut Context::new());
    assert_eq!(result.unwrap(), "PREMAIN".to_string());
}

#[test]
fn render_multiple_inheritance_with_super() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            (
                "grandparent",
                "{% block hey %}hello{% endblock hey %} {% block ending %}sincerely{% endblock ending %}",
            ),
            (
                "parent",
                "{% extends \"grandparent\" %}{% block hey %}hi and grandma says {{ super }}{% endblock hey %}",
            ),
            (
                "child",
                "{% extends \"parent\" %}{% block hey %}dad says {{ super }}{% endblock hey %}{% block ending %}{{ super }} with love{% endblock ending %}",
            ),
        ])
        .unwrap();

    let result = engine.render("child", &mut Context::new());
    assert_eq!(result.unwrap(), "dad says hi and grandma says hello sincerely with love".to_string());
}

#[test]
fn render_super_in_grandchild_without_redefining_works() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("grandparent", "{% block title %}Title{% endblock %}"),
            (
                "parent",
                "{% extends \"grandparent\" %}{% block title %}{{ super }} - More{% endblock %}",
            ),
            ("child", "{% extends \"parent\" %}"),
        ])
        .unwrap();

    let result = engine.render("child", &mut Context::new());
    assert_eq!(result.unwrap(), "Title - More".to_string());
}

#[test]
fn render_super_in_grandchild_without_redefining_in_parent_works() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("grandparent", "{% block title %}Title{% endblock %}"),
            ("parent", "{% extends \"grandparent\" %}"),
            (
                "child",
                "{% extends \"parent\" %}{% block title %}{{ super }} - More{% endblock %}",
            ),
        ])
        .unwrap();

    let result = engine.render("child", &mut Context::new());
    assert_eq!(result.unwrap(), "Title - More".to_string());
}

#[test]
fn blocks_in_the_child_only_are_not_rendered() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("top", "body"),
            ("bottom", "{% extends \"top\" %}{% block orphan %}never{% endblock %}"),
        ])
        .unwrap();

    let result = engine.render("bottom", &mut Context::new());
    assert_eq!(result.unwrap(), "body".to_string());
}

#[test]
fn inherited_templates_use_the_context() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("top", "Hello {% block who %}{{ name }}{% endblock %}"),
            ("bottom", "{% extends \"top\" %}{% block who %}dear {{ name }}{% endblock %}"),
        ])
        .unwrap();

    let mut context = Context::new();
    context.insert("name", &"ada");
    assert_eq!(engine.render("bottom", &mut context).unwrap(), "Hello dear ada");
}

#[test]
fn render_circular_extend_errors() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("one", "{% extends \"two\" %}"),
            ("two", "{% extends \"one\" %}"),
        ])
        .unwrap();

    let err = engine.render("one", &mut Context::new()).unwrap_err();
    assert!(err.to_string().contains("Circular extend detected"));
}

#[test]
fn render_self_extend_errors() {
    let engine = Engine::default();
    engine.add_raw_template("one", "{% extends \"one\" %}").unwrap();

    let err = engine.render("one", &mut Context::new()).unwrap_err();
    assert!(err.to_string().contains("Circular extend detected"));
}

#[test]
fn render_missing_parent_errors() {
    let engine = Engine::default();
    engine.add_raw_template("child", "{% extends \"ghost\" %}").unwrap();

    let err = engine.render("child", &mut Context::new()).unwrap_err();
    assert!(err.to_string().contains("`ghost`"));
    assert!(err.to_string().contains("doesn't exist"));
}

#[test]
fn include_inside_inherited_block() {
    let engine = Engine::default();
    engine
        .add_raw_templates(vec![
            ("partial", "[partial]"),
            ("top", "{% block main %}{% endblock %}"),
            (
                "bottom",
                "{% extends \"top\" %}{% block main %}{% include \"partial\" %}{% endblock %}",
            ),
        ])
        .unwrap();

    let result = engine.render("bottom", &mut Context::new());
    assert_eq!(result.unwrap(), "[partial]".to_string());
}
