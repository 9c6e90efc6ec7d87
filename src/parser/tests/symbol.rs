use crate::parser::symbol::{Literal, Symbol};

#[test]
fn parses_literals() {
    assert_eq!(
        Symbol::parse("\"hey\"").unwrap(),
        Symbol::Literal(Literal::Str("hey".to_string()))
    );
    assert_eq!(Symbol::parse("'c'").unwrap(), Symbol::Literal(Literal::Char('c')));
    assert_eq!(Symbol::parse("42").unwrap(), Symbol::Literal(Literal::Int(42)));
    assert_eq!(Symbol::parse("3.14").unwrap(), Symbol::Literal(Literal::Float(3.14)));
    assert_eq!(Symbol::parse("true").unwrap(), Symbol::Literal(Literal::Bool(true)));
    assert_eq!(Symbol::parse("false").unwrap(), Symbol::Literal(Literal::Bool(false)));
}

#[test]
fn parses_variable_paths() {
    assert_eq!(Symbol::parse("name").unwrap(), Symbol::Variable(vec!["name".to_string()]));
    assert_eq!(
        Symbol::parse("user.address.city").unwrap(),
        Symbol::Variable(vec!["user".to_string(), "address".to_string(), "city".to_string()])
    );
    // numeric segments index arrays
    assert_eq!(
        Symbol::parse("items.0").unwrap(),
        Symbol::Variable(vec!["items".to_string(), "0".to_string()])
    );
}

#[test]
fn parses_arrays() {
    assert_eq!(
        Symbol::parse("[1, 2]").unwrap(),
        Symbol::Array(vec![
            Symbol::Literal(Literal::Int(1)),
            Symbol::Literal(Literal::Int(2)),
        ])
    );
    assert_eq!(Symbol::parse("[]").unwrap(), Symbol::Array(vec![]));
    assert_eq!(
        Symbol::parse("[[1], \"a, b\"]").unwrap(),
        Symbol::Array(vec![
            Symbol::Array(vec![Symbol::Literal(Literal::Int(1))]),
            Symbol::Literal(Literal::Str("a, b".to_string())),
        ])
    );
}

#[test]
fn parses_calls() {
    assert_eq!(
        Symbol::parse("greet(\"bob\", user.name)").unwrap(),
        Symbol::Call {
            name: "greet".to_string(),
            args: vec![
                Symbol::Literal(Literal::Str("bob".to_string())),
                Symbol::Variable(vec!["user".to_string(), "name".to_string()]),
            ],
        }
    );
    assert_eq!(
        Symbol::parse("nothing()").unwrap(),
        Symbol::Call { name: "nothing".to_string(), args: vec![] }
    );
}

#[test]
fn rejects_malformed_symbols() {
    let tests = vec![
        ("", "empty token"),
        ("\"unterminated", "unterminated string literal"),
        ("'ab'", "exactly one character"),
        ("''", "exactly one character"),
        ("1.2.3", "two dots"),
        ("12x", "invalid integer"),
        ("user.-name", "invalid path segment"),
        ("user..name", "invalid path segment"),
        ("[1, 2", "unbalanced"),
        ("9lives", "invalid integer"),
        ("my-var", "invalid path segment"),
    ];

    for (input, reason) in tests {
        let err = Symbol::parse(input).unwrap_err();
        assert!(
            err.to_string().contains(reason),
            "`{}` should fail with `{}`, got `{}`",
            input,
            reason,
            err
        );
    }
}

#[test]
fn display_round_trips() {
    for input in &["\"hey\"", "user.name", "[1, 2]", "greet(\"bob\")", "true", "3.14"] {
        assert_eq!(Symbol::parse(input).unwrap().to_string(), *input);
    }
}
