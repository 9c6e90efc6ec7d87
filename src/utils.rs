//! Text helpers used by every layer above: tag body tokenization,
//! top-level splitting and identifier validation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{Error, Result};

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Whether `token` is a valid identifier / variable path segment
pub(crate) fn is_identifier(token: &str) -> bool {
    IDENT_RE.is_match(token)
}

/// Splits a tag body into tokens on whitespace and `|`.
///
/// Quote, bracket and paren spans are atomic: `greet("a b")` is one token,
/// `|` inside a string literal is not a filter separator.
pub(crate) fn tokenize(body: &str) -> Result<Vec<String>> {
    let mut tokens: Vec<String> = vec![];
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in body.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                if depth == 0 {
                    return Err(Error::malformed_expression(
                        body,
                        &format!("unbalanced `{}`", c),
                    ));
                }
                depth -= 1;
                current.push(c);
            }
            '|' if depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push("|".to_string());
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(Error::malformed_expression(body, "unterminated string literal"));
    }
    if depth != 0 {
        return Err(Error::malformed_expression(body, "unbalanced brackets"));
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Splits `input` on `separator` at depth zero, trimming each piece.
///
/// Used for array elements and call arguments, where nested brackets and
/// string literals must stay intact. An all-whitespace input yields no pieces.
pub(crate) fn split_top_level(input: &str, separator: char) -> Result<Vec<String>> {
    let mut parts: Vec<String> = vec![];
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                if depth == 0 {
                    return Err(Error::malformed_symbol(input, &format!("unbalanced `{}`", c)));
                }
                depth -= 1;
                current.push(c);
            }
            sep if sep == separator && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(Error::malformed_symbol(input, "unterminated string literal"));
    }
    if depth != 0 {
        return Err(Error::malformed_symbol(input, "unbalanced brackets"));
    }
    parts.push(current);

    let parts: Vec<String> = parts.into_iter().map(|p| p.trim().to_string()).collect();
    if parts.len() == 1 && parts[0].is_empty() {
        return Ok(vec![]);
    }
    Ok(parts)
}

/// Escape HTML following [OWASP](https://www.owasp.org/index.php/XSS_(Cross_Site_Scripting)_Prevention_Cheat_Sheet)
///
/// Escape the following characters with HTML entity encoding to prevent switching
/// into any execution context, such as script, style, or event handlers. Using
/// hex entities is recommended in the spec. In addition to the 5 characters
/// significant in XML (&, <, >, ", '), the forward slash is included as it helps
/// to end an HTML entity.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '/' => output.push_str("&#x2F;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{escape_html, is_identifier, split_top_level, tokenize};

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("hello"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("user2"));
        assert!(!is_identifier("2user"));
        assert!(!is_identifier("user-name"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize("if user.name == \"bob\"").unwrap();
        assert_eq!(tokens, vec!["if", "user.name", "==", "\"bob\""]);
    }

    #[test]
    fn test_tokenize_filters() {
        let tokens = tokenize("value | trim|upper").unwrap();
        assert_eq!(tokens, vec!["value", "|", "trim", "|", "upper"]);
    }

    #[test]
    fn test_tokenize_atomic_spans() {
        let tokens = tokenize("greet(\"a b\", c) | upper").unwrap();
        assert_eq!(tokens, vec!["greet(\"a b\", c)", "|", "upper"]);

        let tokens = tokenize("x in [1, 2, 3]").unwrap();
        assert_eq!(tokens, vec!["x", "in", "[1, 2, 3]"]);

        let tokens = tokenize("\"a | b\"").unwrap();
        assert_eq!(tokens, vec!["\"a | b\""]);
    }

    #[test]
    fn test_tokenize_errors() {
        assert!(tokenize("\"unterminated").is_err());
        assert!(tokenize("[1, 2").is_err());
        assert!(tokenize("1, 2]").is_err());
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a, b, c", ',').unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split_top_level("[a, b], c", ',').unwrap(), vec!["[a, b]", "c"]);
        assert_eq!(split_top_level("\"a, b\", c", ',').unwrap(), vec!["\"a, b\"", "c"]);
        assert_eq!(split_top_level("  ", ',').unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_escape_html() {
        let tests = vec![
            (r"", ""),
            (r"a&b", "a&amp;b"),
            (r"<a", "&lt;a"),
            (r">a", "&gt;a"),
            (r#"""#, "&quot;"),
            (r#"'"#, "&#x27;"),
            (r#"大阪"#, "大阪"),
        ];
        for (input, expected) in tests {
            assert_eq!(escape_html(input), expected);
        }
        let empty = String::new();
        assert_eq!(escape_html(&empty), empty);
    }
}
