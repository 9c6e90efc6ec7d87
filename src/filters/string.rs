//! Filters operating on strings

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use unic_segment::Graphemes;

#[cfg(feature = "urlencode")]
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::Result;
use crate::utils;

/// Everything except alphanumerics and the characters that commonly stay
/// readable in URLs
#[cfg(feature = "urlencode")]
const URLENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'/').remove(b'-').remove(b'_').remove(b'.').remove(b'~');

lazy_static! {
    static ref STRIPTAGS_RE: Regex = Regex::new(r"(<!--.*?-->|<[^>]*>)").unwrap();
    static ref WORDS_RE: Regex = Regex::new(r"\b(?P<first>[\w'])(?P<rest>[\w']*)\b").unwrap();
    static ref SPACELESS_RE: Regex = Regex::new(r">\s+<").unwrap();
}

/// Convert a value to uppercase.
pub fn upper(value: String) -> Result<String> {
    Ok(value.to_uppercase())
}

/// Convert a value to lowercase.
pub fn lower(value: String) -> Result<String> {
    Ok(value.to_lowercase())
}

/// Strip leading and trailing whitespace.
pub fn trim(value: String) -> Result<String> {
    Ok(value.trim().to_string())
}

/// Uppercase the first letter, lowercase the rest.
pub fn capitalize(value: String) -> Result<String> {
    let mut chars = value.chars();
    match chars.next() {
        None => Ok(value),
        Some(first) => {
            Ok(first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase())
        }
    }
}

/// Capitalize each word inside a sentence.
pub fn title(value: String) -> Result<String> {
    Ok(WORDS_RE
        .replace_all(&value, |caps: &Captures| {
            let first = caps["first"].to_uppercase();
            let rest = caps["rest"].to_lowercase();
            format!("{}{}", first, rest)
        })
        .to_string())
}

/// Remove HTML tags and comments.
pub fn striptags(value: String) -> Result<String> {
    Ok(STRIPTAGS_RE.replace_all(&value, "").to_string())
}

/// Remove whitespace between HTML tags.
pub fn spaceless(value: String) -> Result<String> {
    Ok(SPACELESS_RE.replace_all(&value, "><").to_string())
}

/// Replace line breaks with `<br>`.
pub fn nl2br(value: String) -> Result<String> {
    Ok(value.replace("\r\n", "<br>").replace('\n', "<br>"))
}

/// Escape HTML entities.
pub fn escape(value: String) -> Result<String> {
    Ok(utils::escape_html(&value))
}

/// Reverse the string, grapheme by grapheme.
pub fn reverse(value: String) -> Result<String> {
    let graphemes: Vec<&str> = Graphemes::new(&value).collect();
    Ok(graphemes.into_iter().rev().collect())
}

/// Number of words in the string.
pub fn wordcount(value: String) -> Result<String> {
    Ok(value.split_whitespace().count().to_string())
}

/// Percent-encode the string, leaving `/` as is.
#[cfg(feature = "urlencode")]
pub fn urlencode(value: String) -> Result<String> {
    Ok(utf8_percent_encode(&value, URLENCODE_SET).to_string())
}

/// Transform the string into ascii, lowercase, dash-separated form.
#[cfg(feature = "slug")]
pub fn slugify(value: String) -> Result<String> {
    Ok(slug::slugify(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_lower() {
        assert_eq!(upper("héllo".to_string()).unwrap(), "HÉLLO");
        assert_eq!(lower("HELLO".to_string()).unwrap(), "hello");
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim("  hello  ".to_string()).unwrap(), "hello");
    }

    #[test]
    fn test_capitalize() {
        let tests = vec![("CAPITAL IZE", "Capital ize"), ("capital ize", "Capital ize"), ("", "")];
        for (input, expected) in tests {
            assert_eq!(capitalize(input.to_string()).unwrap(), expected);
        }
    }

    #[test]
    fn test_title() {
        let tests = vec![
            ("foo bar", "Foo Bar"),
            ("foo\tbar", "Foo\tBar"),
            ("foo  bar", "Foo  Bar"),
            ("f bar f", "F Bar F"),
            ("foo-bar", "Foo-Bar"),
            ("FOO\tBAR", "Foo\tBar"),
        ];
        for (input, expected) in tests {
            assert_eq!(title(input.to_string()).unwrap(), expected);
        }
    }

    #[test]
    fn test_striptags() {
        let tests = vec![
            (
                r#"<b>Joel</b> <button>is</button> a <span>slug</span>"#,
                "Joel is a slug",
            ),
            (r"<!-- comment -->x", "x"),
            (r"1 < 2", "1 < 2"),
        ];
        for (input, expected) in tests {
            assert_eq!(striptags(input.to_string()).unwrap(), expected);
        }
    }

    #[test]
    fn test_spaceless() {
        let tests = vec![
            ("<p>\n<a>x</a>\n</p>", "<p><a>x</a></p>"),
            ("<p> <a>x</a> </p>", "<p><a>x</a></p>"),
        ];
        for (input, expected) in tests {
            assert_eq!(spaceless(input.to_string()).unwrap(), expected);
        }
    }

    #[test]
    fn test_nl2br() {
        assert_eq!(nl2br("a\nb\r\nc".to_string()).unwrap(), "a<br>b<br>c");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a>&".to_string()).unwrap(), "&lt;a&gt;&amp;");
    }

    #[test]
    fn test_reverse() {
        assert_eq!(reverse("hello".to_string()).unwrap(), "olleh");
        assert_eq!(reverse("日本語".to_string()).unwrap(), "語本日");
    }

    #[test]
    fn test_wordcount() {
        assert_eq!(wordcount("joel is a slug".to_string()).unwrap(), "4");
        assert_eq!(wordcount("".to_string()).unwrap(), "0");
    }

    #[cfg(feature = "urlencode")]
    #[test]
    fn test_urlencode() {
        assert_eq!(
            urlencode("https://www.example.org/foo?a=b&c=d".to_string()).unwrap(),
            "https%3A//www.example.org/foo%3Fa%3Db%26c%3Dd"
        );
    }

    #[cfg(feature = "slug")]
    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World!".to_string()).unwrap(), "hello-world");
    }
}
