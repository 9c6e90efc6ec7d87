//! Finds and classifies `{{ }}`, `{% %}` and `{# #}` pairs in raw text

use crate::errors::{Error, Result};

/// What kind of tag a delimiter pair opens
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TagKind {
    /// `{{ ... }}`, prints a value
    Value,
    /// `{% ... %}`, a control tag
    Control,
    /// `{# ... #}`, discarded
    Comment,
}

impl TagKind {
    fn closer(self) -> &'static str {
        match self {
            TagKind::Value => "}}",
            TagKind::Control => "%}",
            TagKind::Comment => "#}",
        }
    }
}

/// One tag found in the source, trim markers already stripped
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    /// Kind of the tag
    pub kind: TagKind,
    /// The interior text, without delimiters or trim markers
    pub content: String,
    /// `true` if the tag opened with `{{-`/`{%-`/`{#-`
    pub trim_left: bool,
    /// `true` if the tag closed with `-}}`/`-%}`/`-#}`
    pub trim_right: bool,
    /// Byte offset of the opening `{`
    pub start: usize,
    /// Byte offset just past the closing delimiter
    pub end: usize,
}

/// Scans forward from `from` for the next tag.
///
/// A `{` not followed by `{`, `%` or `#` is not a tag and scanning resumes
/// past it. Returns `None` when no tag remains, an error when a tag opens
/// without its matching closer.
pub fn find_tag(source: &str, from: usize) -> Result<Option<Tag>> {
    let mut position = from;

    while position < source.len() {
        let offset = match source[position..].find('{') {
            Some(offset) => offset,
            None => return Ok(None),
        };
        let start = position + offset;
        let rest = &source[start..];

        let kind = if rest.starts_with("{{") {
            TagKind::Value
        } else if rest.starts_with("{%") {
            TagKind::Control
        } else if rest.starts_with("{#") {
            TagKind::Comment
        } else {
            // not a tag, keep scanning past this `{`
            position = start + 1;
            continue;
        };

        let interior_start = start + 2;
        let closer = kind.closer();
        let close_offset = match source[interior_start..].find(closer) {
            Some(offset) => offset,
            None => return Err(Error::missing_end_tag(closer, "end of template")),
        };

        let mut interior = &source[interior_start..interior_start + close_offset];
        let end = interior_start + close_offset + closer.len();

        let mut trim_left = false;
        let mut trim_right = false;
        if interior.starts_with('-') {
            trim_left = true;
            interior = &interior[1..];
        }
        if interior.ends_with('-') {
            trim_right = true;
            interior = &interior[..interior.len() - 1];
        }

        return Ok(Some(Tag {
            kind,
            content: interior.trim().to_string(),
            trim_left,
            trim_right,
            start,
            end,
        }));
    }

    Ok(None)
}
