//! Placeholder string parser for [`Template`].
//!
//! Recognises `{version}`, `{major}`, `{minor}`, and `{patch}`. Doubled
//! braces (`{{`, `}}`) produce literal braces. Whitespace inside a
//! placeholder is ignored, so `{ version }` is equivalent to `{version}`.

use super::error::{Result, TemplateError};
use super::{Substitution, Template, TemplateBuilder};
use std::iter::Peekable;
use std::str::CharIndices;

/// Placeholder names accepted inside braces.
const PLACEHOLDERS: &[&str] = &["version", "major", "minor", "patch"];

/// Parse `source` into a [`Template`].
///
/// # Errors
///
/// Returns [`TemplateError::UnknownPlaceholder`] for an unrecognised name,
/// [`TemplateError::Unclosed`] for a `{` without a matching `}`, and
/// [`TemplateError::UnmatchedClose`] for a stray `}`.
///
/// # Examples
///
/// ```
/// use dotslash_gen::template::parser::parse;
/// use dotslash_gen::version::DotslashVersion;
///
/// let template = parse("tool-{version}/v{major}/tool").expect("valid template");
/// let path = template.render(&DotslashVersion::new(3, 1, 4)).expect("renders");
/// assert_eq!(path, "tool-3.1.4/v3/tool");
/// ```
pub fn parse(source: &str) -> Result<Template> {
    let mut builder = TemplateBuilder::default();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => literal.push('{'),
            '{' => {
                let name = read_placeholder(source, offset, &mut chars)?;
                builder = builder
                    .literal(std::mem::take(&mut literal))
                    .substitution(placeholder(name)?);
            }
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => literal.push('}'),
            '}' => return Err(TemplateError::UnmatchedClose { offset }),
            other => literal.push(other),
        }
    }

    Ok(builder.literal(literal).build())
}

/// Consume characters up to the closing brace and return the trimmed name.
fn read_placeholder<'a>(
    source: &'a str,
    open: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<&'a str> {
    for (offset, ch) in chars.by_ref() {
        match ch {
            '}' => {
                let name = source.get(open + 1..offset).unwrap_or_default();
                return Ok(name.trim());
            }
            '{' => break,
            _ => {}
        }
    }
    Err(TemplateError::Unclosed { offset: open })
}

/// Map a placeholder name to its substitution.
fn placeholder(name: &str) -> Result<Substitution> {
    match name {
        "version" => Ok(Substitution::version()),
        "major" => Ok(Substitution::major()),
        "minor" => Ok(Substitution::minor()),
        "patch" => Ok(Substitution::patch()),
        other => Err(TemplateError::UnknownPlaceholder {
            name: other.to_owned(),
            expected: PLACEHOLDERS.join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Segment;
    use crate::version::DotslashVersion;
    use rstest::rstest;

    const VERSION: DotslashVersion = DotslashVersion::new(1, 2, 3);

    #[rstest]
    #[case::plain("tool/bin/tool", "tool/bin/tool")]
    #[case::version("tool/{version}/tool", "tool/1.2.3/tool")]
    #[case::components("v{major}.{minor}.{patch}", "v1.2.3")]
    #[case::padded("{ version }", "1.2.3")]
    #[case::escaped_braces("{{literal}}-{major}", "{literal}-1")]
    #[case::adjacent("{major}{minor}", "12")]
    #[case::empty("", "")]
    #[case::unicode("café-{version}-ß", "café-1.2.3-ß")]
    fn renders_parsed_templates(#[case] source: &str, #[case] expected: &str) {
        let template = parse(source).expect("valid template");
        assert_eq!(template.render(&VERSION).expect("renders"), expected);
    }

    #[test]
    fn literal_text_becomes_single_segment() {
        let template = parse("no placeholders here").expect("valid template");
        assert_eq!(template.segments().len(), 1);
        assert!(!template.has_substitutions());
    }

    #[test]
    fn segments_alternate_between_literal_and_substitution() {
        let template = parse("a{major}b{minor}").expect("valid template");
        let kinds: Vec<bool> = template
            .segments()
            .iter()
            .map(|segment| matches!(segment, Segment::Literal(_)))
            .collect();
        assert_eq!(kinds, vec![true, false, true, false]);
    }

    #[test]
    fn rejects_unknown_placeholder() {
        let err = parse("tool-{arch}").expect_err("should fail");
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                name: "arch".to_owned(),
                expected: "version, major, minor, patch".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_empty_placeholder() {
        let err = parse("tool-{}").expect_err("should fail");
        assert!(matches!(err, TemplateError::UnknownPlaceholder { name, .. } if name.is_empty()));
    }

    #[rstest]
    #[case::at_end("tool-{version", 5)]
    #[case::nested("x{ver{sion}", 1)]
    fn rejects_unclosed_placeholder(#[case] source: &str, #[case] offset: usize) {
        let err = parse(source).expect_err("should fail");
        assert_eq!(err, TemplateError::Unclosed { offset });
    }

    #[test]
    fn rejects_stray_closing_brace() {
        let err = parse("tool}").expect_err("should fail");
        assert_eq!(err, TemplateError::UnmatchedClose { offset: 4 });
    }

    #[rstest]
    #[case("tool/{version}/bin")]
    #[case("{{x}}-{major}")]
    fn display_reproduces_canonical_source(#[case] source: &str) {
        let template = parse(source).expect("valid template");
        assert_eq!(template.to_string(), source);
    }
}
