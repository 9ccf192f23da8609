//! Version-aware templates for install paths and provider URLs.
//!
//! A [`Template`] is an ordered sequence of [`Segment`]s. Each segment is
//! either literal text or a [`Substitution`]: a function from the
//! [`DotslashVersion`] to any displayable value. Rendering concatenates the
//! literals verbatim and the stringified substitution results in order; it
//! performs no escaping and never re-parses its output.
//!
//! Templates can be assembled in code with [`Template::builder`], or parsed
//! from placeholder strings such as `tool-{version}/bin/tool` (see
//! [`parser`]).
//!
//! # Sub-modules
//!
//! - [`error`] - Error types for parsing and rendering.
//! - [`parser`] - Placeholder string parser.

pub mod error;
pub mod parser;

use crate::version::DotslashVersion;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use error::{Result, TemplateError};

type Evaluator = dyn Fn(&DotslashVersion) -> Result<String> + Send + Sync;

/// A value-producing template segment.
///
/// Wraps a function of the version together with a label. The label names the
/// substitution in errors, in [`Debug`](fmt::Debug) output, and in the
/// placeholder form produced by [`Template`]'s `Display` impl.
#[derive(Clone)]
pub struct Substitution {
    label: Cow<'static, str>,
    evaluate: Arc<Evaluator>,
}

impl Substitution {
    /// Create an infallible substitution.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotslash_gen::template::Substitution;
    /// use dotslash_gen::version::DotslashVersion;
    ///
    /// let next_major = Substitution::new("next_major", |v| v.major() + 1);
    /// let rendered = next_major.evaluate(&DotslashVersion::new(4, 0, 0));
    /// assert_eq!(rendered, Ok("5".to_owned()));
    /// ```
    pub fn new<F, R>(label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&DotslashVersion) -> R + Send + Sync + 'static,
        R: fmt::Display,
    {
        Self {
            label: label.into(),
            evaluate: Arc::new(move |version| Ok(f(version).to_string())),
        }
    }

    /// Create a substitution that may fail.
    ///
    /// A failure is reported as [`TemplateError::Substitution`] carrying the
    /// label and the error's message.
    pub fn fallible<F, R, E>(label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&DotslashVersion) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: fmt::Display,
        E: fmt::Display,
    {
        let label = label.into();
        let owned_label = label.to_string();
        Self {
            label,
            evaluate: Arc::new(move |version| {
                f(version)
                    .map(|value| value.to_string())
                    .map_err(|err| TemplateError::Substitution {
                        label: owned_label.clone(),
                        reason: err.to_string(),
                    })
            }),
        }
    }

    /// Substitute the full `major.minor.patch` version.
    #[must_use]
    pub fn version() -> Self {
        Self::new("version", |v| *v)
    }

    /// Substitute the major component.
    #[must_use]
    pub fn major() -> Self {
        Self::new("major", |v| v.major())
    }

    /// Substitute the minor component.
    #[must_use]
    pub fn minor() -> Self {
        Self::new("minor", |v| v.minor())
    }

    /// Substitute the patch component.
    #[must_use]
    pub fn patch() -> Self {
        Self::new("patch", |v| v.patch())
    }

    /// Return the substitution's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluate the substitution against `version`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Substitution`] when the underlying function
    /// fails.
    pub fn evaluate(&self, version: &DotslashVersion) -> Result<String> {
        (self.evaluate)(version)
    }
}

impl fmt::Debug for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Substitution").field(&self.label).finish()
    }
}

/// One piece of a [`Template`].
#[derive(Debug, Clone)]
pub enum Segment {
    /// Text emitted verbatim.
    Literal(String),
    /// A value computed from the version.
    Substitution(Substitution),
}

/// An immutable sequence of literal and substitution segments.
///
/// # Examples
///
/// ```
/// use dotslash_gen::template::Template;
/// use dotslash_gen::version::DotslashVersion;
///
/// let template = Template::builder()
///     .literal("https://example.com/v")
///     .version()
///     .literal("/tool-")
///     .major()
///     .literal(".tar.gz")
///     .build();
///
/// let url = template.render(&DotslashVersion::new(2, 1, 0)).expect("renders");
/// assert_eq!(url, "https://example.com/v2.1.0/tool-2.tar.gz");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Start building a template.
    #[must_use]
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// Create a template consisting only of literal text.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::builder().literal(text).build()
    }

    /// Parse a placeholder string; see [`parser::parse`].
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] describing the first malformed
    /// placeholder.
    pub fn parse(source: &str) -> Result<Self> {
        parser::parse(source)
    }

    /// Return the segments in render order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Return true when at least one segment depends on the version.
    #[must_use]
    pub fn has_substitutions(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Substitution(_)))
    }

    /// Render the template for `version`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`TemplateError`] raised by a substitution.
    pub fn render(&self, version: &DotslashVersion) -> Result<String> {
        self.segments
            .iter()
            .try_fold(String::new(), |mut rendered, segment| {
                match segment {
                    Segment::Literal(text) => rendered.push_str(text),
                    Segment::Substitution(substitution) => {
                        rendered.push_str(&substitution.evaluate(version)?);
                    }
                }
                Ok(rendered)
            })
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(source: &str) -> Result<Self> {
        parser::parse(source)
    }
}

/// Writes the template in placeholder syntax, escaping literal braces.
///
/// Every substitution is written as `{label}`. Only the built-in
/// placeholders parse back; a custom label produces text that
/// [`Template::parse`] rejects as an unknown placeholder.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    f.write_str(&text.replace('{', "{{").replace('}', "}}"))?;
                }
                Segment::Substitution(substitution) => {
                    write!(f, "{{{}}}", substitution.label())?;
                }
            }
        }
        Ok(())
    }
}

/// Incremental [`Template`] constructor.
///
/// Adjacent literals are merged and empty literals dropped, so the built
/// template's segments strictly alternate where possible.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    segments: Vec<Segment>,
}

impl TemplateBuilder {
    /// Append literal text.
    #[must_use]
    pub fn literal(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        if let Some(Segment::Literal(previous)) = self.segments.last_mut() {
            previous.push_str(&text);
        } else {
            self.segments.push(Segment::Literal(text));
        }
        self
    }

    /// Append an arbitrary substitution.
    #[must_use]
    pub fn substitution(mut self, substitution: Substitution) -> Self {
        self.segments.push(Segment::Substitution(substitution));
        self
    }

    /// Append the full version.
    #[must_use]
    pub fn version(self) -> Self {
        self.substitution(Substitution::version())
    }

    /// Append the major component.
    #[must_use]
    pub fn major(self) -> Self {
        self.substitution(Substitution::major())
    }

    /// Append the minor component.
    #[must_use]
    pub fn minor(self) -> Self {
        self.substitution(Substitution::minor())
    }

    /// Append the patch component.
    #[must_use]
    pub fn patch(self) -> Self {
        self.substitution(Substitution::patch())
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Template {
        Template {
            segments: self.segments,
        }
    }
}
