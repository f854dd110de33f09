//! Inline `%color:...%` markup parser for terminal styling.
//!
//! Template strings carry styling as inline tags of the form
//! `%color:<spec>[:<spec>...]%`. A tag applies to all text that follows it,
//! up to the next tag or the end of the string. Back-to-back tags fold into
//! one styled span.
//!
//! # Example
//!
//! ```rust
//! use tidings_markup::{render, MarkupTransform};
//!
//! // Apply ANSI codes
//! let out = render("%color:bold_red%alert", MarkupTransform::Apply);
//! assert!(out.contains("alert"));
//!
//! // Strip markup (color output disabled)
//! let out = render("%color:bold_red%alert", MarkupTransform::Remove);
//! assert_eq!(out, "alert");
//!
//! // Echo tags as literals (debug mode)
//! let out = render("%color:bold_red%alert", MarkupTransform::Debug);
//! assert_eq!(out, "[color:bold_red]alert");
//! ```
//!
//! # Failure policy
//!
//! Parsing is fail-soft. An unterminated tag, an empty or unparseable spec,
//! or a second tag abutting a previous one without its own opening `%` all
//! abort the parse and hand back the original input as one unstyled span.
//! A `%` that is not immediately followed by `color:` is always literal
//! text, so `4.58%%color:reset()%` keeps `4.58%` intact.

mod range;
mod spec;

pub use range::SubstringRange;
pub use spec::{rgb_to_ansi256, Attributes, BaseColor, ColorSpec, SpecKind};

/// The opening token of a markup tag.
pub const TAG_PREFIX: &str = "%color:";

/// How to transform markup when rendering a parsed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupTransform {
    /// Apply ANSI escape codes for each spec.
    Apply,

    /// Strip all markup, outputting only the text.
    /// Used when color output is disabled.
    Remove,

    /// Echo each spec as a `[color:...]` literal.
    /// Used to visualize styling in tests and debug output.
    Debug,
}

/// One styled run of text.
///
/// Only the first span of a parse carries a non-empty `prefix` (the plain
/// text before the first tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Plain text preceding the first tag. Empty on all but the first span.
    pub prefix: String,
    /// Specs from the tag (or folded back-to-back tags) opening this span.
    pub specs: Vec<ColorSpec>,
    /// The text the specs apply to.
    pub text: String,
}

impl StyledSpan {
    fn unstyled(text: &str) -> Self {
        Self {
            prefix: String::new(),
            specs: Vec::new(),
            text: text.to_string(),
        }
    }

    fn render_into(&self, out: &mut String, transform: MarkupTransform) {
        out.push_str(&self.prefix);
        match transform {
            MarkupTransform::Remove => out.push_str(&self.text),
            MarkupTransform::Debug => {
                for spec in &self.specs {
                    out.push_str("[color:");
                    out.push_str(spec.raw());
                    out.push(']');
                }
                out.push_str(&self.text);
            }
            MarkupTransform::Apply => {
                if self.specs.is_empty() || self.text.is_empty() {
                    out.push_str(&self.text);
                } else {
                    // Fold specs left to right, innermost first.
                    let mut styled = self.text.clone();
                    for spec in &self.specs {
                        styled = spec
                            .to_style()
                            .force_styling(true)
                            .apply_to(styled)
                            .to_string();
                    }
                    out.push_str(&styled);
                }
            }
        }
    }
}

/// The result of parsing one markup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<StyledSpan>,
}

impl StyledText {
    /// Parses `input` into styled spans.
    ///
    /// Never fails: malformed markup yields a single unstyled span holding
    /// the original input untouched.
    pub fn parse(input: &str) -> Self {
        match scan(input) {
            Some(spans) => Self { spans },
            None => Self {
                spans: vec![StyledSpan::unstyled(input)],
            },
        }
    }

    /// The parsed spans, in input order.
    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Returns true if any span carries color specs.
    pub fn is_styled(&self) -> bool {
        self.spans.iter().any(|s| !s.specs.is_empty())
    }

    /// Renders the spans back to a string under the given transform.
    pub fn render(&self, transform: MarkupTransform) -> String {
        let mut out = String::new();
        for span in &self.spans {
            span.render_into(&mut out, transform);
        }
        out
    }
}

/// Parses and renders in one step.
pub fn render(input: &str, transform: MarkupTransform) -> String {
    StyledText::parse(input).render(transform)
}

/// Scans `input` into spans. `None` means malformed markup (fail-soft).
fn scan(input: &str) -> Option<Vec<StyledSpan>> {
    let first = input.find(TAG_PREFIX)?;
    let prefix = &input[..first];
    let mut spans = Vec::new();
    let mut pos = first;

    while pos < input.len() {
        let mut specs = Vec::new();

        // One span may open with several back-to-back tags.
        loop {
            let body_start = pos + TAG_PREFIX.len();
            let close = body_start + input.get(body_start..)?.find('%')?;
            let body = SubstringRange::new(body_start, close - body_start);
            if body.is_empty() {
                return None;
            }
            for part in body.substr(input)?.split(':') {
                specs.push(ColorSpec::parse(part).ok()?);
            }
            pos = close + 1;
            if input[pos..].starts_with(TAG_PREFIX) {
                continue;
            }
            // A tag reusing the previous closing `%` as its opener is
            // ambiguous; bail out and keep the input literal.
            if input[pos..].starts_with("color:") {
                return None;
            }
            break;
        }

        let text_end = input[pos..]
            .find(TAG_PREFIX)
            .map(|i| pos + i)
            .unwrap_or(input.len());
        spans.push(StyledSpan {
            prefix: if spans.is_empty() {
                prefix.to_string()
            } else {
                String::new()
            },
            specs,
            text: input[pos..text_end].to_string(),
        });
        pos = text_end;
    }

    Some(spans)
}
