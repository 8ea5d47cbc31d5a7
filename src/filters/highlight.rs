//! cell highlight terms
//!
//! the column's own filter text comes first, the table-wide search term second.
//! only plain text filter values contribute.

use std::cmp::Reverse;

use regex::RegexBuilder;
use serde::Serialize;
use tracing::warn;

use super::date::DateValue;

/// filter values that can be shown as highlighted text
pub trait HighlightSource {
    fn highlight_text(&self) -> Option<&str>;
}

impl HighlightSource for str {
    fn highlight_text(&self) -> Option<&str> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl HighlightSource for String {
    fn highlight_text(&self) -> Option<&str> {
        self.as_str().highlight_text()
    }
}

impl HighlightSource for bool {
    fn highlight_text(&self) -> Option<&str> {
        None
    }
}

impl HighlightSource for DateValue {
    fn highlight_text(&self) -> Option<&str> {
        None
    }
}

impl<T: HighlightSource> HighlightSource for Option<T> {
    fn highlight_text(&self) -> Option<&str> {
        self.as_ref().and_then(|v| v.highlight_text())
    }
}

/// ordered terms to emphasize: filter text, then global search
pub fn highlight_terms<F>(filter: Option<&F>, global: Option<&str>) -> Vec<String>
where
    F: HighlightSource + ?Sized,
{
    let mut terms = Vec::new();

    if let Some(text) = filter.and_then(|f| f.highlight_text()) {
        terms.push(text.to_string());
    }

    if let Some(search) = global.filter(|s| !s.is_empty()) {
        terms.push(search.to_string());
    }

    terms
}

/// one run of a rendered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// a rendered cell with its highlight terms applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    pub terms: Vec<String>,
    pub segments: Vec<Segment>,
}

impl Highlighted {
    /// render with highlighted runs wrapped in `open`/`close`
    pub fn render(&self, open: &str, close: &str) -> String {
        self.segments
            .iter()
            .map(|s| {
                if s.highlighted {
                    format!("{}{}{}", open, s.text, close)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }

    pub fn has_matches(&self) -> bool {
        self.segments.iter().any(|s| s.highlighted)
    }
}

/// split `text` into plain and highlighted runs, matching terms case-insensitively
pub fn segments(text: &str, terms: &[String]) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut patterns: Vec<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if patterns.is_empty() {
        return vec![Segment::plain(text)];
    }

    // longest first so the alternation prefers the widest match
    patterns.sort_by_key(|p| Reverse(p.len()));
    let alternation = patterns
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");

    let re = match RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            warn!(error = %e, "failed to build highlight pattern");
            return vec![Segment::plain(text)];
        }
    };

    let mut out = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            out.push(Segment::plain(&text[last..m.start()]));
        }
        out.push(Segment::marked(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Segment::plain(&text[last..]));
    }

    out
}

/// highlight a rendered cell value against the column filter and global search
pub fn decorate<F>(rendered: &str, filter: Option<&F>, global: Option<&str>) -> Highlighted
where
    F: HighlightSource + ?Sized,
{
    let terms = highlight_terms(filter, global);
    let segments = segments(rendered, &terms);
    Highlighted { terms, segments }
}
