//! Wraps matched, non-negated term occurrences in `<<<...>>>` for the
//! output writer.

use regex::{escape, RegexBuilder};

use crate::expr::ast::TermNode;

/// Returns `content` with every occurrence of a positive term wrapped in
/// `<<<...>>>`. Overlapping matches are merged into a single span.
pub fn highlight(content: &str, terms: &[&TermNode]) -> String {
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for term in terms {
        if term.literal.is_empty() {
            continue;
        }
        if term.case_fold {
            // Matched directly against `content`, never a folded copy: folding
            // (e.g. Turkish "İ") can change a string's byte length, which would
            // make spans computed against the fold land on the wrong offsets
            // (or a non-UTF-8 boundary) once applied back to `content`.
            let Ok(re) = RegexBuilder::new(&escape(&term.literal)).case_insensitive(true).build() else {
                continue;
            };
            for m in re.find_iter(content) {
                spans.push((m.start(), m.end()));
            }
        } else {
            for (start, end) in find_all(content, &term.literal) {
                spans.push((start, end));
            }
        }
    }

    if spans.is_empty() {
        return content.to_string();
    }

    spans.sort_unstable();
    let merged = merge_spans(spans);

    let mut out = String::with_capacity(content.len() + merged.len() * 6);
    let mut cursor = 0;
    for (start, end) in merged {
        out.push_str(&content[cursor..start]);
        out.push_str("<<<");
        out.push_str(&content[start..end]);
        out.push_str(">>>");
        cursor = end;
    }
    out.push_str(&content[cursor..]);
    out
}

fn find_all(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let absolute = start + pos;
        out.push((absolute, absolute + needle.len()));
        start = absolute + needle.len();
    }
    out
}

fn merge_spans(spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in spans {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}
