//! Snippet extraction and highlighting for line-search hits.
//!
//! Query tokens are normalized but the stored line body may retain niqud and
//! teamim, so a plain substring scan would silently miss occurrences. The
//! builder instead normalizes the raw text while keeping a char-offset map
//! back into it, locates matches in the normalized view, and cuts the context
//! window and emphasis spans out of the raw string.

use crate::analysis::{is_stripped_mark, MAQAF};

/// Default number of context chars kept on each side of the anchor match.
pub const DEFAULT_CONTEXT_CHARS: usize = 60;

/// Opening emphasis marker wrapped around matched occurrences.
pub const MARK_PRE: &str = "<b>";
/// Closing emphasis marker.
pub const MARK_POST: &str = "</b>";

const ELLIPSIS: char = '\u{2026}';

/// Build a highlighted snippet of `text_raw` around the earliest occurrence
/// of any of `tokens`.
///
/// The window spans `context_chars` raw chars on each side of the anchor
/// match. Every occurrence of any token falling fully inside the window is
/// wrapped in [`MARK_PRE`]/[`MARK_POST`]; an ellipsis is prepended iff the
/// window starts after the beginning of the text and appended iff it ends
/// before the end. Pure and deterministic.
pub fn build_snippet(text_raw: &str, tokens: &[&str], context_chars: usize) -> String {
    let raw: Vec<char> = text_raw.chars().collect();
    let (norm, map) = normalized_view(&raw);
    let occurrences = locate_occurrences(&norm, tokens);

    let Some(&(anchor_start, anchor_len)) = occurrences.first() else {
        // Nothing located: emit a leading window without emphasis.
        let end = raw.len().min(context_chars * 2);
        let mut out: String = raw[..end].iter().collect();
        if end < raw.len() {
            out.push(ELLIPSIS);
        }
        return out;
    };

    let (anchor_raw_start, anchor_raw_end) = raw_span(&raw, &map, anchor_start, anchor_len);
    let window_start = anchor_raw_start.saturating_sub(context_chars);
    let window_end = (anchor_raw_end + context_chars).min(raw.len());

    // Every in-window occurrence gets emphasized, overlaps merged so spans
    // never nest.
    let mut ranges: Vec<(usize, usize)> = occurrences
        .iter()
        .map(|&(start, len)| raw_span(&raw, &map, start, len))
        .filter(|&(start, end)| start >= window_start && end <= window_end)
        .collect();
    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    let mut out = String::new();
    if window_start > 0 {
        out.push(ELLIPSIS);
    }
    let mut cursor = window_start;
    for (start, end) in merged {
        out.extend(raw[cursor..start].iter());
        out.push_str(MARK_PRE);
        out.extend(raw[start..end].iter());
        out.push_str(MARK_POST);
        cursor = end;
    }
    out.extend(raw[cursor..window_end].iter());
    if window_end < raw.len() {
        out.push(ELLIPSIS);
    }
    out
}

/// Normalized chars of `raw` plus, per normalized char, the raw char index
/// it came from. Mirrors `analysis::normalize`: stripped marks are dropped,
/// maqaf and whitespace become single collapsed spaces.
fn normalized_view(raw: &[char]) -> (Vec<char>, Vec<usize>) {
    let mut norm = Vec::with_capacity(raw.len());
    let mut map = Vec::with_capacity(raw.len());
    for (i, &c) in raw.iter().enumerate() {
        if is_stripped_mark(c) {
            continue;
        }
        let mapped = if c == MAQAF || c.is_whitespace() { ' ' } else { c };
        if mapped == ' ' && matches!(norm.last(), None | Some(' ')) {
            continue;
        }
        norm.push(mapped);
        map.push(i);
    }
    if norm.last() == Some(&' ') {
        norm.pop();
        map.pop();
    }
    (norm, map)
}

/// All token occurrences in the normalized view, in position order. At equal
/// positions the longest matching token wins, so a token that prefixes
/// another never truncates the longer occurrence's emphasis span.
fn locate_occurrences(norm: &[char], tokens: &[&str]) -> Vec<(usize, usize)> {
    let token_chars: Vec<Vec<char>> = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().collect())
        .collect();
    let mut out = Vec::new();
    for start in 0..norm.len() {
        let mut best = 0;
        for tok in &token_chars {
            if tok.len() > best
                && start + tok.len() <= norm.len()
                && norm[start..start + tok.len()] == tok[..]
            {
                best = tok.len();
            }
        }
        if best > 0 {
            out.push((start, best));
        }
    }
    out
}

/// Map a normalized-view match back to a raw char range. Combining marks
/// attached to the final matched letter stay inside the span.
fn raw_span(raw: &[char], map: &[usize], norm_start: usize, norm_len: usize) -> (usize, usize) {
    let start = map[norm_start];
    let mut end = map[norm_start + norm_len - 1] + 1;
    while end < raw.len() && is_stripped_mark(raw[end]) {
        end += 1;
    }
    (start, end)
}
