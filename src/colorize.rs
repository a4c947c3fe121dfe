//! Splits dialogue text into colored segments by speaker name.
//!
//! The scan is greedy and leftmost-first: at every step the token whose name
//! occurs earliest after the cursor wins, and on equal offsets the token that
//! comes first in the supplied list wins. This is priority tie-breaking, not
//! longest-match.

use serde::Serialize;

use crate::color::Rgba;
use crate::speaker::SpeakerToken;

/// A contiguous run of text sharing one color. `None` is the default text color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColoredSegment<'a> {
    pub text: &'a str,
    pub color: Option<Rgba>,
}

impl<'a> ColoredSegment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { text, color: None }
    }

    pub fn colored(text: &'a str, color: Rgba) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }

    pub fn resolve_color(&self, default: Rgba) -> Rgba {
        self.color.unwrap_or(default)
    }
}

/// Colors every full occurrence of a token name in `text`.
pub fn colorize<'a>(text: &'a str, tokens: &[SpeakerToken<'_>]) -> Vec<ColoredSegment<'a>> {
    let mut segments = Vec::new();
    let mut cursor = 0usize;

    while cursor < text.len() {
        let Some((start, len, color)) = earliest_match(&text[cursor..], tokens) else {
            break;
        };
        let start = cursor + start;
        if start > cursor {
            segments.push(ColoredSegment::plain(&text[cursor..start]));
        }
        let end = start + len;
        segments.push(ColoredSegment::colored(&text[start..end], color));
        cursor = end;
    }

    if cursor < text.len() {
        segments.push(ColoredSegment::plain(&text[cursor..]));
    }
    segments
}

/// Byte offset, byte length and color of the winning match in `haystack`.
fn earliest_match(haystack: &str, tokens: &[SpeakerToken<'_>]) -> Option<(usize, usize, Rgba)> {
    let mut best: Option<(usize, usize, Rgba)> = None;
    for token in tokens {
        if token.display_name.is_empty() {
            continue;
        }
        let Some(offset) = haystack.find(token.display_name) else {
            continue;
        };
        // Strict comparison keeps the earlier token on ties.
        if best.map_or(true, |(best_offset, _, _)| offset < best_offset) {
            best = Some((offset, token.display_name.len(), token.color));
        }
    }
    best
}

/// Rebuilds the text the segments were cut from.
pub fn concat_segments(segments: &[ColoredSegment<'_>]) -> String {
    segments.iter().map(|segment| segment.text).collect()
}
