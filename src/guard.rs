//! Live highlighting of a speaker name that is still being revealed.
//!
//! [`colorize`] only colors complete names. While a line is mid-reveal, the
//! guard colors the trailing characters of the visible text when they spell
//! the beginning of a name, so the highlight grows letter by letter.

use crate::color::Rgba;
use crate::colorize::{colorize, ColoredSegment};
use crate::speaker::SpeakerToken;

/// A strict prefix of a token name found at the end of the visible text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialMatch {
    /// Length of the matched tail in bytes.
    pub byte_len: usize,
    /// Length of the matched tail in codepoints.
    pub char_len: usize,
    pub color: Rgba,
}

/// Longest strict prefix of any eligible token name that `text` ends with.
///
/// Names must start with an alphabetic character. Equal lengths keep the
/// token that appears first in `tokens`.
pub fn partial_tail_match(text: &str, tokens: &[SpeakerToken<'_>]) -> Option<PartialMatch> {
    let mut best: Option<PartialMatch> = None;
    for token in tokens {
        let name = token.display_name;
        if !name.chars().next().is_some_and(char::is_alphabetic) {
            continue;
        }
        // Boundaries after the first char and before the last: proper prefixes only.
        for (char_len, (end, _)) in name.char_indices().enumerate().skip(1) {
            let prefix = &name[..end];
            if prefix.len() > text.len() {
                break;
            }
            if !text.ends_with(prefix) {
                continue;
            }
            if best.map_or(true, |current| char_len > current.char_len) {
                best = Some(PartialMatch {
                    byte_len: prefix.len(),
                    char_len,
                    color: token.color,
                });
            }
        }
    }
    best
}

/// Re-tags the tail of `segments` with the color of a partially revealed name.
pub fn apply_boundary_guard<'a>(
    text: &'a str,
    segments: Vec<ColoredSegment<'a>>,
    tokens: &[SpeakerToken<'_>],
) -> Vec<ColoredSegment<'a>> {
    let Some(partial) = partial_tail_match(text, tokens) else {
        return segments;
    };
    let split = text.len() - partial.byte_len;

    let mut guarded = Vec::with_capacity(segments.len() + 1);
    let mut offset = 0usize;
    for segment in segments {
        let start = offset;
        let end = start + segment.text.len();
        offset = end;
        if end <= split {
            guarded.push(segment);
        } else if start < split {
            guarded.push(ColoredSegment {
                text: &text[start..split],
                color: segment.color,
            });
        }
    }
    guarded.push(ColoredSegment::colored(&text[split..], partial.color));
    guarded
}

/// Colorizes the visible prefix of a line.
///
/// `revealing` is true while more of the line remains hidden; the guard only
/// runs then, so a finished line never shows a dangling partial highlight.
pub fn colorize_revealed<'a>(
    visible: &'a str,
    tokens: &[SpeakerToken<'_>],
    revealing: bool,
) -> Vec<ColoredSegment<'a>> {
    let segments = colorize(visible, tokens);
    if revealing {
        apply_boundary_guard(visible, segments, tokens)
    } else {
        segments
    }
}
