//! Typewriter reveal cursor for a single line.

use std::time::{Duration, Instant};

/// Default delay between two revealed characters.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(20);

/// Reveals a line one codepoint at a time on a wall-clock cadence.
///
/// Timing uses [`Instant`], so the reveal speed does not depend on how often
/// [`RevealDriver::tick`] is called, only on elapsed time.
#[derive(Clone, Debug)]
pub struct RevealDriver {
    revealed: usize,
    total: usize,
    delay: Duration,
    last_reveal: Option<Instant>,
}

impl RevealDriver {
    pub fn new(delay: Duration) -> Self {
        Self {
            revealed: 0,
            total: 0,
            delay,
            last_reveal: None,
        }
    }

    /// Starts a new line of `total` codepoints with nothing revealed.
    pub fn start_line(&mut self, total: usize) {
        self.revealed = 0;
        self.total = total;
        self.last_reveal = None;
    }

    /// Updates the line length after the expanded text changed.
    ///
    /// A fully revealed line stays fully revealed at the new length. A line
    /// still revealing keeps its cursor, unless the new text is shorter than
    /// what is already shown; then the line restarts, so the cursor never
    /// moves backwards within one reveal run.
    pub fn set_total(&mut self, total: usize) {
        if self.revealed >= self.total {
            self.total = total;
            self.revealed = total;
        } else if self.revealed > total {
            self.start_line(total);
        } else {
            self.total = total;
        }
    }

    /// Reveals one more codepoint if the delay has elapsed. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.revealed >= self.total {
            return false;
        }
        let due = match self.last_reveal {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.delay,
        };
        if !due {
            return false;
        }
        self.revealed += 1;
        self.last_reveal = Some(now);
        true
    }

    /// Jumps straight to the end of the line.
    pub fn skip_to_end(&mut self) {
        self.revealed = self.total;
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_revealing(&self) -> bool {
        self.revealed < self.total
    }
}

impl Default for RevealDriver {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_DELAY)
    }
}

/// The first `units` codepoints of `text`.
pub fn visible_prefix(text: &str, units: usize) -> &str {
    match text.char_indices().nth(units) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
