//! Playback cursor over one script, and the backlog of read lines.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reveal::RevealDriver;
use crate::script::{DialogueLine, Script};
use crate::speaker::SpeakerId;

const HISTORY_LIMIT: usize = 200;

/// Mutable cursor over a script. Replaced whole when another script begins.
#[derive(Clone, Debug)]
pub struct PlaybackState {
    pub(crate) script: Script,
    pub(crate) line_index: usize,
    pub(crate) reveal: RevealDriver,
    pub(crate) is_capturing_name: bool,
    pub(crate) name_buffer: String,
    /// The current line's name prompt has been opened.
    pub(crate) capture_consumed: bool,
    /// The current line is already in the history.
    pub(crate) line_recorded: bool,
    pub(crate) finished: bool,
}

impl PlaybackState {
    pub fn new(script: Script, char_delay: Duration) -> Self {
        let finished = script.is_empty();
        Self {
            script,
            line_index: 0,
            reveal: RevealDriver::new(char_delay),
            is_capturing_name: false,
            name_buffer: String::new(),
            capture_consumed: false,
            line_recorded: false,
            finished,
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn revealed_units(&self) -> usize {
        self.reveal.revealed()
    }

    pub fn is_capturing_name(&self) -> bool {
        self.is_capturing_name
    }

    pub fn name_buffer(&self) -> &str {
        &self.name_buffer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_line(&self) -> Option<&DialogueLine> {
        if self.finished {
            return None;
        }
        self.script.line(self.line_index)
    }

    pub fn has_next_line(&self) -> bool {
        self.line_index + 1 < self.script.len()
    }

    pub fn capture_pending(&self) -> bool {
        self.current_line()
            .is_some_and(|line| line.triggers_name_capture && !self.capture_consumed)
    }

    /// Moves to `index` with a fresh reveal of `total` codepoints.
    pub(crate) fn enter_line(&mut self, index: usize, total: usize) {
        self.line_index = index;
        self.reveal.start_line(total);
        self.is_capturing_name = false;
        self.capture_consumed = false;
        self.line_recorded = false;
    }
}

/// A line as it was shown, with the player's name already substituted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub speaker: SpeakerId,
    pub text: String,
}

/// Bounded backlog of lines the player has read.
#[derive(Clone, Debug, Default)]
pub struct DialogueHistory {
    entries: VecDeque<HistoryEntry>,
}

impl DialogueHistory {
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.entries.len() >= HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
