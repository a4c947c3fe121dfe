//! Drives a script: reveal ticks, the confirm input, and name capture.

use std::borrow::Cow;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::advance::{decide, is_name_char, AdvanceAction, AdvanceSnapshot, DialoguePhase};
use crate::colorize::ColoredSegment;
use crate::config::ResolvedConfig;
use crate::guard::colorize_revealed;
use crate::input::InputAction;
use crate::reveal::visible_prefix;
use crate::script::{expand_placeholder, DialogueLine, Script};
use crate::speaker::{RenderContext, SpeakerRegistry, SpeakerToken};
use crate::state::{DialogueHistory, HistoryEntry, PlaybackState};
use crate::ui::DialogueFrame;

/// Signals for collaborators outside the engine (audio, cursor blink, screen flow).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackSignals {
    /// Drives the looping typing sound.
    pub is_revealing: bool,
    /// Drives the text cursor and the visible input line.
    pub is_capturing_name: bool,
    pub script_complete: bool,
}

/// Owns the playback state and the live render context.
#[derive(Clone, Debug)]
pub struct DialoguePlayer {
    config: ResolvedConfig,
    ctx: RenderContext,
    playback: Option<PlaybackState>,
    history: DialogueHistory,
}

impl Default for DialoguePlayer {
    fn default() -> Self {
        Self::new(ResolvedConfig::default())
    }
}

impl DialoguePlayer {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            ctx: RenderContext::default(),
            playback: None,
            history: DialogueHistory::default(),
        }
    }

    /// Replaces any running script. The player's name and history carry over.
    #[instrument(
        skip_all,
        fields(script = script.id().unwrap_or("<anonymous>"), lines = script.len())
    )]
    pub fn begin_script(&mut self, script: Script) {
        let mut playback = PlaybackState::new(script, self.config.char_delay);
        if playback.is_finished() {
            info!("empty script, playback is complete");
        } else {
            let total = self.expanded_len(playback.script.line(0));
            playback.enter_line(0, total);
            info!("script started");
        }
        self.playback = Some(playback);
    }

    pub fn phase(&self) -> DialoguePhase {
        match &self.playback {
            None => DialoguePhase::Idle,
            Some(playback) if playback.finished => DialoguePhase::ScriptComplete,
            Some(playback) if playback.is_capturing_name => DialoguePhase::CapturingName,
            Some(playback) if playback.reveal.is_revealing() => DialoguePhase::Typing,
            Some(_) => DialoguePhase::LineComplete,
        }
    }

    pub fn signals(&self) -> PlaybackSignals {
        let phase = self.phase();
        PlaybackSignals {
            is_revealing: phase == DialoguePhase::Typing,
            is_capturing_name: phase == DialoguePhase::CapturingName,
            script_complete: phase == DialoguePhase::ScriptComplete,
        }
    }

    pub fn playback(&self) -> Option<&PlaybackState> {
        self.playback.as_ref()
    }

    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.playback.as_ref().and_then(PlaybackState::current_line)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn registry(&self) -> &SpeakerRegistry {
        &self.config.registry
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn player_name(&self) -> &str {
        &self.ctx.player_name
    }

    pub fn history(&self) -> &DialogueHistory {
        &self.history
    }

    /// Sets the player's name directly, e.g. when restoring a save.
    ///
    /// The current line's reveal length follows the new expansion; see
    /// [`crate::RevealDriver::set_total`].
    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.ctx.player_name = name.into();
        let total = self.expanded_len(self.current_line());
        if let Some(playback) = self.playback.as_mut() {
            playback.reveal.set_total(total);
        }
    }

    /// Full text of the current line with the player's name substituted.
    pub fn current_text(&self) -> Cow<'_, str> {
        match self.current_line() {
            Some(line) => self.expand(line),
            None => Cow::Borrowed(""),
        }
    }

    /// The part of the current line revealed so far.
    pub fn visible_text(&self) -> Cow<'_, str> {
        let revealed = self
            .playback
            .as_ref()
            .map_or(0, PlaybackState::revealed_units);
        match self.current_text() {
            Cow::Borrowed(text) => Cow::Borrowed(visible_prefix(text, revealed)),
            Cow::Owned(text) => Cow::Owned(visible_prefix(&text, revealed).to_string()),
        }
    }

    /// Highlight tokens built from the live player name.
    pub fn tokens(&self) -> Vec<SpeakerToken<'_>> {
        self.config.registry.tokens(&self.ctx)
    }

    /// Colors `visible`, which must be the text returned by [`Self::visible_text`].
    pub fn colorize_visible<'a>(&self, visible: &'a str) -> Vec<ColoredSegment<'a>> {
        colorize_revealed(visible, &self.tokens(), self.signals().is_revealing)
    }

    /// Snapshot of everything a drawing collaborator needs this frame.
    pub fn frame(&self) -> DialogueFrame {
        DialogueFrame::from_player(self)
    }

    /// Advances the reveal by at most one codepoint. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase() != DialoguePhase::Typing {
            return false;
        }
        let Some(playback) = self.playback.as_mut() else {
            return false;
        };
        let revealed = playback.reveal.tick(now);
        if revealed && !playback.reveal.is_revealing() {
            debug!(line = playback.line_index, "line fully revealed");
        }
        revealed
    }

    /// Handles the confirm input.
    pub fn confirm(&mut self) -> AdvanceAction {
        let Some(snapshot) = self.snapshot() else {
            return AdvanceAction::Ignore;
        };
        let action = decide(&snapshot);
        match action {
            AdvanceAction::ConfirmName => self.commit_name(),
            AdvanceAction::SkipToEnd => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.reveal.skip_to_end();
                    debug!(line = playback.line_index, "reveal skipped to end");
                }
            }
            AdvanceAction::OpenNamePrompt => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.capture_consumed = true;
                    playback.is_capturing_name = true;
                    playback.name_buffer.clear();
                    info!(line = playback.line_index, "name prompt opened");
                }
            }
            AdvanceAction::NextLine => self.next_line(),
            AdvanceAction::CompleteScript => self.complete_script(),
            AdvanceAction::Ignore => debug!(phase = ?snapshot.phase, "confirm ignored"),
        }
        action
    }

    /// Appends a typed character to the name buffer. Only accepted while capturing.
    pub fn type_char(&mut self, c: char) -> bool {
        let max_len = self.config.limits.max_name_length;
        let Some(playback) = self.capturing_mut() else {
            return false;
        };
        if !is_name_char(c) || playback.name_buffer.chars().count() >= max_len {
            debug!(?c, "name character rejected");
            return false;
        }
        playback.name_buffer.push(c);
        true
    }

    /// Removes the last character of the name buffer. Only accepted while capturing.
    pub fn backspace(&mut self) -> bool {
        self.capturing_mut()
            .is_some_and(|playback| playback.name_buffer.pop().is_some())
    }

    /// Routes one input action. Returns `false` when the player asked to quit.
    pub fn apply_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::None => {}
            InputAction::Quit => return false,
            InputAction::Confirm => {
                self.confirm();
            }
            InputAction::Type(c) => {
                self.type_char(c);
            }
            InputAction::Backspace => {
                self.backspace();
            }
        }
        true
    }

    fn snapshot(&self) -> Option<AdvanceSnapshot> {
        let playback = self.playback.as_ref()?;
        Some(AdvanceSnapshot {
            phase: self.phase(),
            name_buffer_empty: playback.name_buffer.is_empty(),
            capture_pending: playback.capture_pending(),
            has_next_line: playback.has_next_line(),
        })
    }

    fn capturing_mut(&mut self) -> Option<&mut PlaybackState> {
        self.playback
            .as_mut()
            .filter(|playback| !playback.finished && playback.is_capturing_name)
    }

    fn commit_name(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        let name = std::mem::take(&mut playback.name_buffer);
        playback.is_capturing_name = false;
        let has_next = playback.has_next_line();
        info!(name = %name, "player name confirmed");
        // The prompt line goes to history as shown, before the new name applies.
        self.record_current_line();
        self.set_player_name(name);
        if has_next {
            self.next_line();
        }
    }

    fn next_line(&mut self) {
        self.record_current_line();
        let Some(index) = self.playback.as_ref().map(|playback| playback.line_index + 1) else {
            return;
        };
        let total = self.expanded_len(self.playback.as_ref().and_then(|p| p.script.line(index)));
        if let Some(playback) = self.playback.as_mut() {
            playback.enter_line(index, total);
            debug!(line = index, total, "advanced to next line");
        }
    }

    fn complete_script(&mut self) {
        self.record_current_line();
        if let Some(playback) = self.playback.as_mut() {
            playback.finished = true;
            info!(script = playback.script.id().unwrap_or("<anonymous>"), "script complete");
        }
    }

    /// Records the current line once, with the name in effect right now.
    fn record_current_line(&mut self) {
        if self.playback.as_ref().map_or(true, |playback| playback.line_recorded) {
            return;
        }
        let Some(line) = self.current_line() else {
            return;
        };
        let entry = HistoryEntry {
            speaker: line.speaker,
            text: self.expand(line).into_owned(),
        };
        self.history.record(entry);
        if let Some(playback) = self.playback.as_mut() {
            playback.line_recorded = true;
        }
    }

    fn expand<'a>(&self, line: &'a DialogueLine) -> Cow<'a, str> {
        expand_placeholder(&line.text, &self.config.placeholder, &self.ctx.player_name)
    }

    fn expanded_len(&self, line: Option<&DialogueLine>) -> usize {
        line.map_or(0, |line| self.expand(line).chars().count())
    }
}

#[cfg(test)]
#[path = "tests/player_tests.rs"]
mod tests;
