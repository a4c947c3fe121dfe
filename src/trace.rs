//! Headless playback traces for deterministic testing.
//!
//! The runner drives a [`DialoguePlayer`] with a synthetic clock that moves
//! exactly one character delay per step, answering every prompt the way a
//! player would.

use std::fmt::Write as _;
use std::time::Instant;

use serde::Serialize;

use crate::advance::DialoguePhase;
use crate::player::DialoguePlayer;
use crate::render::{PlainRenderer, RenderBackend};

#[derive(Clone, Debug)]
pub struct HeadlessOptions {
    /// Typed into every name prompt. An empty name leaves the prompt open.
    pub player_name: String,
    pub max_steps: usize,
    /// Press confirm while a line is still typing.
    pub skip_reveal: bool,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            player_name: "Rin".to_string(),
            max_steps: 1_000,
            skip_reveal: false,
        }
    }
}

/// A single step in the trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub step: u32,
    pub phase: DialoguePhase,
    pub line: usize,
    pub revealed: usize,
    /// Visible text with highlighted runs in brackets.
    pub text: String,
    pub name_input: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DialogueTrace {
    pub steps: Vec<TraceStep>,
}

impl DialogueTrace {
    pub fn push(&mut self, step: u32, player: &DialoguePlayer) {
        let frame = player.frame();
        let (line, revealed) = player
            .playback()
            .map_or((0, 0), |playback| (playback.line_index(), playback.revealed_units()));
        self.steps.push(TraceStep {
            step,
            phase: frame.phase,
            line,
            revealed,
            text: PlainRenderer.render(&frame.layout).text,
            name_input: frame.name_input,
        });
    }

    pub fn last_phase(&self) -> Option<DialoguePhase> {
        self.steps.last().map(|step| step.phase)
    }

    /// One line per step, newlines escaped.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = write!(
                out,
                "{:03} {:?} line={} revealed={} |{}|",
                step.step,
                step.phase,
                step.line,
                step.revealed,
                step.text.replace('\n', "\\n")
            );
            if let Some(name) = &step.name_input {
                let _ = write!(out, " name=|{name}|");
            }
            out.push('\n');
        }
        out
    }
}

/// Plays the loaded script to completion or until `max_steps`.
pub fn run_headless(player: &mut DialoguePlayer, options: &HeadlessOptions) -> DialogueTrace {
    let delay = player.config().char_delay;
    let mut now = Instant::now();
    let mut trace = DialogueTrace::default();

    for step in 0..options.max_steps {
        let step = u32::try_from(step).unwrap_or(u32::MAX);
        if matches!(
            player.phase(),
            DialoguePhase::Idle | DialoguePhase::ScriptComplete
        ) {
            trace.push(step, player);
            break;
        }

        player.tick(now);
        trace.push(step, player);

        match player.phase() {
            DialoguePhase::Typing if options.skip_reveal => {
                player.confirm();
            }
            DialoguePhase::LineComplete => {
                player.confirm();
            }
            DialoguePhase::CapturingName => {
                for c in options.player_name.chars() {
                    player.type_char(c);
                }
                player.confirm();
            }
            _ => {}
        }
        now += delay;
    }
    trace
}
