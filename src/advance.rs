//! Decision table for the single confirm input.

use serde::{Deserialize, Serialize};

/// Where playback stands, as seen by the confirm input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialoguePhase {
    /// No script has been started.
    Idle,
    CapturingName,
    Typing,
    LineComplete,
    ScriptComplete,
}

/// Everything the decision table looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceSnapshot {
    pub phase: DialoguePhase,
    pub name_buffer_empty: bool,
    /// The current line asks for a name and the prompt has not opened yet.
    pub capture_pending: bool,
    pub has_next_line: bool,
}

/// What a confirm press does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdvanceAction {
    /// Commit the typed name and move past the prompt line.
    ConfirmName,
    /// Reveal the rest of the current line at once.
    SkipToEnd,
    /// Open the name prompt; the line does not change.
    OpenNamePrompt,
    NextLine,
    /// Last line acknowledged; playback becomes terminal.
    CompleteScript,
    Ignore,
}

/// Evaluates the table top to bottom; the first matching row wins.
pub fn decide(snapshot: &AdvanceSnapshot) -> AdvanceAction {
    match snapshot.phase {
        DialoguePhase::CapturingName if !snapshot.name_buffer_empty => AdvanceAction::ConfirmName,
        DialoguePhase::CapturingName => AdvanceAction::Ignore,
        DialoguePhase::Typing => AdvanceAction::SkipToEnd,
        DialoguePhase::LineComplete if snapshot.capture_pending => AdvanceAction::OpenNamePrompt,
        DialoguePhase::LineComplete if snapshot.has_next_line => AdvanceAction::NextLine,
        DialoguePhase::LineComplete => AdvanceAction::CompleteScript,
        DialoguePhase::Idle | DialoguePhase::ScriptComplete => AdvanceAction::Ignore,
    }
}

/// Characters allowed into the name buffer.
pub fn is_name_char(c: char) -> bool {
    !c.is_control()
}
