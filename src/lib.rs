//! Dialogue box engine: typewriter reveal, speaker-name highlighting, and the
//! confirm-driven progression through a script.

mod advance;
mod color;
mod colorize;
mod config;
mod error;
mod guard;
mod input;
mod player;
mod render;
mod resource;
mod reveal;
mod script;
mod security;
mod speaker;
mod state;
mod trace;
mod ui;

pub use advance::{decide, is_name_char, AdvanceAction, AdvanceSnapshot, DialoguePhase};
pub use color::Rgba;
pub use colorize::{colorize, concat_segments, ColoredSegment};
pub use config::{DialogueConfig, ResolvedConfig, SpeakerOverride};
pub use error::{DialogueError, DialogueResult};
pub use guard::{apply_boundary_guard, colorize_revealed, partial_tail_match, PartialMatch};
pub use input::{ConfigurableInput, InputAction};
pub use player::{DialoguePlayer, PlaybackSignals};
pub use render::{
    layout_segments, AnsiRenderer, FixedMetrics, GlyphMetrics, LayoutCursor, PlacedRun,
    PlainRenderer, RenderBackend, RenderOutput, TextLayout,
};
pub use resource::ResourceLimiter;
pub use reveal::{visible_prefix, RevealDriver, DEFAULT_CHAR_DELAY};
pub use script::{
    expand_placeholder, DialogueLine, Script, DEFAULT_PLACEHOLDER, SCRIPT_SCHEMA_VERSION,
};
pub use security::SecurityPolicy;
pub use speaker::{
    RenderContext, SpeakerEntry, SpeakerId, SpeakerName, SpeakerRegistry, SpeakerToken,
};
pub use state::{DialogueHistory, HistoryEntry, PlaybackState};
pub use trace::{run_headless, DialogueTrace, HeadlessOptions, TraceStep};
pub use ui::{DialogueFrame, FrameSegment, SpeakerLabel};
