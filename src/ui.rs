//! Per-frame view handed to drawing collaborators.

use serde::Serialize;

use crate::advance::DialoguePhase;
use crate::color::Rgba;
use crate::player::{DialoguePlayer, PlaybackSignals};
use crate::render::{layout_segments, TextLayout};

/// Name plate for the current speaker. Absent for unnamed speakers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpeakerLabel {
    pub name: String,
    pub color: Rgba,
}

/// One colored run of the visible text, owned so the frame outlives the player borrow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameSegment {
    pub text: String,
    pub color: Option<Rgba>,
}

/// Everything needed to paint the dialogue box for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DialogueFrame {
    pub phase: DialoguePhase,
    pub speaker: Option<SpeakerLabel>,
    pub segments: Vec<FrameSegment>,
    pub layout: TextLayout,
    pub signals: PlaybackSignals,
    /// The name typed so far, while the prompt is open.
    pub name_input: Option<String>,
}

impl DialogueFrame {
    /// Builds the frame from the player's current state.
    pub fn from_player(player: &DialoguePlayer) -> Self {
        let visible = player.visible_text();
        let segments = player.colorize_visible(&visible);
        let config = player.config();
        let layout = layout_segments(&segments, &config.metrics, config.max_line_width);

        let speaker = player.current_line().and_then(|line| {
            let registry = player.registry();
            let name = registry.display_name(line.speaker, player.render_context());
            if name.is_empty() {
                return None;
            }
            Some(SpeakerLabel {
                name: name.to_string(),
                color: registry.color(line.speaker).unwrap_or(config.default_text_color),
            })
        });

        let signals = player.signals();
        let name_input = player
            .playback()
            .filter(|_| signals.is_capturing_name)
            .map(|playback| playback.name_buffer().to_string());

        Self {
            phase: player.phase(),
            speaker,
            segments: segments
                .iter()
                .map(|segment| FrameSegment {
                    text: segment.text.to_string(),
                    color: segment.color,
                })
                .collect(),
            layout,
            signals,
            name_input,
        }
    }

    pub fn visible_text(&self) -> String {
        self.segments.iter().map(|segment| segment.text.as_str()).collect()
    }
}
