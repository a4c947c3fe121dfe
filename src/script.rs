//! Immutable dialogue scripts and their JSON form.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DialogueError, DialogueResult};
use crate::resource::ResourceLimiter;
use crate::speaker::SpeakerId;

/// Current schema version for JSON scripts.
pub const SCRIPT_SCHEMA_VERSION: &str = "1.0";

/// Marker replaced by the player's name unless configured otherwise.
pub const DEFAULT_PLACEHOLDER: &str = "{player}";

/// One line of dialogue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: SpeakerId,
    pub text: String,
    #[serde(default)]
    pub triggers_name_capture: bool,
}

impl DialogueLine {
    pub fn new(speaker: SpeakerId, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            triggers_name_capture: false,
        }
    }

    /// Marks the line as the one that opens the name prompt once read.
    pub fn with_name_capture(mut self) -> Self {
        self.triggers_name_capture = true;
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ScriptEnvelope {
    #[serde(default)]
    script_schema_version: Option<String>,
    #[serde(default)]
    id: Option<String>,
    lines: Vec<DialogueLine>,
}

/// Ordered, read-only sequence of lines. Cloning shares the storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    id: Option<Arc<str>>,
    lines: Arc<[DialogueLine]>,
}

impl Script {
    pub fn new(lines: Vec<DialogueLine>) -> Self {
        Self {
            id: None,
            lines: lines.into(),
        }
    }

    pub fn with_id(mut self, id: impl AsRef<str>) -> Self {
        self.id = Some(Arc::from(id.as_ref()));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&DialogueLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Parses a JSON script with the default limits.
    pub fn from_json(input: &str) -> DialogueResult<Self> {
        Self::from_json_with_limits(input, ResourceLimiter::default())
    }

    /// Parses a JSON script, rejecting oversized input before deserializing.
    pub fn from_json_with_limits(input: &str, limits: ResourceLimiter) -> DialogueResult<Self> {
        if input.len() > limits.max_script_bytes {
            return Err(DialogueError::ResourceLimit("script size".to_string()));
        }
        let envelope: ScriptEnvelope =
            serde_json::from_str(input).map_err(|err| json_deserialize_error(input, &err))?;
        match envelope.script_schema_version.as_deref() {
            // Scripts written before versioning are accepted as-is.
            None => {}
            Some(SCRIPT_SCHEMA_VERSION) => {}
            Some(version) => {
                return Err(DialogueError::InvalidScript(format!(
                    "schema incompatible: found {version}, expected {SCRIPT_SCHEMA_VERSION}"
                )))
            }
        }
        if envelope.lines.len() > limits.max_lines {
            return Err(DialogueError::ResourceLimit("line count".to_string()));
        }
        let script = Self::new(envelope.lines);
        Ok(match envelope.id {
            Some(id) => script.with_id(id),
            None => script,
        })
    }

    /// Serializes the script with the current schema version.
    pub fn to_json(&self) -> DialogueResult<String> {
        let envelope = ScriptEnvelope {
            script_schema_version: Some(SCRIPT_SCHEMA_VERSION.to_string()),
            id: self.id.as_deref().map(str::to_string),
            lines: self.lines.to_vec(),
        };
        serde_json::to_string_pretty(&envelope).map_err(|e| DialogueError::Serialization {
            message: e.to_string(),
            src: String::new(),
            span: (0, 0).into(),
        })
    }
}

/// Substitutes the player's name for `marker`.
///
/// An empty name leaves the marker in place.
pub fn expand_placeholder<'a>(text: &'a str, marker: &str, player_name: &str) -> Cow<'a, str> {
    if marker.is_empty() || player_name.is_empty() || !text.contains(marker) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace(marker, player_name))
}

fn json_deserialize_error(input: &str, err: &serde_json::Error) -> DialogueError {
    let offset = json_error_offset(input, err);
    let (window, local_offset) = json_error_window(input, offset);
    let span_len = usize::from(local_offset < window.len());
    DialogueError::Serialization {
        message: err.to_string(),
        src: window,
        span: (local_offset, span_len).into(),
    }
}

#[cold]
#[inline(never)]
fn json_error_offset(input: &str, error: &serde_json::Error) -> usize {
    let (line, column) = (error.line(), error.column());
    if line == 0 || column == 0 {
        return 0;
    }
    let mut offset = 0usize;
    for (index, chunk) in input.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let byte_index = chunk
                .char_indices()
                .nth(column - 1)
                .map(|(idx, _)| idx)
                .unwrap_or(chunk.len().saturating_sub(1));
            return offset + byte_index;
        }
        offset += chunk.len();
    }
    input.len().saturating_sub(1)
}

#[cold]
#[inline(never)]
fn json_error_window(input: &str, offset: usize) -> (String, usize) {
    const CONTEXT: usize = 120;
    let mut start = offset.saturating_sub(CONTEXT);
    let mut end = (offset + 1 + CONTEXT).min(input.len());
    while start > 0 && !input.is_char_boundary(start) {
        start -= 1;
    }
    while end < input.len() && !input.is_char_boundary(end) {
        end += 1;
    }
    (input[start..end].to_string(), offset.saturating_sub(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_versioned_script() {
        let json = r#"{
            "script_schema_version": "1.0",
            "id": "intro",
            "lines": [
                {"speaker": "storyteller", "text": "Welcome, traveller."},
                {
                    "speaker": "storyteller",
                    "text": "What is your name?",
                    "triggers_name_capture": true
                },
                {"speaker": "tory", "text": "Hello, {player}!"}
            ]
        }"#;
        let script = Script::from_json(json).expect("parse");
        assert_eq!(script.id(), Some("intro"));
        assert_eq!(script.len(), 3);
        assert!(script.lines()[1].triggers_name_capture);
        assert!(!script.lines()[2].triggers_name_capture);
        assert_eq!(script.line(2).map(|line| line.speaker), Some(SpeakerId::Tory));
    }

    #[test]
    fn accepts_legacy_script_without_version() {
        let script = Script::from_json(r#"{"lines": []}"#).expect("parse");
        assert!(script.is_empty());
        assert_eq!(script.id(), None);
    }

    #[test]
    fn rejects_other_schema_versions() {
        let result = Script::from_json(r#"{"script_schema_version": "2.0", "lines": []}"#);
        assert!(matches!(result, Err(DialogueError::InvalidScript(_))));
    }

    #[test]
    fn rejects_unknown_speakers_with_span() {
        let json = r#"{"lines": [{"speaker": "dragon", "text": "Roar"}]}"#;
        match Script::from_json(json) {
            Err(DialogueError::Serialization { message, src, .. }) => {
                assert!(message.contains("dragon"));
                assert!(src.contains("dragon"));
            }
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_oversized_input_before_parsing() {
        let limits = ResourceLimiter {
            max_script_bytes: 8,
            ..Default::default()
        };
        let result = Script::from_json_with_limits(r#"{"lines": []}"#, limits);
        assert!(matches!(result, Err(DialogueError::ResourceLimit(_))));
    }

    #[test]
    fn json_round_trip_keeps_lines() {
        let script = Script::new(vec![
            DialogueLine::new(SpeakerId::Elder, "Rest now."),
            DialogueLine::new(SpeakerId::Narrator, "Name?").with_name_capture(),
        ])
        .with_id("camp");
        let json = script.to_json().expect("serialize");
        assert!(json.contains("\"script_schema_version\": \"1.0\""));
        assert_eq!(Script::from_json(&json).expect("parse"), script);
    }

    #[test]
    fn placeholder_expands_only_with_a_name() {
        assert_eq!(expand_placeholder("Hi {player}", "{player}", ""), "Hi {player}");
        assert_eq!(expand_placeholder("Hi {player}", "{player}", "Rin"), "Hi Rin");
        assert!(matches!(
            expand_placeholder("Hi", "{player}", "Rin"),
            Cow::Borrowed("Hi")
        ));
    }
}
