use crate::error::{DialogueError, DialogueResult};
use crate::resource::ResourceLimiter;
use crate::script::Script;

#[derive(Clone, Debug)]
pub struct SecurityPolicy {
    /// Permit control characters other than `\n` in line text.
    pub allow_control_chars: bool,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            allow_control_chars: false,
        }
    }
}

impl SecurityPolicy {
    /// Checks a loaded script against the limits and the placeholder rules.
    pub fn validate(
        &self,
        script: &Script,
        limits: ResourceLimiter,
        placeholder: &str,
    ) -> DialogueResult<()> {
        if script.len() > limits.max_lines {
            return Err(DialogueError::ResourceLimit("line count".to_string()));
        }

        for (index, line) in script.lines().iter().enumerate() {
            if line.text.len() > limits.max_text_length {
                return Err(DialogueError::ResourceLimit(format!(
                    "line {index} text"
                )));
            }
            if !placeholder.is_empty() && line.text.matches(placeholder).count() > 1 {
                return Err(DialogueError::InvalidScript(format!(
                    "line {index} has more than one '{placeholder}' marker"
                )));
            }
            if !self.allow_control_chars
                && line.text.chars().any(|c| c.is_control() && c != '\n')
            {
                return Err(DialogueError::SecurityPolicy(format!(
                    "line {index} contains control characters"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{DialogueLine, DEFAULT_PLACEHOLDER};
    use crate::speaker::SpeakerId;

    fn script(text: &str) -> Script {
        Script::new(vec![DialogueLine::new(SpeakerId::Tory, text)])
    }

    #[test]
    fn accepts_newlines_and_a_single_marker() {
        let policy = SecurityPolicy::default();
        let result = policy.validate(
            &script("Hello,\n{player}."),
            ResourceLimiter::default(),
            DEFAULT_PLACEHOLDER,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_repeated_marker() {
        let result = SecurityPolicy::default().validate(
            &script("{player} and {player}"),
            ResourceLimiter::default(),
            DEFAULT_PLACEHOLDER,
        );
        assert!(matches!(result, Err(DialogueError::InvalidScript(_))));
    }

    #[test]
    fn control_characters_depend_on_policy() {
        let text = script("bell\u{7}");
        let limits = ResourceLimiter::default();
        let strict = SecurityPolicy::default().validate(&text, limits, DEFAULT_PLACEHOLDER);
        assert!(matches!(strict, Err(DialogueError::SecurityPolicy(_))));

        let relaxed = SecurityPolicy {
            allow_control_chars: true,
        };
        assert!(relaxed.validate(&text, limits, DEFAULT_PLACEHOLDER).is_ok());
    }

    #[test]
    fn rejects_long_text() {
        let limits = ResourceLimiter {
            max_text_length: 4,
            ..Default::default()
        };
        let result =
            SecurityPolicy::default().validate(&script("Hello"), limits, DEFAULT_PLACEHOLDER);
        assert!(matches!(result, Err(DialogueError::ResourceLimit(_))));
    }
}
