use std::collections::HashMap;

/// Input actions consumed by the dialogue player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    None,
    Confirm,
    Type(char),
    Backspace,
    Quit,
}

/// Maps named keys to actions; printable text becomes [`InputAction::Type`].
#[derive(Clone, Debug)]
pub struct ConfigurableInput {
    key_map: HashMap<String, InputAction>,
}

impl ConfigurableInput {
    /// Creates a new input handler with the given key mappings.
    pub fn new(key_map: HashMap<String, InputAction>) -> Self {
        Self { key_map }
    }

    pub fn bind(&mut self, key: impl Into<String>, action: InputAction) {
        self.key_map.insert(key.into(), action);
    }

    /// Translates one key press.
    ///
    /// In `text_mode` printable text wins over key bindings, so a bound key
    /// such as Space still types into the name prompt.
    pub fn handle_key(&self, key: &str, text: Option<char>, text_mode: bool) -> InputAction {
        let printable = text.filter(|c| !c.is_control());
        if text_mode {
            if let Some(c) = printable {
                return InputAction::Type(c);
            }
        }
        self.key_map
            .get(key)
            .copied()
            .unwrap_or(InputAction::None)
    }
}

impl Default for ConfigurableInput {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert("Enter".to_string(), InputAction::Confirm);
        map.insert("Space".to_string(), InputAction::Confirm);
        map.insert("Backspace".to_string(), InputAction::Backspace);
        map.insert("Escape".to_string(), InputAction::Quit);

        Self { key_map: map }
    }
}
