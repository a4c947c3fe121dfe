/// Upper bounds applied when loading scripts and capturing names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceLimiter {
    pub max_lines: usize,
    pub max_text_length: usize,
    pub max_script_bytes: usize,
    pub max_name_length: usize,
}

impl Default for ResourceLimiter {
    fn default() -> Self {
        Self {
            max_lines: 10_000,
            max_text_length: 4_096,
            max_script_bytes: 512 * 1024,
            max_name_length: 16,
        }
    }
}
