pub mod catalog;
pub mod console;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message surfaced to the user after an action settles.
///
/// Each new notice replaces the previous one; the terminal layer decides how
/// to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    /// Build a success notice.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// Build an error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// A single keystroke applied to a text input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    /// Append one character at the end of the buffer.
    Insert(char),
    /// Remove the last character, if any.
    Backspace,
}

impl FieldEdit {
    /// Apply the edit to `buffer`.
    pub fn apply(self, buffer: &mut String) {
        match self {
            FieldEdit::Insert(ch) => buffer.push(ch),
            FieldEdit::Backspace => {
                buffer.pop();
            }
        }
    }
}
