//! Keyboard handling for the message input.

/// A key relevant to the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

/// Modifier keys held during a press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// What a key press does to the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Insert(char),
    DeleteBack,
}

impl From<KeyPress> for InputAction {
    fn from(press: KeyPress) -> Self {
        match press.key {
            // A modified Enter is a line break, never a submit
            Key::Enter if press.modifiers.any() => InputAction::Insert('\n'),
            Key::Enter => InputAction::Submit,
            Key::Backspace => InputAction::DeleteBack,
            Key::Char(c) => InputAction::Insert(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_submits_only_without_modifiers() {
        assert_eq!(InputAction::from(KeyPress::plain(Key::Enter)), InputAction::Submit);

        for modifiers in [
            Modifiers::SHIFT,
            Modifiers { ctrl: true, ..Modifiers::NONE },
            Modifiers { alt: true, ..Modifiers::NONE },
            Modifiers { meta: true, ..Modifiers::NONE },
        ] {
            assert_eq!(
                InputAction::from(KeyPress::new(Key::Enter, modifiers)),
                InputAction::Insert('\n')
            );
        }
    }

    #[test]
    fn test_characters_insert() {
        assert_eq!(
            InputAction::from(KeyPress::new(Key::Char('A'), Modifiers::SHIFT)),
            InputAction::Insert('A')
        );
        assert_eq!(InputAction::from(KeyPress::plain(Key::Backspace)), InputAction::DeleteBack);
    }
}
