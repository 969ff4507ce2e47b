//! Keyboard shortcuts.

/// Modifier state and `key` of a keydown event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl+Shift+D, or Cmd+Shift+D on macOS. The key must be an upper-case
    /// `D`; with Caps Lock on, Shift reports `d` and the chord is ignored.
    pub fn is_theme_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && self.shift && self.key == "D"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_shortcut() {
        assert!(KeyChord::new("D").ctrl().shift().is_theme_shortcut());
        assert!(KeyChord::new("D").meta().shift().is_theme_shortcut());
    }

    #[test]
    fn test_not_theme_shortcut() {
        assert!(!KeyChord::new("D").shift().is_theme_shortcut());
        assert!(!KeyChord::new("D").ctrl().is_theme_shortcut());
        assert!(!KeyChord::new("F").ctrl().shift().is_theme_shortcut());
        assert!(!KeyChord::new("Dead").ctrl().shift().is_theme_shortcut());
        assert!(!KeyChord::new("d").ctrl().shift().is_theme_shortcut());
        assert!(!KeyChord::new("d").meta().shift().is_theme_shortcut());
    }
}
