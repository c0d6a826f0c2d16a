//! Keyboard input
//!
//! Key events delivered to the focus and attention handlers.

/// Logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    F6,
    Char(char),
}

impl Key {
    pub fn label(&self) -> String {
        match self {
            Self::Tab => "Tab".into(), Self::Escape => "Escape".into(), Self::Enter => "Enter".into(),
            Self::Space => "Space".into(), Self::ArrowLeft => "ArrowLeft".into(),
            Self::ArrowRight => "ArrowRight".into(), Self::ArrowUp => "ArrowUp".into(),
            Self::ArrowDown => "ArrowDown".into(), Self::Home => "Home".into(), Self::End => "End".into(),
            Self::F6 => "F6".into(), Self::Char(c) => c.to_string(),
        }
    }
}

/// Key press with modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self { Self { key, ctrl: false, alt: false, shift: false, meta: false } }
    pub fn ctrl(mut self) -> Self { self.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.alt = true; self }
    pub fn shift(mut self) -> Self { self.shift = true; self }
    pub fn meta(mut self) -> Self { self.meta = true; self }

    pub fn is(&self, key: Key) -> bool {
        self.key == key
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl { parts.push("Ctrl".to_string()); }
        if self.alt { parts.push("Alt".to_string()); }
        if self.shift { parts.push("Shift".to_string()); }
        if self.meta { parts.push("Cmd".to_string()); }
        parts.push(self.key.label());
        parts.join("+")
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_display() {
        assert_eq!(KeyEvent::new(Key::Tab).shift().display(), "Shift+Tab");
        assert_eq!(KeyEvent::new(Key::F6).display(), "F6");
        assert_eq!(KeyEvent::new(Key::Char('k')).ctrl().display(), "Ctrl+k");
        assert!(KeyEvent::new(Key::Char('k')).meta().is_command());
        assert!(!KeyEvent::new(Key::Char('k')).alt().is_command());
    }
}
