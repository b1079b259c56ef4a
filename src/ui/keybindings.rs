// Keybindings for the portfolio lightbox
//
// Keybindings (only while the lightbox is open):
// - Escape: Close the lightbox
// - ArrowRight: Next item
// - ArrowLeft: Previous item
//
// Arrow semantics are physical and are not mirrored for right-to-left locales.

/// A key press as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Char(char),
}

impl Key {
    /// Parses DOM-style key names ("Escape", "ArrowLeft") and short aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.trim().to_ascii_lowercase().as_str() {
            "escape" | "esc" => Self::Escape,
            "arrowleft" | "left" => Self::ArrowLeft,
            "arrowright" | "right" => Self::ArrowRight,
            "arrowup" | "up" => Self::ArrowUp,
            "arrowdown" | "down" => Self::ArrowDown,
            "enter" | "return" => Self::Enter,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Commands the lightbox understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxAction {
    Close,
    Next,
    Previous,
}

/// Maps a key to a lightbox command.
pub fn lightbox_action(key: Key) -> Option<LightboxAction> {
    match key {
        Key::Escape => Some(LightboxAction::Close),
        Key::ArrowRight => Some(LightboxAction::Next),
        Key::ArrowLeft => Some(LightboxAction::Previous),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("right"), Some(Key::ArrowRight));
        assert_eq!(Key::from_name("f"), Some(Key::Char('f')));
        assert_eq!(Key::from_name("PageDown"), None);
        assert_eq!(Key::from_name(""), None);
    }

    #[test]
    fn test_lightbox_bindings() {
        assert_eq!(lightbox_action(Key::Escape), Some(LightboxAction::Close));
        assert_eq!(lightbox_action(Key::ArrowRight), Some(LightboxAction::Next));
        assert_eq!(lightbox_action(Key::ArrowLeft), Some(LightboxAction::Previous));
        assert_eq!(lightbox_action(Key::ArrowUp), None);
        assert_eq!(lightbox_action(Key::Enter), None);
    }
}
