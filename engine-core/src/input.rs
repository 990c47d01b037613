//! Input events delivered to games
//!
//! Positions are already mapped into surface coordinates by the host. Key
//! events always target the window; pointer-style events target the surface
//! when they land inside it and bubble up to the window either way.

use crate::geom::Vec2;

/// Logical keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Enter,
    Escape,
    Char(char),
}

impl Key {
    /// Case-insensitive match against a letter key
    pub fn is_letter(&self, letter: char) -> bool {
        matches!(self, Key::Char(c) if c.eq_ignore_ascii_case(&letter))
    }

    /// Parse the browser-style key name (`"ArrowLeft"`, `"a"`, `" "`)
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            " " | "Space" => Key::Space,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Event kinds a game can register a listener for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerMove,
    PointerUp,
    MouseDown,
    MouseMove,
    MouseUp,
    Click,
    TouchStart,
    TouchMove,
    TouchEnd,
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Surface,
}

/// A single input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp(Vec2),
    MouseDown(Vec2),
    MouseMove(Vec2),
    MouseUp(Vec2),
    Click(Vec2),
    TouchStart(Vec2),
    TouchMove(Vec2),
    TouchEnd(Vec2),
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::PointerDown(_) => EventKind::PointerDown,
            InputEvent::PointerMove(_) => EventKind::PointerMove,
            InputEvent::PointerUp(_) => EventKind::PointerUp,
            InputEvent::MouseDown(_) => EventKind::MouseDown,
            InputEvent::MouseMove(_) => EventKind::MouseMove,
            InputEvent::MouseUp(_) => EventKind::MouseUp,
            InputEvent::Click(_) => EventKind::Click,
            InputEvent::TouchStart(_) => EventKind::TouchStart,
            InputEvent::TouchMove(_) => EventKind::TouchMove,
            InputEvent::TouchEnd(_) => EventKind::TouchEnd,
        }
    }

    /// Surface-space position for pointer-style events
    pub fn position(&self) -> Option<Vec2> {
        match self {
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => None,
            InputEvent::PointerDown(p)
            | InputEvent::PointerMove(p)
            | InputEvent::PointerUp(p)
            | InputEvent::MouseDown(p)
            | InputEvent::MouseMove(p)
            | InputEvent::MouseUp(p)
            | InputEvent::Click(p)
            | InputEvent::TouchStart(p)
            | InputEvent::TouchMove(p)
            | InputEvent::TouchEnd(p) => Some(*p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("ArrowUp"), Some(Key::ArrowUp));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("R"), Some(Key::Char('r')));
        assert_eq!(Key::from_name("Shift"), None);
        assert!(Key::Char('R').is_letter('r'));
        assert!(!Key::Space.is_letter('r'));
    }

    #[test]
    fn test_event_kind_and_position() {
        let e = InputEvent::MouseMove(Vec2::new(1.0, 2.0));
        assert_eq!(e.kind(), EventKind::MouseMove);
        assert_eq!(e.position(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(InputEvent::KeyDown(Key::Enter).position(), None);
    }
}
