//! The drawing surface handed to games on init
//!
//! Besides its logical size the surface carries the listener table and the
//! audio backend. Listener registrations are scoped: `listen` returns a
//! guard and the registration lives exactly as long as the guard.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::audio::{AudioBackend, AudioSink, NullAudio};
use crate::geom::{Rect, Vec2};
use crate::input::{EventKind, EventTarget, InputEvent};

/// Opaque identifier of one listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(ListenerId, EventTarget, EventKind)>,
}

impl ListenerTable {
    fn insert(&mut self, target: EventTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, target, kind));
        id
    }

    fn remove(&mut self, id: ListenerId) {
        self.entries.retain(|(entry, _, _)| *entry != id);
    }
}

/// Live listener registration, removed from the surface when dropped
#[must_use = "the listener is removed as soon as the guard is dropped"]
pub struct ListenerGuard {
    id: ListenerId,
    table: Weak<RefCell<ListenerTable>>,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().remove(self.id);
        }
    }
}

/// Logical drawing target plus the host resources games may acquire
pub struct Surface {
    width: u32,
    height: u32,
    listeners: Rc<RefCell<ListenerTable>>,
    audio: Box<dyn AudioBackend>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            listeners: Rc::new(RefCell::new(ListenerTable::default())),
            audio: Box::new(NullAudio),
        }
    }

    /// Replace the audio backend sinks are opened from
    pub fn with_audio(mut self, backend: impl AudioBackend + 'static) -> Self {
        self.audio = Box::new(backend);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds().contains(p)
    }

    /// Register interest in `kind` events on `target`
    pub fn listen(&self, target: EventTarget, kind: EventKind) -> ListenerGuard {
        let id = self.listeners.borrow_mut().insert(target, kind);
        ListenerGuard {
            id,
            table: Rc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Whether a live registration would receive `event`
    ///
    /// Key events only reach window listeners. Pointer events reach window
    /// listeners always and surface listeners when they land on the surface.
    pub fn accepts(&self, event: &InputEvent) -> bool {
        let kind = event.kind();
        let on_surface = event.position().is_some_and(|p| self.contains(p));
        self.listeners
            .borrow()
            .entries
            .iter()
            .any(|&(_, target, k)| {
                k == kind && (target == EventTarget::Window || on_surface)
            })
    }

    /// Open an audio channel for one game instance
    pub fn open_audio(&self) -> Box<dyn AudioSink> {
        self.audio.open()
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_guard_drop_removes_registration() {
        let surface = Surface::new(100, 100);
        let a = surface.listen(EventTarget::Window, EventKind::KeyDown);
        let b = surface.listen(EventTarget::Surface, EventKind::MouseDown);
        assert_ne!(a.id(), b.id());
        assert_eq!(surface.listener_count(), 2);

        drop(a);
        assert_eq!(surface.listener_count(), 1);
        assert!(!surface.accepts(&InputEvent::KeyDown(Key::Space)));
        drop(b);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_guard_outliving_surface_is_harmless() {
        let surface = Surface::new(10, 10);
        let guard = surface.listen(EventTarget::Window, EventKind::KeyUp);
        drop(surface);
        drop(guard);
    }

    #[test]
    fn test_accepts_by_target() {
        let surface = Surface::new(100, 100);
        let _down = surface.listen(EventTarget::Surface, EventKind::MouseDown);
        let _up = surface.listen(EventTarget::Window, EventKind::MouseUp);

        assert!(surface.accepts(&InputEvent::MouseDown(Vec2::new(50.0, 50.0))));
        assert!(!surface.accepts(&InputEvent::MouseDown(Vec2::new(150.0, 50.0))));
        // Window listeners see releases outside the surface too
        assert!(surface.accepts(&InputEvent::MouseUp(Vec2::new(150.0, 50.0))));
        assert!(!surface.accepts(&InputEvent::MouseMove(Vec2::new(50.0, 50.0))));
    }
}
