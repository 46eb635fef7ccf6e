#![forbid(unsafe_code)]

//! Input payloads at the grid boundary.
//!
//! Device managers (keyboard, pointer, gamepad) live outside this crate.
//! They translate raw events into the grid-space payloads below and feed
//! them to an [`InputRegistry`], which dispatches synchronously to handlers
//! in registration order. The renderer never reads device state.

use bitflags::bitflags;

use crate::geometry::GridPoint;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    /// `true` on press (and repeat), `false` on release.
    pub pressed: bool,
}

impl KeyEvent {
    /// A press with no modifiers.
    #[must_use]
    pub const fn press(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            pressed: true,
        }
    }

    /// A release with no modifiers.
    #[must_use]
    pub const fn release(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            pressed: false,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.key, KeyCode::Char(ch) if ch == c)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Pointer moved onto a new cell.
    Hover,
    Down(PointerButton),
    Up(PointerButton),
    /// Down and up on the same cell.
    Click(PointerButton),
    /// Pointer left the grid.
    Leave,
}

/// A pointer event already translated into cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub grid: GridPoint,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            grid: GridPoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn is_click(&self) -> bool {
        matches!(self.kind, PointerKind::Click(_))
    }
}

/// Handle returned by [`InputRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Predicate<E> = Box<dyn Fn(&E) -> bool>;
type Handler<E> = Box<dyn FnMut(&E)>;

struct Entry<E> {
    id: HandlerId,
    predicate: Predicate<E>,
    handler: Handler<E>,
}

/// Ordered list of `(predicate, handler)` pairs.
///
/// [`dispatch`](Self::dispatch) walks the list in registration order and runs
/// every handler whose predicate accepts the event. Single-threaded: handlers
/// are plain `FnMut` closures, not `Send`.
pub struct InputRegistry<E = InputEvent> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> InputRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a handler gated by a predicate.
    pub fn register<P, H>(&mut self, predicate: P, handler: H) -> HandlerId
    where
        P: Fn(&E) -> bool + 'static,
        H: FnMut(&E) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            predicate: Box::new(predicate),
            handler: Box::new(handler),
        });
        crate::debug!(handler = id.0, "input handler registered");
        id
    }

    /// Register a handler that sees every event.
    pub fn register_all<H>(&mut self, handler: H) -> HandlerId
    where
        H: FnMut(&E) + 'static,
    {
        self.register(|_| true, handler)
    }

    /// Remove a handler. Returns `false` if the id is unknown.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Deliver one event. Returns how many handlers ran.
    pub fn dispatch(&mut self, event: &E) -> usize {
        let mut invoked = 0;
        for entry in &mut self.entries {
            if (entry.predicate)(event) {
                (entry.handler)(event);
                invoked += 1;
            }
        }
        crate::trace!(invoked, "input dispatched");
        invoked
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for InputRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for InputRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRegistry")
            .field("handlers", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_runs_matching_handlers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg: InputRegistry = InputRegistry::new();

        let l = Rc::clone(&log);
        reg.register(
            |e| matches!(e, InputEvent::Pointer(p) if p.is_click()),
            move |_| l.borrow_mut().push("click"),
        );
        let l = Rc::clone(&log);
        reg.register_all(move |_| l.borrow_mut().push("all"));

        let click = InputEvent::Pointer(PointerEvent::new(
            PointerKind::Click(PointerButton::Primary),
            3,
            4,
        ));
        assert_eq!(reg.dispatch(&click), 2);
        assert_eq!(*log.borrow(), vec!["click", "all"]);

        let key = InputEvent::Key(KeyEvent::press(KeyCode::Enter));
        assert_eq!(reg.dispatch(&key), 1);
        assert_eq!(*log.borrow(), vec!["click", "all", "all"]);
    }

    #[test]
    fn unregister_removes_only_that_handler() {
        let hits = Rc::new(RefCell::new(0));
        let mut reg: InputRegistry<u32> = InputRegistry::new();
        let h = Rc::clone(&hits);
        let a = reg.register_all(move |_| *h.borrow_mut() += 1);
        let h = Rc::clone(&hits);
        reg.register_all(move |_| *h.borrow_mut() += 10);

        assert!(reg.unregister(a));
        assert!(!reg.unregister(a));
        assert_eq!(reg.len(), 1);
        reg.dispatch(&7);
        assert_eq!(*hits.borrow(), 10);
    }

    #[test]
    fn pointer_payload_is_grid_space() {
        let ev = PointerEvent::new(PointerKind::Hover, 12, 7);
        assert_eq!(ev.grid, GridPoint::new(12, 7));
        assert!(!ev.is_click());
    }

    #[test]
    fn key_helpers() {
        let k = KeyEvent::press(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL);
        assert!(k.is_char('q'));
        assert!(k.pressed);
        assert!(k.modifiers.contains(Modifiers::CTRL));
        assert!(!KeyEvent::release(KeyCode::Up).pressed);
    }
}
