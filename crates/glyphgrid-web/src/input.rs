#![forbid(unsafe_code)]

//! DOM input → grid events.
//!
//! The host page forwards `KeyboardEvent.key` strings and pointer offsets in
//! canvas pixels; these helpers turn them into the events an
//! [`InputRegistry`](glyphgrid_core::event::InputRegistry) dispatches.

use glyphgrid_core::event::{KeyCode, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerKind};
use glyphgrid_core::geometry::GridGeometry;

/// Modifier bitset from the DOM event flags.
#[must_use]
pub fn modifiers(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Modifiers {
    let mut mods = Modifiers::NONE;
    mods.set(Modifiers::SHIFT, shift);
    mods.set(Modifiers::ALT, alt);
    mods.set(Modifiers::CTRL, ctrl);
    mods.set(Modifiers::SUPER, meta);
    mods
}

/// Normalise a DOM `key` string. `None` for keys with no grid meaning
/// (bare modifiers, media keys, ...).
#[must_use]
pub fn key_code(dom_key: &str) -> Option<KeyCode> {
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return Some(if first == ' ' { KeyCode::Space } else { KeyCode::Char(first) });
    }

    Some(match dom_key {
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Spacebar" => KeyCode::Space,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => KeyCode::F(parse_function_key(dom_key)?),
    })
}

fn parse_function_key(s: &str) -> Option<u8> {
    let rest = s.strip_prefix('F')?;
    rest.parse::<u8>().ok().filter(|n| (1..=24).contains(n))
}

/// Key event from a `keydown` (`pressed = true`) or `keyup`.
#[must_use]
pub fn key_event(dom_key: &str, pressed: bool, mods: Modifiers) -> Option<KeyEvent> {
    let key = key_code(dom_key)?;
    Some(KeyEvent {
        key,
        modifiers: mods,
        pressed,
    })
}

/// DOM `MouseEvent.button` → pointer button.
#[must_use]
pub fn pointer_button(button: i16) -> Option<PointerButton> {
    match button {
        0 => Some(PointerButton::Primary),
        1 => Some(PointerButton::Middle),
        2 => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Pointer event at canvas pixel offset `(px, py)`.
///
/// `None` when the position is outside the grid; hosts report that as
/// [`PointerKind::Leave`] themselves.
#[must_use]
pub fn pointer_event(
    geometry: &GridGeometry,
    kind: PointerKind,
    px: f64,
    py: f64,
    mods: Modifiers,
) -> Option<PointerEvent> {
    let grid = geometry.pixel_to_grid(px, py)?;
    Some(PointerEvent {
        kind,
        grid,
        modifiers: mods,
    })
}

/// Tracks the cell under the pointer to turn raw moves into `Hover` events
/// only when the cell changes, and `Down`/`Up` pairs on one cell into
/// `Click`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    hovered: Option<(i32, i32)>,
    pressed: Option<(PointerButton, i32, i32)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved to `(px, py)`.
    pub fn moved(&mut self, geometry: &GridGeometry, px: f64, py: f64, mods: Modifiers) -> Option<PointerEvent> {
        match pointer_event(geometry, PointerKind::Hover, px, py, mods) {
            Some(ev) => {
                let cell = (ev.grid.x, ev.grid.y);
                (self.hovered.replace(cell) != Some(cell)).then_some(ev)
            }
            None => self.left(),
        }
    }

    /// Pointer left the canvas.
    pub fn left(&mut self) -> Option<PointerEvent> {
        let (x, y) = self.hovered.take()?;
        self.pressed = None;
        Some(PointerEvent::new(PointerKind::Leave, x, y))
    }

    /// Button pressed at `(px, py)`.
    pub fn down(
        &mut self,
        geometry: &GridGeometry,
        button: PointerButton,
        px: f64,
        py: f64,
        mods: Modifiers,
    ) -> Option<PointerEvent> {
        let ev = pointer_event(geometry, PointerKind::Down(button), px, py, mods)?;
        self.pressed = Some((button, ev.grid.x, ev.grid.y));
        Some(ev)
    }

    /// Button released at `(px, py)`. Returns the `Up` event and, when it
    /// lands on the cell that was pressed, a `Click`.
    pub fn up(
        &mut self,
        geometry: &GridGeometry,
        button: PointerButton,
        px: f64,
        py: f64,
        mods: Modifiers,
    ) -> (Option<PointerEvent>, Option<PointerEvent>) {
        let pressed = self.pressed.take();
        let Some(up) = pointer_event(geometry, PointerKind::Up(button), px, py, mods) else {
            return (None, None);
        };
        let click = match pressed {
            Some((b, x, y)) if b == button && (x, y) == (up.grid.x, up.grid.y) => Some(PointerEvent {
                kind: PointerKind::Click(button),
                ..up
            }),
            _ => None,
        };
        (Some(up), click)
    }
}
