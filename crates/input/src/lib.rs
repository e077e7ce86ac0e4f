//! Input handling for keyboard and on-screen touch pads.

use std::collections::HashSet;

/// Pollable key state. The vehicle only ever asks "is this held right now".
pub trait KeyQuery {
    fn is_pressed(&self, key: KeyCode) -> bool;
}

/// On-screen arrow buttons for touch devices. Each pad drives the matching arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPad {
    Up,
    Down,
    Left,
    Right,
}

impl TouchPad {
    /// The arrow key this pad stands in for.
    pub fn key(self) -> KeyCode {
        match self {
            TouchPad::Up => KeyCode::ArrowUp,
            TouchPad::Down => KeyCode::ArrowDown,
            TouchPad::Left => KeyCode::ArrowLeft,
            TouchPad::Right => KeyCode::ArrowRight,
        }
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Touch pads currently held (touchstart/mousedown until touchend/mouseup/mouseleave).
    pads_held: HashSet<TouchPad>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Press or release an on-screen pad.
    pub fn set_pad(&mut self, pad: TouchPad, pressed: bool) {
        if pressed {
            self.pads_held.insert(pad);
        } else {
            self.pads_held.remove(&pad);
        }
    }

    /// Release everything (focus lost, scene switch).
    pub fn clear(&mut self) {
        self.keys_held.clear();
        self.pads_held.clear();
    }

    /// Check if a key is currently held, by keyboard or by its touch pad.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key) || self.pads_held.iter().any(|pad| pad.key() == key)
    }

    /// Current drive controls, with WASD and arrow keys as aliases.
    pub fn drive_controls(&self) -> DriveControls {
        DriveControls::read(self)
    }
}

impl KeyQuery for InputState {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.is_key_held(key)
    }
}

/// Drive intent read from a [`KeyQuery`] for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveControls {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
}

impl DriveControls {
    pub fn read(input: &(impl KeyQuery + ?Sized)) -> Self {
        let held = |a: KeyCode, b: KeyCode| input.is_pressed(a) || input.is_pressed(b);
        Self {
            forward: held(KeyCode::KeyW, KeyCode::ArrowUp),
            reverse: held(KeyCode::KeyS, KeyCode::ArrowDown),
            left: held(KeyCode::KeyA, KeyCode::ArrowLeft),
            right: held(KeyCode::KeyD, KeyCode::ArrowRight),
        }
    }
}

/// Parse a DOM-style key code name ("KeyW", "ArrowUp", ...) used by scripted sessions.
pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    let key = match name {
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Space" => KeyCode::Space,
        "Escape" => KeyCode::Escape,
        _ => return None,
    };
    Some(key)
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
