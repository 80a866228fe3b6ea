//! Platform abstraction layer
//!
//! The simulation never talks to a device. It sees:
//! - a `ViewportProvider` consulted at session start
//! - `Command`s mapped from whatever input the host captured

use crate::sim::Viewport;

/// Source of viewport dimensions
pub trait ViewportProvider {
    fn dimensions(&self) -> Viewport;
}

impl ViewportProvider for Viewport {
    fn dimensions(&self) -> Viewport {
        *self
    }
}

/// Discrete commands the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Trigger impulse
    Flap,
    TogglePause,
    /// Start or restart; ignored while a session is active
    Start,
}

/// Raw host input, device-agnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent<'a> {
    /// Keyboard event `code` (e.g. "Space", "KeyP")
    Key(&'a str),
    PointerDown,
    Touch,
    StartButton,
    PauseButton,
}

/// Map a host event to a game command
pub fn command_for(event: InputEvent<'_>) -> Option<Command> {
    match event {
        InputEvent::Key("Space") => Some(Command::Flap),
        InputEvent::Key("KeyP") => Some(Command::TogglePause),
        InputEvent::Key("KeyR") => Some(Command::Start),
        InputEvent::Key(_) => None,
        InputEvent::PointerDown | InputEvent::Touch => Some(Command::Flap),
        InputEvent::StartButton => Some(Command::Start),
        InputEvent::PauseButton => Some(Command::TogglePause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(command_for(InputEvent::Key("Space")), Some(Command::Flap));
        assert_eq!(command_for(InputEvent::Key("KeyP")), Some(Command::TogglePause));
        assert_eq!(command_for(InputEvent::Key("KeyR")), Some(Command::Start));
        assert_eq!(command_for(InputEvent::Key("KeyQ")), None);
        assert_eq!(command_for(InputEvent::Touch), Some(Command::Flap));
    }

    #[test]
    fn test_viewport_is_its_own_provider() {
        let v = Viewport::new(320.0, 480.0);
        assert_eq!(v.dimensions(), v);
    }
}
