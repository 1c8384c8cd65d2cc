use glam::{UVec2, Vec2};
use tilemaze_common::Direction;

/// Symbolic key codes the game cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Left,
    Down,
    Right,
    Escape,
    /// Any key without a binding.
    Other,
}

/// A discrete event from the event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a pixel position (origin top-left).
    PointerMoved { x: f32, y: f32 },
    ButtonDown,
    KeyDown(Key),
    /// Window close or another explicit quit signal.
    Quit,
}

/// What the game loop should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Try to move the player one tile.
    Move(Direction),
    /// Pointer position in [-1,1]x[-1,1], y up. Tracked but not yet consumed.
    Pointer(Vec2),
    /// Set the quit flag.
    Quit,
    /// Nothing bound to this input.
    Noop,
}

/// Map a pixel position to normalized device coordinates, sampling at the
/// pixel centre and flipping y so +1 is the top edge.
pub fn normalize_pointer(x: f32, y: f32, surface: UVec2) -> Vec2 {
    let size = surface.max(UVec2::ONE).as_vec2();
    Vec2::new(
        (x + 0.5) / size.x * 2.0 - 1.0,
        (y + 0.5) / size.y * -2.0 + 1.0,
    )
}

/// Translate one event into an action. `surface` is the drawable size in
/// pixels, used to normalize pointer positions.
pub fn map_event(event: InputEvent, surface: UVec2) -> Action {
    match event {
        InputEvent::PointerMoved { x, y } => Action::Pointer(normalize_pointer(x, y, surface)),
        InputEvent::ButtonDown => Action::Noop,
        InputEvent::KeyDown(key) => match key {
            Key::Up => Action::Move(Direction::Up),
            Key::Left => Action::Move(Direction::Left),
            Key::Down => Action::Move(Direction::Down),
            Key::Right => Action::Move(Direction::Right),
            Key::Escape => Action::Quit,
            Key::Other => {
                tracing::trace!("unbound key");
                Action::Noop
            }
        },
        InputEvent::Quit => Action::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: UVec2 = UVec2::new(480, 480);

    #[test]
    fn arrows_map_to_moves() {
        let cases = [
            (Key::Up, Direction::Up),
            (Key::Left, Direction::Left),
            (Key::Down, Direction::Down),
            (Key::Right, Direction::Right),
        ];
        for (key, dir) in cases {
            assert_eq!(map_event(InputEvent::KeyDown(key), SURFACE), Action::Move(dir));
        }
    }

    #[test]
    fn escape_and_quit_signal_quit() {
        assert_eq!(map_event(InputEvent::KeyDown(Key::Escape), SURFACE), Action::Quit);
        assert_eq!(map_event(InputEvent::Quit, SURFACE), Action::Quit);
    }

    #[test]
    fn unbound_inputs_are_noops() {
        assert_eq!(map_event(InputEvent::KeyDown(Key::Other), SURFACE), Action::Noop);
        assert_eq!(map_event(InputEvent::ButtonDown, SURFACE), Action::Noop);
    }

    #[test]
    fn pointer_corners_normalize() {
        let top_left = normalize_pointer(0.0, 0.0, SURFACE);
        assert!((top_left.x - (0.5 / 480.0 * 2.0 - 1.0)).abs() < 1e-6);
        assert!((top_left.y - (1.0 - 0.5 / 480.0 * 2.0)).abs() < 1e-6);

        let bottom_right = normalize_pointer(479.0, 479.0, SURFACE);
        assert!(bottom_right.x > 0.99 && bottom_right.x < 1.0);
        assert!(bottom_right.y < -0.99 && bottom_right.y > -1.0);
    }

    #[test]
    fn pointer_event_carries_normalized_position() {
        let action = map_event(InputEvent::PointerMoved { x: 239.5, y: 239.5 }, SURFACE);
        match action {
            Action::Pointer(p) => assert!(p.abs_diff_eq(Vec2::ZERO, 1e-6)),
            other => panic!("expected pointer action, got {other:?}"),
        }
    }
}
