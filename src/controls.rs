//! Player control input.
//!
//! The simulation reads a single [`ControlState`] resource every tick.  Input
//! sources (keyboard here, an autopilot in the headless binary, tests) only
//! ever write that resource, so the race logic never touches devices.
//!
//! | Key | Effect |
//! |-----|--------|
//! | W / Up | accelerate |
//! | S / Down | brake / reverse |
//! | A / Left | steer −1 |
//! | D / Right | steer +1 |
//! | Shift | boost |

use bevy::prelude::*;

/// Per-tick driver input.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlState {
    /// Throttle in `[0, 1]`.
    pub accelerate: f32,
    /// Brake in `[0, 1]`; held at rest it reverses.
    pub brake: f32,
    /// Steering in `[-1, 1]`.
    pub steer: f32,
    pub boost: bool,
}

impl ControlState {
    /// Clamp every axis into its range; non-finite values read as released.
    pub fn sanitized(&self) -> Self {
        Self {
            accelerate: finite_or_zero(self.accelerate).clamp(0.0, 1.0),
            brake: finite_or_zero(self.brake).clamp(0.0, 1.0),
            steer: finite_or_zero(self.steer).clamp(-1.0, 1.0),
            boost: self.boost,
        }
    }
}

#[inline]
fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Map the currently held keys onto a [`ControlState`].
pub fn controls_from_keys(keys: &ButtonInput<KeyCode>) -> ControlState {
    let held = |a: KeyCode, b: KeyCode| keys.pressed(a) || keys.pressed(b);
    let axis = |on: bool| if on { 1.0 } else { 0.0 };

    let left = held(KeyCode::KeyA, KeyCode::ArrowLeft);
    let right = held(KeyCode::KeyD, KeyCode::ArrowRight);

    ControlState {
        accelerate: axis(held(KeyCode::KeyW, KeyCode::ArrowUp)),
        brake: axis(held(KeyCode::KeyS, KeyCode::ArrowDown)),
        steer: axis(right) - axis(left),
        boost: held(KeyCode::ShiftLeft, KeyCode::ShiftRight),
    }
}

/// Overwrite [`ControlState`] from the keyboard each frame.
///
/// Only scheduled when an input plugin provides `ButtonInput<KeyCode>`.
pub fn keyboard_to_controls_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut controls: ResMut<ControlState>,
) {
    *controls = controls_from_keys(&keys);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_and_drops_nan() {
        let wild = ControlState {
            accelerate: 3.0,
            brake: f32::NAN,
            steer: -7.0,
            boost: true,
        };
        let clean = wild.sanitized();
        assert_eq!(clean.accelerate, 1.0);
        assert_eq!(clean.brake, 0.0);
        assert_eq!(clean.steer, -1.0);
        assert!(clean.boost);
    }

    #[test]
    fn no_keys_means_no_input() {
        let keys = ButtonInput::<KeyCode>::default();
        assert_eq!(controls_from_keys(&keys), ControlState::default());
    }

    #[test]
    fn arrows_and_letters_map_to_the_same_axes() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ArrowUp);
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::ShiftLeft);
        let controls = controls_from_keys(&keys);
        assert_eq!(controls.accelerate, 1.0);
        assert_eq!(controls.steer, -1.0);
        assert!(controls.boost);
    }

    #[test]
    fn opposite_steering_keys_cancel() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::ArrowRight);
        assert_eq!(controls_from_keys(&keys).steer, 0.0);
    }

    #[test]
    fn keyboard_system_overwrites_previous_state() {
        let mut app = App::new();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyS);
        app.insert_resource(keys);
        app.insert_resource(ControlState {
            accelerate: 1.0,
            ..Default::default()
        });
        app.add_systems(Update, keyboard_to_controls_system);
        app.update();

        let controls = app.world().resource::<ControlState>();
        assert_eq!(controls.accelerate, 0.0);
        assert_eq!(controls.brake, 1.0);
    }
}
