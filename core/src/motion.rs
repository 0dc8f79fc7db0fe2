//! Fixed-speed interpolation toward a waypoint.
//!
//! Arrival is exact: a step that would reach or pass the target lands on it,
//! so callers can compare positions for equality instead of using a
//! tolerance.
//!
//! [`advance_along`] derives the position on a straight leg from the number
//! of ticks spent on it, so rounding does not build up across ticks and a leg
//! of length `D` walked at speed `S` ends after exactly `ceil(D / S)` ticks.
//! [`step_toward`] takes one step from the current position and suits
//! targets that move between ticks.

use glam::Vec2;

/// Outcome of a single interpolation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionStep {
    /// Position after the step.
    pub position: Vec2,
    /// Unit vector from the starting position toward the target, or `None`
    /// when the two coincide.
    pub direction: Option<Vec2>,
    /// Whether `position` equals the target exactly.
    pub arrived: bool,
}

/// Moves `current` toward `target` by at most `speed` pixels.
///
/// When the remaining distance does not exceed `speed` the step snaps onto
/// `target`. A non-positive `speed` leaves `current` untouched.
#[must_use]
pub fn step_toward(current: Vec2, target: Vec2, speed: f32) -> MotionStep {
    let delta = target - current;
    let distance = delta.length();

    if distance == 0.0 {
        return MotionStep {
            position: target,
            direction: None,
            arrived: true,
        };
    }

    let direction = delta / distance;
    if speed <= 0.0 {
        return MotionStep {
            position: current,
            direction: Some(direction),
            arrived: false,
        };
    }

    if distance <= speed {
        return MotionStep {
            position: target,
            direction: Some(direction),
            arrived: true,
        };
    }

    let position = current + direction * speed;
    MotionStep {
        position,
        direction: Some(direction),
        arrived: position == target,
    }
}

/// Position after `ticks` ticks on the straight leg from `origin` to
/// `target`, walking `speed` pixels per tick.
///
/// The leg ends on the first tick whose travelled distance reaches the leg
/// length; from then on the position is `target`. A non-positive `speed`
/// never leaves `origin`.
#[must_use]
pub fn advance_along(origin: Vec2, target: Vec2, speed: f32, ticks: u32) -> MotionStep {
    let delta = target - origin;
    let distance = delta.length();

    if distance == 0.0 {
        return MotionStep {
            position: target,
            direction: None,
            arrived: true,
        };
    }

    let direction = delta / distance;
    if speed <= 0.0 {
        return MotionStep {
            position: origin,
            direction: Some(direction),
            arrived: false,
        };
    }

    let travelled = speed * ticks as f32;
    if travelled >= distance {
        return MotionStep {
            position: target,
            direction: Some(direction),
            arrived: true,
        };
    }

    MotionStep {
        position: origin + direction * travelled,
        direction: Some(direction),
        arrived: false,
    }
}
