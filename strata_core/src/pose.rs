// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The card's animated pose.

use kurbo::Vec2;

/// Rotation and translation of the card surface.
///
/// Rotations are in degrees around the surface's own axes; the x-axis tilt is
/// driven by the vertical touch component and the y-axis tilt by the
/// horizontal one. Translation follows the finger in device pixels.
/// Elevation is tracked separately by the engine because it animates on its
/// own lifecycle (press/release) rather than per touch position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardPose {
    /// Rotation around the horizontal axis, degrees.
    pub rotation_x: f64,
    /// Rotation around the vertical axis, degrees.
    pub rotation_y: f64,
    /// Offset from the resting position, device pixels.
    pub translation: Vec2,
}

impl CardPose {
    /// The resting pose.
    pub const ZERO: Self = Self {
        rotation_x: 0.0,
        rotation_y: 0.0,
        translation: Vec2::ZERO,
    };

    /// Is every component of this pose [finite](f64::is_finite)?
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rotation_x.is_finite()
            && self.rotation_y.is_finite()
            && self.translation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_resting() {
        assert_eq!(CardPose::default(), CardPose::ZERO);
    }

    #[test]
    fn finite_check_covers_all_fields() {
        assert!(CardPose::ZERO.is_finite());
        let bad = CardPose {
            rotation_y: f64::NAN,
            ..CardPose::ZERO
        };
        assert!(!bad.is_finite());
        let bad = CardPose {
            translation: Vec2::new(f64::INFINITY, 0.0),
            ..CardPose::ZERO
        };
        assert!(!bad.is_finite());
    }
}
