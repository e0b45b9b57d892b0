// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parallax card engine.
//!
//! [`ParallaxCard`] owns the gesture state machine and the layer stack, and
//! turns [`TouchSample`]s into commands on the host's
//! [`AnimationDriver`](crate::host::AnimationDriver) and
//! [`LayoutHost`](crate::host::LayoutHost):
//!
//! - **Down** — the card's elevation animates up, its pose animates toward
//!   the touch, and every layer's translation animates toward its share of
//!   the movement distance, all with decelerating easing.
//! - **Move** — if the down animation is still in flight it is cancelled
//!   (pose *and* layer translations; a half-finished animation racing direct
//!   assignment would fight over the same properties), and from then on the
//!   pose and layer translations track the finger directly.
//! - **Up / Cancel** — elevation animates back down and everything eases
//!   back to rest.
//!
//! Per-layer motion is scaled by [`ParallaxConfig::movement_factor`]: the
//! frontmost layer moves the most, the backmost little or not at all, which
//! is what sells the depth illusion.
//!
//! Margins are the second half of the illusion. A layer that translates by
//! up to its movement factor would expose its edges at the extremes, so each
//! padded layer carries a uniform negative margin of the same magnitude,
//! pre-expanding its bounds. The margin pass runs eagerly on every
//! configuration or stack mutation.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::density::Density;
use crate::ease::Easing;
use crate::error::StructuralViolation;
use crate::host::{
    AnimProperty, AnimTarget, AnimateCommand, AnimationDriver, AnimationHandle, LayoutHost,
};
use crate::layer::{LayerId, LayerSpec, LayerStack};
use crate::pose::CardPose;
use crate::time::Duration;
use crate::touch::{self, TouchMode, TouchPhase, TouchSample};

/// Max angle, in degrees, that the card can rotate while being touched.
pub const MAX_ROTATION_DEG: f64 = 5.0;

/// Max distance, in dips, that the card follows the finger.
pub const CARD_MOVEMENT_DIP: f64 = 15.0;

/// Default parallax movement distance, in dips.
pub const DEFAULT_PARALLAX_DISTANCE_DIP: f64 = 5.0;

/// Resting card elevation, in dips.
pub const MIN_ELEVATION_DIP: f64 = 2.0;

/// Pressed card elevation, in dips.
pub const MAX_ELEVATION_DIP: f64 = 8.0;

/// Card corner radius, in dips.
pub const CORNER_RADIUS_DIP: f64 = 4.0;

/// Perspective camera distance, in dips.
pub const CAMERA_DISTANCE_DIP: f64 = 6000.0;

/// What kind of surface the card was mounted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// The designated non-clipping parallax surface.
    ParallaxSurface,
    /// Anything else.
    Other,
}

/// How the host mounted the card in its view tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MountContext {
    /// The card's direct parent surface.
    pub parent: SurfaceKind,
}

/// A type tag for one host-side child of the card, in z-order.
///
/// Hosts that inflate children declaratively hand the engine this tagged
/// list once via [`ParallaxCard::adopt_children`]; everything after that
/// goes through [`ParallaxCard::add_layer`], so the registry never has to
/// filter a heterogeneous child list at read time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildTag {
    /// A parallax layer.
    Layer(LayerSpec),
    /// Any other child type — a structural error.
    Foreign,
}

/// Device-pixel tuning constants, resolved from a [`Density`] once at
/// construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTuning {
    /// Max rotation while touched, degrees.
    pub max_rotation_deg: f64,
    /// Max card translation following the finger, device pixels.
    pub card_movement_distance: f64,
    /// Default parallax movement distance, device pixels.
    pub default_parallax_distance: f64,
    /// Resting elevation, device pixels.
    pub min_elevation: f64,
    /// Pressed elevation, device pixels.
    pub max_elevation: f64,
    /// Corner radius, device pixels.
    pub corner_radius: f64,
    /// Perspective camera distance, device pixels.
    pub camera_distance: f64,
    /// Length of the pose animations on Down and Up/Cancel.
    pub pose_duration: Duration,
    /// Length of the elevation animations.
    pub elevation_duration: Duration,
}

impl CardTuning {
    /// Resolves the dip-denominated constants against a display density.
    #[must_use]
    pub fn from_density(density: Density) -> Self {
        Self {
            max_rotation_deg: MAX_ROTATION_DEG,
            card_movement_distance: density.dip(CARD_MOVEMENT_DIP),
            default_parallax_distance: density.dip(DEFAULT_PARALLAX_DISTANCE_DIP),
            min_elevation: density.dip(MIN_ELEVATION_DIP),
            max_elevation: density.dip(MAX_ELEVATION_DIP),
            corner_radius: density.dip(CORNER_RADIUS_DIP),
            camera_distance: density.dip(CAMERA_DISTANCE_DIP),
            pose_duration: Duration::from_millis(300),
            elevation_duration: Duration::from_millis(300),
        }
    }
}

/// One-shot surface setup handed to the host on [`ParallaxCard::attach`].
///
/// The engine manages elevation, padding, and clipping policy internally;
/// rather than exposing mutators that a host could fight over, it hands the
/// host this snapshot once and keeps the only write path to those fields for
/// itself (elevation moves exclusively through driver commands).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardChrome {
    /// Corner radius, device pixels.
    pub corner_radius: f64,
    /// Perspective camera distance, device pixels.
    pub camera_distance: f64,
    /// Elevation to apply before the first gesture, device pixels.
    pub initial_elevation: f64,
    /// Upper bound the host should reserve shadow space for, device pixels.
    pub max_elevation: f64,
}

/// Tunable parallax behavior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxConfig {
    /// Maximum translation of the frontmost qualifying layer, device pixels.
    pub movement_distance: f64,
    /// Sign convention for the rotation response.
    pub touch_mode: TouchMode,
    /// Whether the frontmost layer gets the full movement distance.
    ///
    /// When set, the denominator in the factor interpolation is the layer
    /// count, so even the backmost layer keeps a small factor. When unset it
    /// is `count - 1`, pinning the backmost layer motionless.
    pub first_layer_applies_parallax: bool,
}

impl Default for ParallaxConfig {
    /// Pressed mode, flag unset, and the dip-denominated default distance
    /// taken at baseline density. [`ParallaxCard::new`] replaces the distance
    /// with the density-resolved value.
    fn default() -> Self {
        Self {
            movement_distance: DEFAULT_PARALLAX_DISTANCE_DIP,
            touch_mode: TouchMode::Pressed,
            first_layer_applies_parallax: false,
        }
    }
}

impl ParallaxConfig {
    /// Returns the movement factor for the layer at z-order `index` out of
    /// `layer_count` layers.
    ///
    /// The factor interpolates linearly from the full movement distance at
    /// the front of the stack down to (or toward) zero at the back. With a
    /// degenerate denominator — a single layer without
    /// [`first_layer_applies_parallax`](Self::first_layer_applies_parallax),
    /// or an empty stack — the factor is zero: the lone layer is the
    /// backmost, and the backmost does not move.
    ///
    /// ```
    /// use strata_core::card::ParallaxConfig;
    ///
    /// let config = ParallaxConfig {
    ///     movement_distance: 10.0,
    ///     ..Default::default()
    /// };
    /// assert_eq!(config.movement_factor(0, 3), 10.0);
    /// assert_eq!(config.movement_factor(1, 3), 5.0);
    /// assert_eq!(config.movement_factor(2, 3), 0.0);
    /// ```
    #[must_use]
    pub fn movement_factor(&self, index: usize, layer_count: usize) -> f64 {
        let denom =
            layer_count as f64 - if self.first_layer_applies_parallax { 0.0 } else { 1.0 };
        if denom <= 0.0 {
            return 0.0;
        }
        self.movement_distance * (1.0 - index as f64 / denom)
    }
}

/// The parallax card engine.
///
/// Single-threaded and event-driven: touch samples, animation completions,
/// and configuration changes are all expected on the same thread, one
/// gesture at a time. See the [module docs](self) for the phase table.
#[derive(Debug)]
pub struct ParallaxCard {
    tuning: CardTuning,
    config: ParallaxConfig,
    layers: LayerStack,
    attached: bool,

    // -- Gesture state --
    /// Last commanded pose; the `from` side of the next pose animation.
    pose: CardPose,
    /// Whether the Down-phase animation group may still be in flight.
    pending_down: bool,
    pending_pose_handles: Vec<AnimationHandle>,
    pending_layer_handles: Vec<AnimationHandle>,
}

impl ParallaxCard {
    /// Creates a card engine for a display with the given density.
    #[must_use]
    pub fn new(density: Density) -> Self {
        let tuning = CardTuning::from_density(density);
        let config = ParallaxConfig {
            movement_distance: tuning.default_parallax_distance,
            ..ParallaxConfig::default()
        };
        Self {
            tuning,
            config,
            layers: LayerStack::new(),
            attached: false,
            pose: CardPose::ZERO,
            pending_down: false,
            pending_pose_handles: Vec::new(),
            pending_layer_handles: Vec::new(),
        }
    }

    /// The card's resolved tuning constants.
    #[must_use]
    pub fn tuning(&self) -> &CardTuning {
        &self.tuning
    }

    /// Read access to the layer stack.
    #[must_use]
    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// The last pose the engine commanded (the animation target, not the
    /// host's in-flight interpolated value).
    #[must_use]
    pub fn pose(&self) -> CardPose {
        self.pose
    }

    /// Whether [`attach`](Self::attach) has succeeded.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // -- Structure --

    /// Validates the mount point and returns the card's surface setup.
    ///
    /// # Errors
    ///
    /// [`StructuralViolation::WrongContainer`] if the parent is not the
    /// designated parallax surface. The parallax surface never clips its
    /// children, which the negative layer margins depend on.
    pub fn attach(&mut self, ctx: MountContext) -> Result<CardChrome, StructuralViolation> {
        match ctx.parent {
            SurfaceKind::ParallaxSurface => {
                self.attached = true;
                Ok(self.chrome())
            }
            found => Err(StructuralViolation::WrongContainer { found }),
        }
    }

    /// The surface setup that [`attach`](Self::attach) hands out.
    #[must_use]
    pub fn chrome(&self) -> CardChrome {
        CardChrome {
            corner_radius: self.tuning.corner_radius,
            camera_distance: self.tuning.camera_distance,
            initial_elevation: self.tuning.min_elevation,
            max_elevation: self.tuning.max_elevation,
        }
    }

    /// Registers the host's pre-built child list, in z-order.
    ///
    /// All-or-nothing: the list is validated before any layer is registered,
    /// so a foreign child leaves the engine untouched.
    ///
    /// # Errors
    ///
    /// [`StructuralViolation::ForeignChild`] for the first non-layer tag.
    pub fn adopt_children(
        &mut self,
        children: &[ChildTag],
        layout: &mut dyn LayoutHost,
    ) -> Result<Vec<LayerId>, StructuralViolation> {
        for (index, tag) in children.iter().enumerate() {
            if matches!(tag, ChildTag::Foreign) {
                return Err(StructuralViolation::ForeignChild { index });
            }
        }

        let mut ids = Vec::with_capacity(children.len());
        for tag in children {
            let ChildTag::Layer(spec) = tag else {
                unreachable!("foreign tags were rejected above");
            };
            ids.push(self.layers.push(*spec));
        }
        self.apply_margins(layout);
        Ok(ids)
    }

    /// Adds a layer at the back of the stack.
    ///
    /// Every layer's movement factor depends on the stack size, so this
    /// recomputes margins for the whole stack.
    pub fn add_layer(&mut self, spec: LayerSpec, layout: &mut dyn LayoutHost) -> LayerId {
        let id = self.layers.push(spec);
        self.apply_margins(layout);
        id
    }

    /// Removes a layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_layer(&mut self, id: LayerId, layout: &mut dyn LayoutHost) {
        self.layers.remove(id);
        self.apply_margins(layout);
    }

    // -- Configuration surface --

    /// Changes the parallax movement distance for every layer.
    ///
    /// This leads to a new margin computation for all the layers.
    pub fn set_movement_distance(&mut self, px: f64, layout: &mut dyn LayoutHost) {
        self.config.movement_distance = px;
        self.apply_margins(layout);
    }

    /// The configured parallax movement distance, device pixels.
    #[must_use]
    pub fn movement_distance(&self) -> f64 {
        self.config.movement_distance
    }

    /// Changes whether the frontmost layer receives the full movement
    /// distance, recomputing all margins.
    pub fn set_first_layer_applies_parallax(&mut self, applies: bool, layout: &mut dyn LayoutHost) {
        self.config.first_layer_applies_parallax = applies;
        self.apply_margins(layout);
    }

    /// Whether the frontmost layer receives the full movement distance.
    #[must_use]
    pub fn first_layer_applies_parallax(&self) -> bool {
        self.config.first_layer_applies_parallax
    }

    /// Changes the rotation sign convention.
    ///
    /// Margins do not depend on the mode, but configuration mutations all
    /// run the same eager margin pass; this one diffs to nothing.
    pub fn set_touch_mode(&mut self, mode: TouchMode, layout: &mut dyn LayoutHost) {
        self.config.touch_mode = mode;
        self.apply_margins(layout);
    }

    /// The current rotation sign convention.
    #[must_use]
    pub fn touch_mode(&self) -> TouchMode {
        self.config.touch_mode
    }

    // -- Gesture input --

    /// Feeds one touch sample through the state machine.
    ///
    /// `size` is the card's current laid-out size; an unmeasured (zero) size
    /// degrades to a centered touch rather than failing.
    pub fn on_touch(&mut self, sample: TouchSample, size: Size, driver: &mut dyn AnimationDriver) {
        let raw = touch::rotation_point(sample.position, size);
        let adjusted = touch::mode_adjust(raw, self.config.touch_mode);

        match sample.phase {
            TouchPhase::Down => self.on_down(raw, adjusted, driver),
            TouchPhase::Move => self.on_move(raw, adjusted, driver),
            TouchPhase::Up | TouchPhase::Cancel => self.on_release(driver),
        }
    }

    /// Reports that a driver animation ran to completion.
    ///
    /// Once the whole Down-phase pose group has completed, a later Move has
    /// nothing left to cancel and skips straight to direct assignment.
    /// Unknown handles (release animations, cancelled or replaced ones) are
    /// ignored.
    pub fn on_animation_complete(&mut self, handle: AnimationHandle) {
        if let Some(i) = self.pending_pose_handles.iter().position(|&h| h == handle) {
            self.pending_pose_handles.swap_remove(i);
            if self.pending_pose_handles.is_empty() && self.pending_layer_handles.is_empty() {
                self.pending_down = false;
            }
        } else if let Some(i) = self.pending_layer_handles.iter().position(|&h| h == handle) {
            self.pending_layer_handles.swap_remove(i);
            if self.pending_pose_handles.is_empty() && self.pending_layer_handles.is_empty() {
                self.pending_down = false;
            }
        }
    }

    // -- Phase handlers --

    fn on_down(&mut self, raw: Vec2, adjusted: Vec2, driver: &mut dyn AnimationDriver) {
        // Elevation rises on its own track; Move does not cancel it.
        let _ = driver.animate(&AnimateCommand {
            target: AnimTarget::Card,
            property: AnimProperty::Elevation,
            from: self.tuning.min_elevation,
            to: self.tuning.max_elevation,
            duration: self.tuning.elevation_duration,
            easing: Easing::Decelerate,
        });

        let target = self.pose_for(raw, adjusted);
        let from = self.pose;

        self.pending_pose_handles.clear();
        self.pending_layer_handles.clear();
        self.pending_down = true;

        for (property, from, to) in [
            (AnimProperty::RotationY, from.rotation_y, target.rotation_y),
            (AnimProperty::RotationX, from.rotation_x, target.rotation_x),
            (
                AnimProperty::TranslationX,
                from.translation.x,
                target.translation.x,
            ),
            (
                AnimProperty::TranslationY,
                from.translation.y,
                target.translation.y,
            ),
        ] {
            let handle = driver.animate(&AnimateCommand {
                target: AnimTarget::Card,
                property,
                from,
                to,
                duration: self.tuning.pose_duration,
                easing: Easing::Decelerate,
            });
            self.pending_pose_handles.push(handle);
        }
        self.pose = target;

        let count = self.layers.len();
        let entries: Vec<(usize, LayerId)> = self.layers.z_order().collect();
        for (index, id) in entries {
            let to = raw * self.config.movement_factor(index, count);
            let from = self.layers.translation(id);
            for (property, from, to) in [
                (AnimProperty::TranslationX, from.x, to.x),
                (AnimProperty::TranslationY, from.y, to.y),
            ] {
                let handle = driver.animate(&AnimateCommand {
                    target: AnimTarget::Layer(id),
                    property,
                    from,
                    to,
                    duration: self.tuning.pose_duration,
                    easing: Easing::Decelerate,
                });
                self.pending_layer_handles.push(handle);
            }
            self.layers.set_translation(id, to);
        }
    }

    fn on_move(&mut self, raw: Vec2, adjusted: Vec2, driver: &mut dyn AnimationDriver) {
        if self.pending_down {
            // The settle-in animation is still in flight; letting it run
            // would race these direct assignments over the same properties.
            self.pending_down = false;
            for handle in self.pending_pose_handles.drain(..) {
                driver.cancel(handle);
            }
            for handle in self.pending_layer_handles.drain(..) {
                driver.cancel(handle);
            }
        }

        let target = self.pose_for(raw, adjusted);
        driver.set(AnimTarget::Card, AnimProperty::RotationY, target.rotation_y);
        driver.set(AnimTarget::Card, AnimProperty::RotationX, target.rotation_x);
        driver.set(
            AnimTarget::Card,
            AnimProperty::TranslationX,
            target.translation.x,
        );
        driver.set(
            AnimTarget::Card,
            AnimProperty::TranslationY,
            target.translation.y,
        );
        self.pose = target;

        let count = self.layers.len();
        let entries: Vec<(usize, LayerId)> = self.layers.z_order().collect();
        for (index, id) in entries {
            let to = raw * self.config.movement_factor(index, count);
            driver.set(AnimTarget::Layer(id), AnimProperty::TranslationX, to.x);
            driver.set(AnimTarget::Layer(id), AnimProperty::TranslationY, to.y);
            self.layers.set_translation(id, to);
        }
    }

    fn on_release(&mut self, driver: &mut dyn AnimationDriver) {
        let _ = driver.animate(&AnimateCommand {
            target: AnimTarget::Card,
            property: AnimProperty::Elevation,
            from: self.tuning.max_elevation,
            to: self.tuning.min_elevation,
            duration: self.tuning.elevation_duration,
            easing: Easing::Decelerate,
        });

        // The gesture is over; a stray Move arriving after this must not
        // cancel the release animations.
        self.pending_down = false;
        self.pending_pose_handles.clear();
        self.pending_layer_handles.clear();

        let from = self.pose;
        for (property, from) in [
            (AnimProperty::RotationY, from.rotation_y),
            (AnimProperty::RotationX, from.rotation_x),
            (AnimProperty::TranslationX, from.translation.x),
            (AnimProperty::TranslationY, from.translation.y),
        ] {
            let _ = driver.animate(&AnimateCommand {
                target: AnimTarget::Card,
                property,
                from,
                to: 0.0,
                duration: self.tuning.pose_duration,
                easing: Easing::Decelerate,
            });
        }
        self.pose = CardPose::ZERO;

        let entries: Vec<(usize, LayerId)> = self.layers.z_order().collect();
        for (_, id) in entries {
            let from = self.layers.translation(id);
            for (property, from) in [
                (AnimProperty::TranslationX, from.x),
                (AnimProperty::TranslationY, from.y),
            ] {
                let _ = driver.animate(&AnimateCommand {
                    target: AnimTarget::Layer(id),
                    property,
                    from,
                    to: 0.0,
                    duration: self.tuning.pose_duration,
                    easing: Easing::Decelerate,
                });
            }
            self.layers.set_translation(id, Vec2::ZERO);
        }
    }

    // -- Internal helpers --

    fn pose_for(&self, raw: Vec2, adjusted: Vec2) -> CardPose {
        CardPose {
            rotation_x: adjusted.y * self.tuning.max_rotation_deg,
            rotation_y: adjusted.x * self.tuning.max_rotation_deg,
            translation: raw * self.tuning.card_movement_distance,
        }
    }

    fn apply_margins(&mut self, layout: &mut dyn LayoutHost) {
        let config = self.config;
        let count = self.layers.len();
        let changes = self
            .layers
            .recompute_margins(|index| config.movement_factor(index, count));
        for &(id, margin) in &changes.margins {
            layout.set_uniform_margin(id, margin);
        }
        if !changes.margins.is_empty() {
            layout.request_layout();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use kurbo::Point;

    use crate::time::HostTime;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Recorded {
        Animate(AnimateCommand, AnimationHandle),
        Set(AnimTarget, AnimProperty, f64),
        Cancel(AnimationHandle),
    }

    #[derive(Debug, Default)]
    struct RecordingDriver {
        next_handle: u64,
        log: Vec<Recorded>,
    }

    impl RecordingDriver {
        fn animates(&self) -> Vec<&AnimateCommand> {
            self.log
                .iter()
                .filter_map(|r| match r {
                    Recorded::Animate(cmd, _) => Some(cmd),
                    _ => None,
                })
                .collect()
        }

        fn cancels(&self) -> Vec<AnimationHandle> {
            self.log
                .iter()
                .filter_map(|r| match r {
                    Recorded::Cancel(h) => Some(*h),
                    _ => None,
                })
                .collect()
        }

        fn sets(&self) -> Vec<(AnimTarget, AnimProperty, f64)> {
            self.log
                .iter()
                .filter_map(|r| match r {
                    Recorded::Set(t, p, v) => Some((*t, *p, *v)),
                    _ => None,
                })
                .collect()
        }

        fn find_animate(&self, target: AnimTarget, property: AnimProperty) -> &AnimateCommand {
            self.animates()
                .into_iter()
                .find(|c| c.target == target && c.property == property)
                .expect("expected an animate command for the target/property")
        }
    }

    impl AnimationDriver for RecordingDriver {
        fn animate(&mut self, cmd: &AnimateCommand) -> AnimationHandle {
            self.next_handle += 1;
            let handle = AnimationHandle(self.next_handle);
            self.log.push(Recorded::Animate(*cmd, handle));
            handle
        }

        fn set(&mut self, target: AnimTarget, property: AnimProperty, value: f64) {
            self.log.push(Recorded::Set(target, property, value));
        }

        fn cancel(&mut self, handle: AnimationHandle) {
            self.log.push(Recorded::Cancel(handle));
        }
    }

    #[derive(Debug, Default)]
    struct RecordingLayout {
        margins: Vec<(LayerId, f64)>,
        relayouts: usize,
    }

    impl LayoutHost for RecordingLayout {
        fn set_uniform_margin(&mut self, layer: LayerId, margin: f64) {
            self.margins.push((layer, margin));
        }

        fn request_layout(&mut self) {
            self.relayouts += 1;
        }
    }

    const SIZE: Size = Size::new(100.0, 100.0);

    fn sample(phase: TouchPhase, x: f64, y: f64) -> TouchSample {
        TouchSample {
            position: Point::new(x, y),
            phase,
            timestamp: HostTime(0),
        }
    }

    fn card() -> ParallaxCard {
        ParallaxCard::new(Density::BASELINE)
    }

    fn card_with_layers(count: usize) -> (ParallaxCard, Vec<LayerId>, RecordingLayout) {
        let mut card = card();
        let mut layout = RecordingLayout::default();
        let ids = (0..count)
            .map(|_| card.add_layer(LayerSpec::default(), &mut layout))
            .collect();
        (card, ids, layout)
    }

    // -- Movement factor --

    #[test]
    fn factors_interpolate_front_to_back() {
        let config = ParallaxConfig {
            movement_distance: 10.0,
            ..ParallaxConfig::default()
        };
        assert_eq!(config.movement_factor(0, 3), 10.0);
        assert_eq!(config.movement_factor(1, 3), 5.0);
        assert_eq!(config.movement_factor(2, 3), 0.0);
    }

    #[test]
    fn first_layer_flag_gives_front_layer_the_exact_distance() {
        let config = ParallaxConfig {
            movement_distance: 12.0,
            first_layer_applies_parallax: true,
            ..ParallaxConfig::default()
        };
        assert_eq!(config.movement_factor(0, 4), 12.0);
        // And the backmost layer keeps a small share.
        assert!(config.movement_factor(3, 4) > 0.0);
    }

    #[test]
    fn factors_are_monotonically_non_increasing() {
        for flag in [false, true] {
            let config = ParallaxConfig {
                movement_distance: 9.0,
                first_layer_applies_parallax: flag,
                ..ParallaxConfig::default()
            };
            for count in 1..6 {
                let mut prev = f64::INFINITY;
                for index in 0..count {
                    let f = config.movement_factor(index, count);
                    assert!(f <= prev, "factor grew at index {index} (count {count})");
                    prev = f;
                }
            }
        }
    }

    #[test]
    fn degenerate_denominator_is_clamped_to_zero_factor() {
        let config = ParallaxConfig {
            movement_distance: 10.0,
            ..ParallaxConfig::default()
        };
        // Single layer without the flag: denominator would be zero.
        assert_eq!(config.movement_factor(0, 1), 0.0);
        // Empty stack.
        assert_eq!(config.movement_factor(0, 0), 0.0);
    }

    // -- Structure --

    #[test]
    fn attach_rejects_non_parallax_surfaces() {
        let mut card = card();
        let err = card
            .attach(MountContext {
                parent: SurfaceKind::Other,
            })
            .unwrap_err();
        assert_eq!(
            err,
            StructuralViolation::WrongContainer {
                found: SurfaceKind::Other
            }
        );
        assert!(!card.is_attached());
    }

    #[test]
    fn attach_returns_density_resolved_chrome() {
        let mut card = ParallaxCard::new(Density::new(2.0));
        let chrome = card
            .attach(MountContext {
                parent: SurfaceKind::ParallaxSurface,
            })
            .unwrap();
        assert!(card.is_attached());
        assert_eq!(chrome.corner_radius, 8.0);
        assert_eq!(chrome.camera_distance, 12000.0);
        assert_eq!(chrome.initial_elevation, 4.0);
        assert_eq!(chrome.max_elevation, 16.0);
    }

    #[test]
    fn adopt_children_rejects_foreign_children_before_registering_any() {
        let mut card = card();
        let mut layout = RecordingLayout::default();
        let err = card
            .adopt_children(
                &[
                    ChildTag::Layer(LayerSpec::default()),
                    ChildTag::Foreign,
                    ChildTag::Layer(LayerSpec::default()),
                ],
                &mut layout,
            )
            .unwrap_err();
        assert_eq!(err, StructuralViolation::ForeignChild { index: 1 });
        assert!(card.layers().is_empty());
        assert!(layout.margins.is_empty());
        assert_eq!(layout.relayouts, 0);
    }

    #[test]
    fn adopt_children_registers_layers_and_applies_margins() {
        let mut card = card();
        let mut layout = RecordingLayout::default();
        card.set_movement_distance(10.0, &mut layout);
        let ids = card
            .adopt_children(
                &[
                    ChildTag::Layer(LayerSpec::default()),
                    ChildTag::Layer(LayerSpec::default()),
                    ChildTag::Layer(LayerSpec::default()),
                ],
                &mut layout,
            )
            .unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(card.layers().margin(ids[0]), -10.0);
        assert_eq!(card.layers().margin(ids[1]), -5.0);
        assert_eq!(card.layers().margin(ids[2]), 0.0);
        // One relayout for the whole batch.
        assert_eq!(layout.relayouts, 1);
    }

    // -- Margins through the configuration surface --

    #[test]
    fn movement_distance_change_recomputes_margins() {
        let (mut card, ids, mut layout) = card_with_layers(3);
        layout.margins.clear();
        layout.relayouts = 0;

        card.set_movement_distance(20.0, &mut layout);
        assert_eq!(card.movement_distance(), 20.0);
        assert_eq!(card.layers().margin(ids[0]), -20.0);
        assert_eq!(card.layers().margin(ids[1]), -10.0);
        assert_eq!(card.layers().margin(ids[2]), 0.0);
        assert_eq!(layout.relayouts, 1);
    }

    #[test]
    fn first_layer_flag_change_recomputes_margins() {
        let (mut card, ids, mut layout) = card_with_layers(2);
        card.set_movement_distance(12.0, &mut layout);
        layout.relayouts = 0;

        card.set_first_layer_applies_parallax(true, &mut layout);
        assert!(card.first_layer_applies_parallax());
        assert_eq!(card.layers().margin(ids[0]), -12.0);
        assert_eq!(card.layers().margin(ids[1]), -6.0);
        assert_eq!(layout.relayouts, 1);
    }

    #[test]
    fn touch_mode_change_diffs_to_no_layout_work() {
        let (mut card, _ids, mut layout) = card_with_layers(2);
        layout.margins.clear();
        layout.relayouts = 0;

        card.set_touch_mode(TouchMode::Lifted, &mut layout);
        assert_eq!(card.touch_mode(), TouchMode::Lifted);
        assert!(layout.margins.is_empty());
        assert_eq!(layout.relayouts, 0);
    }

    #[test]
    fn unpadded_layers_never_receive_margins() {
        let mut card = card();
        let mut layout = RecordingLayout::default();
        card.set_movement_distance(10.0, &mut layout);
        let padded = card.add_layer(LayerSpec::default(), &mut layout);
        let unpadded = card.add_layer(
            LayerSpec {
                uses_parallax_padding: false,
            },
            &mut layout,
        );
        assert_eq!(card.layers().margin(padded).abs(), 10.0);
        assert_eq!(card.layers().margin(unpadded), 0.0);
    }

    #[test]
    fn remove_layer_recomputes_surviving_margins() {
        let (mut card, ids, mut layout) = card_with_layers(3);
        card.set_movement_distance(10.0, &mut layout);

        card.remove_layer(ids[0], &mut layout);
        // Two layers remain: the old middle layer is now frontmost.
        assert_eq!(card.layers().margin(ids[1]), -10.0);
        assert_eq!(card.layers().margin(ids[2]), 0.0);
    }

    // -- Gesture state machine --

    #[test]
    fn corner_press_rotates_five_degrees_with_crossed_axes() {
        let (mut card, ids, _layout) = card_with_layers(2);
        let mut driver = RecordingDriver::default();
        let mut layout = RecordingLayout::default();
        card.set_movement_distance(10.0, &mut layout);

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);

        // Raw vector (1, 1); Pressed mode adjusts to (1, -1).
        let ry = driver.find_animate(AnimTarget::Card, AnimProperty::RotationY);
        assert_eq!(ry.to, 5.0);
        let rx = driver.find_animate(AnimTarget::Card, AnimProperty::RotationX);
        assert_eq!(rx.to, -5.0);

        // Translation follows the raw vector times the card movement
        // distance (15 px at baseline density).
        let tx = driver.find_animate(AnimTarget::Card, AnimProperty::TranslationX);
        assert_eq!(tx.to, 15.0);
        assert_eq!(tx.easing, Easing::Decelerate);

        // Elevation rises from resting to pressed.
        let elev = driver.find_animate(AnimTarget::Card, AnimProperty::Elevation);
        assert_eq!((elev.from, elev.to), (2.0, 8.0));

        // Front layer animates to its full factor, back layer stays pinned.
        let front = driver.find_animate(AnimTarget::Layer(ids[0]), AnimProperty::TranslationX);
        assert_eq!(front.to, 10.0);
        let back = driver.find_animate(AnimTarget::Layer(ids[1]), AnimProperty::TranslationX);
        assert_eq!(back.to, 0.0);
    }

    #[test]
    fn lifted_mode_mirrors_the_rotation_response() {
        let (mut card, _ids, mut layout) = card_with_layers(1);
        card.set_touch_mode(TouchMode::Lifted, &mut layout);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);

        let ry = driver.find_animate(AnimTarget::Card, AnimProperty::RotationY);
        assert_eq!(ry.to, -5.0);
        let rx = driver.find_animate(AnimTarget::Card, AnimProperty::RotationX);
        assert_eq!(rx.to, 5.0);
    }

    #[test]
    fn center_press_animates_to_neutral_pose() {
        let (mut card, _ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 50.0, 50.0), SIZE, &mut driver);

        for property in [AnimProperty::RotationX, AnimProperty::RotationY] {
            assert_eq!(driver.find_animate(AnimTarget::Card, property).to, 0.0);
        }
        assert_eq!(card.pose(), CardPose::ZERO);
    }

    #[test]
    fn move_mid_animation_cancels_the_whole_down_group() {
        let (mut card, _ids, _layout) = card_with_layers(2);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);
        card.on_touch(sample(TouchPhase::Move, 60.0, 60.0), SIZE, &mut driver);

        // 4 card pose handles + 2 translation handles per layer.
        assert_eq!(driver.cancels().len(), 8);
        // Direct assignment took over: 4 card sets + 2 sets per layer.
        assert_eq!(driver.sets().len(), 8);
    }

    #[test]
    fn move_after_completed_down_animation_cancels_nothing() {
        let (mut card, _ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);

        // The host reports every down animation as finished (elevation is
        // not part of the pose group; completing it is a no-op).
        let handles: Vec<AnimationHandle> = driver
            .log
            .iter()
            .filter_map(|r| match r {
                Recorded::Animate(_, h) => Some(*h),
                _ => None,
            })
            .collect();
        for handle in handles {
            card.on_animation_complete(handle);
        }

        card.on_touch(sample(TouchPhase::Move, 60.0, 60.0), SIZE, &mut driver);
        assert!(driver.cancels().is_empty());
        assert_eq!(driver.sets().len(), 6);
    }

    #[test]
    fn move_values_track_the_finger_directly() {
        let (mut card, ids, mut layout) = card_with_layers(2);
        card.set_movement_distance(10.0, &mut layout);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 50.0, 50.0), SIZE, &mut driver);
        card.on_touch(sample(TouchPhase::Move, 100.0, 50.0), SIZE, &mut driver);

        let sets = driver.sets();
        // Raw vector (1, 0) → rotation_y = 5°, card translation x = 15 px,
        // front layer translation x = 10 px.
        assert!(sets.contains(&(AnimTarget::Card, AnimProperty::RotationY, 5.0)));
        assert!(sets.contains(&(AnimTarget::Card, AnimProperty::RotationX, 0.0)));
        assert!(sets.contains(&(AnimTarget::Card, AnimProperty::TranslationX, 15.0)));
        assert!(sets.contains(&(AnimTarget::Layer(ids[0]), AnimProperty::TranslationX, 10.0)));
        assert!(sets.contains(&(AnimTarget::Layer(ids[1]), AnimProperty::TranslationX, 0.0)));
    }

    #[test]
    fn release_eases_everything_back_to_rest() {
        let (mut card, ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);
        driver.log.clear();
        card.on_touch(sample(TouchPhase::Up, 100.0, 100.0), SIZE, &mut driver);

        for property in [
            AnimProperty::RotationX,
            AnimProperty::RotationY,
            AnimProperty::TranslationX,
            AnimProperty::TranslationY,
        ] {
            let cmd = driver.find_animate(AnimTarget::Card, property);
            assert_eq!(cmd.to, 0.0);
            assert_eq!(cmd.easing, Easing::Decelerate);
        }
        let elev = driver.find_animate(AnimTarget::Card, AnimProperty::Elevation);
        assert_eq!((elev.from, elev.to), (8.0, 2.0));

        let layer = driver.find_animate(AnimTarget::Layer(ids[0]), AnimProperty::TranslationY);
        assert_eq!(layer.to, 0.0);
        assert_eq!(card.pose(), CardPose::ZERO);
        assert_eq!(card.layers().translation(ids[0]), Vec2::ZERO);
    }

    #[test]
    fn release_animations_start_from_the_last_commanded_values() {
        let (mut card, _ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);
        card.on_touch(sample(TouchPhase::Move, 100.0, 100.0), SIZE, &mut driver);
        driver.log.clear();
        card.on_touch(sample(TouchPhase::Cancel, 100.0, 100.0), SIZE, &mut driver);

        let tx = driver.find_animate(AnimTarget::Card, AnimProperty::TranslationX);
        assert_eq!(tx.from, 15.0);
        let ry = driver.find_animate(AnimTarget::Card, AnimProperty::RotationY);
        assert_eq!(ry.from, 5.0);
    }

    #[test]
    fn stray_move_after_release_cancels_nothing() {
        let (mut card, _ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);
        card.on_touch(sample(TouchPhase::Up, 100.0, 100.0), SIZE, &mut driver);
        driver.log.clear();

        card.on_touch(sample(TouchPhase::Move, 50.0, 50.0), SIZE, &mut driver);
        assert!(driver.cancels().is_empty());
    }

    #[test]
    fn zero_sized_card_degrades_to_centered_touch() {
        let (mut card, _ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(
            sample(TouchPhase::Down, 40.0, 40.0),
            Size::ZERO,
            &mut driver,
        );
        let ry = driver.find_animate(AnimTarget::Card, AnimProperty::RotationY);
        assert_eq!(ry.to, 0.0);
        assert_eq!(card.pose(), CardPose::ZERO);
    }

    #[test]
    fn second_gesture_animates_from_the_previous_rest_pose() {
        let (mut card, _ids, _layout) = card_with_layers(1);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);
        card.on_touch(sample(TouchPhase::Up, 100.0, 100.0), SIZE, &mut driver);
        driver.log.clear();

        card.on_touch(sample(TouchPhase::Down, 0.0, 0.0), SIZE, &mut driver);
        let ry = driver.find_animate(AnimTarget::Card, AnimProperty::RotationY);
        assert_eq!(ry.from, 0.0);
        assert_eq!(ry.to, -5.0);
    }

    #[test]
    fn default_config_matches_density() {
        let card = ParallaxCard::new(Density::new(3.0));
        assert_eq!(card.movement_distance(), 15.0);
        assert_eq!(card.touch_mode(), TouchMode::Pressed);
        assert!(!card.first_layer_applies_parallax());
        assert_eq!(card.tuning().card_movement_distance, 45.0);
    }

    #[test]
    fn layer_translation_state_tracks_commands() {
        let (mut card, ids, mut layout) = card_with_layers(2);
        card.set_movement_distance(10.0, &mut layout);
        let mut driver = RecordingDriver::default();

        card.on_touch(sample(TouchPhase::Down, 100.0, 100.0), SIZE, &mut driver);
        assert_eq!(card.layers().translation(ids[0]), Vec2::new(10.0, 10.0));
        assert_eq!(card.layers().translation(ids[1]), Vec2::ZERO);

        let expected = vec![Vec2::new(10.0, 10.0), Vec2::ZERO];
        for ((_, id), want) in card.layers().z_order().zip(expected) {
            assert_eq!(card.layers().translation(id), want);
        }
    }
}
