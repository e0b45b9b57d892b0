// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display density and dip-to-pixel conversion.
//!
//! All tunable distances in this crate are defined in density-independent
//! pixels (dips) and resolved to device pixels through a [`Density`] supplied
//! by the host at construction time. The factor is an explicit value threaded
//! through [`CardTuning`](crate::card::CardTuning) rather than ambient
//! process-wide state, so two cards on two displays can disagree.

use core::fmt;

/// Device pixels per density-independent pixel.
#[derive(Clone, Copy, PartialEq)]
pub struct Density(f64);

impl Density {
    /// The 1:1 baseline density.
    pub const BASELINE: Self = Self(1.0);

    /// Creates a density from a pixels-per-dip scale factor.
    ///
    /// Non-finite or non-positive factors fall back to the baseline; a
    /// half-measured display must not poison every derived distance.
    #[inline]
    #[must_use]
    pub fn new(px_per_dip: f64) -> Self {
        if px_per_dip.is_finite() && px_per_dip > 0.0 {
            Self(px_per_dip)
        } else {
            Self::BASELINE
        }
    }

    /// Returns the raw pixels-per-dip factor.
    #[inline]
    #[must_use]
    pub const fn factor(self) -> f64 {
        self.0
    }

    /// Converts a dip distance to device pixels.
    #[inline]
    #[must_use]
    pub const fn dip(self, dips: f64) -> f64 {
        dips * self.0
    }
}

impl Default for Density {
    #[inline]
    fn default() -> Self {
        Self::BASELINE
    }
}

impl fmt::Debug for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Density({}x)", self.0)
    }
}
