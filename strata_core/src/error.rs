// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural integration errors.
//!
//! A [`StructuralViolation`] means the *embedding* is wired wrong — the card
//! was mounted under the wrong surface, or something other than a layer was
//! pushed into its child list. These are caller bugs, detected at the
//! attach/adopt seam before any transform logic runs, and there is nothing
//! sensible to retry. Transient geometry problems (an unmeasured container,
//! a single-layer stack) are *not* errors; those are clamped where they
//! occur.

use core::fmt;

use crate::card::SurfaceKind;

/// The embedding violated the card's structural contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructuralViolation {
    /// The card was attached to something other than a parallax surface.
    ///
    /// The designated surface never clips its children, which is what lets
    /// layers carry negative margins without their edges being cut off.
    WrongContainer {
        /// What the card was actually attached to.
        found: SurfaceKind,
    },
    /// A non-layer child was found in the adopted child list.
    ForeignChild {
        /// Position of the offending child in the host's list.
        index: usize,
    },
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongContainer { found } => write!(
                f,
                "parallax card can only be a child of a parallax surface, found {found:?}"
            ),
            Self::ForeignChild { index } => {
                write!(f, "only layers can be children of a parallax card (child {index})")
            }
        }
    }
}

impl core::error::Error for StructuralViolation {}
