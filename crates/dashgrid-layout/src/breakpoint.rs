#![forbid(unsafe_code)]

//! Screen preset resolution: which scaling behavior governs the current
//! viewport width.
//!
//! Screen presets form a staircase of viewport-width thresholds. The active
//! preset for a width is the *tightest* one the viewport fits under: the
//! smallest breakpoint greater than or equal to the width. Above every
//! threshold no preset is active and the default desktop layout applies.
//!
//! # Invariants
//!
//! 1. For presets sorted ascending `[b1 < b2 < ... < bn]` and any width
//!    `w <= bn`, resolution returns the preset with the smallest `bi >= w`.
//! 2. For `w > bn`, resolution returns `None`.
//! 3. Equal breakpoints: the first-declared preset wins (stable sort).
//!    Templates with duplicate breakpoints are rejected by validation, but
//!    resolution stays deterministic for unvalidated input.

use dashgrid_model::{ScalingPreset, ScreenPreset};

/// Sort presets by breakpoint, ascending or descending. Stable, so presets
/// sharing a breakpoint keep their declaration order.
#[must_use]
pub fn sort_screen_presets(presets: &[ScreenPreset], large_to_small: bool) -> Vec<ScreenPreset> {
    let mut sorted = presets.to_vec();
    if large_to_small {
        sorted.sort_by(|a, b| b.breakpoint.cmp(&a.breakpoint));
    } else {
        sorted.sort_by(|a, b| a.breakpoint.cmp(&b.breakpoint));
    }
    sorted
}

/// Resolve the active preset for a viewport width.
///
/// Walks the presets from the largest breakpoint down, keeping the last one
/// whose threshold still covers the width, i.e. the smallest qualifying
/// breakpoint.
#[must_use]
pub fn active_preset(viewport_width_px: u32, presets: &[ScreenPreset]) -> Option<ScreenPreset> {
    let mut active = None;
    for preset in sort_screen_presets(presets, true) {
        if viewport_width_px <= preset.breakpoint {
            active = Some(preset);
        }
    }
    active
}

/// Whether the scaling *mode* differs between two resolved presets.
///
/// The grid must be fully rebuilt when the mode changes (cell-height
/// computation and interactivity differ structurally between modes) but
/// not when merely a different preset with the same mode becomes active.
#[must_use]
pub fn scaling_mode_changed(
    old: Option<&ScreenPreset>,
    new: Option<&ScreenPreset>,
) -> bool {
    old.map(|p| p.scaling_preset) != new.map(|p| p.scaling_preset)
}

/// The scaling mode of an optional preset; `None` means default layout.
#[must_use]
pub fn scaling_mode(preset: Option<&ScreenPreset>) -> Option<ScalingPreset> {
    preset.map(|p| p.scaling_preset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
