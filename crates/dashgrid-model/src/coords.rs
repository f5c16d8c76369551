#![forbid(unsafe_code)]

//! Grid coordinate model: cell-to-pixel conversion and bounds clamping.
//!
//! Pure helpers between cell space (`GridItem`) and pixel space
//! ([`PxRect`]). Nothing renders pixels from grid coordinates without
//! passing through [`clamp_to_bounds`]: an out-of-bounds placement from a
//! stale drag must never be persisted.
//!
//! # Invariants
//!
//! 1. `clamp_to_bounds` output satisfies `x + w <= columns` and spans of at
//!    least 1 for any input.
//! 2. `cell_size` never divides by zero (a column count below 1 is treated
//!    as 1).

use dashgrid_core::PxRect;

use crate::template::GridItem;

/// Width of one grid cell in pixels for the given container width.
#[must_use]
pub fn cell_size(container_width_px: f64, columns: u32) -> f64 {
    container_width_px / f64::from(columns.max(1))
}

/// Project a grid item into pixel space using the given cell dimensions.
#[must_use]
pub fn to_pixel_rect(item: &GridItem, cell_w_px: f64, cell_h_px: f64) -> PxRect {
    PxRect {
        x: f64::from(item.x) * cell_w_px,
        y: f64::from(item.y) * cell_h_px,
        w: f64::from(item.w) * cell_w_px,
        h: f64::from(item.h) * cell_h_px,
    }
}

/// Clamp a grid item into the column bounds of the grid.
///
/// Spans are raised to the item's minimums (and to at least 1), the width
/// is capped at the column count, and `x` is pulled left until the item
/// fits. `y` has no lower bound to clamp against and no upper bound (grids
/// grow downward).
#[must_use]
pub fn clamp_to_bounds(item: &GridItem, columns: u32) -> GridItem {
    let columns = columns.max(1);
    let mut out = item.clone();

    out.w = out.w.max(out.min_w.unwrap_or(1)).max(1).min(columns);
    out.h = out.h.max(out.min_h.unwrap_or(1)).max(1);
    if out.x.saturating_add(out.w) > columns {
        out.x = columns - out.w;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::GridItemId;
    use proptest::prelude::*;

    fn item(x: u32, y: u32, w: u32, h: u32) -> GridItem {
        GridItem::new(GridItemId::new("g")).at(x, y).spanning(w, h)
    }

    #[test]
    fn cell_size_divides_width() {
        assert_eq!(cell_size(1200.0, 12), 100.0);
        assert_eq!(cell_size(1000.0, 8), 125.0);
    }

    #[test]
    fn cell_size_guards_zero_columns() {
        assert_eq!(cell_size(500.0, 0), 500.0);
    }

    #[test]
    fn pixel_projection() {
        let rect = to_pixel_rect(&item(3, 2, 2, 4), 100.0, 50.0);
        assert_eq!(rect, PxRect::new(300.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn clamp_pulls_overflowing_item_left() {
        let clamped = clamp_to_bounds(&item(10, 0, 4, 2), 12);
        assert_eq!((clamped.x, clamped.w), (8, 4));
    }

    #[test]
    fn clamp_caps_width_at_columns() {
        let clamped = clamp_to_bounds(&item(0, 0, 20, 2), 12);
        assert_eq!((clamped.x, clamped.w), (0, 12));
    }

    #[test]
    fn clamp_raises_spans_to_minimums() {
        let mut oversized = item(0, 0, 1, 1);
        oversized.min_w = Some(3);
        oversized.min_h = Some(2);
        let clamped = clamp_to_bounds(&oversized, 12);
        assert_eq!((clamped.w, clamped.h), (3, 2));
    }

    #[test]
    fn clamp_repairs_zero_spans() {
        let clamped = clamp_to_bounds(&item(0, 0, 0, 0), 12);
        assert_eq!((clamped.w, clamped.h), (1, 1));
    }

    #[test]
    fn clamp_preserves_in_bounds_item() {
        let original = item(3, 2, 2, 2);
        assert_eq!(clamp_to_bounds(&original, 12), original);
    }

    proptest! {
        #[test]
        fn clamp_always_fits_columns(
            x in 0u32..64,
            y in 0u32..64,
            w in 0u32..64,
            h in 0u32..64,
            columns in 1u32..32,
        ) {
            let clamped = clamp_to_bounds(&item(x, y, w, h), columns);
            prop_assert!(clamped.x + clamped.w <= columns);
            prop_assert!(clamped.w >= 1);
            prop_assert!(clamped.h >= 1);
            prop_assert_eq!(clamped.y, y);
        }

        #[test]
        fn clamp_is_idempotent(
            x in 0u32..64,
            w in 0u32..64,
            columns in 1u32..32,
        ) {
            let once = clamp_to_bounds(&item(x, 0, w, 2), columns);
            let twice = clamp_to_bounds(&once, columns);
            prop_assert_eq!(once, twice);
        }
    }
}
