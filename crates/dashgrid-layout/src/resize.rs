#![forbid(unsafe_code)]

//! Viewport resize debouncing.
//!
//! Continuous window resizing produces a flood of width notifications, and
//! every one that reaches the controller can trigger a grid rebuild. In
//! fullscreen mode notifications are held until the width has been quiet
//! for a debounce window; in embedded/edit mode they pass through on the
//! next poll. Widths equal to the last delivered width are ignored
//! entirely, since the observer fires for height-only changes too.
//!
//! Time is passed in by the caller, so tests can drive the clock.

use web_time::{Duration, Instant};

/// Latest-wins debouncer for viewport width notifications.
#[derive(Debug)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<u32>,
    pushed_at: Option<Instant>,
    delivered: Option<u32>,
}

impl ResizeDebouncer {
    /// Debounce with the given quiet window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            pushed_at: None,
            delivered: None,
        }
    }

    /// Pass-through variant: every pushed width is ready on the next poll.
    #[must_use]
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Record a width notification.
    pub fn push(&mut self, width: u32, now: Instant) {
        if self.delivered == Some(width) && self.pending.is_none() {
            return;
        }
        self.pending = Some(width);
        self.pushed_at = Some(now);
    }

    /// Take the pending width once the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        let pushed_at = self.pushed_at?;
        if now.duration_since(pushed_at) < self.window {
            return None;
        }
        let width = self.pending.take()?;
        self.pushed_at = None;
        self.delivered = Some(width);
        Some(width)
    }

    /// Whether a notification is waiting for its quiet window.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending notification, e.g. on teardown.
    pub fn reset(&mut self) {
        self.pending = None;
        self.pushed_at = None;
        self.delivered = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
