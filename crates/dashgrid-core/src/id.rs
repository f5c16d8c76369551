#![forbid(unsafe_code)]

//! Stable identifiers for persisted dashboard state.
//!
//! All ids are opaque string newtypes so they survive JSON round-trips
//! byte-for-byte. Fresh ids come from an [`IdSource`] passed in by the host
//! rather than a global generator, so tests can pin the sequence.
//!
//! # Invariants
//!
//! 1. A [`WidgetId`] is unique within one template and never changes after
//!    creation.
//! 2. A [`GridItemId`] is the coordinate-tracking key the grid engine uses
//!    to correlate live nodes back to widgets; it must match the owning
//!    widget's grid item record.
//! 3. Duplicating a dashboard mints fresh ids for the template and every
//!    contained widget and grid item.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Length of generated random identifiers.
const RANDOM_ID_LEN: usize = 22;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier, e.g. one read from persistence.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }
    };
}

string_id!(
    /// Identifier of a persisted dashboard record.
    DashboardId,
    "dashboard"
);
string_id!(
    /// Identifier of a dashboard template.
    TemplateId,
    "template"
);
string_id!(
    /// Identifier of a placed widget, unique within its template.
    WidgetId,
    "widget"
);
string_id!(
    /// Coordinate-tracking key correlating a live grid node to its widget.
    GridItemId,
    "grid-item"
);

/// Source of fresh identifiers.
///
/// Production code uses [`RandomIdSource`]; tests use
/// [`SequentialIdSource`] for reproducible sequences.
pub trait IdSource {
    /// Produce a fresh raw identifier, unique for the lifetime of the source.
    fn next_id(&mut self) -> String;
}

/// Random alphanumeric identifiers.
#[derive(Debug, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_id(&mut self) -> String {
        let mut rng = rand::thread_rng();
        (0..RANDOM_ID_LEN)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect()
    }
}

/// Deterministic counter-based identifiers for tests.
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    next: u64,
}

impl SequentialIdSource {
    /// Start counting from `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        format!("id-{id}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
