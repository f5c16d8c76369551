#![forbid(unsafe_code)]

//! Config repair: reconciling a persisted widget config against the
//! current manifest schema.
//!
//! Persisted configs drift: a dashboard saved under an older schema may be
//! missing fields the current manifest expects, and may carry fields the
//! current schema no longer knows about. [`correct_config_spec`] recovers
//! both silently. It must run on every widget render pass, not just on
//! load, because schema upgrades can land between a save and the next view.
//!
//! # Invariants
//!
//! 1. Idempotent: `repair(repair(c)) == repair(c)`.
//! 2. Complete: `repair({})` contains every key of the default config.
//! 3. Non-destructive: keys present in the persisted config are never
//!    overwritten, and persisted-only keys are preserved.
//! 4. Shallow: merge happens per top-level key. A nested object or array
//!    present in the persisted config replaces the default wholesale.

use serde_json::Value;

use crate::manifest::WidgetManifest;

/// Repair a persisted config against a manifest's default config.
///
/// The default config is the base; every top-level key of the persisted
/// config overrides it wholesale. A persisted value that is not a JSON
/// object (legacy `null`, corrupted scalar) is discarded in favor of the
/// defaults.
#[must_use]
pub fn correct_config_spec(manifest: &dyn WidgetManifest, persisted: &Value) -> Value {
    merge_object_shallow(manifest.default_config(), persisted)
}

/// Shallow per-key merge of `overrides` onto `base`.
#[must_use]
pub fn merge_object_shallow(base: Value, overrides: &Value) -> Value {
    let Value::Object(mut out) = base else {
        // Manifest contract: default configs are objects. A non-object
        // default passes the persisted value through untouched.
        return overrides.clone();
    };
    if let Value::Object(over) = overrides {
        for (key, value) in over {
            out.insert(key.clone(), value.clone());
        }
    }
    Value::Object(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
