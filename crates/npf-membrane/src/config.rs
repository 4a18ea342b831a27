//! Togglable, runtime-overridable engine configuration.
//!
//! Each feature toggle starts at the build-time default baked into
//! `npf_core::Config::default()` and can be flipped at runtime through
//! this registry — the mechanism `npf-harness` uses to sweep every
//! toggle combination across a conformance run without rebuilding.

use std::sync::OnceLock;

use parking_lot::RwLock;

use npf_core::Config as EngineConfig;

/// One of the eleven feature toggles the engine honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    FieldWidth,
    Precision,
    LargeTypes,
    SmallTypes,
    Float,
    FloatSinglePrecision,
    FloatHex,
    Binary,
    Writeback,
    AltFormFlag,
    SafeEmptyOnOverflow,
}

impl Toggle {
    pub const ALL: [Toggle; 11] = [
        Toggle::FieldWidth,
        Toggle::Precision,
        Toggle::LargeTypes,
        Toggle::SmallTypes,
        Toggle::Float,
        Toggle::FloatSinglePrecision,
        Toggle::FloatHex,
        Toggle::Binary,
        Toggle::Writeback,
        Toggle::AltFormFlag,
        Toggle::SafeEmptyOnOverflow,
    ];

    /// Parse a toggle name case-insensitively (accepts the `SCREAMING_SNAKE`
    /// spelling the specification uses, e.g. `FIELD_WIDTH`).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "FIELD_WIDTH" => Some(Self::FieldWidth),
            "PRECISION" => Some(Self::Precision),
            "LARGE_TYPES" => Some(Self::LargeTypes),
            "SMALL_TYPES" => Some(Self::SmallTypes),
            "FLOAT" => Some(Self::Float),
            "FLOAT_SINGLE_PRECISION" => Some(Self::FloatSinglePrecision),
            "FLOAT_HEX" => Some(Self::FloatHex),
            "BINARY" => Some(Self::Binary),
            "WRITEBACK" => Some(Self::Writeback),
            "ALT_FORM_FLAG" => Some(Self::AltFormFlag),
            "SAFE_EMPTY_ON_OVERFLOW" => Some(Self::SafeEmptyOnOverflow),
            _ => None,
        }
    }
}

/// The live, lock-guarded registry. `npf-core` never touches this
/// directly — callers read `snapshot()` once per call site and hand the
/// resulting plain `Config` into the engine, keeping the hot path
/// lock-free.
pub struct Registry {
    state: RwLock<EngineConfig>,
}

impl Registry {
    fn new() -> Self {
        Self {
            state: RwLock::new(EngineConfig::default()),
        }
    }

    /// Set a toggle on or off.
    pub fn set(&self, toggle: Toggle, enabled: bool) {
        let mut guard = self.state.write();
        match toggle {
            Toggle::FieldWidth => guard.field_width = enabled,
            Toggle::Precision => guard.precision = enabled,
            Toggle::LargeTypes => guard.large_types = enabled,
            Toggle::SmallTypes => guard.small_types = enabled,
            Toggle::Float => guard.float = enabled,
            Toggle::FloatSinglePrecision => guard.float_single_precision = enabled,
            Toggle::FloatHex => guard.float_hex = enabled,
            Toggle::Binary => guard.binary = enabled,
            Toggle::Writeback => guard.writeback = enabled,
            Toggle::AltFormFlag => guard.alt_form_flag = enabled,
            Toggle::SafeEmptyOnOverflow => guard.safe_empty_on_overflow = enabled,
        }
    }

    pub fn get(&self, toggle: Toggle) -> bool {
        let guard = self.state.read();
        match toggle {
            Toggle::FieldWidth => guard.field_width,
            Toggle::Precision => guard.precision,
            Toggle::LargeTypes => guard.large_types,
            Toggle::SmallTypes => guard.small_types,
            Toggle::Float => guard.float,
            Toggle::FloatSinglePrecision => guard.float_single_precision,
            Toggle::FloatHex => guard.float_hex,
            Toggle::Binary => guard.binary,
            Toggle::Writeback => guard.writeback,
            Toggle::AltFormFlag => guard.alt_form_flag,
            Toggle::SafeEmptyOnOverflow => guard.safe_empty_on_overflow,
        }
    }

    /// Reset every toggle back to `npf_core::Config::default()`.
    pub fn reset(&self) {
        *self.state.write() = EngineConfig::default();
    }

    /// Frozen value to pass into `npf_core::pprintf`/`snprintf`, with the
    /// observability hook wired to [`crate::metrics::record_event`].
    #[must_use]
    pub fn snapshot(&self) -> EngineConfig {
        let mut cfg = *self.state.read();
        cfg.on_event = Some(crate::metrics::record_event);
        cfg
    }
}

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Access the global configuration registry.
#[must_use]
pub fn registry() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(Registry::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let r = Registry::new();
        assert!(r.get(Toggle::Float));
        assert!(!r.get(Toggle::SafeEmptyOnOverflow));
    }

    #[test]
    fn set_and_get_round_trip() {
        let r = Registry::new();
        r.set(Toggle::Binary, false);
        assert!(!r.get(Toggle::Binary));
        r.set(Toggle::Binary, true);
        assert!(r.get(Toggle::Binary));
    }

    #[test]
    fn reset_restores_defaults() {
        let r = Registry::new();
        r.set(Toggle::Float, false);
        r.reset();
        assert!(r.get(Toggle::Float));
    }

    #[test]
    fn from_str_loose_accepts_spec_spelling() {
        assert_eq!(Toggle::from_str_loose("FIELD_WIDTH"), Some(Toggle::FieldWidth));
        assert_eq!(Toggle::from_str_loose("safe_empty_on_overflow"), Some(Toggle::SafeEmptyOnOverflow));
        assert_eq!(Toggle::from_str_loose("bogus"), None);
    }

    #[test]
    fn snapshot_wires_the_metrics_hook() {
        let r = Registry::new();
        let snap = r.snapshot();
        assert!(snap.on_event.is_some());
    }
}
