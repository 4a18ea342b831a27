//! Engine-wide feature toggles, consumed as a plain value.
//!
//! `npf-core` never reaches out to a live configuration object — the
//! driver takes a [`Config`] by value on every call. The togglable,
//! runtime-overridable registry lives in `npf-membrane`; this struct is
//! just the frozen snapshot it hands to the engine, keeping the hot path
//! free of any lock.

/// One engine-observable event, reported through [`Config::on_event`] so an
/// embedding crate can keep counters without `npf-core` taking a
/// dependency on anything that does the counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A `%` directive didn't parse, or named a conversion a disabled
    /// toggle turned off; it was copied through as literal text.
    MalformedDirective,
    /// An integral conversion's value was `0` and its explicit precision
    /// was `0`, so no digit was emitted (`%.0d` of `0`).
    PrecisionZeroSuppressed,
    /// `%f`/`%F` couldn't represent its integer part in the scratch width
    /// and fell back to scientific notation.
    FloatScientificFallback,
    /// A `%n` directive wrote the running count through its target.
    Writeback,
}

/// Feature toggles mirroring the conversions and grammar elements this
/// engine can be built to support. All default to `true` except the two
/// that change the *shape* of a normal call (`float_single_precision`,
/// `safe_empty_on_overflow`).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub field_width: bool,
    pub precision: bool,
    pub large_types: bool,
    pub small_types: bool,
    pub float: bool,
    pub float_single_precision: bool,
    pub float_hex: bool,
    pub binary: bool,
    pub writeback: bool,
    pub alt_form_flag: bool,
    /// `snprintf` overflow policy: `false` (default) truncates and keeps
    /// whatever fits; `true` writes an empty string instead.
    pub safe_empty_on_overflow: bool,
    /// Optional observability hook; see [`Event`].
    pub on_event: Option<fn(Event)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: true,
            precision: true,
            large_types: true,
            small_types: true,
            float: true,
            float_single_precision: false,
            float_hex: true,
            binary: true,
            writeback: true,
            alt_form_flag: true,
            safe_empty_on_overflow: false,
            on_event: None,
        }
    }
}

impl Config {
    pub(crate) fn report(&self, event: Event) {
        if let Some(f) = self.on_event {
            f(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_every_conversion_family() {
        let c = Config::default();
        assert!(c.field_width && c.precision && c.large_types && c.small_types);
        assert!(c.float && c.float_hex && c.binary && c.writeback && c.alt_form_flag);
        assert!(!c.safe_empty_on_overflow);
    }

    #[test]
    fn report_is_a_no_op_without_a_hook() {
        Config::default().report(Event::MalformedDirective);
    }
}
