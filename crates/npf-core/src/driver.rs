//! Core driver: walks a format string, dispatches each directive, and
//! assembles its output.
//!
//! The driver is a small state machine over two states: copying literal
//! text straight through, and (on `%`) parsing and rendering one
//! directive. Every rendering path funnels through [`assemble::emit_field`]
//! so width/justification logic lives in exactly one place.

use crate::arg::{Arg, ArgCursor, Sink, WritebackCell};
use crate::assemble::{emit_field, sign_char, Field};
use crate::config::{Config, Event};
use crate::ffmt::{
    format_dec, format_hex, format_sci, format_shortest, split_f32_for_format, split_f64_for_format,
    DEFAULT_DEC_PRECISION, DEFAULT_HEX_PRECISION_F32, DEFAULT_HEX_PRECISION_F64, DEFAULT_SCI_PRECISION,
    DEFAULT_SHORTEST_PRECISION,
};
use crate::intconv::{mask_signed, mask_unsigned, render_digits, SCRATCH_LEN};
use crate::spec::{parse_format_spec, Conv, FormatFlags, FormatSpec, LengthMod, Precision, Width};

/// Render `fmt` against `args` through `sink`, returning the number of
/// bytes that *would* have been written had `sink` accepted everything
/// (the standard printf return-value contract), clamped to `i32`.
pub fn pprintf(sink: &mut impl Sink, fmt: &[u8], args: &[Arg], config: &Config) -> i32 {
    let mut cursor = ArgCursor::new(args);
    let mut count: i64 = 0;
    let mut i = 0usize;

    while i < fmt.len() {
        if fmt[i] != b'%' {
            push(sink, &mut count, fmt[i]);
            i += 1;
            continue;
        }

        match parse_format_spec(&fmt[i + 1..]) {
            Some((spec, consumed)) if conversion_enabled(&spec, config) => {
                render_directive(sink, &mut count, &spec, &mut cursor, config);
                i += 1 + consumed;
            }
            Some((_, consumed)) => {
                config.report(Event::MalformedDirective);
                for &b in &fmt[i..i + 1 + consumed] {
                    push(sink, &mut count, b);
                }
                i += 1 + consumed;
            }
            None => {
                config.report(Event::MalformedDirective);
                push(sink, &mut count, b'%');
                i += 1;
            }
        }
    }

    count.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn push(sink: &mut impl Sink, count: &mut i64, byte: u8) {
    sink.push(byte);
    *count += 1;
}

fn conversion_enabled(spec: &FormatSpec, config: &Config) -> bool {
    if !config.field_width && matches!(spec.width, Width::Fixed(_) | Width::FromArg) {
        return false;
    }
    if !config.precision && !matches!(spec.precision, Precision::None) {
        return false;
    }
    if !config.alt_form_flag && spec.flags.alt_form {
        return false;
    }
    let length_ok = match spec.length {
        LengthMod::Hh | LengthMod::H => config.small_types,
        LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T | LengthMod::BigL => {
            config.large_types
        }
        LengthMod::None => true,
    };
    if !length_ok {
        return false;
    }
    match spec.conv {
        Conv::Binary => config.binary,
        Conv::Writeback => config.writeback,
        Conv::FloatDec | Conv::FloatSci | Conv::FloatShortest => config.float,
        Conv::FloatHex => config.float && config.float_hex,
        _ => true,
    }
}

fn resolve_count_arg(cursor: &mut ArgCursor) -> Option<i64> {
    match cursor.next()? {
        Arg::Signed(v) => Some(v),
        Arg::Unsigned(v) => Some(v as i64),
        _ => Some(0),
    }
}

/// Resolve `*` width: a negative argument means left-justify with the
/// absolute value as width, matching C's `va_arg` convention for width.
fn resolve_width(spec_width: Width, flags: &mut FormatFlags, cursor: &mut ArgCursor) -> usize {
    match spec_width {
        Width::None => 0,
        Width::Fixed(w) => w,
        Width::FromArg => match resolve_count_arg(cursor) {
            Some(v) if v < 0 => {
                flags.left_justify = true;
                v.unsigned_abs() as usize
            }
            Some(v) => v as usize,
            None => 0,
        },
    }
}

/// Resolve `.*` precision: a negative argument is treated as if no
/// precision had been given at all.
fn resolve_precision(spec_precision: Precision, cursor: &mut ArgCursor) -> Option<usize> {
    match spec_precision {
        Precision::None => None,
        Precision::Fixed(p) => Some(p),
        Precision::FromArg => match resolve_count_arg(cursor) {
            Some(v) if v < 0 => None,
            Some(v) => Some(v as usize),
            None => None,
        },
    }
}

fn render_directive(sink: &mut impl Sink, count: &mut i64, spec: &FormatSpec, cursor: &mut ArgCursor, config: &Config) {
    let mut flags = spec.flags;
    let width = resolve_width(spec.width, &mut flags, cursor);
    let precision = resolve_precision(spec.precision, cursor);

    match spec.conv {
        Conv::Percent => emit_body(sink, count, None, &[], b"%", width, flags),
        Conv::Char => render_char(sink, count, cursor, width, flags),
        Conv::String => render_string(sink, count, cursor, precision, width, flags),
        Conv::SignedInt => render_signed(sink, count, spec.length, cursor, precision, width, flags, config),
        Conv::UnsignedInt => render_unsigned(sink, count, spec.length, cursor, 10, false, precision, width, flags, config),
        Conv::Octal => render_unsigned(sink, count, spec.length, cursor, 8, false, precision, width, flags, config),
        Conv::Hex => render_unsigned(sink, count, spec.length, cursor, 16, spec.uppercase, precision, width, flags, config),
        Conv::Binary => render_unsigned(sink, count, spec.length, cursor, 2, spec.uppercase, precision, width, flags, config),
        Conv::Pointer => render_pointer(sink, count, cursor, width, flags, config),
        Conv::Writeback => render_writeback(cursor, *count, spec.length, config),
        Conv::FloatDec => render_float_dec(sink, count, cursor, precision, width, flags, spec.uppercase, config),
        Conv::FloatSci => render_float_sci(sink, count, cursor, precision, width, flags, spec.uppercase, config),
        Conv::FloatShortest => render_float_shortest(sink, count, cursor, precision, width, flags, spec.uppercase, config),
        Conv::FloatHex => render_float_hex(sink, count, cursor, precision, width, flags, spec.uppercase, config),
    }
}

fn emit_body(
    sink: &mut impl Sink,
    count: &mut i64,
    sign: Option<u8>,
    prefix: &[u8],
    body: &[u8],
    width: usize,
    flags: FormatFlags,
) {
    let field = Field { sign, prefix, body };
    let mut counting = CountingAdapter { sink, extra: 0 };
    emit_field(&mut counting, &field, width, flags);
    *count += counting.extra as i64;
}

/// Adapter so [`emit_field`]'s byte-for-byte writes route through the
/// driver's running count without threading `count` through `assemble`.
struct CountingAdapter<'a, S: Sink> {
    sink: &'a mut S,
    extra: usize,
}

impl<S: Sink> Sink for CountingAdapter<'_, S> {
    fn push(&mut self, byte: u8) -> bool {
        self.extra += 1;
        self.sink.push(byte)
    }
}

fn render_char(sink: &mut impl Sink, count: &mut i64, cursor: &mut ArgCursor, width: usize, flags: FormatFlags) {
    let byte = match cursor.next() {
        Some(Arg::Char(c)) => c as u32 as u8,
        Some(Arg::Signed(v)) => v as u8,
        Some(Arg::Unsigned(v)) => v as u8,
        _ => 0,
    };
    emit_body(sink, count, None, &[], &[byte], width, flags);
}

fn render_string(
    sink: &mut impl Sink,
    count: &mut i64,
    cursor: &mut ArgCursor,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
) {
    let bytes: &[u8] = match cursor.next() {
        Some(Arg::Str(s)) => s.as_bytes(),
        Some(Arg::Bytes(b)) => b,
        _ => b"(null)",
    };
    let slice = match precision {
        Some(p) if p < bytes.len() => &bytes[..p],
        _ => bytes,
    };
    emit_body(sink, count, None, &[], slice, width, flags);
}

fn render_signed(
    sink: &mut impl Sink,
    count: &mut i64,
    length: LengthMod,
    cursor: &mut ArgCursor,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    config: &Config,
) {
    let raw = match cursor.next() {
        Some(Arg::Signed(v)) => v,
        Some(Arg::Unsigned(v)) => v as i64,
        _ => 0,
    };
    let masked = mask_signed(raw, length);
    let negative = masked < 0;
    let magnitude = masked.unsigned_abs() as u128;
    render_integral_body(sink, count, magnitude, 10, false, negative, precision, width, flags, &[], config);
}

#[allow(clippy::too_many_arguments)]
fn render_unsigned(
    sink: &mut impl Sink,
    count: &mut i64,
    length: LengthMod,
    cursor: &mut ArgCursor,
    base: u128,
    uppercase: bool,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    config: &Config,
) {
    let raw = match cursor.next() {
        Some(Arg::Unsigned(v)) => v,
        Some(Arg::Signed(v)) => v as u64,
        _ => 0,
    };
    let masked = mask_unsigned(raw, length) as u128;

    let mut scratch_prefix = [0u8; 2];
    let prefix_len = if flags.alt_form && masked != 0 {
        match base {
            16 => {
                scratch_prefix[0] = b'0';
                scratch_prefix[1] = if uppercase { b'X' } else { b'x' };
                2
            }
            2 => {
                scratch_prefix[0] = b'0';
                scratch_prefix[1] = if uppercase { b'B' } else { b'b' };
                2
            }
            _ => 0,
        }
    } else {
        0
    };

    render_integral_body(
        sink,
        count,
        masked,
        base,
        uppercase,
        false,
        precision,
        width,
        flags,
        &scratch_prefix[..prefix_len],
        config,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_integral_body(
    sink: &mut impl Sink,
    count: &mut i64,
    magnitude: u128,
    base: u128,
    uppercase: bool,
    negative: bool,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    prefix: &[u8],
    config: &Config,
) {
    if magnitude == 0 && precision == Some(0) {
        config.report(Event::PrecisionZeroSuppressed);
        let sign = sign_char(negative, flags);
        emit_body(sink, count, sign, prefix, &[], width, flags);
        return;
    }

    let mut scratch = [0u8; SCRATCH_LEN];
    let digits = render_digits(&mut scratch, magnitude, base, uppercase);

    let mut padded_start = SCRATCH_LEN - digits.len();
    if let Some(p) = precision {
        let want_start = SCRATCH_LEN.saturating_sub(p.min(SCRATCH_LEN - 1));
        while padded_start > want_start {
            padded_start -= 1;
            scratch[padded_start] = b'0';
        }
    }
    let body = &scratch[padded_start..];

    // `#` on octal guarantees a leading zero in the digits themselves,
    // not a separate prefix token (avoids "00" for a value that already
    // starts with 0 after precision padding).
    let mut with_leading_zero = [0u8; SCRATCH_LEN];
    let body = if base == 8 && flags.alt_form && body.first() != Some(&b'0') {
        let start = SCRATCH_LEN - body.len() - 1;
        with_leading_zero[start] = b'0';
        with_leading_zero[start + 1..SCRATCH_LEN].copy_from_slice(body);
        &with_leading_zero[start..]
    } else {
        body
    };

    let sign = sign_char(negative, flags);
    emit_body(sink, count, sign, prefix, body, width, flags);
}

fn render_pointer(sink: &mut impl Sink, count: &mut i64, cursor: &mut ArgCursor, width: usize, mut flags: FormatFlags, config: &Config) {
    let addr = match cursor.next() {
        Some(Arg::Ptr(p)) => p as usize,
        Some(Arg::Unsigned(v)) => v as usize,
        _ => 0,
    };
    flags.zero_pad = false;
    let mut scratch = [0u8; SCRATCH_LEN];
    let digits = render_digits(&mut scratch, addr as u128, 16, false);
    let pad_width = if config.precision {
        core::mem::size_of::<usize>() * 2
    } else {
        0
    };
    let want_start = SCRATCH_LEN - pad_width.max(digits.len());
    let mut idx = SCRATCH_LEN - digits.len();
    while idx > want_start {
        idx -= 1;
        scratch[idx] = b'0';
    }
    let body = &scratch[idx..];
    emit_body(sink, count, None, b"0x", body, width, flags);
}

/// Writes the running byte count into the `%n` target, truncated to the
/// width the directive's length modifier names: `hh`/`h` narrow to 8/16
/// bits, `l`/`ll`/`j`/`z`/`t` take the full 64-bit count, and a bare `%n`
/// takes the default 32-bit `int` width.
fn render_writeback(cursor: &mut ArgCursor, count_so_far: i64, length: LengthMod, config: &Config) {
    let masked = mask_signed(count_so_far, length);
    match cursor.next() {
        Some(Arg::WritebackTarget(WritebackCell::I8(cell))) => cell.set(masked as i8),
        Some(Arg::WritebackTarget(WritebackCell::I16(cell))) => cell.set(masked as i16),
        Some(Arg::WritebackTarget(WritebackCell::I32(cell))) => cell.set(masked as i32),
        Some(Arg::WritebackTarget(WritebackCell::I64(cell))) => cell.set(masked),
        _ => return,
    }
    config.report(Event::Writeback);
}

fn pop_float(cursor: &mut ArgCursor, config: &Config) -> f64 {
    match cursor.next() {
        Some(Arg::Float(v)) => v,
        Some(Arg::Single(v)) if config.float_single_precision => v as f64,
        Some(Arg::Single(v)) => v as f64,
        _ => 0.0,
    }
}

fn render_float_dec(
    sink: &mut impl Sink,
    count: &mut i64,
    cursor: &mut ArgCursor,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    uppercase: bool,
    config: &Config,
) {
    let x = pop_float(cursor, config);
    let negative = x.is_sign_negative();
    let prec = precision.unwrap_or(DEFAULT_DEC_PRECISION);
    let (split, _, _) = if config.float_single_precision {
        split_f32_for_format(x as f32)
    } else {
        split_f64_for_format(x)
    };

    let mut buf = [0u8; 96];
    let mut len = 0usize;
    if split.overflow {
        config.report(Event::FloatScientificFallback);
        format_sci(&split, prec.min(DEFAULT_SCI_PRECISION.max(prec)), flags.alt_form, uppercase, |b| {
            if len < buf.len() {
                buf[len] = b;
                len += 1;
            }
        });
    } else {
        format_dec(&split, prec, flags.alt_form, |b| {
            if len < buf.len() {
                buf[len] = b;
                len += 1;
            }
        });
    }
    let sign = sign_char(negative, flags);
    emit_body(sink, count, sign, &[], &buf[..len], width, flags);
}

fn render_float_sci(
    sink: &mut impl Sink,
    count: &mut i64,
    cursor: &mut ArgCursor,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    uppercase: bool,
    config: &Config,
) {
    let x = pop_float(cursor, config);
    let negative = x.is_sign_negative();
    let prec = precision.unwrap_or(DEFAULT_SCI_PRECISION);
    let (split, _, _) = if config.float_single_precision {
        split_f32_for_format(x as f32)
    } else {
        split_f64_for_format(x)
    };
    let mut buf = [0u8; 64];
    let mut len = 0usize;
    format_sci(&split, prec, flags.alt_form, uppercase, |b| {
        if len < buf.len() {
            buf[len] = b;
            len += 1;
        }
    });
    let sign = sign_char(negative, flags);
    emit_body(sink, count, sign, &[], &buf[..len], width, flags);
}

fn render_float_shortest(
    sink: &mut impl Sink,
    count: &mut i64,
    cursor: &mut ArgCursor,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    uppercase: bool,
    config: &Config,
) {
    let x = pop_float(cursor, config);
    let negative = x.is_sign_negative();
    let prec = precision.unwrap_or(DEFAULT_SHORTEST_PRECISION);
    let (split, _, _) = if config.float_single_precision {
        split_f32_for_format(x as f32)
    } else {
        split_f64_for_format(x)
    };
    let mut buf = [0u8; 64];
    let mut len = 0usize;
    format_shortest(&split, prec, flags.alt_form, uppercase, |b| {
        if len < buf.len() {
            buf[len] = b;
            len += 1;
        }
    });
    let sign = sign_char(negative, flags);
    emit_body(sink, count, sign, &[], &buf[..len], width, flags);
}

fn render_float_hex(
    sink: &mut impl Sink,
    count: &mut i64,
    cursor: &mut ArgCursor,
    precision: Option<usize>,
    width: usize,
    flags: FormatFlags,
    uppercase: bool,
    config: &Config,
) {
    let x = pop_float(cursor, config);
    let negative = x.is_sign_negative();
    let (split, mantissa, mantissa_bits, exp, default_prec) = if config.float_single_precision {
        let (s, m, e) = split_f32_for_format(x as f32);
        (s, m, 23u32, e, DEFAULT_HEX_PRECISION_F32)
    } else {
        let (s, m, e) = split_f64_for_format(x);
        (s, m, 52u32, e, DEFAULT_HEX_PRECISION_F64)
    };
    let prec = precision.or(Some(default_prec));
    let mut buf = [0u8; 48];
    let mut len = 0usize;
    format_hex(&split, mantissa, mantissa_bits, exp, prec, uppercase, |b| {
        if len < buf.len() {
            buf[len] = b;
            len += 1;
        }
    });
    let sign = sign_char(negative, flags);
    emit_body(sink, count, sign, &[], &buf[..len], width, flags);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::BufSink;

    fn run(fmt: &str, args: &[Arg]) -> (String, i32) {
        let mut buf = [0u8; 256];
        let mut sink = BufSink::new(&mut buf);
        let config = Config::default();
        let ret = pprintf(&mut sink, fmt.as_bytes(), args, &config);
        (String::from_utf8(buf[..sink.written()].to_vec()).unwrap(), ret)
    }

    #[test]
    fn literal_text_passes_through() {
        let (s, ret) = run("hello world", &[]);
        assert_eq!(s, "hello world");
        assert_eq!(ret, 11);
    }

    #[test]
    fn decimal_integer() {
        let (s, _) = run("%d", &[Arg::Signed(-42)]);
        assert_eq!(s, "-42");
    }

    #[test]
    fn zero_pad_with_width() {
        let (s, _) = run("%05d", &[Arg::Signed(7)]);
        assert_eq!(s, "00007");
    }

    #[test]
    fn precision_as_minimum_digits() {
        let (s, _) = run("%.5d", &[Arg::Signed(7)]);
        assert_eq!(s, "00007");
    }

    #[test]
    fn zero_value_zero_precision_is_empty() {
        let (s, _) = run("[%.0d]", &[Arg::Signed(0)]);
        assert_eq!(s, "[]");
    }

    #[test]
    fn plus_dominates_space_flag() {
        let (s, _) = run("%+ d", &[Arg::Signed(5)]);
        assert_eq!(s, "+5");
    }

    #[test]
    fn hex_alt_form_prefix() {
        let (s, _) = run("%#x", &[Arg::Unsigned(255)]);
        assert_eq!(s, "0xff");
    }

    #[test]
    fn octal_alt_form_leading_zero_not_duplicated() {
        let (s, _) = run("%#o", &[Arg::Unsigned(8)]);
        assert_eq!(s, "010");
        let (s, _) = run("%#o", &[Arg::Unsigned(0)]);
        assert_eq!(s, "0");
    }

    #[test]
    fn binary_conversion() {
        let (s, _) = run("%b", &[Arg::Unsigned(0b1010)]);
        assert_eq!(s, "1010");
    }

    #[test]
    fn string_with_precision_truncates() {
        let (s, _) = run("%.3s", &[Arg::Str("hello")]);
        assert_eq!(s, "hel");
    }

    #[test]
    fn field_width_never_truncates_overflowing_body() {
        let (s, _) = run("%2d", &[Arg::Signed(123456)]);
        assert_eq!(s, "123456");
    }

    #[test]
    fn star_width_from_argument() {
        let (s, _) = run("%*d", &[Arg::Signed(6), Arg::Signed(7)]);
        assert_eq!(s, "     7");
    }

    #[test]
    fn negative_star_width_left_justifies() {
        let (s, _) = run("%*d|", &[Arg::Signed(-6), Arg::Signed(7)]);
        assert_eq!(s, "7     |");
    }

    #[test]
    fn float_default_precision() {
        let (s, _) = run("%f", &[Arg::Float(1.5)]);
        assert_eq!(s, "1.500000");
    }

    #[test]
    fn malformed_directive_passes_through_literally() {
        let (s, _) = run("%q", &[]);
        assert_eq!(s, "%q");
    }

    #[test]
    fn percent_literal() {
        let (s, _) = run("100%%", &[]);
        assert_eq!(s, "100%");
    }

    #[test]
    fn writeback_records_running_count() {
        let cell = core::cell::Cell::new(0);
        let (s, _) = run("abc%ndef", &[Arg::WritebackTarget(WritebackCell::I32(&cell))]);
        assert_eq!(s, "abcdef");
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn writeback_honors_short_length_modifier() {
        let cell = core::cell::Cell::new(0i16);
        let (s, _) = run("abc%hndef", &[Arg::WritebackTarget(WritebackCell::I16(&cell))]);
        assert_eq!(s, "abcdef");
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn writeback_honors_char_length_modifier() {
        let cell = core::cell::Cell::new(0i8);
        let (s, _) = run("abc%hhndef", &[Arg::WritebackTarget(WritebackCell::I8(&cell))]);
        assert_eq!(s, "abcdef");
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn writeback_honors_long_long_length_modifier() {
        let cell = core::cell::Cell::new(0i64);
        let (s, _) = run("abc%llndef", &[Arg::WritebackTarget(WritebackCell::I64(&cell))]);
        assert_eq!(s, "abcdef");
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn writeback_honors_intmax_length_modifier() {
        let cell = core::cell::Cell::new(0i64);
        let (s, _) = run("abc%jndef", &[Arg::WritebackTarget(WritebackCell::I64(&cell))]);
        assert_eq!(s, "abcdef");
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn return_value_counts_bytes_beyond_buffer() {
        let mut buf = [0u8; 2];
        let mut sink = BufSink::new(&mut buf);
        let config = Config::default();
        let ret = pprintf(&mut sink, b"hello", &[], &config);
        assert_eq!(ret, 5);
        assert_eq!(sink.written(), 2);
    }

    #[test]
    fn disabled_toggle_falls_back_to_literal() {
        let mut buf = [0u8; 64];
        let mut sink = BufSink::new(&mut buf);
        let mut config = Config::default();
        config.binary = false;
        let ret = pprintf(&mut sink, b"%b", &[Arg::Unsigned(5)], &config);
        assert_eq!(&buf[..ret as usize], b"%b");
    }
}
