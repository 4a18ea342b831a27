//! Float rendering: fixed, scientific, shortest, and hex-float forms.
//!
//! Each formatter writes digits (no sign, no field padding) through a
//! caller-supplied closure; the assembler is the one place that knows
//! about signs, width, and justification. Working this way keeps the
//! float-specific digit logic free of padding concerns entirely.

use crate::fsplit::{split_f32, split_f64, FloatClass, Split, MAX_FRAC_DIGITS};
use crate::intconv::{decimal_digit_count, render_digits, SCRATCH_LEN};

/// Default precision applied when none was given in the directive.
pub const DEFAULT_DEC_PRECISION: usize = 6;
pub const DEFAULT_SCI_PRECISION: usize = 6;
pub const DEFAULT_SHORTEST_PRECISION: usize = 6;
/// Default hex-float precision: exact binary fraction bit count expressed
/// in hex nibbles (13 for a 52-bit `f64` mantissa, 6 for a 23-bit `f32`
/// mantissa rounded up).
pub const DEFAULT_HEX_PRECISION_F64: usize = 13;
pub const DEFAULT_HEX_PRECISION_F32: usize = 6;

/// A rendered float body, emitted digit-by-digit through `out`.
pub enum FloatClassName {
    Nan,
    Inf,
}

pub fn class_name_text(name: FloatClassName, uppercase: bool) -> &'static str {
    match (name, uppercase) {
        (FloatClassName::Nan, false) => "nan",
        (FloatClassName::Nan, true) => "NAN",
        (FloatClassName::Inf, false) => "inf",
        (FloatClassName::Inf, true) => "INF",
    }
}

fn classify(split: &Split) -> Option<FloatClassName> {
    match split.class {
        FloatClass::Nan => Some(FloatClassName::Nan),
        FloatClass::Infinite => Some(FloatClassName::Inf),
        _ => None,
    }
}

fn digit_char(d: u8) -> u8 {
    b'0' + d
}

fn hex_digit_char(d: u8, uppercase: bool) -> u8 {
    if d < 10 {
        b'0' + d
    } else if uppercase {
        b'A' + d - 10
    } else {
        b'a' + d - 10
    }
}

/// Add one to the rightmost digit of `digits` (each entry a base-`base`
/// digit value, most significant first), propagating the carry leftward.
/// Returns `true` if the carry ran off the front of the slice (every
/// digit was `base - 1`), meaning the caller must account for it outside
/// the slice (a new leading digit, or a bump to the next digit over).
fn propagate_carry(digits: &mut [u8], base: u8) -> bool {
    for d in digits.iter_mut().rev() {
        if *d + 1 == base {
            *d = 0;
        } else {
            *d += 1;
            return false;
        }
    }
    true
}

/// The fractional decimal digit at position `pos` (0-indexed from the
/// decimal point), reading through the split's leading-zero run and then
/// its explicit digit buffer; positions past both are exact zeros.
fn frac_digit_at(split: &Split, pos: usize) -> u8 {
    let lz = split.frac_leading_zeros as usize;
    if pos < lz {
        0
    } else {
        let j = pos - lz;
        if j < split.frac_digit_count {
            split.frac_digits[j]
        } else {
            0
        }
    }
}

/// Fixed notation (`%f`): `int_part.frac_part`, with `precision` digits
/// after the decimal point, rounded (round-half-away-from-zero) rather
/// than truncated when the digit run continues past `precision`.
pub fn format_dec(split: &Split, precision: usize, alt_form: bool, mut out: impl FnMut(u8)) {
    if let Some(name) = classify(split) {
        for b in class_name_text(name, false).bytes() {
            out(b);
        }
        return;
    }

    let mut int_scratch = [0u8; SCRATCH_LEN];
    let rendered = render_digits(&mut int_scratch, split.int_part, 10, false);
    let mut int_digits = [0u8; SCRATCH_LEN];
    let mut int_len = rendered.len();
    for (i, &b) in rendered.iter().enumerate() {
        int_digits[i] = b - b'0';
    }

    let kept = precision.min(MAX_FRAC_DIGITS);
    let mut frac_digits = [0u8; MAX_FRAC_DIGITS];
    for (i, d) in frac_digits.iter_mut().enumerate().take(kept) {
        *d = frac_digit_at(split, i);
    }

    if precision <= MAX_FRAC_DIGITS && frac_digit_at(split, precision) >= 5 {
        let carry = propagate_carry(&mut frac_digits[..kept], 10);
        if carry && propagate_carry(&mut int_digits[..int_len], 10) {
            for i in (0..int_len).rev() {
                int_digits[i + 1] = int_digits[i];
            }
            int_digits[0] = 1;
            int_len += 1;
        }
    }

    for &d in &int_digits[..int_len] {
        out(digit_char(d));
    }

    if precision == 0 && !alt_form {
        return;
    }
    out(b'.');
    for i in 0..precision {
        let d = if i < kept { frac_digits[i] } else { 0 };
        out(digit_char(d));
    }
}

/// Scientific notation (`%e`): one leading digit, `.`, `precision`
/// fractional digits (rounded half-away-from-zero), then `e±NN`.
pub fn format_sci(split: &Split, precision: usize, alt_form: bool, uppercase: bool, mut out: impl FnMut(u8)) {
    if let Some(name) = classify(split) {
        for b in class_name_text(name, uppercase).bytes() {
            out(b);
        }
        return;
    }

    let (lead_digit, mut exp10, rest_digits, rest_count) = normalize_to_scientific(split);
    let mut lead = lead_digit;
    let kept = precision.min(MAX_FRAC_DIGITS);
    let mut kept_digits = rest_digits;

    if precision <= MAX_FRAC_DIGITS {
        let next = if precision < rest_count { rest_digits[precision] } else { 0 };
        if next >= 5 {
            let carry = propagate_carry(&mut kept_digits[..kept], 10);
            if carry {
                if lead == 9 {
                    lead = 1;
                    exp10 += 1;
                } else {
                    lead += 1;
                }
            }
        }
    }

    out(digit_char(lead));
    if precision > 0 || alt_form {
        out(b'.');
        for i in 0..precision {
            let d = if i < kept { kept_digits[i] } else { 0 };
            out(digit_char(d));
        }
    }
    out(if uppercase { b'E' } else { b'e' });
    out(if exp10 < 0 { b'-' } else { b'+' });
    let mag = exp10.unsigned_abs();
    let mut scratch = [0u8; SCRATCH_LEN];
    let exp_digits = render_digits(&mut scratch, mag as u128, 10, false);
    if exp_digits.len() < 2 {
        out(b'0');
    }
    for &b in exp_digits {
        out(b);
    }
}

/// Shortest representation (`%g`): picks fixed or scientific depending on
/// the decimal exponent versus precision, then strips trailing zeros
/// (and a trailing bare `.`) unless the alt-form flag keeps them.
pub fn format_shortest(
    split: &Split,
    precision: usize,
    alt_form: bool,
    uppercase: bool,
    mut out: impl FnMut(u8),
) {
    if let Some(name) = classify(split) {
        for b in class_name_text(name, uppercase).bytes() {
            out(b);
        }
        return;
    }

    let precision = precision.max(1);
    let (_, exp10, _, _) = normalize_to_scientific(split);

    if exp10 < -4 || exp10 >= precision as i32 {
        let sci_precision = precision - 1;
        if alt_form {
            format_sci(split, sci_precision, true, uppercase, out);
        } else {
            let mut buf = [0u8; 64];
            let mut len = 0usize;
            format_sci(split, sci_precision, false, uppercase, |b| {
                if len < buf.len() {
                    buf[len] = b;
                    len += 1;
                }
            });
            strip_trailing_zeros_scientific(&buf[..len], &mut out);
        }
        return;
    }

    let dec_precision = (precision as i32 - 1 - exp10).max(0) as usize;
    if alt_form {
        format_dec(split, dec_precision, true, out);
    } else {
        let mut buf = [0u8; 64];
        let mut len = 0usize;
        format_dec(split, dec_precision, false, |b| {
            if len < buf.len() {
                buf[len] = b;
                len += 1;
            }
        });
        strip_trailing_zeros_fixed(&buf[..len], &mut out);
    }
}

/// Hex float (`%a`): `0x1.MMMMp±E` form with an exact power-of-two
/// exponent and hex-nibble mantissa digits, rounded half-to-even when
/// `precision` cuts the nibble stream short.
pub fn format_hex(
    split: &Split,
    mantissa: u64,
    mantissa_bits: u32,
    exp: i64,
    precision: Option<usize>,
    uppercase: bool,
    mut out: impl FnMut(u8),
) {
    if let Some(name) = classify(split) {
        for b in class_name_text(name, uppercase).bytes() {
            out(b);
        }
        return;
    }

    let (prefix, p_char) = if uppercase { ("0X", b'P') } else { ("0x", b'p') };
    for b in prefix.bytes() {
        out(b);
    }

    let is_zero = matches!(split.class, FloatClass::Zero);
    let nibble_count = ((mantissa_bits + 3) / 4) as usize;

    let mut nibbles = [0u8; 16];
    if !is_zero {
        for (i, n) in nibbles.iter_mut().enumerate().take(nibble_count) {
            let shift = (mantissa_bits as u64).saturating_sub(((i as u64) + 1) * 4);
            *n = ((mantissa >> shift) & 0xf) as u8;
        }
    }

    let mut lead: u8 = if is_zero { 0 } else { 1 };
    let mut exp_out = exp;
    let want = precision.unwrap_or(nibble_count);

    if !is_zero && want < nibble_count {
        let next = nibbles[want];
        let any_after = nibbles[want + 1..nibble_count].iter().any(|&n| n != 0);
        let round_up = match next.cmp(&8) {
            core::cmp::Ordering::Greater => true,
            core::cmp::Ordering::Equal => {
                if any_after {
                    true
                } else {
                    let last_kept_odd = if want > 0 { nibbles[want - 1] % 2 == 1 } else { lead % 2 == 1 };
                    last_kept_odd
                }
            }
            core::cmp::Ordering::Less => false,
        };

        if round_up && propagate_carry(&mut nibbles[..want], 16) {
            // All kept nibbles were `f`; the carry rolls them to `0` and
            // bumps into the leading digit, which pushes the value to the
            // next power of two (1.111..f rounds up to 10.000 = 1.0 * 2^1).
            lead += 1;
            if lead == 2 {
                lead = 1;
                exp_out += 1;
            }
        }
    }

    out(if is_zero { b'0' } else { hex_digit_char(lead, uppercase) });
    out(b'.');
    for &n in &nibbles[..want] {
        out(hex_digit_char(n, uppercase));
    }

    out(p_char);
    out(if exp_out < 0 { b'-' } else { b'+' });
    let mag = exp_out.unsigned_abs();
    let mut scratch = [0u8; SCRATCH_LEN];
    let exp_digits = render_digits(&mut scratch, mag as u128, 10, false);
    for &b in exp_digits {
        out(b);
    }
}

/// Reduce a split value to `(lead_digit, exp10, rest_digits, rest_count)`
/// where `lead_digit . rest_digits` is the normalized `d.ddd × 10^exp10`
/// form, computed purely from the already-split integer/fraction digits
/// (no further float arithmetic).
fn normalize_to_scientific(split: &Split) -> (u8, i32, [u8; MAX_FRAC_DIGITS], usize) {
    let mut rest = [0u8; MAX_FRAC_DIGITS];

    if split.int_part > 0 {
        let int_digit_count = decimal_digit_count(split.int_part) as i32;
        let mut scratch = [0u8; SCRATCH_LEN];
        let digits = render_digits(&mut scratch, split.int_part, 10, false);
        let lead = digits[0] - b'0';
        let mut count = 0usize;
        for &d in &digits[1..] {
            rest[count] = d - b'0';
            count += 1;
        }
        for i in 0..split.frac_digit_count {
            if count >= MAX_FRAC_DIGITS {
                break;
            }
            rest[count] = split.frac_digits[i];
            count += 1;
        }
        return (lead, int_digit_count - 1, rest, count);
    }

    if split.frac_digit_count == 0 {
        return (0, 0, rest, 0);
    }

    let lead = split.frac_digits[0];
    let mut count = 0usize;
    for i in 1..split.frac_digit_count {
        rest[count] = split.frac_digits[i];
        count += 1;
    }
    let exp10 = -(split.frac_leading_zeros as i32) - 1;
    (lead, exp10, rest, count)
}

fn strip_trailing_zeros_fixed(buf: &[u8], out: &mut impl FnMut(u8)) {
    if let Some(dot) = buf.iter().position(|&b| b == b'.') {
        let mut end = buf.len();
        while end > dot + 1 && buf[end - 1] == b'0' {
            end -= 1;
        }
        if end == dot + 1 {
            end = dot;
        }
        for &b in &buf[..end] {
            out(b);
        }
    } else {
        for &b in buf {
            out(b);
        }
    }
}

fn strip_trailing_zeros_scientific(buf: &[u8], out: &mut impl FnMut(u8)) {
    let e_pos = buf.iter().position(|&b| b == b'e' || b == b'E').unwrap_or(buf.len());
    strip_trailing_zeros_fixed(&buf[..e_pos], out);
    for &b in &buf[e_pos..] {
        out(b);
    }
}

/// Split an `f64` into a body [`Split`] plus the raw mantissa bits and
/// unbiased exponent `format_hex` needs for exact power-of-two rendering.
pub fn split_f64_for_format(x: f64) -> (Split, u64, i64) {
    let bits = x.abs().to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i64;
    let mantissa = bits & 0x000f_ffff_ffff_ffff;
    (split_f64(bits), mantissa, biased_exp - 1023)
}

pub fn split_f32_for_format(x: f32) -> (Split, u64, i64) {
    let bits = x.abs().to_bits();
    let biased_exp = ((bits >> 23) & 0xff) as i64;
    let mantissa = (bits & 0x007f_ffff) as u64;
    (split_f32(bits), mantissa, biased_exp - 127)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(split: &Split, precision: usize) -> String {
        let mut s = String::new();
        format_dec(split, precision, false, |b| s.push(b as char));
        s
    }

    #[test]
    fn dec_renders_whole_number_with_zero_padding() {
        let (split, _, _) = split_f64_for_format(1.5);
        assert_eq!(render(&split, 2), "1.50");
    }

    #[test]
    fn dec_default_precision_pads_to_six() {
        let (split, _, _) = split_f64_for_format(3.0);
        assert_eq!(render(&split, 6), "3.000000");
    }

    #[test]
    fn nan_and_inf_ignore_precision() {
        let (split, _, _) = split_f64_for_format(f64::NAN);
        assert_eq!(render(&split, 4), "nan");
        let (split, _, _) = split_f64_for_format(f64::INFINITY);
        assert_eq!(render(&split, 4), "inf");
    }

    #[test]
    fn sci_normalizes_leading_digit() {
        let (split, _, _) = split_f64_for_format(1234.5);
        let mut s = String::new();
        format_sci(&split, 2, false, false, |b| s.push(b as char));
        assert_eq!(s, "1.23e+03");
    }

    #[test]
    fn shortest_picks_fixed_for_small_exponent() {
        let (split, _, _) = split_f64_for_format(123.456);
        let mut s = String::new();
        format_shortest(&split, 6, false, false, |b| s.push(b as char));
        assert_eq!(s, "123.456");
    }

    #[test]
    fn shortest_picks_scientific_for_large_exponent() {
        let (split, _, _) = split_f64_for_format(123456789.0);
        let mut s = String::new();
        format_shortest(&split, 6, false, false, |b| s.push(b as char));
        assert_eq!(s, "1.23457e+08");
    }

    #[test]
    fn dec_rounds_half_away_from_zero_at_precision_boundary() {
        let (split, _, _) = split_f64_for_format(1.5);
        assert_eq!(render(&split, 0), "2");
    }

    #[test]
    fn dec_rounding_carries_through_nines() {
        let (split, _, _) = split_f64_for_format(9.999_6);
        let mut s = String::new();
        format_dec(&split, 3, false, |b| s.push(b as char));
        assert_eq!(s, "10.000");
    }

    #[test]
    fn sci_rounding_carries_lead_digit_and_bumps_exponent() {
        let (split, _, _) = split_f64_for_format(9.996);
        let mut s = String::new();
        format_sci(&split, 2, false, false, |b| s.push(b as char));
        assert_eq!(s, "1.00e+01");
    }

    #[test]
    fn hex_exact_power_of_two_has_real_exponent() {
        let (split, mantissa, exp) = split_f64_for_format(8.0);
        let mut s = String::new();
        format_hex(&split, mantissa, 52, exp, Some(0), false, |b| s.push(b as char));
        assert_eq!(s, "0x1.p+3");
    }

    #[test]
    fn hex_zero_precision_pads_mantissa_nibbles() {
        let (split, mantissa, exp) = split_f64_for_format(8.0);
        let mut s = String::new();
        format_hex(&split, mantissa, 52, exp, Some(4), false, |b| s.push(b as char));
        assert_eq!(s, "0x1.0000p+3");
    }

    fn finite_split() -> Split {
        Split {
            class: FloatClass::Finite,
            int_part: 1,
            frac_digits: [0; MAX_FRAC_DIGITS],
            frac_digit_count: 0,
            frac_leading_zeros: 0,
            overflow: false,
        }
    }

    #[test]
    fn hex_exact_tie_rounds_to_even_when_last_kept_nibble_is_even() {
        let split = finite_split();
        // Nibbles 1,2,4,8,0,0,... — the discarded run starts with an exact
        // `8` tie and the last kept nibble (`4`) is even, so it stays put.
        let mantissa = 0x1248_0000_0000_0u64;
        let mut s = String::new();
        format_hex(&split, mantissa, 52, 0, Some(3), false, |b| s.push(b as char));
        assert_eq!(s, "0x1.124p+0");
    }

    #[test]
    fn hex_exact_tie_rounds_up_when_last_kept_nibble_is_odd() {
        let split = finite_split();
        // Same tie, but the last kept nibble (`5`) is odd, so round-to-even
        // bumps it to `6`.
        let mantissa = 0x1258_0000_0000_0u64;
        let mut s = String::new();
        format_hex(&split, mantissa, 52, 0, Some(3), false, |b| s.push(b as char));
        assert_eq!(s, "0x1.126p+0");
    }
}
