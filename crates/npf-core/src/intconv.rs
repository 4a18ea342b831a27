//! Integer conversion: length-modifier masking and base rendering.
//!
//! Digits are produced in reverse (least significant first) into a
//! stack-local scratch buffer, then the filled region is handed back as a
//! forward-order slice. Everything here runs on `u128` so the same
//! rendering path serves both plain integer conversions and the
//! arbitrary-precision integer part a split float can produce.

use crate::spec::LengthMod;

/// Large enough for a full `u128` in binary (128 digits) plus an alt-form
/// prefix; the float formatter also borrows this buffer for `u128`
/// decimal rendering of a split integer part.
pub const SCRATCH_LEN: usize = 128;

/// Apply a length modifier's truncation to an unsigned value, matching the
/// native width the modifier names. `None` truncates to `unsigned int`
/// (32-bit) per the default C promotion; `l`/`ll`/`j`/`z`/`t` are all
/// treated as 64-bit on this engine's LP64 target model.
pub fn mask_unsigned(value: u64, length: LengthMod) -> u64 {
    match length {
        LengthMod::Hh => value as u8 as u64,
        LengthMod::H => value as u16 as u64,
        LengthMod::None => value as u32 as u64,
        LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T => value,
        LengthMod::BigL => value,
    }
}

/// Apply a length modifier's truncation to a signed value, sign-extending
/// from the narrowed width the way a real `va_arg` read of that width
/// would.
pub fn mask_signed(value: i64, length: LengthMod) -> i64 {
    match length {
        LengthMod::Hh => value as i8 as i64,
        LengthMod::H => value as i16 as i64,
        LengthMod::None => value as i32 as i64,
        LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T => value,
        LengthMod::BigL => value,
    }
}

/// Render `value` in `base` (2, 8, 10, or 16) into `scratch`, filling from
/// the tail backward. Returns the occupied slice, already in forward
/// (most-significant-first) order; `0` renders as the single digit `"0"`.
pub fn render_digits(scratch: &mut [u8; SCRATCH_LEN], value: u128, base: u128, uppercase: bool) -> &[u8] {
    let digits: &[u8; 16] = if uppercase {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut v = value;
    let mut idx = SCRATCH_LEN;
    loop {
        idx -= 1;
        scratch[idx] = digits[(v % base) as usize];
        v /= base;
        if v == 0 {
            break;
        }
    }
    &scratch[idx..]
}

/// Number of decimal digits `value` renders as (`0` counts as one digit).
/// Used by the float formatter to know how many digits a split integer or
/// fractional part occupies without re-rendering it.
pub fn decimal_digit_count(mut value: u128) -> u32 {
    if value == 0 {
        return 1;
    }
    let mut count = 0;
    while value > 0 {
        count += 1;
        value /= 10;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_renders_as_single_digit() {
        let mut scratch = [0u8; SCRATCH_LEN];
        assert_eq!(render_digits(&mut scratch, 0, 10, false), b"0");
    }

    #[test]
    fn decimal_round_trip() {
        let mut scratch = [0u8; SCRATCH_LEN];
        assert_eq!(render_digits(&mut scratch, 1234567890, 10, false), b"1234567890");
    }

    #[test]
    fn hex_case_follows_flag() {
        let mut scratch = [0u8; SCRATCH_LEN];
        assert_eq!(render_digits(&mut scratch, 0xdead_beef, 16, false), b"deadbeef");
        let mut scratch = [0u8; SCRATCH_LEN];
        assert_eq!(render_digits(&mut scratch, 0xdead_beef, 16, true), b"DEADBEEF");
    }

    #[test]
    fn binary_rendering() {
        let mut scratch = [0u8; SCRATCH_LEN];
        assert_eq!(render_digits(&mut scratch, 0b1011, 2, false), b"1011");
    }

    #[test]
    fn u128_full_width_renders() {
        let mut scratch = [0u8; SCRATCH_LEN];
        let digits = render_digits(&mut scratch, u128::MAX, 10, false);
        assert_eq!(digits, u128::MAX.to_string().as_bytes());
    }

    #[test]
    fn mask_truncates_to_named_width() {
        assert_eq!(mask_unsigned(0x1_2345, LengthMod::Hh), 0x45);
        assert_eq!(mask_unsigned(0x1_2345, LengthMod::H), 0x2345);
        assert_eq!(mask_unsigned(0x1_0000_2345, LengthMod::None), 0x2345);
        assert_eq!(mask_unsigned(0x1_0000_2345, LengthMod::L), 0x1_0000_2345);
    }

    #[test]
    fn mask_signed_sign_extends() {
        assert_eq!(mask_signed(-1i64, LengthMod::Hh), -1);
        assert_eq!(mask_signed(255, LengthMod::Hh), -1);
    }

    #[test]
    fn digit_count_matches_rendered_length() {
        assert_eq!(decimal_digit_count(0), 1);
        assert_eq!(decimal_digit_count(9), 1);
        assert_eq!(decimal_digit_count(10), 2);
        assert_eq!(decimal_digit_count(999), 3);
    }
}
