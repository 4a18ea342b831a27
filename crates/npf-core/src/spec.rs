//! Format-specifier parser.
//!
//! Decodes one `%`-directive into a normalized [`FormatSpec`] record: a
//! state machine over flags, width, precision, length modifier, and
//! conversion letter, walked in that strict grammar order. Malformed input
//! is signaled by returning `None`; the driver is responsible for then
//! copying the directive back out as literal text.

/// Flags parsed from a printf format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// `-`
    pub left_justify: bool,
    /// `+` (wins over `space_sign` when both are present)
    pub force_sign: bool,
    /// ` `
    pub space_sign: bool,
    /// `#`
    pub alt_form: bool,
    /// `0` (suppressed by `left_justify` and by an explicit numeric precision)
    pub zero_pad: bool,
}

/// Field width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    /// `*`: width comes from the next argument.
    FromArg,
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    /// `.*`: precision comes from the next argument.
    FromArg,
}

/// Length modifier selecting the native argument width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    /// `hh`
    Hh,
    /// `h`
    H,
    /// `l`
    L,
    /// `ll`
    Ll,
    /// `j` (intmax_t)
    J,
    /// `z` (size_t)
    Z,
    /// `t` (ptrdiff_t)
    T,
    /// `L` (long double)
    BigL,
}

/// Conversion kind, independent of case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conv {
    Percent,
    Char,
    String,
    SignedInt,
    UnsignedInt,
    Octal,
    Hex,
    Binary,
    Pointer,
    /// `%n`: writes the running byte count through a pointer, emits nothing.
    Writeback,
    FloatDec,
    FloatSci,
    FloatShortest,
    FloatHex,
}

impl Conv {
    /// Whether this conversion consumes a fractional-precision argument at
    /// all (percent/char/writeback never do; pointer's precision is
    /// implementation-controlled rather than user-controlled).
    fn precision_meaningful(self) -> bool {
        !matches!(self, Conv::Percent | Conv::Char | Conv::Writeback)
    }

    fn is_integral(self) -> bool {
        matches!(
            self,
            Conv::SignedInt | Conv::UnsignedInt | Conv::Octal | Conv::Hex | Conv::Binary
        )
    }
}

/// A fully parsed printf format directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conv: Conv,
    /// `true` for the uppercase member of a conversion pair (`X`, `E`, `G`,
    /// `A`, `F`, `B`); meaningless for conversions with no case pairing.
    pub uppercase: bool,
}

/// Parse one directive from `fmt`, which must be positioned just *after*
/// the introducing `%`. Returns the parsed spec and the number of bytes
/// consumed counting from `fmt[0]` (so the driver's total consumed length,
/// including the `%` itself, is `1 + consumed`). Returns `None` on any
/// malformed directive; the caller never advances past `fmt.len()`.
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    let mut flags = FormatFlags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        if pos < len && fmt[pos] == b'*' {
            pos += 1;
            Precision::FromArg
        } else if pos < len && fmt[pos] == b'-' {
            // A literal `-` here means "absent", not "negative"; consume it
            // and any digits that follow so the conversion letter is still
            // found in the right place.
            pos += 1;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::None
        } else {
            let start = pos;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::Fixed(if pos > start {
                parse_decimal(&fmt[start..pos])
            } else {
                0
            })
        }
    } else {
        Precision::None
    };

    let length = if pos < len {
        match fmt[pos] {
            b'h' if fmt.get(pos + 1) == Some(&b'h') => {
                pos += 2;
                LengthMod::Hh
            }
            b'h' => {
                pos += 1;
                LengthMod::H
            }
            b'l' if fmt.get(pos + 1) == Some(&b'l') => {
                pos += 2;
                LengthMod::Ll
            }
            b'l' => {
                pos += 1;
                LengthMod::L
            }
            b'j' => {
                pos += 1;
                LengthMod::J
            }
            b'z' => {
                pos += 1;
                LengthMod::Z
            }
            b't' => {
                pos += 1;
                LengthMod::T
            }
            b'L' => {
                pos += 1;
                LengthMod::BigL
            }
            _ => LengthMod::None,
        }
    } else {
        LengthMod::None
    };

    if pos >= len {
        return None;
    }
    let letter = fmt[pos];
    pos += 1;

    let (conv, uppercase) = match letter {
        b'%' => (Conv::Percent, false),
        b'c' => (Conv::Char, false),
        b's' => (Conv::String, false),
        b'd' | b'i' => (Conv::SignedInt, false),
        b'u' => (Conv::UnsignedInt, false),
        b'o' => (Conv::Octal, false),
        b'x' => (Conv::Hex, false),
        b'X' => (Conv::Hex, true),
        b'b' => (Conv::Binary, false),
        b'B' => (Conv::Binary, true),
        b'p' => (Conv::Pointer, false),
        b'n' => (Conv::Writeback, false),
        b'f' => (Conv::FloatDec, false),
        b'F' => (Conv::FloatDec, true),
        b'e' => (Conv::FloatSci, false),
        b'E' => (Conv::FloatSci, true),
        b'g' => (Conv::FloatShortest, false),
        b'G' => (Conv::FloatShortest, true),
        b'a' => (Conv::FloatHex, false),
        b'A' => (Conv::FloatHex, true),
        _ => return None,
    };

    let mut spec = FormatSpec {
        flags,
        width,
        precision,
        length,
        conv,
        uppercase,
    };
    normalize(&mut spec);
    Some((spec, pos))
}

/// Post-parse normalization per the conversion kind: precision that carries
/// no meaning is dropped, and zero-padding that an explicit precision
/// overrides is dropped.
fn normalize(spec: &mut FormatSpec) {
    if !spec.conv.precision_meaningful() {
        spec.precision = Precision::None;
    }
    if matches!(spec.conv, Conv::String | Conv::Writeback) {
        spec.flags.zero_pad = false;
    }
    if spec.conv.is_integral() && !matches!(spec.precision, Precision::None) {
        spec.flags.zero_pad = false;
    }
}

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0usize;
    for &d in digits {
        result = result.saturating_mul(10).saturating_add((d - b'0') as usize);
    }
    result
}
