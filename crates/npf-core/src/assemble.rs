//! Output assembly: sign, alternate-form prefix, width, and justification.
//!
//! This is the one place padding decisions get made. Every conversion
//! hands the assembler a sign (already decided), an optional prefix
//! (`0x`, `0`, ...), and a rendered digit body; the assembler decides how
//! those three pieces interleave with padding to reach the requested
//! field width.

use crate::arg::Sink;
use crate::spec::FormatFlags;

/// One emitted field, already reduced to its three components.
pub struct Field<'a> {
    pub sign: Option<u8>,
    pub prefix: &'a [u8],
    pub body: &'a [u8],
}

/// Write `field` into `sink`, padding to `width` per `flags`.
///
/// Zero-padding goes *between* the sign/prefix and the body, so `-007`
/// rather than `00-7`; space-padding goes on whichever side
/// `left_justify` selects. Returns the number of bytes this call
/// contributed to the running output-length count (independent of how
/// many the sink actually accepted).
pub fn emit_field(sink: &mut impl Sink, field: &Field, width: usize, flags: FormatFlags) -> usize {
    let content_len = field.sign.is_some() as usize + field.prefix.len() + field.body.len();
    let pad_len = width.saturating_sub(content_len);
    let mut written = 0usize;

    let mut push = |b: u8, sink: &mut dyn Sink| {
        sink.push(b);
        written += 1;
    };

    if flags.left_justify {
        if let Some(s) = field.sign {
            push(s, sink);
        }
        for &b in field.prefix {
            push(b, sink);
        }
        for &b in field.body {
            push(b, sink);
        }
        for _ in 0..pad_len {
            push(b' ', sink);
        }
    } else if flags.zero_pad {
        if let Some(s) = field.sign {
            push(s, sink);
        }
        for &b in field.prefix {
            push(b, sink);
        }
        for _ in 0..pad_len {
            push(b'0', sink);
        }
        for &b in field.body {
            push(b, sink);
        }
    } else {
        for _ in 0..pad_len {
            push(b' ', sink);
        }
        if let Some(s) = field.sign {
            push(s, sink);
        }
        for &b in field.prefix {
            push(b, sink);
        }
        for &b in field.body {
            push(b, sink);
        }
    }

    written
}

/// Decide the sign character (or none) for a numeric value, per the
/// standard `+` over ` ` precedence (parsing already enforces that at
/// most one of the two survives in `flags`, but this stays defensive).
pub fn sign_char(negative: bool, flags: FormatFlags) -> Option<u8> {
    if negative {
        Some(b'-')
    } else if flags.force_sign {
        Some(b'+')
    } else if flags.space_sign {
        Some(b' ')
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::BufSink;

    fn run(field: &Field, width: usize, flags: FormatFlags) -> String {
        let mut buf = [0u8; 64];
        let mut sink = BufSink::new(&mut buf);
        let n = emit_field(&mut sink, field, width, flags);
        String::from_utf8(buf[..n.min(buf.len())].to_vec()).unwrap()
    }

    #[test]
    fn field_width_never_truncates_body() {
        let field = Field {
            sign: None,
            prefix: b"",
            body: b"12345",
        };
        assert_eq!(run(&field, 2, FormatFlags::default()), "12345");
    }

    #[test]
    fn zero_pad_goes_between_sign_and_body() {
        let field = Field {
            sign: Some(b'-'),
            prefix: b"",
            body: b"7",
        };
        let mut flags = FormatFlags::default();
        flags.zero_pad = true;
        assert_eq!(run(&field, 4, flags), "-007");
    }

    #[test]
    fn left_justify_pads_on_the_right() {
        let field = Field {
            sign: None,
            prefix: b"",
            body: b"7",
        };
        let mut flags = FormatFlags::default();
        flags.left_justify = true;
        assert_eq!(run(&field, 4, flags), "7   ");
    }

    #[test]
    fn prefix_survives_zero_padding() {
        let field = Field {
            sign: None,
            prefix: b"0x",
            body: b"ff",
        };
        let mut flags = FormatFlags::default();
        flags.zero_pad = true;
        assert_eq!(run(&field, 8, flags), "0x0000ff");
    }

    #[test]
    fn plus_dominates_space() {
        let mut flags = FormatFlags::default();
        flags.force_sign = true;
        flags.space_sign = true;
        assert_eq!(sign_char(false, flags), Some(b'+'));
    }

    #[test]
    fn negative_always_wins() {
        let mut flags = FormatFlags::default();
        flags.force_sign = true;
        assert_eq!(sign_char(true, flags), Some(b'-'));
    }
}
