//! Safe entry points over the formatting engine, plus a minimal
//! `extern "C"` shim for embedding from C.
//!
//! The safe functions here are what almost every caller wants:
//! allocation-free, bounds-respecting, and panicking only on a logic bug
//! in this crate, never on untrusted input. The `extern "C"` function
//! below is the one place this crate's `unsafe_code = "allow"` lint
//! actually gets exercised — everything it does is forward to the safe
//! API after validating the raw pointers it was handed.

use core::ffi::{c_char, c_int, c_void};

use npf_core::{Arg, BufSink, Sink};
use npf_membrane as membrane;

/// Render `fmt` against `args` through `sink`, returning the printf
/// return-value convention (bytes that would have been written, clamped
/// to `i32`). Uses the live configuration registry's current snapshot.
pub fn pprintf(sink: &mut impl Sink, fmt: &[u8], args: &[Arg]) -> i32 {
    membrane::metrics::record_invocation();
    let config = membrane::registry().snapshot();
    npf_core::pprintf(sink, fmt, args, &config)
}

/// `snprintf`: bounded write into `buf`, always NUL-terminating when
/// `buf` is non-empty. Returns the bytes that *would* have been written
/// (excluding the NUL), matching the C return-value contract, even when
/// the content was truncated to fit.
pub fn snprintf(buf: &mut [u8], fmt: &[u8], args: &[Arg]) -> i32 {
    membrane::metrics::record_invocation();
    let config = membrane::registry().snapshot();

    let mut counting = npf_core::CountingSink::new();
    let _ = npf_core::pprintf(&mut counting, fmt, args, &config);
    let content_len = counting.count;

    let policy = if config.safe_empty_on_overflow {
        membrane::OverflowPolicy::SafeEmpty
    } else {
        membrane::OverflowPolicy::Truncate
    };
    let decision = membrane::decide_copy(content_len, buf.len(), policy);

    match decision.disposition {
        membrane::Disposition::Deny => {}
        _ => {
            let mut sink = BufSink::new(&mut buf[..decision.effective_len.min(buf.len())]);
            let config = membrane::registry().snapshot();
            let _ = npf_core::pprintf(&mut sink, fmt, args, &config);
            if decision.effective_len < buf.len() {
                buf[decision.effective_len] = 0;
            }
        }
    }

    content_len.clamp(0, i32::MAX as usize) as i32
}

/// `extern "C" fn` shim matching the C sink contract: a function pointer
/// plus an opaque context, called once per emitted byte. Neither pointer
/// is dereferenced until both have been checked for null.
///
/// # Safety
///
/// `fmt` must point to a valid, NUL-terminated byte string; `put` must be
/// a valid function pointer safe to call with `ctx` for every byte of
/// output; `args`/`arg_count` must describe a valid `&[Arg]` slice.
#[no_mangle]
pub unsafe extern "C" fn npf_pprintf_raw(
    put: Option<extern "C" fn(c_char, *mut c_void)>,
    ctx: *mut c_void,
    fmt: *const c_char,
    args: *const Arg,
    arg_count: usize,
) -> c_int {
    let (Some(put), false) = (put, fmt.is_null()) else {
        return -1;
    };

    let mut len = 0usize;
    while *fmt.add(len) != 0 {
        len += 1;
    }
    let fmt_bytes = core::slice::from_raw_parts(fmt as *const u8, len);
    let args = if args.is_null() || arg_count == 0 {
        &[][..]
    } else {
        core::slice::from_raw_parts(args, arg_count)
    };

    struct CShim {
        put: extern "C" fn(c_char, *mut c_void),
        ctx: *mut c_void,
    }
    impl Sink for CShim {
        fn push(&mut self, byte: u8) -> bool {
            (self.put)(byte as c_char, self.ctx);
            true
        }
    }

    let mut shim = CShim { put, ctx };
    pprintf(&mut shim, fmt_bytes, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pprintf_renders_through_the_live_registry() {
        let mut buf = [0u8; 32];
        let mut sink = BufSink::new(&mut buf);
        let ret = pprintf(&mut sink, b"%d-%d", &[Arg::Signed(1), Arg::Signed(2)]);
        assert_eq!(ret, 3);
        assert_eq!(&buf[..sink.written()], b"1-2");
    }

    #[test]
    fn snprintf_nul_terminates_within_capacity() {
        let mut buf = [0xffu8; 8];
        let ret = snprintf(&mut buf, b"hello", &[]);
        assert_eq!(ret, 5);
        assert_eq!(&buf[..6], b"hello\0");
    }

    #[test]
    fn snprintf_truncates_but_reports_full_length() {
        let mut buf = [0u8; 4];
        let ret = snprintf(&mut buf, b"hello world", &[]);
        assert_eq!(ret, 11);
        assert_eq!(&buf[..3], b"hel");
        assert_eq!(buf[3], 0);
    }

    #[test]
    fn snprintf_zero_capacity_writes_nothing() {
        let mut buf: [u8; 0] = [];
        let ret = snprintf(&mut buf, b"hello", &[]);
        assert_eq!(ret, 5);
    }
}
