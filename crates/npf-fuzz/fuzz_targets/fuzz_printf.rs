#![no_main]

use libfuzzer_sys::fuzz_target;

use npf_core::{Arg, BufSink};

/// Split arbitrary fuzzer bytes into a format-string prefix and a small
/// pile of scalar arguments derived from the remaining bytes, then drive
/// the engine through a fixed-size sink. The only invariant this checks
/// is "never panics, never reads past what the parser is handed" —
/// correctness of rendered output is covered by `npf-harness`.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split = data.len() / 2;
    let (fmt_bytes, arg_bytes) = data.split_at(split);
    let Ok(fmt) = core::str::from_utf8(fmt_bytes) else {
        return;
    };

    let args: Vec<Arg> = arg_bytes
        .chunks(8)
        .map(|chunk| {
            let mut padded = [0u8; 8];
            padded[..chunk.len()].copy_from_slice(chunk);
            let bits = u64::from_le_bytes(padded);
            if bits & 1 == 0 {
                Arg::Signed(bits as i64)
            } else {
                Arg::Float(f64::from_bits(bits))
            }
        })
        .collect();

    let mut buf = [0u8; 512];
    let mut sink = BufSink::new(&mut buf);
    let _ = npf_abi::pprintf(&mut sink, fmt.as_bytes(), &args);
});
