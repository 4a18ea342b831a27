//! Throughput benchmarks for the formatting engine across representative
//! format strings: integer-heavy, float-heavy, and string-heavy.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use npf_core::{Arg, BufSink};

fn render(fmt: &str, args: &[Arg]) -> usize {
    let mut buf = [0u8; 256];
    let mut sink = BufSink::new(&mut buf);
    npf_abi::pprintf(&mut sink, fmt.as_bytes(), args) as usize
}

fn bench_integers(c: &mut Criterion) {
    c.bench_function("printf_integers", |b| {
        b.iter(|| {
            black_box(render(
                "%d %05x %#o %+ld",
                &[
                    Arg::Signed(-12345),
                    Arg::Unsigned(0xDEAD_BEEF),
                    Arg::Unsigned(0o17),
                    Arg::Signed(987_654_321),
                ],
            ));
        });
    });
}

fn bench_floats(c: &mut Criterion) {
    c.bench_function("printf_floats", |b| {
        b.iter(|| {
            black_box(render(
                "%.3f %e %g",
                &[Arg::Float(3.14159265), Arg::Float(6.022e23), Arg::Float(0.0001)],
            ));
        });
    });
}

fn bench_strings(c: &mut Criterion) {
    c.bench_function("printf_strings", |b| {
        b.iter(|| {
            black_box(render(
                "%-20s|%10s|%.3s",
                &[Arg::Str("left justified"), Arg::Str("right"), Arg::Str("truncated")],
            ));
        });
    });
}

fn bench_mixed_with_width(c: &mut Criterion) {
    c.bench_function("printf_mixed_star_width", |b| {
        b.iter(|| {
            black_box(render(
                "[%*.*d] [%-*s]",
                &[
                    Arg::Signed(10),
                    Arg::Signed(4),
                    Arg::Signed(42),
                    Arg::Signed(12),
                    Arg::Str("hi"),
                ],
            ));
        });
    });
}

criterion_group!(benches, bench_integers, bench_floats, bench_strings, bench_mixed_with_width);
criterion_main!(benches);
