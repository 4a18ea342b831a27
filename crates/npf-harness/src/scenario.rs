//! End-to-end scenarios and universal properties exercised against the
//! real `npf-core`/`npf-abi` engine — no simulated or recorded output,
//! every check drives an actual `pprintf` call.

use core::cell::Cell;

use npf_core::{Arg, WritebackCell};
use serde::Serialize;

/// A harness-local stand-in for [`npf_core::Arg`] that can live in a
/// `'static` table; converted to the real argument cursor right before
/// the call.
#[derive(Debug, Clone)]
pub enum ScenarioArg {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Str(&'static str),
    /// An `%n` writeback target. The runner allocates the backing cell.
    Writeback,
}

/// One format/arguments/expected-output row.
pub struct Scenario {
    pub name: &'static str,
    pub fmt: &'static str,
    pub args: &'static [ScenarioArg],
    pub expected_output: &'static str,
    pub expected_return: i32,
    pub expected_writeback: Option<i32>,
}

/// What actually came back from running a [`Scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub rendered: String,
    pub return_value: i32,
    pub writeback: Option<i32>,
}

/// Render `scenario` through the live engine and capture what happened.
pub fn run(scenario: &Scenario) -> ScenarioOutcome {
    let writeback_cells: Vec<Cell<i32>> = scenario
        .args
        .iter()
        .filter(|a| matches!(a, ScenarioArg::Writeback))
        .map(|_| Cell::new(0))
        .collect();

    let mut cells = writeback_cells.iter();
    let args: Vec<Arg> = scenario
        .args
        .iter()
        .map(|a| match a {
            ScenarioArg::Signed(v) => Arg::Signed(*v),
            ScenarioArg::Unsigned(v) => Arg::Unsigned(*v),
            ScenarioArg::Float(v) => Arg::Float(*v),
            ScenarioArg::Str(s) => Arg::Str(s),
            ScenarioArg::Writeback => Arg::WritebackTarget(WritebackCell::I32(
                cells.next().expect("one cell per writeback arg"),
            )),
        })
        .collect();

    let mut buf = [0u8; 256];
    let mut sink = npf_core::BufSink::new(&mut buf);
    let return_value = npf_abi::pprintf(&mut sink, scenario.fmt.as_bytes(), &args);
    let rendered = String::from_utf8_lossy(&buf[..sink.written()]).into_owned();

    ScenarioOutcome {
        rendered,
        return_value,
        writeback: writeback_cells.first().map(Cell::get),
    }
}

/// Whether a scenario's actual outcome matched what it expected.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub passed: bool,
    pub expected_output: String,
    pub actual_output: String,
    pub expected_return: i32,
    pub actual_return: i32,
}

pub fn evaluate(scenario: &Scenario) -> ScenarioResult {
    let outcome = run(scenario);
    let writeback_ok = scenario.expected_writeback == outcome.writeback;
    let passed = outcome.rendered == scenario.expected_output
        && outcome.return_value == scenario.expected_return
        && writeback_ok;

    ScenarioResult {
        name: scenario.name,
        passed,
        expected_output: scenario.expected_output.to_string(),
        actual_output: outcome.rendered,
        expected_return: scenario.expected_return,
        actual_return: outcome.return_value,
    }
}

/// The seed scenario table: ten concrete format/argument/expectation
/// rows every conformant build must reproduce exactly.
pub const SEED_SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "min_i32_decimal",
        fmt: "%d",
        args: &[ScenarioArg::Signed(-2147483648)],
        expected_output: "-2147483648",
        expected_return: 11,
        expected_writeback: None,
    },
    Scenario {
        name: "plus_zero_pad_width",
        fmt: "%+05d",
        args: &[ScenarioArg::Signed(42)],
        expected_output: "+0042",
        expected_return: 5,
        expected_writeback: None,
    },
    Scenario {
        name: "left_justified_string",
        fmt: "%-10s|",
        args: &[ScenarioArg::Str("hi")],
        expected_output: "hi        |",
        expected_return: 11,
        expected_writeback: None,
    },
    Scenario {
        name: "alt_form_hex",
        fmt: "%#x",
        args: &[ScenarioArg::Unsigned(0xABCD)],
        expected_output: "0xabcd",
        expected_return: 6,
        expected_writeback: None,
    },
    Scenario {
        name: "fixed_precision_float",
        fmt: "%.3f",
        args: &[ScenarioArg::Float(1.5)],
        expected_output: "1.500",
        expected_return: 5,
        expected_writeback: None,
    },
    Scenario {
        name: "star_width_and_precision",
        fmt: "%*.*d",
        args: &[
            ScenarioArg::Signed(6),
            ScenarioArg::Signed(3),
            ScenarioArg::Signed(7),
        ],
        expected_output: "   007",
        expected_return: 6,
        expected_writeback: None,
    },
    Scenario {
        name: "writeback_running_count",
        fmt: "|%n|",
        args: &[ScenarioArg::Writeback],
        expected_output: "||",
        expected_return: 2,
        expected_writeback: Some(1),
    },
    Scenario {
        name: "shortest_fixed_notation",
        fmt: "%g",
        args: &[ScenarioArg::Float(0.0001)],
        expected_output: "0.0001",
        expected_return: 6,
        expected_writeback: None,
    },
    Scenario {
        name: "shortest_scientific_notation",
        fmt: "%g",
        args: &[ScenarioArg::Float(0.00001)],
        expected_output: "1e-05",
        expected_return: 5,
        expected_writeback: None,
    },
    Scenario {
        name: "precision_overrides_zero_pad",
        fmt: "%05.3d",
        args: &[ScenarioArg::Signed(42)],
        expected_output: "  042",
        expected_return: 5,
        expected_writeback: None,
    },
];

/// Result of checking one universal property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyResult {
    pub property: &'static str,
    pub description: &'static str,
    pub passed: bool,
    pub detail: Option<String>,
}

fn render(fmt: &str, args: &[Arg]) -> (String, i32) {
    let mut buf = [0u8; 256];
    let mut sink = npf_core::BufSink::new(&mut buf);
    let ret = npf_abi::pprintf(&mut sink, fmt.as_bytes(), args);
    (String::from_utf8_lossy(&buf[..sink.written()]).into_owned(), ret)
}

fn p1_parser_totality() -> PropertyResult {
    let mut all_pass = true;
    let mut detail = String::new();
    for fmt in ["%", "%z", "%9999999999999999999d", "%-+ #0d"] {
        let (out, ret) = render(fmt, &[Arg::Signed(1)]);
        if ret < 0 {
            all_pass = false;
            detail.push_str(&format!("{fmt:?} produced a negative return ({out:?}); "));
        }
    }
    PropertyResult {
        property: "P1",
        description: "parser totality: malformed directives pass through, never panic or read past NUL",
        passed: all_pass,
        detail: if detail.is_empty() { None } else { Some(detail) },
    }
}

fn p2_flag_duplicate_idempotence() -> PropertyResult {
    let cases: &[(&str, &str)] = &[("%---d", "%-d"), ("%++d", "%+d"), ("%  d", "% d"), ("%##x", "%#x"), ("%00d", "%0d")];
    let mut all_pass = true;
    for (dup, single) in cases {
        let (a, _) = render(dup, &[Arg::Signed(7)]);
        let (b, _) = render(single, &[Arg::Signed(7)]);
        if a != b {
            all_pass = false;
        }
    }
    PropertyResult {
        property: "P2",
        description: "duplicate flags are idempotent",
        passed: all_pass,
        detail: None,
    }
}

fn p3_integer_round_trip() -> PropertyResult {
    let mut all_pass = true;
    for (fmt, radix, value) in [("%x", 16u32, 0xDEAD_BEEFu64), ("%o", 8, 0o1234), ("%d", 10, 999_999), ("%b", 2, 0b1010_1010)] {
        let (out, _) = render(fmt, &[Arg::Unsigned(value)]);
        let parsed = u64::from_str_radix(&out, radix).unwrap_or(u64::MAX);
        if parsed != value {
            all_pass = false;
        }
    }
    PropertyResult {
        property: "P3",
        description: "integer round-trip through every radix",
        passed: all_pass,
        detail: None,
    }
}

fn p4_zero_is_one_digit() -> PropertyResult {
    let mut all_pass = true;
    for fmt in ["%d", "%x", "%o", "%b"] {
        let (out, _) = render(fmt, &[Arg::Unsigned(0)]);
        if out != "0" {
            all_pass = false;
        }
    }
    PropertyResult {
        property: "P4",
        description: "zero renders as exactly one digit at every radix",
        passed: all_pass,
        detail: None,
    }
}

fn p5_field_width_never_truncates() -> PropertyResult {
    let (out, _) = render("%3d", &[Arg::Signed(123456)]);
    PropertyResult {
        property: "P5",
        description: "field width never truncates content longer than the width",
        passed: out == "123456",
        detail: None,
    }
}

fn p6_zero_pad_suppressed_by_precision() -> PropertyResult {
    let (out, _) = render("%08.3d", &[Arg::Signed(7)]);
    PropertyResult {
        property: "P6",
        description: "precision suppresses zero-padding in favor of space-padding",
        passed: out == "     007",
        detail: Some(out),
    }
}

fn p7_plus_dominates_space() -> PropertyResult {
    let (out, _) = render("%+ d", &[Arg::Signed(5)]);
    PropertyResult {
        property: "P7",
        description: "'+' dominates space for positive signed output",
        passed: out == "+5",
        detail: Some(out),
    }
}

fn p8_precision_is_minimum_digits() -> PropertyResult {
    let (a, _) = render("%.4d", &[Arg::Signed(0)]);
    let (b, _) = render("%.0d", &[Arg::Signed(0)]);
    PropertyResult {
        property: "P8",
        description: "precision on an integer sets the minimum digit count; .0 of zero is empty",
        passed: a == "0000" && b.is_empty(),
        detail: Some(format!("{a:?}/{b:?}")),
    }
}

fn p9_return_value_correctness() -> PropertyResult {
    let (out, ret) = render("hello %s", &[Arg::Str("world")]);
    let mut buf = [0u8; 4];
    let mut small = npf_core::BufSink::new(&mut buf);
    let truncated_ret = npf_abi::pprintf(&mut small, b"hello %s", &[Arg::Str("world")]);
    PropertyResult {
        property: "P9",
        description: "pprintf's return equals the exact number of sink calls, regardless of sink capacity",
        passed: ret as usize == out.len() && truncated_ret == ret,
        detail: None,
    }
}

/// Run all nine universal properties.
pub fn check_properties() -> Vec<PropertyResult> {
    vec![
        p1_parser_totality(),
        p2_flag_duplicate_idempotence(),
        p3_integer_round_trip(),
        p4_zero_is_one_digit(),
        p5_field_width_never_truncates(),
        p6_zero_pad_suppressed_by_precision(),
        p7_plus_dominates_space(),
        p8_precision_is_minimum_digits(),
        p9_return_value_correctness(),
    ]
}
