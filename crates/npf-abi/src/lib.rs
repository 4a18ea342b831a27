//! # npf-abi
//!
//! `extern "C"` boundary layer over the `npf-core` formatting engine.
//!
//! This crate produces a `cdylib` exposing a minimal C-callable printf
//! entry point (`npf_pprintf_raw`); its safe Rust API (`pprintf`,
//! `snprintf`) is what the rest of the workspace (and any Rust caller)
//! actually uses day to day. Every allocation-free, bounds-respecting
//! decision is made in `npf-core`/`npf-membrane`; this crate is purely a
//! thin boundary around them.
//!
//! Real C variadic (`...`) entry points are out of scope (would require
//! nightly `c_variadic`); `npf_pprintf_raw` documents the equivalent
//! fixed-arity shape instead.

pub mod printf_abi;

pub use printf_abi::{npf_pprintf_raw, pprintf, snprintf};
