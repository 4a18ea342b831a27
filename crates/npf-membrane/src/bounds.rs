//! Bounded-buffer decision policy for `snprintf`.
//!
//! The teacher's pointer-validation membrane resolves a proposed copy
//! into `Allow`/`Repair`/`Deny` against pointer facts before touching
//! memory. This module applies the identical three-way shape to the
//! `snprintf` bounded-buffer contract: the formatted content is always
//! computed and counted in full; what differs is how much of it actually
//! lands in the caller's buffer.

/// What to do once the content's true length is known against the
/// destination capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Content fits in `capacity - 1` bytes (room for the NUL); write it
    /// all.
    Allow,
    /// Content exceeds capacity; write a prefix (or nothing, under
    /// `SafeEmptyOnOverflow`) but still NUL-terminate.
    Repair,
    /// `capacity == 0`: nothing can be written, not even a NUL.
    Deny,
}

/// Overflow policy selecting how `Repair` behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Write as many leading bytes as fit, still NUL-terminated.
    Truncate,
    /// Write nothing but a NUL terminator (`SAFE_EMPTY_ON_OVERFLOW`).
    SafeEmpty,
}

/// The resolved decision for one `snprintf` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyDecision {
    pub disposition: Disposition,
    /// Bytes of formatted content to actually copy into the buffer
    /// (excludes the NUL terminator; `0` under `Deny` or `SafeEmpty`).
    pub effective_len: usize,
}

/// Decide how to satisfy a bounded write of `content_len` formatted bytes
/// into a buffer of `capacity` bytes (capacity includes room for the NUL).
#[must_use]
pub fn decide_copy(content_len: usize, capacity: usize, policy: OverflowPolicy) -> CopyDecision {
    if capacity == 0 {
        return CopyDecision {
            disposition: Disposition::Deny,
            effective_len: 0,
        };
    }
    let usable = capacity - 1;
    if content_len <= usable {
        return CopyDecision {
            disposition: Disposition::Allow,
            effective_len: content_len,
        };
    }
    match policy {
        OverflowPolicy::Truncate => CopyDecision {
            disposition: Disposition::Repair,
            effective_len: usable,
        },
        OverflowPolicy::SafeEmpty => CopyDecision {
            disposition: Disposition::Repair,
            effective_len: 0,
        },
    }
}
