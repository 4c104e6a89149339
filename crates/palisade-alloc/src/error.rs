// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for palisade-alloc.
use thiserror::Error;

/// Errors produced by an allocation strategy.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocError {
    /// The requested element count cannot be expressed as a memory block
    /// (layout arithmetic overflowed, or the count exceeds the strategy's
    /// [`max_count`](crate::RawAlloc::max_count)).
    #[error("requested element count overflows the allocatable range")]
    CapacityOverflow,

    /// The strategy could not provide the requested block.
    #[error("allocation of {bytes} bytes failed")]
    OutOfMemory {
        /// Size of the failed request in bytes.
        bytes: usize,
    },
}
