// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for palisade-vec.
use thiserror::Error;

use palisade_alloc::AllocError;

/// Errors that can occur when operating on a [`DynVec`](crate::DynVec).
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum DynVecError {
    /// A position was outside the live element range.
    #[error("index {index} is out of range for length {len}")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// The container length at the time of the call.
        len: usize,
    },

    /// The allocation strategy failed; the container is unchanged.
    #[error(transparent)]
    Alloc(#[from] AllocError),
}
