// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Pluggable allocation strategies for contiguous element storage.
//!
//! This crate defines the boundary between a container and the memory it
//! lives in. A [`RawAlloc`] strategy acquires and releases raw blocks of
//! element slots and performs per-slot construction and destruction; the
//! container never touches the global heap directly.
//!
//! # Strategy Contract
//!
//! - `allocate(count)` hands out a block of exactly `count` uninitialized
//!   slots, or fails with [`AllocError`]. It never constructs elements.
//! - `deallocate(block, count)` releases a block previously obtained from
//!   the same instance with the same `count`. It never destroys elements.
//! - `construct`/`destroy` move a value into a slot and drop a slot in
//!   place. Strategies may intercept these (pooling, tracing); the
//!   defaults forward to `ptr::write` and `ptr::drop_in_place`.
//! - Zero-size requests (`count == 0`, or a zero-sized `T`) must return a
//!   dangling pointer and treat the matching `deallocate` as a no-op.
//!
//! # Example
//!
//! ```rust
//! use palisade_alloc::{AllocError, HeapAlloc, RawAlloc};
//!
//! fn example() -> Result<(), AllocError> {
//!     let heap = HeapAlloc;
//!     let block = heap.allocate(4)?;
//!
//!     unsafe {
//!         heap.construct(block.as_ptr(), 7u32);
//!         assert_eq!(block.as_ptr().read(), 7);
//!         heap.destroy(block.as_ptr());
//!         heap.deallocate(block, 4);
//!     }
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod error;
mod heap;
mod traits;

pub use error::AllocError;
pub use heap::HeapAlloc;
pub use traits::RawAlloc;
