// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Allocator-parameterized dynamic array with contiguous storage.
//!
//! [`DynVec<T, A>`] owns one contiguous block of element slots and
//! routes every allocate/release and per-element construct/destroy
//! through a [`RawAlloc`] strategy ([`HeapAlloc`] by default). It
//! replicates the working set of a standard vector: amortized-doubling
//! appends, positional insertion and removal, assignment with storage
//! reuse, exact reservation and shrinking, and a full iterator family.
//!
//! # Core Guarantees
//!
//! - **Fallible allocation**: every operation that may allocate returns
//!   `Result`; an allocation failure leaves the container exactly as it
//!   was. New storage is always acquired in full before old storage is
//!   released.
//! - **Tight invariants**: `len() <= capacity()` after every operation;
//!   slots past the length are never constructed, read, or dropped.
//! - **Slice interop**: `Deref<Target = [T]>` puts the whole slice API
//!   (indexing, sorting, searching, splitting) on top of the container.
//!
//! Move semantics come from the language: moving a `DynVec` transfers
//! the block wholesale, `core::mem::take` leaves an empty container
//! behind, and `core::mem::swap` exchanges two containers in constant
//! time without touching elements.
//!
//! # Example
//!
//! ```rust
//! use palisade_vec::{DynVec, DynVecError};
//!
//! fn example() -> Result<(), DynVecError> {
//!     let mut vec = DynVec::from_slice(&[1, 2, 3, 4, 5])?;
//!
//!     vec.reserve_exact(20)?;
//!     assert_eq!(vec.capacity(), 20);
//!
//!     vec.shrink_to_fit()?;
//!     assert_eq!(vec.capacity(), 5);
//!
//!     let doubled: Vec<i32> = vec.iter().map(|x| x * 2).collect();
//!     assert_eq!(doubled, [2, 4, 6, 8, 10]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Checked and Unchecked Access
//!
//! Indexing through the slice view panics on misuse like any slice;
//! [`DynVec::at`] reports [`DynVecError::OutOfRange`] instead; the
//! `unsafe` [`DynVec::get_unchecked`] skips the bounds check entirely
//! and makes the caller responsible, with a `debug_assert!` guarding
//! debug builds.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod error;
mod iter;
mod raw;
mod vec;

pub use error::DynVecError;
pub use iter::{IntoIter, Iter, IterMut};
pub use vec::DynVec;

pub use palisade_alloc::{AllocError, HeapAlloc, RawAlloc};
