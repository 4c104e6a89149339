// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! RawBlock - Storage and capacity manager.
//!
//! Owns the allocate/release protocol and the relocation machinery.
//! Every reallocating path acquires the new block fully before the old
//! one is touched; a failed allocation leaves the block untouched.

use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

use palisade_alloc::{AllocError, RawAlloc};

/// A contiguous block of element slots owned through an allocation
/// strategy.
///
/// Tracks the pointer, the slot count, and the strategy instance that
/// produced the block. Knows nothing about which slots hold live
/// elements; destroying them before release is the owner's job.
pub(crate) struct RawBlock<T, A: RawAlloc<T>> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

/// Destroys and releases a partially filled block on unwind.
///
/// Disarmed with `mem::forget` once the fill completes.
struct FillGuard<'a, T, A: RawAlloc<T>> {
    alloc: &'a A,
    ptr: NonNull<T>,
    cap: usize,
    built: usize,
}

impl<T, A: RawAlloc<T>> Drop for FillGuard<'_, T, A> {
    fn drop(&mut self) {
        unsafe {
            for i in 0..self.built {
                self.alloc.destroy(self.ptr.as_ptr().add(i));
            }
            self.alloc.deallocate(self.ptr, self.cap);
        }
    }
}

impl<T, A: RawAlloc<T>> RawBlock<T, A> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// A capacity-0 block. Performs no allocation.
    pub(crate) fn dangling(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Acquires a block of exactly `count` uninitialized slots.
    pub(crate) fn allocate_exact(alloc: A, count: usize) -> Result<Self, AllocError> {
        let ptr = alloc.allocate(count)?;

        Ok(Self {
            ptr,
            cap: count,
            alloc,
            _marker: PhantomData,
        })
    }

    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Slot count. Zero-sized elements never need storage, so their
    /// capacity is unbounded.
    pub(crate) fn capacity(&self) -> usize {
        if Self::IS_ZST { usize::MAX } else { self.cap }
    }

    pub(crate) fn alloc(&self) -> &A {
        &self.alloc
    }

    /// Replaces the current block with one of exactly `new_cap` slots,
    /// bitwise-relocating `live` elements around an optional gap of
    /// `gap_size` uninitialized slots opening at `gap_index`.
    ///
    /// The new block is fully acquired before the old one is released;
    /// on failure the block (and every live element) is untouched. Used
    /// for growth and for shrinking alike.
    pub(crate) fn reallocate(
        &mut self,
        new_cap: usize,
        live: usize,
        gap_index: usize,
        gap_size: usize,
    ) -> Result<(), AllocError> {
        debug_assert!(gap_index <= live);
        debug_assert!(Self::IS_ZST || live + gap_size <= new_cap);

        if Self::IS_ZST {
            return Ok(());
        }

        let new_ptr = self.alloc.allocate(new_cap)?;

        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), gap_index);
            ptr::copy_nonoverlapping(
                self.ptr.as_ptr().add(gap_index),
                new_ptr.as_ptr().add(gap_index + gap_size),
                live - gap_index,
            );
            self.alloc.deallocate(self.ptr, self.cap);
        }

        self.ptr = new_ptr;
        self.cap = new_cap;

        Ok(())
    }

    /// Replaces the current block with a fresh one of exactly `count`
    /// slots filled by `fill`, destroying the `live` elements of the old
    /// block only after the new one is fully constructed.
    ///
    /// If `fill` panics, the partial new block is destroyed and released
    /// and the old block survives intact.
    pub(crate) fn replace_with_filled<F>(
        &mut self,
        count: usize,
        live: usize,
        mut fill: F,
    ) -> Result<(), AllocError>
    where
        F: FnMut(usize) -> T,
    {
        let new_ptr = self.alloc.allocate(count)?;

        let mut guard = FillGuard {
            alloc: &self.alloc,
            ptr: new_ptr,
            cap: count,
            built: 0,
        };

        for i in 0..count {
            unsafe {
                guard.alloc.construct(guard.ptr.as_ptr().add(i), fill(i));
            }
            guard.built += 1;
        }

        mem::forget(guard);

        unsafe {
            for i in 0..live {
                self.alloc.destroy(self.ptr.as_ptr().add(i));
            }
            self.alloc.deallocate(self.ptr, self.cap);
        }

        self.ptr = new_ptr;
        self.cap = count;

        Ok(())
    }
}

impl<T, A: RawAlloc<T>> Drop for RawBlock<T, A> {
    fn drop(&mut self) {
        // Elements are destroyed by the owner first; this only returns
        // the memory.
        unsafe { self.alloc.deallocate(self.ptr, self.cap) };
    }
}
