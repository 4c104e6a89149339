// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! HeapAlloc - Default strategy over the global heap.

use core::alloc::Layout;
use core::mem::size_of;
use core::ptr::NonNull;

use alloc::alloc as heap;

use crate::error::AllocError;
use crate::traits::RawAlloc;

/// Allocation strategy backed by the global heap.
///
/// Stateless; every instance draws from the same pool, so blocks may be
/// released through any instance.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct HeapAlloc;

impl<T> RawAlloc<T> for HeapAlloc {
    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        if count == 0 || size_of::<T>() == 0 {
            return Ok(NonNull::dangling());
        }

        let layout = Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow)?;

        // SAFETY: count > 0 and T is not zero-sized, so the layout has
        // non-zero size.
        let ptr = unsafe { heap::alloc(layout) };

        NonNull::new(ptr.cast::<T>()).ok_or(AllocError::OutOfMemory {
            bytes: layout.size(),
        })
    }

    unsafe fn deallocate(&self, block: NonNull<T>, count: usize) {
        if count == 0 || size_of::<T>() == 0 {
            return;
        }

        // SAFETY: allocate() succeeded with this count, so the layout is
        // computable and matches the block.
        unsafe {
            let layout = Layout::array::<T>(count).unwrap_unchecked();
            heap::dealloc(block.as_ptr().cast::<u8>(), layout);
        }
    }
}
