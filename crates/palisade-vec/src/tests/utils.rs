// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test allocators and drop-accounting helpers.

use std::cell::Cell;
use std::mem::size_of;
use std::ptr::NonNull;
use std::rc::Rc;

use palisade_alloc::{AllocError, HeapAlloc, RawAlloc};

fn is_real_block<T>(count: usize) -> bool {
    count > 0 && size_of::<T>() > 0
}

// =============================================================================
// CountingAlloc
// =============================================================================

#[derive(Default)]
pub struct AllocLedger {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
}

/// Heap strategy that records every real block it hands out or takes
/// back. Clones share the ledger.
#[derive(Clone, Default)]
pub struct CountingAlloc {
    ledger: Rc<AllocLedger>,
}

impl CountingAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocations(&self) -> usize {
        self.ledger.allocations.get()
    }

    pub fn live_blocks(&self) -> usize {
        self.ledger.allocations.get() - self.ledger.deallocations.get()
    }
}

impl<T> RawAlloc<T> for CountingAlloc {
    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let block = HeapAlloc.allocate(count)?;

        if is_real_block::<T>(count) {
            self.ledger.allocations.set(self.ledger.allocations.get() + 1);
        }

        Ok(block)
    }

    unsafe fn deallocate(&self, block: NonNull<T>, count: usize) {
        if is_real_block::<T>(count) {
            self.ledger
                .deallocations
                .set(self.ledger.deallocations.get() + 1);
        }

        unsafe { HeapAlloc.deallocate(block, count) };
    }

    fn same_pool(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ledger, &other.ledger)
    }
}

// =============================================================================
// FailingAlloc
// =============================================================================

/// Heap strategy that fails every real allocation once its budget of
/// successes is spent. Clones share the budget.
#[derive(Clone)]
pub struct FailingAlloc {
    budget: Rc<Cell<usize>>,
}

impl FailingAlloc {
    pub fn after(successes: usize) -> Self {
        Self {
            budget: Rc::new(Cell::new(successes)),
        }
    }
}

impl<T> RawAlloc<T> for FailingAlloc {
    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        if !is_real_block::<T>(count) {
            return HeapAlloc.allocate(count);
        }

        if self.budget.get() == 0 {
            return Err(AllocError::OutOfMemory {
                bytes: size_of::<T>() * count,
            });
        }

        self.budget.set(self.budget.get() - 1);

        HeapAlloc.allocate(count)
    }

    unsafe fn deallocate(&self, block: NonNull<T>, count: usize) {
        unsafe { HeapAlloc.deallocate(block, count) };
    }

    fn same_pool(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.budget, &other.budget)
    }
}

// =============================================================================
// Drop accounting
// =============================================================================

#[derive(Default)]
pub struct DropLedger {
    created: Cell<usize>,
    dropped: Cell<usize>,
}

impl DropLedger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn dropped(&self) -> usize {
        self.dropped.get()
    }

    pub fn balanced(&self) -> bool {
        self.created.get() == self.dropped.get()
    }
}

/// Element whose constructions and drops are tallied on a shared
/// ledger. Cloning counts as a construction.
pub struct DropToken {
    pub value: i32,
    ledger: Rc<DropLedger>,
}

impl DropToken {
    pub fn new(ledger: &Rc<DropLedger>, value: i32) -> Self {
        ledger.created.set(ledger.created.get() + 1);

        Self {
            value,
            ledger: Rc::clone(ledger),
        }
    }
}

impl Clone for DropToken {
    fn clone(&self) -> Self {
        Self::new(&self.ledger, self.value)
    }
}

impl Drop for DropToken {
    fn drop(&mut self) {
        self.ledger.dropped.set(self.ledger.dropped.get() + 1);
    }
}
