// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for the RawBlock storage manager.

use palisade_alloc::HeapAlloc;

use crate::raw::RawBlock;
use crate::tests::utils::{CountingAlloc, DropLedger, DropToken, FailingAlloc};

fn write_sequence(block: &RawBlock<u32, HeapAlloc>, len: usize) {
    for i in 0..len {
        unsafe { block.ptr().add(i).write(i as u32) };
    }
}

fn read_at(block: &RawBlock<u32, HeapAlloc>, index: usize) -> u32 {
    unsafe { block.ptr().add(index).read() }
}

// =============================================================================
// dangling() / allocate_exact()
// =============================================================================

#[test]
fn test_dangling_has_no_capacity() {
    let block: RawBlock<u32, HeapAlloc> = RawBlock::dangling(HeapAlloc);

    assert_eq!(block.capacity(), 0);
}

#[test]
fn test_allocate_exact_capacity() {
    let block: RawBlock<u32, HeapAlloc> =
        RawBlock::allocate_exact(HeapAlloc, 16).expect("Failed to allocate_exact()");

    assert_eq!(block.capacity(), 16);
}

// =============================================================================
// reallocate()
// =============================================================================

#[test]
fn test_reallocate_preserves_live_prefix() {
    let mut block: RawBlock<u32, HeapAlloc> =
        RawBlock::allocate_exact(HeapAlloc, 4).expect("Failed to allocate_exact()");
    write_sequence(&block, 4);

    block.reallocate(8, 4, 4, 0).expect("Failed to reallocate()");

    assert_eq!(block.capacity(), 8);
    for i in 0..4 {
        assert_eq!(read_at(&block, i), i as u32);
    }
}

#[test]
fn test_reallocate_opens_gap() {
    let mut block: RawBlock<u32, HeapAlloc> =
        RawBlock::allocate_exact(HeapAlloc, 4).expect("Failed to allocate_exact()");
    write_sequence(&block, 4);

    // Two raw slots open at index 1; the suffix lands past them.
    block.reallocate(6, 4, 1, 2).expect("Failed to reallocate()");

    assert_eq!(read_at(&block, 0), 0);
    assert_eq!(read_at(&block, 3), 1);
    assert_eq!(read_at(&block, 4), 2);
    assert_eq!(read_at(&block, 5), 3);
}

#[test]
fn test_reallocate_shrinks() {
    let mut block: RawBlock<u32, HeapAlloc> =
        RawBlock::allocate_exact(HeapAlloc, 10).expect("Failed to allocate_exact()");
    write_sequence(&block, 3);

    block.reallocate(3, 3, 3, 0).expect("Failed to reallocate()");

    assert_eq!(block.capacity(), 3);
    for i in 0..3 {
        assert_eq!(read_at(&block, i), i as u32);
    }
}

#[test]
fn test_reallocate_failure_keeps_block() {
    let alloc = FailingAlloc::after(1);
    let mut block: RawBlock<u32, FailingAlloc> =
        RawBlock::allocate_exact(alloc, 4).expect("Failed to allocate_exact()");

    for i in 0..4 {
        unsafe { block.ptr().add(i).write(i as u32) };
    }

    assert!(block.reallocate(8, 4, 4, 0).is_err());

    assert_eq!(block.capacity(), 4);
    for i in 0..4 {
        assert_eq!(unsafe { block.ptr().add(i).read() }, i as u32);
    }
}

#[test]
fn test_reallocate_releases_old_block() {
    let alloc = CountingAlloc::new();
    let mut block: RawBlock<u32, CountingAlloc> =
        RawBlock::allocate_exact(alloc.clone(), 2).expect("Failed to allocate_exact()");

    block.reallocate(4, 0, 0, 0).expect("Failed to reallocate()");

    assert_eq!(alloc.allocations(), 2);
    assert_eq!(alloc.live_blocks(), 1);

    drop(block);

    assert_eq!(alloc.live_blocks(), 0);
}

// =============================================================================
// replace_with_filled()
// =============================================================================

#[test]
fn test_replace_with_filled_destroys_old_elements() {
    let ledger = DropLedger::new();
    let mut block: RawBlock<DropToken, HeapAlloc> =
        RawBlock::allocate_exact(HeapAlloc, 2).expect("Failed to allocate_exact()");

    for i in 0..2 {
        unsafe { block.ptr().add(i).write(DropToken::new(&ledger, i as i32)) };
    }

    block
        .replace_with_filled(3, 2, |i| DropToken::new(&ledger, 100 + i as i32))
        .expect("Failed to replace_with_filled()");

    // The two originals were destroyed after the three new ones built.
    assert_eq!(ledger.created(), 5);
    assert_eq!(ledger.dropped(), 2);

    unsafe {
        for i in 0..3 {
            assert_eq!((*block.ptr().add(i)).value, 100 + i as i32);
        }
    }
}

#[test]
fn test_replace_with_filled_failure_keeps_block() {
    let alloc = FailingAlloc::after(1);
    let mut block: RawBlock<u32, FailingAlloc> =
        RawBlock::allocate_exact(alloc, 2).expect("Failed to allocate_exact()");

    for i in 0..2 {
        unsafe { block.ptr().add(i).write(7 + i as u32) };
    }

    assert!(block.replace_with_filled(4, 2, |i| i as u32).is_err());

    assert_eq!(block.capacity(), 2);
    assert_eq!(unsafe { block.ptr().read() }, 7);
}
