// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! DynVec - Allocator-parameterized dynamic array.

use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut, Range};
use core::ptr;
use core::slice;

use palisade_alloc::{AllocError, HeapAlloc, RawAlloc};

use crate::error::DynVecError;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::raw::RawBlock;

/// A growable contiguous array routing every memory operation through an
/// allocation strategy.
///
/// Elements live in one exclusively-owned block; `len` of them are
/// initialized, the rest of the capacity is raw. Appends grow the block
/// by doubling, so a sequence of pushes costs amortized O(1) each;
/// explicit sizing operations ([`reserve_exact`](Self::reserve_exact),
/// [`resize`](Self::resize), [`shrink_to_fit`](Self::shrink_to_fit),
/// sized constructors, bulk inserts) allocate exactly what they are
/// asked for.
///
/// Every reallocating operation acquires the new block before the old
/// one is released; a failed allocation returns
/// [`DynVecError::Alloc`] and leaves the container untouched.
///
/// Reallocation moves the elements, so raw pointers from
/// [`as_ptr`](Self::as_ptr) do not survive any operation that may
/// reallocate. Borrowed iterators are protected by their lifetimes.
///
/// # Example
///
/// ```rust
/// use palisade_vec::{DynVec, DynVecError};
///
/// fn example() -> Result<(), DynVecError> {
///     let mut vec = DynVec::<u32>::new();
///
///     for i in 0..5 {
///         vec.push(i)?;
///     }
///
///     vec.insert(1, 42)?;
///     assert_eq!(vec.as_slice(), &[0, 42, 1, 2, 3, 4]);
///
///     let removed = vec.remove(1)?;
///     assert_eq!(removed, 42);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct DynVec<T, A: RawAlloc<T> = HeapAlloc> {
    buf: RawBlock<T, A>,
    len: usize,
}

impl<T> DynVec<T> {
    /// Creates an empty container on the global heap. Performs no
    /// allocation.
    pub fn new() -> Self {
        Self::new_in(HeapAlloc)
    }

    /// Creates an empty container with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, DynVecError> {
        Self::with_capacity_in(capacity, HeapAlloc)
    }

    /// Creates a container of `len` elements produced by `fill(index)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use palisade_vec::DynVec;
    ///
    /// let vec = DynVec::from_fn(4, |i| i * i).expect("Failed to from_fn()");
    /// assert_eq!(vec.as_slice(), &[0, 1, 4, 9]);
    /// ```
    pub fn from_fn<F>(len: usize, fill: F) -> Result<Self, DynVecError>
    where
        F: FnMut(usize) -> T,
    {
        Self::from_fn_in(len, fill, HeapAlloc)
    }

    /// Creates a container of `len` clones of `value`.
    pub fn from_elem(len: usize, value: T) -> Result<Self, DynVecError>
    where
        T: Clone,
    {
        Self::from_fn(len, |_| value.clone())
    }

    /// Creates a container holding a clone of every element of `values`.
    pub fn from_slice(values: &[T]) -> Result<Self, DynVecError>
    where
        T: Clone,
    {
        Self::from_slice_in(values, HeapAlloc)
    }

    /// Creates a container from an iterator, growing as needed.
    pub fn try_from_iter<I>(values: I) -> Result<Self, DynVecError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut vec = Self::new();
        vec.try_extend(values)?;

        Ok(vec)
    }
}

impl<T, A: RawAlloc<T>> DynVec<T, A> {
    /// Creates an empty container using `alloc`. Performs no allocation.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBlock::dangling(alloc),
            len: 0,
        }
    }

    /// Creates an empty container with exactly `capacity` slots drawn
    /// from `alloc`.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, DynVecError> {
        if capacity > alloc.max_count() {
            return Err(AllocError::CapacityOverflow.into());
        }

        Ok(Self {
            buf: RawBlock::allocate_exact(alloc, capacity)?,
            len: 0,
        })
    }

    /// Creates a container of `len` elements produced by `fill(index)`,
    /// drawn from `alloc`.
    pub fn from_fn_in<F>(len: usize, mut fill: F, alloc: A) -> Result<Self, DynVecError>
    where
        F: FnMut(usize) -> T,
    {
        let mut vec = Self::with_capacity_in(len, alloc)?;

        for i in 0..len {
            // SAFETY: slot i is within capacity and still raw; len
            // trails the constructed prefix so unwinding drops exactly
            // the live elements.
            unsafe { vec.buf.alloc().construct(vec.buf.ptr().add(i), fill(i)) };
            vec.len += 1;
        }

        Ok(vec)
    }

    /// Creates a container holding a clone of every element of `values`,
    /// drawn from `alloc`.
    pub fn from_slice_in(values: &[T], alloc: A) -> Result<Self, DynVecError>
    where
        T: Clone,
    {
        Self::from_fn_in(values.len(), |i| values[i].clone(), alloc)
    }

    /// Deep copy with an independently cloned allocator.
    ///
    /// The copy reserves the source's capacity, matching what a
    /// subsequent append sequence would have cost the source.
    pub fn try_clone(&self) -> Result<Self, DynVecError>
    where
        T: Clone,
        A: Clone,
    {
        self.try_clone_in(self.buf.alloc().clone())
    }

    /// Deep copy drawing storage from an explicitly supplied allocator.
    pub fn try_clone_in(&self, alloc: A) -> Result<Self, DynVecError>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(self.capacity(), alloc)?;
        vec.extend_from_slice(self.as_slice())?;

        Ok(vec)
    }

    // =========================================================================
    // Capacity
    // =========================================================================

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the container holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots currently allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Largest length the allocation strategy can back.
    pub fn max_count(&self) -> usize {
        self.buf.alloc().max_count()
    }

    /// Borrow of the allocation strategy instance.
    pub fn allocator(&self) -> &A {
        self.buf.alloc()
    }

    /// Ensures capacity for at least `min_capacity` elements,
    /// allocating exactly that many slots.
    ///
    /// A no-op when the current capacity already suffices.
    pub fn reserve_exact(&mut self, min_capacity: usize) -> Result<(), DynVecError> {
        if min_capacity <= self.capacity() {
            return Ok(());
        }

        if min_capacity > self.buf.alloc().max_count() {
            return Err(AllocError::CapacityOverflow.into());
        }

        self.buf.reallocate(min_capacity, self.len, self.len, 0)?;

        Ok(())
    }

    /// Reallocates down to exactly `len` slots. Never grows.
    pub fn shrink_to_fit(&mut self) -> Result<(), DynVecError> {
        if self.len == self.capacity() {
            return Ok(());
        }

        self.buf.reallocate(self.len, self.len, self.len, 0)?;

        Ok(())
    }

    // =========================================================================
    // Element access
    // =========================================================================

    /// Checked access.
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T, DynVecError> {
        if index < self.len {
            // SAFETY: index is within the live range.
            Ok(unsafe { &*self.buf.ptr().add(index) })
        } else {
            Err(DynVecError::OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Checked mutable access.
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, DynVecError> {
        if index < self.len {
            // SAFETY: index is within the live range.
            Ok(unsafe { &mut *self.buf.ptr().add(index) })
        } else {
            Err(DynVecError::OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Unchecked access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);

        unsafe { &*self.buf.ptr().add(index) }
    }

    /// Unchecked mutable access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);

        unsafe { &mut *self.buf.ptr().add(index) }
    }

    /// Base address of the storage.
    ///
    /// Dangling (but non-null) when capacity is 0; invalidated by any
    /// operation that may reallocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Mutable base address of the storage.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// The live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is the initialized prefix.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: [0, len) is the initialized prefix.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Shared cursor over the live elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slice())
    }

    /// Exclusive cursor over the live elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.as_mut_slice())
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Appends an element. Amortized O(1).
    pub fn push(&mut self, value: T) -> Result<(), DynVecError> {
        self.maybe_grow(1)?;

        // SAFETY: the slot at len is within capacity and raw.
        unsafe { self.buf.alloc().construct(self.buf.ptr().add(self.len), value) };
        self.len += 1;

        Ok(())
    }

    /// Removes and returns the last element, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;

        // SAFETY: the slot was live; ownership moves to the caller and
        // the slot is raw from here on.
        Some(unsafe { ptr::read(self.buf.ptr().add(self.len)) })
    }

    /// Inserts `value` at `index`, shifting the suffix right.
    ///
    /// `index == len()` degenerates to [`push`](Self::push). At
    /// capacity, the block grows by doubling and the gap opens during
    /// the same relocation pass.
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), DynVecError> {
        if index > self.len {
            return Err(DynVecError::OutOfRange {
                index,
                len: self.len,
            });
        }

        if index == self.len {
            return self.push(value);
        }

        if self.len == self.capacity() {
            let target = self.append_target(1)?;
            self.buf.reallocate(target, self.len, index, 1)?;
        } else {
            // SAFETY: one spare slot exists past len; the overlapping
            // copy shifts the suffix right, leaving slot `index` raw.
            unsafe {
                let base = self.buf.ptr();
                ptr::copy(base.add(index), base.add(index + 1), self.len - index);
            }
        }

        // SAFETY: slot `index` is raw in both branches.
        unsafe { self.buf.alloc().construct(self.buf.ptr().add(index), value) };
        self.len += 1;

        Ok(())
    }

    /// Inserts a clone of every element of `values` at `index`.
    ///
    /// Beyond capacity this allocates exactly `len() + values.len()`
    /// slots and relocates around the gap in one pass.
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when `index > len()`.
    pub fn insert_from_slice(&mut self, index: usize, values: &[T]) -> Result<(), DynVecError>
    where
        T: Clone,
    {
        if index > self.len {
            return Err(DynVecError::OutOfRange {
                index,
                len: self.len,
            });
        }

        if values.is_empty() {
            return Ok(());
        }

        self.open_gap(index, values.len())?;
        self.fill_gap(index, values.len(), |i| values[i].clone());

        Ok(())
    }

    /// Inserts `count` clones of `value` at `index`.
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when `index > len()`.
    pub fn insert_fill(&mut self, index: usize, count: usize, value: T) -> Result<(), DynVecError>
    where
        T: Clone,
    {
        if index > self.len {
            return Err(DynVecError::OutOfRange {
                index,
                len: self.len,
            });
        }

        if count == 0 {
            return Ok(());
        }

        self.open_gap(index, count)?;
        self.fill_gap(index, count, |_| value.clone());

        Ok(())
    }

    /// Appends a clone of every element of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), DynVecError>
    where
        T: Clone,
    {
        self.insert_from_slice(self.len, values)
    }

    /// Appends every element of an iterator, growing amortized.
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), DynVecError>
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let (lower, _) = values.size_hint();

        self.maybe_grow(lower)?;

        for value in values {
            self.push(value)?;
        }

        Ok(())
    }

    /// Removes and returns the element at `index`, shifting the tail
    /// left. The last index degenerates to [`pop`](Self::pop).
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<T, DynVecError> {
        if index >= self.len {
            return Err(DynVecError::OutOfRange {
                index,
                len: self.len,
            });
        }

        // SAFETY: the slot is live; ownership moves out before the tail
        // closes over it.
        unsafe {
            let base = self.buf.ptr();
            let value = ptr::read(base.add(index));

            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
            self.len -= 1;

            Ok(value)
        }
    }

    /// Removes the elements in `range`, shifting the tail left. The
    /// element formerly at `range.end` ends up at `range.start`.
    ///
    /// # Errors
    ///
    /// [`DynVecError::OutOfRange`] when the range is decreasing or ends
    /// past `len()`.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<(), DynVecError> {
        let Range { start, end } = range;

        if start > end || end > self.len {
            return Err(DynVecError::OutOfRange {
                index: end,
                len: self.len,
            });
        }

        if start == end {
            return Ok(());
        }

        let old_len = self.len;

        // Unwinding from a panicking element Drop must not re-drop: the
        // length covers only the untouched prefix until the tail is in
        // place, leaking the rest.
        self.len = start;

        unsafe {
            let base = self.buf.ptr();

            for i in start..end {
                self.buf.alloc().destroy(base.add(i));
            }

            ptr::copy(base.add(end), base.add(start), old_len - end);
        }

        self.len = old_len - (end - start);

        Ok(())
    }

    /// Destroys every element past `new_len`. A no-op when `new_len`
    /// is not below the current length. Capacity is retained.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        let old_len = self.len;

        // As in remove_range: length drops first so a panicking Drop
        // leaks instead of double-dropping.
        self.len = new_len;

        unsafe {
            for i in new_len..old_len {
                self.buf.alloc().destroy(self.buf.ptr().add(i));
            }
        }
    }

    /// Destroys every element. Capacity and storage are retained.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len` elements, producing any additional ones
    /// with `fill`.
    ///
    /// Shrinking destroys the suffix; growing beyond capacity allocates
    /// exactly `new_len` slots.
    pub fn resize_with<F>(&mut self, new_len: usize, mut fill: F) -> Result<(), DynVecError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        if new_len > self.capacity() {
            if new_len > self.buf.alloc().max_count() {
                return Err(AllocError::CapacityOverflow.into());
            }

            self.buf.reallocate(new_len, self.len, self.len, 0)?;
        }

        while self.len < new_len {
            // SAFETY: the slot at len is within capacity and raw.
            unsafe { self.buf.alloc().construct(self.buf.ptr().add(self.len), fill()) };
            self.len += 1;
        }

        Ok(())
    }

    /// Resizes to `new_len` elements, cloning `value` into any
    /// additional slots.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<(), DynVecError>
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone())
    }

    /// Replaces the contents with clones of `values`.
    ///
    /// Within capacity the storage is reused: the overlap is assigned,
    /// the surplus constructed, the excess destroyed. Beyond capacity a
    /// fresh exactly-sized block is fully built before the old one is
    /// released.
    pub fn assign_from_slice(&mut self, values: &[T]) -> Result<(), DynVecError>
    where
        T: Clone,
    {
        let count = values.len();

        if count > self.capacity() {
            self.buf.replace_with_filled(count, self.len, |i| values[i].clone())?;
            self.len = count;

            return Ok(());
        }

        let overlap = self.len.min(count);
        self.as_mut_slice()[..overlap].clone_from_slice(&values[..overlap]);

        if count > self.len {
            for i in self.len..count {
                // SAFETY: slot i is within capacity and raw.
                unsafe { self.buf.alloc().construct(self.buf.ptr().add(i), values[i].clone()) };
                self.len += 1;
            }
        } else {
            self.truncate(count);
        }

        Ok(())
    }

    /// Replaces the contents with `count` clones of `value`, reusing
    /// storage exactly like [`assign_from_slice`](Self::assign_from_slice).
    pub fn assign_fill(&mut self, count: usize, value: T) -> Result<(), DynVecError>
    where
        T: Clone,
    {
        if count > self.capacity() {
            self.buf.replace_with_filled(count, self.len, |_| value.clone())?;
            self.len = count;

            return Ok(());
        }

        let overlap = self.len.min(count);

        for slot in &mut self.as_mut_slice()[..overlap] {
            slot.clone_from(&value);
        }

        if count > self.len {
            for i in self.len..count {
                // SAFETY: slot i is within capacity and raw.
                unsafe { self.buf.alloc().construct(self.buf.ptr().add(i), value.clone()) };
                self.len += 1;
            }
        } else {
            self.truncate(count);
        }

        Ok(())
    }

    // =========================================================================
    // Growth internals
    // =========================================================================

    /// Doubling target for appending `additional` elements, clamped to
    /// the strategy's limit.
    fn append_target(&self, additional: usize) -> Result<usize, DynVecError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        let max = self.buf.alloc().max_count();

        if required > max {
            return Err(AllocError::CapacityOverflow.into());
        }

        Ok(self.capacity().saturating_mul(2).max(1).clamp(required, max))
    }

    /// Ensures capacity for `additional` more elements under the
    /// doubling policy.
    #[inline(always)]
    fn maybe_grow(&mut self, additional: usize) -> Result<(), DynVecError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;

        if required <= self.capacity() {
            return Ok(());
        }

        self.grow(additional)
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self, additional: usize) -> Result<(), DynVecError> {
        let target = self.append_target(additional)?;
        self.buf.reallocate(target, self.len, self.len, 0)?;

        Ok(())
    }

    /// Opens `count` raw slots at `index`. Beyond capacity the block is
    /// rebuilt at exactly `len + count` slots with the gap opened during
    /// relocation; within capacity the suffix shifts right in place.
    ///
    /// The caller fills the gap and accounts for the length.
    fn open_gap(&mut self, index: usize, count: usize) -> Result<(), DynVecError> {
        let required = self
            .len
            .checked_add(count)
            .ok_or(AllocError::CapacityOverflow)?;

        if required > self.capacity() {
            if required > self.buf.alloc().max_count() {
                return Err(AllocError::CapacityOverflow.into());
            }

            self.buf.reallocate(required, self.len, index, count)?;
        } else {
            // SAFETY: `count` spare slots exist past len.
            unsafe {
                let base = self.buf.ptr();
                ptr::copy(base.add(index), base.add(index + count), self.len - index);
            }
        }

        Ok(())
    }

    /// Constructs `count` elements into an open gap at `index` and
    /// commits the new length.
    ///
    /// While the gap fills, the length covers only the live prefix plus
    /// the constructed part of the gap, so a panicking `fill` leaks the
    /// relocated suffix instead of double-dropping it.
    fn fill_gap<F>(&mut self, index: usize, count: usize, mut fill: F)
    where
        F: FnMut(usize) -> T,
    {
        let old_len = self.len;
        self.len = index;

        for i in 0..count {
            // SAFETY: the gap slots are raw.
            unsafe { self.buf.alloc().construct(self.buf.ptr().add(index + i), fill(i)) };
            self.len += 1;
        }

        self.len = old_len + count;
    }
}

impl<T, A: RawAlloc<T> + Default> Default for DynVec<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: RawAlloc<T>> Drop for DynVec<T, A> {
    fn drop(&mut self) {
        // Destroy the live prefix; RawBlock releases the storage.
        self.clear();
    }
}

impl<T, A: RawAlloc<T>> Deref for DynVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAlloc<T>> DerefMut for DynVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: RawAlloc<T>> fmt::Debug for DynVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: RawAlloc<T>> IntoIterator for DynVec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let me = mem::ManuallyDrop::new(self);

        // SAFETY: `me` is never dropped, so the block moves out exactly
        // once; the iterator takes over element and storage cleanup.
        let buf = unsafe { ptr::read(&me.buf) };

        IntoIter::new(buf, me.len)
    }
}

impl<'a, T, A: RawAlloc<T>> IntoIterator for &'a DynVec<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: RawAlloc<T>> IntoIterator for &'a mut DynVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

// SAFETY: the container exclusively owns its elements and allocator;
// thread transfer is element and allocator transfer.
unsafe impl<T: Send, A: RawAlloc<T> + Send> Send for DynVec<T, A> {}
unsafe impl<T: Sync, A: RawAlloc<T> + Sync> Sync for DynVec<T, A> {}
