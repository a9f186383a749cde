// SPDX-License-Identifier: Apache-2.0

//! A pool of byte slices, split into buckets by power-of-two capacity.
//!
//! Each bucket is a bounded, lock-free queue of slices returned after use. Renting
//! never blocks: an empty bucket means a fresh allocation. Returning never blocks
//! either: a full bucket means the slice is dropped. Neither case is an error, only
//! a missed chance to reuse memory.
//!
//! Having a bucket per size keeps waste low when requested sizes vary widely, where
//! a single pool of large slices would hand out far more memory than needed.

mod options;
mod rented;
mod slot;

use std::sync::Arc;
use crossbeam_queue::ArrayQueue;
use log::{debug, trace};

pub use options::*;
pub use rented::RentedSlice;
pub use slot::{slot_info, SlotInfo};
use slot::capacity_slot;

/// A pool of byte slices.
pub trait SlicePooler: Sync {
	/// Rents a slice of length `size`. A reused slice keeps the previous renter's
	/// bytes up to the shorter of the two lengths, and only bytes past the previous
	/// length are zeroed. Callers must overwrite the slice, with
	/// [`Read::read_exact`](std::io::Read::read_exact) for example, before reading
	/// from it.
	fn rent_slice(&self, size: u32) -> Vec<u8>;

	/// Returns a slice to the pool. The slice is filed by its capacity rather than
	/// its length, and may be dropped if the pool has no room for it.
	fn return_slice(&self, slice: Vec<u8>);
}

/// The default [`SlicePooler`], holding a bounded queue for each bucket up to a
/// maximum slice length.
///
/// Unlike a garbage-collected or thread-local cache, pooled slices are held until
/// rented again. Bucket capacities bound how much memory can be held this way.
#[derive(Debug)]
pub struct SlicePool {
	buckets: Box<[ArrayQueue<Vec<u8>>]>,
	options: PoolOptions,
}

impl Default for SlicePool {
	fn default() -> Self { Self::with_options(PoolOptions::default()) }
}

impl SlicePool {
	/// Creates a pool of slices up to `max_slice_length` long, with the default
	/// bucket capacity.
	pub fn new(max_slice_length: u32) -> Self {
		Self::with_options(
			PoolOptions::new().with_max_slice_length(max_slice_length)
		)
	}

	/// Creates a pool with `options`.
	///
	/// # Panics
	///
	/// Panics if the bucket capacity is zero.
	pub fn with_options(options: PoolOptions) -> Self {
		assert!(options.bucket_capacity() > 0, "bucket capacity must be greater than zero");

		let count = slot_info(options.max_slice_length()).map_or(0, |slot| slot.index + 1);
		let buckets = (0..count).map(|_| ArrayQueue::new(options.bucket_capacity()))
								.collect();
		debug!(
			"created slice pool with {count} buckets of {} slices",
			options.bucket_capacity()
		);
		Self { buckets, options }
	}

	/// Returns the pool options.
	pub fn options(&self) -> PoolOptions { self.options }

	/// Returns the number of buckets.
	pub fn bucket_count(&self) -> usize { self.buckets.len() }

	/// Returns the number of slices held in bucket `index`.
	pub fn pooled_count(&self, index: usize) -> usize {
		self.buckets.get(index).map_or(0, ArrayQueue::len)
	}

	/// Rents a slice of length `size`, returning it to the pool when dropped.
	pub fn rent_guarded(&self, size: u32) -> RentedSlice<'_, Self> {
		RentedSlice::rent(self, size)
	}
}

impl SlicePooler for SlicePool {
	fn rent_slice(&self, size: u32) -> Vec<u8> {
		let Some(SlotInfo { index, capacity }) = slot_info(size) else {
			return Vec::new()
		};
		let len = size as usize;

		let Some(bucket) = self.buckets.get(index) else {
			debug!("slice of {size} bytes is too large to pool, allocating");
			return vec![0; len]
		};

		if let Some(mut slice) = bucket.pop() {
			trace!("reusing slice from bucket {index}");
			// Capacity is at least the bucket capacity, so this never allocates. Only
			// bytes past the previous length are zeroed.
			slice.resize(len, 0);
			return slice
		}

		let mut slice = Vec::with_capacity(capacity as usize);
		slice.resize(len, 0);
		slice
	}

	fn return_slice(&self, slice: Vec<u8>) {
		let Some(bucket) = capacity_slot(slice.capacity()).and_then(|index| self.buckets.get(index)) else {
			trace!("dropping unpoolable slice of capacity {}", slice.capacity());
			return
		};

		if bucket.push(slice).is_err() {
			trace!("bucket full, dropping slice");
		}
	}
}

impl<P: SlicePooler + ?Sized> SlicePooler for &P {
	#[inline]
	fn rent_slice(&self, size: u32) -> Vec<u8> { P::rent_slice(self, size) }

	#[inline]
	fn return_slice(&self, slice: Vec<u8>) { P::return_slice(self, slice) }
}

impl<P: SlicePooler + ?Sized + Send> SlicePooler for Arc<P> {
	#[inline]
	fn rent_slice(&self, size: u32) -> Vec<u8> { P::rent_slice(self, size) }

	#[inline]
	fn return_slice(&self, slice: Vec<u8>) { P::return_slice(self, slice) }
}
