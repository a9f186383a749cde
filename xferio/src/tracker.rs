// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// A thread-safe, signed byte accumulator. Chunk readers report the size of their
/// materialized buffers to it, so that an admission layer can throttle new work
/// when too much memory is held.
pub trait ByteTracker: Sync {
	/// Adds `delta` bytes, which may be negative.
	fn add(&self, delta: i64);
}

/// A [`ByteTracker`] backed by an [`AtomicI64`].
///
/// Counters are meant to be created once and passed explicitly to each reader,
/// usually behind an [`Arc`] or by reference. There is no global instance.
#[derive(Debug, Default)]
pub struct SharedCounter(AtomicI64);

impl SharedCounter {
	/// Creates a new counter starting at `initial`.
	pub const fn new(initial: i64) -> Self {
		Self(AtomicI64::new(initial))
	}

	/// Adds `delta` to the counter, returning the new value.
	#[inline]
	pub fn add_fetch(&self, delta: i64) -> i64 {
		self.0.fetch_add(delta, Ordering::AcqRel) + delta
	}

	/// Returns the current value.
	#[inline]
	pub fn value(&self) -> i64 {
		self.0.load(Ordering::Acquire)
	}
}

impl ByteTracker for SharedCounter {
	#[inline]
	fn add(&self, delta: i64) {
		self.add_fetch(delta);
	}
}

impl<T: ByteTracker + ?Sized> ByteTracker for &T {
	#[inline]
	fn add(&self, delta: i64) { T::add(self, delta) }
}

impl<T: ByteTracker + ?Sized + Send> ByteTracker for Arc<T> {
	#[inline]
	fn add(&self, delta: i64) { T::add(self, delta) }
}

#[cfg(test)]
mod tests {
	use std::thread;
	use super::*;

	#[test]
	fn add_fetch_returns_new_value() {
		let counter = SharedCounter::new(10);
		assert_eq!(counter.add_fetch(5), 15);
		assert_eq!(counter.add_fetch(-20), -5);
		assert_eq!(counter.value(), -5);
	}

	#[test]
	fn concurrent_adds_balance() {
		let counter = SharedCounter::default();
		thread::scope(|scope| {
			for _ in 0..16 {
				scope.spawn(|| {
					for _ in 0..1000 {
						counter.add(64);
						counter.add(-64);
					}
					counter.add(1);
				});
			}
		});
		assert_eq!(counter.value(), 16);
	}

	#[test]
	fn arc_forwards() {
		let counter = Arc::new(SharedCounter::default());
		let tracker: Arc<SharedCounter> = counter.clone();
		tracker.add(42);
		assert_eq!(counter.value(), 42);
	}
}
