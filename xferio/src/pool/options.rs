// SPDX-License-Identifier: Apache-2.0

/// The default number of slices each bucket can hold.
pub const DEFAULT_BUCKET_CAPACITY: usize = 1000;

/// The default largest pooled slice length, 100MiB.
pub const DEFAULT_MAX_SLICE_LENGTH: u32 = 100 * 1024 * 1024;

/// Options for tuning [`SlicePool`](super::SlicePool)'s memory use.
///
/// # Max slice length
///
/// The largest slice length served from a bucket. Buckets are created for every
/// power of two up to and including the one this length falls into. Longer
/// requests are allocated without pooling, and dropped when returned. Defaults to
/// `100MiB`.
///
/// # Bucket capacity
///
/// The number of slices each bucket can hold. Once a bucket is full, returned
/// slices are dropped rather than pooled, so setting this too low costs only extra
/// allocations. Defaults to `1000`, and must be non-zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct PoolOptions {
	pub max_slice_length: u32,
	pub bucket_capacity: usize,
}

impl Default for PoolOptions {
	fn default() -> Self { Self::new() }
}

impl PoolOptions {
	/// Creates a new set of pool options.
	pub const fn new() -> Self {
		Self {
			max_slice_length: DEFAULT_MAX_SLICE_LENGTH,
			bucket_capacity: DEFAULT_BUCKET_CAPACITY,
		}
	}

	/// Returns the largest pooled slice length.
	#[inline]
	pub const fn max_slice_length(&self) -> u32 { self.max_slice_length }

	/// Returns the bucket capacity.
	#[inline]
	pub const fn bucket_capacity(&self) -> usize { self.bucket_capacity }

	/// Sets the largest pooled slice length.
	#[inline]
	pub fn set_max_slice_length(&mut self, value: u32) {
		self.max_slice_length = value;
	}

	/// Sets the bucket capacity.
	#[inline]
	pub fn set_bucket_capacity(&mut self, value: usize) {
		self.bucket_capacity = value;
	}

	/// Sets the largest pooled slice length.
	#[inline]
	pub const fn with_max_slice_length(mut self, value: u32) -> Self {
		self.max_slice_length = value;
		self
	}

	/// Sets the bucket capacity.
	#[inline]
	pub const fn with_bucket_capacity(mut self, value: usize) -> Self {
		self.bucket_capacity = value;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let options = PoolOptions::default();
		assert_eq!(options.max_slice_length(), 100 * 1024 * 1024);
		assert_eq!(options.bucket_capacity(), 1000);
	}

	#[test]
	fn builders() {
		let mut options = PoolOptions::new()
			.with_max_slice_length(4096)
			.with_bucket_capacity(8);
		assert_eq!(options, PoolOptions { max_slice_length: 4096, bucket_capacity: 8 });

		options.set_bucket_capacity(2);
		options.set_max_slice_length(1);
		assert_eq!(options.bucket_capacity(), 2);
		assert_eq!(options.max_slice_length(), 1);
	}
}
