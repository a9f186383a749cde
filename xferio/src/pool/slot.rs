// SPDX-License-Identifier: Apache-2.0

/// A pool bucket, holding slices of one power-of-two capacity.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SlotInfo {
	/// The bucket index, the base-2 logarithm of its capacity.
	pub index: usize,
	/// The capacity of slices in the bucket, the largest length it serves.
	pub capacity: u64,
}

/// Returns the bucket serving slices of length `len`, or `None` if `len` is zero.
///
/// The index is `log2(len)` rounded up, except exact powers of two are not rounded,
/// making them the largest length in their bucket. Power-of-two lengths are the
/// most common, so their slices usually use all of their capacity.
pub const fn slot_info(len: u32) -> Option<SlotInfo> {
	if len == 0 {
		return None
	}

	let mut index = len.ilog2() as usize;
	if !len.is_power_of_two() {
		index += 1;
	}

	Some(SlotInfo { index, capacity: 1 << index })
}

/// Returns the bucket a returned slice with `capacity` belongs to, the largest
/// bucket whose slices it can stand in for. Slices from the pool always have a
/// power-of-two capacity, and land in the bucket they were rented from.
pub(crate) const fn capacity_slot(capacity: usize) -> Option<usize> {
	if capacity == 0 {
		None
	} else {
		Some(capacity.ilog2() as usize)
	}
}
